//! RGB image carriers.
//!
//! Images are held as 8-bit RGB. Alpha and grayscale inputs are converted on
//! load, so every pixel has exactly three channels. Only lossless formats
//! (PNG, BMP) keep embedded bits intact on disk.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbImage};

use super::CarrierError;

/// Channels per pixel.
pub const CHANNELS: usize = 3;

/// An RGB image buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCarrier {
    image: RgbImage,
}

impl ImageCarrier {
    /// Loads an image from a file path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CarrierError> {
        let image = image::open(path).map_err(|e| CarrierError::Load(e.to_string()))?;
        Ok(Self::from_dynamic(image))
    }

    /// Loads an image from encoded bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CarrierError> {
        let image = image::load_from_memory(bytes).map_err(|e| CarrierError::Load(e.to_string()))?;
        Ok(Self::from_dynamic(image))
    }

    /// Wraps a decoded image, converting it to RGB.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self {
            image: image.to_rgb8(),
        }
    }

    pub fn from_rgb(image: RgbImage) -> Self {
        Self { image }
    }

    /// Builds an image from raw interleaved RGB bytes.
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, CarrierError> {
        let image = RgbImage::from_raw(width, height, pixels).ok_or_else(|| {
            CarrierError::Load(format!(
                "pixel buffer does not match {}x{} RGB dimensions",
                width, height
            ))
        })?;
        Ok(Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Interleaved RGB bytes in row-major order.
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.image
    }

    /// Saves the image; the format follows the file extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), CarrierError> {
        self.image
            .save(path)
            .map_err(|e| CarrierError::Save(e.to_string()))
    }

    /// Returns the image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, CarrierError> {
        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| CarrierError::Save(e.to_string()))?;
        Ok(bytes)
    }

    /// Returns a reference to the underlying image.
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Consumes self and returns the underlying image.
    pub fn into_image(self) -> RgbImage {
        self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};

    #[test]
    fn test_rgba_converted_to_rgb() {
        let rgba = ImageBuffer::from_fn(4, 4, |x, y| Rgba([x as u8, y as u8, 7, 128]));
        let carrier = ImageCarrier::from_dynamic(DynamicImage::ImageRgba8(rgba));

        assert_eq!(carrier.pixels().len(), 4 * 4 * CHANNELS);
        assert_eq!(&carrier.pixels()[..3], &[0, 0, 7]);
    }

    #[test]
    fn test_png_roundtrip() {
        let pixels: Vec<u8> = (0..(8 * 6 * 3)).map(|i| (i * 5 % 256) as u8).collect();
        let carrier = ImageCarrier::from_raw(8, 6, pixels).unwrap();

        let png = carrier.to_png_bytes().unwrap();
        let loaded = ImageCarrier::from_bytes(&png).unwrap();

        assert_eq!(loaded, carrier);
    }

    #[test]
    fn test_raw_size_mismatch() {
        assert!(ImageCarrier::from_raw(4, 4, vec![0u8; 10]).is_err());
    }
}
