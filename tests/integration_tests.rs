//! Integration tests for SteganoGen
//!
//! Every test builds its carriers in memory, so no fixtures are needed.
//! Persistence tests write to temporary directories.

use image::{Rgb, RgbImage};
use steganogen::carrier::{AudioCarrier, ImageCarrier, VideoCarrier};
use steganogen::metrics::{psnr, MAX_PSNR_DB};
use steganogen::{
    capacity, decode, encode, Algorithm, Carrier, CarrierKind, EmbeddingParameters, Preset,
    StegoError,
};

const PASSPHRASE: &str = "correct horse battery staple";

/// Smooth RGB content with varied low bits.
fn photo(width: u32, height: u32) -> ImageCarrier {
    let image = RgbImage::from_fn(width, height, |x, y| {
        let (fx, fy) = (x as f64, y as f64);
        Rgb([
            (128.0 + 70.0 * (fx * 0.21).sin() * (fy * 0.13).cos()) as u8,
            (120.0 + 60.0 * ((fx + fy) * 0.17).sin()) as u8,
            (110.0 + 50.0 * (fx * 0.05 - fy * 0.31).cos()) as u8,
        ])
    });
    ImageCarrier::from_rgb(image)
}

fn speech(channels: u16, frames: usize) -> AudioCarrier {
    let samples = (0..frames * channels as usize)
        .map(|i| (12_000.0 * (i as f64 * 0.031).sin() + 3_000.0 * (i as f64 * 0.47).cos()) as i32)
        .collect();
    AudioCarrier::new(channels, 44_100, 16, samples).unwrap()
}

fn clip(frames: usize, width: u32, height: u32) -> VideoCarrier {
    let frames = (0..frames)
        .map(|n| photo(width + n as u32, height).into_image())
        .map(|frame| image::imageops::crop_imm(&frame, 0, 0, width, height).to_image())
        .collect();
    VideoCarrier::new(frames, 25.0, "png").unwrap()
}

/// Black background with white strokes, like a screenshot of text.
fn screenshot(width: u32, height: u32) -> ImageCarrier {
    let image = RgbImage::from_fn(width, height, |x, y| {
        if x % 9 < 2 || y % 12 == 5 || (x * 3 + y) % 17 == 0 {
            Rgb([255, 255, 255])
        } else {
            Rgb([0, 0, 0])
        }
    });
    ImageCarrier::from_rgb(image)
}

fn noise(width: u32, height: u32, seed: u32) -> ImageCarrier {
    let pixels = seeded_random((width * height * 3) as usize, seed);
    ImageCarrier::from_raw(width, height, pixels).unwrap()
}

fn pseudo_random(len: usize) -> Vec<u8> {
    seeded_random(len, 0x2545_F491)
}

fn seeded_random(len: usize, seed: u32) -> Vec<u8> {
    let mut state = seed.max(1);
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect()
}

/// 64×64 carrier, 1-bit LSB, "hello"
#[test]
fn test_hello_roundtrip() {
    let carrier: Carrier = photo(64, 64).into();
    let params = EmbeddingParameters::lsb(1);

    let report = capacity(&carrier, &params).unwrap();
    assert_eq!(report.raw_bytes(), 1536);

    let outcome = encode(&carrier, b"hello", &params, None).unwrap();
    let decoded = decode(&outcome.carrier, &params, None).unwrap();

    assert_eq!(decoded, b"hello");
}

/// Oversized payloads fail before anything is written.
#[test]
fn test_capacity_exceeded_leaves_carrier_unchanged() {
    let carrier: Carrier = photo(64, 64).into();
    let snapshot = carrier.clone();
    let params = EmbeddingParameters::lsb(1);

    let result = encode(&carrier, &vec![0xAB; 2000], &params, None);

    assert!(matches!(result, Err(StegoError::CapacityExceeded { .. })));
    assert_eq!(carrier, snapshot);
}

/// The advertised maximum payload fits exactly; one byte more does not.
#[test]
fn test_max_payload_is_exact() {
    let carrier: Carrier = photo(32, 32).into();
    let params = EmbeddingParameters::lsb(2);
    let report = capacity(&carrier, &params).unwrap();

    let plain = report.max_payload_bytes(false);
    let outcome = encode(&carrier, &pseudo_random(plain), &params, None).unwrap();
    assert_eq!(decode(&outcome.carrier, &params, None).unwrap(), pseudo_random(plain));
    assert!(matches!(
        encode(&carrier, &pseudo_random(plain + 1), &params, None),
        Err(StegoError::CapacityExceeded { .. })
    ));

    let sealed = report.max_payload_bytes(true);
    assert!(encode(&carrier, &pseudo_random(sealed), &params, Some(PASSPHRASE)).is_ok());
    assert!(matches!(
        encode(&carrier, &pseudo_random(sealed + 1), &params, Some(PASSPHRASE)),
        Err(StegoError::CapacityExceeded { .. })
    ));
}

/// 8×8-aligned image, DCT strength 15
#[test]
fn test_dct_roundtrip() {
    let carrier: Carrier = photo(128, 96).into();
    let params = EmbeddingParameters::dct(15.0);
    let payload = b"frequency domain";

    let outcome = encode(&carrier, payload, &params, None).unwrap();
    assert_eq!(decode(&outcome.carrier, &params, None).unwrap(), payload);

    let quality = outcome.quality.unwrap();
    assert!(quality.psnr > 30.0, "psnr {}", quality.psnr);
}

#[test]
fn test_dct_unaligned_image() {
    let carrier: Carrier = photo(100, 75).into();
    let params = EmbeddingParameters::dct(20.0);

    let outcome = encode(&carrier, b"edge", &params, None).unwrap();
    assert_eq!(decode(&outcome.carrier, &params, None).unwrap(), b"edge");
}

#[test]
fn test_dwt_roundtrip() {
    let carrier: Carrier = photo(64, 48).into();
    let payload = pseudo_random(200);

    for strength in [0.05, 0.1, 0.5] {
        let params = EmbeddingParameters::dwt(strength);
        let outcome = encode(&carrier, &payload, &params, None).unwrap();
        assert_eq!(decode(&outcome.carrier, &params, None).unwrap(), payload);
    }
}

#[test]
fn test_dwt_carrier_too_small() {
    let carrier: Carrier = photo(24, 64).into();
    let result = encode(&carrier, b"x", &EmbeddingParameters::dwt(0.1), None);

    assert!(matches!(result, Err(StegoError::CapacityExceeded { usable: 0, .. })));
}

/// Audio survives a WAV write/read cycle.
#[test]
fn test_audio_roundtrip_through_wav() {
    let carrier: Carrier = speech(2, 4_000).into();
    let payload = pseudo_random(500);

    for bits in 1..=4 {
        let params = EmbeddingParameters::lsb(bits);
        let outcome = encode(&carrier, &payload, &params, None).unwrap();
        assert!(outcome.quality.is_none());

        let Carrier::Audio(stego) = outcome.carrier else {
            panic!("audio carrier expected");
        };
        let reloaded = AudioCarrier::from_bytes(&stego.to_wav_bytes().unwrap()).unwrap();
        let decoded = decode(&reloaded.into(), &params, None).unwrap();

        assert_eq!(decoded, payload, "{bits} bits");
    }
}

/// Skipped frames are untouched and decoding uses the same frame rule.
#[test]
fn test_video_frame_skip_roundtrip() {
    let original = clip(5, 16, 12);
    let carrier: Carrier = original.clone().into();
    let params = EmbeddingParameters::video(1, 2);
    let payload = pseudo_random(120);

    let outcome = encode(&carrier, &payload, &params, None).unwrap();
    assert_eq!(decode(&outcome.carrier, &params, None).unwrap(), payload);

    let Carrier::Video(stego) = &outcome.carrier else {
        panic!("video carrier expected");
    };
    assert_eq!(stego.frames()[1], original.frames()[1]);
    assert_eq!(stego.frames()[3], original.frames()[3]);
    assert_eq!(stego.frames()[4], original.frames()[4]);

    let wrong_skip = decode(&outcome.carrier, &EmbeddingParameters::video(1, 1), None);
    assert_ne!(wrong_skip.ok(), Some(payload));
}

#[test]
fn test_video_persists_as_frame_directory() {
    let dir = tempfile::tempdir().unwrap();
    let carrier: Carrier = clip(3, 8, 8).into();
    let params = EmbeddingParameters::video(2, 1);

    let outcome = encode(&carrier, b"frames on disk", &params, None).unwrap();
    outcome.carrier.save(dir.path()).unwrap();

    let loaded = Carrier::open(dir.path()).unwrap();
    assert_eq!(loaded.kind(), CarrierKind::Video);
    assert_eq!(decode(&loaded, &params, None).unwrap(), b"frames on disk");
}

#[test]
fn test_png_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stego.png");
    let carrier: Carrier = photo(40, 40).into();
    let params = EmbeddingParameters::lsb(3);

    let outcome = encode(&carrier, b"saved to disk", &params, Some(PASSPHRASE)).unwrap();
    outcome.carrier.save(&path).unwrap();

    let loaded = Carrier::open(&path).unwrap();
    assert_eq!(decode(&loaded, &params, Some(PASSPHRASE)).unwrap(), b"saved to disk");
}

#[test]
fn test_encrypted_roundtrip_and_wrong_passphrase() {
    let carrier: Carrier = photo(64, 64).into();
    let params = EmbeddingParameters::lsb(1);

    let outcome = encode(&carrier, b"top secret", &params, Some(PASSPHRASE)).unwrap();

    let decoded = decode(&outcome.carrier, &params, Some(PASSPHRASE)).unwrap();
    assert_eq!(decoded, b"top secret");

    let wrong = decode(&outcome.carrier, &params, Some("not the passphrase"));
    assert!(matches!(wrong, Err(StegoError::Decryption(_))));
}

#[test]
fn test_encrypted_roundtrip_every_codec() {
    let cases: Vec<(Carrier, EmbeddingParameters)> = vec![
        (photo(128, 128).into(), EmbeddingParameters::dct(10.0)),
        (photo(64, 64).into(), EmbeddingParameters::dwt(0.1)),
        (speech(2, 2_000).into(), EmbeddingParameters::lsb(2)),
        (clip(4, 16, 16).into(), EmbeddingParameters::video(1, 1)),
    ];

    for (carrier, params) in &cases {
        let outcome = encode(carrier, b"top secret", params, Some(PASSPHRASE)).unwrap();

        let decoded = decode(&outcome.carrier, params, Some(PASSPHRASE)).unwrap();
        assert_eq!(decoded, b"top secret", "{:?}", params);

        let wrong = decode(&outcome.carrier, params, Some("not the passphrase"));
        assert!(matches!(wrong, Err(StegoError::Decryption(_))), "{:?}", params);
    }
}

/// Low strengths on saturated content need boosting past clamping.
#[test]
fn test_transform_codecs_on_high_contrast() {
    let carrier: Carrier = screenshot(128, 128).into();
    let payload = b"hello world payload";

    for params in [
        EmbeddingParameters::dct(1.0),
        EmbeddingParameters::dct(5.0),
        EmbeddingParameters::dwt(0.01),
        EmbeddingParameters::dwt(0.05),
        Preset::Stealth.parameters(Algorithm::Dct, CarrierKind::Image),
        Preset::Stealth.parameters(Algorithm::Dwt, CarrierKind::Image),
    ] {
        let outcome = encode(&carrier, payload, &params, None).unwrap();
        assert_eq!(decode(&outcome.carrier, &params, None).unwrap(), payload, "{:?}", params);
    }

    let params = EmbeddingParameters::dwt(0.05);
    let outcome = encode(&carrier, payload, &params, Some(PASSPHRASE)).unwrap();
    assert_eq!(decode(&outcome.carrier, &params, Some(PASSPHRASE)).unwrap(), payload);
}

#[test]
fn test_transform_codecs_on_random_images() {
    for seed in 1..=25 {
        let small: Carrier = noise(32, 32, seed).into();
        let params = EmbeddingParameters::dwt(0.01);
        let outcome = encode(&small, b"noise", &params, None).unwrap();
        assert_eq!(decode(&outcome.carrier, &params, None).unwrap(), b"noise", "dwt seed {seed}");

        let larger: Carrier = noise(64, 64, seed).into();
        let params = EmbeddingParameters::dct(1.0);
        let outcome = encode(&larger, b"noise", &params, None).unwrap();
        assert_eq!(decode(&outcome.carrier, &params, None).unwrap(), b"noise", "dct seed {seed}");
    }
}

#[test]
fn test_missing_passphrase() {
    let carrier: Carrier = photo(64, 64).into();
    let params = EmbeddingParameters::dwt(0.1);

    let outcome = encode(&carrier, b"locked", &params, Some(PASSPHRASE)).unwrap();
    let result = decode(&outcome.carrier, &params, None);

    assert!(matches!(result, Err(StegoError::PassphraseRequired)));
}

#[test]
fn test_ciphertext_differs_between_encodes() {
    let carrier: Carrier = photo(32, 32).into();
    let params = EmbeddingParameters::lsb(1);

    let first = encode(&carrier, b"same", &params, Some(PASSPHRASE)).unwrap();
    let second = encode(&carrier, b"same", &params, Some(PASSPHRASE)).unwrap();

    assert_ne!(first.carrier, second.carrier);
}

#[test]
fn test_plain_carrier_is_format_error() {
    let carrier: Carrier = photo(64, 64).into();

    for params in [
        EmbeddingParameters::lsb(1),
        EmbeddingParameters::dct(10.0),
        EmbeddingParameters::dwt(0.1),
    ] {
        let result = decode(&carrier, &params, None);
        assert!(
            matches!(result, Err(StegoError::Format(_))),
            "{}: {:?}",
            params.algorithm,
            result
        );
    }
}

/// Header intact, body cut off.
#[test]
fn test_truncated_carrier() {
    let carrier: Carrier = photo(64, 64).into();
    let params = EmbeddingParameters::lsb(1);

    let outcome = encode(&carrier, &pseudo_random(1000), &params, None).unwrap();
    let Carrier::Image(stego) = outcome.carrier else {
        panic!("image carrier expected");
    };
    let rows = 8;
    let cropped = ImageCarrier::from_raw(64, rows, stego.pixels()[..(64 * rows * 3) as usize].to_vec())
        .unwrap();

    let result = decode(&cropped.into(), &params, None);
    assert!(matches!(result, Err(StegoError::TruncatedData { .. })));
}

#[test]
fn test_psnr_identical_is_sentinel() {
    let image = photo(32, 32);
    assert_eq!(psnr(&image, &image).unwrap(), MAX_PSNR_DB);
}

/// More bits per channel means more distortion.
#[test]
fn test_psnr_decreases_with_bits_per_channel() {
    let original = photo(64, 64);
    let carrier: Carrier = original.clone().into();
    let payload = pseudo_random(400);

    let values: Vec<f64> = (1..=4)
        .map(|bits| {
            let outcome = encode(&carrier, &payload, &EmbeddingParameters::lsb(bits), None).unwrap();
            let Carrier::Image(stego) = outcome.carrier else {
                panic!("image carrier expected");
            };
            psnr(&original, &stego).unwrap()
        })
        .collect();

    for pair in values.windows(2) {
        assert!(pair[0] > pair[1], "psnr sequence {:?}", values);
    }
    assert!(values[0] < MAX_PSNR_DB);
}

#[test]
fn test_presets_roundtrip() {
    let image: Carrier = photo(64, 64).into();
    let audio: Carrier = speech(1, 3_000).into();
    let video: Carrier = clip(4, 16, 16).into();

    for preset in Preset::ALL {
        for algorithm in [Algorithm::Lsb, Algorithm::Dct, Algorithm::Dwt] {
            let params = preset.parameters(algorithm, CarrierKind::Image);
            let outcome = encode(&image, b"preset", &params, None).unwrap();
            assert_eq!(decode(&outcome.carrier, &params, None).unwrap(), b"preset");
        }

        for carrier in [&audio, &video] {
            let params = preset.parameters(Algorithm::Lsb, carrier.kind());
            let outcome = encode(carrier, b"preset", &params, None).unwrap();
            assert_eq!(decode(&outcome.carrier, &params, None).unwrap(), b"preset");
        }
    }
}

#[test]
fn test_invalid_parameters_rejected() {
    let image: Carrier = photo(32, 32).into();
    let audio: Carrier = speech(1, 500).into();

    assert!(matches!(
        encode(&image, b"x", &EmbeddingParameters::lsb(5), None),
        Err(StegoError::UnsupportedParameter(_))
    ));
    assert!(matches!(
        encode(&audio, b"x", &EmbeddingParameters::dwt(0.1), None),
        Err(StegoError::UnsupportedParameter(_))
    ));
    assert!(matches!(
        decode(&image, &EmbeddingParameters::dct(0.0), None),
        Err(StegoError::UnsupportedParameter(_))
    ));
}
