// tests/image_optimise.rs

use assetflow::transform::image::{ImageFormat, detect, optimise, strip_jpeg, strip_png};
use assetflow_test_utils::fixtures::{chunk, sample_png};

fn jpeg() -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xD8];
    // COM segment: length 7 covers the two length bytes and "hello".
    bytes.extend([0xFF, 0xFE, 0x00, 0x07]);
    bytes.extend(b"hello");
    // APP0.
    bytes.extend([0xFF, 0xE0, 0x00, 0x04, 0x4A, 0x46]);
    // Start of scan, then entropy-coded data and EOI.
    bytes.extend([0xFF, 0xDA, 0x00, 0x01, 0x02, 0xFF, 0xD9]);
    bytes
}

#[test]
fn detects_by_signature_then_extension() {
    assert_eq!(detect(Some("bin"), &sample_png()), ImageFormat::Png);
    assert_eq!(detect(None, &jpeg()), ImageFormat::Jpeg);
    assert_eq!(detect(Some("SVG"), b"<svg/>"), ImageFormat::Svg);
    assert_eq!(detect(Some("gif"), b"GIF89a"), ImageFormat::Other);
}

#[test]
fn png_text_chunks_are_removed() {
    let original = sample_png();
    let stripped = strip_png(&original).unwrap();
    assert!(stripped.len() < original.len());
    assert!(!stripped.windows(4).any(|w| w == b"tEXt"));
    assert!(stripped.windows(4).any(|w| w == b"IDAT"));
    assert!(stripped.ends_with(&chunk(b"IEND", &[])));

    assert_eq!(optimise(Some("png"), original.clone()), stripped);
}

#[test]
fn png_without_removable_chunks_is_unchanged() {
    let mut png = b"\x89PNG\r\n\x1a\n".to_vec();
    png.extend(chunk(b"IHDR", &[0; 13]));
    png.extend(chunk(b"IEND", &[]));
    assert_eq!(optimise(Some("png"), png.clone()), png);
}

#[test]
fn truncated_png_is_left_alone() {
    let mut png = sample_png();
    png.truncate(20);
    assert_eq!(strip_png(&png), None);
    assert_eq!(optimise(Some("png"), png.clone()), png);
}

#[test]
fn jpeg_comments_are_removed() {
    let stripped = strip_jpeg(&jpeg()).unwrap();
    assert_eq!(
        stripped,
        vec![
            0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x04, 0x4A, 0x46, 0xFF, 0xDA, 0x00, 0x01, 0x02, 0xFF,
            0xD9
        ]
    );
    assert_eq!(optimise(Some("jpg"), jpeg()), stripped);
}

#[test]
fn svg_images_are_minified() {
    let svg = b"<svg xmlns=\"http://www.w3.org/2000/svg\">\n  <title>Logo</title>\n  <rect width=\"1\"/>\n</svg>\n".to_vec();
    let out = optimise(Some("svg"), svg);
    assert_eq!(
        out,
        b"<svg xmlns=\"http://www.w3.org/2000/svg\"><rect width=\"1\"/></svg>".to_vec()
    );
}

#[test]
fn unknown_formats_pass_through() {
    let gif = b"GIF89a\x01\x00\x01\x00".to_vec();
    assert_eq!(optimise(Some("gif"), gif.clone()), gif);
    let broken_svg = b"<svg><g></svg>".to_vec();
    assert_eq!(optimise(Some("svg"), broken_svg.clone()), broken_svg);
}
