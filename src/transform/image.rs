// src/transform/image.rs

//! Lossless image optimisation.
//!
//! PNG loses its text and timestamp chunks, JPEG its comment and
//! APP12/APP13 segments, SVG goes through the SVG minifier. The optimised
//! bytes are used only when they are actually smaller; anything that fails to
//! parse is returned unchanged.

use tracing::trace;

use super::svg::{self, MinifyOptions};

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
const PNG_DROPPED_CHUNKS: &[&[u8; 4]] = &[b"tEXt", b"zTXt", b"iTXt", b"tIME"];

/// JPEG markers removed: COM, APP12, APP13.
const JPEG_DROPPED_MARKERS: &[u8] = &[0xFE, 0xEC, 0xED];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Svg,
    Other,
}

pub fn detect(extension: Option<&str>, bytes: &[u8]) -> ImageFormat {
    if bytes.starts_with(PNG_SIGNATURE) {
        return ImageFormat::Png;
    }
    if bytes.starts_with(&[0xFF, 0xD8]) {
        return ImageFormat::Jpeg;
    }
    match extension.map(|e| e.to_ascii_lowercase()) {
        Some(ext) if ext == "svg" => ImageFormat::Svg,
        _ => ImageFormat::Other,
    }
}

pub fn optimise(extension: Option<&str>, bytes: Vec<u8>) -> Vec<u8> {
    let optimised = match detect(extension, &bytes) {
        ImageFormat::Png => strip_png(&bytes),
        ImageFormat::Jpeg => strip_jpeg(&bytes),
        ImageFormat::Svg => std::str::from_utf8(&bytes)
            .ok()
            .and_then(|text| svg::minify_str(text, &MinifyOptions::default()).ok())
            .map(String::into_bytes),
        ImageFormat::Other => None,
    };
    match optimised {
        Some(smaller) if smaller.len() < bytes.len() => {
            trace!(
                before = bytes.len(),
                after = smaller.len(),
                "optimised image"
            );
            smaller
        }
        _ => bytes,
    }
}

pub fn strip_png(bytes: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(bytes.len());
    out.extend_from_slice(bytes.get(..PNG_SIGNATURE.len())?);
    let mut pos = PNG_SIGNATURE.len();

    while pos < bytes.len() {
        let len_bytes: [u8; 4] = bytes.get(pos..pos + 4)?.try_into().ok()?;
        let len = u32::from_be_bytes(len_bytes) as usize;
        let end = pos.checked_add(12)?.checked_add(len)?;
        let chunk = bytes.get(pos..end)?;
        let kind = &chunk[4..8];
        if !PNG_DROPPED_CHUNKS.iter().any(|k| k.as_slice() == kind) {
            out.extend_from_slice(chunk);
        }
        pos = end;
        if kind == b"IEND" {
            break;
        }
    }
    Some(out)
}

pub fn strip_jpeg(bytes: &[u8]) -> Option<Vec<u8>> {
    if !bytes.starts_with(&[0xFF, 0xD8]) {
        return None;
    }
    let mut out = Vec::with_capacity(bytes.len());
    out.extend_from_slice(&bytes[..2]);
    let mut pos = 2;

    loop {
        if *bytes.get(pos)? != 0xFF {
            return None;
        }
        // Fill bytes.
        let mut marker_pos = pos + 1;
        while *bytes.get(marker_pos)? == 0xFF {
            marker_pos += 1;
        }
        let marker = bytes[marker_pos];

        match marker {
            // Start of scan: the rest is entropy-coded data.
            0xDA => {
                out.extend_from_slice(&bytes[pos..]);
                return Some(out);
            }
            0xD9 => {
                out.extend_from_slice(&bytes[pos..=marker_pos]);
                return Some(out);
            }
            0x01 | 0xD0..=0xD7 => {
                out.extend_from_slice(&bytes[pos..=marker_pos]);
                pos = marker_pos + 1;
            }
            _ => {
                let len_bytes: [u8; 2] =
                    bytes.get(marker_pos + 1..marker_pos + 3)?.try_into().ok()?;
                let len = u16::from_be_bytes(len_bytes) as usize;
                if len < 2 {
                    return None;
                }
                let end = marker_pos + 1 + len;
                let segment = bytes.get(pos..end)?;
                if !JPEG_DROPPED_MARKERS.contains(&marker) {
                    out.extend_from_slice(segment);
                }
                pos = end;
            }
        }
    }
}
