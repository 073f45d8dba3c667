//! Local logo preview without a network round-trip
//!
//! Reads just enough of an image file to report its format and pixel
//! dimensions. Pixel data is never decoded; the preview is display-only
//! and the submitted payload carries only the file reference.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

/// Image formats the branding step accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Ico,
}

impl ImageFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageFormat::Png => "PNG",
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::Gif => "GIF",
            ImageFormat::Ico => "ICO",
        }
    }
}

/// Metadata shown next to a logo field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoPreview {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    pub file_size: u64,
}

impl LogoPreview {
    /// One-line summary for the form, e.g. `PNG 128x128 (4.2 KB)`
    pub fn summary(&self) -> String {
        format!(
            "{} {}x{} ({})",
            self.format.as_str(),
            self.width,
            self.height,
            human_size(self.file_size)
        )
    }
}

fn human_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Sniff format and dimensions from a logo file on disk
pub fn sniff(path: &Path) -> Result<LogoPreview> {
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read image file {}", path.display()))?;
    let file_size = bytes.len() as u64;

    let (format, width, height) = sniff_bytes(&bytes)?;
    Ok(LogoPreview {
        format,
        width,
        height,
        file_size,
    })
}

fn sniff_bytes(bytes: &[u8]) -> Result<(ImageFormat, u32, u32)> {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]) {
        return png_dimensions(bytes).map(|(w, h)| (ImageFormat::Png, w, h));
    }
    if bytes.starts_with(&[0xff, 0xd8, 0xff]) {
        return jpeg_dimensions(bytes).map(|(w, h)| (ImageFormat::Jpeg, w, h));
    }
    if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        return gif_dimensions(bytes).map(|(w, h)| (ImageFormat::Gif, w, h));
    }
    if bytes.starts_with(&[0x00, 0x00, 0x01, 0x00]) {
        return ico_dimensions(bytes).map(|(w, h)| (ImageFormat::Ico, w, h));
    }
    bail!("unrecognized image format (expected PNG, JPEG, GIF or ICO)")
}

/// PNG stores IHDR width/height as big-endian u32 at offsets 16 and 20
fn png_dimensions(bytes: &[u8]) -> Result<(u32, u32)> {
    if bytes.len() < 24 {
        bail!("truncated PNG header");
    }
    let width = u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
    let height = u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
    Ok((width, height))
}

/// GIF logical screen size is little-endian u16 at offsets 6 and 8
fn gif_dimensions(bytes: &[u8]) -> Result<(u32, u32)> {
    if bytes.len() < 10 {
        bail!("truncated GIF header");
    }
    let width = u16::from_le_bytes([bytes[6], bytes[7]]);
    let height = u16::from_le_bytes([bytes[8], bytes[9]]);
    Ok((u32::from(width), u32::from(height)))
}

/// ICO directory entry: width/height bytes where 0 means 256
fn ico_dimensions(bytes: &[u8]) -> Result<(u32, u32)> {
    if bytes.len() < 8 {
        bail!("truncated ICO header");
    }
    let count = u16::from_le_bytes([bytes[4], bytes[5]]);
    if count == 0 {
        bail!("ICO file contains no images");
    }
    let width = bytes[6];
    let height = bytes[7];
    let w = if width == 0 { 256 } else { u32::from(width) };
    let h = if height == 0 { 256 } else { u32::from(height) };
    Ok((w, h))
}

/// Walk JPEG markers to the first SOFn frame header
fn jpeg_dimensions(bytes: &[u8]) -> Result<(u32, u32)> {
    let mut pos = 2;
    while pos + 9 < bytes.len() {
        if bytes[pos] != 0xff {
            pos += 1;
            continue;
        }
        let marker = bytes[pos + 1];
        // Standalone markers without a length segment
        if (0xd0..=0xd9).contains(&marker) || marker == 0x01 || marker == 0xff {
            pos += 2;
            continue;
        }
        let len = usize::from(u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]));
        // SOF0..SOF15 excluding DHT (C4), JPG (C8), DAC (CC)
        if (0xc0..=0xcf).contains(&marker)
            && marker != 0xc4
            && marker != 0xc8
            && marker != 0xcc
        {
            if pos + 9 >= bytes.len() {
                break;
            }
            let height = u16::from_be_bytes([bytes[pos + 5], bytes[pos + 6]]);
            let width = u16::from_be_bytes([bytes[pos + 7], bytes[pos + 8]]);
            return Ok((u32::from(width), u32::from(height)));
        }
        pos += 2 + len;
    }
    bail!("no frame header found in JPEG")
}
