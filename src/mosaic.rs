//! Block-averaging mosaic for cover images.

use std::io::Cursor;

use image::{DynamicImage, GenericImageView, ImageFormat, RgbaImage};

use crate::Result;

/// An encoded image together with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
}

impl EncodedImage {
    /// Wraps bytes, sniffing the MIME type from the content.
    pub fn sniff(bytes: Vec<u8>) -> Self {
        let mime = match image::guess_format(&bytes) {
            Ok(ImageFormat::Png) => "image/png",
            Ok(ImageFormat::Jpeg) => "image/jpeg",
            Ok(ImageFormat::Gif) => "image/gif",
            Ok(ImageFormat::WebP) => "image/webp",
            Ok(ImageFormat::Bmp) => "image/bmp",
            _ => "application/octet-stream",
        };
        Self { bytes, mime }
    }
}

/// Side length of a mosaic block for an image of `width` x `height`.
///
/// Level 1 is a block of 1% of the longer edge; never below 2 pixels so
/// every non-zero level actually merges pixels.
pub fn block_size(width: u32, height: u32, level: u32) -> u32 {
    let edge = u64::from(width.max(height));
    let side = (edge * u64::from(level)).div_ceil(100);
    side.clamp(2, u64::from(u32::MAX)) as u32
}

/// Replaces every block with its per-channel mean, in place.
///
/// Blocks on the right and bottom edges cover whatever is left.
pub fn pixelate(image: &mut RgbaImage, block: u32) {
    let (width, height) = image.dimensions();
    let block = block.max(1);

    for top in (0..height).step_by(block as usize) {
        let bottom = (top + block).min(height);
        for left in (0..width).step_by(block as usize) {
            let right = (left + block).min(width);

            let mut sums = [0u64; 4];
            for y in top..bottom {
                for x in left..right {
                    let pixel = image.get_pixel(x, y);
                    for (sum, channel) in sums.iter_mut().zip(pixel.0) {
                        *sum += u64::from(channel);
                    }
                }
            }

            let count = u64::from(right - left) * u64::from(bottom - top);
            let mean = sums.map(|sum| ((sum + count / 2) / count) as u8);
            for y in top..bottom {
                for x in left..right {
                    image.get_pixel_mut(x, y).0 = mean;
                }
            }
        }
    }
}

/// Applies the mosaic at `level` to encoded image bytes.
///
/// Level 0 returns the input untouched. Otherwise the image is decoded,
/// pixelated and re-encoded: JPEG stays JPEG, anything else becomes PNG.
pub fn apply(bytes: &[u8], level: u32) -> Result<EncodedImage> {
    if level == 0 {
        return Ok(EncodedImage::sniff(bytes.to_vec()));
    }

    let source_format = image::guess_format(bytes).ok();
    let decoded = image::load_from_memory(bytes)?;
    let (width, height) = decoded.dimensions();

    let mut rgba = decoded.to_rgba8();
    pixelate(&mut rgba, block_size(width, height, level));

    let mut out = Cursor::new(Vec::new());
    let mime = match source_format {
        Some(ImageFormat::Jpeg) => {
            DynamicImage::ImageRgba8(rgba)
                .to_rgb8()
                .write_to(&mut out, ImageFormat::Jpeg)?;
            "image/jpeg"
        }
        _ => {
            rgba.write_to(&mut out, ImageFormat::Png)?;
            "image/png"
        }
    };

    Ok(EncodedImage {
        bytes: out.into_inner(),
        mime,
    })
}
