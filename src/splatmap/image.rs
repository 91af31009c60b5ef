//! Decoding Bevy [`Image`] assets into [`Splatmap`]s.

use bevy::image::Image;
use bevy::render::render_resource::TextureFormat;

use super::{Splatmap, check_dimensions};
use crate::error::{Result, SplatmapError};
use crate::mapping::CHANNEL_COUNT;

/// Pixel layouts a splatmap image may be stored in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Layout {
    Rgba8,
    Bgra8,
    Rgba16,
    Rgba32Float,
}

impl Layout {
    fn of(format: TextureFormat) -> Option<Self> {
        match format {
            TextureFormat::Rgba8Unorm | TextureFormat::Rgba8UnormSrgb => Some(Self::Rgba8),
            TextureFormat::Bgra8Unorm | TextureFormat::Bgra8UnormSrgb => Some(Self::Bgra8),
            TextureFormat::Rgba16Unorm => Some(Self::Rgba16),
            TextureFormat::Rgba32Float => Some(Self::Rgba32Float),
            _ => None,
        }
    }

    const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgba8 | Self::Bgra8 => 4,
            Self::Rgba16 => 8,
            Self::Rgba32Float => 16,
        }
    }

    fn decode(self, px: &[u8]) -> [f32; CHANNEL_COUNT] {
        match self {
            Self::Rgba8 => unorm8([px[0], px[1], px[2], px[3]]),
            Self::Bgra8 => unorm8([px[2], px[1], px[0], px[3]]),
            Self::Rgba16 => {
                let mut out = [0.0; CHANNEL_COUNT];
                for (c, bytes) in out.iter_mut().zip(px.chunks_exact(2)) {
                    *c = u16::from_le_bytes([bytes[0], bytes[1]]) as f32 / u16::MAX as f32;
                }
                out
            }
            Self::Rgba32Float => bytemuck::pod_read_unaligned(px),
        }
    }
}

#[inline]
pub(super) fn unorm8(px: [u8; CHANNEL_COUNT]) -> [f32; CHANNEL_COUNT] {
    px.map(|c| c as f32 / 255.0)
}

impl Splatmap {
    /// Snapshots a loaded Bevy image.
    ///
    /// Channel values are read as stored: sRGB formats are not
    /// gamma-decoded, since a splatmap holds weights rather than colors.
    ///
    /// The origin is the top-left texel: the first row of the image data is
    /// `y = 0`, matching Bevy's texture layout. Flip the image beforehand for
    /// bottom-left authored splatmaps.
    ///
    /// # Errors
    /// - [`SplatmapError::UnsupportedFormat`] for formats other than
    ///   RGBA8/BGRA8 (linear or sRGB), `Rgba16Unorm` and `Rgba32Float`
    /// - [`SplatmapError::MissingPixelData`] if the image has no CPU-side data
    /// - [`SplatmapError::PixelDataSize`] if the byte count does not match
    ///   the declared size
    pub fn from_image(image: &Image) -> Result<Self> {
        let format = image.texture_descriptor.format;
        let layout = Layout::of(format).ok_or(SplatmapError::UnsupportedFormat { found: format })?;

        let width = image.width();
        let height = image.height();
        check_dimensions(width, height)?;

        let data = image
            .data
            .as_deref()
            .ok_or(SplatmapError::MissingPixelData)?;

        // Only the first array layer / mip level is used.
        let expected = width as usize * height as usize * layout.bytes_per_pixel();
        if data.len() < expected {
            return Err(SplatmapError::PixelDataSize {
                expected,
                found: data.len(),
            });
        }

        let pixels = data[..expected]
            .chunks_exact(layout.bytes_per_pixel())
            .map(|px| layout.decode(px))
            .collect();

        Ok(Self {
            width,
            height,
            pixels,
        })
    }
}
