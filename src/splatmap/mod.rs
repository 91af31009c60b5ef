//! Splatmap pixel sources.
//!
//! The converter reads pixels through the [`PixelSource`] trait, so any
//! image-like container can be converted directly. [`Splatmap`] is the owned,
//! immutable snapshot used when the pixels come from a Bevy [`Image`].

mod image;

use crate::error::{Result, SplatmapError};
use crate::mapping::CHANNEL_COUNT;

/// Read-only access to a 4-channel image.
///
/// Implementors report their size and return `[r, g, b, a]` with each channel
/// in `0.0..=1.0` for any `x < width()` and `y < height()`.
pub trait PixelSource: Sync {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn pixel(&self, x: u32, y: u32) -> [f32; CHANNEL_COUNT];
}

impl<T: PixelSource + ?Sized> PixelSource for &T {
    fn width(&self) -> u32 {
        (**self).width()
    }

    fn height(&self) -> u32 {
        (**self).height()
    }

    fn pixel(&self, x: u32, y: u32) -> [f32; CHANNEL_COUNT] {
        (**self).pixel(x, y)
    }
}

/// An immutable RGBA splatmap with float channels.
///
/// Pixels are stored row-major, X varying fastest.
///
/// # Example
///
/// ```
/// use bevy_splatmap::splatmap::{PixelSource, Splatmap};
///
/// let splatmap = Splatmap::from_fn(4, 4, |x, _| {
///     if x < 2 { [1.0, 0.0, 0.0, 0.0] } else { [0.0, 1.0, 0.0, 0.0] }
/// })
/// .unwrap();
///
/// assert_eq!(splatmap.pixel(3, 0), [0.0, 1.0, 0.0, 0.0]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Splatmap {
    width: u32,
    height: u32,
    pixels: Vec<[f32; CHANNEL_COUNT]>,
}

impl Splatmap {
    /// Wraps row-major pixels. `pixels.len()` must equal `width * height`.
    pub fn new(width: u32, height: u32, pixels: Vec<[f32; CHANNEL_COUNT]>) -> Result<Self> {
        check_dimensions(width, height)?;
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(SplatmapError::PixelDataSize {
                expected,
                found: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Creates a splatmap where every pixel has the same value.
    pub fn filled(width: u32, height: u32, pixel: [f32; CHANNEL_COUNT]) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![pixel; width as usize * height as usize],
        })
    }

    /// Creates a splatmap by evaluating `f(x, y)` for each pixel.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Result<Self>
    where
        F: FnMut(u32, u32) -> [f32; CHANNEL_COUNT],
    {
        check_dimensions(width, height)?;
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Creates a splatmap from tightly packed 8-bit RGBA bytes.
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        check_dimensions(width, height)?;
        let expected = width as usize * height as usize * CHANNEL_COUNT;
        if bytes.len() != expected {
            return Err(SplatmapError::PixelDataSize {
                expected,
                found: bytes.len(),
            });
        }
        let pixels = bytes
            .chunks_exact(CHANNEL_COUNT)
            .map(|px| image::unorm8([px[0], px[1], px[2], px[3]]))
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn pixels(&self) -> &[[f32; CHANNEL_COUNT]] {
        &self.pixels
    }
}

impl PixelSource for Splatmap {
    #[inline]
    fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn pixel(&self, x: u32, y: u32) -> [f32; CHANNEL_COUNT] {
        self.pixels[y as usize * self.width as usize + x as usize]
    }
}

pub(crate) fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(SplatmapError::InvalidDimension {
            what: "splatmap",
            width,
            height,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fn_layout() {
        let map = Splatmap::from_fn(3, 2, |x, y| [x as f32, y as f32, 0.0, 0.0]).unwrap();
        assert_eq!(map.pixels().len(), 6);
        assert_eq!(map.pixel(2, 1), [2.0, 1.0, 0.0, 0.0]);
        assert_eq!(map.pixels()[4], [1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_pixel_index_wide_rows() {
        let map = Splatmap::from_fn(1000, 3, |x, y| [x as f32 / 999.0, y as f32, 0.0, 0.0]).unwrap();
        assert_eq!(map.pixel(999, 2), [1.0, 2.0, 0.0, 0.0]);
        assert_eq!(map.pixel(0, 1), [0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_new_checks_length() {
        let err = Splatmap::new(2, 2, vec![[0.0; 4]; 3]).unwrap_err();
        assert_eq!(
            err,
            SplatmapError::PixelDataSize {
                expected: 4,
                found: 3
            }
        );
    }

    #[test]
    fn test_zero_dimensions() {
        assert!(matches!(
            Splatmap::filled(0, 4, [0.0; 4]),
            Err(SplatmapError::InvalidDimension { what: "splatmap", .. })
        ));
        assert!(Splatmap::from_rgba8(4, 0, &[]).is_err());
    }

    #[test]
    fn test_from_rgba8() {
        let map = Splatmap::from_rgba8(2, 1, &[255, 0, 0, 0, 0, 51, 102, 255]).unwrap();
        assert_eq!(map.pixel(0, 0), [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(map.pixel(1, 0), [0.0, 0.2, 0.4, 1.0]);
    }

    #[test]
    fn test_reference_source() {
        let map = Splatmap::filled(2, 2, [0.5; 4]).unwrap();
        let by_ref: &dyn PixelSource = &map;
        assert_eq!((&by_ref).width(), 2);
        assert_eq!((&by_ref).pixel(1, 1), [0.5; 4]);
    }
}
