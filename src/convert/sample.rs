//! Nearest and bilinear sampling of a pixel source.

use bevy::prelude::*;

use super::ResampleMode;
use crate::error::{Result, SplatmapError};
use crate::mapping::CHANNEL_COUNT;
use crate::splatmap::PixelSource;

/// Maps target grid cells into continuous splatmap pixel coordinates.
#[derive(Clone, Copy, Debug)]
pub(crate) struct CellMapping {
    source: UVec2,
    scale: Vec2,
}

impl CellMapping {
    pub fn new(source: UVec2, target: UVec2) -> Self {
        Self {
            source,
            scale: source.as_vec2() / target.as_vec2(),
        }
    }

    /// `(x * source_w / target_w, y * source_h / target_h)`.
    #[inline]
    pub fn to_source(&self, x: u32, y: u32) -> Vec2 {
        vec2(x as f32, y as f32) * self.scale
    }

    #[inline]
    fn max_index(&self) -> Vec2 {
        (self.source - UVec2::ONE).as_vec2()
    }
}

/// Samples `source` at continuous pixel coordinate `uv`.
pub(crate) fn sample<S: PixelSource + ?Sized>(
    source: &S,
    cells: &CellMapping,
    uv: Vec2,
    mode: ResampleMode,
) -> Result<[f32; CHANNEL_COUNT]> {
    match mode {
        ResampleMode::Nearest => {
            let p = uv.round().clamp(Vec2::ZERO, cells.max_index()).as_uvec2();
            fetch(source, cells, p)
        }
        ResampleMode::Bilinear => {
            let base = uv.floor().clamp(Vec2::ZERO, cells.max_index());
            let p0 = base.as_uvec2();
            let p1 = (p0 + UVec2::ONE).min(cells.source - UVec2::ONE);
            // Zero weight along an axis whose neighbour was clamped onto p0.
            let frac = (uv - base).clamp(Vec2::ZERO, Vec2::ONE);
            let t = Vec2::select(p1.cmpgt(p0), frac, Vec2::ZERO);

            let s00 = fetch(source, cells, p0)?;
            let s10 = fetch(source, cells, uvec2(p1.x, p0.y))?;
            let s01 = fetch(source, cells, uvec2(p0.x, p1.y))?;
            let s11 = fetch(source, cells, p1)?;

            let mut out = [0.0; CHANNEL_COUNT];
            for c in 0..CHANNEL_COUNT {
                let top = s00[c] * (1.0 - t.x) + s10[c] * t.x;
                let bottom = s01[c] * (1.0 - t.x) + s11[c] * t.x;
                out[c] = top * (1.0 - t.y) + bottom * t.y;
            }
            Ok(out)
        }
    }
}

/// Reads one pixel, rejecting coordinates outside the source and
/// sanitizing channel values into `0.0..=1.0`.
#[inline]
fn fetch<S: PixelSource + ?Sized>(
    source: &S,
    cells: &CellMapping,
    p: UVec2,
) -> Result<[f32; CHANNEL_COUNT]> {
    if p.x >= cells.source.x || p.y >= cells.source.y {
        return Err(SplatmapError::SampleOutOfRange {
            x: p.x,
            y: p.y,
            width: cells.source.x,
            height: cells.source.y,
        });
    }
    Ok(source.pixel(p.x, p.y).map(sanitize))
}

#[inline]
fn sanitize(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
