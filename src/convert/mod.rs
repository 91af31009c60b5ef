//! Splatmap to weight grid conversion.
//!
//! Each target cell `(x, y)` is mapped to the continuous splatmap coordinate
//! `(x * source_w / target_w, y * source_h / target_h)`, sampled with the
//! selected [`ResampleMode`], routed to layers through a
//! [`ChannelLayerMapping`], and optionally normalized so the cell's weights
//! sum to 1.
//!
//! # Example
//!
//! ```
//! use bevy_splatmap::prelude::*;
//!
//! let splatmap = Splatmap::filled(16, 16, [0.2, 0.2, 0.0, 0.0]).unwrap();
//!
//! let converter = SplatmapConverter::new(
//!     ConversionSettings::new(32, 32)
//!         .with_resample_mode(ResampleMode::Bilinear)
//!         .with_normalize(true),
//! )
//! .unwrap();
//!
//! let grid = converter.convert(&splatmap).unwrap();
//! assert_eq!(grid.cell(10, 10), &[0.5, 0.5, 0.0, 0.0]);
//! ```

mod sample;

use bevy::prelude::*;

use crate::error::{Result, SplatmapError};
use crate::mapping::{CHANNEL_COUNT, Channel, ChannelLayerMapping};
use crate::splatmap::PixelSource;
use crate::weights::WeightGrid;
use sample::CellMapping;

/// How a target cell's splatmap coordinate is turned into pixel values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Reflect)]
pub enum ResampleMode {
    /// Round to the nearest pixel, clamped to the image.
    #[default]
    Nearest,
    /// Interpolate the four surrounding pixels per channel.
    Bilinear,
}

/// Parameters for a single conversion.
#[derive(Clone, Debug, PartialEq, Reflect)]
pub struct ConversionSettings {
    /// Channel to layer routing. Default: R = Grass, G = Rock, B = Snow, A = Custom.
    pub mapping: ChannelLayerMapping,

    /// Width of the produced weight grid, in cells.
    pub target_width: u32,

    /// Height of the produced weight grid, in cells.
    pub target_height: u32,

    /// Default: [`ResampleMode::Nearest`]
    pub resample_mode: ResampleMode,

    /// Rescale each cell so its weights sum to 1. All-zero cells stay zero.
    ///
    /// Default: `false`
    pub normalize: bool,
}

impl ConversionSettings {
    /// Settings for a `target_width x target_height` grid with the default
    /// mapping, nearest sampling and no normalization.
    pub fn new(target_width: u32, target_height: u32) -> Self {
        Self {
            mapping: ChannelLayerMapping::default(),
            target_width,
            target_height,
            resample_mode: ResampleMode::default(),
            normalize: false,
        }
    }

    pub fn with_mapping(mut self, mapping: ChannelLayerMapping) -> Self {
        self.mapping = mapping;
        self
    }

    pub fn with_resample_mode(mut self, mode: ResampleMode) -> Self {
        self.resample_mode = mode;
        self
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Checks the target size and the mapping invariant.
    pub fn validate(&self) -> Result<()> {
        if self.target_width == 0 || self.target_height == 0 {
            return Err(SplatmapError::InvalidDimension {
                what: "target",
                width: self.target_width,
                height: self.target_height,
            });
        }
        self.mapping.validate()?;
        Ok(())
    }
}

/// A validated, reusable converter.
///
/// Holds no state between calls: every [`convert`](Self::convert) allocates
/// and returns a fresh [`WeightGrid`].
#[derive(Clone, Debug)]
pub struct SplatmapConverter {
    settings: ConversionSettings,
    channels: [Channel; CHANNEL_COUNT],
}

impl SplatmapConverter {
    pub fn new(settings: ConversionSettings) -> Result<Self> {
        settings.validate()?;
        let channels = settings.mapping.channels();
        Ok(Self { settings, channels })
    }

    pub fn settings(&self) -> &ConversionSettings {
        &self.settings
    }

    /// Converts `source` into a weight grid of the configured size.
    pub fn convert<S: PixelSource + ?Sized>(&self, source: &S) -> Result<WeightGrid> {
        let source_size = uvec2(source.width(), source.height());
        if source_size.cmpeq(UVec2::ZERO).any() {
            return Err(SplatmapError::InvalidDimension {
                what: "splatmap",
                width: source_size.x,
                height: source_size.y,
            });
        }

        let settings = &self.settings;
        let target = uvec2(settings.target_width, settings.target_height);
        debug!(
            "Converting {}x{} splatmap to {}x{} weight grid ({:?}, normalize: {})",
            source_size.x,
            source_size.y,
            target.x,
            target.y,
            settings.resample_mode,
            settings.normalize
        );

        let cells = CellMapping::new(source_size, target);
        let row_len = target.x as usize * CHANNEL_COUNT;
        let mut data = vec![0.0f32; row_len * target.y as usize];

        let fill_row = |(y, row): (usize, &mut [f32])| self.fill_row(source, &cells, y as u32, row);

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            data.par_chunks_mut(row_len).enumerate().try_for_each(fill_row)?;
        }
        #[cfg(not(feature = "parallel"))]
        {
            data.chunks_mut(row_len).enumerate().try_for_each(fill_row)?;
        }

        Ok(WeightGrid::from_raw(
            target.x,
            target.y,
            settings.mapping.layer_names(),
            settings.normalize,
            data,
        ))
    }

    /// Writes target row `y` into `row`, one `CHANNEL_COUNT` chunk per cell.
    fn fill_row<S: PixelSource + ?Sized>(
        &self,
        source: &S,
        cells: &CellMapping,
        y: u32,
        row: &mut [f32],
    ) -> Result<()> {
        let settings = &self.settings;
        for (x, cell) in row.chunks_exact_mut(CHANNEL_COUNT).enumerate() {
            let uv = cells.to_source(x as u32, y);
            let pixel = sample::sample(source, cells, uv, settings.resample_mode)?;
            for (weight, channel) in cell.iter_mut().zip(self.channels) {
                *weight = channel.read(pixel);
            }
            if settings.normalize {
                normalize_cell(cell);
            }
        }
        Ok(())
    }
}

/// Converts `splatmap` into a `target_width x target_height` weight grid.
///
/// `None` stands for an absent splatmap and fails with
/// [`SplatmapError::NullSource`]. The conversion is all-or-nothing: on any
/// error no grid is produced.
pub fn convert<S: PixelSource + ?Sized>(
    splatmap: Option<&S>,
    mapping: &ChannelLayerMapping,
    target_width: u32,
    target_height: u32,
    resample_mode: ResampleMode,
    normalize: bool,
) -> Result<WeightGrid> {
    let source = splatmap.ok_or(SplatmapError::NullSource)?;
    let settings = ConversionSettings::new(target_width, target_height)
        .with_mapping(mapping.clone())
        .with_resample_mode(resample_mode)
        .with_normalize(normalize);
    SplatmapConverter::new(settings)?.convert(source)
}

/// Divides each weight by the cell sum, leaving all-zero cells untouched.
#[inline]
pub(crate) fn normalize_cell(cell: &mut [f32]) {
    let sum: f32 = cell.iter().sum();
    if sum > 0.0 {
        for w in cell.iter_mut() {
            *w /= sum;
        }
    }
}
