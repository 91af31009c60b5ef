//! Components for applying splatmaps to terrain entities.

use bevy::prelude::*;

use crate::convert::{ConversionSettings, ResampleMode};
use crate::error::SplatmapError;
use crate::mapping::ChannelLayerMapping;
use crate::weights::WeightGrid;

/// Conversion settings carried by a [`SplatmapApplier`].
///
/// Unlike [`ConversionSettings`], the target resolution is optional: `None`
/// produces a grid with the splatmap's own resolution.
#[derive(Clone, Debug, Default, PartialEq, Reflect)]
pub struct ApplierSettings {
    pub mapping: ChannelLayerMapping,

    /// Weight grid size in cells. Default: the splatmap's size.
    pub resolution: Option<UVec2>,

    /// Default: [`ResampleMode::Nearest`]
    pub resample_mode: ResampleMode,

    /// Default: `false`
    pub normalize: bool,
}

impl ApplierSettings {
    pub fn with_mapping(mut self, mapping: ChannelLayerMapping) -> Self {
        self.mapping = mapping;
        self
    }

    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.resolution = Some(uvec2(width, height));
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

    /// Resolves into [`ConversionSettings`] for a splatmap of `source` size.
    pub fn for_source(&self, source: UVec2) -> ConversionSettings {
        let target = self.resolution.unwrap_or(source);
        ConversionSettings::new(target.x, target.y)
            .with_mapping(self.mapping.clone())
            .with_resample_mode(self.resample_mode)
            .with_normalize(self.normalize)
    }
}

/// Requests that a splatmap image be converted into this entity's alphamap.
///
/// Once the image is loaded, [`apply_splatmaps`](super::apply_splatmaps)
/// inserts either a [`TerrainAlphamap`] or a [`SplatmapFailed`]. The
/// conversion is redone whenever this component changes or the image asset
/// is modified.
///
/// # Example
/// ```ignore
/// commands.spawn((
///     terrain_bundle,
///     SplatmapApplier::new(asset_server.load("terrain/splatmap.png"))
///         .with_settings(ApplierSettings::default().with_resolution(513, 513)),
/// ));
/// ```
#[derive(Component, Clone, Debug, Default)]
pub struct SplatmapApplier {
    pub splatmap: Handle<Image>,
    pub settings: ApplierSettings,
}

impl SplatmapApplier {
    pub fn new(splatmap: Handle<Image>) -> Self {
        Self {
            splatmap,
            settings: ApplierSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: ApplierSettings) -> Self {
        self.settings = settings;
        self
    }
}

/// The converted weight grid for a terrain entity.
#[derive(Component, Clone, Debug, Deref)]
pub struct TerrainAlphamap(pub WeightGrid);

/// The last conversion for this entity failed; terrain setup should not
/// proceed with stale or empty weights.
#[derive(Component, Clone, Debug, Deref)]
pub struct SplatmapFailed(pub SplatmapError);
