//! # bevy_splatmap
//!
//! Converts painted RGBA splatmaps into per-cell material weight grids
//! ("alphamaps") for heightfield terrain.
//!
//! ## Features
//!
//! - Channel to material-layer mapping (default R = Grass, G = Rock,
//!   B = Snow, A = Custom)
//! - Resampling to any grid resolution with nearest or bilinear filtering
//! - Optional per-cell weight normalization
//! - Row-parallel conversion (`parallel` feature)
//! - Packing weight grids into RGBA8 splat textures
//! - A Bevy plugin that converts splatmap images attached to terrain entities
//!
//! ## Quick Start
//!
//! ```
//! use bevy_splatmap::prelude::*;
//!
//! let splatmap = Splatmap::new(
//!     2,
//!     2,
//!     vec![
//!         [1.0, 0.0, 0.0, 0.0],
//!         [0.0, 1.0, 0.0, 0.0],
//!         [0.0, 0.0, 1.0, 0.0],
//!         [0.0, 0.0, 0.0, 1.0],
//!     ],
//! )
//! .unwrap();
//!
//! let grid = convert(
//!     Some(&splatmap),
//!     &ChannelLayerMapping::default(),
//!     2,
//!     2,
//!     ResampleMode::Nearest,
//!     false,
//! )
//! .unwrap();
//!
//! assert_eq!(grid.cell(1, 0), &[0.0, 1.0, 0.0, 0.0]);
//! ```
//!
//! ## With Bevy
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_splatmap::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(SplatmapPlugin)
//!         .add_systems(Startup, setup)
//!         .add_systems(Update, upload_alphamaps)
//!         .run();
//! }
//!
//! fn setup(mut commands: Commands, asset_server: Res<AssetServer>) {
//!     commands.spawn(
//!         SplatmapApplier::new(asset_server.load("terrain/splatmap.png")).with_settings(
//!             ApplierSettings::default()
//!                 .with_resolution(512, 512)
//!                 .with_resample_mode(ResampleMode::Bilinear)
//!                 .with_normalize(true),
//!         ),
//!     );
//! }
//!
//! fn upload_alphamaps(query: Query<&TerrainAlphamap, Added<TerrainAlphamap>>) {
//!     for alphamap in &query {
//!         // Hand `alphamap.as_slice()` or `alphamap.to_images()` to the terrain.
//!     }
//! }
//! ```

pub mod applier;
pub mod convert;
pub mod error;
pub mod mapping;
mod plugin;
pub mod splatmap;
pub mod weights;

pub use plugin::SplatmapPlugin;

pub mod prelude {
    pub use crate::applier::{ApplierSettings, SplatmapApplier, SplatmapFailed, TerrainAlphamap};
    pub use crate::convert::{ConversionSettings, ResampleMode, SplatmapConverter, convert};
    pub use crate::error::{MappingError, SplatmapError};
    pub use crate::mapping::{Channel, ChannelLayer, ChannelLayerMapping};
    pub use crate::plugin::SplatmapPlugin;
    pub use crate::splatmap::{PixelSource, Splatmap};
    pub use crate::weights::{PackedWeights, WeightGrid};
}
