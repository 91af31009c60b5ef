//! Bevy integration: converting splatmap images attached to terrain entities.
//!
//! Add a [`SplatmapApplier`] to an entity; once its image is loaded, the
//! [`SplatmapPlugin`](crate::SplatmapPlugin) attaches the resulting
//! [`TerrainAlphamap`], which the host terrain code uploads or stores in its
//! own alphamap structure.

mod components;
mod systems;

pub use components::{ApplierSettings, SplatmapApplier, SplatmapFailed, TerrainAlphamap};
pub use systems::{SplatmapSystems, apply_splatmaps, convert_image};
