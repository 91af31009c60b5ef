//! Plugin for splatmap application.
use bevy::prelude::*;

use crate::applier::{ApplierSettings, SplatmapSystems, apply_splatmaps};
use crate::convert::{ConversionSettings, ResampleMode};
use crate::mapping::{Channel, ChannelLayer, ChannelLayerMapping};

/// Plugin that converts splatmaps attached to terrain entities.
///
/// This plugin registers:
/// - [`apply_splatmaps`] in `Update`, inside [`SplatmapSystems`]
/// - Reflection for the conversion settings types
///
/// # Example
/// ```ignore
/// use bevy::prelude::*;
/// use bevy_splatmap::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(SplatmapPlugin)
///     .run();
/// ```
pub struct SplatmapPlugin;

impl Plugin for SplatmapPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Channel>()
            .register_type::<ChannelLayer>()
            .register_type::<ChannelLayerMapping>()
            .register_type::<ResampleMode>()
            .register_type::<ConversionSettings>()
            .register_type::<ApplierSettings>()
            .add_systems(Update, apply_splatmaps.in_set(SplatmapSystems));
    }
}
