//! Systems that turn splatmap images into terrain alphamaps.

use bevy::asset::LoadState;
use bevy::prelude::*;
use std::collections::HashSet;

use super::components::{ApplierSettings, SplatmapApplier, SplatmapFailed, TerrainAlphamap};
use crate::convert::SplatmapConverter;
use crate::error::{Result, SplatmapError};
use crate::splatmap::{PixelSource, Splatmap};
use crate::weights::WeightGrid;

/// System set for splatmap application systems.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SplatmapSystems;

/// Converts splatmaps for appliers that are new, changed, or whose image was
/// (re)loaded.
///
/// Appliers whose image is still loading stay pending and are retried on the
/// next run. An image that failed to load or was removed, or a uuid handle
/// that points at no asset, is reported as [`SplatmapError::NullSource`].
pub fn apply_splatmaps(
    mut commands: Commands,
    images: Res<Assets<Image>>,
    asset_server: Option<Res<AssetServer>>,
    mut events: MessageReader<AssetEvent<Image>>,
    mut pending: Local<HashSet<Entity>>,
    appliers: Query<(Entity, Ref<SplatmapApplier>)>,
) {
    let mut reloaded = HashSet::new();
    let mut removed = HashSet::new();
    for event in events.read() {
        match event {
            AssetEvent::Added { id } | AssetEvent::Modified { id } => {
                reloaded.insert(*id);
            }
            AssetEvent::Removed { id } => {
                removed.insert(*id);
            }
            _ => {}
        }
    }

    for (entity, applier) in &appliers {
        let id = applier.splatmap.id();
        if applier.is_changed() || reloaded.contains(&id) || removed.contains(&id) {
            pending.insert(entity);
        }
    }

    pending.retain(|&entity| {
        let Ok((_, applier)) = appliers.get(entity) else {
            // Despawned or applier removed.
            return false;
        };

        let id = applier.splatmap.id();
        let result = match images.get(id) {
            Some(image) => convert_image(image, &applier.settings),
            None => {
                let failed = matches!(
                    asset_server
                        .as_ref()
                        .and_then(|server| server.get_load_state(id)),
                    Some(LoadState::Failed(_))
                );
                // A strong handle with no asset yet may still be loaded or
                // inserted later.
                let strong = matches!(applier.splatmap, Handle::Strong(_));
                if failed || removed.contains(&id) || !strong {
                    Err(SplatmapError::NullSource)
                } else {
                    return true;
                }
            }
        };

        match result {
            Ok(grid) => {
                info!(
                    "Applied {}x{} splatmap weights ({} layers) to {:?}",
                    grid.width(),
                    grid.height(),
                    grid.layer_count(),
                    entity
                );
                #[cfg(feature = "debug_viz")]
                log_coverage(entity, &grid);
                commands
                    .entity(entity)
                    .remove::<SplatmapFailed>()
                    .insert(TerrainAlphamap(grid));
            }
            Err(err) => {
                error!("Splatmap conversion failed for {:?}: {}", entity, err);
                commands
                    .entity(entity)
                    .remove::<TerrainAlphamap>()
                    .insert(SplatmapFailed(err));
            }
        }
        false
    });
}

/// Snapshots `image` and converts it with `settings`.
pub fn convert_image(image: &Image, settings: &ApplierSettings) -> Result<WeightGrid> {
    let splatmap = Splatmap::from_image(image)?;
    let size = uvec2(splatmap.width(), splatmap.height());
    SplatmapConverter::new(settings.for_source(size))?.convert(&splatmap)
}

#[cfg(feature = "debug_viz")]
fn log_coverage(entity: Entity, grid: &WeightGrid) {
    for (name, share) in grid.layers().iter().zip(grid.coverage()) {
        info!("  {:?} {}: {:.1}%", entity, name, share * 100.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::asset::RenderAssetUsages;
    use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

    fn splatmap_image() -> Image {
        Image::new(
            Extent3d {
                width: 2,
                height: 2,
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            vec![
                255, 0, 0, 0, //
                0, 255, 0, 0, //
                0, 0, 255, 0, //
                0, 0, 0, 255,
            ],
            TextureFormat::Rgba8Unorm,
            RenderAssetUsages::MAIN_WORLD,
        )
    }

    #[test]
    fn test_convert_image_same_resolution() {
        let grid = convert_image(&splatmap_image(), &ApplierSettings::default()).unwrap();
        assert_eq!((grid.width(), grid.height()), (2, 2));
        assert_eq!(grid.cell(1, 0), &[0.0, 1.0, 0.0, 0.0]);
        assert_eq!(grid.cell(1, 1), &[0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_convert_image_invalid_resolution() {
        let settings = ApplierSettings::default().with_resolution(0, 4);
        assert!(matches!(
            convert_image(&splatmap_image(), &settings),
            Err(SplatmapError::InvalidDimension { what: "target", .. })
        ));
    }

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Image>()
            .add_plugins(crate::SplatmapPlugin);
        app
    }

    #[test]
    fn test_plugin_attaches_alphamap() {
        let mut app = app();
        let handle = app
            .world_mut()
            .resource_mut::<Assets<Image>>()
            .add(splatmap_image());
        let entity = app
            .world_mut()
            .spawn(SplatmapApplier::new(handle).with_settings(
                ApplierSettings::default()
                    .with_resolution(4, 4)
                    .with_normalize(true),
            ))
            .id();

        app.update();

        let alphamap = app
            .world()
            .get::<TerrainAlphamap>(entity)
            .expect("alphamap attached");
        assert_eq!((alphamap.width(), alphamap.height()), (4, 4));
        assert!(alphamap.is_normalized());
        assert!(app.world().get::<SplatmapFailed>(entity).is_none());
    }

    #[test]
    fn test_plugin_reports_failure() {
        let mut app = app();
        let handle = app
            .world_mut()
            .resource_mut::<Assets<Image>>()
            .add(splatmap_image());
        let entity = app
            .world_mut()
            .spawn(
                SplatmapApplier::new(handle)
                    .with_settings(ApplierSettings::default().with_resolution(0, 10)),
            )
            .id();

        app.update();

        let failed = app.world().get::<SplatmapFailed>(entity).expect("failure");
        assert!(matches!(**failed, SplatmapError::InvalidDimension { .. }));
        assert!(app.world().get::<TerrainAlphamap>(entity).is_none());
    }

    #[test]
    fn test_plugin_missing_image_is_null_source() {
        let mut app = app();
        let entity = app
            .world_mut()
            .spawn(SplatmapApplier::new(Handle::default()))
            .id();

        app.update();

        let failed = app.world().get::<SplatmapFailed>(entity).expect("failure");
        assert_eq!(failed.0, SplatmapError::NullSource);
    }

    #[test]
    fn test_plugin_reapplies_on_change() {
        let mut app = app();
        let handle = app
            .world_mut()
            .resource_mut::<Assets<Image>>()
            .add(splatmap_image());
        let entity = app.world_mut().spawn(SplatmapApplier::new(handle)).id();
        app.update();
        assert_eq!(app.world().get::<TerrainAlphamap>(entity).unwrap().width(), 2);

        app.world_mut()
            .get_mut::<SplatmapApplier>(entity)
            .unwrap()
            .settings = ApplierSettings::default().with_resolution(8, 8);
        app.update();
        assert_eq!(app.world().get::<TerrainAlphamap>(entity).unwrap().width(), 8);
    }

    #[test]
    fn test_plugin_waits_for_reserved_image() {
        let mut app = app();
        let handle = app
            .world()
            .resource::<Assets<Image>>()
            .reserve_handle();
        let entity = app
            .world_mut()
            .spawn(SplatmapApplier::new(handle.clone()))
            .id();

        app.update();
        app.update();
        assert!(app.world().get::<SplatmapFailed>(entity).is_none());
        assert!(app.world().get::<TerrainAlphamap>(entity).is_none());

        let _ = app
            .world_mut()
            .resource_mut::<Assets<Image>>()
            .insert(handle.id(), splatmap_image());
        app.update();

        assert!(app.world().get::<SplatmapFailed>(entity).is_none());
        let alphamap = app
            .world()
            .get::<TerrainAlphamap>(entity)
            .expect("alphamap attached");
        assert_eq!(alphamap.cell(0, 0), &[1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_plugin_reapplies_on_image_modified() {
        let mut app = app();
        let handle = app
            .world_mut()
            .resource_mut::<Assets<Image>>()
            .add(splatmap_image());
        let entity = app
            .world_mut()
            .spawn(SplatmapApplier::new(handle.clone()))
            .id();
        app.update();
        assert_eq!(
            app.world().get::<TerrainAlphamap>(entity).unwrap().cell(0, 0),
            &[1.0, 0.0, 0.0, 0.0]
        );

        let mut repainted = splatmap_image();
        repainted.data = Some(vec![0, 0, 255, 0].repeat(4));
        let _ = app
            .world_mut()
            .resource_mut::<Assets<Image>>()
            .insert(handle.id(), repainted);
        app.update();
        app.update();

        let alphamap = app.world().get::<TerrainAlphamap>(entity).unwrap();
        assert_eq!(alphamap.cell(0, 0), &[0.0, 0.0, 1.0, 0.0]);
        assert_eq!(alphamap.cell(1, 1), &[0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_plugin_reports_removed_image() {
        let mut app = app();
        let handle = app
            .world_mut()
            .resource_mut::<Assets<Image>>()
            .add(splatmap_image());
        let entity = app
            .world_mut()
            .spawn(SplatmapApplier::new(handle.clone()))
            .id();
        app.update();
        assert!(app.world().get::<TerrainAlphamap>(entity).is_some());

        app.world_mut()
            .resource_mut::<Assets<Image>>()
            .remove(handle.id());
        app.update();
        app.update();

        let failed = app.world().get::<SplatmapFailed>(entity).expect("failure");
        assert_eq!(failed.0, SplatmapError::NullSource);
        assert!(app.world().get::<TerrainAlphamap>(entity).is_none());
    }
}
