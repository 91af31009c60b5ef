//! Minimal example converting a procedural splatmap into terrain weights.
//!
//! A 64x64 splatmap is painted in code (grass in the lowlands, rock on a
//! diagonal ridge, snow in one corner), handed to a `SplatmapApplier`, and the
//! resulting alphamap is packed into a splat texture and shown as a sprite.

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy_splatmap::prelude::*;

const SIZE: u32 = 64;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(SplatmapPlugin)
        .add_systems(Startup, setup)
        .add_systems(Update, show_alphamap.after(bevy_splatmap::applier::SplatmapSystems))
        .run();
}

/// Paints one RGBA8 texel per position.
fn paint(x: u32, y: u32) -> [u8; 4] {
    let ridge = (x as i32 - y as i32).unsigned_abs() < 6;
    let corner = x > 48 && y < 16;
    match (corner, ridge) {
        (true, _) => [0, 40, 215, 0],
        (false, true) => [60, 195, 0, 0],
        (false, false) => [255, 0, 0, 0],
    }
}

fn setup(mut commands: Commands, mut images: ResMut<Assets<Image>>) {
    let mut data = Vec::with_capacity((SIZE * SIZE * 4) as usize);
    for y in 0..SIZE {
        for x in 0..SIZE {
            data.extend_from_slice(&paint(x, y));
        }
    }

    let splatmap = images.add(Image::new(
        Extent3d {
            width: SIZE,
            height: SIZE,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8Unorm,
        RenderAssetUsages::MAIN_WORLD,
    ));

    // Upsample to a 129x129 heightfield-style grid
    commands.spawn(
        SplatmapApplier::new(splatmap).with_settings(
            ApplierSettings::default()
                .with_resolution(129, 129)
                .with_resample_mode(ResampleMode::Bilinear)
                .with_normalize(true),
        ),
    );

    commands.spawn(Camera2d);
}

fn show_alphamap(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    added: Query<(Entity, &TerrainAlphamap), Added<TerrainAlphamap>>,
    failed: Query<&SplatmapFailed, Added<SplatmapFailed>>,
) {
    for (entity, alphamap) in &added {
        for (name, share) in alphamap.layers().iter().zip(alphamap.coverage()) {
            info!("{name}: {:.1}%", share * 100.0);
        }

        let Some(mut splat) = alphamap.to_images().into_iter().next() else {
            continue;
        };
        // Alpha holds the unused Custom layer; show the texture opaque.
        if let Some(data) = splat.data.as_mut() {
            for texel in data.chunks_exact_mut(4) {
                texel[3] = 255;
            }
        }
        commands.entity(entity).insert((
            Sprite {
                image: images.add(splat),
                custom_size: Some(Vec2::splat(512.0)),
                ..default()
            },
            Transform::default(),
        ));
    }

    for err in &failed {
        error!("Splatmap not applied: {}", **err);
    }
}
