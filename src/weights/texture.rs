//! Packing weight grids into GPU splat textures.

use bevy::asset::RenderAssetUsages;
use bevy::image::{Image, ImageAddressMode, ImageSampler, ImageSamplerDescriptor};
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

use super::{PackedWeights, WeightGrid};

/// Layers stored per RGBA texture.
pub const LAYERS_PER_TEXTURE: usize = 4;

impl WeightGrid {
    /// Packs the grid into `Rgba8Unorm` splat textures, four layers each.
    ///
    /// Layers 0..4 go into the first image's R, G, B, A channels, layers
    /// 4..8 into the second, and so on. Normalized grids are quantized so each
    /// texel's channels sum to 255 when all layers fit in one image. Images use
    /// clamp-to-edge sampling.
    pub fn to_images(&self) -> Vec<Image> {
        let texels = self.width as usize * self.height as usize;
        // A partial slice of a normalized cell does not sum to 1 on its own.
        let exact_sum = self.normalized && self.layer_count() <= LAYERS_PER_TEXTURE;
        let mut images = Vec::with_capacity(self.layer_count().div_ceil(LAYERS_PER_TEXTURE));

        for first in (0..self.layer_count()).step_by(LAYERS_PER_TEXTURE) {
            let last = (first + LAYERS_PER_TEXTURE).min(self.layer_count());
            let mut raw = Vec::with_capacity(texels * LAYERS_PER_TEXTURE);
            for cell in self.cells() {
                let packed = PackedWeights::quantize(&cell[first..last], exact_sum);
                raw.extend_from_slice(&packed.0);
            }
            images.push(splat_image(self.width, self.height, raw));
        }

        images
    }
}

fn splat_image(width: u32, height: u32, raw: Vec<u8>) -> Image {
    let mut image = Image::new(
        Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        raw,
        TextureFormat::Rgba8Unorm,
        RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
    );

    image.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
        address_mode_u: ImageAddressMode::ClampToEdge,
        address_mode_v: ImageAddressMode::ClampToEdge,
        ..default()
    });

    image
}
