//! Per-cell material weight grids.
//!
//! A [`WeightGrid`] is what a terrain renderer consumes: a dense, row-major
//! array of `width * height * layer_count` weights indexed as
//! `(y * width + x) * layer_count + layer`.

mod packed;
mod texture;

pub use packed::PackedWeights;

/// Dense per-cell blend weights for a set of material layers.
///
/// # Example
///
/// ```
/// use bevy_splatmap::prelude::*;
///
/// let splatmap = Splatmap::filled(2, 2, [1.0, 0.0, 0.0, 0.0]).unwrap();
/// let grid = SplatmapConverter::new(ConversionSettings::new(2, 2))
///     .unwrap()
///     .convert(&splatmap)
///     .unwrap();
///
/// assert_eq!(grid.index(1, 1, 2), 14);
/// assert_eq!(grid.get(1, 1, 0), 1.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct WeightGrid {
    width: u32,
    height: u32,
    layers: Vec<String>,
    normalized: bool,
    data: Vec<f32>,
}

impl WeightGrid {
    /// `data.len()` must be `width * height * layers.len()`.
    pub(crate) fn from_raw(
        width: u32,
        height: u32,
        layers: Vec<String>,
        normalized: bool,
        data: Vec<f32>,
    ) -> Self {
        debug_assert_eq!(
            data.len(),
            width as usize * height as usize * layers.len(),
            "Weight data does not match grid size"
        );
        Self {
            width,
            height,
            layers,
            normalized,
            data,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Layer names in layer-index order.
    pub fn layers(&self) -> &[String] {
        &self.layers
    }

    /// Whether each non-zero cell was rescaled to sum to 1.
    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    /// Flat index of `(x, y, layer)`.
    #[inline]
    pub fn index(&self, x: u32, y: u32, layer: usize) -> usize {
        (y as usize * self.width as usize + x as usize) * self.layer_count() + layer
    }

    /// # Panics
    /// Panics if the coordinate or layer is out of range.
    #[inline]
    pub fn get(&self, x: u32, y: u32, layer: usize) -> f32 {
        self.data[self.index(x, y, layer)]
    }

    /// All layer weights of one cell.
    ///
    /// # Panics
    /// Panics if the coordinate is out of range.
    #[inline]
    pub fn cell(&self, x: u32, y: u32) -> &[f32] {
        let start = self.index(x, y, 0);
        &self.data[start..start + self.layer_count()]
    }

    /// Iterates cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(self.layer_count())
    }

    /// One layer as a row-major `width * height` plane.
    pub fn layer_plane(&self, layer: usize) -> Option<Vec<f32>> {
        (layer < self.layer_count()).then(|| {
            self.data
                .iter()
                .skip(layer)
                .step_by(self.layer_count())
                .copied()
                .collect()
        })
    }

    /// Share of the grid covered by each layer: the mean weight per layer.
    pub fn coverage(&self) -> Vec<f32> {
        let mut totals = vec![0.0f64; self.layer_count()];
        for cell in self.cells() {
            for (total, w) in totals.iter_mut().zip(cell) {
                *total += *w as f64;
            }
        }
        let cells = (self.width as f64) * (self.height as f64);
        totals.into_iter().map(|t| (t / cells) as f32).collect()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Raw native-endian bytes of the weights, ready for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}
