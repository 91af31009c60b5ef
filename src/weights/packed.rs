//! 8-bit quantization of weight cells.

/// Four layer weights quantized to `u8`.
///
/// Quantizing a normalized cell keeps the total at exactly 255 so a shader
/// blending with `weight / 255.0` sees weights that still sum to 1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PackedWeights(pub [u8; 4]);

impl PackedWeights {
    /// Quantizes up to four weights in `0.0..=1.0`; missing slots are zero.
    ///
    /// With `normalized` set and a non-zero cell, the last non-zero slot
    /// absorbs the rounding error so the bytes sum to 255. Otherwise each
    /// weight is rounded on its own.
    ///
    /// # Example
    /// ```
    /// use bevy_splatmap::weights::PackedWeights;
    ///
    /// let packed = PackedWeights::quantize(&[1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0, 0.0], true);
    /// assert_eq!(packed.0, [85, 85, 85, 0]);
    /// assert_eq!(packed.sum(), 255);
    /// ```
    pub fn quantize(weights: &[f32], normalized: bool) -> Self {
        let mut bytes = [0u8; 4];
        for (b, &w) in bytes.iter_mut().zip(weights) {
            *b = (w.clamp(0.0, 1.0) * 255.0).round() as u8;
        }

        if normalized {
            if let Some(last) = bytes.iter().rposition(|&b| b > 0) {
                let others: u16 = bytes[..last].iter().map(|&b| b as u16).sum();
                bytes[last] = 255u16.saturating_sub(others) as u8;
                // Rounding up earlier slots can overshoot 255.
                let mut excess = others.saturating_sub(255);
                for b in bytes[..last].iter_mut().rev() {
                    let take = excess.min(*b as u16);
                    *b -= take as u8;
                    excess -= take;
                }
            }
        }

        Self(bytes)
    }

    #[inline]
    pub fn sum(&self) -> u16 {
        self.0.iter().map(|&b| b as u16).sum()
    }

    /// Packs into a `u32`, slot 0 in the lowest byte.
    #[inline]
    pub const fn pack(&self) -> u32 {
        u32::from_le_bytes(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_layer() {
        let packed = PackedWeights::quantize(&[1.0, 0.0, 0.0, 0.0], true);
        assert_eq!(packed.0, [255, 0, 0, 0]);
    }

    #[test]
    fn test_normalized_sums_to_255() {
        for weights in [
            [0.5, 0.5, 0.0, 0.0],
            [0.1, 0.2, 0.3, 0.4],
            [0.25, 0.25, 0.25, 0.25],
            [0.002, 0.998, 0.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ] {
            let packed = PackedWeights::quantize(&weights, true);
            assert_eq!(packed.sum(), 255, "{weights:?} -> {:?}", packed.0);
        }
    }

    #[test]
    fn test_zero_cell_stays_zero() {
        assert_eq!(PackedWeights::quantize(&[0.0; 4], true).0, [0; 4]);
    }

    #[test]
    fn test_unnormalized_rounds_independently() {
        let packed = PackedWeights::quantize(&[1.0, 1.0, 0.5, 0.0], false);
        assert_eq!(packed.0, [255, 255, 128, 0]);
    }

    #[test]
    fn test_pack() {
        let packed = PackedWeights([100, 50, 75, 30]);
        assert_eq!(packed.pack(), 100 | (50 << 8) | (75 << 16) | (30 << 24));
    }
}
