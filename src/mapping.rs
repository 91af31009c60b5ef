//! Channel to material-layer mapping.

use bevy::prelude::*;

use crate::error::MappingError;

/// Number of channels in a splatmap pixel.
pub const CHANNEL_COUNT: usize = 4;

/// A single splatmap channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub enum Channel {
    R,
    G,
    B,
    A,
}

impl Channel {
    pub const ALL: [Channel; CHANNEL_COUNT] = [Channel::R, Channel::G, Channel::B, Channel::A];

    /// Position of this channel inside an `[r, g, b, a]` pixel.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Channel::R => 0,
            Channel::G => 1,
            Channel::B => 2,
            Channel::A => 3,
        }
    }

    #[inline]
    pub fn read(self, pixel: [f32; CHANNEL_COUNT]) -> f32 {
        pixel[self.index()]
    }
}

/// One entry of a mapping: the channel that feeds a named material layer.
#[derive(Clone, Debug, PartialEq, Eq, Reflect)]
pub struct ChannelLayer {
    pub channel: Channel,
    pub layer: String,
}

impl ChannelLayer {
    pub fn new(channel: Channel, layer: impl Into<String>) -> Self {
        Self {
            channel,
            layer: layer.into(),
        }
    }
}

/// Ordered association of splatmap channels to material layers.
///
/// The position of an entry is the layer index it occupies in the
/// resulting [`WeightGrid`](crate::weights::WeightGrid). A well-formed
/// mapping has exactly one entry per channel and unique, non-empty layer
/// names; see [`ChannelLayerMapping::validate`].
///
/// # Example
///
/// ```
/// use bevy_splatmap::mapping::{Channel, ChannelLayerMapping};
///
/// // Alpha carries the primary layer in this splatmap.
/// let mapping = ChannelLayerMapping::builder()
///     .map(Channel::A, "Sand")
///     .map(Channel::R, "Grass")
///     .map(Channel::G, "Rock")
///     .map(Channel::B, "Snow")
///     .build()
///     .unwrap();
///
/// assert_eq!(mapping.layer_of(Channel::A), Some(0));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Reflect)]
pub struct ChannelLayerMapping {
    entries: Vec<ChannelLayer>,
}

impl Default for ChannelLayerMapping {
    /// R = Grass, G = Rock, B = Snow, A = Custom.
    fn default() -> Self {
        Self {
            entries: vec![
                ChannelLayer::new(Channel::R, "Grass"),
                ChannelLayer::new(Channel::G, "Rock"),
                ChannelLayer::new(Channel::B, "Snow"),
                ChannelLayer::new(Channel::A, "Custom"),
            ],
        }
    }
}

impl ChannelLayerMapping {
    /// Wraps entries as-is. Use [`validate`](Self::validate) or the builder
    /// to check the mapping invariant.
    pub fn from_entries(entries: Vec<ChannelLayer>) -> Self {
        Self { entries }
    }

    pub fn builder() -> MappingBuilder {
        MappingBuilder::default()
    }

    pub fn entries(&self) -> &[ChannelLayer] {
        &self.entries
    }

    /// Number of material layers this mapping produces.
    pub fn layer_count(&self) -> usize {
        self.entries.len()
    }

    pub fn layer_names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.layer.clone()).collect()
    }

    /// Layer index fed by `channel`, if it is mapped.
    pub fn layer_of(&self, channel: Channel) -> Option<usize> {
        self.entries.iter().position(|e| e.channel == channel)
    }

    /// Layer index of the layer called `name`.
    pub fn layer_index(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.layer == name)
    }

    /// Checks that every channel appears exactly once and layer names are
    /// unique and non-empty.
    pub fn validate(&self) -> Result<(), MappingError> {
        if self.entries.len() != CHANNEL_COUNT {
            return Err(MappingError::WrongEntryCount {
                expected: CHANNEL_COUNT,
                found: self.entries.len(),
            });
        }

        let mut seen = [false; CHANNEL_COUNT];
        for (index, entry) in self.entries.iter().enumerate() {
            let slot = &mut seen[entry.channel.index()];
            if *slot {
                return Err(MappingError::DuplicateChannel(entry.channel));
            }
            *slot = true;

            if entry.layer.trim().is_empty() {
                return Err(MappingError::EmptyLayerName { index });
            }
            if self.entries[..index].iter().any(|e| e.layer == entry.layer) {
                return Err(MappingError::DuplicateLayer(entry.layer.clone()));
            }
        }

        if let Some(missing) = Channel::ALL.iter().find(|c| !seen[c.index()]) {
            return Err(MappingError::MissingChannel(*missing));
        }

        Ok(())
    }

    /// Source channel for each layer, in layer order.
    pub(crate) fn channels(&self) -> [Channel; CHANNEL_COUNT] {
        let mut channels = Channel::ALL;
        for (slot, entry) in channels.iter_mut().zip(&self.entries) {
            *slot = entry.channel;
        }
        channels
    }
}

/// Fluent construction of a [`ChannelLayerMapping`].
#[derive(Default)]
pub struct MappingBuilder {
    entries: Vec<ChannelLayer>,
}

impl MappingBuilder {
    /// Append a layer fed by `channel`. Layers are indexed in call order.
    pub fn map(mut self, channel: Channel, layer: impl Into<String>) -> Self {
        self.entries.push(ChannelLayer::new(channel, layer));
        self
    }

    pub fn build(self) -> Result<ChannelLayerMapping, MappingError> {
        let mapping = ChannelLayerMapping::from_entries(self.entries);
        mapping.validate()?;
        Ok(mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mapping() {
        let mapping = ChannelLayerMapping::default();
        assert!(mapping.validate().is_ok());
        assert_eq!(mapping.layer_names(), ["Grass", "Rock", "Snow", "Custom"]);
        assert_eq!(mapping.layer_of(Channel::B), Some(2));
        assert_eq!(mapping.layer_index("Custom"), Some(3));
        assert_eq!(mapping.channels(), Channel::ALL);
    }

    #[test]
    fn test_builder_reordered() {
        let mapping = ChannelLayerMapping::builder()
            .map(Channel::B, "Snow")
            .map(Channel::A, "Custom")
            .map(Channel::R, "Grass")
            .map(Channel::G, "Rock")
            .build()
            .unwrap();

        assert_eq!(
            mapping.channels(),
            [Channel::B, Channel::A, Channel::R, Channel::G]
        );
        assert_eq!(mapping.layer_of(Channel::R), Some(2));
    }

    #[test]
    fn test_wrong_entry_count() {
        let err = ChannelLayerMapping::builder()
            .map(Channel::R, "Grass")
            .map(Channel::G, "Rock")
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            MappingError::WrongEntryCount {
                expected: 4,
                found: 2
            }
        );
    }

    #[test]
    fn test_duplicate_channel() {
        let err = ChannelLayerMapping::builder()
            .map(Channel::R, "Grass")
            .map(Channel::R, "Rock")
            .map(Channel::B, "Snow")
            .map(Channel::A, "Custom")
            .build()
            .unwrap_err();
        assert_eq!(err, MappingError::DuplicateChannel(Channel::R));
    }

    #[test]
    fn test_duplicate_and_empty_layer() {
        let err = ChannelLayerMapping::builder()
            .map(Channel::R, "Grass")
            .map(Channel::G, "Grass")
            .map(Channel::B, "Snow")
            .map(Channel::A, "Custom")
            .build()
            .unwrap_err();
        assert_eq!(err, MappingError::DuplicateLayer("Grass".into()));

        let err = ChannelLayerMapping::builder()
            .map(Channel::R, "Grass")
            .map(Channel::G, " ")
            .map(Channel::B, "Snow")
            .map(Channel::A, "Custom")
            .build()
            .unwrap_err();
        assert_eq!(err, MappingError::EmptyLayerName { index: 1 });
    }

    #[test]
    fn test_channel_read() {
        let pixel = [0.1, 0.2, 0.3, 0.4];
        assert_eq!(Channel::G.read(pixel), 0.2);
        assert_eq!(Channel::A.read(pixel), 0.4);
    }
}
