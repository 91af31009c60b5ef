//! Error types for splatmap conversion.

use bevy::render::render_resource::TextureFormat;
use thiserror::Error;

use crate::mapping::Channel;

/// Errors that can occur when converting a splatmap into a weight grid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SplatmapError {
    #[error("Invalid {what} dimensions: {width}x{height}, both must be at least 1")]
    InvalidDimension {
        what: &'static str,
        width: u32,
        height: u32,
    },

    #[error("Invalid channel-layer mapping: {0}")]
    InvalidMapping(#[from] MappingError),

    #[error("No splatmap source was provided")]
    NullSource,

    #[error("Sample coordinate ({x}, {y}) is outside the {width}x{height} splatmap")]
    SampleOutOfRange {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("Splatmap image has unsupported format {found:?}")]
    UnsupportedFormat { found: TextureFormat },

    #[error("Splatmap image has no CPU-side pixel data")]
    MissingPixelData,

    #[error("Splatmap pixel data has {found} entries, expected {expected}")]
    PixelDataSize { expected: usize, found: usize },
}

/// Ways a [`ChannelLayerMapping`](crate::mapping::ChannelLayerMapping) can be malformed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("expected {expected} entries, got {found}")]
    WrongEntryCount { expected: usize, found: usize },

    #[error("channel {0:?} is mapped more than once")]
    DuplicateChannel(Channel),

    #[error("channel {0:?} is not mapped to any layer")]
    MissingChannel(Channel),

    #[error("layer '{0}' is mapped from more than one channel")]
    DuplicateLayer(String),

    #[error("layer at index {index} has an empty name")]
    EmptyLayerName { index: usize },
}

pub type Result<T, E = SplatmapError> = std::result::Result<T, E>;
