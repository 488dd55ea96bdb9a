use thiserror::Error;

use crate::skeleton::BoneIndex;

/// Errors raised while building skeletons, clips, libraries and sequencers.
///
/// Only construction can fail. Per-tick operations (`update`, `transition_to`,
/// weight setters) degrade to no-ops instead of returning errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A skeleton must contain at least one bone
    #[error("Skeleton has no bones")]
    EmptySkeleton,

    /// The skeleton has more bones than the configured output capacity
    #[error("Skeleton has {bones} bones, exceeding the capacity of {capacity}")]
    BoneCapacityExceeded { bones: usize, capacity: usize },

    /// A bone refers to a parent that does not come before it
    #[error("Bone {bone} has parent index {parent}, parents must precede their children")]
    ParentOrder { bone: usize, parent: BoneIndex },

    /// A clip must contain at least one sample
    #[error("Animation clip '{0}' has no frames")]
    EmptyClip(String),

    /// Sample rate must be a positive, finite number
    #[error("Animation clip '{clip}' has invalid sample rate {rate}")]
    InvalidSampleRate { clip: String, rate: f32 },

    /// A frame does not carry exactly one entry per skeleton bone
    #[error("Animation clip '{clip}' frame {frame} has {actual} bone entries, expected {expected}")]
    FrameBoneCount {
        clip: String,
        frame: usize,
        expected: usize,
        actual: usize,
    },

    /// No clip with this name exists in the library
    #[error("Unknown animation clip '{0}'")]
    UnknownClip(String),

    /// A channel with this name was already registered
    #[error("Channel '{0}' is already registered")]
    DuplicateChannel(String),
}

/// Result type using the crate's Error
pub type Result<T> = std::result::Result<T, Error>;
