//! Skeletal animation playback: keyframe sampling, hierarchy composition,
//! weighted multi-clip blending and crossfading between named states.

pub mod animation;
pub mod config;
pub mod controller;
pub mod error;
pub mod instance;
pub mod math;
pub mod sequencer;
pub mod skeleton;
pub mod transform;

pub use animation::{AnimationClip, AnimationFrame, AnimationLibrary};
pub use config::{ChannelCfg, Config};
pub use controller::{Animator, PendingTransition, StateMachine};
pub use error::{Error, Result};
pub use instance::AnimationInstance;
pub use sequencer::{Channel, ChannelIndex, Sequencer};
pub use skeleton::{Bone, BoneIndex, Skeleton, ROOT_BONE_PARENT_INDEX};
pub use transform::Transform;
