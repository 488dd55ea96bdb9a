//! Construction-time settings for instances, sequencers and state machines.

use serde::{Deserialize, Serialize};

/// Sizing limits shared by every animated character.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Largest skeleton accepted by an instance or sequencer.
    /// Bigger rigs are rejected at construction rather than truncated.
    pub max_bones: usize,

    /// Depth of the state machine's pending transition queue.
    pub max_pending_transitions: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_bones: 256,
            max_pending_transitions: 4,
        }
    }
}

/// Settings for a single sequencer channel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelCfg {
    /// Blend weight, relative to the sum of all channel weights
    pub weight: f32,
    /// Sequencer playhead time at which the channel starts advancing
    pub start_time: f32,
    /// Playback speed multiplier applied to each tick's dt
    pub speed: f32,
}

impl Default for ChannelCfg {
    fn default() -> Self {
        Self {
            weight: 1.0,
            start_time: 0.0,
            speed: 1.0,
        }
    }
}
