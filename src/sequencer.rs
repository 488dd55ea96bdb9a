//! Weighted blending of several looping clip channels into one pose.

use std::sync::Arc;

use log::debug;

use crate::animation::AnimationLibrary;
use crate::config::{ChannelCfg, Config};
use crate::error::{Error, Result};
use crate::instance::AnimationInstance;
use crate::math::*;

/// Position of a channel within its Sequencer, in registration order
pub type ChannelIndex = usize;

/// One blend input: a playback cursor for a named clip plus its mixing parameters.
#[derive(Debug, Clone)]
pub struct Channel {
    /// Name of the clip this channel plays, also used as its state name
    name: String,

    /// Blend weight, relative to the Sequencer's total weight
    weight: f32,

    /// Playhead time at which this channel starts advancing and contributing
    start_time: f32,

    /// Multiplier applied to dt before advancing the channel
    speed: f32,

    instance: AnimationInstance,
}

impl Channel {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn start_time(&self) -> f32 {
        self.start_time
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn instance(&self) -> &AnimationInstance {
        &self.instance
    }

    /// Whether the channel has started at the given playhead time
    pub fn is_active(&self, playhead: f32) -> bool {
        self.start_time <= playhead
    }
}

/// Multi-channel blend mixer for one animated character.
///
/// Every active channel is advanced on each update, even at zero weight, so
/// a channel keeps its phase and can be faded back in without restarting.
/// The output is the weighted average of the active channels' skinning
/// matrices, normalised by the summed weight of those active channels.
#[derive(Debug, Clone)]
pub struct Sequencer {
    library: Arc<AnimationLibrary>,
    config: Config,
    channels: Vec<Channel>,

    /// Running sum of every channel's weight
    total_weight: f32,

    /// Seconds since creation or the last `reset_time`
    playhead: f32,

    skinning_transforms: Vec<Matrix4<f32>>,
}

impl Sequencer {

    /// Create an empty sequencer for the library's skeleton.
    ///
    /// Fails with `Error::BoneCapacityExceeded` if the skeleton is larger
    /// than `config.max_bones`.
    pub fn new(library: Arc<AnimationLibrary>, config: &Config) -> Result<Sequencer> {
        let bone_count = library.skeleton().bone_count();

        if bone_count > config.max_bones {
            return Err(Error::BoneCapacityExceeded {
                bones: bone_count,
                capacity: config.max_bones,
            });
        }

        Ok(Sequencer {
            library: library,
            config: config.clone(),
            channels: Vec::new(),
            total_weight: 0.0,
            playhead: 0.0,
            skinning_transforms: vec![mat4_id(); bone_count],
        })
    }

    /// Register a channel playing the library clip `name`.
    ///
    /// # Arguments
    ///
    /// * `name` - Clip to play; also identifies the channel as a state
    /// * `cfg` - Initial weight, start time and speed of the channel
    pub fn add_channel(&mut self, name: &str, cfg: ChannelCfg) -> Result<ChannelIndex> {
        if !self.library.contains(name) {
            return Err(Error::UnknownClip(name.to_string()));
        }
        if self.channel_index(name).is_some() {
            return Err(Error::DuplicateChannel(name.to_string()));
        }

        let instance = AnimationInstance::new(Arc::clone(&self.library), &self.config)?;

        self.channels.push(Channel {
            name: name.to_string(),
            weight: cfg.weight,
            start_time: cfg.start_time,
            speed: cfg.speed,
            instance: instance,
        });
        self.total_weight += cfg.weight;

        debug!(
            "Added channel {} '{}' (weight {}, start {}, speed {})",
            self.channels.len() - 1,
            name,
            cfg.weight,
            cfg.start_time,
            cfg.speed
        );

        Ok(self.channels.len() - 1)
    }

    /// Register one channel per library clip, in clip name order.
    /// Clips that already have a channel are skipped.
    pub fn add_all_channels(&mut self, cfg: ChannelCfg) -> Result<Vec<ChannelIndex>> {
        let library = Arc::clone(&self.library);
        let mut added = Vec::new();

        for name in library.clip_names() {
            if self.channel_index(name).is_none() {
                added.push(self.add_channel(name, cfg)?);
            }
        }

        Ok(added)
    }

    /// Set the weight of one channel. Out-of-range indices are ignored.
    pub fn set_weight(&mut self, index: ChannelIndex, weight: f32) {
        if let Some(channel) = self.channels.get_mut(index) {
            self.total_weight += weight - channel.weight;
            channel.weight = weight;
        }
    }

    /// Set every channel's weight at once. Ignored unless there is exactly one
    /// weight per channel.
    pub fn set_weights(&mut self, weights: &[f32]) {
        if weights.len() != self.channels.len() {
            return;
        }

        for (channel, &weight) in self.channels.iter_mut().zip(weights) {
            channel.weight = weight;
        }
        self.total_weight = weights.iter().sum();
    }

    /// Zero every channel's weight
    pub fn clear_weights(&mut self) {
        for channel in self.channels.iter_mut() {
            channel.weight = 0.0;
        }
        self.total_weight = 0.0;
    }

    /// Advance the playhead and every started channel by `dt` seconds, then
    /// blend the channels' skinning matrices.
    ///
    /// Weights are normalised over the channels that have started. With no
    /// positive weight among them the previous output is kept as is.
    pub fn update(&mut self, dt: f32) {
        self.playhead += dt;
        let playhead = self.playhead;

        for channel in self.channels.iter_mut().filter(|c| c.is_active(playhead)) {
            channel.instance.update(&channel.name, dt * channel.speed);
        }

        let active_weight = self.active_weight();
        if !(active_weight > 0.0) {
            return;
        }

        for (bone_index, output) in self.skinning_transforms.iter_mut().enumerate() {
            let mut blended = mat4_zero();

            for channel in self.channels.iter().filter(|c| c.is_active(playhead)) {
                blended = mat4_add_weighted(
                    blended,
                    &channel.instance.skinning_transforms()[bone_index],
                    channel.weight / active_weight,
                );
            }

            *output = blended;
        }
    }

    /// Reset the playhead to zero. Channels keep their own clip positions.
    pub fn reset_time(&mut self) {
        self.playhead = 0.0;
    }

    /// Index of the channel playing the named clip
    pub fn channel_index(&self, name: &str) -> Option<ChannelIndex> {
        self.channels.iter().position(|c| c.name == name)
    }

    pub fn channel(&self, index: ChannelIndex) -> Option<&Channel> {
        self.channels.get(index)
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn weight(&self, index: ChannelIndex) -> Option<f32> {
        self.channels.get(index).map(|c| c.weight)
    }

    pub fn weight_of(&self, name: &str) -> Option<f32> {
        self.channel_index(name).and_then(|index| self.weight(index))
    }

    pub fn total_weight(&self) -> f32 {
        self.total_weight
    }

    /// Sum of the weights of channels that have started at the current playhead
    pub fn active_weight(&self) -> f32 {
        self.channels
            .iter()
            .filter(|c| c.is_active(self.playhead))
            .map(|c| c.weight)
            .sum()
    }

    pub fn playhead(&self) -> f32 {
        self.playhead
    }

    pub fn library(&self) -> &Arc<AnimationLibrary> {
        &self.library
    }

    pub fn bone_count(&self) -> usize {
        self.skinning_transforms.len()
    }

    /// Blended skinning matrices, one per skeleton bone
    pub fn skinning_transforms(&self) -> &[Matrix4<f32>] {
        &self.skinning_transforms
    }
}
