use std::sync::Arc;

use log::trace;

use crate::animation::AnimationLibrary;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::math::*;

///
/// Playback cursor for one clip at a time. Samples the current clip every
/// update and keeps a full set of skinning matrices for the library's skeleton.
///
/// Switching clips is a hard cut; smoothing between clips happens by blending
/// several instances in a `Sequencer`.
///
#[derive(Debug, Clone)]
pub struct AnimationInstance {

    ///
    /// Shared clip data and the skeleton it animates
    ///
    library: Arc<AnimationLibrary>,

    ///
    /// Name of the clip sampled by the last successful update
    ///
    current_clip: Option<String>,

    ///
    /// Seconds into the current clip, always in [0, duration)
    ///
    elapsed: f32,

    local_poses: Vec<Matrix4<f32>>,
    global_poses: Vec<Matrix4<f32>>,
    skinning_transforms: Vec<Matrix4<f32>>,
}

impl AnimationInstance {

    ///
    /// Create an instance for the library's skeleton, failing if the skeleton
    /// has more bones than the configured capacity
    ///
    pub fn new(library: Arc<AnimationLibrary>, config: &Config) -> Result<AnimationInstance> {
        let bone_count = library.skeleton().bone_count();

        if bone_count > config.max_bones {
            return Err(Error::BoneCapacityExceeded {
                bones: bone_count,
                capacity: config.max_bones,
            });
        }

        Ok(AnimationInstance {
            library: library,
            current_clip: None,
            elapsed: 0.0,
            local_poses: vec![mat4_id(); bone_count],
            global_poses: vec![mat4_id(); bone_count],
            skinning_transforms: vec![mat4_id(); bone_count],
        })
    }

    ///
    /// Advance playback of `clip_name` by `dt` seconds and resample every bone.
    ///
    /// Naming a clip other than the current one restarts from its first frame.
    /// Reaching the end of the clip loops back to the start. Unknown clip names
    /// leave the instance untouched.
    ///
    pub fn update(&mut self, clip_name: &str, dt: f32) {
        let clip = match self.library.get(clip_name) {
            Some(clip) => clip,
            None => {
                trace!("Ignoring update for unknown clip '{}'", clip_name);
                return;
            }
        };

        if self.current_clip.as_deref() == Some(clip_name) {
            self.elapsed += dt;
        } else {
            self.current_clip = Some(clip_name.to_string());
            self.elapsed = 0.0;
        }

        if self.elapsed >= clip.duration() {
            self.elapsed = 0.0;
        }

        let (frame, blend_factor) = clip.calc_frame(self.elapsed);

        for (bone_index, local_pose) in self.local_poses.iter_mut().enumerate() {
            *local_pose = clip.sample_local_pose(bone_index, frame, blend_factor);
        }

        let skeleton = self.library.skeleton();
        skeleton.calculate_global_poses(&self.local_poses, &mut self.global_poses);
        skeleton.finalize(&self.global_poses, &mut self.skinning_transforms);
    }

    pub fn reset_time(&mut self) {
        self.elapsed = 0.0;
    }

    pub fn current_clip(&self) -> Option<&str> {
        self.current_clip.as_deref()
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    ///
    /// True when the cursor sits on the final sample of the current clip,
    /// i.e. the next loop restart is less than one sample away
    ///
    pub fn is_finished(&self) -> bool {
        let clip = match self.current_clip.as_deref().and_then(|name| self.library.get(name)) {
            Some(clip) => clip,
            None => return false,
        };
        clip.calc_frame(self.elapsed).0 + 1 >= clip.frame_count()
    }

    pub fn library(&self) -> &Arc<AnimationLibrary> {
        &self.library
    }

    pub fn bone_count(&self) -> usize {
        self.skinning_transforms.len()
    }

    ///
    /// Model-space pose of every bone from the last update
    ///
    pub fn global_poses(&self) -> &[Matrix4<f32>] {
        &self.global_poses
    }

    ///
    /// Skinning matrices from the last update, one per skeleton bone
    ///
    pub fn skinning_transforms(&self) -> &[Matrix4<f32>] {
        &self.skinning_transforms
    }
}
