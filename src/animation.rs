use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;

use crate::error::{Error, Result};
use crate::math::*;
use crate::skeleton::Skeleton;
use crate::transform::Transform;

///
/// Local pose of every bone at one sample point.
/// Parallel arrays, one entry per bone in skeleton order.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationFrame {
    pub positions: Vec<Vector3<f32>>,
    pub rotations: Vec<Quaternion<f32>>,
    pub scales: Vec<Vector3<f32>>,
}

impl AnimationFrame {

    pub fn from_transforms(transforms: &[Transform]) -> AnimationFrame {
        AnimationFrame {
            positions: transforms.iter().map(|t| t.translation).collect(),
            rotations: transforms.iter().map(|t| t.rotation).collect(),
            scales: transforms.iter().map(|t| t.scale).collect(),
        }
    }

    ///
    /// Local transform of a single bone, or identity if the frame has no entry for it
    ///
    pub fn bone_transform(&self, bone_index: usize) -> Transform {
        match (
            self.positions.get(bone_index),
            self.rotations.get(bone_index),
            self.scales.get(bone_index),
        ) {
            (Some(&translation), Some(&rotation), Some(&scale)) => Transform {
                translation: translation,
                rotation: rotation,
                scale: scale,
            },
            _ => Transform::identity(),
        }
    }

    ///
    /// Length of the shortest of the three arrays
    ///
    fn min_bone_count(&self) -> usize {
        self.positions.len().min(self.rotations.len()).min(self.scales.len())
    }

    fn max_bone_count(&self) -> usize {
        self.positions.len().max(self.rotations.len()).max(self.scales.len())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub samples: Vec<AnimationFrame>,

    ///
    /// Assumes constant sample rate for animation
    ///
    pub samples_per_second: f32,
}

impl AnimationClip {

    pub fn new(samples: Vec<AnimationFrame>, samples_per_second: f32) -> AnimationClip {
        AnimationClip {
            samples: samples,
            samples_per_second: samples_per_second,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.samples.len()
    }

    ///
    /// Duration in seconds: frame count over sample rate
    ///
    pub fn duration(&self) -> f32 {
        self.samples.len() as f32 / self.samples_per_second
    }

    ///
    /// Find the sample at or before `elapsed_time` and the fraction of the
    /// way to the following sample.
    ///
    /// The returned index is clamped to the last frame and the factor is
    /// always in [0, 1). Negative times sample the first frame.
    ///
    pub fn calc_frame(&self, elapsed_time: f32) -> (usize, f32) {
        let last_frame = self.samples.len().saturating_sub(1);

        let raw = elapsed_time.max(0.0) * self.samples_per_second;
        if !raw.is_finite() {
            return (last_frame, 0.0);
        }

        let whole = raw.floor();
        let base_frame = (whole as usize).min(last_frame);

        (base_frame, raw - whole)
    }

    ///
    /// The sample interpolated towards from `frame`. The last frame holds
    /// rather than wrapping around; looping is done by the playback cursor.
    ///
    pub fn next_frame(&self, frame: usize) -> usize {
        (frame + 1).min(self.samples.len().saturating_sub(1))
    }

    ///
    /// Interpolated local transform of one bone between `base_frame` and the frame after it
    ///
    pub fn sample_local_transform(
        &self,
        bone_index: usize,
        base_frame: usize,
        blend_factor: f32,
    ) -> Transform {
        let current = match self.samples.get(base_frame) {
            Some(frame) => frame.bone_transform(bone_index),
            None => return Transform::identity(),
        };
        let next = self.samples[self.next_frame(base_frame)].bone_transform(bone_index);

        current.lerp(next, blend_factor)
    }

    ///
    /// Interpolated local pose of one bone, as a `translation * rotation * scale` matrix
    ///
    pub fn sample_local_pose(
        &self,
        bone_index: usize,
        base_frame: usize,
        blend_factor: f32,
    ) -> Matrix4<f32> {
        self.sample_local_transform(bone_index, base_frame, blend_factor).to_matrix()
    }

    fn validate(&self, name: &str, bone_count: usize) -> Result<()> {
        if self.samples.is_empty() {
            return Err(Error::EmptyClip(name.to_string()));
        }

        if !(self.samples_per_second > 0.0) || !self.samples_per_second.is_finite() {
            return Err(Error::InvalidSampleRate {
                clip: name.to_string(),
                rate: self.samples_per_second,
            });
        }

        for (frame_index, frame) in self.samples.iter().enumerate() {
            let shortest = frame.min_bone_count();
            let longest = frame.max_bone_count();
            if shortest != bone_count || longest != bone_count {
                return Err(Error::FrameBoneCount {
                    clip: name.to_string(),
                    frame: frame_index,
                    expected: bone_count,
                    actual: if shortest != bone_count { shortest } else { longest },
                });
            }
        }

        Ok(())
    }
}

///
/// Named clips that all animate the same skeleton.
/// Read-only once built and shared between every instance driving that rig.
///
#[derive(Debug, Clone)]
pub struct AnimationLibrary {
    skeleton: Arc<Skeleton>,
    clips: BTreeMap<String, AnimationClip>,
}

impl AnimationLibrary {

    ///
    /// Build a library, checking that every clip is playable and carries
    /// exactly one entry per skeleton bone in every frame
    ///
    pub fn new<I>(skeleton: Arc<Skeleton>, clips: I) -> Result<AnimationLibrary>
        where I: IntoIterator<Item = (String, AnimationClip)>
    {
        let mut library = BTreeMap::new();

        for (name, clip) in clips {
            clip.validate(&name, skeleton.bone_count())?;
            debug!(
                "Loaded clip '{}' ({} frames, {:.3}s)",
                name,
                clip.frame_count(),
                clip.duration()
            );
            library.insert(name, clip);
        }

        Ok(AnimationLibrary {
            skeleton: skeleton,
            clips: library,
        })
    }

    pub fn skeleton(&self) -> &Arc<Skeleton> {
        &self.skeleton
    }

    pub fn get(&self, name: &str) -> Option<&AnimationClip> {
        self.clips.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.clips.contains_key(name)
    }

    ///
    /// Clip names in sorted order
    ///
    pub fn clip_names(&self) -> impl Iterator<Item = &str> {
        self.clips.keys().map(|name| &name[..])
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}
