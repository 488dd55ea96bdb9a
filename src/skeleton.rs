use log::debug;

use crate::error::{Error, Result};
use crate::math::*;

pub type BoneIndex = i32;
pub const ROOT_BONE_PARENT_INDEX: BoneIndex = -1;

#[derive(Debug, Clone)]
pub struct Skeleton {
    ///
    /// All bones in the skeleton, parents before children
    ///
    bones: Vec<Bone>,

    ///
    /// Correction applied after the inverse bind pose of every bone
    ///
    global_inverse: Matrix4<f32>,
}

impl Skeleton {

    ///
    /// Build a skeleton from an ordered list of bones.
    ///
    /// Fails if the list is empty or if any bone's parent does not
    /// appear earlier in the list, since global poses are computed
    /// in a single front-to-back pass.
    ///
    pub fn new(bones: Vec<Bone>, global_inverse: Matrix4<f32>) -> Result<Skeleton> {

        if bones.is_empty() {
            return Err(Error::EmptySkeleton);
        }

        for (bone_index, bone) in bones.iter().enumerate() {
            if bone.is_root() {
                continue;
            }
            if bone.parent_index < 0 || bone.parent_index as usize >= bone_index {
                return Err(Error::ParentOrder { bone: bone_index, parent: bone.parent_index });
            }
        }

        debug!("Built skeleton with {} bones", bones.len());

        Ok(Skeleton {
            bones: bones,
            global_inverse: global_inverse,
        })
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    pub fn global_inverse(&self) -> &Matrix4<f32> {
        &self.global_inverse
    }

    ///
    /// Index of the first bone with the given name
    ///
    pub fn find_bone(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|b| b.name == name)
    }

    ///
    /// Compute the model-space pose of one bone from its local pose and
    /// the already-computed model-space pose of its parent.
    ///
    /// Must be called in ascending bone order.
    ///
    pub fn compose_global(
        &self,
        bone_index: usize,
        local_poses: &[Matrix4<f32>],
        global_poses: &mut [Matrix4<f32>],
    ) {
        let bone = &self.bones[bone_index];

        global_poses[bone_index] = if bone.is_root() {
            local_poses[bone_index]
        } else {
            row_mat4_mul(global_poses[bone.parent_index as usize], local_poses[bone_index])
        };
    }

    ///
    /// Compute global poses for every bone from the given local poses
    ///
    pub fn calculate_global_poses(
        &self,
        local_poses: &[Matrix4<f32>],
        global_poses: &mut [Matrix4<f32>],
    ) {
        for bone_index in 0 .. self.bones.len() {
            self.compose_global(bone_index, local_poses, global_poses);
        }
    }

    ///
    /// Convert global poses into skinning matrices, which take a bind-pose
    /// vertex in model-space to its posed position in model-space
    ///
    pub fn finalize(
        &self,
        global_poses: &[Matrix4<f32>],
        skinning_transforms: &mut [Matrix4<f32>],
    ) {
        for (bone_index, bone) in self.bones.iter().enumerate() {
            skinning_transforms[bone_index] = row_mat4_mul(
                row_mat4_mul(global_poses[bone_index], bone.offset),
                self.global_inverse,
            );
        }
    }
}

#[derive(Debug, Clone)]
pub struct Bone {
    ///
    /// Name of bone
    ///
    pub name: String,

    ///
    /// Index of parent bone in the Skeleton's bone list,
    /// or ROOT_BONE_PARENT_INDEX
    ///
    pub parent_index: BoneIndex,

    ///
    /// Inverse bind pose: transforms vertex coordinates from model-space to bone-space.
    /// Row-major.
    ///
    pub offset: Matrix4<f32>,
}

impl Bone {
    pub fn new(name: &str, parent_index: BoneIndex, offset: Matrix4<f32>) -> Bone {
        Bone {
            name: name.to_string(),
            parent_index: parent_index,
            offset: offset,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_index == ROOT_BONE_PARENT_INDEX
    }
}
