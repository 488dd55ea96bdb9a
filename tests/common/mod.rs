#![allow(dead_code)]

use std::sync::Arc;

use skeletal_sequencer::math::{mat4_id, quaternion_id, Matrix4};
use skeletal_sequencer::{
    AnimationClip, AnimationFrame, AnimationLibrary, Bone, ChannelCfg, Config, Sequencer, Skeleton,
    StateMachine, Transform, ROOT_BONE_PARENT_INDEX,
};

pub const EPSILON: f32 = 1e-5;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

/// Translation column of a row-major matrix
pub fn translation_of(m: &Matrix4<f32>) -> [f32; 3] {
    [m[0][3], m[1][3], m[2][3]]
}

/// Root bone plus one child hanging from it
pub fn two_bone_skeleton() -> Arc<Skeleton> {
    Arc::new(
        Skeleton::new(
            vec![
                Bone::new("root", ROOT_BONE_PARENT_INDEX, mat4_id()),
                Bone::new("child", 0, mat4_id()),
            ],
            mat4_id(),
        )
        .unwrap(),
    )
}

fn frame(root: [f32; 3]) -> AnimationFrame {
    AnimationFrame::from_transforms(&[
        Transform {
            translation: root,
            rotation: quaternion_id(),
            scale: [1.0, 1.0, 1.0],
        },
        Transform {
            translation: [0.0, 1.0, 0.0],
            rotation: quaternion_id(),
            scale: [1.0, 1.0, 1.0],
        },
    ])
}

/// "Idle" raises the root from Y 0 to Y 1 over two samples at `idle_rate`.
/// "Walk" holds the root at X 2, "Run" at X -2, both at one sample per second.
pub fn library(idle_rate: f32) -> Arc<AnimationLibrary> {
    let clips = vec![
        (
            "Idle".to_string(),
            AnimationClip::new(vec![frame([0.0, 0.0, 0.0]), frame([0.0, 1.0, 0.0])], idle_rate),
        ),
        (
            "Walk".to_string(),
            AnimationClip::new(vec![frame([2.0, 0.0, 0.0]), frame([2.0, 0.0, 0.0])], 1.0),
        ),
        (
            "Run".to_string(),
            AnimationClip::new(vec![frame([-2.0, 0.0, 0.0]), frame([-2.0, 0.0, 0.0])], 1.0),
        ),
    ];

    Arc::new(AnimationLibrary::new(two_bone_skeleton(), clips).unwrap())
}

/// Sequencer with "Idle", "Walk" and "Run" channels, all starting at time 0 with weight 0
pub fn sequencer() -> Sequencer {
    let mut sequencer = Sequencer::new(library(1.0), &Config::default()).unwrap();
    for name in ["Idle", "Walk", "Run"] {
        sequencer
            .add_channel(name, ChannelCfg { weight: 0.0, ..ChannelCfg::default() })
            .unwrap();
    }
    sequencer
}

/// State machine already playing "Idle"
pub fn idle_state_machine() -> StateMachine {
    let mut state_machine = StateMachine::new(sequencer(), &Config::default());
    state_machine.set_current_state("Idle");
    state_machine
}
