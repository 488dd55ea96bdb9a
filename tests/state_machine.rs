mod common;

use common::*;
use pretty_assertions::assert_eq;
use skeletal_sequencer::{Animator, Config, StateMachine};

fn weight(state_machine: &StateMachine, state: &str) -> f32 {
    state_machine.sequencer().weight_of(state).unwrap()
}

#[test]
fn crossfade_idle_to_walk() {
    init_logging();
    let mut state_machine = idle_state_machine();
    assert_eq!(weight(&state_machine, "Idle"), 1.0);

    state_machine.transition_to("Walk", 1.0);
    assert!(state_machine.is_transitioning());

    state_machine.update(0.5);
    assert!(approx_eq(weight(&state_machine, "Idle"), 0.5));
    assert!(approx_eq(weight(&state_machine, "Walk"), 0.5));
    assert!(state_machine.is_current_state("Idle"));

    state_machine.update(0.5);
    assert!(approx_eq(weight(&state_machine, "Idle"), 0.0));
    assert!(approx_eq(weight(&state_machine, "Walk"), 1.0));
    assert!(state_machine.is_current_state("Walk"));
    assert_eq!(state_machine.pending_count(), 0);
    assert!(!state_machine.is_transitioning());
}

#[test]
fn crossfade_blends_skinning_output() {
    let mut state_machine = idle_state_machine();
    state_machine.transition_to("Walk", 1.0);
    state_machine.update(0.25);

    // Idle root at X 0, Walk root at X 2, a quarter of the way through the fade
    let root = translation_of(&state_machine.skinning_transforms()[0]);
    assert!(approx_eq(root[0], 0.5));
}

#[test]
fn unknown_state_is_ignored() {
    let mut state_machine = idle_state_machine();
    state_machine.transition_to("Nonexistent", 1.0);

    assert_eq!(state_machine.pending_count(), 0);
    assert_eq!(state_machine.current_state(), Some("Idle"));

    state_machine.set_current_state("Nonexistent");
    assert_eq!(state_machine.current_state(), Some("Idle"));
}

#[test]
fn repeated_requests_are_debounced() {
    let mut state_machine = idle_state_machine();

    state_machine.transition_to("Idle", 0.2);
    assert_eq!(state_machine.pending_count(), 0);

    state_machine.transition_to("Walk", 0.2);
    state_machine.transition_to("Walk", 0.2);
    assert_eq!(state_machine.pending_count(), 1);

    state_machine.transition_to("Run", 0.2);
    state_machine.transition_to("Run", 0.4);
    let targets: Vec<&str> = state_machine.pending_transitions().map(|p| &p.target[..]).collect();
    assert_eq!(targets, vec!["Walk", "Run"]);
}

#[test]
fn full_queue_drops_requests() {
    let mut state_machine = idle_state_machine();
    for state in ["Walk", "Run", "Walk", "Run", "Walk"] {
        state_machine.transition_to(state, 0.2);
    }
    assert_eq!(state_machine.pending_count(), 4);
    assert_eq!(state_machine.pending_transitions().last().unwrap().target, "Run");
}

#[test]
fn queue_depth_is_configurable() {
    let config: Config = serde_json::from_str(r#"{ "max_pending_transitions": 1 }"#).unwrap();
    assert_eq!(config.max_bones, Config::default().max_bones);

    let mut state_machine = StateMachine::new(sequencer(), &config);
    state_machine.set_current_state("Idle");
    state_machine.transition_to("Walk", 0.2);
    state_machine.transition_to("Run", 0.2);
    assert_eq!(state_machine.pending_count(), 1);
}

#[test]
fn non_finite_duration_is_dropped() {
    let mut state_machine = idle_state_machine();
    state_machine.transition_to("Walk", f32::NAN);
    state_machine.transition_to("Walk", f32::INFINITY);
    state_machine.transition_to("Run", f32::NEG_INFINITY);
    assert_eq!(state_machine.pending_count(), 0);

    for _ in 0..100 {
        state_machine.update(0.1);
    }
    assert!(state_machine.is_current_state("Idle"));
    assert_eq!(state_machine.remaining_transition_time(), None);

    state_machine.transition_to("Run", 0.1);
    for _ in 0..3 {
        state_machine.update(0.1);
    }
    assert!(state_machine.is_current_state("Run"));
    assert_eq!(state_machine.pending_count(), 0);
    assert_eq!(weight(&state_machine, "Run"), 1.0);
}

#[test]
fn first_request_plays_without_fade() {
    let mut state_machine = StateMachine::new(sequencer(), &Config::default());
    assert_eq!(state_machine.current_state(), None);

    state_machine.transition_to("Walk", 5.0);
    state_machine.transition_to("Run", 1.0);
    state_machine.update(0.1);

    assert_eq!(state_machine.current_state(), Some("Walk"));
    assert_eq!(weight(&state_machine, "Walk"), 1.0);
    assert_eq!(weight(&state_machine, "Idle"), 0.0);
    assert_eq!(weight(&state_machine, "Run"), 0.0);
    assert_eq!(state_machine.pending_count(), 1);
    assert_eq!(state_machine.remaining_transition_time(), None);
}

#[test]
fn unset_state_machine_without_requests_leaves_weights() {
    let mut state_machine = StateMachine::new(sequencer(), &Config::default());
    state_machine.update(0.1);
    assert_eq!(state_machine.current_state(), None);
    assert_eq!(state_machine.sequencer().total_weight(), 0.0);
    assert!(approx_eq(state_machine.sequencer().playhead(), 0.1));
}

#[test]
fn overshoot_carries_into_next_transition() {
    let mut state_machine = idle_state_machine();
    state_machine.transition_to("Walk", 1.0);
    state_machine.transition_to("Run", 1.0);

    state_machine.update(0.6);
    assert!(approx_eq(state_machine.remaining_transition_time().unwrap(), 0.4));

    state_machine.update(0.6);
    assert!(state_machine.is_current_state("Walk"));
    assert!(approx_eq(weight(&state_machine, "Walk"), 1.0));
    assert!(approx_eq(state_machine.remaining_transition_time().unwrap(), 0.8));

    state_machine.update(0.3);
    assert!(approx_eq(weight(&state_machine, "Walk"), 0.5));
    assert!(approx_eq(weight(&state_machine, "Run"), 0.5));

    state_machine.update(0.6);
    assert!(state_machine.is_current_state("Run"));
    assert_eq!(state_machine.remaining_transition_time(), None);
}

#[test]
fn zero_duration_transition_commits_at_once() {
    let mut state_machine = idle_state_machine();
    state_machine.transition_to("Run", 0.0);
    state_machine.update(0.016);

    assert!(state_machine.is_current_state("Run"));
    assert_eq!(weight(&state_machine, "Run"), 1.0);
    assert_eq!(weight(&state_machine, "Idle"), 0.0);
}

#[test]
fn steady_state_renormalizes_weights() {
    let mut state_machine = idle_state_machine();
    state_machine.sequencer_mut().set_weights(&[0.3, 0.9, 0.1]);

    state_machine.update(0.016);

    assert_eq!(weight(&state_machine, "Idle"), 1.0);
    assert_eq!(weight(&state_machine, "Walk"), 0.0);
    assert_eq!(weight(&state_machine, "Run"), 0.0);
    assert_eq!(state_machine.sequencer().total_weight(), 1.0);
}

#[test]
fn set_current_state_discards_queue() {
    let mut state_machine = idle_state_machine();
    state_machine.transition_to("Walk", 1.0);
    state_machine.update(0.5);

    state_machine.set_current_state("Run");

    assert_eq!(state_machine.pending_count(), 0);
    assert_eq!(state_machine.remaining_transition_time(), None);
    assert_eq!(weight(&state_machine, "Run"), 1.0);
    assert_eq!(weight(&state_machine, "Walk"), 0.0);
}

#[test]
fn update_always_advances_sequencer() {
    let mut state_machine = idle_state_machine();
    state_machine.update(0.25);
    state_machine.transition_to("Walk", 1.0);
    state_machine.update(0.25);
    assert!(approx_eq(state_machine.sequencer().playhead(), 0.5));
}

fn drive(animator: &mut dyn Animator, ticks: usize) {
    for tick in 0..ticks {
        if tick == 3 {
            animator.transition_to("Walk", 0.2);
        }
        if tick == 20 {
            animator.transition_to("Run", 0.35);
            animator.transition_to("Idle", 0.1);
        }
        animator.update(1.0 / 60.0);
    }
}

#[test]
fn runs_are_deterministic() {
    let mut first = idle_state_machine();
    let mut second = idle_state_machine();

    drive(&mut first, 90);
    drive(&mut second, 90);

    assert_eq!(first.skinning_transforms(), second.skinning_transforms());
    assert!(first.is_current_state("Idle"));
    assert!(Animator::is_current_state(&second, "Idle"));
}

#[test]
fn state_machine_can_move_between_threads() {
    let mut state_machine = idle_state_machine();
    let handle = std::thread::spawn(move || {
        drive(&mut state_machine, 30);
        state_machine
    });
    let state_machine = handle.join().unwrap();
    assert!(state_machine.is_current_state("Walk"));
}
