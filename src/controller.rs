use std::collections::VecDeque;

use log::{debug, trace};

use crate::config::Config;
use crate::math::{self, Matrix4};
use crate::sequencer::{ChannelIndex, Sequencer};

///
/// Narrow surface that gameplay code drives a character's animation through
///
pub trait Animator {

    ///
    /// Request a crossfade to `state` lasting `duration` seconds.
    /// Requests that can't be honoured are dropped silently.
    ///
    fn transition_to(&mut self, state: &str, duration: f32);

    ///
    /// Advance by `dt` seconds
    ///
    fn update(&mut self, dt: f32);

    ///
    /// Skinning matrices as of the last update, one per skeleton bone
    ///
    fn skinning_transforms(&self) -> &[Matrix4<f32>];

    fn is_current_state(&self, state: &str) -> bool;
}

///
/// A queued request to crossfade into `target`
///
#[derive(Debug, Clone, PartialEq)]
pub struct PendingTransition {
    pub target: String,
    pub duration: f32,
}

///
/// Drives a Sequencer's channel weights from "play this state" requests.
///
/// States are channel names. With nothing queued, the current state's channel
/// has weight 1 and every other channel weight 0. Queued requests are played
/// in order as linear crossfades from the current state to the target.
///
#[derive(Debug, Clone)]
pub struct StateMachine {

    ///
    /// The mixer whose weights this state machine schedules
    ///
    sequencer: Sequencer,

    ///
    /// State currently playing, None until the first request is processed
    ///
    current_state: Option<String>,

    ///
    /// Requests waiting to be played, head first
    ///
    pending: VecDeque<PendingTransition>,

    ///
    /// Seconds left in the head transition, None until it has started
    ///
    remaining: Option<f32>,

    max_pending: usize,
}

impl StateMachine {

    pub fn new(sequencer: Sequencer, config: &Config) -> StateMachine {
        StateMachine {
            sequencer: sequencer,
            current_state: None,
            pending: VecDeque::with_capacity(config.max_pending_transitions),
            remaining: None,
            max_pending: config.max_pending_transitions,
        }
    }

    ///
    /// Queue a crossfade to `state` lasting `duration` seconds.
    ///
    /// Dropped if `state` has no channel, `duration` is not finite, `state` is
    /// already playing or already the last queued request, or the queue is full.
    ///
    pub fn transition_to(&mut self, state: &str, duration: f32) {

        if self.sequencer.channel_index(state).is_none() {
            trace!("Ignoring transition to unknown state '{}'", state);
            return;
        }

        if !duration.is_finite() {
            trace!("Ignoring transition to '{}' with duration {}", state, duration);
            return;
        }

        if self.is_current_state(state) {
            trace!("Ignoring transition to current state '{}'", state);
            return;
        }

        if self.pending.back().map_or(false, |p| p.target == state) {
            trace!("Ignoring repeated transition to '{}'", state);
            return;
        }

        if self.pending.len() >= self.max_pending {
            trace!("Transition queue full, dropping '{}'", state);
            return;
        }

        self.pending.push_back(PendingTransition {
            target: state.to_string(),
            duration: duration,
        });
    }

    ///
    /// Switch to `state` immediately, discarding queued transitions.
    /// Unknown states are ignored.
    ///
    pub fn set_current_state(&mut self, state: &str) {
        let index = match self.sequencer.channel_index(state) {
            Some(index) => index,
            None => {
                trace!("Ignoring switch to unknown state '{}'", state);
                return;
            }
        };

        debug!("State set to '{}'", state);

        self.current_state = Some(state.to_string());
        self.pending.clear();
        self.remaining = None;
        self.focus(index);
    }

    ///
    /// Advance the active transition by `dt` seconds, update channel weights,
    /// then advance the sequencer.
    ///
    pub fn update(&mut self, dt: f32) {

        if self.current_state.is_none() {
            // First request plays at once, without a fade
            if let Some(first) = self.pending.pop_front() {
                debug!("State set to '{}'", first.target);
                if let Some(index) = self.sequencer.channel_index(&first.target) {
                    self.focus(index);
                }
                self.current_state = Some(first.target);
                self.remaining = None;
            }
        } else if !self.pending.is_empty() {
            self.advance_transition(dt);
        } else {
            self.remaining = None;
            if let Some(index) = self.current_index() {
                self.focus(index);
            }
        }

        self.sequencer.update(dt);
    }

    fn advance_transition(&mut self, dt: f32) {
        let (target, duration) = match self.pending.front() {
            Some(head) => (head.target.clone(), head.duration),
            None => return,
        };

        let remaining = self.remaining.unwrap_or(duration) - dt;

        let factor = if duration > 0.0 {
            math::remap(remaining, 0.0, duration, 1.0, 0.0).max(0.0).min(1.0)
        } else {
            1.0
        };

        let current_index = self.current_index();
        let target_index = self.sequencer.channel_index(&target);

        if let (Some(current_index), Some(target_index)) = (current_index, target_index) {
            self.sequencer.set_weight(current_index, 1.0 - factor);
            self.sequencer.set_weight(target_index, factor);
        }

        if remaining <= 0.0 {
            debug!(
                "Transition {:?} -> '{}' complete",
                self.current_state, target
            );

            self.pending.pop_front();
            self.current_state = Some(target);

            // Overshoot is carried into the next transition so chained fades keep total time
            self.remaining = self.pending.front().map(|next| next.duration + remaining);
        } else {
            self.remaining = Some(remaining);
        }
    }

    ///
    /// Weight 1 on the given channel, 0 on all others
    ///
    fn focus(&mut self, index: ChannelIndex) {
        self.sequencer.clear_weights();
        self.sequencer.set_weight(index, 1.0);
    }

    fn current_index(&self) -> Option<ChannelIndex> {
        self.current_state
            .as_deref()
            .and_then(|state| self.sequencer.channel_index(state))
    }

    pub fn current_state(&self) -> Option<&str> {
        self.current_state.as_deref()
    }

    pub fn is_current_state(&self, state: &str) -> bool {
        self.current_state.as_deref() == Some(state)
    }

    pub fn pending_transitions(&self) -> impl Iterator<Item = &PendingTransition> {
        self.pending.iter()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    ///
    /// Seconds left in the transition being played, if one has started
    ///
    pub fn remaining_transition_time(&self) -> Option<f32> {
        self.remaining
    }

    pub fn is_transitioning(&self) -> bool {
        self.current_state.is_some() && !self.pending.is_empty()
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn sequencer_mut(&mut self) -> &mut Sequencer {
        &mut self.sequencer
    }

    pub fn into_sequencer(self) -> Sequencer {
        self.sequencer
    }

    pub fn skinning_transforms(&self) -> &[Matrix4<f32>] {
        self.sequencer.skinning_transforms()
    }
}

impl Animator for StateMachine {

    fn transition_to(&mut self, state: &str, duration: f32) {
        StateMachine::transition_to(self, state, duration)
    }

    fn update(&mut self, dt: f32) {
        StateMachine::update(self, dt)
    }

    fn skinning_transforms(&self) -> &[Matrix4<f32>] {
        StateMachine::skinning_transforms(self)
    }

    fn is_current_state(&self, state: &str) -> bool {
        StateMachine::is_current_state(self, state)
    }
}
