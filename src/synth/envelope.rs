use std::fmt;
use std::sync::Arc;

use crate::clock::RenderClock;
use crate::dsp::automation::{Breakpoint, Timeline};
use crate::patch::ParameterSet;

/*
Envelope Scheduling
===================

The envelope is not a running state machine on the audio thread; it is a
list of breakpoints on the render clock, written once at note-on and edited
once at note-off.

  gain
  volume ┤     /\
         │    /  \
  sustain┤   /    \_____________
         │  /                   \
       0 ┼─/─────────────────────\────
           t0   +attack  +decay   t1  t1+release
           |-A-|--D--|----S-----|---R---|

Note-on at t0:
  SetValue(t0, 0)
  LinearRamp(t0 + attack, volume)
  LinearRamp(t0 + attack + decay, volume · sustain)

Note-off at t1, in any stage:
  cancel everything after t1, pin the value the ramp had reached at t1,
  LinearRamp(t1 + release, 0)

Pinning the reached value (instead of the nominal target) is what keeps a
release during the attack from jumping. The stage at any moment follows from
those times, so the scheduler can answer "where is the envelope now" from the
clock alone.

The render path holds its own copy of the timeline in the voice's gain stage
and applies the same `ReleasePlan`, so both sides agree on every sample.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Idle,
    Attacking,
    Decaying,
    Sustaining,
    Releasing,
    Silent,
}

impl EnvelopeStage {
    /// Whether a voice in this stage is still wired to the output.
    pub fn is_sounding(self) -> bool {
        !matches!(self, EnvelopeStage::Idle | EnvelopeStage::Silent)
    }
}

impl fmt::Display for EnvelopeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EnvelopeStage::Idle => "idle",
            EnvelopeStage::Attacking => "attack",
            EnvelopeStage::Decaying => "decay",
            EnvelopeStage::Sustaining => "sustain",
            EnvelopeStage::Releasing => "release",
            EnvelopeStage::Silent => "silent",
        };
        f.pad(name)
    }
}

/// Release edit shared between the control and render paths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReleasePlan {
    /// Note-off time.
    pub at: f64,
    /// Gain reached at `at`; the ramp starts here.
    pub from: f32,
    /// Time the gain reaches zero and the voice stops.
    pub until: f64,
}

impl ReleasePlan {
    /// Apply to a gain timeline. Never allocates within timeline capacity.
    pub fn apply(&self, timeline: &mut Timeline) {
        timeline.cancel_and_hold(self.at);
        timeline.push(Breakpoint::ramp(self.until, 0.0));
    }
}

/// Breakpoints for the attack and decay of a note starting at `t0`.
pub fn attack_events(params: &ParameterSet, t0: f64) -> [Breakpoint; 3] {
    let env = &params.envelope;
    [
        Breakpoint::set(t0, 0.0),
        Breakpoint::ramp(t0 + env.attack, params.peak_gain() as f32),
        Breakpoint::ramp(t0 + env.attack + env.decay, params.sustain_gain() as f32),
    ]
}

#[derive(Debug, Clone)]
struct ScheduledNote {
    started_at: f64,
    attack_end: f64,
    decay_end: f64,
    release_seconds: f64,
    release: Option<ReleasePlan>,
    timeline: Timeline,
}

/// Control-side envelope of the current voice.
pub struct EnvelopeScheduler {
    clock: Arc<dyn RenderClock>,
    note: Option<ScheduledNote>,
}

impl EnvelopeScheduler {
    pub fn new(clock: Arc<dyn RenderClock>) -> Self {
        Self { clock, note: None }
    }

    /// Program attack/decay starting now. Returns the start time and the
    /// events the voice's gain stage must carry.
    pub fn start(&mut self, params: &ParameterSet) -> (f64, [Breakpoint; 3]) {
        let t0 = self.clock.now();
        let events = attack_events(params, t0);

        let mut timeline = Timeline::new(0.0);
        timeline.extend(&events);

        let env = &params.envelope;
        self.note = Some(ScheduledNote {
            started_at: t0,
            attack_end: t0 + env.attack,
            decay_end: t0 + env.attack + env.decay,
            release_seconds: env.release,
            release: None,
            timeline,
        });
        (t0, events)
    }

    /// Schedule the release from the current level.
    ///
    /// `None` if nothing is sounding or the note is already releasing.
    pub fn release(&mut self) -> Option<ReleasePlan> {
        let now = self.clock.now();
        let note = self.note.as_mut()?;
        if note.release.is_some() {
            return None;
        }

        let from = note.timeline.value_at(now);
        let plan = ReleasePlan {
            at: now,
            from,
            until: now + note.release_seconds,
        };
        plan.apply(&mut note.timeline);
        note.release = Some(plan);
        Some(plan)
    }

    /// Forget the current note (hard stop or failed start).
    pub fn clear(&mut self) {
        self.note = None;
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage_at(self.clock.now())
    }

    pub fn stage_at(&self, time: f64) -> EnvelopeStage {
        let Some(note) = &self.note else {
            return EnvelopeStage::Idle;
        };
        match note.release {
            Some(plan) if time >= plan.until => EnvelopeStage::Silent,
            Some(plan) if time >= plan.at => EnvelopeStage::Releasing,
            _ if time < note.attack_end => EnvelopeStage::Attacking,
            _ if time < note.decay_end => EnvelopeStage::Decaying,
            _ => EnvelopeStage::Sustaining,
        }
    }

    /// Gain of the current note now; zero when idle.
    pub fn level(&self) -> f32 {
        self.level_at(self.clock.now())
    }

    pub fn level_at(&self, time: f64) -> f32 {
        self.note.as_ref().map_or(0.0, |note| note.timeline.value_at(time))
    }

    pub fn started_at(&self) -> Option<f64> {
        self.note.as_ref().map(|note| note.started_at)
    }

    pub fn release_plan(&self) -> Option<ReleasePlan> {
        self.note.as_ref().and_then(|note| note.release)
    }

    pub fn breakpoints(&self) -> &[Breakpoint] {
        match &self.note {
            Some(note) => note.timeline.events(),
            None => &[],
        }
    }
}
