//! What is wired in a voice, as data.
//!
//! The edge list is derived from a parameter snapshot once per voice and the
//! voice is realized from it, so "which stages exist" can be checked without
//! rendering a single sample.
//!
//! ```text
//! oscillator -> filter -> [distortion] -> voiceGain -> masterGain -> output
//! voiceGain -> reverbSend -> masterGain                  (reverb > 0)
//! voiceGain -> delayLine -> delayFeedback -> masterGain  (delay > 0)
//!              delayLine <- delayFeedback                (the feedback cycle)
//! ```

use std::fmt;

use crate::patch::ParameterSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Oscillator,
    Filter,
    Distortion,
    VoiceGain,
    ReverbSend,
    DelayLine,
    DelayFeedback,
    MasterGain,
    Output,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::Oscillator => "oscillator",
            Stage::Filter => "filter",
            Stage::Distortion => "distortion",
            Stage::VoiceGain => "voiceGain",
            Stage::ReverbSend => "reverbSend",
            Stage::DelayLine => "delayLine",
            Stage::DelayFeedback => "delayFeedbackGain",
            Stage::MasterGain => "masterGain",
            Stage::Output => "output",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: Stage,
    pub to: Stage,
}

const fn edge(from: Stage, to: Stage) -> Edge {
    Edge { from, to }
}

/// The delay loop's return path.
pub const FEEDBACK_EDGE: Edge = edge(Stage::DelayFeedback, Stage::DelayLine);

#[derive(Debug, Clone, PartialEq)]
pub struct Topology {
    edges: Vec<Edge>,
}

impl Topology {
    pub fn from_params(params: &ParameterSet) -> Self {
        use Stage::*;

        let mut edges = Vec::with_capacity(12);
        edges.push(edge(Oscillator, Filter));
        if params.effects.distortion_amount > 0.0 {
            edges.push(edge(Filter, Distortion));
            edges.push(edge(Distortion, VoiceGain));
        } else {
            edges.push(edge(Filter, VoiceGain));
        }
        edges.push(edge(VoiceGain, MasterGain));

        if params.effects.reverb_amount > 0.0 {
            edges.push(edge(VoiceGain, ReverbSend));
            edges.push(edge(ReverbSend, MasterGain));
        }

        if params.effects.delay_amount > 0.0 {
            edges.push(edge(VoiceGain, DelayLine));
            edges.push(edge(DelayLine, DelayFeedback));
            edges.push(edge(DelayFeedback, MasterGain));
            edges.push(FEEDBACK_EDGE);
        }

        edges.push(edge(MasterGain, Output));
        Self { edges }
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn connects(&self, from: Stage, to: Stage) -> bool {
        self.edges.contains(&edge(from, to))
    }

    pub fn has_stage(&self, stage: Stage) -> bool {
        self.edges.iter().any(|e| e.from == stage || e.to == stage)
    }

    /// Stages in first-seen order.
    pub fn stages(&self) -> Vec<Stage> {
        let mut seen = Vec::with_capacity(Stage::Output as usize + 1);
        for e in &self.edges {
            for stage in [e.from, e.to] {
                if !seen.contains(&stage) {
                    seen.push(stage);
                }
            }
        }
        seen
    }

    /// Stages reachable from `stage` without taking the feedback edge.
    pub fn downstream(&self, stage: Stage) -> Vec<Stage> {
        let mut found = Vec::new();
        let mut pending = vec![stage];
        while let Some(current) = pending.pop() {
            for e in self.edges.iter().filter(|e| e.from == current && **e != FEEDBACK_EDGE) {
                if !found.contains(&e.to) {
                    found.push(e.to);
                    pending.push(e.to);
                }
            }
        }
        found
    }

    /// True when the feedback edge is the only cycle.
    pub fn is_acyclic_without_feedback(&self) -> bool {
        self.stages()
            .into_iter()
            .all(|stage| !self.downstream(stage).contains(&stage))
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.edges.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} -> {}", e.from, e.to)?;
        }
        Ok(())
    }
}
