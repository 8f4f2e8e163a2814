//! Breakpoint timelines for scheduled parameter changes.
//!
//! A timeline is a sorted list of events on the render clock:
//!
//!   SetValue(t, v)     the value jumps to v at t
//!   LinearRamp(t, v)   the value moves in a straight line from the previous
//!                      event's (time, value) to v, arriving at t
//!
//! Reading the value at any time is a pure function of the list, so the
//! control path and the render path can each hold a copy, apply the same
//! edits, and agree on every sample. Storage is reserved up front; edits on
//! the render path never allocate as long as the timeline stays within
//! `MAX_BREAKPOINTS`.

/// Capacity reserved per timeline.
pub const MAX_BREAKPOINTS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    SetValue,
    LinearRamp,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub time: f64,
    pub value: f32,
    pub segment: Segment,
}

impl Breakpoint {
    pub fn set(time: f64, value: f32) -> Self {
        Self {
            time,
            value,
            segment: Segment::SetValue,
        }
    }

    pub fn ramp(time: f64, value: f32) -> Self {
        Self {
            time,
            value,
            segment: Segment::LinearRamp,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Timeline {
    initial: f32,
    events: Vec<Breakpoint>,
}

impl Timeline {
    pub fn new(initial: f32) -> Self {
        Self {
            initial,
            events: Vec::with_capacity(MAX_BREAKPOINTS),
        }
    }

    pub fn events(&self) -> &[Breakpoint] {
        &self.events
    }

    /// Insert keeping time order; events at equal times keep insertion order.
    ///
    /// Returns false (and drops the event) once the timeline is full.
    pub fn push(&mut self, event: Breakpoint) -> bool {
        if self.events.len() >= MAX_BREAKPOINTS {
            return false;
        }
        let at = self.events.partition_point(|e| e.time <= event.time);
        self.events.insert(at, event);
        true
    }

    pub fn extend(&mut self, events: &[Breakpoint]) -> bool {
        events.iter().all(|&e| self.push(e))
    }

    pub fn value_at(&self, time: f64) -> f32 {
        // first event strictly after `time`
        let next = self.events.partition_point(|e| e.time <= time);

        let (prev_time, prev_value) = match next.checked_sub(1) {
            Some(i) => (self.events[i].time, self.events[i].value),
            None => (f64::NEG_INFINITY, self.initial),
        };

        match self.events.get(next) {
            Some(upcoming) if upcoming.segment == Segment::LinearRamp => {
                if prev_time == f64::NEG_INFINITY {
                    return prev_value;
                }
                let span = upcoming.time - prev_time;
                if span <= 0.0 {
                    return upcoming.value;
                }
                let progress = ((time - prev_time) / span) as f32;
                prev_value + (upcoming.value - prev_value) * progress
            }
            _ => prev_value,
        }
    }

    /// Drop every event after `time` and pin the current value there.
    ///
    /// Returns the pinned value. A ramp in flight at `time` is cut at the
    /// value it had reached, so continuing from it is seamless.
    pub fn cancel_and_hold(&mut self, time: f64) -> f32 {
        let held = self.value_at(time);
        let keep = self.events.partition_point(|e| e.time < time);
        self.events.truncate(keep);
        // Full means every event lies before `time`, so the value is already
        // flat at `held` and the pin can be skipped.
        self.push(Breakpoint::set(time, held));
        held
    }

    /// Time of the last event, if any.
    pub fn end_time(&self) -> Option<f64> {
        self.events.last().map(|e| e.time)
    }

    /// Fill `out` with values starting at `start`, one per sample.
    pub fn render(&self, out: &mut [f32], start: f64, sample_rate: f32) {
        let step = 1.0 / sample_rate as f64;
        for (i, value) in out.iter_mut().enumerate() {
            *value = self.value_at(start + i as f64 * step);
        }
    }

    pub fn clear(&mut self, initial: f32) {
        self.initial = initial;
        self.events.clear();
    }
}
