//! Gantt timeline produced by a run.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::core::Ticks;

/// Label used for idle slots in the Gantt sequence.
pub const IDLE_LABEL: &str = "Idle";

/// One emitted slot: a single idle tick, or a contiguous run of one process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimelineSlot {
    Idle,
    Run { process: String, duration: Ticks },
}

impl TimelineSlot {
    pub fn duration(&self) -> Ticks {
        match self {
            Self::Idle => 1,
            Self::Run { duration, .. } => *duration,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Idle => IDLE_LABEL,
            Self::Run { process, .. } => process,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// A `[start, end)` interval of the timeline with consecutive idle ticks
/// merged. `process` is `None` for idle spans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: Ticks,
    pub end: Ticks,
    pub process: Option<String>,
}

impl Span {
    pub fn label(&self) -> &str {
        self.process.as_deref().unwrap_or(IDLE_LABEL)
    }
}

/// Emitted slots plus running totals, so the clock check after every step
/// stays constant time. Serializes as the bare slot list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<TimelineSlot>")]
pub struct Timeline {
    slots: Vec<TimelineSlot>,
    total: Ticks,
    idle: Ticks,
    runs: usize,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_idle(&mut self) {
        self.slots.push(TimelineSlot::Idle);
        self.total += 1;
        self.idle += 1;
    }

    pub fn push_run(&mut self, process: &str, duration: Ticks) {
        debug_assert!(duration > 0, "Empty run slot for {process}");
        self.slots.push(TimelineSlot::Run {
            process: process.to_owned(),
            duration,
        });
        self.total += duration;
        self.runs += 1;
    }

    pub fn slots(&self) -> &[TimelineSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The Gantt sequence: one label per slot, in execution order.
    pub fn labels(&self) -> Vec<String> {
        self.slots.iter().map(|s| s.label().to_owned()).collect()
    }

    /// Sum of all slot durations; equals the final clock value.
    pub fn total(&self) -> Ticks {
        self.total
    }

    pub fn idle_ticks(&self) -> Ticks {
        self.idle
    }

    pub fn busy_ticks(&self) -> Ticks {
        self.total - self.idle
    }

    pub fn run_slots(&self) -> usize {
        self.runs
    }

    /// Total run time given to `process` across all its slots.
    pub fn service_of(&self, process: &str) -> Ticks {
        self.slots
            .iter()
            .filter_map(|s| match s {
                TimelineSlot::Run {
                    process: p,
                    duration,
                } if p == process => Some(*duration),
                _ => None,
            })
            .sum()
    }

    /// Run slots whose process differs from the previous run slot.
    pub fn context_switches(&self) -> usize {
        let mut prev: Option<&str> = None;
        let mut switches = 0;
        for slot in &self.slots {
            if let TimelineSlot::Run { process, .. } = slot {
                if prev.is_some_and(|p| p != process) {
                    switches += 1;
                }
                prev = Some(process);
            }
        }
        switches
    }

    pub fn spans(&self) -> Vec<Span> {
        let mut spans: Vec<Span> = Vec::new();
        let mut now = 0;
        for slot in &self.slots {
            let end = now + slot.duration();
            let process = match slot {
                TimelineSlot::Idle => None,
                TimelineSlot::Run { process, .. } => Some(process.clone()),
            };
            let extends_idle = process.is_none()
                && spans.last().is_some_and(|last| last.process.is_none());

            if extends_idle {
                if let Some(last) = spans.last_mut() {
                    last.end = end;
                }
            } else {
                spans.push(Span {
                    start: now,
                    end,
                    process,
                });
            }
            now = end;
        }
        spans
    }
}

impl From<Vec<TimelineSlot>> for Timeline {
    fn from(slots: Vec<TimelineSlot>) -> Self {
        let mut timeline = Self::new();
        for slot in slots {
            match slot {
                TimelineSlot::Idle => timeline.push_idle(),
                TimelineSlot::Run { process, duration } => timeline.push_run(&process, duration),
            }
        }
        timeline
    }
}

impl Serialize for Timeline {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.slots.serialize(serializer)
    }
}

// Arrow chart, e.g. `Idle -> P1 -> P2`
impl fmt::Display for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, slot) in self.slots.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            f.write_str(slot.label())?;
        }
        Ok(())
    }
}
