use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::core::Ticks;
use crate::error::{Result, SimError};

/// A process record as supplied by the caller.
///
/// Fields are signed so that malformed input can be represented and
/// rejected by [`ProcessSet::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    pub id: String,
    pub burst_time: i64,
    pub arrival_time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
}

impl Process {
    pub fn new(id: impl Into<String>, burst_time: i64, arrival_time: i64) -> Self {
        Self {
            id: id.into(),
            burst_time,
            arrival_time,
            priority: None,
        }
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidProcess {
    pub id: String,
    pub burst_time: Ticks,
    pub arrival_time: Ticks,
    pub priority: Option<u32>,
}

/// Validated input, in the caller's order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessSet {
    processes: Vec<ValidProcess>,
    total_burst: Ticks,
    // Latest arrival plus every burst; the clock never passes it
    horizon: Ticks,
}

impl ProcessSet {
    /// Check every record and convert clock fields to ticks.
    ///
    /// With `require_priority`, a record without a priority is rejected, and
    /// so is a set whose latest arrival plus total burst does not fit the
    /// clock.
    pub fn validate(processes: &[Process], require_priority: bool) -> Result<Self> {
        let mut seen = FxHashSet::default();
        let mut valid = Vec::with_capacity(processes.len());
        let mut total_burst: Ticks = 0;
        let mut latest_arrival: Ticks = 0;
        let mut horizon: Ticks = 0;

        for p in processes {
            if p.id.trim().is_empty() {
                return Err(SimError::invalid_process(&p.id, "id must not be empty"));
            }
            if !seen.insert(p.id.as_str()) {
                return Err(SimError::invalid_process(&p.id, "duplicate id"));
            }

            let burst_time = match Ticks::try_from(p.burst_time) {
                Ok(burst) if burst > 0 => burst,
                _ => {
                    return Err(SimError::invalid_process(
                        &p.id,
                        format!("burst_time must be positive, got {}", p.burst_time),
                    ));
                }
            };
            let arrival_time = Ticks::try_from(p.arrival_time).map_err(|_| {
                SimError::invalid_process(
                    &p.id,
                    format!("arrival_time must not be negative, got {}", p.arrival_time),
                )
            })?;
            let priority = match p.priority {
                Some(priority) => match u32::try_from(priority) {
                    Ok(priority) if priority >= 1 => Some(priority),
                    _ => {
                        return Err(SimError::invalid_process(
                            &p.id,
                            format!("priority must be between 1 and {}, got {priority}", u32::MAX),
                        ));
                    }
                },
                None if require_priority => {
                    return Err(SimError::invalid_process(&p.id, "missing priority"));
                }
                None => None,
            };

            let latest = latest_arrival.max(arrival_time);
            match total_burst
                .checked_add(burst_time)
                .and_then(|total| total.checked_add(latest))
            {
                Some(end) => {
                    total_burst += burst_time;
                    latest_arrival = latest;
                    horizon = end;
                }
                None => {
                    return Err(SimError::invalid_process(
                        &p.id,
                        "arrival_time plus total burst overflows the clock",
                    ));
                }
            }

            valid.push(ValidProcess {
                id: p.id.clone(),
                burst_time,
                arrival_time,
                priority,
            });
        }

        Ok(Self {
            processes: valid,
            total_burst,
            horizon,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidProcess> {
        self.processes.iter()
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Sum of all bursts; a lower bound on the makespan.
    pub fn total_burst(&self) -> Ticks {
        self.total_burst
    }

    /// Latest arrival plus total burst; an upper bound on the makespan.
    pub fn horizon(&self) -> Ticks {
        self.horizon
    }
}
