use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

use super::process::Process;
use crate::error::{Result, SimError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Fcfs,
    Sjf,
    Priority,
    RoundRobin,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Fcfs,
        Algorithm::Sjf,
        Algorithm::Priority,
        Algorithm::RoundRobin,
    ];

    pub fn needs_quantum(self) -> bool {
        self == Algorithm::RoundRobin
    }

    pub fn needs_priority(self) -> bool {
        self == Algorithm::Priority
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Algorithm::Fcfs => "FCFS",
            Algorithm::Sjf => "SJF",
            Algorithm::Priority => "Priority",
            Algorithm::RoundRobin => "Round Robin",
        })
    }
}

impl FromStr for Algorithm {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "fcfs" | "fifo" => Ok(Algorithm::Fcfs),
            "sjf" | "sjn" => Ok(Algorithm::Sjf),
            "priority" | "prio" => Ok(Algorithm::Priority),
            "rr" | "roundrobin" => Ok(Algorithm::RoundRobin),
            _ => Err(SimError::UnknownAlgorithm(s.to_owned())),
        }
    }
}

/// Everything one run needs. Nothing survives between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimRequest {
    pub processes: Vec<Process>,
    pub algorithm: Algorithm,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantum: Option<i64>,
}

impl SimRequest {
    pub fn new(processes: Vec<Process>, algorithm: Algorithm) -> Self {
        Self {
            processes,
            algorithm,
            quantum: None,
        }
    }

    pub fn with_quantum(mut self, quantum: i64) -> Self {
        self.quantum = Some(quantum);
        self
    }

    /// The Round Robin quantum, checked. `None` for the other algorithms.
    pub fn checked_quantum(&self) -> Result<Option<NonZeroU64>> {
        if !self.algorithm.needs_quantum() {
            return Ok(None);
        }

        let quantum = self.quantum.ok_or(SimError::MissingQuantum)?;
        u64::try_from(quantum)
            .ok()
            .and_then(NonZeroU64::new)
            .map(Some)
            .ok_or(SimError::InvalidQuantum(quantum))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_algorithm_names() {
        assert_eq!("FCFS".parse::<Algorithm>().unwrap(), Algorithm::Fcfs);
        assert_eq!("sjf".parse::<Algorithm>().unwrap(), Algorithm::Sjf);
        assert_eq!("Priority".parse::<Algorithm>().unwrap(), Algorithm::Priority);
        assert_eq!("round-robin".parse::<Algorithm>().unwrap(), Algorithm::RoundRobin);
        assert_eq!("Round Robin".parse::<Algorithm>().unwrap(), Algorithm::RoundRobin);
        assert_eq!("rr".parse::<Algorithm>().unwrap(), Algorithm::RoundRobin);
        assert!(matches!(
            "lottery".parse::<Algorithm>(),
            Err(SimError::UnknownAlgorithm(name)) if name == "lottery"
        ));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.to_string().parse::<Algorithm>().unwrap(), algorithm);
        }
    }

    #[test]
    fn test_quantum_checks() {
        let rr = SimRequest::new(Vec::new(), Algorithm::RoundRobin);
        assert!(matches!(rr.checked_quantum(), Err(SimError::MissingQuantum)));
        assert!(matches!(
            rr.clone().with_quantum(0).checked_quantum(),
            Err(SimError::InvalidQuantum(0))
        ));
        assert!(matches!(
            rr.clone().with_quantum(-2).checked_quantum(),
            Err(SimError::InvalidQuantum(-2))
        ));
        assert_eq!(
            rr.with_quantum(3).checked_quantum().unwrap(),
            NonZeroU64::new(3)
        );

        // Ignored outside Round Robin
        let fcfs = SimRequest::new(Vec::new(), Algorithm::Fcfs).with_quantum(-1);
        assert_eq!(fcfs.checked_quantum().unwrap(), None);
    }
}
