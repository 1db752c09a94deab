//! Ready-made process sets: the classic five-process demo and a seeded
//! random generator.

use rand::prelude::*;

use super::process::Process;

/// Priority given to demo processes when none is chosen.
pub const DEFAULT_PRIORITY: i64 = 5;

/// `P1(6,2) P2(2,5) P3(8,1) P4(3,0) P5(4,4)` as `(burst, arrival)`, each
/// with [`DEFAULT_PRIORITY`].
pub fn demo_processes() -> Vec<Process> {
    [("P1", 6, 2), ("P2", 2, 5), ("P3", 8, 1), ("P4", 3, 0), ("P5", 4, 4)]
        .into_iter()
        .map(|(id, burst, arrival)| Process::new(id, burst, arrival).with_priority(DEFAULT_PRIORITY))
        .collect()
}

/// Shape of a generated workload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BernoulliParams {
    pub ticks: u64,
    pub p_arrival: f64,
    pub p_short: f64,
    pub short_burst: i64,
    pub long_burst: i64,
    pub max_priority: i64,
}

impl Default for BernoulliParams {
    fn default() -> Self {
        Self {
            ticks: 50,
            p_arrival: 0.3,
            p_short: 0.3,
            short_burst: 2,
            long_burst: 6,
            max_priority: 10,
        }
    }
}

/// At each tick a process arrives with probability `p_arrival`; it is short
/// with probability `p_short`. Priorities are uniform in `1..=max_priority`.
pub fn bernoulli_processes(params: BernoulliParams, seed: u64) -> Vec<Process> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut processes = Vec::new();

    for t in 0..params.ticks {
        if rng.random::<f64>() < params.p_arrival {
            let burst = if rng.random::<f64>() < params.p_short {
                params.short_burst
            } else {
                params.long_burst
            };
            let priority = rng.random_range(1..=params.max_priority.max(1));

            processes.push(
                Process::new(format!("P{}", processes.len() + 1), burst, t as i64)
                    .with_priority(priority),
            );
        }
    }

    processes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_set() {
        let demo = demo_processes();
        let ids: Vec<_> = demo.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["P1", "P2", "P3", "P4", "P5"]);
        assert_eq!(demo[3], Process::new("P4", 3, 0).with_priority(5));
    }

    #[test]
    fn test_bernoulli_is_seeded() {
        let params = BernoulliParams::default();
        let a = bernoulli_processes(params, 7);
        let b = bernoulli_processes(params, 7);
        assert_eq!(a, b);

        for p in &a {
            assert!(p.burst_time == 2 || p.burst_time == 6);
            assert!((0..50).contains(&p.arrival_time));
            assert!(matches!(p.priority, Some(1..=10)));
        }
    }

    #[test]
    fn test_bernoulli_arrivals_nondecreasing() {
        let params = BernoulliParams {
            ticks: 200,
            p_arrival: 0.8,
            ..BernoulliParams::default()
        };
        let processes = bernoulli_processes(params, 1);
        assert!(!processes.is_empty());
        assert!(processes.windows(2).all(|w| w[0].arrival_time < w[1].arrival_time));
    }
}
