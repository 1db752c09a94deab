use serde::Serialize;
use tracing::{info, trace, warn};

use super::process::ProcessSet;
use super::request::{Algorithm, SimRequest};
use crate::{
    core::{
        CompletionTable, SchedCore, SchedCtx, SchedEvent, Summary, Ticks, Timeline,
        state::ProcKey,
    },
    error::{Result, SimError},
    scheduler::{
        FcfsScheduler, PriorityScheduler, RoundRobinScheduler, Scheduler, SjfScheduler,
    },
};

/// One run: a process set driven through a policy until every process
/// finishes.
pub struct Sim<S: Scheduler> {
    pub core: SchedCore<S>,
    // Keys sorted by (arrival_time, input position)
    arrivals: Vec<ProcKey>,
    arrival_cursor: usize,
}

impl<S: Scheduler> Sim<S> {
    pub fn new(processes: &ProcessSet, scheduler: S) -> Self {
        let mut ctx = SchedCtx::new();
        for p in processes.iter() {
            ctx.create_proc(&p.id, p.arrival_time, p.burst_time, p.priority);
        }

        let mut arrivals: Vec<ProcKey> = ctx.working_set.iter().copied().collect();
        arrivals.sort_by_key(|&key| {
            let proc = ctx.proc(key);
            (proc.arrival_time, proc.seq)
        });

        Self {
            core: SchedCore::new(ctx, scheduler),
            arrivals,
            arrival_cursor: 0,
        }
    }

    pub fn step(&mut self) -> Vec<SchedEvent> {
        let mut events = self.handle_arrivals();
        events.extend(self.core.tick());
        events
    }

    fn handle_arrivals(&mut self) -> Vec<SchedEvent> {
        let now = self.core.now();
        let mut events = Vec::new();

        // Contiguous, since arrivals are sorted
        while let Some(&key) = self.arrivals.get(self.arrival_cursor) {
            let proc = self.core.ctx.proc(key);
            if proc.arrival_time > now {
                break;
            }

            trace!(process = %proc.id, arrival = proc.arrival_time, now, "arrived");
            events.push(SchedEvent::Arrived {
                process: proc.id.clone(),
                at: proc.arrival_time,
            });
            self.core.ctx.mark_ready(key);
            self.arrival_cursor += 1;
        }

        events
    }

    pub fn all_processes_completed(&self) -> bool {
        self.core.is_done()
    }

    pub fn run_to_completion(mut self, mut on_event: impl FnMut(&SchedEvent)) -> Schedule {
        while !self.all_processes_completed() {
            for event in self.step() {
                on_event(&event);
            }
        }
        self.finish()
    }

    fn finish(self) -> Schedule {
        let policy = self.core.scheduler.name();
        let steps = self.core.observer().steps();
        let (timeline, completions) = self.core.into_results();
        info!(
            policy,
            steps,
            makespan = timeline.total(),
            processes = completions.len(),
            "simulation complete"
        );
        Schedule {
            timeline,
            completions,
        }
    }
}

/// Result of a run: the Gantt timeline and the completion table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schedule {
    pub timeline: Timeline,
    pub completions: CompletionTable,
}

impl Schedule {
    /// Slot labels in execution order: `"Idle"` or a process id.
    pub fn gantt(&self) -> Vec<String> {
        self.timeline.labels()
    }

    pub fn makespan(&self) -> Ticks {
        self.timeline.total()
    }

    pub fn summary(&self) -> Summary {
        Summary::new(&self.timeline, &self.completions)
    }
}

/// Validate `request` and run it to completion.
pub fn simulate(request: &SimRequest) -> Result<Schedule> {
    simulate_traced(request, |_| {})
}

/// Like [`simulate`], also reporting every [`SchedEvent`] as it happens.
pub fn simulate_traced(
    request: &SimRequest,
    on_event: impl FnMut(&SchedEvent),
) -> Result<Schedule> {
    let algorithm = request.algorithm;
    let quantum = request.checked_quantum()?;
    if quantum.is_none() && request.quantum.is_some() {
        warn!(%algorithm, "quantum ignored outside round robin");
    }

    let processes = ProcessSet::validate(&request.processes, algorithm.needs_priority())?;
    if processes.is_empty() {
        info!(%algorithm, "no processes supplied, empty schedule");
        return Ok(Schedule::default());
    }

    info!(
        %algorithm,
        processes = processes.len(),
        total_burst = processes.total_burst(),
        horizon = processes.horizon(),
        "starting simulation"
    );

    let schedule = match algorithm {
        Algorithm::Fcfs => Sim::new(&processes, FcfsScheduler::new()).run_to_completion(on_event),
        Algorithm::Sjf => Sim::new(&processes, SjfScheduler::new()).run_to_completion(on_event),
        Algorithm::Priority => {
            Sim::new(&processes, PriorityScheduler::new()).run_to_completion(on_event)
        }
        Algorithm::RoundRobin => {
            let quantum = quantum.ok_or(SimError::MissingQuantum)?;
            Sim::new(&processes, RoundRobinScheduler::new(quantum)).run_to_completion(on_event)
        }
    };

    Ok(schedule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Process;

    fn set(processes: &[Process]) -> ProcessSet {
        ProcessSet::validate(processes, false).unwrap()
    }

    #[test]
    fn test_step_reports_arrivals_before_dispatch() {
        let processes = set(&[Process::new("A", 2, 1), Process::new("B", 1, 1)]);
        let mut sim = Sim::new(&processes, FcfsScheduler::new());

        assert_eq!(sim.step(), vec![SchedEvent::Idle { at: 0 }]);
        assert_eq!(
            sim.step(),
            vec![
                SchedEvent::Arrived {
                    process: "A".to_owned(),
                    at: 1
                },
                SchedEvent::Arrived {
                    process: "B".to_owned(),
                    at: 1
                },
                SchedEvent::Dispatched {
                    process: "A".to_owned(),
                    at: 1,
                    run: 2
                },
                SchedEvent::Finished {
                    process: "A".to_owned(),
                    at: 3
                },
            ]
        );
        assert!(!sim.all_processes_completed());

        sim.step();
        assert!(sim.all_processes_completed());
        assert_eq!(sim.core.observer().steps(), 3);
        assert_eq!(sim.core.now(), 4);
    }

    #[test]
    fn test_run_to_completion_collects_results() {
        let processes = set(&[Process::new("A", 3, 0), Process::new("B", 2, 0)]);
        let quantum = std::num::NonZeroU64::new(2).unwrap();
        let mut dispatches = 0;

        let schedule = Sim::new(&processes, RoundRobinScheduler::new(quantum))
            .run_to_completion(|event| {
                if matches!(event, SchedEvent::Dispatched { .. }) {
                    dispatches += 1;
                }
            });

        assert_eq!(dispatches, 3);
        assert_eq!(schedule.gantt(), vec!["A", "B", "A"]);
        assert_eq!(schedule.makespan(), 5);
        assert_eq!(schedule.summary().context_switches, 2);
    }
}
