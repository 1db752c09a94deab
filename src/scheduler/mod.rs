//! Selection policies plugged into the shared executor loop.

pub mod fcfs;
pub mod priority;
pub mod round_robin;
pub mod sjf;

use crate::core::{ProcKey, SchedCtx, Ticks};
pub use fcfs::FcfsScheduler;
pub use priority::PriorityScheduler;
pub use round_robin::RoundRobinScheduler;
pub use sjf::SjfScheduler;

/// The policy's answer to "what runs next, and for how long".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub proc: ProcKey,
    pub run: Ticks,
}

impl Dispatch {
    /// Commit the whole remaining burst.
    pub fn to_completion(ctx: &SchedCtx, proc: ProcKey) -> Self {
        Self {
            proc,
            run: ctx.proc(proc).remaining_time,
        }
    }
}

pub trait Scheduler {
    fn name(&self) -> &'static str;

    /// Called once with every process loaded, before the first step.
    fn init(&mut self, _ctx: &SchedCtx) {}

    /// Pick one of `available` (arrived, unfinished, in working-set order).
    /// Only called with a non-empty slice; `None` leaves the CPU idle for a
    /// tick.
    fn dispatch(&mut self, ctx: &SchedCtx, available: &[ProcKey]) -> Option<Dispatch>;

    /// Called after every run. `runnable` is true when the process still has
    /// service left.
    fn stopping(&mut self, _ctx: &mut SchedCtx, _proc: ProcKey, _runnable: bool) {}
}
