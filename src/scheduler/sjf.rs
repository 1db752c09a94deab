use super::{Dispatch, ProcKey, SchedCtx, Scheduler};
use crate::core::{RankedQueue, Ticks};

/// Non-preemptive shortest job next.
///
/// Ranked by `(burst_time, arrival_time, id)` ascending, with `id` compared
/// lexically. A chosen process keeps the CPU for its whole burst.
#[derive(Debug, Default)]
pub struct SjfScheduler {
    ready: RankedQueue<(Ticks, Ticks, String)>,
}

impl SjfScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for SjfScheduler {
    fn name(&self) -> &'static str {
        "SJF"
    }

    fn dispatch(&mut self, ctx: &SchedCtx, available: &[ProcKey]) -> Option<Dispatch> {
        for &key in available {
            if !self.ready.contains(key) {
                let proc = ctx.proc(key);
                self.ready
                    .push(key, (proc.burst_time, proc.arrival_time, proc.id.clone()));
            }
        }

        let next = self.ready.pop()?;
        Some(Dispatch::to_completion(ctx, next))
    }
}
