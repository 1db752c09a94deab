use super::{Dispatch, ProcKey, SchedCtx, Scheduler};
use crate::core::RankedQueue;

/// Non-preemptive priority scheduling: the lowest priority value among
/// arrived processes runs its whole burst. Ties go to the earlier input
/// position. Processes without a priority rank behind every prioritised one.
#[derive(Debug, Default)]
pub struct PriorityScheduler {
    ready: RankedQueue<(u32, usize)>,
}

impl PriorityScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for PriorityScheduler {
    fn name(&self) -> &'static str {
        "Priority"
    }

    fn dispatch(&mut self, ctx: &SchedCtx, available: &[ProcKey]) -> Option<Dispatch> {
        for &key in available {
            if !self.ready.contains(key) {
                let proc = ctx.proc(key);
                self.ready
                    .push(key, (proc.priority.unwrap_or(u32::MAX), proc.seq));
            }
        }

        let next = self.ready.pop()?;
        Some(Dispatch::to_completion(ctx, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowest_value_then_input_order() {
        let mut ctx = SchedCtx::new();
        let low = ctx.create_proc("low", 0, 4, Some(7));
        let second = ctx.create_proc("second", 0, 2, Some(1));
        let third = ctx.create_proc("third", 0, 3, Some(1));
        let unranked = ctx.create_proc("unranked", 0, 1, None);
        for key in [low, second, third, unranked] {
            ctx.mark_ready(key);
        }

        let mut prio = PriorityScheduler::new();
        let mut available = vec![low, second, third, unranked];
        let mut order = Vec::new();
        while let Some(dispatch) = prio.dispatch(&ctx, &available) {
            available.retain(|&k| k != dispatch.proc);
            order.push(ctx.proc(dispatch.proc).id.as_str());
        }

        assert_eq!(order, vec!["second", "third", "low", "unranked"]);
    }
}
