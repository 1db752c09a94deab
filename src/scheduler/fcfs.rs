use std::collections::VecDeque;

use super::{Dispatch, ProcKey, SchedCtx, Scheduler};

/// First-come-first-served. The dispatch order is fixed once, by arrival
/// time with ties in input order, and never re-evaluated.
#[derive(Debug, Default)]
pub struct FcfsScheduler {
    order: VecDeque<ProcKey>,
}

impl FcfsScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for FcfsScheduler {
    fn name(&self) -> &'static str {
        "FCFS"
    }

    fn init(&mut self, ctx: &SchedCtx) {
        let mut order: Vec<ProcKey> = ctx.working_set.iter().copied().collect();
        order.sort_by_key(|&key| {
            let proc = ctx.proc(key);
            (proc.arrival_time, proc.seq)
        });
        self.order = order.into();
    }

    fn dispatch(&mut self, ctx: &SchedCtx, available: &[ProcKey]) -> Option<Dispatch> {
        // Head not arrived yet: idle until it does
        let head = *self.order.front()?;
        if !available.contains(&head) {
            return None;
        }

        self.order.pop_front();
        Some(Dispatch::to_completion(ctx, head))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_order_by_arrival_then_input() {
        let mut ctx = SchedCtx::new();
        let late = ctx.create_proc("late", 4, 1, None);
        let first = ctx.create_proc("first", 0, 9, None);
        let tied = ctx.create_proc("tied", 4, 1, None);

        let mut fcfs = FcfsScheduler::new();
        fcfs.init(&ctx);
        assert_eq!(fcfs.order, VecDeque::from([first, late, tied]));

        // Head still unarrived: decline even if someone else is available
        ctx.advance_time(4);
        ctx.mark_ready(late);
        assert_eq!(fcfs.dispatch(&ctx, &[late]), None);

        ctx.mark_ready(first);
        let dispatch = fcfs.dispatch(&ctx, &[late, first]);
        assert_eq!(dispatch, Some(Dispatch { proc: first, run: 9 }));
    }
}
