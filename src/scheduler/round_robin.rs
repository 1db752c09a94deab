use std::num::NonZeroU64;

use super::{Dispatch, ProcKey, SchedCtx, Scheduler};

/// Round Robin with a fixed quantum.
///
/// Picks the first arrived process in working-set order (input order to
/// start with) and runs it for at most one quantum. A process with service
/// left goes to the back of the working set.
#[derive(Debug)]
pub struct RoundRobinScheduler {
    quantum: NonZeroU64,
}

impl RoundRobinScheduler {
    pub fn new(quantum: NonZeroU64) -> Self {
        Self { quantum }
    }
}

impl Scheduler for RoundRobinScheduler {
    fn name(&self) -> &'static str {
        "Round Robin"
    }

    fn dispatch(&mut self, ctx: &SchedCtx, available: &[ProcKey]) -> Option<Dispatch> {
        let &next = available.first()?;
        let run = ctx.proc(next).remaining_time.min(self.quantum.get());
        Some(Dispatch { proc: next, run })
    }

    fn stopping(&mut self, ctx: &mut SchedCtx, proc: ProcKey, runnable: bool) {
        if runnable {
            ctx.requeue_back(proc);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantum_bounds_run() {
        let mut ctx = SchedCtx::new();
        let long = ctx.create_proc("long", 0, 5, None);
        let short = ctx.create_proc("short", 0, 1, None);
        ctx.mark_ready(long);
        ctx.mark_ready(short);

        let mut rr = RoundRobinScheduler::new(NonZeroU64::new(2).unwrap());
        assert_eq!(
            rr.dispatch(&ctx, &[long, short]),
            Some(Dispatch { proc: long, run: 2 })
        );
        assert_eq!(
            rr.dispatch(&ctx, &[short]),
            Some(Dispatch { proc: short, run: 1 })
        );
    }

    #[test]
    fn test_preempted_goes_to_back() {
        let mut ctx = SchedCtx::new();
        let a = ctx.create_proc("A", 0, 5, None);
        let b = ctx.create_proc("B", 0, 1, None);

        let mut rr = RoundRobinScheduler::new(NonZeroU64::new(2).unwrap());
        rr.stopping(&mut ctx, a, true);
        assert_eq!(ctx.working_set.iter().copied().collect::<Vec<_>>(), vec![b, a]);

        // A finished process is not rotated
        rr.stopping(&mut ctx, b, false);
        assert_eq!(ctx.working_set.iter().copied().collect::<Vec<_>>(), vec![b, a]);
    }
}
