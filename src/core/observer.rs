use super::{
    state::{ProcStatus, SchedCtx},
    timeline::Timeline,
};

#[derive(Debug, Default)]
pub struct Observer {
    step: u64,
}

impl Observer {
    pub fn new() -> Self {
        Self { step: 0 }
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    // Invariants that must hold between steps
    pub fn observe(&mut self, ctx: &SchedCtx, timeline: &Timeline) {
        self.step += 1;

        debug_assert!(
            ctx.running.is_none(),
            "CPU still owned by {:?} between steps",
            ctx.running
        );
        debug_assert_eq!(
            timeline.total(),
            ctx.now,
            "Timeline covers {} ticks but clock is at {}",
            timeline.total(),
            ctx.now
        );

        for &key in &ctx.working_set {
            let proc = ctx.proc(key);
            debug_assert_ne!(
                proc.status,
                ProcStatus::Finished,
                "Finished process {} still in working set",
                proc.id
            );
            debug_assert!(
                proc.remaining_time > 0 && proc.remaining_time <= proc.burst_time,
                "Process {} has remaining {} outside (0, {}]",
                proc.id,
                proc.remaining_time,
                proc.burst_time
            );
        }
    }
}
