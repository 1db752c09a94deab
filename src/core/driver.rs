use tracing::{debug, trace};

use super::{
    event::SchedEvent,
    metrics::{CompletionRecord, CompletionTable},
    observer::Observer,
    state::{ProcKey, ProcStatus, SchedCtx, Ticks},
    timeline::Timeline,
};
use crate::scheduler::{Dispatch, Scheduler};

/// The shared executor loop: one uniprocessor, one discrete clock.
pub struct SchedCore<S: Scheduler> {
    pub ctx: SchedCtx,
    pub scheduler: S,
    timeline: Timeline,
    completions: CompletionTable,
    observer: Observer,
}

impl<S: Scheduler> SchedCore<S> {
    pub fn new(ctx: SchedCtx, mut scheduler: S) -> Self {
        scheduler.init(&ctx);
        Self {
            ctx,
            scheduler,
            timeline: Timeline::new(),
            completions: CompletionTable::new(),
            observer: Observer::new(),
        }
    }

    /// Emit one slot: either a single idle tick or one dispatch.
    pub fn tick(&mut self) -> Vec<SchedEvent> {
        let mut events = Vec::new();

        let available = self.ctx.available();
        let dispatch = if available.is_empty() {
            None
        } else {
            self.scheduler.dispatch(&self.ctx, &available)
        };

        match dispatch {
            Some(dispatch) => {
                debug_assert!(
                    available.contains(&dispatch.proc),
                    "{} dispatched a process that is not available",
                    self.scheduler.name()
                );
                self.run(dispatch, &mut events);
            }
            None => {
                trace!(now = self.ctx.now, "cpu idle");
                events.push(SchedEvent::Idle { at: self.ctx.now });
                self.timeline.push_idle();
                self.ctx.advance_time(1);
            }
        }

        self.observer.observe(&self.ctx, &self.timeline);
        events
    }

    fn run(&mut self, dispatch: Dispatch, events: &mut Vec<SchedEvent>) {
        let Dispatch { proc: key, run } = dispatch;
        debug_assert!(run > 0, "Dispatch must make progress");

        let start = self.ctx.now;
        let prev = self.ctx.set_running(key);
        debug_assert_eq!(prev, ProcStatus::Ready);

        let id = self.ctx.proc(key).id.clone();
        debug!(process = %id, start, run, policy = self.scheduler.name(), "dispatch");
        events.push(SchedEvent::Dispatched {
            process: id.clone(),
            at: start,
            run,
        });

        self.ctx.advance_time(run);
        let remaining = self.ctx.consume(key, run);
        self.timeline.push_run(&id, run);
        self.ctx.clear_running();

        if remaining == 0 {
            self.finish(key, events);
            self.scheduler.stopping(&mut self.ctx, key, false);
        } else {
            self.ctx.mark_ready(key);
            events.push(SchedEvent::Preempted {
                process: id,
                at: self.ctx.now,
                remaining,
            });
            self.scheduler.stopping(&mut self.ctx, key, true);
        }
    }

    fn finish(&mut self, key: ProcKey, events: &mut Vec<SchedEvent>) {
        let now = self.ctx.now;
        self.ctx.mark_finished(key, now);

        let proc = self.ctx.proc(key);
        let record = CompletionRecord::new(
            &proc.id,
            proc.arrival_time,
            proc.burst_time,
            proc.first_run.unwrap_or(now),
            now,
        );
        debug!(
            process = %proc.id,
            completion = record.completion_time,
            waiting = record.waiting_time,
            "finished"
        );
        events.push(SchedEvent::Finished {
            process: proc.id.clone(),
            at: now,
        });
        self.completions.insert(record);
    }

    pub fn is_done(&self) -> bool {
        self.ctx.is_drained()
    }

    pub fn now(&self) -> Ticks {
        self.ctx.now
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn completions(&self) -> &CompletionTable {
        &self.completions
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }

    pub fn into_results(self) -> (Timeline, CompletionTable) {
        (self.timeline, self.completions)
    }
}
