use keyed_priority_queue::KeyedPriorityQueue;
use slotmap::{SlotMap, new_key_type};
use std::collections::VecDeque;

pub type Ticks = u64;
new_key_type! {
    pub struct ProcKey;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcStatus {
    Unarrived,
    Ready,
    Running,
    Finished,
}

#[derive(Debug)]
pub struct ProcState {
    pub id: String,
    // Position in the caller's input; final tie-breaker for stable orderings
    pub seq: usize,
    pub arrival_time: Ticks,
    pub burst_time: Ticks,
    pub priority: Option<u32>,
    pub remaining_time: Ticks,
    pub status: ProcStatus,
    pub first_run: Option<Ticks>,
    pub completion_time: Option<Ticks>,
}

/// Ordering key for [`RankedQueue`]. Smaller inner values pop first.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Rank<R>(pub R);

// KeyedPriorityQueue is a max-heap, so we need to flip-flop Rank's Ord
impl<R: Ord> PartialOrd for Rank<R> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<R: Ord> Ord for Rank<R> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other.0.cmp(&self.0)
    }
}

/// Ready queue ordered by an explicit rank; used by the non-preemptive
/// ranked policies.
#[derive(Debug)]
pub struct RankedQueue<R: Ord> {
    procs: KeyedPriorityQueue<ProcKey, Rank<R>>,
}

impl<R: Ord> RankedQueue<R> {
    pub fn new() -> Self {
        Self {
            procs: KeyedPriorityQueue::new(),
        }
    }

    pub fn push(&mut self, proc: ProcKey, rank: R) {
        let previous = self.procs.push(proc, Rank(rank));
        debug_assert!(previous.is_none(), "Process {proc:?} queued twice");
    }

    pub fn pop(&mut self) -> Option<ProcKey> {
        self.procs.pop().map(|(proc, _)| proc)
    }

    pub fn contains(&self, proc: ProcKey) -> bool {
        self.procs.get_priority(&proc).is_some()
    }

    pub fn len(&self) -> usize {
        self.procs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procs.is_empty()
    }
}

impl<R: Ord> Default for RankedQueue<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the executor and policies share during one run.
///
/// Finished processes stay in the arena with [`ProcStatus::Finished`]; only
/// the working set shrinks.
#[derive(Debug)]
pub struct SchedCtx {
    pub now: Ticks,
    pub procs: SlotMap<ProcKey, ProcState>,
    // Unfinished processes in scheduling order; Round Robin rotates it
    pub working_set: VecDeque<ProcKey>,
    pub running: Option<ProcKey>,
}

impl SchedCtx {
    pub fn new() -> Self {
        Self {
            now: 0,
            procs: SlotMap::with_key(),
            working_set: VecDeque::new(),
            running: None,
        }
    }

    pub fn create_proc(
        &mut self,
        id: &str,
        arrival_time: Ticks,
        burst_time: Ticks,
        priority: Option<u32>,
    ) -> ProcKey {
        debug_assert!(burst_time > 0, "Process {id} must need some CPU time");

        let seq = self.procs.len();
        let key = self.procs.insert(ProcState {
            id: id.to_owned(),
            seq,
            arrival_time,
            burst_time,
            priority,
            remaining_time: burst_time,
            status: ProcStatus::Unarrived,
            first_run: None,
            completion_time: None,
        });

        self.working_set.push_back(key);
        key
    }

    // Validated sets bound the clock by latest arrival + total burst
    pub fn advance_time(&mut self, delta: Ticks) {
        self.now += delta;
    }

    pub fn proc(&self, key: ProcKey) -> &ProcState {
        &self.procs[key]
    }

    pub fn proc_mut(&mut self, key: ProcKey) -> &mut ProcState {
        &mut self.procs[key]
    }

    /// Arrived, unfinished processes in working-set order.
    pub fn available(&self) -> Vec<ProcKey> {
        self.working_set
            .iter()
            .copied()
            .filter(|&key| {
                let proc = self.proc(key);
                proc.status == ProcStatus::Ready
                    && proc.arrival_time <= self.now
                    && proc.remaining_time > 0
            })
            .collect()
    }

    pub fn is_drained(&self) -> bool {
        self.working_set.is_empty()
    }

    pub fn mark_ready(&mut self, key: ProcKey) {
        let now = self.now;
        let proc = self.proc_mut(key);
        debug_assert!(
            proc.status != ProcStatus::Finished,
            "Finished process {} cannot be ready",
            proc.id
        );
        debug_assert!(
            proc.arrival_time <= now,
            "Process {} marked ready before its arrival",
            proc.id
        );
        proc.status = ProcStatus::Ready;
    }

    // Return previous status (always Ready for a valid dispatch)
    pub fn set_running(&mut self, key: ProcKey) -> ProcStatus {
        debug_assert!(
            self.running.is_none(),
            "CPU already running {:?}",
            self.running
        );

        let now = self.now;
        self.running = Some(key);
        let proc = self.proc_mut(key);
        let prev = proc.status;
        proc.status = ProcStatus::Running;
        proc.first_run.get_or_insert(now);
        prev
    }

    /// Charge `ticks` of service to `key` and return what is left.
    pub fn consume(&mut self, key: ProcKey, ticks: Ticks) -> Ticks {
        let proc = self.proc_mut(key);
        debug_assert!(
            ticks <= proc.remaining_time,
            "Process {} ran {ticks} ticks with only {} remaining",
            proc.id,
            proc.remaining_time
        );
        proc.remaining_time = proc.remaining_time.saturating_sub(ticks);
        proc.remaining_time
    }

    pub fn clear_running(&mut self) {
        self.running = None;
    }

    /// Move `key` to the back of the working set.
    pub fn requeue_back(&mut self, key: ProcKey) {
        if let Some(pos) = self.working_set.iter().position(|&k| k == key) {
            self.working_set.remove(pos);
        }
        self.working_set.push_back(key);
    }

    pub fn mark_finished(&mut self, key: ProcKey, completion_time: Ticks) {
        debug_assert_eq!(
            self.proc(key).remaining_time,
            0,
            "Finishing process with service left"
        );

        self.working_set.retain(|&k| k != key);

        let proc = self.proc_mut(key);
        proc.status = ProcStatus::Finished;
        proc.completion_time = Some(completion_time);
    }
}

impl Default for SchedCtx {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_follows_working_set_order() {
        let mut ctx = SchedCtx::new();
        let a = ctx.create_proc("A", 2, 3, None);
        let b = ctx.create_proc("B", 0, 1, None);
        let c = ctx.create_proc("C", 9, 1, None);

        ctx.advance_time(2);
        ctx.mark_ready(b);
        ctx.mark_ready(a);

        assert_eq!(ctx.available(), vec![a, b]);
        assert!(!ctx.available().contains(&c));
    }

    #[test]
    fn test_requeue_and_finish() {
        let mut ctx = SchedCtx::new();
        let a = ctx.create_proc("A", 0, 2, None);
        let b = ctx.create_proc("B", 0, 1, None);
        ctx.mark_ready(a);
        ctx.mark_ready(b);

        ctx.set_running(a);
        assert_eq!(ctx.consume(a, 1), 1);
        ctx.clear_running();
        ctx.mark_ready(a);
        ctx.requeue_back(a);
        assert_eq!(ctx.working_set, VecDeque::from([b, a]));

        ctx.set_running(b);
        assert_eq!(ctx.consume(b, 1), 0);
        ctx.clear_running();
        ctx.mark_finished(b, 2);
        assert_eq!(ctx.working_set, VecDeque::from([a]));
        assert_eq!(ctx.proc(b).status, ProcStatus::Finished);
        assert_eq!(ctx.proc(b).completion_time, Some(2));
    }

    #[test]
    fn test_ranked_queue_pops_smallest_rank() {
        let mut ctx = SchedCtx::new();
        let a = ctx.create_proc("A", 0, 5, None);
        let b = ctx.create_proc("B", 0, 2, None);
        let c = ctx.create_proc("C", 0, 2, None);

        let mut queue = RankedQueue::new();
        queue.push(a, (5u64, "A".to_string()));
        queue.push(c, (2u64, "C".to_string()));
        queue.push(b, (2u64, "B".to_string()));

        assert!(queue.contains(c));
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop(), Some(b));
        assert_eq!(queue.pop(), Some(c));
        assert_eq!(queue.pop(), Some(a));
        assert!(queue.is_empty());
    }
}
