//! Per-process completion records and run-level summary statistics.

use average::{Estimate, Mean};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize, Serializer, ser::SerializeMap};

use crate::core::{Ticks, Timeline};

/// Timing metrics of one finished process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub id: String,
    pub arrival_time: Ticks,
    pub burst_time: Ticks,
    pub completion_time: Ticks,
    pub turnaround_time: Ticks,
    pub waiting_time: Ticks,
    // Time to first run
    pub response_time: Ticks,
}

impl CompletionRecord {
    /// Derive the metrics. `burst_time` is the original total burst, not
    /// whatever was left on the last dispatch.
    pub fn new(
        id: &str,
        arrival_time: Ticks,
        burst_time: Ticks,
        first_run: Ticks,
        completion_time: Ticks,
    ) -> Self {
        debug_assert!(
            completion_time >= arrival_time + burst_time,
            "{id} finished at {completion_time}, before arrival {arrival_time} + burst {burst_time}"
        );
        let turnaround_time = completion_time - arrival_time;
        Self {
            id: id.to_owned(),
            arrival_time,
            burst_time,
            completion_time,
            turnaround_time,
            waiting_time: turnaround_time - burst_time,
            response_time: first_run - arrival_time,
        }
    }
}

/// Completion records in the order processes finished, indexed by id.
///
/// Serializes as a map from process id to record, with keys in completion
/// order.
#[derive(Debug, Clone, Default)]
pub struct CompletionTable {
    records: Vec<CompletionRecord>,
    index: FxHashMap<String, usize>,
}

impl CompletionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: CompletionRecord) {
        let previous = self.index.insert(record.id.clone(), self.records.len());
        debug_assert!(previous.is_none(), "{} completed twice", record.id);
        self.records.push(record);
    }

    pub fn get(&self, id: &str) -> Option<&CompletionRecord> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    pub fn records(&self) -> &[CompletionRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompletionRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Latest completion time, or 0 for an empty table.
    pub fn makespan(&self) -> Ticks {
        self.records
            .iter()
            .map(|r| r.completion_time)
            .max()
            .unwrap_or(0)
    }
}

impl PartialEq for CompletionTable {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
    }
}

impl Eq for CompletionTable {}

impl Serialize for CompletionTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.records.len()))?;
        for record in &self.records {
            map.serialize_entry(&record.id, record)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub processes: usize,
    pub makespan: Ticks,
    pub busy_ticks: Ticks,
    pub idle_ticks: Ticks,
    pub utilization: f64,
    pub context_switches: usize,
    // Runs that ended with service left
    pub preemptions: usize,
    pub average_turnaround: f64,
    pub average_waiting: f64,
    pub average_response: f64,
}

impl Summary {
    pub fn new(timeline: &Timeline, completions: &CompletionTable) -> Self {
        let makespan = timeline.total();
        let busy_ticks = timeline.busy_ticks();
        let utilization = if makespan == 0 {
            0.0
        } else {
            busy_ticks as f64 / makespan as f64
        };

        Self {
            processes: completions.len(),
            makespan,
            busy_ticks,
            idle_ticks: timeline.idle_ticks(),
            utilization,
            context_switches: timeline.context_switches(),
            preemptions: timeline.run_slots().saturating_sub(completions.len()),
            average_turnaround: avg(completions.iter().map(|r| r.turnaround_time as f64)),
            average_waiting: avg(completions.iter().map(|r| r.waiting_time as f64)),
            average_response: avg(completions.iter().map(|r| r.response_time as f64)),
        }
    }
}

fn avg(iter: impl Iterator<Item = f64>) -> f64 {
    iter.collect::<Mean>().estimate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_metrics() {
        let record = CompletionRecord::new("P1", 2, 6, 3, 17);
        assert_eq!(record.turnaround_time, 15);
        assert_eq!(record.waiting_time, 9);
        assert_eq!(record.response_time, 1);
    }

    #[test]
    fn test_table_lookup_keeps_completion_order() {
        let mut table = CompletionTable::new();
        table.insert(CompletionRecord::new("B", 0, 2, 0, 2));
        table.insert(CompletionRecord::new("A", 0, 3, 2, 5));

        let order: Vec<_> = table.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(order, vec!["B", "A"]);
        assert_eq!(table.get("A").map(|r| r.waiting_time), Some(2));
        assert!(table.get("C").is_none());
        assert_eq!(table.makespan(), 5);
    }

    #[test]
    fn test_table_serializes_as_id_map_in_completion_order() {
        let mut table = CompletionTable::new();
        table.insert(CompletionRecord::new("B", 0, 2, 0, 2));
        table.insert(CompletionRecord::new("A", 0, 3, 2, 5));

        let json = serde_json::to_string(&table).unwrap();
        assert!(json.starts_with(r#"{"B":{"id":"B","#));
        assert!(json.find(r#""B":"#) < json.find(r#""A":"#));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["A"]["completion_time"], 5);
        assert_eq!(value["B"]["waiting_time"], 0);
    }

    #[test]
    fn test_preemptions_count_unfinished_runs() {
        let mut timeline = Timeline::new();
        timeline.push_run("A", 2);
        timeline.push_run("B", 1);
        timeline.push_run("A", 2);
        timeline.push_run("A", 1);

        let mut table = CompletionTable::new();
        table.insert(CompletionRecord::new("B", 0, 1, 2, 3));
        table.insert(CompletionRecord::new("A", 0, 5, 0, 6));

        let summary = Summary::new(&timeline, &table);
        assert_eq!(summary.preemptions, 2);
        assert_eq!(summary.context_switches, 2);
    }

    #[test]
    fn test_summary_of_empty_run() {
        let summary = Summary::new(&Timeline::new(), &CompletionTable::new());
        assert_eq!(summary.processes, 0);
        assert_eq!(summary.makespan, 0);
        assert_eq!(summary.utilization, 0.0);
        assert_eq!(summary.preemptions, 0);
        assert_eq!(summary.average_waiting, 0.0);
    }

    #[test]
    fn test_summary_averages() {
        let mut timeline = Timeline::new();
        timeline.push_idle();
        timeline.push_run("A", 2);
        timeline.push_run("B", 1);

        let mut table = CompletionTable::new();
        table.insert(CompletionRecord::new("A", 0, 2, 1, 3));
        table.insert(CompletionRecord::new("B", 1, 1, 3, 4));

        let summary = Summary::new(&timeline, &table);
        assert_eq!(summary.makespan, 4);
        assert_eq!(summary.busy_ticks, 3);
        assert_eq!(summary.context_switches, 1);
        assert_eq!(summary.preemptions, 0);
        assert!((summary.utilization - 0.75).abs() < 1e-9);
        assert!((summary.average_turnaround - 3.0).abs() < 1e-9);
        assert!((summary.average_waiting - 1.5).abs() < 1e-9);
        assert!((summary.average_response - 1.5).abs() < 1e-9);
    }
}
