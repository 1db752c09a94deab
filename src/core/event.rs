use serde::Serialize;

use crate::core::Ticks;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SchedEvent {
    Arrived {
        process: String,
        at: Ticks,
    },
    Dispatched {
        process: String,
        at: Ticks,
        run: Ticks,
    },
    // Quantum expired with service left; back to Ready
    Preempted {
        process: String,
        at: Ticks,
        remaining: Ticks,
    },
    Finished {
        process: String,
        at: Ticks,
    },
    // CPU idle for the tick starting at `at`
    Idle {
        at: Ticks,
    },
}
