pub mod core;
pub mod error;
pub mod scheduler;
pub mod sim;

pub use crate::core::{CompletionRecord, CompletionTable, SchedEvent, Summary, Timeline, TimelineSlot};
pub use error::{Result, SimError};
pub use scheduler::Scheduler;
pub use sim::{Algorithm, Process, Schedule, SimRequest, simulate, simulate_traced};
