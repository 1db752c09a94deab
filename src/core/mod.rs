pub mod driver;
pub mod event;
pub mod metrics;
pub mod observer;
pub mod state;
pub mod timeline;

pub use driver::SchedCore;
pub use event::SchedEvent;
pub use metrics::{CompletionRecord, CompletionTable, Summary};
pub use state::{ProcKey, ProcState, ProcStatus, Rank, RankedQueue, SchedCtx, Ticks};
pub use timeline::{IDLE_LABEL, Span, Timeline, TimelineSlot};
