pub mod driver;
pub mod process;
pub mod request;
pub mod workload;

pub use driver::{Schedule, Sim, simulate, simulate_traced};
pub use process::{Process, ProcessSet, ValidProcess};
pub use request::{Algorithm, SimRequest};
