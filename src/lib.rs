// src/lib.rs

//! hintframe: per-subject prioritized hint store with pooled records,
//! display dedup, and a periodic maintenance sweep.

pub mod api;
pub mod config;
pub mod diagnostics;
pub mod display;
pub mod hint;
pub mod registry;
pub mod subjects;
pub mod tasks;

pub use api::HintApi;
pub use config::HintConfig;
pub use display::{DisplayGate, DisplayInterceptor, DisplayOutcome, DisplaySink};
pub use hint::{DEFAULT_SOURCE, HintRecord, SubjectId};
pub use registry::{HintRegistry, HintStore, PooledHintRegistry};
pub use subjects::{StaticSubjects, SubjectProvider};
pub use tasks::SweepLoop;
