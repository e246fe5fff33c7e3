//! State providers backed by recorded observations.

pub mod trace;

pub use trace::{StateTrace, TraceRecord, TraceStateProvider};
