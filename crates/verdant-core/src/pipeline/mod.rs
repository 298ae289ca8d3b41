//! The orchestration state machine for one analysis pipeline.
//!
//! The machine itself is pure: events go in, state changes and [`Command`]s
//! come out. All side effects (the two remote calls, the history append,
//! state publication) are executed by the application layer in response to
//! the emitted commands, which keeps the sequencing rules testable without
//! any I/O.

pub mod confidence;
pub mod machine;
pub mod state;

pub use confidence::smooth_confidence;
pub use machine::{Command, PipelineMachine};
pub use state::{PipelineFailure, PipelineState, RunToken};
