//! Orchestrator application layer

pub mod evaluation_run;
pub mod use_cases;
pub mod workflow;

pub use evaluation_run::{EvaluationRunner, PreparedRun};
pub use use_cases::*;
pub use workflow::{JobWorkflow, WorkflowError};
