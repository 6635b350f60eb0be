//! CI runner boundary
//!
//! - [`context`]: Resolves inputs from flags, `INPUT_*` variables and the event payload
//! - [`outputs`]: Step outputs, job summary and workflow annotations

pub mod context;
pub mod outputs;

pub use context::{ActionContext, ContextError, Inputs, RunnerEnv};
pub use outputs::{ActionOutputs, OutputError};
