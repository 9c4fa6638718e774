//! Domain pipeline state, budget and profiles

mod budget;
mod error;
mod outcome;
mod profile;
mod state;

pub use budget::{NodeKind, StepBudget};
pub use error::{NodeResultExt, PipelineError};
pub use outcome::{
    RunOutcome, BUDGET_EXCEEDED_MESSAGE, DEPARTMENT_NOT_FOUND_MESSAGE, FAILED_MESSAGE, INAPPROPRIATE_MESSAGE,
    OUT_OF_SCOPE_MESSAGE,
};
pub use profile::{
    DepartmentPolicy, ExtractorVariant, PassageFormat, PipelineProfile, RetrievalBudget,
};
pub use state::{RouterState, WorkingState};
