//! Idea pipeline stages and validation.

use crate::error::CoreError;

/// Stages a captured idea moves through, in order.
pub const PIPELINE_STAGES: &[&str] = &["idea", "brainstorm", "project", "campaign"];

/// Validate that a stage name is one of the known pipeline stages.
pub fn validate_stage(stage: &str) -> Result<(), CoreError> {
    if PIPELINE_STAGES.contains(&stage) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid stage '{stage}'. Must be one of: {}",
            PIPELINE_STAGES.join(", ")
        )))
    }
}
