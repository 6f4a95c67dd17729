use serde::{Deserialize, Serialize};

use crate::shared::{PipelineConfig, ValidationError};

/// Top-level configuration for the loader service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// The pipeline to run.
    pub pipeline: PipelineConfig,
}

impl LoaderConfig {
    /// Validates loader configuration settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.pipeline.validate()
    }
}
