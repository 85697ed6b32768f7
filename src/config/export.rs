//! Export configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::error::ValidationError;
use crate::application::{ExportSettings, PollSchedule};
use crate::domain::export::ArtifactDelivery;

/// PDF export configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Seconds between status polls
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Polls before the job is reported as timed out
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,

    /// Whether the PDF is uploaded to the channel or linked
    #[serde(default)]
    pub delivery: ArtifactDelivery,

    /// Directory for transient PDF files (default: system temp dir)
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,
}

impl ExportConfig {
    pub fn schedule(&self) -> PollSchedule {
        PollSchedule::new(
            Duration::from_secs(self.poll_interval_secs),
            self.max_poll_attempts,
        )
    }

    pub fn settings(&self) -> ExportSettings {
        ExportSettings {
            schedule: self.schedule(),
            delivery: self.delivery,
        }
    }

    pub fn scratch_dir(&self) -> PathBuf {
        self.scratch_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("quip-pdf-bot"))
    }

    /// Validate export configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.poll_interval_secs == 0 || self.poll_interval_secs > 60 {
            return Err(ValidationError::InvalidPollInterval);
        }
        if self.max_poll_attempts == 0 || self.max_poll_attempts > 1000 {
            return Err(ValidationError::InvalidPollAttempts);
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            max_poll_attempts: default_max_poll_attempts(),
            delivery: ArtifactDelivery::default(),
            scratch_dir: None,
        }
    }
}

fn default_poll_interval() -> u64 {
    3
}

fn default_max_poll_attempts() -> u32 {
    60
}
