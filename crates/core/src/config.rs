use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, Vid2DocError, ensure_positive},
    frame_sampler::DEFAULT_FRAME_TIMEOUT,
};

/// Numeric knobs of the sectionize / sample pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Minimum section length in seconds.
    pub section_duration: f64,
    /// Seconds between sampled frames inside a section.
    pub frame_interval: f64,
    /// Sections sampled concurrently.
    pub jobs: usize,
    pub frame_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            section_duration: 60.0,
            frame_interval: 30.0,
            jobs: 1,
            frame_timeout: DEFAULT_FRAME_TIMEOUT,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("section_duration", self.section_duration)?;
        ensure_positive("frame_interval", self.frame_interval)?;

        if self.jobs == 0 {
            return Err(Vid2DocError::InvalidArgument {
                name: "jobs",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.frame_timeout.is_zero() {
            return Err(Vid2DocError::InvalidArgument {
                name: "frame_timeout",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.section_duration, 60.0);
        assert_eq!(config.frame_interval, 30.0);
    }

    #[test]
    fn test_validate_names_bad_field() {
        let cases = [
            PipelineConfig {
                section_duration: 0.0,
                ..Default::default()
            },
            PipelineConfig {
                frame_interval: -1.0,
                ..Default::default()
            },
            PipelineConfig {
                jobs: 0,
                ..Default::default()
            },
            PipelineConfig {
                frame_timeout: Duration::ZERO,
                ..Default::default()
            },
        ];
        let expected = ["section_duration", "frame_interval", "jobs", "frame_timeout"];

        for (config, field) in cases.iter().zip(expected) {
            match config.validate() {
                Err(Vid2DocError::InvalidArgument { name, .. }) => assert_eq!(name, field),
                other => panic!("expected InvalidArgument for {field}, got {other:?}"),
            }
        }
    }
}
