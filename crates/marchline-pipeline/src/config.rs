//! Pipeline configuration.
//!
//! The reference behavior is driven by three compile-time constants
//! (grid step, luminance threshold, resample cap); here they are an
//! explicit configuration structure passed into the pipeline at
//! construction time, with defaults matching the reference values.

use serde::{Deserialize, Serialize};

use crate::sample::ResamplerKind;
use crate::types::{Dimensions, PipelineError};

/// Configuration for the contour extraction pipeline.
///
/// Fields are public; [`PipelineConfig::validate`] is called by the
/// coordinator before any worker thread is spawned, so an invalid
/// configuration is rejected up front rather than mid-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Grid step in pixels: one occupancy sample (and one contour tile)
    /// per `step x step` block of the working image.
    pub step: u32,

    /// Luminance threshold: a sampled pixel whose channel mean is at or
    /// below this value is foreground (grid cell = 1).
    pub threshold: u8,

    /// Maximum working-image width. A wider source is resampled down to
    /// exactly `max_width x max_height`.
    pub max_width: u32,

    /// Maximum working-image height.
    pub max_height: u32,

    /// Which resampling kernel the resize phase uses.
    pub resampler: ResamplerKind,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            step: 8,
            threshold: 200,
            max_width: 2048,
            max_height: 2048,
            resampler: ResamplerKind::default(),
        }
    }
}

impl PipelineConfig {
    /// The resample cap as [`Dimensions`].
    #[must_use]
    pub const fn max_dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.max_width,
            height: self.max_height,
        }
    }

    /// Check the configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] when `step` is zero, or
    /// when the resample cap is smaller than one grid step or smaller
    /// than the 2x2 minimum the continuous-coordinate resampler needs.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.step == 0 {
            return Err(PipelineError::InvalidConfig(
                "step must be at least 1".to_string(),
            ));
        }
        let floor = self.step.max(2);
        if self.max_width < floor || self.max_height < floor {
            return Err(PipelineError::InvalidConfig(format!(
                "resample cap {}x{} is smaller than the {floor}x{floor} minimum",
                self.max_width, self.max_height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_constants() {
        let config = PipelineConfig::default();
        assert_eq!(config.step, 8);
        assert_eq!(config.threshold, 200);
        assert_eq!(config.max_width, 2048);
        assert_eq!(config.max_height, 2048);
        assert_eq!(config.resampler, ResamplerKind::CatmullRom);
    }

    #[test]
    fn default_config_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_step_is_rejected() {
        let config = PipelineConfig {
            step: 0,
            ..PipelineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PipelineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn cap_smaller_than_step_is_rejected() {
        let config = PipelineConfig {
            step: 16,
            max_width: 8,
            max_height: 2048,
            ..PipelineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PipelineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn one_by_one_cap_is_rejected() {
        // A 1x1 working image breaks the u = x/(w-1) resample mapping.
        let config = PipelineConfig {
            step: 1,
            max_width: 1,
            max_height: 1,
            ..PipelineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PipelineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn config_serde_round_trip() {
        let config = PipelineConfig {
            step: 4,
            threshold: 128,
            max_width: 1024,
            max_height: 768,
            resampler: ResamplerKind::Nearest,
        };
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
