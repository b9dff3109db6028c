//! Camera configuration loading.
//!
//! Settings come from an optional TOML file with environment-variable
//! overrides (prefix `SC2CAM_`), defaulting to the full-sensor auto-trigger
//! setup:
//!
//! ```toml
//! slot = 0
//! trigger = "auto_trigger"        # or "external_trigger"
//! exposure_us = 2200              # 107 ..= 1_000_000
//! roi = [1, 1, 2060, 2048]        # left, top, right, bottom (1-based)
//! buffer_count = 2
//! ```

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::CameraResult;
use crate::session::{AcquisitionSettings, DEFAULT_BUFFER_COUNT};
use crate::settings::{Roi, TriggerMode};

/// Camera session configuration.
///
/// Values are range-checked by `apply_settings`, not at load time, so a
/// config file with an out-of-range exposure parses fine and fails with a
/// precise error when applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Driver slot to open.
    pub slot: u16,
    /// Trigger source for the session.
    pub trigger: TriggerMode,
    /// Exposure time in microseconds.
    pub exposure_us: u32,
    /// Region of interest as `[left, top, right, bottom]`.
    pub roi: [u16; 4],
    /// Capture buffers to allocate per arm.
    pub buffer_count: usize,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            slot: 0,
            trigger: TriggerMode::AutoTrigger,
            exposure_us: 2200,
            roi: [1, 1, 2060, 2048],
            buffer_count: DEFAULT_BUFFER_COUNT,
        }
    }
}

impl CameraConfig {
    /// Load configuration from an optional TOML file plus `SC2CAM_*`
    /// environment overrides.
    pub fn new(path: Option<&str>) -> CameraResult<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path));
        }
        let config = builder
            .add_source(Environment::with_prefix("SC2CAM"))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// The acquisition settings described by this configuration.
    pub fn acquisition(&self) -> AcquisitionSettings {
        AcquisitionSettings {
            trigger: self.trigger,
            exposure_us: self.exposure_us,
            roi: Roi::from(self.roi),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = CameraConfig::new(None).unwrap();
        assert_eq!(config, CameraConfig::default());
        assert_eq!(config.trigger, TriggerMode::AutoTrigger);
        assert_eq!(config.exposure_us, 2200);
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("camera.toml");
        std::fs::write(
            &path,
            r#"
slot = 1
trigger = "external_trigger"
exposure_us = 5000
roi = [961, 841, 1440, 1320]
buffer_count = 4
"#,
        )
        .unwrap();

        let config = CameraConfig::new(path.to_str()).unwrap();
        assert_eq!(config.slot, 1);
        assert_eq!(config.trigger, TriggerMode::ExternalTrigger);
        assert_eq!(config.exposure_us, 5000);
        assert_eq!(config.acquisition().roi, Roi::new(961, 841, 1440, 1320));
        assert_eq!(config.buffer_count, 4);
    }
}
