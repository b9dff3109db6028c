//! Error types for the camera session.
//!
//! A single flat [`CameraError`] enum covers every failure the crate can
//! surface, split along the lines that matter to a caller: errors in the
//! caller's own input (`OutOfRange`, `InvalidState`, `NotConfigured`), faults
//! reported by the device (`VerificationFailed`, `DeviceNotReady`,
//! `Unhealthy`, `UnexpectedDeviceValue`), and failures of the driver round
//! trip itself (`DeviceUnavailable`, `Driver`, `AllocationFailed`).
//!
//! Every error is returned synchronously from the operation that triggered
//! it; nothing is retried and nothing is swallowed except the best-effort
//! cleanup calls inside `disarm`, which are logged instead.

use thiserror::Error;

use crate::driver::DriverError;
use crate::health::HealthStatus;
use crate::session::CameraState;

/// Convenience alias for results using the camera error type.
pub type CameraResult<T> = std::result::Result<T, CameraError>;

/// Errors surfaced by session, registry, buffer pool, and health monitor.
#[derive(Error, Debug)]
pub enum CameraError {
    /// Opening the camera failed. Fatal for session construction.
    #[error(
        "failed to open camera: {source}. Check that the camera is powered, \
         connected, and not held open by other software"
    )]
    DeviceUnavailable {
        /// Underlying driver report.
        #[source]
        source: DriverError,
    },

    /// A driver call failed mid-operation. Fatal for that operation.
    #[error("driver call failed: {0}")]
    Driver(#[from] DriverError),

    /// A caller-supplied value is outside its legal domain. Nothing was sent
    /// to the hardware.
    #[error("{parameter} out of range: {detail}")]
    OutOfRange {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// What the legal domain is and what was received.
        detail: String,
    },

    /// A verified write did not read back as requested; the hardware ignored
    /// or clamped the value.
    #[error("{setting} readback mismatch: requested {requested}, device reports {observed}")]
    VerificationFailed {
        /// Logical setting name.
        setting: &'static str,
        /// Value the caller asked for.
        requested: String,
        /// Value the device reported afterwards.
        observed: String,
    },

    /// The device has not completed initialisation.
    #[error("camera not ready: {0}")]
    DeviceNotReady(String),

    /// The device reported a raw value outside the setting's closed domain.
    #[error("{setting} read back undecodable device code {raw:#06x}")]
    UnexpectedDeviceValue {
        /// Logical setting name.
        setting: &'static str,
        /// Raw device word.
        raw: u16,
    },

    /// Health counters are non-zero after configuration. Hardware-level
    /// fault, not a configuration logic bug.
    #[error("camera reports unhealthy state: {0}")]
    Unhealthy(HealthStatus),

    /// Buffer allocation failed while arming; the partial batch was freed.
    #[error("buffer allocation failed at buffer {index} of {count}: {source}")]
    AllocationFailed {
        /// Index of the buffer that failed, 0-based.
        index: usize,
        /// Total buffers requested for the batch.
        count: usize,
        /// Underlying driver report.
        #[source]
        source: DriverError,
    },

    /// `arm` was called without a fully verified prior `apply_settings`.
    #[error("camera has not been configured; call apply_settings before arming")]
    NotConfigured,

    /// The operation is not legal in the session's current state.
    #[error("cannot {operation} while camera session is {state:?}")]
    InvalidState {
        /// Name of the rejected operation.
        operation: &'static str,
        /// State the session was in.
        state: CameraState,
    },

    /// Configuration file or environment parsing failed.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_unavailable_carries_guidance() {
        let err = CameraError::DeviceUnavailable {
            source: DriverError::DeviceUnavailable { slot: 0 },
        };
        let text = err.to_string();
        assert!(text.contains("powered"));
        assert!(text.contains("not held open by other software"));
    }

    #[test]
    fn test_verification_failed_display() {
        let err = CameraError::VerificationFailed {
            setting: "trigger_mode",
            requested: "ExternalTrigger".into(),
            observed: "AutoTrigger".into(),
        };
        assert_eq!(
            err.to_string(),
            "trigger_mode readback mismatch: requested ExternalTrigger, device reports AutoTrigger"
        );
    }
}
