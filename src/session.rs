//! Camera session state machine.
//!
//! A [`CameraSession`] owns the device handle for its whole lifetime and is
//! the only way to drive the camera: `open` → `apply_settings` → `arm` →
//! `disarm` → `close`. Every operation is gated on the current
//! [`CameraState`]; settings only change while disarmed, arming requires a
//! verified configuration and fresh buffers, and disarm is always safe to
//! call.
//!
//! The session is deliberately single-threaded: every driver call is a
//! blocking round trip and there is no internal locking. Callers that share
//! a session across threads must serialise access themselves.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::buffers::BufferPool;
use crate::config::CameraConfig;
use crate::driver::{CameraDriver, CameraHandle};
use crate::error::{CameraError, CameraResult};
use crate::health::{HealthMonitor, HealthStatus, Temperature};
use crate::settings::{
    AcquireMode, ExposureTiming, RecorderSubmode, Roi, SensorFormat, SettingsRegistry,
    SettingsSnapshot, StorageMode, TriggerMode,
};

/// Shortest accepted exposure in microseconds.
pub const EXPOSURE_MIN_US: u32 = 107;
/// Longest accepted exposure in microseconds.
pub const EXPOSURE_MAX_US: u32 = 1_000_000;
/// Capture buffers allocated per arm unless configured otherwise.
pub const DEFAULT_BUFFER_COUNT: usize = 2;

/// Session lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraState {
    /// No device handle; the session is finished.
    Closed,
    /// Open with recording off and no capture buffers.
    Disarmed,
    /// Recording on with the buffer set allocated.
    Armed,
}

/// Caller-facing configuration surface of `apply_settings`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcquisitionSettings {
    /// What starts each exposure; only `AutoTrigger` and `ExternalTrigger`
    /// are accepted here.
    pub trigger: TriggerMode,
    /// Exposure time in microseconds, within
    /// [`EXPOSURE_MIN_US`, `EXPOSURE_MAX_US`].
    pub exposure_us: u32,
    /// Region of interest to read out.
    pub roi: Roi,
}

/// Settings as read back from the device after a verified apply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppliedSettings {
    /// Verified trigger mode.
    pub trigger: TriggerMode,
    /// Verified exposure, normalised to microseconds.
    pub exposure_us: f64,
    /// Verified region of interest.
    pub roi: Roi,
}

/// Exclusive owner of one camera from open to close.
pub struct CameraSession {
    driver: Arc<dyn CameraDriver>,
    handle: CameraHandle,
    registry: SettingsRegistry,
    health: HealthMonitor,
    state: CameraState,
    sensor_size: (u16, u16),
    snapshot: SettingsSnapshot,
    buffers: BufferPool,
    buffer_count: usize,
    configured: bool,
}

impl std::fmt::Debug for CameraSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraSession")
            .field("handle", &self.handle)
            .field("state", &self.state)
            .field("sensor_size", &self.sensor_size)
            .field("buffer_count", &self.buffer_count)
            .field("configured", &self.configured)
            .finish_non_exhaustive()
    }
}

impl CameraSession {
    /// Open the camera on `slot` and force it into the disarmed state.
    ///
    /// Snapshots every setting from the device and logs health and
    /// temperature. A failed open is fatal: the returned error says to check
    /// that the camera is powered, connected, and not held by other
    /// software.
    pub fn open(driver: Arc<dyn CameraDriver>, slot: u16) -> CameraResult<Self> {
        let handle = driver
            .open(slot)
            .map_err(|source| CameraError::DeviceUnavailable { source })?;
        info!("camera open on slot {slot}");
        match Self::initialise(driver.clone(), handle) {
            Ok(session) => Ok(session),
            Err(err) => {
                // don't leak the handle when setup after open fails
                if let Err(close_err) = driver.close(handle) {
                    warn!("failed to close camera after setup error: {close_err}");
                }
                Err(err)
            }
        }
    }

    /// Open the slot named by `config` and apply its acquisition settings.
    pub fn from_config(driver: Arc<dyn CameraDriver>, config: &CameraConfig) -> CameraResult<Self> {
        let mut session = Self::open(driver, config.slot)?;
        session.buffer_count = config.buffer_count;
        session.apply_settings(&config.acquisition())?;
        Ok(session)
    }

    fn initialise(driver: Arc<dyn CameraDriver>, handle: CameraHandle) -> CameraResult<Self> {
        // the device may still carry recording state from a previous owner
        driver.set_recording_state(handle, false)?;

        let registry = SettingsRegistry::new(driver.clone(), handle);
        let health = HealthMonitor::new(driver.clone(), handle);
        let sensor_size = driver.sensor_size(handle)?;
        let snapshot = registry.snapshot()?;

        let status = health.status()?;
        let temperature = health.temperature()?;
        info!(
            "camera health {status}; ccd {:.1} C, camera {} C, power supply {} C",
            temperature.ccd_celsius, temperature.camera_celsius, temperature.power_celsius
        );

        Ok(Self {
            driver,
            handle,
            registry,
            health,
            state: CameraState::Disarmed,
            sensor_size,
            snapshot,
            buffers: BufferPool::empty(),
            buffer_count: DEFAULT_BUFFER_COUNT,
            configured: false,
        })
    }

    /// Validate, apply, and verify a full acquisition configuration.
    ///
    /// The caller's values are checked before any driver call. The session
    /// then disarms, resets the device to factory defaults, and writes the
    /// settings in a fixed order (sensor format, trigger, storage mode,
    /// recorder submode, acquire mode, timing, ROI), each one independently
    /// verified by readback. Afterwards the pixel rate must be non-zero and
    /// the health counters all zero.
    ///
    /// On failure the session stays disarmed; device settings may be
    /// partially applied, but the cached snapshot keeps the last fully
    /// verified values.
    pub fn apply_settings(&mut self, settings: &AcquisitionSettings) -> CameraResult<AppliedSettings> {
        if self.state == CameraState::Closed {
            return Err(CameraError::InvalidState {
                operation: "apply settings",
                state: self.state,
            });
        }

        match settings.trigger {
            TriggerMode::AutoTrigger | TriggerMode::ExternalTrigger => {}
            other => {
                return Err(CameraError::OutOfRange {
                    parameter: "trigger",
                    detail: format!(
                        "{other:?} cannot be applied; sessions accept AutoTrigger or ExternalTrigger"
                    ),
                })
            }
        }
        if !(EXPOSURE_MIN_US..=EXPOSURE_MAX_US).contains(&settings.exposure_us) {
            return Err(CameraError::OutOfRange {
                parameter: "exposure_us",
                detail: format!(
                    "{} is outside [{EXPOSURE_MIN_US}, {EXPOSURE_MAX_US}]",
                    settings.exposure_us
                ),
            });
        }
        settings.roi.validate(self.sensor_size)?;

        self.disarm();
        info!("applying settings to camera");
        self.configured = false;

        self.driver.reset_to_default(self.handle)?;
        self.registry.set_sensor_format(SensorFormat::Standard)?;
        self.registry.set_trigger_mode(settings.trigger)?;
        self.registry.set_storage_mode(StorageMode::Recorder)?;
        self.registry.set_recorder_submode(RecorderSubmode::RingBuffer)?;
        self.registry.set_acquire_mode(AcquireMode::Auto)?;
        self.registry
            .set_timing(ExposureTiming::from_exposure_us(settings.exposure_us))?;
        self.registry.set_roi(settings.roi)?;
        self.registry.pixel_rate()?;
        self.health.ensure_healthy()?;

        self.snapshot = self.registry.snapshot()?;
        self.configured = true;

        let applied = AppliedSettings {
            trigger: self.snapshot.trigger_mode,
            exposure_us: self.snapshot.timing.exposure_us(),
            roi: self.snapshot.roi,
        };
        info!(
            "settings applied and verified: trigger {:?}, exposure {} us, ROI ({}, {}, {}, {})",
            applied.trigger,
            applied.exposure_us,
            applied.roi.left,
            applied.roi.top,
            applied.roi.right,
            applied.roi.bottom
        );
        Ok(applied)
    }

    /// Allocate the capture buffer set and enable recording.
    ///
    /// Buffers are sized from the ROI current on the device at arm time.
    /// If allocation or the recording-state call fails the session stays
    /// disarmed with no buffers retained.
    pub fn arm(&mut self) -> CameraResult<()> {
        match self.state {
            CameraState::Disarmed => {}
            state => {
                return Err(CameraError::InvalidState {
                    operation: "arm",
                    state,
                })
            }
        }
        if !self.configured {
            return Err(CameraError::NotConfigured);
        }

        let roi = self.registry.roi()?;
        let bytes = roi.frame_bytes();
        info!(
            "arming camera: {} buffers of {bytes} bytes for a {} x {} ROI",
            self.buffer_count,
            roi.width(),
            roi.height()
        );
        self.buffers =
            BufferPool::allocate(self.driver.as_ref(), self.handle, self.buffer_count, bytes)?;

        if let Err(err) = self.driver.set_recording_state(self.handle, true) {
            warn!("recording state rejected, releasing buffers: {err}");
            self.buffers.release(self.driver.as_ref(), self.handle);
            return Err(err.into());
        }
        self.state = CameraState::Armed;
        Ok(())
    }

    /// Turn recording off and release every capture buffer.
    ///
    /// Idempotent and callable in any state; a no-op once closed. Driver
    /// failures during teardown are logged rather than raised so disarm is
    /// always safe on cleanup paths.
    pub fn disarm(&mut self) {
        if self.state == CameraState::Closed {
            return;
        }
        debug!("disarming camera");
        if let Err(err) = self.driver.set_recording_state(self.handle, false) {
            warn!("failed to turn recording state off during disarm: {err}");
        }
        self.buffers.release(self.driver.as_ref(), self.handle);
        self.state = CameraState::Disarmed;
    }

    /// Release the device handle. Requires the disarmed state.
    pub fn close(&mut self) -> CameraResult<()> {
        match self.state {
            CameraState::Closed => Ok(()),
            CameraState::Armed => Err(CameraError::InvalidState {
                operation: "close",
                state: self.state,
            }),
            CameraState::Disarmed => {
                info!("closing camera");
                self.driver.close(self.handle)?;
                self.state = CameraState::Closed;
                Ok(())
            }
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CameraState {
        self.state
    }

    /// Last fully verified settings snapshot.
    pub fn settings(&self) -> &SettingsSnapshot {
        &self.snapshot
    }

    /// Number of capture buffers currently allocated.
    pub fn allocated_buffers(&self) -> usize {
        self.buffers.len()
    }

    /// Read the device health counters.
    pub fn health(&self) -> CameraResult<HealthStatus> {
        self.health.status()
    }

    /// Read the device temperatures.
    pub fn temperature(&self) -> CameraResult<Temperature> {
        self.health.temperature()
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        if self.state == CameraState::Closed {
            return;
        }
        self.disarm();
        if let Err(err) = self.driver.close(self.handle) {
            warn!("failed to close camera during teardown: {err}");
        }
        self.state = CameraState::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::MockCameraDriver;

    fn open_session() -> (Arc<MockCameraDriver>, CameraSession) {
        let driver = Arc::new(MockCameraDriver::new());
        let session = CameraSession::open(driver.clone(), 0).unwrap();
        (driver, session)
    }

    fn default_settings() -> AcquisitionSettings {
        AcquisitionSettings {
            trigger: TriggerMode::AutoTrigger,
            exposure_us: 2200,
            roi: Roi::new(1, 1, 2060, 2048),
        }
    }

    #[test]
    fn test_exposure_bounds_are_inclusive() {
        let (_driver, mut session) = open_session();

        for exposure_us in [106, 1_000_001] {
            let err = session
                .apply_settings(&AcquisitionSettings {
                    exposure_us,
                    ..default_settings()
                })
                .unwrap_err();
            assert!(
                matches!(err, CameraError::OutOfRange { parameter, .. } if parameter == "exposure_us")
            );
        }
        for exposure_us in [107, 1_000_000] {
            session
                .apply_settings(&AcquisitionSettings {
                    exposure_us,
                    ..default_settings()
                })
                .unwrap();
        }
    }

    #[test]
    fn test_software_trigger_rejected_at_call_site() {
        let (driver, mut session) = open_session();
        let calls_before = driver.calls();
        let err = session
            .apply_settings(&AcquisitionSettings {
                trigger: TriggerMode::SoftwareTrigger,
                ..default_settings()
            })
            .unwrap_err();
        assert!(matches!(err, CameraError::OutOfRange { .. }));
        assert_eq!(driver.calls(), calls_before);
    }

    #[test]
    fn test_arm_requires_prior_apply_settings() {
        let (_driver, mut session) = open_session();
        assert!(matches!(session.arm(), Err(CameraError::NotConfigured)));
        assert_eq!(session.state(), CameraState::Disarmed);
    }

    #[test]
    fn test_failed_apply_invalidates_configuration() {
        let (driver, mut session) = open_session();
        session.apply_settings(&default_settings()).unwrap();

        driver.set_health(0, 1, 0);
        assert!(session.apply_settings(&default_settings()).is_err());
        driver.set_health(0, 0, 0);

        // the earlier verified configuration no longer licenses arming
        assert!(matches!(session.arm(), Err(CameraError::NotConfigured)));
    }
}
