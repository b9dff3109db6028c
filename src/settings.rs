//! Camera settings: typed values, device-code mapping, and the
//! write-then-verify registry.
//!
//! Every mutable setting is a closed enumeration with a bidirectional
//! mapping to its device code, checked at compile time by exhaustive
//! matches. The [`SettingsRegistry`] applies one setting at a time with a
//! write-then-verify round trip: the hardware may silently ignore or clamp
//! an out-of-range or state-inappropriate write, so reading the value back
//! is the only reliable acknowledgment.

use std::fmt;
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::driver::{CameraDriver, CameraHandle, DriverResult};
use crate::error::{CameraError, CameraResult};

/// Bytes per pixel of the 16-bit monochrome readout format.
pub const BYTES_PER_PIXEL: u32 = 2;

// =============================================================================
// Mode enumerations
// =============================================================================

/// A closed mode setting with a bidirectional device-code mapping.
///
/// `code`/`from_code` pair each variant with its raw device word;
/// `read`/`write` name the driver calls that carry it.
pub trait DeviceMode: Copy + Eq + fmt::Debug {
    /// Logical setting name used in errors and logs.
    const SETTING: &'static str;

    /// Device code for this value.
    fn code(self) -> u16;

    /// Decode a device code; `None` when the code is outside the domain.
    fn from_code(code: u16) -> Option<Self>;

    /// Issue the getter for this setting.
    fn read(driver: &dyn CameraDriver, handle: CameraHandle) -> DriverResult<u16>;

    /// Issue the setter for this setting.
    fn write(driver: &dyn CameraDriver, handle: CameraHandle, raw: u16) -> DriverResult<()>;
}

/// Sensor readout format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorFormat {
    /// Standard sensor area.
    Standard,
    /// Extended sensor area.
    Extended,
}

impl DeviceMode for SensorFormat {
    const SETTING: &'static str = "sensor_format";

    fn code(self) -> u16 {
        match self {
            SensorFormat::Standard => 0,
            SensorFormat::Extended => 1,
        }
    }

    fn from_code(code: u16) -> Option<Self> {
        match code {
            0 => Some(SensorFormat::Standard),
            1 => Some(SensorFormat::Extended),
            _ => None,
        }
    }

    fn read(driver: &dyn CameraDriver, handle: CameraHandle) -> DriverResult<u16> {
        driver.get_sensor_format(handle)
    }

    fn write(driver: &dyn CameraDriver, handle: CameraHandle, raw: u16) -> DriverResult<()> {
        driver.set_sensor_format(handle, raw)
    }
}

/// What starts each exposure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerMode {
    /// Exposures start automatically, overlapped with readout.
    AutoTrigger,
    /// Exposures start only on a force-trigger command.
    SoftwareTrigger,
    /// A delay/exposure sequence starts on the trigger input edge.
    ExternalTrigger,
    /// Exposure time is defined by the pulse length at the trigger input.
    ExternalExposure,
}

impl DeviceMode for TriggerMode {
    const SETTING: &'static str = "trigger_mode";

    fn code(self) -> u16 {
        match self {
            TriggerMode::AutoTrigger => 0,
            TriggerMode::SoftwareTrigger => 1,
            TriggerMode::ExternalTrigger => 2,
            TriggerMode::ExternalExposure => 3,
        }
    }

    fn from_code(code: u16) -> Option<Self> {
        match code {
            0 => Some(TriggerMode::AutoTrigger),
            1 => Some(TriggerMode::SoftwareTrigger),
            2 => Some(TriggerMode::ExternalTrigger),
            3 => Some(TriggerMode::ExternalExposure),
            _ => None,
        }
    }

    fn read(driver: &dyn CameraDriver, handle: CameraHandle) -> DriverResult<u16> {
        driver.get_trigger_mode(handle)
    }

    fn write(driver: &dyn CameraDriver, handle: CameraHandle, raw: u16) -> DriverResult<()> {
        driver.set_trigger_mode(handle, raw)
    }
}

/// Where captured frames are stored on the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageMode {
    /// Camera-internal recorder memory.
    Recorder,
    /// FIFO buffer streaming.
    FifoBuffer,
}

impl DeviceMode for StorageMode {
    const SETTING: &'static str = "storage_mode";

    fn code(self) -> u16 {
        match self {
            StorageMode::Recorder => 0,
            StorageMode::FifoBuffer => 1,
        }
    }

    fn from_code(code: u16) -> Option<Self> {
        match code {
            0 => Some(StorageMode::Recorder),
            1 => Some(StorageMode::FifoBuffer),
            _ => None,
        }
    }

    fn read(driver: &dyn CameraDriver, handle: CameraHandle) -> DriverResult<u16> {
        driver.get_storage_mode(handle)
    }

    fn write(driver: &dyn CameraDriver, handle: CameraHandle, raw: u16) -> DriverResult<()> {
        driver.set_storage_mode(handle, raw)
    }
}

/// Whether the recorder wraps or stops at first fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecorderSubmode {
    /// Recording stops when the buffer is full.
    Sequence,
    /// Recording wraps, overwriting the oldest frames.
    RingBuffer,
}

impl DeviceMode for RecorderSubmode {
    const SETTING: &'static str = "recorder_submode";

    fn code(self) -> u16 {
        match self {
            RecorderSubmode::Sequence => 0,
            RecorderSubmode::RingBuffer => 1,
        }
    }

    fn from_code(code: u16) -> Option<Self> {
        match code {
            0 => Some(RecorderSubmode::Sequence),
            1 => Some(RecorderSubmode::RingBuffer),
            _ => None,
        }
    }

    fn read(driver: &dyn CameraDriver, handle: CameraHandle) -> DriverResult<u16> {
        driver.get_recorder_submode(handle)
    }

    fn write(driver: &dyn CameraDriver, handle: CameraHandle, raw: u16) -> DriverResult<()> {
        driver.set_recorder_submode(handle, raw)
    }
}

/// Acquire gating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquireMode {
    /// All frames are acquired.
    Auto,
    /// Acquisition gated by a static external signal level.
    ExternalStatic,
    /// Acquisition gated dynamically by an external signal.
    ExternalDynamic,
}

impl DeviceMode for AcquireMode {
    const SETTING: &'static str = "acquire_mode";

    fn code(self) -> u16 {
        match self {
            AcquireMode::Auto => 0,
            AcquireMode::ExternalStatic => 1,
            AcquireMode::ExternalDynamic => 2,
        }
    }

    fn from_code(code: u16) -> Option<Self> {
        match code {
            0 => Some(AcquireMode::Auto),
            1 => Some(AcquireMode::ExternalStatic),
            2 => Some(AcquireMode::ExternalDynamic),
            _ => None,
        }
    }

    fn read(driver: &dyn CameraDriver, handle: CameraHandle) -> DriverResult<u16> {
        driver.get_acquire_mode(handle)
    }

    fn write(driver: &dyn CameraDriver, handle: CameraHandle, raw: u16) -> DriverResult<()> {
        driver.set_acquire_mode(handle, raw)
    }
}

/// Time base for delay and exposure values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timebase {
    /// Value is in nanoseconds.
    Nanoseconds,
    /// Value is in microseconds.
    Microseconds,
    /// Value is in milliseconds.
    Milliseconds,
}

impl Timebase {
    /// Device code for this time base.
    pub fn code(self) -> u16 {
        match self {
            Timebase::Nanoseconds => 0,
            Timebase::Microseconds => 1,
            Timebase::Milliseconds => 2,
        }
    }

    /// Decode a device time-base code.
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            0 => Some(Timebase::Nanoseconds),
            1 => Some(Timebase::Microseconds),
            2 => Some(Timebase::Milliseconds),
            _ => None,
        }
    }
}

// =============================================================================
// Timing and geometry
// =============================================================================

/// Delay and exposure timing as held by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExposureTiming {
    /// Delay before exposure starts, in `delay_base` units.
    pub delay: u32,
    /// Exposure length, in `exposure_base` units.
    pub exposure: u32,
    /// Time base for the delay value.
    pub delay_base: Timebase,
    /// Time base for the exposure value.
    pub exposure_base: Timebase,
}

impl ExposureTiming {
    /// Timing with zero delay and the exposure given in microseconds.
    pub fn from_exposure_us(exposure_us: u32) -> Self {
        Self {
            delay: 0,
            exposure: exposure_us,
            delay_base: Timebase::Nanoseconds,
            exposure_base: Timebase::Microseconds,
        }
    }

    /// Exposure normalised to microseconds: `raw * 10^(3*code - 3)`.
    pub fn exposure_us(&self) -> f64 {
        let code = i32::from(self.exposure_base.code());
        f64::from(self.exposure) * 10f64.powi(3 * code - 3)
    }

    fn to_raw(self) -> (u32, u32, u16, u16) {
        (
            self.delay,
            self.exposure,
            self.delay_base.code(),
            self.exposure_base.code(),
        )
    }

    fn from_raw(raw: (u32, u32, u16, u16)) -> CameraResult<Self> {
        let (delay, exposure, delay_code, exposure_code) = raw;
        let delay_base = Timebase::from_code(delay_code).ok_or(
            CameraError::UnexpectedDeviceValue {
                setting: "delay_timebase",
                raw: delay_code,
            },
        )?;
        let exposure_base = Timebase::from_code(exposure_code).ok_or(
            CameraError::UnexpectedDeviceValue {
                setting: "exposure_timebase",
                raw: exposure_code,
            },
        )?;
        Ok(Self {
            delay,
            exposure,
            delay_base,
            exposure_base,
        })
    }
}

/// Rectangular sensor sub-area read out per frame.
///
/// Coordinates are 1-based and inclusive, matching the device convention:
/// the full pco.edge sensor is `(1, 1, 2060, 2048)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Roi {
    /// Leftmost column.
    pub left: u16,
    /// Topmost row.
    pub top: u16,
    /// Rightmost column, inclusive.
    pub right: u16,
    /// Bottom row, inclusive.
    pub bottom: u16,
}

impl Roi {
    /// Build an ROI from a `(left, top, right, bottom)` quadruple.
    pub fn new(left: u16, top: u16, right: u16, bottom: u16) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        u32::from(self.right - self.left) + 1
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        u32::from(self.bottom - self.top) + 1
    }

    /// Capture buffer size for one frame at this ROI.
    pub fn frame_bytes(&self) -> u32 {
        self.width() * self.height() * BYTES_PER_PIXEL
    }

    /// Check the ROI invariant against the sensor bounds reported by the
    /// device: coordinates 1-based, left < right, top < bottom, rectangle
    /// inside the sensor.
    pub fn validate(&self, sensor: (u16, u16)) -> CameraResult<()> {
        let (max_width, max_height) = sensor;
        if self.left < 1 || self.top < 1 {
            return Err(self.out_of_range("coordinates are 1-based"));
        }
        if self.left >= self.right {
            return Err(self.out_of_range("left must be smaller than right"));
        }
        if self.top >= self.bottom {
            return Err(self.out_of_range("top must be smaller than bottom"));
        }
        if self.right > max_width || self.bottom > max_height {
            return Err(self.out_of_range(&format!(
                "rectangle exceeds the {max_width} x {max_height} sensor"
            )));
        }
        Ok(())
    }

    fn out_of_range(&self, reason: &str) -> CameraError {
        CameraError::OutOfRange {
            parameter: "region_of_interest",
            detail: format!(
                "({}, {}, {}, {}): {reason}",
                self.left, self.top, self.right, self.bottom
            ),
        }
    }

    fn to_raw(self) -> (u16, u16, u16, u16) {
        (self.left, self.top, self.right, self.bottom)
    }

    fn from_raw(raw: (u16, u16, u16, u16)) -> Self {
        Self::new(raw.0, raw.1, raw.2, raw.3)
    }
}

impl From<[u16; 4]> for Roi {
    fn from(rect: [u16; 4]) -> Self {
        Self::new(rect[0], rect[1], rect[2], rect[3])
    }
}

/// Device-read state of every setting, cached by the session.
///
/// Taken on open and refreshed after a fully verified `apply_settings`; a
/// failed apply leaves the previous verified values in place.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsSnapshot {
    /// Sensor readout format.
    pub sensor_format: SensorFormat,
    /// Trigger mode.
    pub trigger_mode: TriggerMode,
    /// Storage mode.
    pub storage_mode: StorageMode,
    /// Recorder submode.
    pub recorder_submode: RecorderSubmode,
    /// Acquire mode.
    pub acquire_mode: AcquireMode,
    /// Pixel clock in Hz.
    pub pixel_rate_hz: u32,
    /// Delay/exposure timing.
    pub timing: ExposureTiming,
    /// Active region of interest.
    pub roi: Roi,
}

// =============================================================================
// Registry
// =============================================================================

/// Applies and reads settings with a write-then-verify protocol.
///
/// Setters are idempotent: re-applying the current value writes and verifies
/// the same code with no further observable effect. The session guarantees
/// setters only run while disarmed.
pub struct SettingsRegistry {
    driver: Arc<dyn CameraDriver>,
    handle: CameraHandle,
}

impl SettingsRegistry {
    /// Registry bound to an open camera handle.
    pub fn new(driver: Arc<dyn CameraDriver>, handle: CameraHandle) -> Self {
        Self { driver, handle }
    }

    /// Write a mode setting and verify it read back as requested.
    fn apply<M: DeviceMode>(&self, requested: M) -> CameraResult<()> {
        debug!("setting {} to {:?}", M::SETTING, requested);
        M::write(self.driver.as_ref(), self.handle, requested.code())?;
        let raw = M::read(self.driver.as_ref(), self.handle)?;
        match M::from_code(raw) {
            Some(observed) if observed == requested => Ok(()),
            Some(observed) => Err(CameraError::VerificationFailed {
                setting: M::SETTING,
                requested: format!("{requested:?}"),
                observed: format!("{observed:?}"),
            }),
            None => Err(CameraError::VerificationFailed {
                setting: M::SETTING,
                requested: format!("{requested:?}"),
                observed: format!("device code {raw:#06x}"),
            }),
        }
    }

    /// Read and decode a mode setting.
    fn get<M: DeviceMode>(&self) -> CameraResult<M> {
        let raw = M::read(self.driver.as_ref(), self.handle)?;
        M::from_code(raw).ok_or(CameraError::UnexpectedDeviceValue {
            setting: M::SETTING,
            raw,
        })
    }

    /// Set and verify the sensor format.
    pub fn set_sensor_format(&self, format: SensorFormat) -> CameraResult<()> {
        self.apply(format)
    }

    /// Current sensor format.
    pub fn sensor_format(&self) -> CameraResult<SensorFormat> {
        self.get()
    }

    /// Set and verify the trigger mode.
    pub fn set_trigger_mode(&self, mode: TriggerMode) -> CameraResult<()> {
        self.apply(mode)
    }

    /// Current trigger mode.
    pub fn trigger_mode(&self) -> CameraResult<TriggerMode> {
        self.get()
    }

    /// Set and verify the storage mode.
    pub fn set_storage_mode(&self, mode: StorageMode) -> CameraResult<()> {
        self.apply(mode)
    }

    /// Current storage mode.
    pub fn storage_mode(&self) -> CameraResult<StorageMode> {
        self.get()
    }

    /// Set and verify the recorder submode.
    pub fn set_recorder_submode(&self, submode: RecorderSubmode) -> CameraResult<()> {
        self.apply(submode)
    }

    /// Current recorder submode.
    pub fn recorder_submode(&self) -> CameraResult<RecorderSubmode> {
        self.get()
    }

    /// Set and verify the acquire mode.
    pub fn set_acquire_mode(&self, mode: AcquireMode) -> CameraResult<()> {
        self.apply(mode)
    }

    /// Current acquire mode.
    pub fn acquire_mode(&self) -> CameraResult<AcquireMode> {
        self.get()
    }

    /// Set and verify the delay/exposure timing.
    ///
    /// The full raw quadruple is compared on readback; a device that clamps
    /// either value or swaps a time base fails verification.
    pub fn set_timing(&self, timing: ExposureTiming) -> CameraResult<()> {
        debug!(
            "setting delay/exposure to {} / {} ({:?} / {:?})",
            timing.delay, timing.exposure, timing.delay_base, timing.exposure_base
        );
        let (delay, exposure, delay_base, exposure_base) = timing.to_raw();
        self.driver
            .set_delay_exposure(self.handle, delay, exposure, delay_base, exposure_base)?;
        let observed = self.driver.get_delay_exposure(self.handle)?;
        if observed != timing.to_raw() {
            return Err(CameraError::VerificationFailed {
                setting: "delay_exposure",
                requested: format!("{:?}", timing.to_raw()),
                observed: format!("{observed:?}"),
            });
        }
        Ok(())
    }

    /// Current delay/exposure timing.
    pub fn timing(&self) -> CameraResult<ExposureTiming> {
        ExposureTiming::from_raw(self.driver.get_delay_exposure(self.handle)?)
    }

    /// Set and verify the region of interest.
    pub fn set_roi(&self, roi: Roi) -> CameraResult<()> {
        debug!(
            "setting ROI to columns {}..={}, rows {}..={}",
            roi.left, roi.right, roi.top, roi.bottom
        );
        let (left, top, right, bottom) = roi.to_raw();
        self.driver.set_roi(self.handle, left, top, right, bottom)?;
        let observed = self.driver.get_roi(self.handle)?;
        if observed != roi.to_raw() {
            return Err(CameraError::VerificationFailed {
                setting: "region_of_interest",
                requested: format!("{:?}", roi.to_raw()),
                observed: format!("{observed:?}"),
            });
        }
        Ok(())
    }

    /// Current region of interest.
    pub fn roi(&self) -> CameraResult<Roi> {
        Ok(Roi::from_raw(self.driver.get_roi(self.handle)?))
    }

    /// Current pixel clock. Read-only; a zero reading means the device has
    /// not completed initialisation.
    pub fn pixel_rate(&self) -> CameraResult<u32> {
        let rate = self.driver.get_pixel_rate(self.handle)?;
        if rate == 0 {
            return Err(CameraError::DeviceNotReady(
                "pixel rate reads back zero".into(),
            ));
        }
        Ok(rate)
    }

    /// Read every setting from the device in one pass.
    pub fn snapshot(&self) -> CameraResult<SettingsSnapshot> {
        Ok(SettingsSnapshot {
            sensor_format: self.sensor_format()?,
            trigger_mode: self.trigger_mode()?,
            storage_mode: self.storage_mode()?,
            recorder_submode: self.recorder_submode()?,
            acquire_mode: self.acquire_mode()?,
            pixel_rate_hz: self.pixel_rate()?,
            timing: self.timing()?,
            roi: self.roi()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::MockCameraDriver;

    fn registry() -> (Arc<MockCameraDriver>, SettingsRegistry) {
        let driver = Arc::new(MockCameraDriver::new());
        let handle = driver.open(0).unwrap();
        let registry = SettingsRegistry::new(driver.clone(), handle);
        (driver, registry)
    }

    #[test]
    fn test_write_verify_round_trip_all_values() {
        let (_driver, registry) = registry();

        for format in [SensorFormat::Standard, SensorFormat::Extended] {
            registry.set_sensor_format(format).unwrap();
            assert_eq!(registry.sensor_format().unwrap(), format);
        }
        for mode in [
            TriggerMode::AutoTrigger,
            TriggerMode::SoftwareTrigger,
            TriggerMode::ExternalTrigger,
            TriggerMode::ExternalExposure,
        ] {
            registry.set_trigger_mode(mode).unwrap();
            assert_eq!(registry.trigger_mode().unwrap(), mode);
        }
        for mode in [StorageMode::Recorder, StorageMode::FifoBuffer] {
            registry.set_storage_mode(mode).unwrap();
            assert_eq!(registry.storage_mode().unwrap(), mode);
        }
        for submode in [RecorderSubmode::Sequence, RecorderSubmode::RingBuffer] {
            registry.set_recorder_submode(submode).unwrap();
            assert_eq!(registry.recorder_submode().unwrap(), submode);
        }
        for mode in [
            AcquireMode::Auto,
            AcquireMode::ExternalStatic,
            AcquireMode::ExternalDynamic,
        ] {
            registry.set_acquire_mode(mode).unwrap();
            assert_eq!(registry.acquire_mode().unwrap(), mode);
        }
    }

    #[test]
    fn test_ignored_write_fails_verification() {
        let (driver, registry) = registry();
        driver.refuse_writes("recorder_submode");
        let err = registry
            .set_recorder_submode(RecorderSubmode::RingBuffer)
            .unwrap_err();
        match err {
            CameraError::VerificationFailed { setting, .. } => {
                assert_eq!(setting, "recorder_submode");
            }
            other => panic!("expected VerificationFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_pixel_rate_is_not_ready() {
        let (driver, registry) = registry();
        driver.set_pixel_rate(0);
        assert!(matches!(
            registry.pixel_rate(),
            Err(CameraError::DeviceNotReady(_))
        ));
    }

    #[test]
    fn test_timing_round_trip_and_normalisation() {
        let (_driver, registry) = registry();
        let timing = ExposureTiming::from_exposure_us(2200);
        registry.set_timing(timing).unwrap();
        let observed = registry.timing().unwrap();
        assert_eq!(observed, timing);
        assert_eq!(observed.exposure_us(), 2200.0);
    }

    #[test]
    fn test_exposure_normalisation_across_timebases() {
        let nanos = ExposureTiming {
            delay: 0,
            exposure: 5000,
            delay_base: Timebase::Nanoseconds,
            exposure_base: Timebase::Nanoseconds,
        };
        assert_eq!(nanos.exposure_us(), 5.0);

        let millis = ExposureTiming {
            delay: 0,
            exposure: 3,
            delay_base: Timebase::Nanoseconds,
            exposure_base: Timebase::Milliseconds,
        };
        assert_eq!(millis.exposure_us(), 3000.0);
    }

    #[test]
    fn test_roi_validation() {
        let sensor = (2060, 2048);
        assert!(Roi::new(1, 1, 2060, 2048).validate(sensor).is_ok());
        assert!(Roi::new(961, 841, 1440, 1320).validate(sensor).is_ok());

        // left >= right
        assert!(Roi::new(10, 10, 5, 20).validate(sensor).is_err());
        // top >= bottom
        assert!(Roi::new(1, 100, 50, 100).validate(sensor).is_err());
        // zero coordinate
        assert!(Roi::new(0, 1, 100, 100).validate(sensor).is_err());
        // exceeds sensor
        assert!(Roi::new(1, 1, 2061, 2048).validate(sensor).is_err());
    }

    #[test]
    fn test_roi_geometry() {
        let roi = Roi::new(1, 1, 2060, 2048);
        assert_eq!(roi.width(), 2060);
        assert_eq!(roi.height(), 2048);
        assert_eq!(roi.frame_bytes(), 2060 * 2048 * 2);
    }

    #[test]
    fn test_snapshot_reads_every_setting() {
        let (_driver, registry) = registry();
        registry.set_trigger_mode(TriggerMode::ExternalTrigger).unwrap();
        registry.set_roi(Roi::new(1, 1, 512, 512)).unwrap();

        let snapshot = registry.snapshot().unwrap();
        assert_eq!(snapshot.trigger_mode, TriggerMode::ExternalTrigger);
        assert_eq!(snapshot.roi, Roi::new(1, 1, 512, 512));
        assert!(snapshot.pixel_rate_hz > 0);
    }
}
