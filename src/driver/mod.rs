//! SC2 driver call surface.
//!
//! The vendor SDK is a flat table of synchronous calls against an opaque
//! camera handle. This module captures that surface as the [`CameraDriver`]
//! trait so the session logic can be driven against real hardware or the
//! register-level mock without caring which is behind it.
//!
//! Every call is a blocking round trip to the device. The trait exposes raw
//! device words (`u16` mode codes, `u32` counters); decoding into typed
//! values happens one layer up in [`crate::settings`].

use thiserror::Error;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockCameraDriver;

/// Camera handle word handed out by the driver on open.
///
/// Valid only between a successful `open` and the matching `close`; the
/// session owns it exclusively for that span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CameraHandle(pub i16);

/// One capture buffer registered with the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferDescriptor {
    /// Driver-assigned buffer number, used to free the buffer later.
    pub number: i16,
    /// Address of the mapped buffer memory.
    pub address: u64,
    /// Driver event handle signalled when the buffer fills.
    pub event_handle: u64,
}

/// Errors reported by the driver itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    /// No camera answered on the requested slot.
    #[error("no camera available on slot {slot}")]
    DeviceUnavailable {
        /// Slot index passed to `open`.
        slot: u16,
    },

    /// The handle does not refer to an open camera.
    #[error("invalid camera handle")]
    InvalidHandle,

    /// The driver refused to allocate a capture buffer.
    #[error("driver refused to allocate a {requested_bytes} byte buffer")]
    AllocationFailed {
        /// Size of the rejected allocation request.
        requested_bytes: u32,
    },

    /// Any other driver-level fault.
    #[error("driver fault: {0}")]
    Faulted(String),
}

/// Result alias for raw driver calls.
pub type DriverResult<T> = Result<T, DriverError>;

/// Synchronous call contract of the SC2 camera driver.
///
/// Mode setters take the raw device code for the value; the paired getter
/// reads it back. The hardware may silently ignore or clamp a write, so a
/// setter returning `Ok` only means the call was delivered; readback is the
/// only acknowledgment that it took effect.
pub trait CameraDriver: Send + Sync {
    /// Open the camera on `slot` and return its handle.
    fn open(&self, slot: u16) -> DriverResult<CameraHandle>;

    /// Close the camera; the handle is invalid afterwards.
    fn close(&self, handle: CameraHandle) -> DriverResult<()>;

    /// Reset every camera setting to its factory default.
    fn reset_to_default(&self, handle: CameraHandle) -> DriverResult<()>;

    /// Turn the recording state on or off.
    fn set_recording_state(&self, handle: CameraHandle, on: bool) -> DriverResult<()>;

    /// Register a capture buffer of `bytes` with the driver.
    fn allocate_buffer(&self, handle: CameraHandle, bytes: u32) -> DriverResult<BufferDescriptor>;

    /// Free a single buffer by its driver-assigned number.
    fn free_buffer(&self, handle: CameraHandle, number: i16) -> DriverResult<()>;

    /// Cancel the driver's pending-buffer queue.
    ///
    /// Must be called with recording off, before the individual frees.
    fn remove_all_buffers(&self, handle: CameraHandle) -> DriverResult<()>;

    /// Maximum sensor resolution as (width, height) in pixels.
    fn sensor_size(&self, handle: CameraHandle) -> DriverResult<(u16, u16)>;

    /// Sensor format code: 0 = standard, 1 = extended.
    fn get_sensor_format(&self, handle: CameraHandle) -> DriverResult<u16>;
    /// Write the sensor format code.
    fn set_sensor_format(&self, handle: CameraHandle, raw: u16) -> DriverResult<()>;

    /// Trigger mode code: 0 = auto, 1 = software, 2 = external,
    /// 3 = external exposure.
    fn get_trigger_mode(&self, handle: CameraHandle) -> DriverResult<u16>;
    /// Write the trigger mode code.
    fn set_trigger_mode(&self, handle: CameraHandle, raw: u16) -> DriverResult<()>;

    /// Storage mode code: 0 = recorder, 1 = FIFO buffer.
    fn get_storage_mode(&self, handle: CameraHandle) -> DriverResult<u16>;
    /// Write the storage mode code.
    fn set_storage_mode(&self, handle: CameraHandle, raw: u16) -> DriverResult<()>;

    /// Recorder submode code: 0 = sequence, 1 = ring buffer.
    fn get_recorder_submode(&self, handle: CameraHandle) -> DriverResult<u16>;
    /// Write the recorder submode code.
    fn set_recorder_submode(&self, handle: CameraHandle, raw: u16) -> DriverResult<()>;

    /// Acquire mode code: 0 = auto, 1 = external static, 2 = external dynamic.
    fn get_acquire_mode(&self, handle: CameraHandle) -> DriverResult<u16>;
    /// Write the acquire mode code.
    fn set_acquire_mode(&self, handle: CameraHandle, raw: u16) -> DriverResult<()>;

    /// Current pixel clock in Hz. Read-only; zero means the device has not
    /// finished initialising.
    fn get_pixel_rate(&self, handle: CameraHandle) -> DriverResult<u32>;

    /// Health counters as (warnings, errors, status).
    fn get_health(&self, handle: CameraHandle) -> DriverResult<(u32, u32, u32)>;

    /// Temperatures as (ccd in tenths of a degree C, camera in degrees C,
    /// power supply in degrees C).
    fn get_temperature(&self, handle: CameraHandle) -> DriverResult<(i16, i16, i16)>;

    /// Delay/exposure timing as (delay, exposure, delay timebase code,
    /// exposure timebase code). Timebase codes: 0 = ns, 1 = us, 2 = ms.
    fn get_delay_exposure(&self, handle: CameraHandle) -> DriverResult<(u32, u32, u16, u16)>;
    /// Write the delay/exposure quadruple.
    fn set_delay_exposure(
        &self,
        handle: CameraHandle,
        delay: u32,
        exposure: u32,
        delay_base: u16,
        exposure_base: u16,
    ) -> DriverResult<()>;

    /// ROI rectangle as (left, top, right, bottom), 1-based inclusive.
    fn get_roi(&self, handle: CameraHandle) -> DriverResult<(u16, u16, u16, u16)>;
    /// Write the ROI rectangle.
    fn set_roi(
        &self,
        handle: CameraHandle,
        left: u16,
        top: u16,
        right: u16,
        bottom: u16,
    ) -> DriverResult<()>;
}
