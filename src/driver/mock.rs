//! Register-level simulated SC2 driver.
//!
//! Keeps the same observable contract as the hardware driver: setters write
//! device words, getters read them back, and the handle is only valid while
//! the camera is open. Fault-injection knobs let tests exercise the failure
//! paths the real hardware produces (silently dropped writes, allocation
//! refusals, non-zero health counters).

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;
use std::sync::Mutex;

use log::debug;

use super::{BufferDescriptor, CameraDriver, CameraHandle, DriverError, DriverResult};

/// Factory defaults loaded by `reset_to_default`.
#[derive(Debug, Clone, Copy)]
struct Registers {
    sensor_format: u16,
    trigger_mode: u16,
    storage_mode: u16,
    recorder_submode: u16,
    acquire_mode: u16,
    delay: u32,
    exposure: u32,
    delay_base: u16,
    exposure_base: u16,
    roi: (u16, u16, u16, u16),
}

impl Registers {
    fn defaults(sensor: (u16, u16)) -> Self {
        Self {
            sensor_format: 0,
            trigger_mode: 0,
            storage_mode: 0,
            recorder_submode: 0,
            acquire_mode: 0,
            delay: 0,
            exposure: 1000,
            delay_base: 0,
            exposure_base: 1,
            roi: (1, 1, sensor.0, sensor.1),
        }
    }
}

#[derive(Debug)]
struct MockState {
    handle: Option<i16>,
    next_handle: i16,
    recording: bool,
    registers: Registers,
    buffers: Vec<i16>,
    next_buffer: i16,
    pixel_rate: u32,
    health: (u32, u32, u32),
    temperature: (i16, i16, i16),
    calls: usize,
    allocations: usize,
    fail_open: bool,
    fail_allocation_after: Option<usize>,
    refused_writes: HashSet<&'static str>,
}

/// Simulated camera driver with fault injection for tests.
pub struct MockCameraDriver {
    sensor: (u16, u16),
    state: Mutex<MockState>,
}

impl MockCameraDriver {
    /// Create a mock camera with the pco.edge default sensor (2060 x 2048).
    pub fn new() -> Self {
        Self::with_sensor(2060, 2048)
    }

    /// Create a mock camera with a custom sensor resolution.
    pub fn with_sensor(width: u16, height: u16) -> Self {
        Self {
            sensor: (width, height),
            state: Mutex::new(MockState {
                handle: None,
                next_handle: 1,
                recording: false,
                registers: Registers::defaults((width, height)),
                buffers: Vec::new(),
                next_buffer: 0,
                pixel_rate: 286_000_000,
                health: (0, 0, 0),
                temperature: (52, 34, 41),
                calls: 0,
                allocations: 0,
                fail_open: false,
                fail_allocation_after: None,
                refused_writes: HashSet::new(),
            }),
        }
    }

    /// Make the next `open` fail as if no camera answered.
    pub fn fail_open(&self) {
        self.state.lock().unwrap().fail_open = true;
    }

    /// Override the reported pixel rate; zero simulates a device that has
    /// not finished initialising.
    pub fn set_pixel_rate(&self, rate: u32) {
        self.state.lock().unwrap().pixel_rate = rate;
    }

    /// Override the health counters reported by the device.
    pub fn set_health(&self, warnings: u32, errors: u32, status: u32) {
        self.state.lock().unwrap().health = (warnings, errors, status);
    }

    /// Override the reported temperatures (ccd tenths of C, camera C,
    /// power supply C).
    pub fn set_temperature(&self, ccd: i16, camera: i16, power: i16) {
        self.state.lock().unwrap().temperature = (ccd, camera, power);
    }

    /// Silently drop writes to the named setting, leaving the register
    /// unchanged. Setting names match the driver call names:
    /// `sensor_format`, `trigger_mode`, `storage_mode`, `recorder_submode`,
    /// `acquire_mode`, `delay_exposure`, `roi`.
    pub fn refuse_writes(&self, setting: &'static str) {
        self.state.lock().unwrap().refused_writes.insert(setting);
    }

    /// Let the first `n` buffer allocations succeed and refuse the rest.
    pub fn fail_allocation_after(&self, n: usize) {
        self.state.lock().unwrap().fail_allocation_after = Some(n);
    }

    /// Total driver calls issued so far.
    pub fn calls(&self) -> usize {
        self.state.lock().unwrap().calls
    }

    /// Number of buffers currently registered with the driver.
    pub fn allocated_buffers(&self) -> usize {
        self.state.lock().unwrap().buffers.len()
    }

    /// Whether the recording state is currently on.
    pub fn recording(&self) -> bool {
        self.state.lock().unwrap().recording
    }

    fn checked(&self, handle: CameraHandle) -> DriverResult<std::sync::MutexGuard<'_, MockState>> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        if state.handle != Some(handle.0) {
            return Err(DriverError::InvalidHandle);
        }
        Ok(state)
    }
}

impl Default for MockCameraDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraDriver for MockCameraDriver {
    fn open(&self, slot: u16) -> DriverResult<CameraHandle> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;
        if state.fail_open {
            return Err(DriverError::DeviceUnavailable { slot });
        }
        if state.handle.is_some() {
            return Err(DriverError::Faulted("camera already open".into()));
        }
        let handle = state.next_handle;
        state.next_handle += 1;
        state.handle = Some(handle);
        debug!("mock camera opened on slot {slot} with handle {handle}");
        Ok(CameraHandle(handle))
    }

    fn close(&self, handle: CameraHandle) -> DriverResult<()> {
        let mut state = self.checked(handle)?;
        state.handle = None;
        state.recording = false;
        state.buffers.clear();
        debug!("mock camera closed");
        Ok(())
    }

    fn reset_to_default(&self, handle: CameraHandle) -> DriverResult<()> {
        let sensor = self.sensor;
        let mut state = self.checked(handle)?;
        state.registers = Registers::defaults(sensor);
        Ok(())
    }

    fn set_recording_state(&self, handle: CameraHandle, on: bool) -> DriverResult<()> {
        let mut state = self.checked(handle)?;
        state.recording = on;
        Ok(())
    }

    fn allocate_buffer(&self, handle: CameraHandle, bytes: u32) -> DriverResult<BufferDescriptor> {
        let mut state = self.checked(handle)?;
        if let Some(limit) = state.fail_allocation_after {
            if state.allocations >= limit {
                return Err(DriverError::AllocationFailed {
                    requested_bytes: bytes,
                });
            }
        }
        let number = state.next_buffer;
        state.next_buffer += 1;
        state.allocations += 1;
        state.buffers.push(number);
        Ok(BufferDescriptor {
            number,
            address: 0x4000_0000 + u64::from(bytes) * number as u64,
            event_handle: 0x100 + number as u64,
        })
    }

    fn free_buffer(&self, handle: CameraHandle, number: i16) -> DriverResult<()> {
        let mut state = self.checked(handle)?;
        match state.buffers.iter().position(|&n| n == number) {
            Some(index) => {
                state.buffers.remove(index);
                Ok(())
            }
            None => Err(DriverError::Faulted(format!("unknown buffer number {number}"))),
        }
    }

    fn remove_all_buffers(&self, handle: CameraHandle) -> DriverResult<()> {
        let state = self.checked(handle)?;
        if state.recording {
            return Err(DriverError::Faulted(
                "cannot remove buffers while recording state is on".into(),
            ));
        }
        Ok(())
    }

    fn sensor_size(&self, handle: CameraHandle) -> DriverResult<(u16, u16)> {
        self.checked(handle)?;
        Ok(self.sensor)
    }

    fn get_sensor_format(&self, handle: CameraHandle) -> DriverResult<u16> {
        Ok(self.checked(handle)?.registers.sensor_format)
    }

    fn set_sensor_format(&self, handle: CameraHandle, raw: u16) -> DriverResult<()> {
        let mut state = self.checked(handle)?;
        if !state.refused_writes.contains("sensor_format") {
            state.registers.sensor_format = raw;
        }
        Ok(())
    }

    fn get_trigger_mode(&self, handle: CameraHandle) -> DriverResult<u16> {
        Ok(self.checked(handle)?.registers.trigger_mode)
    }

    fn set_trigger_mode(&self, handle: CameraHandle, raw: u16) -> DriverResult<()> {
        let mut state = self.checked(handle)?;
        if !state.refused_writes.contains("trigger_mode") {
            state.registers.trigger_mode = raw;
        }
        Ok(())
    }

    fn get_storage_mode(&self, handle: CameraHandle) -> DriverResult<u16> {
        Ok(self.checked(handle)?.registers.storage_mode)
    }

    fn set_storage_mode(&self, handle: CameraHandle, raw: u16) -> DriverResult<()> {
        let mut state = self.checked(handle)?;
        if !state.refused_writes.contains("storage_mode") {
            state.registers.storage_mode = raw;
        }
        Ok(())
    }

    fn get_recorder_submode(&self, handle: CameraHandle) -> DriverResult<u16> {
        Ok(self.checked(handle)?.registers.recorder_submode)
    }

    fn set_recorder_submode(&self, handle: CameraHandle, raw: u16) -> DriverResult<()> {
        let mut state = self.checked(handle)?;
        if !state.refused_writes.contains("recorder_submode") {
            state.registers.recorder_submode = raw;
        }
        Ok(())
    }

    fn get_acquire_mode(&self, handle: CameraHandle) -> DriverResult<u16> {
        Ok(self.checked(handle)?.registers.acquire_mode)
    }

    fn set_acquire_mode(&self, handle: CameraHandle, raw: u16) -> DriverResult<()> {
        let mut state = self.checked(handle)?;
        if !state.refused_writes.contains("acquire_mode") {
            state.registers.acquire_mode = raw;
        }
        Ok(())
    }

    fn get_pixel_rate(&self, handle: CameraHandle) -> DriverResult<u32> {
        Ok(self.checked(handle)?.pixel_rate)
    }

    fn get_health(&self, handle: CameraHandle) -> DriverResult<(u32, u32, u32)> {
        Ok(self.checked(handle)?.health)
    }

    fn get_temperature(&self, handle: CameraHandle) -> DriverResult<(i16, i16, i16)> {
        Ok(self.checked(handle)?.temperature)
    }

    fn get_delay_exposure(&self, handle: CameraHandle) -> DriverResult<(u32, u32, u16, u16)> {
        let registers = self.checked(handle)?.registers;
        Ok((
            registers.delay,
            registers.exposure,
            registers.delay_base,
            registers.exposure_base,
        ))
    }

    fn set_delay_exposure(
        &self,
        handle: CameraHandle,
        delay: u32,
        exposure: u32,
        delay_base: u16,
        exposure_base: u16,
    ) -> DriverResult<()> {
        let mut state = self.checked(handle)?;
        if !state.refused_writes.contains("delay_exposure") {
            state.registers.delay = delay;
            state.registers.exposure = exposure;
            state.registers.delay_base = delay_base;
            state.registers.exposure_base = exposure_base;
        }
        Ok(())
    }

    fn get_roi(&self, handle: CameraHandle) -> DriverResult<(u16, u16, u16, u16)> {
        Ok(self.checked(handle)?.registers.roi)
    }

    fn set_roi(
        &self,
        handle: CameraHandle,
        left: u16,
        top: u16,
        right: u16,
        bottom: u16,
    ) -> DriverResult<()> {
        let mut state = self.checked(handle)?;
        if !state.refused_writes.contains("roi") {
            state.registers.roi = (left, top, right, bottom);
        }
        Ok(())
    }
}
