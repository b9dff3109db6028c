//! Device health counters and temperature telemetry.
//!
//! The camera reports three cumulative counters (warnings, errors, status)
//! and a session is healthy iff all three are zero. Any non-zero value is a
//! hardware or driver fault signal, not a logic error, so the session checks
//! health once after every bulk reconfiguration and surfaces the counters to
//! the caller unchanged.

use std::fmt;
use std::sync::Arc;

use crate::driver::{CameraDriver, CameraHandle};
use crate::error::{CameraError, CameraResult};

/// Device-reported health counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthStatus {
    /// Warning counter.
    pub warnings: u32,
    /// Error counter.
    pub errors: u32,
    /// Status counter.
    pub status: u32,
}

impl HealthStatus {
    /// Healthy iff all three counters are zero.
    pub fn is_healthy(&self) -> bool {
        self.warnings == 0 && self.errors == 0 && self.status == 0
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "warnings={:#x} errors={:#x} status={:#x}",
            self.warnings, self.errors, self.status
        )
    }
}

/// Sensor and electronics temperatures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Temperature {
    /// CCD temperature in degrees C (device reports tenths).
    pub ccd_celsius: f64,
    /// Camera electronics temperature in degrees C.
    pub camera_celsius: i16,
    /// Power supply temperature in degrees C.
    pub power_celsius: i16,
}

/// Reads and evaluates device health.
pub struct HealthMonitor {
    driver: Arc<dyn CameraDriver>,
    handle: CameraHandle,
}

impl HealthMonitor {
    /// Monitor bound to an open camera handle.
    pub fn new(driver: Arc<dyn CameraDriver>, handle: CameraHandle) -> Self {
        Self { driver, handle }
    }

    /// Read the current health counters.
    pub fn status(&self) -> CameraResult<HealthStatus> {
        let (warnings, errors, status) = self.driver.get_health(self.handle)?;
        Ok(HealthStatus {
            warnings,
            errors,
            status,
        })
    }

    /// Read the health counters and fail unless all three are zero.
    pub fn ensure_healthy(&self) -> CameraResult<HealthStatus> {
        let status = self.status()?;
        if !status.is_healthy() {
            return Err(CameraError::Unhealthy(status));
        }
        Ok(status)
    }

    /// Read the device temperatures, scaling the CCD reading from tenths.
    pub fn temperature(&self) -> CameraResult<Temperature> {
        let (ccd, camera, power) = self.driver.get_temperature(self.handle)?;
        Ok(Temperature {
            ccd_celsius: f64::from(ccd) * 0.1,
            camera_celsius: camera,
            power_celsius: power,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::MockCameraDriver;

    fn monitor() -> (Arc<MockCameraDriver>, HealthMonitor) {
        let driver = Arc::new(MockCameraDriver::new());
        let handle = driver.open(0).unwrap();
        let monitor = HealthMonitor::new(driver.clone(), handle);
        (driver, monitor)
    }

    #[test]
    fn test_all_zero_is_healthy() {
        let (_driver, monitor) = monitor();
        let status = monitor.ensure_healthy().unwrap();
        assert!(status.is_healthy());
    }

    #[test]
    fn test_any_nonzero_counter_is_unhealthy() {
        let (driver, monitor) = monitor();
        for (warnings, errors, status) in [(1, 0, 0), (0, 2, 0), (0, 0, 0x10)] {
            driver.set_health(warnings, errors, status);
            assert!(matches!(
                monitor.ensure_healthy(),
                Err(CameraError::Unhealthy(_))
            ));
        }
    }

    #[test]
    fn test_ccd_temperature_scaled_from_tenths() {
        let (driver, monitor) = monitor();
        driver.set_temperature(52, 34, 41);
        let temperature = monitor.temperature().unwrap();
        assert_eq!(temperature.ccd_celsius, 5.2);
        assert_eq!(temperature.camera_celsius, 34);
        assert_eq!(temperature.power_celsius, 41);
    }
}
