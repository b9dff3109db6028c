//! End-to-end session scenarios against the register-level mock driver.

use std::sync::Arc;

use sc2_cam::driver::MockCameraDriver;
use sc2_cam::settings::Roi;
use sc2_cam::{AcquisitionSettings, CameraConfig, CameraError, CameraSession, CameraState, TriggerMode};

fn open_session() -> (Arc<MockCameraDriver>, CameraSession) {
    let _ = env_logger::builder().is_test(true).try_init();
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
fn test_full_lifecycle() {
    let (driver, mut session) = open_session();
    assert_eq!(session.state(), CameraState::Disarmed);

    let applied = session.apply_settings(&default_settings()).unwrap();
    assert_eq!(applied.trigger, TriggerMode::AutoTrigger);
    assert_eq!(applied.exposure_us, 2200.0);
    assert_eq!(applied.roi, Roi::new(1, 1, 2060, 2048));
    assert!(session.health().unwrap().is_healthy());
    assert_eq!(session.temperature().unwrap().ccd_celsius, 5.2);

    session.arm().unwrap();
    assert_eq!(session.state(), CameraState::Armed);
    assert_eq!(session.allocated_buffers(), 2);
    assert!(driver.recording());

    session.disarm();
    assert_eq!(session.state(), CameraState::Disarmed);
    assert_eq!(session.allocated_buffers(), 0);
    assert!(!driver.recording());

    session.close().unwrap();
    assert_eq!(session.state(), CameraState::Closed);
    assert_eq!(session.allocated_buffers(), 0);
    assert_eq!(driver.allocated_buffers(), 0);
}

#[test]
fn test_disarm_is_idempotent() {
    let (_driver, mut session) = open_session();
    session.apply_settings(&default_settings()).unwrap();
    session.arm().unwrap();

    session.disarm();
    let state_after_first = session.state();
    let buffers_after_first = session.allocated_buffers();

    session.disarm();
    assert_eq!(session.state(), state_after_first);
    assert_eq!(session.allocated_buffers(), buffers_after_first);
    assert_eq!(session.state(), CameraState::Disarmed);
    assert_eq!(session.allocated_buffers(), 0);
}

#[test]
fn test_apply_settings_always_leaves_session_disarmed() {
    let (driver, mut session) = open_session();

    // success case, called while armed
    session.apply_settings(&default_settings()).unwrap();
    session.arm().unwrap();
    session.apply_settings(&default_settings()).unwrap();
    assert_eq!(session.state(), CameraState::Disarmed);
    assert!(!driver.recording());

    // failure case: a write the device silently drops
    driver.refuse_writes("trigger_mode");
    let err = session
        .apply_settings(&AcquisitionSettings {
            trigger: TriggerMode::ExternalTrigger,
            ..default_settings()
        })
        .unwrap_err();
    match err {
        CameraError::VerificationFailed { setting, .. } => assert_eq!(setting, "trigger_mode"),
        other => panic!("expected VerificationFailed, got {other:?}"),
    }
    assert_eq!(session.state(), CameraState::Disarmed);
}

#[test]
fn test_invalid_roi_rejected_before_any_driver_call() {
    let (driver, mut session) = open_session();
    let calls_before = driver.calls();

    let err = session
        .apply_settings(&AcquisitionSettings {
            roi: Roi::new(10, 10, 5, 20),
            ..default_settings()
        })
        .unwrap_err();
    assert!(
        matches!(err, CameraError::OutOfRange { parameter, .. } if parameter == "region_of_interest")
    );
    assert_eq!(driver.calls(), calls_before);
    assert_eq!(session.state(), CameraState::Disarmed);
}

#[test]
fn test_arm_while_armed_rejected_without_duplicate_buffers() {
    let (driver, mut session) = open_session();
    session.apply_settings(&default_settings()).unwrap();
    session.arm().unwrap();

    let buffers_before = driver.allocated_buffers();
    let err = session.arm().unwrap_err();
    assert!(matches!(
        err,
        CameraError::InvalidState {
            operation: "arm",
            state: CameraState::Armed,
        }
    ));
    assert_eq!(driver.allocated_buffers(), buffers_before);
    assert_eq!(session.state(), CameraState::Armed);
}

#[test]
fn test_health_fault_after_configuration() {
    let (driver, mut session) = open_session();
    let first = AcquisitionSettings {
        trigger: TriggerMode::ExternalTrigger,
        exposure_us: 5000,
        roi: Roi::new(961, 841, 1440, 1320),
    };
    session.apply_settings(&first).unwrap();

    driver.set_health(1, 0, 0x20);
    let err = session.apply_settings(&default_settings()).unwrap_err();
    match err {
        CameraError::Unhealthy(status) => {
            assert_eq!(status.warnings, 1);
            assert_eq!(status.status, 0x20);
        }
        other => panic!("expected Unhealthy, got {other:?}"),
    }
    assert_eq!(session.state(), CameraState::Disarmed);

    // the snapshot still reports the last fully verified configuration
    assert_eq!(session.settings().trigger_mode, TriggerMode::ExternalTrigger);
    assert_eq!(session.settings().roi, Roi::new(961, 841, 1440, 1320));
}

#[test]
fn test_allocation_failure_reverts_to_disarmed() {
    let (driver, mut session) = open_session();
    session.apply_settings(&default_settings()).unwrap();
    driver.fail_allocation_after(1);

    let err = session.arm().unwrap_err();
    assert!(matches!(err, CameraError::AllocationFailed { index: 1, count: 2, .. }));
    assert_eq!(session.state(), CameraState::Disarmed);
    assert_eq!(session.allocated_buffers(), 0);
    assert_eq!(driver.allocated_buffers(), 0);
    assert!(!driver.recording());
}

#[test]
fn test_zero_pixel_rate_fails_configuration() {
    let (driver, mut session) = open_session();
    driver.set_pixel_rate(0);

    let err = session.apply_settings(&default_settings()).unwrap_err();
    assert!(matches!(err, CameraError::DeviceNotReady(_)));
    assert_eq!(session.state(), CameraState::Disarmed);
}

#[test]
fn test_failed_open_reports_guidance() {
    let driver = Arc::new(MockCameraDriver::new());
    driver.fail_open();

    let err = CameraSession::open(driver, 0).unwrap_err();
    assert!(matches!(err, CameraError::DeviceUnavailable { .. }));
    assert!(err.to_string().contains("powered"));
}

#[test]
fn test_close_requires_disarm() {
    let (_driver, mut session) = open_session();
    session.apply_settings(&default_settings()).unwrap();
    session.arm().unwrap();

    assert!(matches!(
        session.close(),
        Err(CameraError::InvalidState {
            operation: "close",
            state: CameraState::Armed,
        })
    ));

    session.disarm();
    session.close().unwrap();
    assert_eq!(session.state(), CameraState::Closed);
}

#[test]
fn test_drop_releases_device() {
    let driver = Arc::new(MockCameraDriver::new());
    {
        let mut session = CameraSession::open(driver.clone(), 0).unwrap();
        session.apply_settings(&default_settings()).unwrap();
        session.arm().unwrap();
    }
    assert!(!driver.recording());
    assert_eq!(driver.allocated_buffers(), 0);
    // the handle was released, so the camera can be opened again
    assert!(CameraSession::open(driver, 0).is_ok());
}

#[test]
fn test_session_from_config_defaults() {
    let _ = env_logger::builder().is_test(true).try_init();
    let driver = Arc::new(MockCameraDriver::new());
    let config = CameraConfig::default();

    let mut session = CameraSession::from_config(driver.clone(), &config).unwrap();
    assert_eq!(session.state(), CameraState::Disarmed);
    assert_eq!(session.settings().roi, Roi::new(1, 1, 2060, 2048));

    session.arm().unwrap();
    assert_eq!(session.allocated_buffers(), config.buffer_count);
    session.disarm();
    session.close().unwrap();
}
