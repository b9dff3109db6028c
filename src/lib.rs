//! Session-based control of pco.edge sCMOS cameras over the SC2 driver
//! interface.
//!
//! The hard part of driving this hardware is not the individual register
//! reads and writes but sequencing them correctly: which settings may change
//! in which device state, how to prove a write actually took effect, and how
//! to tear down and reallocate capture buffers safely across repeated
//! arm/disarm cycles. This crate packages that discipline as a
//! [`session::CameraSession`] state machine built from four parts:
//!
//! - [`driver`]: the synchronous SC2 call surface as a trait, with a
//!   register-level mock for tests and bring-up,
//! - [`settings`]: typed setting values and the write-then-verify registry,
//! - [`buffers`]: the capture buffer pool bound to the armed state,
//! - [`health`]: the device health and temperature monitor.
//!
//! Everything is synchronous and blocking; a session must be driven from one
//! caller at a time.

pub mod buffers;
pub mod config;
pub mod driver;
pub mod error;
pub mod health;
pub mod session;
pub mod settings;

pub use config::CameraConfig;
pub use error::{CameraError, CameraResult};
pub use session::{AcquisitionSettings, AppliedSettings, CameraSession, CameraState};
pub use settings::{Roi, TriggerMode};
