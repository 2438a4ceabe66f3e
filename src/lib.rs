//! Host-testable core of the Pico 2 temperature forecaster.
//!
//! Sensor drivers, standardization, the sliding window, tensor marshaling, the
//! inference engine seam, the OLED screens and the sampling scheduler are all here and
//! generic over `embedded-hal` traits. `main.rs` wires the RP2350 peripherals to them
//! and logs the scheduler's reports over defmt.
//!
//! The crate is `no_std` on the device. Unit tests link `std` and run on the build
//! machine with a plain `cargo test --lib`; no target triple is configured by default.

#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

// === Configuration ===
pub mod config;

// === Data path (pure logic) ===
pub mod features;
pub mod scaler;
pub mod tensor;
pub mod window;

// === Devices (generic over embedded-hal / display-interface) ===
pub mod display;
pub mod inference;
pub mod sensors;

// === Main loop ===
pub mod scheduler;

pub use scheduler::{Clock, CycleReport, Scheduler, StartupError};
