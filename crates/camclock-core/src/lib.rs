//! camclock Core - Fundamental types and primitives
//!
//! This crate defines the types shared across the camclock firmware:
//! - Wall-clock timestamps (WallClockTime)
//! - Build identity (BuildId) used to detect freshly flashed images
//! - The error taxonomy (CamClockError)

pub mod build_id;
pub mod error;
pub mod time;

pub use build_id::*;
pub use error::*;
pub use time::*;
