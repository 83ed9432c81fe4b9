//! Shared types for the papercity pipeline: homogeneous math and style values.
//!
//! # Invariants
//! - Math types are plain values; no operation mutates an operand.
//! - Style values are immutable configuration passed into the generator and
//!   pipeline, never process-wide state.

pub mod math;
pub mod style;

pub use math::{Matrix, Vector};
pub use style::{Color, Palette, StrokeStyle};
