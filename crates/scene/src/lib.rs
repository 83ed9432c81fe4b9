//! Scene accumulator: the ordered list of drawable shapes every generator
//! writes into, plus the viewport it will be projected onto.
//!
//! # Invariants
//! - Every shape has at least 2 vertices; filled shapes at least 3. This holds
//!   for deserialized scenes too.
//! - A shape's sort key is unavailable until a depth sort has run, and is
//!   cleared again once another shape is pushed.
//! - Insertion order only breaks ties; after sorting, draw order is authoritative.

pub mod scene;

pub use scene::{Scene, SceneError, Shape};
