//! Core addressing types for the procedural galaxy.
//!
//! This crate provides the pure math every generator shares:
//! - Galactocentric positions and cylindrical helpers
//! - The cylindrical chunk grid
//! - The 64-bit seed codec
//! - Seed-derived deterministic random streams
//! - The error taxonomy

pub mod chunk;
pub mod error;
pub mod position;
pub mod seed;
pub mod stream;

pub use chunk::*;
pub use error::*;
pub use position::*;
pub use seed::*;
pub use stream::*;

// Re-export the vector type positions are built on
pub use glam::DVec3;
