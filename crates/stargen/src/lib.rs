//! Procedural star and rogue-object generation for a seed-addressed galaxy,
//! with an overlay of real catalog stars near the Sun.
//!
//! Nothing is stored: every object is recomputed from its seed, the density
//! field and (for catalog stars) the loaded tables.

pub mod cache;
pub mod catalog;
pub mod density;
pub mod galaxy;
pub mod overlay;
pub mod population;
pub mod region;
pub mod rogue;
pub mod settings;
pub mod spiral;
pub mod star;
pub mod stellar;
pub mod survey;
pub mod system;

pub use cache::*;
pub use catalog::*;
pub use density::*;
pub use galaxy::*;
pub use overlay::*;
pub use population::*;
pub use region::*;
pub use rogue::*;
pub use settings::*;
pub use spiral::*;
pub use star::*;
pub use stellar::*;
pub use survey::*;
pub use system::*;
