//! Particle-size distribution models.
//!
//! Each model owns its linearizing transform and fit state; fitting and
//! prediction go through the `DistributionModel` trait so callers can stay
//! generic over the model kind.

pub mod gaudin_schuhmann;
pub mod model;
pub mod rosin_rammler;

pub use gaudin_schuhmann::*;
pub use model::*;
pub use rosin_rammler::*;
