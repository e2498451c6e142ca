//! `stardeck_shared`
//!
//! Libraries shared between the scene logic and whatever hosts it.
//!
//! Design goals:
//! - Keep the scene's collaborators behind explicit seams (stage, relay).
//! - Typed wire payloads; defaulting for missing fields happens at the
//!   deserialization boundary, not deep in scene logic.
//! - No `unsafe`.

pub mod anim;
pub mod config;
pub mod math;
pub mod proto;
pub mod relay;
pub mod stage;
pub mod tilemap;

pub mod prelude {
    //! Commonly used exports.

    pub use crate::anim::*;
    pub use crate::config::*;
    pub use crate::math::*;
    pub use crate::proto::*;
    pub use crate::stage::*;
}
