//! `stardeck_client`
//!
//! Scene-side systems:
//! - Input sampling into a per-frame button set
//! - Local player controller (velocity, facing, animation selection)
//! - Outbound snapshot rate policy
//! - Remote player reconciliation
//! - Map materialization and scene lifecycle/transition

pub mod input;
pub mod map;
pub mod player;
pub mod reconcile;
pub mod scene;
pub mod snapshot;

pub use scene::LobbyScene;
