//! Core business logic for nadecast.
//!
//! Domain types for grenade lineups, pure caption rendering, and the
//! two-session publish choreography.

pub mod caption;
pub mod domain;
pub mod services;

pub use caption::render_caption;
pub use domain::{
    ChannelLinks, CsMap, GrenadeKind, MediaRefs, PublishPayload, PublishResult, Side,
};
pub use services::*;
