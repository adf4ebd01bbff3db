//! Core of the rusty-farm bot: map and inventory models, the session boundary, and the
//! loops that loot pokestops, catch pokemon, and release duplicates.
//!
//! Transport and authentication live behind [`session::SessionClient`]; binaries plug in a
//! concrete client (see the runner crate) and hand it to [`farm::Supervisor`].

pub mod config;
pub mod farm;
pub mod player;
pub mod report;
pub mod session;
pub mod world;
