//! The farm loops: pokestop looting, catching, duplicate release, and the supervisor that
//! repeats them forever.
//!
//! Control flows one way: supervisor -> sites -> capture -> strategy. Every call takes the
//! session handle explicitly; nothing here keeps ambient session state.

pub mod capture;
pub mod evolve;
pub mod prune;
pub mod sites;
pub mod strategy;
pub mod supervisor;

#[cfg(test)]
pub(crate) mod testing;

use std::time::Duration;

use crate::config::Pacing;
use crate::player::InventorySnapshot;
use crate::report::Reporter;
use crate::session::SessionClient;

pub use capture::{CatchOutcome, CatchRetryPolicy, catch_pokemon};
pub use evolve::evolve_all;
pub use prune::release_duplicates;
pub use sites::{SitesSummary, catch_nearby, farm_pokestops, visit_forts};
pub use strategy::select_ball;
pub use supervisor::{IterationOutcome, IterationSummary, RunSummary, Supervisor};

/// Collaborators shared by every farm loop.
#[derive(Clone, Copy)]
pub struct FarmCtx<'a> {
    pub client: &'a dyn SessionClient,
    pub inventory: &'a dyn InventorySnapshot,
    pub reporter: &'a dyn Reporter,
    pub pacing: Pacing,
    pub retry: CatchRetryPolicy,
}

async fn pause(d: Duration) {
    if !d.is_zero() {
        tokio::time::sleep(d).await;
    }
}
