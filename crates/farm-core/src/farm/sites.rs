use anyhow::Context;

use super::capture::catch_pokemon;
use super::{FarmCtx, pause};
use crate::report::FarmEvent;
use crate::session::Session;
use crate::world::Fort;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SitesSummary {
    pub forts_visited: usize,
    pub pokemon_encountered: usize,
}

/// Queries the map and loots every pokestop whose cooldown has elapsed at `now_ms`.
pub async fn farm_pokestops(
    ctx: &FarmCtx<'_>,
    session: &Session,
    now_ms: i64,
) -> anyhow::Result<SitesSummary> {
    let map = ctx
        .client
        .get_map_objects(session)
        .await
        .context("query map for pokestops")?;
    let forts = map.eligible_forts(now_ms);
    tracing::debug!(
        eligible = forts.len(),
        total = map.forts().count(),
        "farm.fort.eligible"
    );
    visit_forts(ctx, session, &forts).await
}

/// Visits the given forts in order: walk there, loot, wait out the cooldown, then catch
/// everything on the map.
///
/// The catch pass after each fort covers the whole visible map, not just the fort's
/// surroundings.
pub async fn visit_forts(
    ctx: &FarmCtx<'_>,
    session: &Session,
    forts: &[Fort],
) -> anyhow::Result<SitesSummary> {
    let mut summary = SitesSummary::default();

    for fort in forts {
        ctx.client
            .update_player_location(session, fort.latitude, fort.longitude)
            .await
            .with_context(|| format!("move to fort {}", fort.id))?;
        let details = ctx
            .client
            .get_fort(session, &fort.id, fort.latitude, fort.longitude)
            .await
            .with_context(|| format!("fort details {}", fort.id))?;
        let reward = ctx
            .client
            .search_fort(session, &fort.id, fort.latitude, fort.longitude)
            .await
            .with_context(|| format!("search fort {}", fort.id))?;

        tracing::info!(
            fort = %fort.id,
            name = %details.name,
            xp = reward.experience_awarded,
            "farm.fort.looted"
        );
        ctx.reporter.report(&FarmEvent::FortLooted {
            name: details.name,
            reward,
        });
        summary.forts_visited += 1;

        pause(ctx.pacing.fort_cooldown()).await;
        summary.pokemon_encountered += catch_nearby(ctx, session).await?;
    }

    Ok(summary)
}

/// Re-queries the map and runs a catch sequence for every catchable pokemon on it.
pub async fn catch_nearby(ctx: &FarmCtx<'_>, session: &Session) -> anyhow::Result<usize> {
    let map = ctx
        .client
        .get_map_objects(session)
        .await
        .context("query map for pokemon")?;
    let pokemon: Vec<_> = map.catchable_pokemon().cloned().collect();

    for p in &pokemon {
        catch_pokemon(ctx, session, p).await?;
    }
    Ok(pokemon.len())
}
