use anyhow::Context;

use super::{FarmCtx, pause};
use crate::report::FarmEvent;
use crate::session::Session;

/// Releases every pokemon the inventory currently reports as a duplicate, in the order given.
///
/// The duplicate list is queried fresh on every call. A failed release aborts the pass.
pub async fn release_duplicates(ctx: &FarmCtx<'_>, session: &Session) -> anyhow::Result<usize> {
    let duplicates = ctx
        .inventory
        .duplicate_pokemon()
        .await
        .context("query duplicate pokemon")?;
    tracing::debug!(count = duplicates.len(), "farm.release.start");

    for pokemon in &duplicates {
        ctx.client
            .release_pokemon(session, pokemon.id)
            .await
            .with_context(|| format!("release pokemon {}", pokemon.id))?;
        ctx.reporter.report(&FarmEvent::PokemonReleased {
            pokemon_id: pokemon.pokemon_id,
            cp: pokemon.cp,
        });
        pause(ctx.pacing.release_delay()).await;
    }

    Ok(duplicates.len())
}
