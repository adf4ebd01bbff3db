use anyhow::Context;

use super::strategy::select_ball;
use super::{FarmCtx, pause, prune};
use crate::player::{Pokeball, ball_stock};
use crate::report::FarmEvent;
use crate::session::{CatchStatus, Session};
use crate::world::CatchablePokemon;

/// Decides whether to throw again at the same encounter.
///
/// Only a missed throw is retried. `max_attempts: None` keeps throwing for as long as the
/// ball misses, with no upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CatchRetryPolicy {
    pub max_attempts: Option<u32>,
}

impl CatchRetryPolicy {
    pub fn bounded(max_attempts: u32) -> Self {
        Self {
            max_attempts: Some(max_attempts.max(1)),
        }
    }

    pub fn should_throw_again(&self, status: CatchStatus, attempts: u32) -> bool {
        status.is_retryable() && self.max_attempts.is_none_or(|max| attempts < max)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchOutcome {
    pub ball: Pokeball,
    pub cp: Option<i32>,
    pub status: CatchStatus,
    pub attempts: u32,
}

/// Walks to one wild pokemon, encounters it, and throws until the throw stops missing.
///
/// Always finishes with a duplicate release pass. Transport failures propagate.
pub async fn catch_pokemon(
    ctx: &FarmCtx<'_>,
    session: &Session,
    pokemon: &CatchablePokemon,
) -> anyhow::Result<CatchOutcome> {
    ctx.client
        .update_player_location(session, pokemon.latitude, pokemon.longitude)
        .await
        .context("move to pokemon")?;

    let encounter = ctx
        .client
        .encounter_pokemon(session, pokemon.encounter_id, &pokemon.spawn_point_id)
        .await
        .with_context(|| format!("encounter {}", pokemon.encounter_id))?;

    let stock = ball_stock(ctx.inventory)
        .await
        .context("read ball stock")?;
    let ball = select_ball(encounter.cp, &stock);
    tracing::debug!(
        encounter_id = pokemon.encounter_id,
        pokemon = %pokemon.pokemon_id,
        cp = ?encounter.cp,
        ?stock,
        %ball,
        "farm.catch.ball_selected"
    );

    let mut attempts = 0u32;
    let response = loop {
        attempts += 1;
        let res = ctx
            .client
            .catch_pokemon(
                session,
                pokemon.encounter_id,
                &pokemon.spawn_point_id,
                pokemon.latitude,
                pokemon.longitude,
                ball,
            )
            .await
            .with_context(|| format!("catch {} (throw {attempts})", pokemon.encounter_id))?;
        tracing::debug!(
            encounter_id = pokemon.encounter_id,
            attempt = attempts,
            status = ?res.status,
            "farm.catch.throw"
        );
        if !ctx.retry.should_throw_again(res.status, attempts) {
            break res;
        }
    };

    let event = if response.status == CatchStatus::Success {
        FarmEvent::PokemonCaught {
            pokemon_id: pokemon.pokemon_id,
            cp: encounter.cp,
            ball,
            xp: response.xp_awarded(),
        }
    } else {
        FarmEvent::PokemonEscaped {
            pokemon_id: pokemon.pokemon_id,
            cp: encounter.cp,
            ball,
        }
    };
    ctx.reporter.report(&event);
    tracing::info!(
        pokemon = %pokemon.pokemon_id,
        status = ?response.status,
        attempts,
        "farm.catch.done"
    );

    pause(ctx.pacing.after_catch()).await;
    prune::release_duplicates(ctx, session).await?;

    Ok(CatchOutcome {
        ball,
        cp: encounter.cp,
        status: response.status,
        attempts,
    })
}
