use anyhow::Context;

use super::{FarmCtx, pause};
use crate::player::OwnedPokemon;
use crate::report::FarmEvent;
use crate::session::{EvolveOutcome, Session};

/// Evolves each given pokemon for as long as evolving keeps succeeding.
///
/// A failed evolution is reported and moves on to the next pokemon. Returns the number of
/// successful evolutions.
pub async fn evolve_all(
    ctx: &FarmCtx<'_>,
    session: &Session,
    pokemon: &[OwnedPokemon],
) -> anyhow::Result<usize> {
    let mut evolved = 0;

    for p in pokemon {
        loop {
            let outcome = ctx
                .client
                .evolve_pokemon(session, p.id)
                .await
                .with_context(|| format!("evolve pokemon {}", p.id))?;

            let keep_going = match outcome {
                EvolveOutcome::Success { exp_awarded } => {
                    evolved += 1;
                    ctx.reporter.report(&FarmEvent::PokemonEvolved {
                        pokemon_id: p.pokemon_id,
                        exp: exp_awarded,
                    });
                    true
                }
                EvolveOutcome::Failed { reason } => {
                    tracing::info!(pokemon = %p.pokemon_id, %reason, "farm.evolve.stopped");
                    ctx.reporter.report(&FarmEvent::EvolveFailed {
                        pokemon_id: p.pokemon_id,
                        reason,
                    });
                    false
                }
            };

            pause(ctx.pacing.evolve_delay()).await;
            if !keep_going {
                break;
            }
        }
        pause(ctx.pacing.evolve_delay()).await;
    }

    Ok(evolved)
}
