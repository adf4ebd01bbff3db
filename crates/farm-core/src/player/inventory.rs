use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::items::Pokeball;
use crate::session::RpcFuture;
use crate::world::PokemonId;

/// A pokemon held in the player's inventory.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct OwnedPokemon {
    pub id: u64,
    pub pokemon_id: PokemonId,
    #[serde(default)]
    pub cp: Option<i32>,
}

/// Ball counts read in one go. Built fresh for every throw decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BallStock {
    pub poke: i32,
    pub great: i32,
    pub ultra: i32,
    pub master: i32,
}

impl BallStock {
    pub fn count(&self, ball: Pokeball) -> i32 {
        match ball {
            Pokeball::Poke => self.poke,
            Pokeball::Great => self.great,
            Pokeball::Ultra => self.ultra,
            Pokeball::Master => self.master,
        }
    }

    pub fn has(&self, ball: Pokeball) -> bool {
        self.count(ball) > 0
    }
}

/// Read side of the player's inventory.
///
/// Implementations must re-query on every call: counts change with every throw and the
/// duplicate list changes with every catch or release.
pub trait InventorySnapshot: Send + Sync {
    fn held_count<'a>(&'a self, ball: Pokeball) -> RpcFuture<'a, i32>;

    /// Pokemon the inventory policy considers redundant. The caller releases all of them.
    fn duplicate_pokemon<'a>(&'a self) -> RpcFuture<'a, Vec<OwnedPokemon>>;
}

pub async fn ball_stock(inventory: &dyn InventorySnapshot) -> anyhow::Result<BallStock> {
    Ok(BallStock {
        poke: inventory.held_count(Pokeball::Poke).await?,
        great: inventory.held_count(Pokeball::Great).await?,
        ultra: inventory.held_count(Pokeball::Ultra).await?,
        master: inventory.held_count(Pokeball::Master).await?,
    })
}

/// Keeps the strongest `keep_per_species` of every species and marks the rest as duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicatePolicy {
    pub keep_per_species: usize,
}

impl Default for DuplicatePolicy {
    fn default() -> Self {
        Self {
            keep_per_species: 1,
        }
    }
}

impl DuplicatePolicy {
    /// Returns duplicates grouped by species (ascending), weakest first within a species.
    pub fn select(&self, owned: &[OwnedPokemon]) -> Vec<OwnedPokemon> {
        let mut by_species: BTreeMap<PokemonId, Vec<&OwnedPokemon>> = BTreeMap::new();
        for p in owned {
            by_species.entry(p.pokemon_id).or_default().push(p);
        }

        let mut out = Vec::new();
        for (_, mut group) in by_species {
            if group.len() <= self.keep_per_species {
                continue;
            }
            // Strongest first; unknown CP sorts as weakest. Ties keep the older (lower) id.
            group.sort_by(|a, b| {
                b.cp.unwrap_or(i32::MIN)
                    .cmp(&a.cp.unwrap_or(i32::MIN))
                    .then_with(|| a.id.cmp(&b.id))
            });
            let mut released: Vec<OwnedPokemon> = group
                .into_iter()
                .skip(self.keep_per_species)
                .cloned()
                .collect();
            released.reverse();
            out.extend(released);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(id: u64, species: u32, cp: Option<i32>) -> OwnedPokemon {
        OwnedPokemon {
            id,
            pokemon_id: PokemonId(species),
            cp,
        }
    }

    #[test]
    fn policy_keeps_strongest_per_species() {
        let policy = DuplicatePolicy::default();
        let dupes = policy.select(&[
            owned(1, 16, Some(120)),
            owned(2, 16, Some(300)),
            owned(3, 19, Some(50)),
            owned(4, 16, None),
        ]);
        let ids: Vec<_> = dupes.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![4, 1]);
    }

    #[test]
    fn policy_honors_keep_count() {
        let policy = DuplicatePolicy {
            keep_per_species: 2,
        };
        let dupes = policy.select(&[
            owned(1, 16, Some(10)),
            owned(2, 16, Some(20)),
            owned(3, 16, Some(30)),
        ]);
        assert_eq!(dupes, vec![owned(1, 16, Some(10))]);
    }

    #[test]
    fn policy_with_no_repeats_releases_nothing() {
        let dupes = DuplicatePolicy::default().select(&[owned(1, 1, Some(10)), owned(2, 4, None)]);
        assert!(dupes.is_empty());
    }

    #[test]
    fn stock_reports_per_ball_counts() {
        let stock = BallStock {
            poke: 0,
            great: 2,
            ultra: 0,
            master: 1,
        };
        assert!(!stock.has(Pokeball::Poke));
        assert_eq!(stock.count(Pokeball::Great), 2);
        assert!(stock.has(Pokeball::Master));
    }
}
