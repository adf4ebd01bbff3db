use std::fmt;

use serde::{Deserialize, Serialize};

use super::fort::Fort;

/// Species number as used by the game (Bulbasaur = 1).
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct PokemonId(pub u32);

impl fmt::Display for PokemonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:03}", self.0)
    }
}

/// A wild pokemon that can be encountered right now. Consumed by exactly one catch sequence.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CatchablePokemon {
    pub encounter_id: u64,
    pub spawn_point_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub pokemon_id: PokemonId,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct MapCell {
    #[serde(default)]
    pub forts: Vec<Fort>,
    #[serde(default)]
    pub catchable_pokemons: Vec<CatchablePokemon>,
}

/// Result of one map query. Always fetched fresh; nothing here is cached across queries.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct MapSnapshot {
    #[serde(default)]
    pub map_cells: Vec<MapCell>,
}

impl MapSnapshot {
    pub fn forts(&self) -> impl Iterator<Item = &Fort> {
        self.map_cells.iter().flat_map(|c| c.forts.iter())
    }

    pub fn catchable_pokemon(&self) -> impl Iterator<Item = &CatchablePokemon> {
        self.map_cells.iter().flat_map(|c| c.catchable_pokemons.iter())
    }

    /// Pokestops whose cooldown has elapsed at `now_ms`, in cell order.
    pub fn eligible_forts(&self, now_ms: i64) -> Vec<Fort> {
        self.forts().filter(|f| f.is_eligible(now_ms)).cloned().collect()
    }
}
