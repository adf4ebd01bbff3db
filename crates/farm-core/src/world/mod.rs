//! Map-side data: forts (pokestops, gyms) and wild pokemon as returned by a map query.

pub mod fort;
pub mod map_state;

pub use fort::{Fort, FortDetails, FortReward, FortType, ItemAward};
pub use map_state::{CatchablePokemon, MapCell, MapSnapshot, PokemonId};
