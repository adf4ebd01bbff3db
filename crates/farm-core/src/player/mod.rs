//! Player inventory: ball stock, owned pokemon, and the duplicate policy.

pub mod inventory;
pub mod items;

pub use inventory::{BallStock, DuplicatePolicy, InventorySnapshot, OwnedPokemon, ball_stock};
pub use items::{ItemId, Pokeball};
