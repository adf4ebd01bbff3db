use std::fmt;

use serde::{Deserialize, Serialize};

/// Inventory item id as used by the game's item table.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl ItemId {
    pub const POKE_BALL: ItemId = ItemId(1);
    pub const GREAT_BALL: ItemId = ItemId(2);
    pub const ULTRA_BALL: ItemId = ItemId(3);
    pub const MASTER_BALL: ItemId = ItemId(4);
    pub const POTION: ItemId = ItemId(101);
    pub const SUPER_POTION: ItemId = ItemId(102);
    pub const HYPER_POTION: ItemId = ItemId(103);
    pub const MAX_POTION: ItemId = ItemId(104);
    pub const REVIVE: ItemId = ItemId(201);
    pub const MAX_REVIVE: ItemId = ItemId(202);
    pub const RAZZ_BERRY: ItemId = ItemId(701);

    pub fn friendly_name(self) -> &'static str {
        match self {
            Self::POKE_BALL => "Poke Ball",
            Self::GREAT_BALL => "Great Ball",
            Self::ULTRA_BALL => "Ultra Ball",
            Self::MASTER_BALL => "Master Ball",
            Self::POTION => "Potion",
            Self::SUPER_POTION => "Super Potion",
            Self::HYPER_POTION => "Hyper Potion",
            Self::MAX_POTION => "Max Potion",
            Self::REVIVE => "Revive",
            Self::MAX_REVIVE => "Max Revive",
            Self::RAZZ_BERRY => "Razz Berry",
            _ => "Unknown Item",
        }
    }
}

/// Capture tools, ordered weakest to strongest.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Pokeball {
    Poke,
    Great,
    Ultra,
    Master,
}

impl Pokeball {
    pub const ALL: [Pokeball; 4] = [
        Pokeball::Poke,
        Pokeball::Great,
        Pokeball::Ultra,
        Pokeball::Master,
    ];

    pub fn item_id(self) -> ItemId {
        match self {
            Pokeball::Poke => ItemId::POKE_BALL,
            Pokeball::Great => ItemId::GREAT_BALL,
            Pokeball::Ultra => ItemId::ULTRA_BALL,
            Pokeball::Master => ItemId::MASTER_BALL,
        }
    }
}

impl fmt::Display for Pokeball {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.item_id().friendly_name())
    }
}
