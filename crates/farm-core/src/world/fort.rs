use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::player::items::ItemId;

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FortType {
    Gym,
    /// Pokestop: the only fort kind the farm loop interacts with.
    Checkpoint,
}

/// A fort as reported by one map query. Never mutated locally; re-fetch after moving.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Fort {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "type")]
    pub fort_type: FortType,
    /// Unix milliseconds at which the fort can be searched again.
    #[serde(default)]
    pub cooldown_complete_ms: i64,
}

impl Fort {
    pub fn is_eligible(&self, now_ms: i64) -> bool {
        self.fort_type == FortType::Checkpoint && self.cooldown_complete_ms < now_ms
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct FortDetails {
    pub name: String,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct ItemAward {
    pub item_id: ItemId,
    pub item_count: i32,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct FortReward {
    #[serde(default)]
    pub experience_awarded: i32,
    #[serde(default)]
    pub gems_awarded: i32,
    /// Egg handed out by the stop, if any. Kept as the gateway's display string.
    #[serde(default)]
    pub egg_awarded: Option<String>,
    #[serde(default)]
    pub items_awarded: Vec<ItemAward>,
}

impl FortReward {
    /// Sums awards per item and renders `"2 x Poke Ball, 1 x Potion"`, in item id order.
    pub fn summarize_items(&self) -> String {
        let mut totals: BTreeMap<ItemId, i32> = BTreeMap::new();
        for award in &self.items_awarded {
            *totals.entry(award.item_id).or_default() += award.item_count;
        }
        totals
            .into_iter()
            .map(|(item, count)| format!("{count} x {}", item.friendly_name()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn egg_label(&self) -> &str {
        self.egg_awarded.as_deref().unwrap_or("none")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fort(fort_type: FortType, cooldown_complete_ms: i64) -> Fort {
        Fort {
            id: "f1".to_string(),
            latitude: 52.37,
            longitude: 4.89,
            fort_type,
            cooldown_complete_ms,
        }
    }

    #[test]
    fn checkpoint_is_eligible_only_after_cooldown_strictly_elapsed() {
        let now = 1_000;
        assert!(fort(FortType::Checkpoint, 999).is_eligible(now));
        assert!(!fort(FortType::Checkpoint, 1_000).is_eligible(now));
        assert!(!fort(FortType::Checkpoint, 5_000).is_eligible(now));
    }

    #[test]
    fn gyms_are_never_eligible() {
        assert!(!fort(FortType::Gym, 0).is_eligible(1_000));
    }

    #[test]
    fn reward_summary_sums_repeated_items() {
        let reward = FortReward {
            experience_awarded: 50,
            gems_awarded: 0,
            egg_awarded: None,
            items_awarded: vec![
                ItemAward {
                    item_id: ItemId::POTION,
                    item_count: 1,
                },
                ItemAward {
                    item_id: ItemId::POKE_BALL,
                    item_count: 1,
                },
                ItemAward {
                    item_id: ItemId::POKE_BALL,
                    item_count: 2,
                },
            ],
        };
        assert_eq!(reward.summarize_items(), "3 x Poke Ball, 1 x Potion");
        assert_eq!(reward.egg_label(), "none");
    }

    #[test]
    fn fort_decodes_gateway_json() {
        let fort: Fort = serde_json::from_str(
            r#"{"id":"abc","latitude":1.5,"longitude":2.5,"type":"checkpoint","cooldown_complete_ms":7}"#,
        )
        .expect("decode");
        assert_eq!(fort.fort_type, FortType::Checkpoint);
        assert_eq!(fort.cooldown_complete_ms, 7);
    }
}
