use crate::player::{BallStock, Pokeball};

/// Picks the ball to throw at a pokemon of the given CP.
///
/// Strong pokemon get the best ball in stock down to great; otherwise the weakest ball in
/// stock is used. Falls back to a poke ball even when the bag is empty. An unknown CP fails
/// every threshold.
pub fn select_ball(cp: Option<i32>, stock: &BallStock) -> Pokeball {
    let at_least = |threshold: i32| cp.is_some_and(|cp| cp >= threshold);

    if at_least(1000) {
        if stock.has(Pokeball::Master) {
            return Pokeball::Master;
        }
        if stock.has(Pokeball::Ultra) {
            return Pokeball::Ultra;
        }
        if stock.has(Pokeball::Great) {
            return Pokeball::Great;
        }
    }

    if at_least(600) {
        if stock.has(Pokeball::Ultra) {
            return Pokeball::Ultra;
        }
        if stock.has(Pokeball::Great) {
            return Pokeball::Great;
        }
    }

    if at_least(350) && stock.has(Pokeball::Great) {
        return Pokeball::Great;
    }

    Pokeball::ALL
        .into_iter()
        .find(|ball| stock.has(*ball))
        .unwrap_or(Pokeball::Poke)
}
