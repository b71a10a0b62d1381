use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::{ConfigError, Theme};

/// Number of pairs on a `side`x`side` board.
pub fn pair_count(side: usize) -> Result<usize, ConfigError> {
    let cells = side * side;
    if cells == 0 {
        return Err(ConfigError::EmptyBoard(side));
    }
    if cells % 2 != 0 {
        return Err(ConfigError::OddGeometry(side));
    }
    Ok(cells / 2)
}

/// Relative asset paths `assets/img/<theme>/<n>.png` for `n` in `0..pairs`.
pub fn image_paths(theme: Theme, pairs: usize) -> Vec<String> {
    (0..pairs)
        .map(|n| format!("assets/img/{}/{}.png", theme.as_str(), n))
        .collect()
}

pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}

/// Every image twice, uniformly shuffled.
pub fn build_deck<R: Rng + ?Sized>(images: &[String], rng: &mut R) -> Vec<String> {
    let mut deck = Vec::with_capacity(images.len() * 2);
    deck.extend_from_slice(images);
    deck.extend_from_slice(images);
    shuffle(&mut deck, rng);
    deck
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::config::BoardSize;

    fn counts(deck: &[String]) -> HashMap<&str, usize> {
        let mut out = HashMap::new();
        for id in deck {
            *out.entry(id.as_str()).or_insert(0) += 1;
        }
        out
    }

    #[test]
    fn every_supported_size_builds_a_full_deck() {
        let mut rng = StdRng::seed_from_u64(7);
        for size in BoardSize::ALL {
            let pairs = pair_count(size.side()).unwrap();
            let deck = build_deck(&image_paths(Theme::Fruits, pairs), &mut rng);
            assert_eq!(deck.len(), size.cells());
            let counts = counts(&deck);
            assert_eq!(counts.len(), pairs);
            assert!(counts.values().all(|&n| n == 2));
        }
    }

    #[test]
    fn odd_geometry_is_rejected() {
        assert_eq!(pair_count(5), Err(ConfigError::OddGeometry(5)));
        assert_eq!(pair_count(0), Err(ConfigError::EmptyBoard(0)));
        assert_eq!(pair_count(2), Ok(2));
    }

    #[test]
    fn image_paths_follow_asset_layout() {
        let paths = image_paths(Theme::Animals, 3);
        assert_eq!(
            paths,
            vec![
                "assets/img/animals/0.png",
                "assets/img/animals/1.png",
                "assets/img/animals/2.png",
            ]
        );
    }

    proptest! {
        #[test]
        fn shuffle_is_a_permutation(mut items in proptest::collection::vec(0u8..16, 0..64), seed in any::<u64>()) {
            let mut before = items.clone();
            let mut rng = StdRng::seed_from_u64(seed);
            shuffle(&mut items, &mut rng);
            before.sort_unstable();
            items.sort_unstable();
            prop_assert_eq!(before, items);
        }

        #[test]
        fn decks_hold_each_image_exactly_twice(pairs in 1usize..40, seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let deck = build_deck(&image_paths(Theme::Symbols, pairs), &mut rng);
            prop_assert_eq!(deck.len(), pairs * 2);
            let counts = counts(&deck);
            prop_assert_eq!(counts.len(), pairs);
            prop_assert!(counts.values().all(|&n| n == 2));
        }
    }
}
