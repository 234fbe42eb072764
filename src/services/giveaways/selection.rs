use rand::seq::SliceRandom;
use rand::Rng;

/// Draws `winners` participants from the entry set without replacement.
///
/// The preferred entrant, when configured and present in the pool, always
/// takes one of the slots; the rest are sampled from the remaining pool.
/// Without a preferred entrant, a pool no larger than the slot count wins
/// outright. An empty pool yields no winners, never an error.
pub fn draw_winners<R: Rng + ?Sized>(
    rng: &mut R,
    entries: &[i64],
    winners: usize,
    preferred: Option<i64>,
) -> Vec<i64> {
    if entries.is_empty() {
        return Vec::new();
    }

    match preferred.filter(|p| entries.contains(p)) {
        Some(lucky) => {
            let rest: Vec<i64> = entries.iter().copied().filter(|&e| e != lucky).collect();
            let mut drawn = vec![lucky];
            drawn.extend(rest.choose_multiple(rng, winners.saturating_sub(1)).copied());
            drawn
        }
        None => {
            if entries.len() <= winners {
                entries.to_vec()
            } else {
                entries.choose_multiple(rng, winners).copied().collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn empty_pool_has_no_winners() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(draw_winners(&mut rng, &[], 3, Some(42)).is_empty());
    }

    #[test]
    fn preferred_entrant_always_wins_a_slot() {
        // Pool {A, B, C}, two slots, B preferred: B plus one of {A, C}
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let drawn = draw_winners(&mut rng, &[1, 2, 3], 2, Some(2));
            assert_eq!(drawn.len(), 2);
            assert!(drawn.contains(&2));
            assert!(drawn.iter().all(|w| [1, 2, 3].contains(w)));
            let other: Vec<&i64> = drawn.iter().filter(|&&w| w != 2).collect();
            assert_eq!(other.len(), 1);
        }
    }

    #[test]
    fn small_pool_without_preferred_wins_outright() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut drawn = draw_winners(&mut rng, &[1, 3], 2, Some(2));
        drawn.sort_unstable();
        assert_eq!(drawn, vec![1, 3]);
    }

    #[test]
    fn oversized_pool_is_sampled_without_replacement() {
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let pool: Vec<i64> = (1..=10).collect();
            let mut drawn = draw_winners(&mut rng, &pool, 4, None);
            assert_eq!(drawn.len(), 4);
            drawn.sort_unstable();
            drawn.dedup();
            assert_eq!(drawn.len(), 4, "winners must be distinct");
        }
    }

    #[test]
    fn preferred_absent_falls_back_to_plain_sampling() {
        let mut rng = StdRng::seed_from_u64(3);
        let drawn = draw_winners(&mut rng, &[1, 3], 2, Some(99));
        assert_eq!(drawn.len(), 2);
        assert!(!drawn.contains(&99));
    }

    #[test]
    fn single_slot_with_preferred_present_is_just_the_preferred() {
        let mut rng = StdRng::seed_from_u64(11);
        assert_eq!(draw_winners(&mut rng, &[1, 2, 3], 1, Some(3)), vec![3]);
    }
}
