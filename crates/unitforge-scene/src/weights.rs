//! Bone-weight normalization
//!
//! Caps a vertex's bone influences to a fixed count, dropping the weakest,
//! and rescales the survivors to sum to one. The all-zero case passes
//! through unscaled so a degenerate rig never divides by zero.

/// Fixed-length bone influences attached to a vertex
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoneInfluences {
    pub indices: Vec<u32>,
    pub weights: Vec<f32>,
}

/// Normalize a vertex's bone influences to exactly `max` entries.
///
/// Pairs are sorted by weight descending and truncated to `max`; the
/// remaining weights are rescaled by the inverse of their sum when that
/// sum is positive. Short inputs are padded with `(0, 0.0)`.
///
/// Empty input yields `max` zero pads. This operation cannot fail.
pub fn normalize(indices: &[u32], weights: &[f32], max: usize) -> BoneInfluences {
    let mut pairs: Vec<(u32, f32)> = indices
        .iter()
        .copied()
        .zip(weights.iter().copied())
        .collect();

    // Drop the least important bones.
    pairs.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    pairs.truncate(max);

    // Reweight the survivors.
    let total: f32 = pairs.iter().map(|&(_, w)| w).sum();
    if total > 0.0 {
        for pair in &mut pairs {
            pair.1 /= total;
        }
    }

    while pairs.len() < max {
        pairs.push((0, 0.0));
    }

    BoneInfluences {
        indices: pairs.iter().map(|&(bone, _)| bone).collect(),
        weights: pairs.iter().map(|&(_, weight)| weight).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_caps_and_rescales() {
        let influences = normalize(
            &[0, 1, 2, 3, 4],
            &[0.1, 0.5, 0.3, 0.05, 0.05],
            4,
        );

        assert_eq!(influences.indices.len(), 4);
        assert_eq!(influences.weights.len(), 4);

        // Strongest influence first, one of the tied weakest dropped.
        assert_eq!(influences.indices[0], 1);
        assert!(!influences.indices.contains(&3) || !influences.indices.contains(&4));

        let sum: f32 = influences.weights.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_all_zero_passes_through() {
        let influences = normalize(&[5, 6], &[0.0, 0.0], 4);
        assert_eq!(influences.weights, vec![0.0, 0.0, 0.0, 0.0]);
        assert_eq!(influences.indices.len(), 4);
    }

    #[test]
    fn test_short_input_is_padded() {
        let influences = normalize(&[7], &[0.25], 4);
        assert_eq!(influences.indices, vec![7, 0, 0, 0]);
        assert_eq!(influences.weights, vec![1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_empty_input_yields_pads() {
        let influences = normalize(&[], &[], 4);
        assert_eq!(influences.indices, vec![0, 0, 0, 0]);
        assert_eq!(influences.weights, vec![0.0, 0.0, 0.0, 0.0]);
    }

    proptest! {
        #[test]
        fn prop_output_length_is_max(
            pairs in prop::collection::vec((0u32..128, 0.0f32..10.0), 0..12),
            max in 1usize..8,
        ) {
            let indices: Vec<u32> = pairs.iter().map(|&(b, _)| b).collect();
            let weights: Vec<f32> = pairs.iter().map(|&(_, w)| w).collect();
            let influences = normalize(&indices, &weights, max);
            prop_assert_eq!(influences.indices.len(), max);
            prop_assert_eq!(influences.weights.len(), max);
        }

        #[test]
        fn prop_nonzero_input_sums_to_one(
            pairs in prop::collection::vec((0u32..128, 0.01f32..10.0), 1..12),
            max in 1usize..8,
        ) {
            let indices: Vec<u32> = pairs.iter().map(|&(b, _)| b).collect();
            let weights: Vec<f32> = pairs.iter().map(|&(_, w)| w).collect();
            let influences = normalize(&indices, &weights, max);
            let sum: f32 = influences.weights.iter().sum();
            prop_assert!((sum - 1.0).abs() < 1e-5);
        }

        #[test]
        fn prop_output_weights_are_descending(
            pairs in prop::collection::vec((0u32..128, 0.0f32..10.0), 0..12),
            max in 1usize..8,
        ) {
            let indices: Vec<u32> = pairs.iter().map(|&(b, _)| b).collect();
            let weights: Vec<f32> = pairs.iter().map(|&(_, w)| w).collect();
            let influences = normalize(&indices, &weights, max);
            prop_assert!(influences.weights.windows(2).all(|w| w[0] >= w[1]));
        }

        #[test]
        fn prop_strongest_influence_survives(
            pairs in prop::collection::vec((0u32..128, 0.01f32..10.0), 1..12),
        ) {
            let indices: Vec<u32> = pairs.iter().map(|&(b, _)| b).collect();
            let weights: Vec<f32> = pairs.iter().map(|&(_, w)| w).collect();
            let influences = normalize(&indices, &weights, 4);

            let strongest = pairs
                .iter()
                .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
                .unwrap()
                .1;
            // The top input weight is always kept, and kept first.
            let total: f32 = {
                let mut sorted = weights.clone();
                sorted.sort_by(|a, b| b.partial_cmp(a).unwrap());
                sorted.iter().take(4).sum()
            };
            prop_assert!((influences.weights[0] - strongest / total).abs() < 1e-5);
        }
    }
}
