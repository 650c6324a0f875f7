use std::hash::Hasher;

use drillrush_game::constants::DIAGNOSTIC_LOCATION;
use drillrush_game::{
    ContractGenerator, GenerationConfig, HazardKind, LayerKind, LayerVisual, RecognitionTier,
    RngBundle, dangers_for_tier, generate_layers, layers_for_location, locations_up_to,
    weighted_pick,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use twox_hash::XxHash64;

fn fingerprint(bytes: &[u8]) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(bytes);
    hasher.finish()
}

#[test]
fn every_tier_respects_its_layer_window() {
    let cfg = GenerationConfig::default();
    for tier in RecognitionTier::ALL {
        let range = cfg.layer_ranges.for_tier(tier);
        let known = dangers_for_tier(tier);
        for seed in 0..25 {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let layers = generate_layers(tier, known, &cfg, &mut rng);
            assert!(
                range.contains(layers.len()),
                "tier {tier:?} produced {} layers",
                layers.len()
            );
            assert_eq!(layers[0].kind, LayerKind::Normal);
            assert_eq!(layers[0].visual, Some(LayerVisual::Surface));
            for (index, layer) in layers.iter().enumerate() {
                assert_eq!(layer.index, index);
                assert!(layer.hardness >= 3.0 && layer.hardness < 7.0);
                match (layer.kind, layer.visual) {
                    (LayerKind::Danger(kind), visual) => {
                        assert!(known.contains(&kind));
                        assert!(visual.is_none());
                    }
                    (LayerKind::Normal, Some(LayerVisual::Strata(variant))) => {
                        assert!((1..=4).contains(&variant));
                    }
                    (LayerKind::Normal, visual) => {
                        assert_eq!(index, 0, "only the surface lacks strata: {visual:?}");
                    }
                }
            }
        }
    }
}

#[test]
fn normal_share_tracks_configured_chance() {
    let cfg = GenerationConfig::default();
    let mut rng = ChaCha20Rng::seed_from_u64(2024);
    let mut normal = 0_usize;
    let mut total = 0_usize;
    for _ in 0..40 {
        let layers = generate_layers(
            RecognitionTier::Global,
            dangers_for_tier(RecognitionTier::Global),
            &cfg,
            &mut rng,
        );
        normal += layers[1..].iter().filter(|layer| !layer.is_danger()).count();
        total += layers.len() - 1;
    }
    let share = normal as f64 / total as f64;
    assert!((0.35..0.45).contains(&share), "normal share {share}");
}

#[test]
fn every_hazard_shows_up_when_briefed() {
    let cfg = GenerationConfig::default();
    let mut rng = ChaCha20Rng::seed_from_u64(5);
    let layers: Vec<_> = (0..10)
        .flat_map(|_| generate_layers(RecognitionTier::Global, &HazardKind::ALL, &cfg, &mut rng))
        .collect();
    for kind in HazardKind::ALL {
        assert!(
            layers.iter().any(|layer| layer.hazard() == Some(kind)),
            "{kind} never generated"
        );
    }
}

fn assert_shares(counts: &[(HazardKind, usize)], weights: &[(HazardKind, f64)], tolerance: f64) {
    let drawn: usize = counts.iter().map(|(_, count)| count).sum();
    let total_weight: f64 = weights.iter().map(|(_, weight)| weight).sum();
    for ((kind, count), (_, weight)) in counts.iter().zip(weights) {
        let share = *count as f64 / drawn as f64;
        let expected = weight / total_weight;
        assert!(
            (share - expected).abs() < tolerance,
            "{kind}: share {share:.3}, expected {expected:.3} over {drawn} draws"
        );
    }
}

#[test]
fn danger_kinds_converge_to_their_ratios() {
    let cfg = GenerationConfig::default();
    let known = dangers_for_tier(RecognitionTier::Global);
    let mut counts: Vec<(HazardKind, usize)> = known.iter().map(|kind| (*kind, 0)).collect();
    let mut rng = ChaCha20Rng::seed_from_u64(77);
    for _ in 0..200 {
        for layer in generate_layers(RecognitionTier::Global, known, &cfg, &mut rng) {
            if let Some(kind) = layer.hazard()
                && let Some(slot) = counts.iter_mut().find(|(seen, _)| *seen == kind)
            {
                slot.1 += 1;
            }
        }
    }
    let weights: Vec<(HazardKind, f64)> = known.iter().map(|kind| (*kind, kind.ratio())).collect();
    assert_shares(&counts, &weights, 0.03);
}

#[test]
fn skewed_weights_are_honoured() {
    let weights = [
        (HazardKind::Toxic, 0.7),
        (HazardKind::Acid, 0.2),
        (HazardKind::Radiation, 0.1),
    ];
    let mut counts: Vec<(HazardKind, usize)> = weights.iter().map(|(kind, _)| (*kind, 0)).collect();
    let mut rng = ChaCha20Rng::seed_from_u64(31);
    for _ in 0..20_000 {
        let picked = weighted_pick(&weights, &mut rng).unwrap();
        if let Some(slot) = counts.iter_mut().find(|(kind, _)| *kind == picked) {
            slot.1 += 1;
        }
    }
    assert_shares(&counts, &weights, 0.02);
}

#[test]
fn degenerate_hardness_window_is_repaired_before_sampling() {
    let generator = ContractGenerator::new(GenerationConfig {
        hardness_min: 5.0,
        hardness_max: 5.0,
        ..GenerationConfig::default()
    });
    assert!(generator.generation().validate().is_ok());
    let mut rng = ChaCha20Rng::seed_from_u64(8);
    let contract = generator.generate(1, RecognitionTier::Global, &mut rng);
    assert!(
        contract
            .layers
            .iter()
            .all(|layer| (3.0..7.0).contains(&layer.hardness))
    );
}

#[test]
fn diagnostic_location_overrides_tier() {
    let cfg = GenerationConfig::default();
    let mut rng = ChaCha20Rng::seed_from_u64(0);
    let layers = layers_for_location(
        DIAGNOSTIC_LOCATION,
        RecognitionTier::Tutorial,
        &[HazardKind::Toxic],
        &cfg,
        &mut rng,
    );
    let kinds: Vec<_> = layers.iter().map(|layer| layer.kind).collect();
    let mut expected = vec![LayerKind::Normal, LayerKind::Normal];
    expected.extend(HazardKind::ALL.map(LayerKind::Danger));
    assert_eq!(kinds, expected);
}

#[test]
fn boards_only_offer_unlocked_locations() {
    let generator = ContractGenerator::default();
    for tier in RecognitionTier::ALL {
        let allowed: Vec<&str> = locations_up_to(tier).map(|location| location.name).collect();
        for seed in 0..10 {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            for contract in generator.default_board(tier, &mut rng) {
                assert!(allowed.contains(&contract.title.as_str()));
                assert!(contract.tier <= tier);
                if contract.tier.is_tutorial() {
                    assert_eq!(
                        contract.known_hazards.as_slice(),
                        &[HazardKind::Toxic, HazardKind::BioHazard]
                    );
                }
            }
        }
    }
}

#[test]
fn seeded_boards_fingerprint_identically() {
    let generator = ContractGenerator::default();
    let hash_for = |seed: u64| {
        let board =
            generator.board_seeded(8, RecognitionTier::Global, &RngBundle::from_user_seed(seed));
        fingerprint(&serde_json::to_vec(&board).unwrap())
    };
    assert_eq!(hash_for(0x00C0_FFEE), hash_for(0x00C0_FFEE));
    assert_ne!(hash_for(0x00C0_FFEE), hash_for(0x00C0_FFEF));
}
