//! Contract generation: location, briefing, layers and reward.
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::config::GenerationConfig;
use crate::constants::{
    CONTRACT_OIL_MAX, CONTRACT_OIL_MIN, DEFAULT_BOARD_SIZE, DIAGNOSTIC_LOCATION,
    KNOWN_DANGERS_MAX, MIN_STEPS_HIGH, MIN_STEPS_LOW,
};
use crate::hazards::{HazardKind, dangers_for_tier};
use crate::layers::{Layer, diagnostic_layers, layers_for_location};
use crate::locations::{Location, all_locations, locations_up_to};
use crate::rng::RngBundle;
use crate::tier::RecognitionTier;

/// Briefed hazards; never more than the six catalog kinds.
pub type KnownHazards = SmallVec<[HazardKind; 6]>;

/// A drilling job offered on the world map. Immutable once generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: u32,
    /// Location name.
    pub title: String,
    pub oil: u32,
    /// Suggested number of steps shown on the briefing panel.
    pub min_steps: u8,
    pub known_hazards: KnownHazards,
    pub layers: Vec<Layer>,
    pub lat: f64,
    pub lon: f64,
    pub tier: RecognitionTier,
}

impl Contract {
    #[must_use]
    pub fn knows(&self, kind: HazardKind) -> bool {
        self.known_hazards.contains(&kind)
    }

    #[must_use]
    pub fn danger_count(&self) -> usize {
        self.layers.iter().filter(|layer| layer.is_danger()).count()
    }

    #[must_use]
    pub fn is_diagnostic(&self) -> bool {
        self.title == DIAGNOSTIC_LOCATION
    }
}

/// Builds contracts from the location table and generation tuning.
#[derive(Debug, Clone, Default)]
pub struct ContractGenerator {
    generation: GenerationConfig,
}

impl ContractGenerator {
    #[must_use]
    pub fn new(mut generation: GenerationConfig) -> Self {
        generation.sanitize();
        Self { generation }
    }

    #[must_use]
    pub const fn generation(&self) -> &GenerationConfig {
        &self.generation
    }

    /// Pick the hazards a contract at `tier` briefs the player on.
    ///
    /// Tutorial sites always brief both tutorial hazards; other sites brief
    /// one to three distinct hazards from the tier's unlocked set, shuffled.
    pub fn roll_known_hazards<R>(tier: RecognitionTier, rng: &mut R) -> KnownHazards
    where
        R: Rng + ?Sized,
    {
        let available = dangers_for_tier(tier);
        if tier.is_tutorial() {
            return available.iter().copied().collect();
        }
        let upper = available.len().min(KNOWN_DANGERS_MAX);
        let count = rng.gen_range(1..=upper);
        let mut pool: KnownHazards = available.iter().copied().collect();
        pool.shuffle(rng);
        pool.truncate(count);
        pool
    }

    /// Generate a contract for a specific location.
    pub fn for_location<R>(&self, id: u32, location: &Location, rng: &mut R) -> Contract
    where
        R: Rng + ?Sized,
    {
        let known_hazards = Self::roll_known_hazards(location.tier, rng);
        let layers = layers_for_location(
            location.name,
            location.tier,
            &known_hazards,
            &self.generation,
            rng,
        );
        let oil = rng.gen_range(CONTRACT_OIL_MIN..CONTRACT_OIL_MAX);
        let min_steps = rng.gen_range(MIN_STEPS_LOW..=MIN_STEPS_HIGH);
        Self::assemble(id, location, known_hazards, layers, oil, min_steps)
    }

    fn assemble(
        id: u32,
        location: &Location,
        known_hazards: KnownHazards,
        layers: Vec<Layer>,
        oil: u32,
        min_steps: u8,
    ) -> Contract {
        log::debug!(
            "contract {id} at {}: {} layers, {} known hazards, {oil} oil",
            location.name,
            layers.len(),
            known_hazards.len()
        );
        Contract {
            id,
            title: location.name.to_string(),
            oil,
            min_steps,
            known_hazards,
            layers,
            lat: location.lat,
            lon: location.lon,
            tier: location.tier,
        }
    }

    /// Like [`Self::for_location`], but draws layers from the bundle's layer stream
    /// and everything else from its contract stream.
    #[must_use]
    pub fn for_location_seeded(&self, id: u32, location: &Location, rngs: &RngBundle) -> Contract {
        let mut picks = rngs.contracts();
        let known_hazards = Self::roll_known_hazards(location.tier, &mut *picks);
        let layers = layers_for_location(
            location.name,
            location.tier,
            &known_hazards,
            &self.generation,
            &mut *rngs.layers(),
        );
        let oil = picks.gen_range(CONTRACT_OIL_MIN..CONTRACT_OIL_MAX);
        let min_steps = picks.gen_range(MIN_STEPS_LOW..=MIN_STEPS_HIGH);
        Self::assemble(id, location, known_hazards, layers, oil, min_steps)
    }

    /// Board generation over an [`RngBundle`]; the board for a seed is stable.
    #[must_use]
    pub fn board_seeded(
        &self,
        count: usize,
        unlocked: RecognitionTier,
        rngs: &RngBundle,
    ) -> Vec<Contract> {
        let mut pool: Vec<&Location> = locations_up_to(unlocked).collect();
        pool.shuffle(&mut *rngs.contracts());
        pool.into_iter()
            .take(count)
            .zip(1_u32..)
            .map(|(location, id)| self.for_location_seeded(id, location, rngs))
            .collect()
    }

    /// Generate a contract at a location drawn uniformly from those at or below `unlocked`.
    pub fn generate<R>(&self, id: u32, unlocked: RecognitionTier, rng: &mut R) -> Contract
    where
        R: Rng + ?Sized,
    {
        let pool: Vec<&Location> = locations_up_to(unlocked).collect();
        let location = pool
            .choose(rng)
            .copied()
            .unwrap_or(&all_locations()[0]);
        self.for_location(id, location, rng)
    }

    /// Generate up to `count` contracts on distinct locations, numbered from 1.
    pub fn generate_board<R>(
        &self,
        count: usize,
        unlocked: RecognitionTier,
        rng: &mut R,
    ) -> Vec<Contract>
    where
        R: Rng + ?Sized,
    {
        let mut pool: Vec<&Location> = locations_up_to(unlocked).collect();
        pool.shuffle(rng);
        pool.into_iter()
            .take(count)
            .zip(1_u32..)
            .map(|(location, id)| self.for_location(id, location, rng))
            .collect()
    }

    /// Board of the default size.
    pub fn default_board<R>(&self, unlocked: RecognitionTier, rng: &mut R) -> Vec<Contract>
    where
        R: Rng + ?Sized,
    {
        self.generate_board(DEFAULT_BOARD_SIZE, unlocked, rng)
    }

    /// The diagnostic contract: every hazard briefed, one danger layer per kind.
    #[must_use]
    pub fn diagnostic(id: u32) -> Contract {
        let layers = diagnostic_layers();
        Contract {
            id,
            title: DIAGNOSTIC_LOCATION.to_string(),
            oil: CONTRACT_OIL_MIN,
            min_steps: u8::try_from(layers.len()).unwrap_or(u8::MAX),
            known_hazards: HazardKind::ALL.iter().copied().collect(),
            layers,
            lat: 0.0,
            lon: 0.0,
            tier: RecognitionTier::Global,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn tutorial_contract_briefs_both_tutorial_hazards() {
        let generator = ContractGenerator::default();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let contract = generator.generate(1, RecognitionTier::Tutorial, &mut rng);
        assert_eq!(contract.title, "Angola");
        assert_eq!(
            contract.known_hazards.as_slice(),
            &[HazardKind::Toxic, HazardKind::BioHazard]
        );
        assert_eq!(contract.layers.len(), 5);
    }

    #[test]
    fn rewards_and_hints_stay_in_range() {
        let generator = ContractGenerator::default();
        for seed in 0..30 {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let contract = generator.generate(7, RecognitionTier::Global, &mut rng);
            assert!((1_000..6_000).contains(&contract.oil));
            assert!((3..=10).contains(&contract.min_steps));
            assert!(!contract.known_hazards.is_empty());
            assert!(contract.known_hazards.len() <= 3);
            let allowed = dangers_for_tier(contract.tier);
            for kind in &contract.known_hazards {
                assert!(allowed.contains(kind));
            }
            for layer in &contract.layers {
                if let Some(kind) = layer.hazard() {
                    assert!(contract.knows(kind));
                }
            }
        }
    }

    #[test]
    fn known_hazards_are_distinct() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        for _ in 0..50 {
            let known = ContractGenerator::roll_known_hazards(RecognitionTier::Global, &mut rng);
            let mut sorted = known.to_vec();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), known.len());
        }
    }

    #[test]
    fn board_uses_distinct_locations_and_sequential_ids() {
        let generator = ContractGenerator::default();
        let mut rng = ChaCha20Rng::seed_from_u64(8);
        let board = generator.default_board(RecognitionTier::Global, &mut rng);
        assert_eq!(board.len(), 8);
        let ids: Vec<u32> = board.iter().map(|contract| contract.id).collect();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());
        let mut titles: Vec<&str> = board.iter().map(|contract| contract.title.as_str()).collect();
        titles.sort_unstable();
        titles.dedup();
        assert_eq!(titles.len(), 8);

        let small = generator.generate_board(8, RecognitionTier::Tutorial, &mut rng);
        assert_eq!(small.len(), 1);
    }

    #[test]
    fn diagnostic_contract_knows_everything() {
        let contract = ContractGenerator::diagnostic(99);
        assert!(contract.is_diagnostic());
        assert_eq!(contract.known_hazards.len(), 6);
        assert_eq!(contract.danger_count(), 6);
        assert_eq!(contract.layers.len(), 8);
    }

    #[test]
    fn seeded_board_is_stable_per_seed() {
        let generator = ContractGenerator::default();
        let a = generator.board_seeded(5, RecognitionTier::Global, &RngBundle::from_user_seed(77));
        let b = generator.board_seeded(5, RecognitionTier::Global, &RngBundle::from_user_seed(77));
        let c = generator.board_seeded(5, RecognitionTier::Global, &RngBundle::from_user_seed(78));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn generation_is_seed_stable() {
        let generator = ContractGenerator::default();
        let mut a = ChaCha20Rng::seed_from_u64(123);
        let mut b = ChaCha20Rng::seed_from_u64(123);
        assert_eq!(
            generator.generate_board(4, RecognitionTier::Continental, &mut a),
            generator.generate_board(4, RecognitionTier::Continental, &mut b)
        );
    }
}
