use anyhow::{Context, Result};
use drillrush_game::{
    ContractGenerator, DrillEvent, DrillPhase, DrillSession, GenerationConfig, HazardKind,
    PlayerLedger, RecognitionTier, RngBundle, SessionConfig, SessionTotals, Upgrades,
};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::logic::autopilot::{PilotDecision, PilotStrategy};

/// Fixed frame used to drive the session clock.
pub const FRAME_MS: u32 = 16;

/// Frame cap per contract; about sixteen minutes of session clock.
pub const DEFAULT_MAX_FRAMES: u64 = 60_000;

/// Where the simulated contract comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractSource {
    /// First contract of the seeded board at this unlocked tier.
    Board(RecognitionTier),
    /// The all-hazards diagnostic contract.
    Diagnostic,
}

/// Configuration for one simulated contract.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub seed: u64,
    pub source: ContractSource,
    pub strategy: PilotStrategy,
    pub upgrades: Upgrades,
    pub session: SessionConfig,
    pub max_frames: u64,
}

impl SimulationConfig {
    #[must_use]
    pub fn new(source: ContractSource, strategy: PilotStrategy, seed: u64) -> Self {
        Self {
            seed,
            source,
            strategy,
            upgrades: Upgrades::default(),
            session: SessionConfig::default(),
            max_frames: DEFAULT_MAX_FRAMES,
        }
    }

    #[must_use]
    pub fn with_upgrades(mut self, upgrades: Upgrades) -> Self {
        self.upgrades = upgrades;
        self
    }

    #[must_use]
    pub fn with_session(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }

    #[must_use]
    pub fn with_max_frames(mut self, max_frames: u64) -> Self {
        self.max_frames = max_frames;
        self
    }
}

/// Everything a scenario expectation may inspect about a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub strategy: PilotStrategy,
    pub contract_id: u32,
    pub location: String,
    pub tier: RecognitionTier,
    pub known_hazards: Vec<HazardKind>,
    pub layer_count: usize,
    /// Hazard of every danger layer, in drilling order.
    pub danger_layers: Vec<HazardKind>,
    pub contract_oil: u32,
    pub phase: DrillPhase,
    pub layers_broken: usize,
    pub starting_lives: u8,
    pub lives_left: u8,
    pub totals: SessionTotals,
    pub ledger_oil: u64,
    pub ledger_recognition: u32,
    pub unlocked_tier: RecognitionTier,
    pub frames: u64,
    pub clock_ms: u64,
    pub returned_to_map: bool,
    pub maluses_triggered: Vec<HazardKind>,
    pub still_active: Vec<HazardKind>,
    pub decisions: Vec<PilotDecision>,
    pub event_count: usize,
    /// SHA-256 over the serialized event stream.
    pub digest: String,
}

impl RunSummary {
    #[must_use]
    pub fn danger_count(&self) -> usize {
        self.danger_layers.len()
    }

    #[must_use]
    pub fn contains_danger(&self, kind: HazardKind) -> bool {
        self.danger_layers.contains(&kind)
    }
}

/// Generate the configured contract and play it until the session hands back to the map.
///
/// # Errors
///
/// Fails if no contract can be generated or the event stream cannot be serialized.
pub fn run_contract(
    config: &SimulationConfig,
    generation: &GenerationConfig,
) -> Result<RunSummary> {
    let contract = match config.source {
        ContractSource::Board(tier) => ContractGenerator::new(generation.clone())
            .board_seeded(1, tier, &RngBundle::from_user_seed(config.seed))
            .into_iter()
            .next()
            .with_context(|| format!("no location unlocked at {tier:?}"))?,
        ContractSource::Diagnostic => ContractGenerator::diagnostic(1),
    };

    let mut pilot = config
        .strategy
        .create_pilot(config.seed, config.upgrades.radar_range());
    log::debug!(
        "{} pilot drilling {} with seed {}",
        pilot.name(),
        contract.title,
        config.seed
    );

    let mut session = DrillSession::start(
        contract,
        &config.upgrades.inventory(),
        config.session.clone(),
        config.seed,
    );
    let mut ledger = PlayerLedger::new();
    let mut events: Vec<DrillEvent> = Vec::new();
    let mut decisions = Vec::new();
    let mut frames = 0_u64;

    while !session.returned_to_map() && frames < config.max_frames {
        if !session.is_terminal() {
            decisions.extend(pilot.act(&mut session, &mut events));
        }
        session.tick(FRAME_MS, &mut ledger, &mut events);
        frames += 1;
    }
    if !session.returned_to_map() {
        log::warn!(
            "seed {} hit the frame cap at layer {}",
            config.seed,
            session.layer_index()
        );
    }

    let mut hasher = Sha256::new();
    for event in &events {
        hasher.update(serde_json::to_vec(event).context("serializing drill event")?);
    }

    let contract = session.contract();
    Ok(RunSummary {
        seed: config.seed,
        strategy: config.strategy,
        contract_id: contract.id,
        location: contract.title.clone(),
        tier: contract.tier,
        known_hazards: contract.known_hazards.to_vec(),
        layer_count: contract.layers.len(),
        danger_layers: contract.layers.iter().filter_map(|layer| layer.hazard()).collect(),
        contract_oil: contract.oil,
        phase: session.phase(),
        layers_broken: session.layer_index(),
        starting_lives: config.session.starting_lives,
        lives_left: session.lives(),
        totals: session.totals(),
        ledger_oil: ledger.oil,
        ledger_recognition: ledger.recognition,
        unlocked_tier: ledger.unlocked_tier(),
        frames,
        clock_ms: session.clock_ms(),
        returned_to_map: session.returned_to_map(),
        maluses_triggered: events
            .iter()
            .filter_map(|event| match event {
                DrillEvent::MalusTriggered { hazard } => Some(*hazard),
                _ => None,
            })
            .collect(),
        still_active: session.malus().active(),
        decisions,
        event_count: events.len(),
        digest: format!("{:x}", hasher.finalize()),
    })
}
