use anyhow::{Result, bail, ensure};
use drillrush_game::{DrillPhase, HazardKind, RecognitionTier, Upgrades};

use crate::logic::autopilot::PilotStrategy;
use crate::logic::simulation::{ContractSource, RunSummary};

/// Check applied to every finished run of a scenario.
pub type Expectation = fn(&RunSummary) -> Result<()>;

/// What to drill, who drills it, and what must hold afterwards.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub source: ContractSource,
    pub strategy: PilotStrategy,
    pub upgrades: Upgrades,
    pub starting_lives: Option<u8>,
    /// Run each seed twice and require identical event digests.
    pub replay: bool,
    pub expectations: Vec<Expectation>,
}

impl SimulationPlan {
    fn new(source: ContractSource, strategy: PilotStrategy) -> Self {
        Self {
            source,
            strategy,
            upgrades: Upgrades::default(),
            starting_lives: None,
            replay: false,
            expectations: baseline(),
        }
    }

    fn maxed(mut self) -> Self {
        self.upgrades = Upgrades::maxed();
        self
    }

    fn expecting(mut self, expectation: Expectation) -> Self {
        self.expectations.push(expectation);
        self
    }
}

#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: &'static str,
    pub description: &'static str,
    pub plan: SimulationPlan,
}

const CATALOG: [(&str, &str); 7] = [
    ("smoke", "Briefed pilot drills the tutorial contract end to end"),
    ("briefed-board", "Briefed pilot on a regional board with starter upgrades"),
    ("reckless-damage", "No masks ever: every danger layer costs a life"),
    ("clairvoyant-global", "Perfect foresight on a global contract with maxed upgrades"),
    ("diagnostic-walk", "Diagnostic contract triggers all six maluses"),
    ("replay-determinism", "Erratic pilot replays each seed to an identical event stream"),
    ("tutorial-unlock", "Completing the tutorial opens the regional tier"),
];

/// Every scenario key with its description.
#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    CATALOG.to_vec()
}

/// Keys expanded from `all`.
#[must_use]
pub fn all_scenario_names() -> Vec<String> {
    CATALOG.iter().map(|(name, _)| (*name).to_string()).collect()
}

#[must_use]
pub fn get_scenario(name: &str) -> Option<TestScenario> {
    let (name, description) = CATALOG
        .iter()
        .copied()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))?;
    let plan = match name {
        "smoke" => SimulationPlan::new(
            ContractSource::Board(RecognitionTier::Tutorial),
            PilotStrategy::Briefed,
        ),
        "briefed-board" => SimulationPlan::new(
            ContractSource::Board(RecognitionTier::Regional),
            PilotStrategy::Briefed,
        )
        .expecting(decisions_follow_briefing),
        "reckless-damage" => SimulationPlan::new(
            ContractSource::Board(RecognitionTier::Global),
            PilotStrategy::Reckless,
        )
        .expecting(every_danger_hurts),
        "clairvoyant-global" => SimulationPlan::new(
            ContractSource::Board(RecognitionTier::Global),
            PilotStrategy::Clairvoyant,
        )
        .maxed()
        .expecting(foresight_prevents_damage),
        "diagnostic-walk" => {
            let mut plan =
                SimulationPlan::new(ContractSource::Diagnostic, PilotStrategy::Clairvoyant)
                    .maxed()
                    .expecting(all_maluses_fired)
                    .expecting(completed);
            plan.starting_lives = Some(10);
            plan
        }
        "replay-determinism" => {
            let mut plan = SimulationPlan::new(
                ContractSource::Board(RecognitionTier::Continental),
                PilotStrategy::Erratic,
            )
            .maxed();
            plan.replay = true;
            plan
        }
        "tutorial-unlock" => SimulationPlan::new(
            ContractSource::Board(RecognitionTier::Tutorial),
            PilotStrategy::Clairvoyant,
        )
        .maxed()
        .expecting(completion_unlocks_regional),
        _ => return None,
    };
    Some(TestScenario {
        name,
        description,
        plan,
    })
}

fn baseline() -> Vec<Expectation> {
    vec![
        reaches_map,
        lives_account_for_damage,
        phase_matches_progress,
        ledger_matches_totals,
        maluses_cleared,
    ]
}

fn reaches_map(summary: &RunSummary) -> Result<()> {
    ensure!(summary.phase.is_terminal(), "session never ended ({:?})", summary.phase);
    ensure!(summary.returned_to_map, "session ended but never returned to the map");
    Ok(())
}

fn lives_account_for_damage(summary: &RunSummary) -> Result<()> {
    let expected = summary
        .starting_lives
        .saturating_sub(summary.totals.damage_taken);
    ensure!(
        summary.lives_left == expected,
        "lives {} but {} hits from {}",
        summary.lives_left,
        summary.totals.damage_taken,
        summary.starting_lives
    );
    Ok(())
}

fn phase_matches_progress(summary: &RunSummary) -> Result<()> {
    match summary.phase {
        DrillPhase::ContractComplete => ensure!(
            summary.layers_broken == summary.layer_count,
            "complete after {}/{} layers",
            summary.layers_broken,
            summary.layer_count
        ),
        DrillPhase::ContractFailed => ensure!(
            summary.lives_left == 0,
            "failed with {} lives left",
            summary.lives_left
        ),
        other => bail!("unexpected final phase {other:?}"),
    }
    Ok(())
}

fn ledger_matches_totals(summary: &RunSummary) -> Result<()> {
    ensure!(
        summary.ledger_oil == u64::from(summary.totals.oil_earned()),
        "ledger holds {} oil, session paid {}",
        summary.ledger_oil,
        summary.totals.oil_earned()
    );
    let recognition = summary
        .totals
        .recognition_gained
        .saturating_sub(summary.totals.recognition_lost);
    ensure!(
        summary.ledger_recognition == recognition,
        "ledger recognition {} != {recognition}",
        summary.ledger_recognition
    );
    Ok(())
}

fn maluses_cleared(summary: &RunSummary) -> Result<()> {
    ensure!(
        summary.still_active.is_empty(),
        "maluses still active after the contract: {:?}",
        summary.still_active
    );
    Ok(())
}

fn decisions_follow_briefing(summary: &RunSummary) -> Result<()> {
    if let Some(stray) = summary
        .decisions
        .iter()
        .find(|decision| !summary.known_hazards.contains(&decision.hazard))
    {
        bail!("equipped unbriefed {} at layer {}", stray.hazard, stray.layer);
    }
    Ok(())
}

fn every_danger_hurts(summary: &RunSummary) -> Result<()> {
    let lives = usize::from(summary.starting_lives);
    let expected = summary.danger_count().min(lives);
    ensure!(
        usize::from(summary.totals.damage_taken) == expected,
        "{} hits from {} danger layers",
        summary.totals.damage_taken,
        summary.danger_count()
    );
    let should_fail = summary.danger_count() >= lives;
    ensure!(
        (summary.phase == DrillPhase::ContractFailed) == should_fail,
        "{:?} with {} danger layers",
        summary.phase,
        summary.danger_count()
    );
    Ok(())
}

fn foresight_prevents_damage(summary: &RunSummary) -> Result<()> {
    // Quarantine and irradiated masks can legitimately leave the pilot exposed.
    if summary.contains_danger(HazardKind::BioHazard)
        || summary.contains_danger(HazardKind::Radiation)
    {
        return Ok(());
    }
    ensure!(
        summary.totals.damage_taken == 0,
        "took {} hits with perfect foresight",
        summary.totals.damage_taken
    );
    ensure!(summary.phase == DrillPhase::ContractComplete, "did not complete");
    Ok(())
}

fn all_maluses_fired(summary: &RunSummary) -> Result<()> {
    for kind in HazardKind::ALL {
        ensure!(
            summary.maluses_triggered.contains(&kind),
            "{kind} malus never triggered"
        );
    }
    Ok(())
}

fn completed(summary: &RunSummary) -> Result<()> {
    ensure!(
        summary.phase == DrillPhase::ContractComplete,
        "ended {:?}",
        summary.phase
    );
    Ok(())
}

fn completion_unlocks_regional(summary: &RunSummary) -> Result<()> {
    let expected = if summary.phase == DrillPhase::ContractComplete {
        RecognitionTier::Regional
    } else {
        RecognitionTier::Tutorial
    };
    ensure!(
        summary.unlocked_tier == expected,
        "{:?} unlocked after {:?}",
        summary.unlocked_tier,
        summary.phase
    );
    Ok(())
}
