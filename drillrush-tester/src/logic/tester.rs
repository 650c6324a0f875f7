use colored::Colorize;
use drillrush_game::TuningConfig;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::logic::simulation::{RunSummary, SimulationConfig, run_contract};
use crate::scenarios::{SimulationPlan, TestScenario};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    #[serde(with = "duration_vec_serde")]
    pub performance_data: Vec<Duration>,
}

pub struct LogicTester {
    tuning: TuningConfig,
    max_frames: u64,
    verbose: bool,
}

impl LogicTester {
    pub const fn new(tuning: TuningConfig, max_frames: u64, verbose: bool) -> Self {
        Self {
            tuning,
            max_frames,
            verbose,
        }
    }

    pub fn run_scenario(
        &self,
        scenario: &TestScenario,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        let mut results = Vec::new();

        for &seed in seeds {
            if self.verbose {
                println!(
                    "🧪 Testing scenario: {} (pilot: {} seed: {})",
                    scenario.name.bright_white(),
                    scenario.plan.strategy,
                    seed
                );
            }
            results.push(self.run_single_scenario(scenario, seed, iterations));
        }

        results
    }

    fn run_single_scenario(
        &self,
        scenario: &TestScenario,
        seed: u64,
        iterations: usize,
    ) -> ScenarioResult {
        let (successes, failures, performance_data) =
            self.run_simulation_iterations(&scenario.plan, seed, iterations);

        let average_duration = if performance_data.is_empty() {
            Duration::ZERO
        } else {
            performance_data.iter().sum::<Duration>()
                / u32::try_from(performance_data.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: scenario.name.to_string(),
            seed,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_duration,
            performance_data,
        }
    }

    fn config_for(&self, plan: &SimulationPlan, seed: u64) -> SimulationConfig {
        let mut session = self.tuning.session.clone();
        if let Some(lives) = plan.starting_lives {
            session.starting_lives = lives;
        }
        SimulationConfig::new(plan.source, plan.strategy, seed)
            .with_upgrades(plan.upgrades.clone())
            .with_session(session)
            .with_max_frames(self.max_frames)
    }

    fn run_simulation_iterations(
        &self,
        plan: &SimulationPlan,
        seed: u64,
        iterations: usize,
    ) -> (usize, Vec<String>, Vec<Duration>) {
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut performance_data = Vec::new();

        for i in 0..iterations {
            let start_time = Instant::now();
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));
            let config = self.config_for(plan, iteration_seed);

            let outcome = run_contract(&config, &self.tuning.generation).map(|summary| {
                let verdict = self.check(plan, &config, &summary);
                (summary, verdict)
            });

            match outcome {
                Ok((summary, Ok(()))) => {
                    successes += 1;
                    let duration = start_time.elapsed();
                    performance_data.push(duration);
                    if self.verbose {
                        println!(
                            "  ✅ Iteration {}/{} passed ({duration:?}) {} {}/{} {:?} lives:{}",
                            i + 1,
                            iterations,
                            summary.location,
                            summary.layers_broken,
                            summary.layer_count,
                            summary.phase,
                            summary.lives_left
                        );
                    }
                }
                Ok((summary, Err(err))) => {
                    let context = summarize_run(&summary);
                    failures.push(format!(
                        "Iteration {} (pilot {}, seed {}): {err:#} | {context}",
                        i + 1,
                        plan.strategy,
                        iteration_seed
                    ));
                    if self.verbose {
                        println!(
                            "  ❌ Iteration {}/{} failed: {}",
                            i + 1,
                            iterations,
                            format!("{err:#}").red()
                        );
                        println!("     ↳ {context}");
                    }
                }
                Err(err) => {
                    failures.push(format!(
                        "Iteration {} (pilot {}, seed {}): run aborted: {err:#}",
                        i + 1,
                        plan.strategy,
                        iteration_seed
                    ));
                }
            }
        }

        (successes, failures, performance_data)
    }

    /// Run the plan's expectations, then replay the seed when the plan asks for it.
    fn check(
        &self,
        plan: &SimulationPlan,
        config: &SimulationConfig,
        summary: &RunSummary,
    ) -> anyhow::Result<()> {
        for expectation in &plan.expectations {
            expectation(summary)?;
        }
        if plan.replay {
            let replay = run_contract(config, &self.tuning.generation)?;
            if replay.digest != summary.digest {
                anyhow::bail!(
                    "replay diverged: {} vs {}",
                    &summary.digest[..12],
                    &replay.digest[..12]
                );
            }
        }
        Ok(())
    }
}

fn summarize_run(summary: &RunSummary) -> String {
    let decisions = if summary.decisions.is_empty() {
        "no decisions recorded".to_string()
    } else {
        summary
            .decisions
            .iter()
            .rev()
            .take(3)
            .map(|decision| {
                format!(
                    "layer {}: {} -> slot {} [{}]",
                    decision.layer, decision.hazard, decision.slot, decision.rationale
                )
            })
            .collect::<Vec<_>>()
            .join(" | ")
    };
    format!(
        "{} ({:?}) {:?} after {}/{} layers, lives {}/{}, {} dangers | {decisions}",
        summary.location,
        summary.tier,
        summary.phase,
        summary.layers_broken,
        summary.layer_count,
        summary.lives_left,
        summary.starting_lives,
        summary.danger_count()
    )
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}

mod duration_vec_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis: Vec<u128> = durations.iter().map(Duration::as_millis).collect();
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis_vec = Vec::<u128>::deserialize(deserializer)?;
        Ok(millis_vec
            .into_iter()
            .map(|m| Duration::from_millis(u64::try_from(m).unwrap_or(0)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::simulation::DEFAULT_MAX_FRAMES;
    use crate::scenarios::get_scenario;

    fn always_fails(_summary: &RunSummary) -> anyhow::Result<()> {
        anyhow::bail!("always fails")
    }

    #[test]
    fn smoke_scenario_passes_on_default_seed() {
        let tester = LogicTester::new(TuningConfig::default_config(), DEFAULT_MAX_FRAMES, false);
        let scenario = get_scenario("smoke").unwrap();
        let results = tester.run_scenario(&scenario, &[1337], 2);
        assert_eq!(results.len(), 1);
        assert!(results[0].passed, "{:?}", results[0].failures);
        assert_eq!(results[0].successful_iterations, 2);
    }

    #[test]
    fn failing_expectation_is_reported() {
        let tester = LogicTester::new(TuningConfig::default_config(), DEFAULT_MAX_FRAMES, false);
        let mut scenario = get_scenario("smoke").unwrap();
        scenario.plan.expectations.push(always_fails);
        let results = tester.run_scenario(&scenario, &[1], 1);
        assert!(!results[0].passed);
        assert!(results[0].failures[0].contains("always fails"));
        assert!(results[0].failures[0].contains("seed 1"));
    }

    #[test]
    fn result_json_uses_milliseconds() {
        let result = ScenarioResult {
            scenario_name: "smoke".to_string(),
            seed: 1,
            passed: true,
            iterations_run: 1,
            successful_iterations: 1,
            failures: Vec::new(),
            average_duration: Duration::from_millis(12),
            performance_data: vec![Duration::from_millis(12)],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["average_duration"], 12);
        assert_eq!(json["performance_data"][0], 12);
    }
}
