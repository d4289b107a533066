use crate::battle::BattleOptions;
use crate::fitness::FitnessConfig;
use crate::model::MAX_TEAM_SIZE;
use crate::optimizer::OptimizerConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Every tunable of a run. Missing sections and fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub battle: BattleOptions,
    pub fitness: FitnessConfig,
    pub optimizer: OptimizerConfig,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;
        Config::from_json(&raw)
            .with_context(|| format!("Invalid config in {}", path.display()))
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Config> {
        let config: Config = serde_json::from_str(raw).context("Failed to parse config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.battle.max_turns == 0 {
            anyhow::bail!("battle.max_turns must be > 0");
        }
        let opt = &self.optimizer;
        if opt.population_size == 0 {
            anyhow::bail!("optimizer.population_size must be > 0");
        }
        if opt.team_size == 0 || opt.team_size > MAX_TEAM_SIZE {
            anyhow::bail!(
                "optimizer.team_size must be within 1..={MAX_TEAM_SIZE}, got {}",
                opt.team_size
            );
        }
        for (name, rate) in [
            ("optimizer.mutation_rate", opt.mutation_rate),
            ("optimizer.crossover_rate", opt.crossover_rate),
            ("optimizer.seeded_fraction", opt.seeded_fraction),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                anyhow::bail!("{name} must be within [0, 1], got {rate}");
            }
        }
        if opt.elite_count > opt.population_size {
            anyhow::bail!(
                "optimizer.elite_count {} exceeds population_size {}",
                opt.elite_count,
                opt.population_size
            );
        }
        let w = &self.fitness.weights;
        for (name, weight) in [
            ("battle", w.battle),
            ("type_coverage", w.type_coverage),
            ("stat_balance", w.stat_balance),
            ("move_diversity", w.move_diversity),
            ("resistance", w.resistance),
        ] {
            if weight.is_nan() || weight < 0.0 {
                anyhow::bail!("fitness.weights.{name} must be >= 0, got {weight}");
            }
        }
        if self.fitness.simulations_per_strategy == 0 {
            anyhow::bail!("fitness.simulations_per_strategy must be > 0");
        }
        if self.fitness.team_strategies.is_empty() {
            anyhow::bail!("fitness.team_strategies must name at least one strategy");
        }
        if self.fitness.competitive_level == 0 || self.fitness.competitive_level > 100 {
            anyhow::bail!(
                "fitness.competitive_level must be within 1..=100, got {}",
                self.fitness.competitive_level
            );
        }
        Ok(())
    }
}
