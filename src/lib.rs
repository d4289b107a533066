pub mod analysis;
pub mod battle;
pub mod config;
pub mod fitness;
pub mod model;
pub mod moves;
pub mod optimizer;
pub mod report;
pub mod roster;
pub mod strategy;
pub mod types;

use crate::analysis::{AnalysisConfig, BattleAnalyzer};
use crate::battle::{derive_seed, BattleEngine};
use crate::config::Config;
use crate::fitness::Opponent;
use crate::model::{Combatant, PoolFile, Team};
use crate::optimizer::optimize_with_constraints;
use crate::strategy::MoveStrategy;
use crate::types::Type;
use anyhow::Context;
use log::{info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct CliOptions {
    pub config_path: Option<PathBuf>,
    pub pool_path: Option<PathBuf>,
    pub seed: Option<u64>,
    pub command: Command,
}

#[derive(Debug, Clone)]
pub enum Command {
    Optimize {
        generations: Option<usize>,
        population: Option<usize>,
        output: Option<PathBuf>,
        csv: Option<PathBuf>,
        required_types: Vec<Type>,
        min_total_stats: Option<u32>,
    },
    Analyze {
        team: Vec<String>,
        simulations: usize,
        output: Option<PathBuf>,
        csv_dir: Option<PathBuf>,
    },
    Simulate {
        team: Vec<String>,
        simulations: usize,
        strategy: Option<MoveStrategy>,
        opponent: Option<String>,
    },
    Demo,
}

pub fn load_pool(path: &Path) -> anyhow::Result<Vec<Combatant>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read pool file at {}", path.display()))?;
    let parsed: PoolFile = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse JSON from {}", path.display()))?;
    parsed
        .pokemon
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            let name = record.name.clone();
            record
                .into_combatant()
                .with_context(|| format!("Pool entry {i} ({name}) in {}", path.display()))
        })
        .collect()
}

/// Looks members up by name, case-insensitively, in the given order.
pub fn team_from_pool(pool: &[Combatant], names: &[String]) -> anyhow::Result<Team> {
    let members = names
        .iter()
        .map(|name| {
            pool.iter()
                .find(|c| c.name().eq_ignore_ascii_case(name.trim()))
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("{name} is not in the candidate pool"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    Team::new(members)
}

/// The whole roster, or the one opponent named.
pub fn select_opponents(
    roster: Vec<Opponent>,
    name: Option<&str>,
) -> anyhow::Result<Vec<Opponent>> {
    let Some(name) = name else {
        return Ok(roster);
    };
    let found = roster::find_opponent(&roster, name).cloned().ok_or_else(|| {
        let known: Vec<&str> = roster.iter().map(|o| o.name.as_str()).collect();
        anyhow::anyhow!("Unknown opponent {name} (known: {})", known.join(", "))
    })?;
    Ok(vec![found])
}

pub fn run(opts: CliOptions) -> anyhow::Result<()> {
    let mut config = match &opts.config_path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(seed) = opts.seed {
        config.optimizer.seed = seed;
    }
    let pool = match &opts.pool_path {
        Some(path) => load_pool(path)?,
        None => roster::builtin_pool()?,
    };
    if pool.is_empty() {
        warn!("Candidate pool is empty");
    }
    let opponents = roster::opponents()?;

    match opts.command {
        Command::Optimize {
            generations,
            population,
            output,
            csv,
            required_types,
            min_total_stats,
        } => {
            if !required_types.is_empty() {
                config.optimizer.constraints.required_types = required_types;
            }
            if let Some(min) = min_total_stats {
                config.optimizer.constraints.min_total_stats = min;
            }
            if let Some(generations) = generations {
                config.optimizer.generations = generations;
            }
            if let Some(population) = population {
                config.optimizer.population_size = population;
                config.optimizer.elite_count = config.optimizer.elite_count.min(population);
            }
            config.validate()?;
            let result = optimize_with_constraints(
                &pool,
                &opponents,
                &config.optimizer,
                &config.fitness,
                &config.battle,
            );
            println!("{}", report::summary(&result));
            if let Some(path) = output {
                report::write_json(&result, &path)?;
                println!("Wrote summary to {}", path.display());
            }
            if let Some(path) = csv {
                report::write_csv(&result.opponent_records, &path)?;
                println!("Wrote opponent table to {}", path.display());
            }
        }
        Command::Analyze {
            team,
            simulations,
            output,
            csv_dir,
        } => {
            if simulations == 0 {
                anyhow::bail!("--simulations must be > 0");
            }
            let mut team = team_from_pool(&pool, &team)?;
            team.set_level(config.fitness.competitive_level);
            let strategy = config
                .fitness
                .team_strategies
                .first()
                .copied()
                .unwrap_or(MoveStrategy::Balanced);
            let engine = BattleEngine::new(config.battle)
                .with_strategies(strategy, config.fitness.opponent_strategy);
            let analysis_config = AnalysisConfig {
                simulations,
                ..AnalysisConfig::default()
            };
            let analyzer =
                BattleAnalyzer::new(engine, &opponents, analysis_config, config.optimizer.seed);
            let analysis = analyzer.report(&team);
            print!("{}", report::team_table(&team));
            println!("\n{}", report::analysis_summary(&analysis));
            if let Some(path) = output {
                let body = serde_json::to_string_pretty(&analysis)?;
                std::fs::write(&path, body)
                    .with_context(|| format!("Failed to write analysis to {}", path.display()))?;
                println!("Wrote analysis to {}", path.display());
            }
            if let Some(dir) = csv_dir {
                report::write_analysis_csv(&analysis, &dir)?;
                println!("Wrote analysis tables to {}", dir.display());
            }
        }
        Command::Simulate {
            team,
            simulations,
            strategy,
            opponent,
        } => {
            if simulations == 0 {
                anyhow::bail!("--simulations must be > 0");
            }
            let opponents = select_opponents(opponents, opponent.as_deref())?;
            let mut team = team_from_pool(&pool, &team)?;
            team.set_level(config.fitness.competitive_level);
            let strategy = strategy
                .or_else(|| config.fitness.team_strategies.first().copied())
                .unwrap_or(MoveStrategy::Balanced);
            let engine = BattleEngine::new(config.battle)
                .with_strategies(strategy, config.fitness.opponent_strategy);
            info!("Simulating {:?} with {strategy} moves", team.names());
            print!("{}", report::team_table(&team));
            println!("\n{}", report::TABLE_HEADER);
            for (i, opponent) in opponents.iter().enumerate() {
                let stats = engine.simulate(
                    &team,
                    &opponent.team,
                    simulations,
                    derive_seed(config.optimizer.seed, 0, i as u64),
                );
                println!("{}", report::simulation_line(&opponent.name, &stats));
            }
        }
        Command::Demo => {
            let size = config.optimizer.team_size.min(pool.len());
            let mut team = Team::truncated(pool.iter().take(size).cloned().collect());
            team.set_level(config.fitness.competitive_level);
            let Some(opponent) = opponents.first() else {
                anyhow::bail!("No opponents available");
            };
            let engine = BattleEngine::new(config.battle).with_strategies(
                MoveStrategy::Balanced,
                config.fitness.opponent_strategy,
            );
            let mut rng = SmallRng::seed_from_u64(config.optimizer.seed);
            println!("{:?} vs {}", team.names(), opponent.name);
            let log = engine.run_team_match(&team, &opponent.team, &mut rng);
            print!("{}", report::battle_transcript(&log));
        }
    }
    Ok(())
}
