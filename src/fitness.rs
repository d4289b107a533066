//! Team scoring: simulated results against the opponent roster blended with
//! static measures of coverage, balance and variety.

use crate::battle::{derive_seed, BattleEngine, BattleOptions};
use crate::model::{MoveCategory, Stat, Team};
use crate::strategy::MoveStrategy;
use crate::types::{effectiveness, Type};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const TYPE_COUNT: f64 = Type::ALL.len() as f64;
const CATEGORY_COUNT: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FitnessWeights {
    pub battle: f64,
    pub type_coverage: f64,
    pub stat_balance: f64,
    pub move_diversity: f64,
    pub resistance: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        FitnessWeights {
            battle: 0.5,
            type_coverage: 0.2,
            stat_balance: 0.15,
            move_diversity: 0.10,
            resistance: 0.05,
        }
    }
}

impl FitnessWeights {
    pub fn sum(&self) -> f64 {
        self.battle + self.type_coverage + self.stat_balance + self.move_diversity + self.resistance
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FitnessConfig {
    pub weights: FitnessWeights,
    /// Every evaluated team is set to this level first.
    pub competitive_level: u8,
    pub simulations_per_strategy: usize,
    pub team_strategies: Vec<MoveStrategy>,
    pub opponent_strategy: MoveStrategy,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        FitnessConfig {
            weights: FitnessWeights::default(),
            competitive_level: 60,
            simulations_per_strategy: 3,
            team_strategies: vec![
                MoveStrategy::Balanced,
                MoveStrategy::TypeEffective,
                MoveStrategy::HighestDamage,
                MoveStrategy::StatusFirst,
            ],
            opponent_strategy: MoveStrategy::Balanced,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Opponent {
    pub name: String,
    pub specialty: Option<Type>,
    pub team: Team,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FitnessReport {
    pub score: f64,
    pub battle: f64,
    pub type_coverage: f64,
    pub stat_balance: f64,
    pub move_diversity: f64,
    pub resistance: f64,
    /// Win rate against each opponent, in roster order.
    pub opponent_win_rates: Vec<f64>,
    /// Win rate of each team strategy across the roster, in config order.
    pub strategy_win_rates: Vec<StrategyWinRate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrategyWinRate {
    pub strategy: MoveStrategy,
    pub win_rate: f64,
}

pub struct FitnessEvaluator<'a> {
    config: &'a FitnessConfig,
    battle: BattleOptions,
    opponents: &'a [Opponent],
    threats: Vec<Type>,
}

impl<'a> FitnessEvaluator<'a> {
    pub fn new(
        config: &'a FitnessConfig,
        battle: &BattleOptions,
        opponents: &'a [Opponent],
    ) -> Self {
        FitnessEvaluator {
            config,
            battle: *battle,
            opponents,
            threats: threat_types(opponents),
        }
    }

    /// Normalizes the team's level, then scores it. Deterministic for a given
    /// team and seed.
    pub fn evaluate(&self, team: &mut Team, seed: u64) -> FitnessReport {
        team.set_level(self.config.competitive_level);
        let table = self.win_table(team, seed);
        let opponent_win_rates: Vec<f64> = table.iter().map(|row| mean(row)).collect();
        let strategy_win_rates = self
            .config
            .team_strategies
            .iter()
            .enumerate()
            .map(|(s, &strategy)| StrategyWinRate {
                strategy,
                win_rate: mean(&table.iter().map(|row| row[s]).collect::<Vec<_>>()),
            })
            .collect();
        let battle = mean(&opponent_win_rates);
        let coverage = type_coverage(team);
        let balance = stat_balance(team);
        let diversity = move_diversity(team);
        let resist = resistance(team, &self.threats);
        let w = &self.config.weights;
        let score = battle * w.battle
            + coverage * w.type_coverage
            + balance * w.stat_balance
            + diversity * w.move_diversity
            + resist * w.resistance;
        FitnessReport {
            score,
            battle,
            type_coverage: coverage,
            stat_balance: balance,
            move_diversity: diversity,
            resistance: resist,
            opponent_win_rates,
            strategy_win_rates,
        }
    }

    // Win rate per opponent (rows) and team strategy (columns).
    fn win_table(&self, team: &Team, seed: u64) -> Vec<Vec<f64>> {
        let sims = self.config.simulations_per_strategy;
        self.opponents
            .iter()
            .enumerate()
            .map(|(o, opponent)| {
                self.config
                    .team_strategies
                    .iter()
                    .enumerate()
                    .map(|(s, &strategy)| {
                        let engine = BattleEngine::new(self.battle)
                            .with_strategies(strategy, self.config.opponent_strategy);
                        let stream = derive_seed(seed, o as u64, s as u64);
                        engine.simulate(team, &opponent.team, sims, stream).win_rate
                    })
                    .collect()
            })
            .collect()
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Attacking types of every damaging move in the opponents' repertoires.
pub fn threat_types(opponents: &[Opponent]) -> Vec<Type> {
    let set: BTreeSet<Type> = opponents
        .iter()
        .flat_map(|o| o.team.iter())
        .flat_map(|m| m.repertoire().moves())
        .filter(|mv| !mv.is_status())
        .map(|mv| mv.move_type())
        .collect();
    set.into_iter().collect()
}

/// Distinct member types over the seventeen in the chart.
pub fn type_coverage(team: &Team) -> f64 {
    let distinct: BTreeSet<Type> = team.iter().flat_map(|m| m.types().iter().copied()).collect();
    distinct.len() as f64 / TYPE_COUNT
}

/// One minus the mean coefficient of variation of effective stats, floored at 0.
pub fn stat_balance(team: &Team) -> f64 {
    if team.is_empty() {
        return 0.0;
    }
    let cvs: Vec<f64> = team
        .iter()
        .map(|member| {
            let values: Vec<f64> = Stat::ALL.iter().map(|&s| member.stat(s) as f64).collect();
            let avg = mean(&values);
            if avg <= 0.0 {
                return 0.0;
            }
            let variance =
                values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
            variance.sqrt() / avg
        })
        .collect();
    (1.0 - mean(&cvs)).max(0.0)
}

/// Average of distinct move types over seventeen and distinct categories over three.
pub fn move_diversity(team: &Team) -> f64 {
    let moves: Vec<_> = team.iter().flat_map(|m| m.repertoire().moves()).collect();
    if moves.is_empty() {
        return 0.0;
    }
    let types: BTreeSet<Type> = moves.iter().map(|mv| mv.move_type()).collect();
    let categories: BTreeSet<u8> = moves
        .iter()
        .map(|mv| match mv.category() {
            MoveCategory::Physical => 0,
            MoveCategory::Special => 1,
            MoveCategory::Status => 2,
        })
        .collect();
    (types.len() as f64 / TYPE_COUNT + categories.len() as f64 / CATEGORY_COUNT) / 2.0
}

/// Share of resistances among resist/weak pairings against the threat types.
/// Neutral pairings are ignored; 0.5 when nothing is either.
pub fn resistance(team: &Team, threats: &[Type]) -> f64 {
    let mut resists = 0usize;
    let mut weak = 0usize;
    for member in team.iter() {
        for &attack in threats {
            let mult = effectiveness(attack, member.types());
            if mult < 1.0 {
                resists += 1;
            } else if mult > 1.0 {
                weak += 1;
            }
        }
    }
    if resists + weak == 0 {
        0.5
    } else {
        resists as f64 / (resists + weak) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Combatant, Stats};

    fn mon(name: &str, types: &[Type], stats: Stats) -> Combatant {
        Combatant::new(name, 1, types, stats, 50).unwrap()
    }

    #[test]
    fn coverage_counts_distinct_types() {
        let flat = Stats::new(80, 80, 80, 80, 80, 80);
        let team = Team::new(vec![
            mon("A", &[Type::Fire, Type::Flying], flat),
            mon("B", &[Type::Fire], flat),
            mon("C", &[Type::Water], flat),
        ])
        .unwrap();
        assert!((type_coverage(&team) - 3.0 / 17.0).abs() < 1e-12);
        assert_eq!(type_coverage(&Team::default()), 0.0);
    }

    #[test]
    fn flat_stats_are_nearly_balanced() {
        let even = mon("Even", &[Type::Normal], Stats::new(80, 80, 80, 80, 80, 80));
        let blob = mon("Blob", &[Type::Normal], Stats::new(250, 5, 5, 35, 105, 50));
        let flat = Team::new(vec![even]).unwrap();
        let lopsided = Team::new(vec![blob]).unwrap();
        assert!(stat_balance(&flat) > stat_balance(&lopsided));
        assert!(stat_balance(&lopsided) >= 0.0);
        assert_eq!(stat_balance(&Team::default()), 0.0);
    }

    #[test]
    fn resistance_ignores_neutral_pairings() {
        let flat = Stats::new(80, 80, 80, 80, 80, 80);
        let team = Team::new(vec![mon("Steel", &[Type::Steel], flat)]).unwrap();
        assert_eq!(resistance(&team, &[Type::Normal]), 1.0);
        assert_eq!(resistance(&team, &[Type::Fire]), 0.0);
        assert_eq!(resistance(&team, &[Type::Electric]), 0.5);
        assert_eq!(resistance(&team, &[]), 0.5);
    }

    #[test]
    fn default_weights_sum_to_one() {
        assert!((FitnessWeights::default().sum() - 1.0).abs() < 1e-12);
    }
}
