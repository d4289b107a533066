//! Genetic search over teams drawn from a candidate pool.

use crate::battle::{derive_seed, BattleEngine, BattleOptions};
use crate::fitness::{FitnessConfig, FitnessEvaluator, FitnessReport, Opponent};
use crate::model::{Combatant, Team, MAX_TEAM_SIZE};
use crate::strategy::MoveStrategy;
use crate::types::Type;
use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub population_size: usize,
    pub generations: usize,
    pub mutation_rate: f64,
    pub crossover_rate: f64,
    pub elite_count: usize,
    pub tournament_size: usize,
    pub team_size: usize,
    /// Share of the initial population built around `priority_types`.
    pub seeded_fraction: f64,
    pub priority_types: Vec<Type>,
    /// Battles per opponent for the final report on the best team.
    pub report_simulations: usize,
    pub seed: u64,
    /// Pool filter applied by [`optimize_with_constraints`].
    pub constraints: PoolConstraints,
}

/// Keeps pool entries with at least one required type (any, when empty) and
/// a base stat total of at least `min_total_stats`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PoolConstraints {
    pub required_types: Vec<Type>,
    pub min_total_stats: u32,
}

impl PoolConstraints {
    pub fn is_empty(&self) -> bool {
        self.required_types.is_empty() && self.min_total_stats == 0
    }

    pub fn admits(&self, combatant: &Combatant) -> bool {
        let typed = self.required_types.is_empty()
            || self.required_types.iter().any(|&t| combatant.has_type(t));
        typed && combatant.stats().total() >= self.min_total_stats
    }

    pub fn apply(&self, pool: &[Combatant]) -> Vec<Combatant> {
        pool.iter().filter(|c| self.admits(c)).cloned().collect()
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        OptimizerConfig {
            population_size: 50,
            generations: 100,
            mutation_rate: 0.1,
            crossover_rate: 0.8,
            elite_count: 5,
            tournament_size: 3,
            team_size: MAX_TEAM_SIZE,
            seeded_fraction: 0.5,
            priority_types: vec![
                Type::Water,
                Type::Fire,
                Type::Grass,
                Type::Electric,
                Type::Psychic,
                Type::Dragon,
            ],
            report_simulations: 100,
            seed: 0,
            constraints: PoolConstraints::default(),
        }
    }
}

/// Team composition as pool indices, with the score once evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub members: Vec<usize>,
    pub fitness: Option<f64>,
    pub report: Option<FitnessReport>,
}

impl Candidate {
    pub fn new(members: Vec<usize>) -> Self {
        Candidate {
            members,
            fitness: None,
            report: None,
        }
    }

    pub fn score(&self) -> f64 {
        self.fitness.unwrap_or(f64::NEG_INFINITY)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OpponentRecord {
    pub name: String,
    pub specialty: Option<Type>,
    pub battles: usize,
    pub win_rate: f64,
    pub loss_rate: f64,
    pub draw_rate: f64,
    pub avg_turns: f64,
}

/// Convergence summary of a fitness history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct OptimizationMetrics {
    /// Near 1 when the last ten entries barely moved; 0 with ten or fewer.
    pub convergence_rate: f64,
    /// Relative gain of the final best over the initial best.
    pub improvement_rate: f64,
    pub final_fitness: f64,
    pub generations: usize,
}

impl OptimizationMetrics {
    pub fn from_history(history: &[f64]) -> Self {
        let (Some(&first), Some(&last)) = (history.first(), history.last()) else {
            return OptimizationMetrics::default();
        };
        if history.len() < 2 {
            return OptimizationMetrics {
                final_fitness: last,
                generations: history.len(),
                ..OptimizationMetrics::default()
            };
        }
        let convergence_rate = if history.len() > 10 && last > 0.0 {
            let recent = last - history[history.len() - 10];
            (1.0 - recent.abs() / last).max(0.0)
        } else {
            0.0
        };
        let improvement_rate = if first > 0.0 {
            (last - first) / first
        } else {
            0.0
        };
        OptimizationMetrics {
            convergence_rate,
            improvement_rate,
            final_fitness: last,
            generations: history.len(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OptimizationResult {
    pub best_team: Team,
    /// Pool indices of `best_team`.
    pub best_members: Vec<usize>,
    pub best_score: f64,
    pub best_report: FitnessReport,
    pub best_generation: usize,
    /// Generations run after the initial population.
    pub generation: usize,
    /// Best-so-far score per generation, starting with the initial population.
    pub fitness_history: Vec<f64>,
    pub metrics: OptimizationMetrics,
    pub opponent_records: Vec<OpponentRecord>,
}

pub struct GeneticOptimizer<'a> {
    pool: &'a [Combatant],
    opponents: &'a [Opponent],
    config: OptimizerConfig,
    fitness: &'a FitnessConfig,
    battle: BattleOptions,
    evaluator: FitnessEvaluator<'a>,
    rng: SmallRng,
}

impl<'a> GeneticOptimizer<'a> {
    /// Out-of-range settings are clamped instead of rejected.
    pub fn new(
        pool: &'a [Combatant],
        opponents: &'a [Opponent],
        config: &OptimizerConfig,
        fitness: &'a FitnessConfig,
        battle: &BattleOptions,
    ) -> Self {
        let mut config = config.clone();
        config.population_size = config.population_size.max(1);
        config.elite_count = config.elite_count.min(config.population_size);
        config.tournament_size = config.tournament_size.max(1);
        config.team_size = config.team_size.clamp(1, MAX_TEAM_SIZE).min(pool.len());
        config.mutation_rate = config.mutation_rate.clamp(0.0, 1.0);
        config.crossover_rate = config.crossover_rate.clamp(0.0, 1.0);
        config.seeded_fraction = config.seeded_fraction.clamp(0.0, 1.0);
        GeneticOptimizer {
            pool,
            opponents,
            rng: SmallRng::seed_from_u64(config.seed),
            config,
            fitness,
            battle: *battle,
            evaluator: FitnessEvaluator::new(fitness, battle, opponents),
        }
    }

    pub fn optimize(&mut self) -> OptimizationResult {
        info!(
            "Optimizing teams of {} from a pool of {} against {} opponents ({} x {} generations)",
            self.config.team_size,
            self.pool.len(),
            self.opponents.len(),
            self.config.population_size,
            self.config.generations
        );
        let mut population = self.initial_population();
        self.evaluate(&mut population);

        let mut best = fittest(&population)
            .cloned()
            .unwrap_or_else(|| Candidate::new(Vec::new()));
        let mut best_generation = 0;
        let mut history = vec![best.score()];
        info!("Generation 0: best fitness {:.4}", best.score());

        for generation in 1..=self.config.generations {
            let mut next = self.next_generation(&population);
            self.evaluate(&mut next);
            if let Some(top) = fittest(&next) {
                if top.score() > best.score() {
                    best = top.clone();
                    best_generation = generation;
                }
            }
            history.push(best.score());
            info!(
                "Generation {generation}: best fitness {:.4} (generation best {:.4})",
                best.score(),
                fittest(&next).map(Candidate::score).unwrap_or(f64::NEG_INFINITY)
            );
            population = next;
        }

        let mut best_team = self.build_team(&best.members);
        best_team.set_level(self.fitness.competitive_level);
        let opponent_records = self.opponent_records(&best_team);
        let metrics = OptimizationMetrics::from_history(&history);
        info!(
            "Finished: best {:.4} from generation {best_generation}, improvement {:.1}%",
            best.score(),
            metrics.improvement_rate * 100.0
        );
        OptimizationResult {
            best_score: best.fitness.unwrap_or(0.0),
            best_report: best.report.unwrap_or_default(),
            best_team,
            best_members: best.members,
            best_generation,
            generation: self.config.generations,
            fitness_history: history,
            metrics,
            opponent_records,
        }
    }

    /// Runs the best team against every opponent with the report strategy pairing.
    pub fn opponent_records(&self, team: &Team) -> Vec<OpponentRecord> {
        let team_strategy = self
            .fitness
            .team_strategies
            .first()
            .copied()
            .unwrap_or(MoveStrategy::Balanced);
        let engine = BattleEngine::new(self.battle)
            .with_strategies(team_strategy, self.fitness.opponent_strategy);
        self.opponents
            .iter()
            .enumerate()
            .map(|(i, opponent)| {
                let stats = engine.simulate(
                    team,
                    &opponent.team,
                    self.config.report_simulations,
                    derive_seed(self.config.seed, u64::MAX, i as u64),
                );
                OpponentRecord {
                    name: opponent.name.clone(),
                    specialty: opponent.specialty,
                    battles: stats.battles,
                    win_rate: stats.win_rate,
                    loss_rate: stats.loss_rate,
                    draw_rate: stats.draw_rate,
                    avg_turns: stats.avg_turns,
                }
            })
            .collect()
    }

    pub fn build_team(&self, members: &[usize]) -> Team {
        build_team(self.pool, members)
    }

    fn initial_population(&mut self) -> Vec<Candidate> {
        let size = self.config.population_size;
        let seeded = (size as f64 * self.config.seeded_fraction).round() as usize;
        (0..size)
            .map(|i| {
                if i < seeded {
                    self.seeded_team()
                } else {
                    self.random_team()
                }
            })
            .map(Candidate::new)
            .collect()
    }

    fn random_team(&mut self) -> Vec<usize> {
        sample(&mut self.rng, self.pool.len(), self.config.team_size).into_vec()
    }

    /// One random member per priority type, then random fill.
    pub fn seeded_team(&mut self) -> Vec<usize> {
        let mut members: Vec<usize> = Vec::with_capacity(self.config.team_size);
        for &wanted in &self.config.priority_types {
            if members.len() >= self.config.team_size {
                break;
            }
            let matching: Vec<usize> = (0..self.pool.len())
                .filter(|i| !members.contains(i) && self.pool[*i].has_type(wanted))
                .collect();
            if !matching.is_empty() {
                members.push(matching[self.rng.gen_range(0..matching.len())]);
            }
        }
        self.fill(&mut members);
        members
    }

    // Pads with random unused pool indices up to the team size.
    fn fill(&mut self, members: &mut Vec<usize>) {
        let mut unused: Vec<usize> = (0..self.pool.len())
            .filter(|i| !members.contains(i))
            .collect();
        while members.len() < self.config.team_size && !unused.is_empty() {
            let pick = self.rng.gen_range(0..unused.len());
            members.push(unused.swap_remove(pick));
        }
    }

    fn evaluate(&mut self, population: &mut [Candidate]) {
        let seeds: Vec<u64> = population.iter().map(|_| self.rng.gen()).collect();
        let pool = self.pool;
        let evaluator = &self.evaluator;
        population
            .par_iter_mut()
            .zip(seeds.par_iter())
            .filter(|(candidate, _)| candidate.fitness.is_none())
            .for_each(|(candidate, &seed)| {
                let mut team = build_team(pool, &candidate.members);
                let report = evaluator.evaluate(&mut team, seed);
                debug!("{:?} scored {:.4}", team.names(), report.score);
                candidate.fitness = Some(report.score);
                candidate.report = Some(report);
            });
    }

    fn next_generation(&mut self, population: &[Candidate]) -> Vec<Candidate> {
        let size = self.config.population_size;
        let mut ranked: Vec<&Candidate> = population.iter().collect();
        ranked.sort_by(|a, b| compare(b, a));
        let mut next: Vec<Candidate> = ranked
            .iter()
            .take(self.config.elite_count)
            .map(|c| (*c).clone())
            .collect();

        while next.len() < size {
            let first = self.tournament(population);
            let second = self.tournament(population);
            let (mut a, mut b) = if self.rng.gen::<f64>() < self.config.crossover_rate {
                (self.crossover(first, second), self.crossover(second, first))
            } else {
                (first.clone(), second.clone())
            };
            if self.rng.gen::<f64>() < self.config.mutation_rate {
                self.mutate(&mut a);
            }
            if self.rng.gen::<f64>() < self.config.mutation_rate {
                self.mutate(&mut b);
            }
            next.push(a);
            next.push(b);
        }
        next.truncate(size);
        next
    }

    /// Fittest of `tournament_size` distinct random picks.
    pub fn tournament<'p>(&mut self, population: &'p [Candidate]) -> &'p Candidate {
        let k = self.config.tournament_size.min(population.len());
        sample(&mut self.rng, population.len(), k)
            .into_iter()
            .map(|i| &population[i])
            .max_by(|a, b| compare(a, b))
            .unwrap_or(&population[0])
    }

    /// Child drawn from the union of both parents' members, padded from the
    /// pool when the union is too small.
    pub fn crossover(&mut self, first: &Candidate, second: &Candidate) -> Candidate {
        let mut union = first.members.clone();
        for &m in &second.members {
            if !union.contains(&m) {
                union.push(m);
            }
        }
        let mut members = if union.len() > self.config.team_size {
            sample(&mut self.rng, union.len(), self.config.team_size)
                .into_iter()
                .map(|i| union[i])
                .collect()
        } else {
            union
        };
        self.fill(&mut members);
        Candidate::new(members)
    }

    /// Swaps one member for an unused pool entry; a no-op when none is unused.
    pub fn mutate(&mut self, candidate: &mut Candidate) {
        if candidate.members.is_empty() {
            return;
        }
        let unused: Vec<usize> = (0..self.pool.len())
            .filter(|i| !candidate.members.contains(i))
            .collect();
        if unused.is_empty() {
            return;
        }
        let slot = self.rng.gen_range(0..candidate.members.len());
        candidate.members[slot] = unused[self.rng.gen_range(0..unused.len())];
        candidate.fitness = None;
        candidate.report = None;
    }
}

fn build_team(pool: &[Combatant], members: &[usize]) -> Team {
    Team::truncated(members.iter().filter_map(|&i| pool.get(i).cloned()).collect())
}

fn compare(a: &Candidate, b: &Candidate) -> Ordering {
    a.score().partial_cmp(&b.score()).unwrap_or(Ordering::Equal)
}

fn fittest(population: &[Candidate]) -> Option<&Candidate> {
    population.iter().max_by(|a, b| compare(a, b))
}

/// Filters the pool through `config.constraints`, then runs the search on
/// what is left. `best_members` index into the filtered pool.
pub fn optimize_with_constraints(
    pool: &[Combatant],
    opponents: &[Opponent],
    config: &OptimizerConfig,
    fitness: &FitnessConfig,
    battle: &BattleOptions,
) -> OptimizationResult {
    let filtered = config.constraints.apply(pool);
    if !config.constraints.is_empty() {
        info!(
            "Constraints kept {} of {} pool entries",
            filtered.len(),
            pool.len()
        );
    }
    if filtered.is_empty() && !pool.is_empty() {
        warn!("No pool entry satisfies the constraints");
    }
    GeneticOptimizer::new(&filtered, opponents, config, fitness, battle).optimize()
}
