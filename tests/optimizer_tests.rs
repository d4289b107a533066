use std::collections::HashSet;
use team_forge::battle::BattleOptions;
use team_forge::fitness::{FitnessConfig, Opponent};
use team_forge::model::Combatant;
use team_forge::optimizer::{
    optimize_with_constraints, Candidate, GeneticOptimizer, OptimizationResult, OptimizerConfig,
    PoolConstraints,
};
use team_forge::roster::{builtin_pool, opponents};
use team_forge::strategy::MoveStrategy;
use team_forge::types::Type;

fn small_fitness() -> FitnessConfig {
    FitnessConfig {
        simulations_per_strategy: 1,
        team_strategies: vec![MoveStrategy::Balanced],
        ..FitnessConfig::default()
    }
}

fn small_optimizer(seed: u64) -> OptimizerConfig {
    OptimizerConfig {
        population_size: 8,
        generations: 3,
        elite_count: 2,
        report_simulations: 4,
        seed,
        ..OptimizerConfig::default()
    }
}

fn run(pool: &[Combatant], roster: &[Opponent], seed: u64) -> OptimizationResult {
    let fitness = small_fitness();
    let mut optimizer = GeneticOptimizer::new(
        pool,
        roster,
        &small_optimizer(seed),
        &fitness,
        &BattleOptions::default(),
    );
    optimizer.optimize()
}

#[test]
fn best_score_never_decreases() {
    let pool = builtin_pool().unwrap();
    let roster = opponents().unwrap();
    let result = run(&pool, &roster, 1);
    assert_eq!(result.fitness_history.len(), 4);
    for pair in result.fitness_history.windows(2) {
        assert!(pair[1] >= pair[0], "{:?}", result.fitness_history);
    }
    assert_eq!(result.fitness_history.last().copied(), Some(result.best_score));
    assert_eq!(result.generation, 3);
    assert!(result.best_generation <= 3);
}

#[test]
fn best_team_is_six_distinct_members_at_competitive_level() {
    let pool = builtin_pool().unwrap();
    let roster = opponents().unwrap();
    let result = run(&pool, &roster, 2);
    assert_eq!(result.best_team.len(), 6);
    let distinct: HashSet<usize> = result.best_members.iter().copied().collect();
    assert_eq!(distinct.len(), 6);
    assert!(result.best_team.iter().all(|m| m.level() == 60));
    assert_eq!(result.opponent_records.len(), 5);
    for record in &result.opponent_records {
        assert_eq!(record.battles, 4);
        assert!((record.win_rate + record.loss_rate + record.draw_rate - 1.0).abs() < 1e-9);
    }
}

#[test]
fn same_seed_same_result() {
    let pool = builtin_pool().unwrap();
    let roster = opponents().unwrap();
    let first = run(&pool, &roster, 9);
    let second = run(&pool, &roster, 9);
    assert_eq!(first.best_members, second.best_members);
    assert_eq!(first.fitness_history, second.fitness_history);
}

#[test]
fn small_pools_do_not_panic() {
    let roster = opponents().unwrap();
    let pool = builtin_pool().unwrap();

    let three = &pool[..3];
    let result = run(three, &roster, 4);
    assert_eq!(result.best_team.len(), 3);

    let result = run(&[], &roster, 4);
    assert!(result.best_team.is_empty());
    assert_eq!(result.fitness_history.len(), 4);
}

#[test]
fn crossover_and_mutation_keep_members_distinct() {
    let pool = builtin_pool().unwrap();
    let roster = opponents().unwrap();
    let fitness = small_fitness();
    let mut optimizer = GeneticOptimizer::new(
        &pool,
        &roster,
        &small_optimizer(5),
        &fitness,
        &BattleOptions::default(),
    );
    let first = Candidate::new(vec![0, 1, 2, 3, 4, 5]);
    let second = Candidate::new(vec![4, 5, 6, 7, 8, 9]);
    for _ in 0..50 {
        let child = optimizer.crossover(&first, &second);
        let distinct: HashSet<usize> = child.members.iter().copied().collect();
        assert_eq!(child.members.len(), 6);
        assert_eq!(distinct.len(), 6);
        assert!(child.members.iter().all(|m| *m < 10));
        assert!(child.fitness.is_none());
    }

    let mut mutant = Candidate {
        fitness: Some(0.5),
        ..first.clone()
    };
    optimizer.mutate(&mut mutant);
    let changed = mutant
        .members
        .iter()
        .zip(&first.members)
        .filter(|(a, b)| a != b)
        .count();
    assert_eq!(changed, 1);
    assert!(mutant.fitness.is_none());
    let distinct: HashSet<usize> = mutant.members.iter().copied().collect();
    assert_eq!(distinct.len(), 6);
}

#[test]
fn tournament_returns_the_fittest_when_it_sees_everyone() {
    let pool = builtin_pool().unwrap();
    let roster = opponents().unwrap();
    let fitness = small_fitness();
    let config = OptimizerConfig {
        tournament_size: 3,
        ..small_optimizer(6)
    };
    let mut optimizer =
        GeneticOptimizer::new(&pool, &roster, &config, &fitness, &BattleOptions::default());
    let population: Vec<Candidate> = [0.2, 0.9, 0.4]
        .iter()
        .enumerate()
        .map(|(i, &score)| Candidate {
            fitness: Some(score),
            ..Candidate::new(vec![i])
        })
        .collect();
    for _ in 0..10 {
        assert_eq!(optimizer.tournament(&population).fitness, Some(0.9));
    }
}

#[test]
fn seeded_teams_cover_the_priority_types() {
    let pool = builtin_pool().unwrap();
    let roster = opponents().unwrap();
    let fitness = small_fitness();
    let config = small_optimizer(7);
    let mut optimizer =
        GeneticOptimizer::new(&pool, &roster, &config, &fitness, &BattleOptions::default());
    for _ in 0..20 {
        let members = optimizer.seeded_team();
        assert_eq!(members.len(), 6);
        let distinct: HashSet<usize> = members.iter().copied().collect();
        assert_eq!(distinct.len(), 6);
        for (&member, &wanted) in members.iter().zip(&config.priority_types) {
            assert!(
                pool[member].has_type(wanted),
                "{} does not carry {wanted}",
                pool[member].name()
            );
        }
    }
}

#[test]
fn seeded_teams_skip_types_the_pool_lacks() {
    let pool = builtin_pool().unwrap();
    let no_dragons: Vec<Combatant> = pool
        .iter()
        .filter(|c| !c.has_type(Type::Dragon))
        .cloned()
        .collect();
    let roster = opponents().unwrap();
    let fitness = small_fitness();
    let config = small_optimizer(8);
    let mut optimizer =
        GeneticOptimizer::new(&no_dragons, &roster, &config, &fitness, &BattleOptions::default());
    let members = optimizer.seeded_team();
    assert_eq!(members.len(), 6);
    for (&member, &wanted) in members.iter().zip(&config.priority_types[..5]) {
        assert!(no_dragons[member].has_type(wanted));
    }
}

#[test]
fn constraints_filter_the_pool_before_the_search() {
    let pool = builtin_pool().unwrap();
    let roster = opponents().unwrap();
    let fitness = small_fitness();
    let config = OptimizerConfig {
        constraints: PoolConstraints {
            required_types: vec![Type::Fire, Type::Water],
            min_total_stats: 450,
        },
        ..small_optimizer(10)
    };
    let admitted = config.constraints.apply(&pool);
    assert!(admitted.len() >= 6, "only {} admitted", admitted.len());
    assert!(admitted.len() < pool.len());

    let result =
        optimize_with_constraints(&pool, &roster, &config, &fitness, &BattleOptions::default());
    assert_eq!(result.best_team.len(), 6);
    for member in result.best_team.iter() {
        assert!(member.has_type(Type::Fire) || member.has_type(Type::Water));
        assert!(member.stats().total() >= 450, "{}", member.name());
    }
}

#[test]
fn constraints_that_admit_nothing_leave_an_empty_team() {
    let pool = builtin_pool().unwrap();
    let roster = opponents().unwrap();
    let config = OptimizerConfig {
        constraints: PoolConstraints {
            required_types: vec![],
            min_total_stats: u32::MAX,
        },
        ..small_optimizer(11)
    };
    let result = optimize_with_constraints(
        &pool,
        &roster,
        &config,
        &small_fitness(),
        &BattleOptions::default(),
    );
    assert!(result.best_team.is_empty());
}

#[test]
fn result_carries_metrics_of_its_history() {
    let pool = builtin_pool().unwrap();
    let roster = opponents().unwrap();
    let result = run(&pool, &roster, 12);
    assert_eq!(result.metrics.generations, result.fitness_history.len());
    assert_eq!(result.metrics.final_fitness, result.best_score);
    assert!(result.metrics.improvement_rate >= 0.0);
    // Four entries is too short to measure convergence.
    assert_eq!(result.metrics.convergence_rate, 0.0);
}
