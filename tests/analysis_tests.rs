use rand::rngs::SmallRng;
use rand::SeedableRng;
use team_forge::analysis::{
    recommendations, type_matchups, AnalysisConfig, BattleAnalyzer, BattleStatistics,
    MemberPerformance, OpponentStatistics,
};
use team_forge::battle::{BattleEngine, BattleOptions};
use team_forge::model::{Combatant, Stats, Team};
use team_forge::moves::repertoire_of;
use team_forge::roster::{builtin_pool, opponents};
use team_forge::strategy::MoveStrategy;
use team_forge::types::Type;

fn pick(name: &str) -> Combatant {
    builtin_pool()
        .unwrap()
        .into_iter()
        .find(|c| c.name() == name)
        .unwrap()
}

fn engine() -> BattleEngine {
    BattleEngine::new(BattleOptions::default())
        .with_strategies(MoveStrategy::Balanced, MoveStrategy::Balanced)
}

fn opponent_stats(name: &str, win_rate: f64) -> OpponentStatistics {
    OpponentStatistics {
        opponent: name.to_string(),
        stats: BattleStatistics {
            battles: 10,
            win_rate,
            ..BattleStatistics::default()
        },
    }
}

fn solo(member: &str, opponent: &str, win_rate: f64) -> MemberPerformance {
    MemberPerformance {
        member: member.to_string(),
        opponent: opponent.to_string(),
        stats: BattleStatistics {
            battles: 2,
            win_rate,
            ..BattleStatistics::default()
        },
        most_effective_against: vec![],
        least_effective_against: vec![],
    }
}

#[test]
fn statistics_count_outcomes_and_damage_per_match() {
    let mut strong = pick("Dragonite");
    strong.set_level(100);
    let mut weak = pick("Pikachu");
    weak.set_level(5);
    let (strong, weak) = (Team::new(vec![strong]).unwrap(), Team::new(vec![weak]).unwrap());

    let engine = engine();
    let mut rng = SmallRng::seed_from_u64(3);
    let logs: Vec<_> = (0..8)
        .map(|_| engine.run_team_match(&strong, &weak, &mut rng))
        .collect();
    let stats = BattleStatistics::from_logs(&logs);
    assert_eq!(stats.battles, 8);
    assert_eq!(stats.wins, 8);
    assert_eq!(stats.win_rate, 1.0);
    assert_eq!(stats.loss_rate + stats.draw_rate, 0.0);
    assert!(stats.avg_turns >= 1.0);
    // Every win knocks out the loser's whole HP bar.
    assert!(stats.avg_damage_dealt >= weak.iter().next().unwrap().max_hp() as f64);
    assert!(stats.avg_damage_dealt > stats.avg_damage_taken);

    assert_eq!(BattleStatistics::from_logs(&[]), BattleStatistics::default());
}

#[test]
fn matchups_rank_opponent_types_by_best_multiplier() {
    let stats = Stats::new(80, 80, 80, 80, 80, 80);
    let member = Combatant::new("Surfer", 1, &[Type::Water], stats, 60)
        .unwrap()
        .with_repertoire(repertoire_of(&["Surf"]).unwrap());
    let foes = Team::new(vec![pick("Arcanine"), pick("Lapras"), pick("Venusaur")]).unwrap();
    let (most, least) = type_matchups(&member, &foes);
    assert_eq!(most, vec![Type::Fire, Type::Ice, Type::Poison]);
    assert_eq!(least, vec![Type::Poison, Type::Water, Type::Grass]);
}

#[test]
fn recommendations_flag_weak_spots_and_give_a_verdict() {
    let opponents = [opponent_stats("Lorelei", 0.9), opponent_stats("Lance", 0.2)];
    let members = [
        solo("Pikachu", "Lorelei", 0.1),
        solo("Pikachu", "Lance", 0.2),
        solo("Dragonite", "Lorelei", 0.8),
        solo("Dragonite", "Lance", 0.6),
    ];
    let lines = recommendations(&opponents, &members);
    assert_eq!(lines.len(), 3, "{lines:?}");
    assert_eq!(lines[0], "Improve the plan against: Lance");
    assert!(lines[1].starts_with("Consider replacing Pikachu"), "{lines:?}");
    assert_eq!(lines[2], "The team has potential but can be optimized");

    let strong = [opponent_stats("Lorelei", 0.9), opponent_stats("Lance", 0.7)];
    assert_eq!(recommendations(&strong, &[]), vec!["The team is well balanced"]);
    let weak = [opponent_stats("Lorelei", 0.3)];
    assert_eq!(
        recommendations(&weak, &[]).last().map(String::as_str),
        Some("The team needs significant improvement")
    );
}

#[test]
fn report_covers_every_opponent_and_member() {
    let roster = opponents().unwrap();
    let mut team = Team::new(vec![pick("Gyarados"), pick("Alakazam")]).unwrap();
    team.set_level(60);
    let config = AnalysisConfig {
        simulations: 5,
        level_range: (50, 60),
        level_step: 5,
        level_simulations: 2,
    };
    let analyzer = BattleAnalyzer::new(engine(), &roster, config, 21);
    let analysis = analyzer.report(&team);

    assert_eq!(analysis.team_size, 2);
    assert_eq!(analysis.opponents.len(), roster.len());
    assert_eq!(analysis.members.len(), 2 * roster.len());
    assert!(analysis.members.iter().all(|m| m.stats.battles == 1));
    assert!(analysis.opponents.iter().all(|o| o.stats.battles == 5));
    assert_eq!(analysis.optimal_levels.len(), 2);
    for level in &analysis.optimal_levels {
        assert!([50, 55, 60].contains(&level.level), "{level:?}");
        assert!(level.performance <= roster.len() as f64);
    }
    let rate = |name: &str| {
        analysis
            .opponents
            .iter()
            .find(|o| o.opponent == name)
            .map(|o| o.stats.win_rate)
            .unwrap()
    };
    for pair in analysis.difficulty_ranking.windows(2) {
        assert!(rate(&pair[0]) <= rate(&pair[1]));
    }
    assert!(!analysis.recommendations.is_empty());

    let again = analyzer.report(&team);
    assert_eq!(
        serde_json::to_value(&analysis).unwrap(),
        serde_json::to_value(&again).unwrap()
    );
}

#[test]
fn analysis_tables_are_written_as_csv() {
    let roster = opponents().unwrap();
    let team = Team::new(vec![pick("Jolteon")]).unwrap();
    let config = AnalysisConfig {
        simulations: 2,
        level_range: (55, 55),
        level_step: 5,
        level_simulations: 1,
    };
    let analysis = BattleAnalyzer::new(engine(), &roster, config, 4).report(&team);
    let dir = tempfile::tempdir().unwrap();
    team_forge::report::write_analysis_csv(&analysis, dir.path()).unwrap();

    let team_csv = std::fs::read_to_string(dir.path().join("team_performance.csv")).unwrap();
    assert_eq!(team_csv.lines().count(), 1 + roster.len());
    assert!(team_csv.starts_with("opponent,win_rate"));
    let solo_csv = std::fs::read_to_string(dir.path().join("individual_performance.csv")).unwrap();
    assert_eq!(solo_csv.lines().count(), 1 + roster.len());
    assert!(solo_csv.lines().skip(1).all(|l| l.starts_with("Jolteon,")));

    let text = team_forge::report::analysis_summary(&analysis);
    for opponent in &roster {
        assert!(text.contains(&opponent.name), "{text}");
    }
}
