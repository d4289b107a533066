use crate::analysis::TeamAnalysis;
use crate::battle::{BattleLog, BattleTurn, Outcome, SimulationStats};
use crate::fitness::FitnessReport;
use crate::model::{Combatant, Team};
use crate::optimizer::{OptimizationMetrics, OptimizationResult, OpponentRecord};
use crate::types::Type;
use anyhow::Context;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct MemberSummary<'a> {
    pub name: &'a str,
    pub level: u8,
    pub types: &'a [Type],
    pub total_stats: u32,
    pub moves: Vec<&'a str>,
}

impl<'a> MemberSummary<'a> {
    pub fn new(member: &'a Combatant) -> Self {
        MemberSummary {
            name: member.name(),
            level: member.level(),
            types: member.types(),
            total_stats: member.stats().total(),
            moves: member.repertoire().moves().iter().map(|m| m.name()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary<'a> {
    pub best_score: f64,
    pub best_generation: usize,
    pub generations: usize,
    pub team: Vec<MemberSummary<'a>>,
    pub fitness: &'a FitnessReport,
    pub opponents: &'a [OpponentRecord],
    pub fitness_history: &'a [f64],
    pub metrics: OptimizationMetrics,
}

impl<'a> Summary<'a> {
    pub fn new(result: &'a OptimizationResult) -> Self {
        Summary {
            best_score: result.best_score,
            best_generation: result.best_generation,
            generations: result.generation,
            team: result.best_team.iter().map(MemberSummary::new).collect(),
            fitness: &result.best_report,
            opponents: &result.opponent_records,
            fitness_history: &result.fitness_history,
            metrics: result.metrics,
        }
    }
}

pub fn team_table(team: &Team) -> String {
    let mut out = String::new();
    for (i, member) in team.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {:<12} Lv.{:<3} {:<17} total {:>3}",
            i + 1,
            member.name(),
            member.level(),
            member.type_label(),
            member.stats().total()
        );
    }
    out
}

pub const TABLE_HEADER: &str = "opponent      win    loss    draw avg turns";

fn row(name: &str, win: f64, loss: f64, draw: f64, avg_turns: f64) -> String {
    format!(
        "{:<10} {:>6.1}% {:>6.1}% {:>6.1}% {:>9.1}",
        name,
        win * 100.0,
        loss * 100.0,
        draw * 100.0,
        avg_turns
    )
}

pub fn opponent_table(records: &[OpponentRecord]) -> String {
    let mut out = format!("{TABLE_HEADER}\n");
    for r in records {
        out.push_str(&row(&r.name, r.win_rate, r.loss_rate, r.draw_rate, r.avg_turns));
        out.push('\n');
    }
    out
}

pub fn simulation_line(name: &str, stats: &SimulationStats) -> String {
    row(name, stats.win_rate, stats.loss_rate, stats.draw_rate, stats.avg_turns)
}

pub fn turn_line(turn: &BattleTurn<'_>) -> String {
    if !turn.hit {
        return format!(
            "[{:>3}] {} used {} on {} and missed",
            turn.turn, turn.attacker, turn.move_name, turn.defender
        );
    }
    let mut line = format!(
        "[{:>3}] {} used {} on {}: {} damage",
        turn.turn, turn.attacker, turn.move_name, turn.defender, turn.damage
    );
    if turn.critical {
        line.push_str(" (critical)");
    }
    if turn.effectiveness > 1.0 {
        line.push_str(" (super effective)");
    } else if turn.effectiveness == 0.0 {
        line.push_str(" (no effect)");
    } else if turn.effectiveness < 1.0 {
        line.push_str(" (not very effective)");
    }
    if turn.defender_fainted {
        let _ = write!(line, ", {} fainted", turn.defender);
    }
    line
}

pub fn battle_transcript(log: &BattleLog<'_>) -> String {
    let mut out = String::new();
    for turn in &log.turns {
        out.push_str(&turn_line(turn));
        out.push('\n');
    }
    let verdict = match log.outcome {
        Outcome::Win => "won",
        Outcome::Loss => "lost",
        Outcome::Draw => "drew",
    };
    let _ = writeln!(
        out,
        "Team {verdict} after {} turns over {} engagements",
        log.total_turns, log.engagements
    );
    out
}

/// Human-readable result of an optimization run.
pub fn summary(result: &OptimizationResult) -> String {
    let report = &result.best_report;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Best team (fitness {:.4}, found in generation {} of {}):",
        result.best_score, result.best_generation, result.generation
    );
    out.push_str(&team_table(&result.best_team));
    let _ = writeln!(
        out,
        "\nbattle {:.3}  coverage {:.3}  balance {:.3}  diversity {:.3}  resistance {:.3}\n",
        report.battle,
        report.type_coverage,
        report.stat_balance,
        report.move_diversity,
        report.resistance
    );
    for entry in &report.strategy_win_rates {
        let _ = writeln!(out, "{:<15} {:>6.1}%", entry.strategy.name(), entry.win_rate * 100.0);
    }
    let _ = writeln!(
        out,
        "convergence {:.3}  improvement {:.1}%\n",
        result.metrics.convergence_rate,
        result.metrics.improvement_rate * 100.0
    );
    out.push_str(&opponent_table(&result.opponent_records));
    out
}

/// Human-readable result of a team analysis.
pub fn analysis_summary(analysis: &TeamAnalysis) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Team of {}: overall win rate {:.1}%, {:.1} turns on average\n",
        analysis.team_size,
        analysis.overall_win_rate * 100.0,
        analysis.overall_avg_turns
    );
    let _ = writeln!(out, "{TABLE_HEADER}   dealt   taken");
    for o in &analysis.opponents {
        let s = &o.stats;
        let _ = writeln!(
            out,
            "{} {:>7.1} {:>7.1}",
            row(&o.opponent, s.win_rate, s.loss_rate, s.draw_rate, s.avg_turns),
            s.avg_damage_dealt,
            s.avg_damage_taken
        );
    }
    out.push_str("\nSolo runs (win rate per opponent):\n");
    let opponents: Vec<&str> = analysis.opponents.iter().map(|o| o.opponent.as_str()).collect();
    let _ = writeln!(out, "{:<12} {}", "member", opponents.join("  "));
    for level in &analysis.optimal_levels {
        let rates: Vec<String> = analysis
            .members
            .iter()
            .filter(|m| m.member == level.member)
            .map(|m| format!("{:>5.1}%", m.stats.win_rate * 100.0))
            .collect();
        let _ = writeln!(
            out,
            "{:<12} {}  best level {}",
            level.member,
            rates.join("  "),
            level.level
        );
    }
    let _ = writeln!(out, "\nHardest first: {}", analysis.difficulty_ranking.join(", "));
    for line in &analysis.recommendations {
        let _ = writeln!(out, "- {line}");
    }
    out
}

pub fn write_json(result: &OptimizationResult, path: &Path) -> anyhow::Result<()> {
    let body = serde_json::to_string_pretty(&Summary::new(result))?;
    std::fs::write(path, body)
        .with_context(|| format!("Failed to write summary to {}", path.display()))?;
    Ok(())
}

/// Writes `team_performance.csv` and `individual_performance.csv` into `dir`.
pub fn write_analysis_csv(analysis: &TeamAnalysis, dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let mut team = String::from("opponent,win_rate,avg_turns,avg_damage_dealt,avg_damage_taken");
    for o in &analysis.opponents {
        let _ = write!(
            team,
            "\n{},{:.4},{:.2},{:.2},{:.2}",
            o.opponent,
            o.stats.win_rate,
            o.stats.avg_turns,
            o.stats.avg_damage_dealt,
            o.stats.avg_damage_taken
        );
    }
    let mut individual = String::from("member,opponent,win_rate,avg_damage_dealt,avg_damage_taken");
    for m in &analysis.members {
        let _ = write!(
            individual,
            "\n{},{},{:.4},{:.2},{:.2}",
            m.member,
            m.opponent,
            m.stats.win_rate,
            m.stats.avg_damage_dealt,
            m.stats.avg_damage_taken
        );
    }
    for (name, body) in [
        ("team_performance.csv", team),
        ("individual_performance.csv", individual),
    ] {
        let path = dir.join(name);
        std::fs::write(&path, body)
            .with_context(|| format!("Failed to write table to {}", path.display()))?;
    }
    Ok(())
}

/// Opponent table as CSV, one row per opponent.
pub fn write_csv(records: &[OpponentRecord], path: &Path) -> anyhow::Result<()> {
    let mut out = String::from("opponent,win_rate,loss_rate,draw_rate,avg_turns");
    for record in records {
        out.push('\n');
        out.push_str(&format!(
            "{},{:.4},{:.4},{:.4},{:.2}",
            record.name, record.win_rate, record.loss_rate, record.draw_rate, record.avg_turns
        ));
    }
    std::fs::write(path, out)
        .with_context(|| format!("Failed to write table to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness::StrategyWinRate;
    use crate::roster::builtin_pool;
    use crate::strategy::MoveStrategy;

    fn record(name: &str, specialty: Option<Type>, win_rate: f64) -> OpponentRecord {
        OpponentRecord {
            name: name.to_string(),
            specialty,
            battles: 10,
            win_rate,
            loss_rate: 1.0 - win_rate,
            draw_rate: 0.0,
            avg_turns: 12.5,
        }
    }

    fn sample_result() -> OptimizationResult {
        let pool = builtin_pool().unwrap();
        let mut best_team = Team::new(pool[..3].to_vec()).unwrap();
        best_team.set_level(60);
        let history = vec![0.41, 0.48, 0.55];
        OptimizationResult {
            best_team,
            best_members: vec![0, 1, 2],
            best_score: 0.55,
            best_report: FitnessReport {
                score: 0.55,
                battle: 0.6,
                opponent_win_rates: vec![0.7, 0.5],
                strategy_win_rates: vec![
                    StrategyWinRate {
                        strategy: MoveStrategy::Balanced,
                        win_rate: 0.65,
                    },
                    StrategyWinRate {
                        strategy: MoveStrategy::Random,
                        win_rate: 0.55,
                    },
                ],
                ..FitnessReport::default()
            },
            best_generation: 2,
            generation: 2,
            metrics: OptimizationMetrics::from_history(&history),
            fitness_history: history,
            opponent_records: vec![
                record("Lorelei", Some(Type::Ice), 0.7),
                record("Champion", None, 0.5),
            ],
        }
    }

    #[test]
    fn summary_lists_every_member_and_opponent() {
        let result = sample_result();
        let text = summary(&result);
        for member in result.best_team.iter() {
            assert!(text.contains(member.name()), "{} missing:\n{text}", member.name());
        }
        for r in &result.opponent_records {
            let line = row(&r.name, r.win_rate, r.loss_rate, r.draw_rate, r.avg_turns);
            assert!(text.contains(&line), "{line} missing:\n{text}");
        }
        assert!(text.contains("balanced"));
        assert!(text.contains(TABLE_HEADER));
    }

    #[test]
    fn json_summary_reads_back() {
        let result = sample_result();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        write_json(&result, &path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["best_score"], 0.55);
        assert_eq!(value["generations"], 2);
        let names: Vec<&str> = value["team"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, result.best_team.names());
        let opponents = value["opponents"].as_array().unwrap();
        assert_eq!(opponents.len(), 2);
        assert_eq!(opponents[0]["name"], "Lorelei");
        assert_eq!(opponents[0]["specialty"], "ice");
        assert_eq!(opponents[1]["specialty"], serde_json::Value::Null);
        assert_eq!(value["fitness"]["strategy_win_rates"][1]["strategy"], "random");
        assert_eq!(value["fitness_history"].as_array().unwrap().len(), 3);
        assert_eq!(value["metrics"]["generations"], 3);
    }

    #[test]
    fn csv_has_a_header_and_a_row_per_opponent() {
        let result = sample_result();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("opponents.csv");
        write_csv(&result.opponent_records, &path).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(lines[0], "opponent,win_rate,loss_rate,draw_rate,avg_turns");
        assert_eq!(lines[1], "Lorelei,0.7000,0.3000,0.0000,12.50");
        assert_eq!(lines.len(), 3);
    }
}
