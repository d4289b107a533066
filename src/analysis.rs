//! Post-hoc study of a fixed team: per-opponent statistics, solo runs of each
//! member, level sweeps and plain-language recommendations.

use crate::battle::{derive_seed, BattleEngine, BattleLog, Outcome, Side};
use crate::fitness::Opponent;
use crate::model::{Combatant, Team};
use crate::types::{effectiveness, Type};
use log::{debug, info};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisConfig {
    pub simulations: usize,
    /// Inclusive level range swept by [`BattleAnalyzer::find_optimal_levels`].
    pub level_range: (u8, u8),
    pub level_step: u8,
    pub level_simulations: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            simulations: 100,
            level_range: (50, 80),
            level_step: 5,
            level_simulations: 20,
        }
    }
}

/// Aggregate over a batch of team matches. Damage is summed over turns and
/// averaged per match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BattleStatistics {
    pub battles: usize,
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
    pub win_rate: f64,
    pub loss_rate: f64,
    pub draw_rate: f64,
    pub avg_turns: f64,
    pub avg_damage_dealt: f64,
    pub avg_damage_taken: f64,
}

impl BattleStatistics {
    pub fn from_logs(logs: &[BattleLog<'_>]) -> Self {
        if logs.is_empty() {
            return BattleStatistics::default();
        }
        let mut stats = BattleStatistics {
            battles: logs.len(),
            ..BattleStatistics::default()
        };
        let mut turns = 0u64;
        let mut dealt = 0u64;
        let mut taken = 0u64;
        for log in logs {
            match log.outcome {
                Outcome::Win => stats.wins += 1,
                Outcome::Loss => stats.losses += 1,
                Outcome::Draw => stats.draws += 1,
            }
            turns += log.total_turns as u64;
            for turn in &log.turns {
                match turn.side {
                    Side::One => dealt += turn.damage as u64,
                    Side::Two => taken += turn.damage as u64,
                }
            }
        }
        let n = logs.len() as f64;
        stats.win_rate = stats.wins as f64 / n;
        stats.loss_rate = stats.losses as f64 / n;
        stats.draw_rate = stats.draws as f64 / n;
        stats.avg_turns = turns as f64 / n;
        stats.avg_damage_dealt = dealt as f64 / n;
        stats.avg_damage_taken = taken as f64 / n;
        stats
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OpponentStatistics {
    pub opponent: String,
    pub stats: BattleStatistics,
}

/// One member fighting an opponent's whole team alone.
#[derive(Debug, Clone, Serialize)]
pub struct MemberPerformance {
    pub member: String,
    pub opponent: String,
    pub stats: BattleStatistics,
    /// Opponent types this member's attacks hit hardest, best first.
    pub most_effective_against: Vec<Type>,
    /// Opponent types this member's attacks hit weakest, weakest last.
    pub least_effective_against: Vec<Type>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptimalLevel {
    pub member: String,
    pub level: u8,
    /// Sum of win rates against every opponent at that level.
    pub performance: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamAnalysis {
    pub overall_win_rate: f64,
    pub overall_avg_turns: f64,
    pub team_size: usize,
    pub opponents: Vec<OpponentStatistics>,
    pub members: Vec<MemberPerformance>,
    pub optimal_levels: Vec<OptimalLevel>,
    /// Opponent names from the lowest win rate to the highest.
    pub difficulty_ranking: Vec<String>,
    pub recommendations: Vec<String>,
}

pub struct BattleAnalyzer<'a> {
    engine: BattleEngine,
    opponents: &'a [Opponent],
    config: AnalysisConfig,
    seed: u64,
}

impl<'a> BattleAnalyzer<'a> {
    pub fn new(
        engine: BattleEngine,
        opponents: &'a [Opponent],
        config: AnalysisConfig,
        seed: u64,
    ) -> Self {
        BattleAnalyzer {
            engine,
            opponents,
            config,
            seed,
        }
    }

    fn logs<'t>(
        &self,
        team: &'t Team,
        foe: &'t Team,
        n: usize,
        stream: u64,
    ) -> Vec<BattleLog<'t>> {
        let mut rng = SmallRng::seed_from_u64(stream);
        (0..n)
            .map(|_| self.engine.run_team_match(team, foe, &mut rng))
            .collect()
    }

    /// Team statistics against every opponent, in roster order.
    pub fn analyze_team(&self, team: &Team, n: usize) -> Vec<OpponentStatistics> {
        self.opponents
            .iter()
            .enumerate()
            .map(|(o, opponent)| {
                info!("Analyzing performance against {}", opponent.name);
                let stream = derive_seed(self.seed, 1, o as u64);
                let logs = self.logs(team, &opponent.team, n, stream);
                OpponentStatistics {
                    opponent: opponent.name.clone(),
                    stats: BattleStatistics::from_logs(&logs),
                }
            })
            .collect()
    }

    pub fn member_performance(
        &self,
        member: &Combatant,
        opponent: &Opponent,
        n: usize,
        stream: u64,
    ) -> MemberPerformance {
        let solo = Team::truncated(vec![member.clone()]);
        let logs = self.logs(&solo, &opponent.team, n, stream);
        let (most, least) = type_matchups(member, &opponent.team);
        MemberPerformance {
            member: member.name().to_string(),
            opponent: opponent.name.clone(),
            stats: BattleStatistics::from_logs(&logs),
            most_effective_against: most,
            least_effective_against: least,
        }
    }

    /// Each member alone against each opponent, member-major.
    pub fn analyze_members(&self, team: &Team, n: usize) -> Vec<MemberPerformance> {
        let mut out = Vec::with_capacity(team.len() * self.opponents.len());
        for (m, member) in team.iter().enumerate() {
            debug!("Analyzing {}", member.name());
            for (o, opponent) in self.opponents.iter().enumerate() {
                let stream = derive_seed(self.seed, 2 + m as u64, o as u64);
                out.push(self.member_performance(member, opponent, n, stream));
            }
        }
        out
    }

    /// For each member, the level in the configured range whose solo win
    /// rates summed over the roster are highest. Keeps the current level when
    /// no level wins anything.
    pub fn find_optimal_levels(&self, team: &Team) -> Vec<OptimalLevel> {
        let (low, high) = self.config.level_range;
        let step = self.config.level_step.max(1) as usize;
        team.iter()
            .enumerate()
            .map(|(m, member)| {
                let mut best = OptimalLevel {
                    member: member.name().to_string(),
                    level: member.level(),
                    performance: 0.0,
                };
                for level in (low..=high).step_by(step) {
                    let mut leveled = member.clone();
                    leveled.set_level(level);
                    let solo = Team::truncated(vec![leveled]);
                    let sims = self.config.level_simulations;
                    let performance: f64 = self
                        .opponents
                        .iter()
                        .enumerate()
                        .map(|(o, opponent)| {
                            let base = self.seed ^ level as u64;
                            let stream = derive_seed(base, 100 + m as u64, o as u64);
                            self.engine.simulate(&solo, &opponent.team, sims, stream).win_rate
                        })
                        .sum();
                    if performance > best.performance {
                        best.level = level;
                        best.performance = performance;
                    }
                }
                debug!("{} performs best at level {}", best.member, best.level);
                best
            })
            .collect()
    }

    /// Full report: team statistics, solo runs with a fifth of the
    /// simulations, level sweep and recommendations.
    pub fn report(&self, team: &Team) -> TeamAnalysis {
        let n = self.config.simulations;
        let opponents = self.analyze_team(team, n);
        let members = self.analyze_members(team, (n / 5).max(1));
        let optimal_levels = self.find_optimal_levels(team);

        let rates: Vec<f64> = opponents.iter().map(|o| o.stats.win_rate).collect();
        let turns: Vec<f64> = opponents.iter().map(|o| o.stats.avg_turns).collect();
        let mut ranked: Vec<&OpponentStatistics> = opponents.iter().collect();
        ranked.sort_by(|a, b| a.stats.win_rate.total_cmp(&b.stats.win_rate));
        let difficulty_ranking = ranked.iter().map(|o| o.opponent.clone()).collect();
        let recommendations = recommendations(&opponents, &members);

        TeamAnalysis {
            overall_win_rate: mean(&rates),
            overall_avg_turns: mean(&turns),
            team_size: team.len(),
            opponents,
            members,
            optimal_levels,
            difficulty_ranking,
            recommendations,
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Ranks the opponent team's types by the average of this member's best
/// damaging multiplier against each. Returns the top three and bottom three.
pub fn type_matchups(member: &Combatant, opponent_team: &Team) -> (Vec<Type>, Vec<Type>) {
    let mut seen: Vec<(Type, Vec<f64>)> = Vec::new();
    for foe in opponent_team.iter() {
        for &t in foe.types() {
            let best = member
                .repertoire()
                .moves()
                .iter()
                .filter(|mv| !mv.is_status())
                .map(|mv| effectiveness(mv.move_type(), &[t]))
                .fold(0.0, f64::max);
            match seen.iter_mut().find(|(s, _)| *s == t) {
                Some((_, values)) => values.push(best),
                None => seen.push((t, vec![best])),
            }
        }
    }
    let mut averaged: Vec<(Type, f64)> = seen.iter().map(|(t, v)| (*t, mean(v))).collect();
    averaged.sort_by(|a, b| b.1.total_cmp(&a.1));
    let most = averaged.iter().take(3).map(|(t, _)| *t).collect();
    let least = averaged[averaged.len().saturating_sub(3)..]
        .iter()
        .map(|(t, _)| *t)
        .collect();
    (most, least)
}

/// Opponents under 50%, members whose solo average is under 30%, and an
/// overall verdict.
pub fn recommendations(
    opponents: &[OpponentStatistics],
    members: &[MemberPerformance],
) -> Vec<String> {
    let mut out = Vec::new();
    let hard: Vec<&str> = opponents
        .iter()
        .filter(|o| o.stats.win_rate < 0.5)
        .map(|o| o.opponent.as_str())
        .collect();
    if !hard.is_empty() {
        out.push(format!("Improve the plan against: {}", hard.join(", ")));
    }

    let mut names: Vec<&str> = Vec::new();
    for m in members {
        if !names.contains(&m.member.as_str()) {
            names.push(&m.member);
        }
    }
    for name in names {
        let rates: Vec<f64> = members
            .iter()
            .filter(|m| m.member == name)
            .map(|m| m.stats.win_rate)
            .collect();
        let avg = mean(&rates);
        if avg < 0.3 {
            out.push(format!("Consider replacing {name} (solo win rate {:.1}%)", avg * 100.0));
        }
    }

    let overall = mean(&opponents.iter().map(|o| o.stats.win_rate).collect::<Vec<_>>());
    out.push(
        if overall < 0.4 {
            "The team needs significant improvement"
        } else if overall < 0.6 {
            "The team has potential but can be optimized"
        } else {
            "The team is well balanced"
        }
        .to_string(),
    );
    out
}
