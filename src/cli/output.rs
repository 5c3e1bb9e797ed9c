//! Output formatting utilities for CLI.

use antwar::tournament::{Decision, GameResult, MatchResult, TournamentResult};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Format a game result as human-readable text.
pub(super) fn format_text(result: &GameResult) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Game Result (seed: {})", result.seed);
    match result.winner_name() {
        Some(name) => {
            let _ = writeln!(output, "  Winner: {name}");
        }
        None => output.push_str("  Winner: Draw\n"),
    }
    let _ = writeln!(output, "  Turns: {}\n", result.turns_played);
    let _ = writeln!(
        output,
        "  red   {}: {} food, {} ants alive",
        result.red, result.red_score, result.red_alive
    );
    let _ = writeln!(
        output,
        "  black {}: {} food, {} ants alive",
        result.black, result.black_score, result.black_alive
    );
    if result.encircled > 0 || result.faulted > 0 {
        let _ = writeln!(
            output,
            "  Encircled: {}  Faulted: {}",
            result.encircled, result.faulted
        );
    }

    output
}

/// Format a match result as human-readable text.
pub(super) fn format_match_text(result: &MatchResult) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Match: {} vs {}", result.first, result.second);
    for (i, game) in result.games.iter().enumerate() {
        let _ = writeln!(
            output,
            "  Game {} (seed {}): red {} {} - {} {} black",
            i + 1,
            game.seed,
            game.red,
            game.red_score,
            game.black_score,
            game.black
        );
    }
    let how = match result.decided_by {
        Decision::Points => "on points",
        Decision::Food => "on total food",
        Decision::Name => "by name order",
    };
    let _ = writeln!(
        output,
        "  Points: {} {} - {} {}",
        result.first, result.first_points, result.second_points, result.second
    );
    let _ = writeln!(output, "  Winner: {} ({how})", result.winner);

    output
}

/// Per-brain totals over a tournament.
#[derive(Debug, Default, Clone, Serialize)]
pub(super) struct EntrantStats {
    /// Matches played.
    pub(super) matches: u32,
    /// Matches won.
    pub(super) match_wins: u32,
    /// Games played.
    pub(super) games: u32,
    /// Games won.
    pub(super) game_wins: u32,
    /// Food scored across all games.
    pub(super) food: u64,
}

impl EntrantStats {
    /// Average food per game.
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn avg_food(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.food as f64 / f64::from(self.games)
    }
}

/// Aggregate every game of a tournament by brain name.
pub(super) fn entrant_stats(result: &TournamentResult) -> BTreeMap<String, EntrantStats> {
    let mut stats: BTreeMap<String, EntrantStats> = result
        .bracket
        .iter()
        .map(|name| (name.clone(), EntrantStats::default()))
        .collect();

    for m in result.rounds.iter().flat_map(|r| &r.matches) {
        for name in [&m.first, &m.second] {
            let entry = stats.entry(name.clone()).or_default();
            entry.matches += 1;
            if *name == m.winner {
                entry.match_wins += 1;
            }
        }
        for game in &m.games {
            let winner = game.winner_name().map(str::to_string);
            for (name, score) in [(&game.red, game.red_score), (&game.black, game.black_score)] {
                let entry = stats.entry(name.clone()).or_default();
                entry.games += 1;
                entry.food += u64::from(score);
                if winner.as_deref() == Some(name.as_str()) {
                    entry.game_wins += 1;
                }
            }
        }
    }

    stats
}

/// JSON-serializable tournament report.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentResult<'a> {
    /// The bracket and every match.
    #[serde(flatten)]
    result: &'a TournamentResult,
    /// Per-brain totals.
    stats: BTreeMap<String, EntrantStats>,
}

impl<'a> JsonTournamentResult<'a> {
    /// Wrap a tournament result with its per-brain totals.
    pub(super) fn new(result: &'a TournamentResult) -> Self {
        Self {
            result,
            stats: entrant_stats(result),
        }
    }
}

/// Format tournament results as human-readable text.
pub(super) fn format_tournament_text(result: &TournamentResult) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Tournament Results ({} entrants)", result.bracket.len());
    output.push_str("========================================\n\n");

    for (i, round) in result.rounds.iter().enumerate() {
        let _ = writeln!(output, "Round {}:", i + 1);
        for m in &round.matches {
            let _ = writeln!(
                output,
                "  {} vs {}: {} wins {}-{}",
                m.first,
                m.second,
                m.winner,
                m.first_points.max(m.second_points),
                m.first_points.min(m.second_points)
            );
        }
        if let Some(bye) = &round.bye {
            let _ = writeln!(output, "  {bye}: bye");
        }
        output.push('\n');
    }

    output.push_str("Totals:\n");
    for (name, s) in entrant_stats(result) {
        let _ = writeln!(
            output,
            "  {name}: {}/{} matches, {}/{} games, {:.1} food/game",
            s.match_wins,
            s.matches,
            s.game_wins,
            s.games,
            s.avg_food()
        );
    }

    let _ = writeln!(output, "\nChampion: {}", result.champion);

    output
}

/// Format every game of a tournament as CSV.
pub(super) fn format_tournament_csv(result: &TournamentResult) -> String {
    let mut output = String::new();

    // Header
    output.push_str("round,match,game,seed,red,black,red_score,black_score,winner,turns\n");

    // Data rows
    for (r, round) in result.rounds.iter().enumerate() {
        for (m, matched) in round.matches.iter().enumerate() {
            for (g, game) in matched.games.iter().enumerate() {
                let _ = writeln!(
                    output,
                    "{},{},{},{},{},{},{},{},{},{}",
                    r + 1,
                    m + 1,
                    g + 1,
                    game.seed,
                    game.red,
                    game.black,
                    game.red_score,
                    game.black_score,
                    game.winner_name().unwrap_or("draw"),
                    game.turns_played
                );
            }
        }
    }

    output
}
