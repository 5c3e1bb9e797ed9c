//! Tournament runner for antwar games.
//!
//! Provides a pure function interface: `(world, brains, config) -> GameResult`
//!
//! On top of single games the runner handles:
//! - Matches: pairs of games with colours swapped, repeated until decided
//! - Knockout tournaments with deterministic seeding and byes
//! - Parallel match execution within a round with rayon

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::brain::{Brain, parse_brain};
use crate::error::{BrainError, WorldError};
use crate::game::{MatchConfig, Phase, World};
use crate::rng::Rng;
use crate::world::{Color, Grid, MapGenConfig, MapGenError, generate_world, parse_grid};

/// Configuration for matches and tournaments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    /// Settings for every game. Round `r` of a match uses `seed + r`.
    pub game: MatchConfig,
    /// Two-game rounds played before a tied match goes to tie-breaks.
    pub max_match_rounds: u32,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            game: MatchConfig::default(),
            max_match_rounds: 5,
        }
    }
}

/// Final result of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameResult {
    /// Name of the red brain.
    pub red: String,
    /// Name of the black brain.
    pub black: String,
    /// Food on red anthill cells at the end.
    pub red_score: u32,
    /// Food on black anthill cells at the end.
    pub black_score: u32,
    /// Surviving red ants.
    pub red_alive: usize,
    /// Surviving black ants.
    pub black_alive: usize,
    /// Ants killed by encirclement.
    pub encircled: u32,
    /// Ants removed for brain faults.
    pub faulted: u32,
    /// Total turns played.
    pub turns_played: u32,
    /// The seed used for this game.
    pub seed: i64,
}

impl GameResult {
    /// Summarize the current state of `world`.
    #[must_use]
    pub fn from_world(world: &World) -> Self {
        Self {
            red: world.team_name(Color::Red).unwrap_or_default().to_string(),
            black: world.team_name(Color::Black).unwrap_or_default().to_string(),
            red_score: world.red_score(),
            black_score: world.black_score(),
            red_alive: world.alive_count(Color::Red),
            black_alive: world.alive_count(Color::Black),
            encircled: world.encircled_count(),
            faulted: world.faulted_count(),
            turns_played: world.turn(),
            seed: world.config().seed,
        }
    }

    /// Colour with the higher score, or `None` for a draw.
    #[must_use]
    pub fn winner(&self) -> Option<Color> {
        match self.red_score.cmp(&self.black_score) {
            std::cmp::Ordering::Greater => Some(Color::Red),
            std::cmp::Ordering::Less => Some(Color::Black),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Name of the winning brain, or `None` for a draw.
    #[must_use]
    pub fn winner_name(&self) -> Option<&str> {
        self.winner().map(|c| match c {
            Color::Red => self.red.as_str(),
            Color::Black => self.black.as_str(),
        })
    }
}

/// How a match was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// More games won.
    Points,
    /// Points level after every round; more food collected overall.
    Food,
    /// Points and food level; alphabetically first name advances.
    Name,
}

/// Result of a match between two brains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// First entrant (red in the first game of each round).
    pub first: String,
    /// Second entrant.
    pub second: String,
    /// Every game played, in order.
    pub games: Vec<GameResult>,
    /// Games won by `first`.
    pub first_points: u32,
    /// Games won by `second`.
    pub second_points: u32,
    /// Food scored by `first` over all games.
    pub first_food: u64,
    /// Food scored by `second` over all games.
    pub second_food: u64,
    /// Name of the winner.
    pub winner: String,
    /// What decided the winner.
    pub decided_by: Decision,
}

/// One round of a knockout tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TournamentRound {
    /// Matches in bracket order.
    pub matches: Vec<MatchResult>,
    /// Entrant that advanced without playing.
    pub bye: Option<String>,
}

/// Result of a knockout tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TournamentResult {
    /// Entrant names in seeded bracket order.
    pub bracket: Vec<String>,
    /// Rounds from first to final.
    pub rounds: Vec<TournamentRound>,
    /// Name of the overall winner.
    pub champion: String,
}

/// Error type for tournament operations.
#[derive(Debug)]
pub enum TournamentError {
    /// Not enough entrants (minimum 2).
    TooFewEntrants(usize),
    /// Two entrants share a name.
    DuplicateEntrant(String),
    /// An entrant's brain failed to load.
    Brain(BrainError),
    /// The world file failed to load.
    World(WorldError),
    /// World generation failed.
    MapGen(MapGenError),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooFewEntrants(n) => write!(f, "Too few entrants: {n} (minimum 2)"),
            Self::DuplicateEntrant(name) => write!(f, "Duplicate entrant name: {name}"),
            Self::Brain(e) => write!(f, "Brain error: {e}"),
            Self::World(e) => write!(f, "World error: {e}"),
            Self::MapGen(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for TournamentError {}

impl From<BrainError> for TournamentError {
    fn from(e: BrainError) -> Self {
        Self::Brain(e)
    }
}

impl From<WorldError> for TournamentError {
    fn from(e: WorldError) -> Self {
        Self::World(e)
    }
}

impl From<MapGenError> for TournamentError {
    fn from(e: MapGenError) -> Self {
        Self::MapGen(e)
    }
}

/// Load every brain file in `paths`.
///
/// # Errors
///
/// Returns the first brain that fails to parse.
pub fn load_entrants<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Arc<Brain>>, TournamentError> {
    paths
        .iter()
        .map(|p| parse_brain(p).map(Arc::new).map_err(TournamentError::from))
        .collect()
}

/// Load the world file at `path`, or generate a default-sized world from
/// `seed` when no path is given.
///
/// # Errors
///
/// Returns an error if the file is invalid or generation fails.
pub fn load_arena(path: Option<&Path>, seed: i64) -> Result<Grid, TournamentError> {
    match path {
        Some(path) => Ok(parse_grid(path)?),
        None => Ok(generate_world(seed, &MapGenConfig::default())?),
    }
}

/// Play one complete game.
///
/// Deterministic: the same grid, brains and config always give the same
/// result.
#[must_use]
pub fn run_game(grid: &Grid, red: &Arc<Brain>, black: &Arc<Brain>, config: &MatchConfig) -> GameResult {
    let mut world = World::with_config(grid.clone(), *config);
    world.begin_game(Arc::clone(red), Arc::clone(black));

    while world.phase() == Phase::Running {
        if world.step_turn().is_err() {
            break;
        }
    }

    GameResult::from_world(&world)
}

/// Play a match: rounds of two games with colours swapped, one point per
/// game won, until a round ends with the points apart or
/// `max_match_rounds` is reached.
#[must_use]
pub fn run_match(
    grid: &Grid,
    first: &Arc<Brain>,
    second: &Arc<Brain>,
    config: &TournamentConfig,
) -> MatchResult {
    let mut games = Vec::new();
    let (mut first_points, mut second_points) = (0u32, 0u32);
    let (mut first_food, mut second_food) = (0u64, 0u64);

    for round in 0..config.max_match_rounds.max(1) {
        let game_config = MatchConfig {
            seed: config.game.seed.wrapping_add(i64::from(round)),
            ..config.game
        };

        for (red, black, first_is_red) in [(first, second, true), (second, first, false)] {
            let result = run_game(grid, red, black, &game_config);
            let (first_score, second_score) = if first_is_red {
                (result.red_score, result.black_score)
            } else {
                (result.black_score, result.red_score)
            };
            first_food += u64::from(first_score);
            second_food += u64::from(second_score);
            match first_score.cmp(&second_score) {
                std::cmp::Ordering::Greater => first_points += 1,
                std::cmp::Ordering::Less => second_points += 1,
                std::cmp::Ordering::Equal => {}
            }
            games.push(result);
        }

        if first_points != second_points {
            break;
        }
    }

    let (first_wins, decided_by) = if first_points != second_points {
        (first_points > second_points, Decision::Points)
    } else if first_food != second_food {
        (first_food > second_food, Decision::Food)
    } else {
        (first.name() <= second.name(), Decision::Name)
    };
    let winner = if first_wins { first.name() } else { second.name() }.to_string();

    info!(
        first = first.name(),
        second = second.name(),
        first_points,
        second_points,
        winner = %winner,
        "match finished"
    );

    MatchResult {
        first: first.name().to_string(),
        second: second.name().to_string(),
        games,
        first_points,
        second_points,
        first_food,
        second_food,
        winner,
        decided_by,
    }
}

/// Run a knockout tournament.
///
/// # Errors
///
/// Returns an error with fewer than two entrants or duplicate names.
pub fn run_tournament(
    grid: &Grid,
    entrants: &[Arc<Brain>],
    config: &TournamentConfig,
) -> Result<TournamentResult, TournamentError> {
    run_tournament_with(grid, entrants, config, |_| {})
}

/// Run a knockout tournament, calling `on_match` as each match finishes.
///
/// Entrants are shuffled with the game RNG seeded from `config.game.seed`,
/// then paired in order; with an odd count the last entrant gets a bye.
/// All matches of a round run in parallel.
///
/// # Errors
///
/// Returns an error with fewer than two entrants or duplicate names.
pub fn run_tournament_with(
    grid: &Grid,
    entrants: &[Arc<Brain>],
    config: &TournamentConfig,
    on_match: impl Fn(&MatchResult) + Sync,
) -> Result<TournamentResult, TournamentError> {
    if entrants.len() < 2 {
        return Err(TournamentError::TooFewEntrants(entrants.len()));
    }
    let mut seen = HashSet::new();
    for brain in entrants {
        if !seen.insert(brain.name()) {
            return Err(TournamentError::DuplicateEntrant(brain.name().to_string()));
        }
    }

    let mut pool: Vec<Arc<Brain>> = entrants.to_vec();
    let mut rng = Rng::new(config.game.seed);
    for i in (1..pool.len()).rev() {
        #[allow(clippy::cast_possible_truncation)]
        let j = rng.random_int((i + 1) as u32) as usize;
        pool.swap(i, j);
    }
    let bracket = pool.iter().map(|b| b.name().to_string()).collect();

    let mut rounds = Vec::new();
    while pool.len() > 1 {
        let bye = if pool.len() % 2 == 1 { pool.pop() } else { None };
        let matches: Vec<MatchResult> = pool
            .par_chunks(2)
            .map(|pair| {
                let result = run_match(grid, &pair[0], &pair[1], config);
                on_match(&result);
                result
            })
            .collect();

        let mut next: Vec<Arc<Brain>> = pool
            .chunks(2)
            .zip(&matches)
            .map(|(pair, m)| {
                if pair[0].name() == m.winner {
                    Arc::clone(&pair[0])
                } else {
                    Arc::clone(&pair[1])
                }
            })
            .collect();
        if let Some(bye) = &bye {
            next.push(Arc::clone(bye));
        }

        rounds.push(TournamentRound {
            matches,
            bye: bye.map(|b| b.name().to_string()),
        });
        pool = next;
    }

    let champion = pool
        .first()
        .map(|b| b.name().to_string())
        .unwrap_or_default();
    info!(champion = %champion, rounds = rounds.len(), "tournament finished");

    Ok(TournamentResult {
        bracket,
        rounds,
        champion,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::parse_brain_str;
    use crate::world::parse_grid_str;

    /// Food next to each hill.
    const ARENA: &str = "\
8
5
# # # # # # # #
 # 9 + . . - 9 #
# . . . . . . #
 # . . . . . . #
# # # # # # # #
";

    /// Turns until it sees food, fetches one particle and carries it home.
    const FORAGER: &str = "\
sense ahead 1 2 food
move 3 0
turn left 0
pickup 4 4
turn left 5
turn left 6
turn left 7
move 8 7
drop 8
";

    fn brain(name: &str, src: &str) -> Arc<Brain> {
        Arc::new(parse_brain_str(name, src).unwrap())
    }

    fn config(turns: u32) -> TournamentConfig {
        TournamentConfig {
            game: MatchConfig {
                max_turns: turns,
                rest_after_move: 0,
                ..MatchConfig::default()
            },
            ..TournamentConfig::default()
        }
    }

    #[test]
    fn test_tournament_error_display() {
        let err = TournamentError::TooFewEntrants(1);
        assert_eq!(err.to_string(), "Too few entrants: 1 (minimum 2)");
    }

    #[test]
    fn test_run_game_is_deterministic() {
        let grid = parse_grid_str(ARENA).unwrap();
        let flipper = brain("flipper", "flip 2 1 2\nmove 0 2\nturn left 0\n");
        let idle = brain("idle", "turn left 0");
        let cfg = config(200).game;

        let a = run_game(&grid, &flipper, &idle, &cfg);
        let b = run_game(&grid, &flipper, &idle, &cfg);
        assert_eq!(a, b);
        assert_eq!(a.turns_played, 200);
        assert_eq!(a.red, "flipper");
    }

    #[test]
    fn test_forager_beats_idler() {
        let grid = parse_grid_str(ARENA).unwrap();
        let forager = brain("forager", FORAGER);
        let idle = brain("idle", "turn left 0");

        let game = run_game(&grid, &forager, &idle, &config(50).game);
        assert_eq!(game.red_score, 1);
        assert_eq!(game.winner(), Some(Color::Red));
        assert_eq!(game.winner_name(), Some("forager"));

        let result = run_match(&grid, &forager, &idle, &config(50));
        assert_eq!(result.games.len(), 2);
        assert_eq!(result.first_points, 2);
        assert_eq!(result.winner, "forager");
        assert_eq!(result.decided_by, Decision::Points);
    }

    #[test]
    fn test_tied_match_goes_to_name() {
        let grid = parse_grid_str(ARENA).unwrap();
        let a = brain("alpha", "turn left 0");
        let b = brain("beta", "turn right 0");

        let result = run_match(&grid, &b, &a, &config(10));
        assert_eq!(result.games.len(), 10);
        assert_eq!(result.decided_by, Decision::Name);
        assert_eq!(result.winner, "alpha");
    }

    #[test]
    fn test_tournament_validation() {
        let grid = parse_grid_str(ARENA).unwrap();
        let a = brain("a", "turn left 0");
        assert!(matches!(
            run_tournament(&grid, &[Arc::clone(&a)], &config(5)),
            Err(TournamentError::TooFewEntrants(1))
        ));
        assert!(matches!(
            run_tournament(&grid, &[Arc::clone(&a), a], &config(5)),
            Err(TournamentError::DuplicateEntrant(_))
        ));
    }

    #[test]
    fn test_knockout_with_bye() {
        let grid = parse_grid_str(ARENA).unwrap();
        let entrants = vec![
            brain("forager", FORAGER),
            brain("idle1", "turn left 0"),
            brain("idle2", "turn right 0"),
        ];

        let result = run_tournament(&grid, &entrants, &config(50)).unwrap();
        assert_eq!(result.bracket.len(), 3);
        assert_eq!(result.rounds.len(), 2);
        assert!(result.rounds[0].bye.is_some());
        assert_eq!(result.rounds[0].matches.len(), 1);
        assert_eq!(result.rounds[1].matches.len(), 1);
        assert_eq!(result.champion, "forager");

        let again = run_tournament(&grid, &entrants, &config(50)).unwrap();
        assert_eq!(again, result);
    }
}
