//! Match state and the turn scheduler.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::brain::{Brain, Condition};
use crate::error::{MatchError, RuntimeFault};
use crate::game::encirclement::{self, Kill};
use crate::game::{Ant, interpreter};
use crate::rng::Rng;
use crate::world::{AntId, Cell, Color, Grid, Position, Terrain};

/// Poll interval of [`World::run`] while paused.
const PAUSE_POLL: Duration = Duration::from_millis(10);

/// Tunable match parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// RNG seed applied by [`World::begin_game`].
    pub seed: i64,
    /// The game ends after this many turns.
    pub max_turns: u32,
    /// Turns an ant rests after a successful `Move`.
    pub rest_after_move: u32,
    /// Delay between turns in [`World::run`]; never affects the outcome.
    pub pacing_ms: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            max_turns: 300_000,
            rest_after_move: 14,
            pacing_ms: 0,
        }
    }
}

/// Lifecycle of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// No brains loaded yet.
    NotStarted,
    /// Turns can be stepped.
    Running,
    /// Turn ceiling reached or stopped.
    Finished,
}

/// Pause and stop flags, shareable with other threads.
///
/// Flags are only honoured at turn boundaries.
#[derive(Debug, Default)]
pub struct MatchControl {
    paused: AtomicBool,
    stopped: AtomicBool,
}

impl MatchControl {
    /// Request a pause before the next turn of [`World::run`].
    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    /// Clear a pause request.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    /// Request that the game finish at the next turn boundary.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// Whether a pause is requested.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Whether a stop is requested.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.paused.store(false, Ordering::SeqCst);
        self.stopped.store(false, Ordering::SeqCst);
    }
}

/// What happened during one turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnReport {
    /// Turn number after the step (1 for the first turn).
    pub turn: u32,
    /// Ants killed by encirclement.
    pub kills: Vec<Kill>,
    /// Ants removed for running past the end of their program.
    pub faults: Vec<RuntimeFault>,
}

/// Immutable copy of the observable state between two turns.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Cells at the end of the turn.
    pub grid: Grid,
    /// All ants, dead ones included.
    pub ants: Vec<Ant>,
    /// Turns completed.
    pub turn: u32,
    /// Food on red anthill cells.
    pub red_score: u32,
    /// Food on black anthill cells.
    pub black_score: u32,
    /// Lifecycle phase.
    pub phase: Phase,
}

impl Snapshot {
    /// Score of `color`.
    #[must_use]
    pub const fn score(&self, color: Color) -> u32 {
        match color {
            Color::Red => self.red_score,
            Color::Black => self.black_score,
        }
    }
}

/// A world and the game being played on it.
///
/// Owns the only mutable copy of the grid, ants and RNG. Observers on
/// other threads should work from a [`Snapshot`].
#[derive(Debug)]
pub struct World {
    pub(crate) grid: Grid,
    pristine: Grid,
    pub(crate) ants: Vec<Ant>,
    red: Option<Arc<Brain>>,
    black: Option<Arc<Brain>>,
    pub(crate) rng: Rng,
    turn: u32,
    red_score: u32,
    black_score: u32,
    phase: Phase,
    pub(crate) config: MatchConfig,
    control: Arc<MatchControl>,
    initial_food: u64,
    encircled: u32,
    faulted: u32,
}

impl World {
    /// Wrap a grid with the default configuration.
    #[must_use]
    pub fn new(grid: Grid) -> Self {
        Self::with_config(grid, MatchConfig::default())
    }

    /// Wrap a grid with an explicit configuration.
    #[must_use]
    pub fn with_config(grid: Grid, config: MatchConfig) -> Self {
        let initial_food = grid.total_food();
        Self {
            pristine: grid.clone(),
            grid,
            ants: Vec::new(),
            red: None,
            black: None,
            rng: Rng::new(config.seed),
            turn: 0,
            red_score: 0,
            black_score: 0,
            phase: Phase::NotStarted,
            config,
            control: Arc::new(MatchControl::default()),
            initial_food,
            encircled: 0,
            faulted: 0,
        }
    }

    /// Start a fresh game on the world as it was loaded.
    ///
    /// Restores the grid as loaded, reseeds the RNG and places one ant on
    /// every anthill cell, scanning rows top to bottom and each row left to
    /// right. Ant ids follow that order. Calling this again restarts.
    pub fn begin_game(&mut self, red: impl Into<Arc<Brain>>, black: impl Into<Arc<Brain>>) {
        self.red = Some(red.into());
        self.black = Some(black.into());
        self.restart();
    }

    fn restart(&mut self) {
        let (Some(red), Some(black)) = (self.red.clone(), self.black.clone()) else {
            return;
        };

        self.grid = self.pristine.clone();
        self.rng.set_seed(self.config.seed);
        self.control.reset();

        let homes: Vec<(Position, Color)> = self.grid.anthills().collect();
        self.ants = homes
            .into_iter()
            .enumerate()
            .map(|(id, (pos, color))| {
                let brain = match color {
                    Color::Red => Arc::clone(&red),
                    Color::Black => Arc::clone(&black),
                };
                Ant::new(id, color, brain, pos)
            })
            .collect();
        for ant in &self.ants {
            if let Some(cell) = self.grid.cell_mut(ant.position) {
                cell.set_occupant(Some(ant.id));
            }
        }

        self.turn = 0;
        self.initial_food = self.grid.total_food();
        self.encircled = 0;
        self.faulted = 0;
        self.recompute_scores();
        self.phase = if self.config.max_turns == 0 {
            Phase::Finished
        } else {
            Phase::Running
        };

        debug!(
            seed = self.config.seed,
            red = red.name(),
            black = black.name(),
            red_ants = self.alive_count(Color::Red),
            black_ants = self.alive_count(Color::Black),
            "game started"
        );
    }

    /// Exchange the red and black programs and start a fresh game.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::NotStarted`] if no brains were ever loaded.
    pub fn swap_brains(&mut self) -> Result<(), MatchError> {
        if self.red.is_none() || self.black.is_none() {
            return Err(MatchError::NotStarted);
        }
        std::mem::swap(&mut self.red, &mut self.black);
        self.restart();
        Ok(())
    }

    /// Play one turn: step every living ant once in id order, then score
    /// and apply encirclement.
    ///
    /// Ignores the pause flag; a pending stop request finishes the game
    /// instead of stepping.
    ///
    /// # Errors
    ///
    /// Returns an error if the game has not begun or is already over.
    pub fn step_turn(&mut self) -> Result<TurnReport, MatchError> {
        match self.phase {
            Phase::NotStarted => return Err(MatchError::NotStarted),
            Phase::Finished => return Err(MatchError::Finished),
            Phase::Running => {}
        }
        if self.control.is_stopped() {
            self.finish("stopped");
            return Err(MatchError::Finished);
        }

        let mut report = TurnReport::default();

        for id in 0..self.ants.len() {
            let ant = &mut self.ants[id];
            if !ant.alive {
                continue;
            }
            if ant.resting > 0 {
                ant.resting -= 1;
                continue;
            }
            if let Err(fault) = interpreter::step_ant(self, id) {
                warn!(%fault, "brain fault, removing ant");
                self.remove_ant(id, 0);
                self.faulted += 1;
                report.faults.push(fault);
            }
        }

        self.recompute_scores();
        report.kills = encirclement::apply(self);
        if !report.kills.is_empty() {
            self.encircled += u32::try_from(report.kills.len()).unwrap_or(u32::MAX);
            self.recompute_scores();
        }

        self.turn += 1;
        report.turn = self.turn;
        if self.turn >= self.config.max_turns {
            self.finish("turn limit");
        }
        Ok(report)
    }

    /// Run turns until the game finishes, calling `on_turn` after each.
    ///
    /// Honours the pause flag (polling every 10 ms) and the stop flag at
    /// turn boundaries, and sleeps `pacing_ms` between turns.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::NotStarted`] if no game has begun.
    pub fn run(&mut self, mut on_turn: impl FnMut(&Self, &TurnReport)) -> Result<(), MatchError> {
        if self.phase == Phase::NotStarted {
            return Err(MatchError::NotStarted);
        }
        let pacing = Duration::from_millis(self.config.pacing_ms);

        while self.phase == Phase::Running {
            while self.control.is_paused() && !self.control.is_stopped() {
                thread::sleep(PAUSE_POLL);
            }
            let report = match self.step_turn() {
                Ok(report) => report,
                Err(MatchError::Finished) => break,
                Err(e) => return Err(e),
            };
            on_turn(self, &report);
            if !pacing.is_zero() && self.phase == Phase::Running {
                thread::sleep(pacing);
            }
        }
        Ok(())
    }

    /// Request a pause (see [`MatchControl::pause`]).
    pub fn pause(&self) {
        self.control.pause();
    }

    /// Clear a pause request.
    pub fn resume(&self) {
        self.control.resume();
    }

    /// Request a stop at the next turn boundary.
    pub fn stop(&self) {
        self.control.stop();
    }

    /// Handle for pausing or stopping this game from another thread.
    #[must_use]
    pub fn control(&self) -> Arc<MatchControl> {
        Arc::clone(&self.control)
    }

    /// Copy the observable state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.grid.clone(),
            ants: self.ants.clone(),
            turn: self.turn,
            red_score: self.red_score,
            black_score: self.black_score,
            phase: self.phase,
        }
    }

    fn finish(&mut self, reason: &str) {
        self.phase = Phase::Finished;
        info!(
            reason,
            turn = self.turn,
            red_score = self.red_score,
            black_score = self.black_score,
            encircled = self.encircled,
            faulted = self.faulted,
            "game finished"
        );
    }

    fn recompute_scores(&mut self) {
        self.red_score = self.grid.anthill_food(Color::Red);
        self.black_score = self.grid.anthill_food(Color::Black);
    }

    /// Whether the cell at `pos` satisfies `cond` from the view of `color`.
    ///
    /// Off-grid positions satisfy nothing.
    #[must_use]
    pub fn cell_matches(&self, pos: Position, cond: Condition, color: Color) -> bool {
        let Some(cell) = self.grid.cell(pos) else {
            return false;
        };
        let occupant = cell.occupant().map(|id| &self.ants[id]);
        let friend = occupant.filter(|a| a.color == color);
        let foe = occupant.filter(|a| a.color != color);

        match cond {
            Condition::Friend => friend.is_some(),
            Condition::Foe => foe.is_some(),
            Condition::FriendWithFood => friend.is_some_and(|a| a.carrying_food),
            Condition::FoeWithFood => foe.is_some_and(|a| a.carrying_food),
            Condition::Food => cell.food() > 0,
            Condition::Rock => cell.terrain() == Terrain::Rocky,
            Condition::Marker(marker) => cell.has_marker(color, marker),
            Condition::FoeMarker => cell.has_any_marker(color.opponent()),
            Condition::Home => cell.terrain() == color.anthill(),
            Condition::FoeHome => cell.terrain() == color.opponent().anthill(),
        }
    }

    /// Move ant `id` to `to`, keeping the occupant fields in step.
    pub(crate) fn relocate(&mut self, id: AntId, to: Position) {
        let from = self.ants[id].position;
        if let Some(cell) = self.grid.cell_mut(from) {
            cell.set_occupant(None);
        }
        if let Some(cell) = self.grid.cell_mut(to) {
            cell.set_occupant(Some(id));
        }
        self.ants[id].position = to;
    }

    /// Take ant `id` out of play, leaving `bonus` food plus anything it
    /// carried on its cell.
    pub(crate) fn remove_ant(&mut self, id: AntId, bonus: u32) {
        let ant = &mut self.ants[id];
        let dropped = bonus + u32::from(ant.carrying_food);
        ant.alive = false;
        ant.carrying_food = false;
        ant.resting = 0;
        if let Some(cell) = self.grid.cell_mut(ant.position) {
            cell.set_occupant(None);
            cell.add_food(dropped);
        }
    }

    /// The grid in its current state.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The cell at `pos`.
    #[must_use]
    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.grid.cell(pos)
    }

    /// All ants in id order, dead ones included.
    #[must_use]
    pub fn ants(&self) -> &[Ant] {
        &self.ants
    }

    /// The ant with id `id`.
    #[must_use]
    pub fn ant(&self, id: AntId) -> Option<&Ant> {
        self.ants.get(id)
    }

    /// Living ants of `color`.
    #[must_use]
    pub fn alive_count(&self, color: Color) -> usize {
        self.ants
            .iter()
            .filter(|a| a.alive && a.color == color)
            .count()
    }

    /// Food currently held by living ants.
    #[must_use]
    pub fn carried_food(&self) -> u64 {
        self.ants
            .iter()
            .filter(|a| a.alive && a.carrying_food)
            .count() as u64
    }

    /// Food on red anthill cells.
    #[must_use]
    pub const fn red_score(&self) -> u32 {
        self.red_score
    }

    /// Food on black anthill cells.
    #[must_use]
    pub const fn black_score(&self) -> u32 {
        self.black_score
    }

    /// Score of `color`.
    #[must_use]
    pub const fn score(&self, color: Color) -> u32 {
        match color {
            Color::Red => self.red_score,
            Color::Black => self.black_score,
        }
    }

    /// Turns completed.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Name of the brain playing `color`.
    #[must_use]
    pub fn team_name(&self, color: Color) -> Option<&str> {
        match color {
            Color::Red => self.red.as_deref().map(Brain::name),
            Color::Black => self.black.as_deref().map(Brain::name),
        }
    }

    /// The brain playing `color`.
    #[must_use]
    pub fn brain(&self, color: Color) -> Option<&Arc<Brain>> {
        match color {
            Color::Red => self.red.as_ref(),
            Color::Black => self.black.as_ref(),
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Replace the configuration. Seed and rest changes apply from the
    /// next [`World::begin_game`]; the turn ceiling applies immediately.
    pub fn set_config(&mut self, config: MatchConfig) {
        self.config = config;
        if self.phase == Phase::Running && self.turn >= config.max_turns {
            self.finish("turn limit");
        }
    }

    /// Food on the grid when the current game began.
    #[must_use]
    pub const fn initial_food(&self) -> u64 {
        self.initial_food
    }

    /// Ants killed by encirclement this game.
    #[must_use]
    pub const fn encircled_count(&self) -> u32 {
        self.encircled
    }

    /// Ants removed for brain faults this game.
    #[must_use]
    pub const fn faulted_count(&self) -> u32 {
        self.faulted
    }

    /// RNG state, for dumps.
    #[must_use]
    pub const fn rng_seed(&self) -> i64 {
        self.rng.seed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::parse_brain_str;
    use crate::world::parse_grid_str;
    use std::sync::atomic::AtomicU32;
    use std::time::Instant;

    const TINY: &str = "\
5
5
# # # # #
 # + . 3 #
# . . . #
 # . - . #
# # # # #
";

    fn brain(src: &str) -> Brain {
        parse_brain_str("t", src).unwrap()
    }

    fn tiny() -> World {
        World::new(parse_grid_str(TINY).unwrap())
    }

    #[test]
    fn test_step_before_begin() {
        let mut world = tiny();
        assert_eq!(world.phase(), Phase::NotStarted);
        assert_eq!(world.step_turn(), Err(MatchError::NotStarted));
        assert_eq!(world.run(|_, _| {}), Err(MatchError::NotStarted));
        assert_eq!(world.swap_brains(), Err(MatchError::NotStarted));
    }

    #[test]
    fn test_begin_game_places_ants() {
        let mut world = tiny();
        world.begin_game(brain("drop 0"), brain("drop 0"));
        assert_eq!(world.phase(), Phase::Running);
        assert_eq!(world.ants().len(), 2);

        let red = world.ant(0).unwrap();
        assert_eq!(red.color(), Color::Red);
        assert_eq!(red.position(), Position::new(1, 1));
        assert_eq!(red.state(), 0);
        assert_eq!(
            world.cell(Position::new(2, 3)).unwrap().occupant(),
            Some(1)
        );
        assert_eq!(world.ant(1).unwrap().color(), Color::Black);
        assert_eq!(world.initial_food(), 3);
    }

    #[test]
    fn test_turn_ceiling() {
        let mut world = World::with_config(
            parse_grid_str(TINY).unwrap(),
            MatchConfig {
                max_turns: 3,
                ..MatchConfig::default()
            },
        );
        world.begin_game(brain("turn left 0"), brain("turn right 0"));
        let mut turns = 0;
        world.run(|_, _| turns += 1).unwrap();
        assert_eq!(turns, 3);
        assert_eq!(world.turn(), 3);
        assert_eq!(world.phase(), Phase::Finished);
        assert_eq!(world.step_turn(), Err(MatchError::Finished));
    }

    #[test]
    fn test_stop_finishes_at_boundary() {
        let mut world = tiny();
        world.begin_game(brain("turn left 0"), brain("turn left 0"));
        world.step_turn().unwrap();
        world.control().stop();
        assert_eq!(world.step_turn(), Err(MatchError::Finished));
        assert_eq!(world.turn(), 1);
        assert_eq!(world.phase(), Phase::Finished);
    }

    #[test]
    fn test_stop_from_callback() {
        let mut world = tiny();
        world.begin_game(brain("turn left 0"), brain("turn left 0"));
        world
            .run(|w, report| {
                if report.turn == 5 {
                    w.stop();
                }
            })
            .unwrap();
        assert_eq!(world.turn(), 5);
    }

    /// Spawn `run` on its own thread, publishing the turn number after
    /// every turn.
    fn spawn_run(mut world: World) -> (Arc<AtomicU32>, thread::JoinHandle<World>) {
        let turns = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&turns);
        let handle = thread::spawn(move || {
            world
                .run(|w, _| seen.store(w.turn(), Ordering::SeqCst))
                .unwrap();
            world
        });
        (turns, handle)
    }

    fn slow_world(max_turns: u32) -> World {
        let mut world = World::with_config(
            parse_grid_str(TINY).unwrap(),
            MatchConfig {
                max_turns,
                pacing_ms: 5,
                ..MatchConfig::default()
            },
        );
        world.begin_game(brain("turn left 0"), brain("turn right 0"));
        world
    }

    #[test]
    fn test_pause_holds_turn_until_resume() {
        let world = slow_world(200);
        let control = world.control();
        let (turns, handle) = spawn_run(world);

        let deadline = Instant::now() + Duration::from_secs(10);
        while turns.load(Ordering::SeqCst) == 0 {
            assert!(Instant::now() < deadline, "game never started");
            thread::sleep(Duration::from_millis(1));
        }
        control.pause();
        assert!(control.is_paused());

        // Let a turn already in flight complete.
        thread::sleep(PAUSE_POLL * 5);
        let held = turns.load(Ordering::SeqCst);
        assert!(held < 200);
        thread::sleep(PAUSE_POLL * 10);
        assert_eq!(turns.load(Ordering::SeqCst), held);

        control.resume();
        assert!(!control.is_paused());
        let world = handle.join().unwrap();
        assert_eq!(world.phase(), Phase::Finished);
        assert_eq!(world.turn(), 200);
        assert_eq!(turns.load(Ordering::SeqCst), 200);
    }

    #[test]
    fn test_stop_while_paused_exits_run() {
        let world = slow_world(200);
        world.pause();
        let control = world.control();
        let (turns, handle) = spawn_run(world);

        thread::sleep(PAUSE_POLL * 5);
        assert_eq!(turns.load(Ordering::SeqCst), 0);

        control.stop();
        let world = handle.join().unwrap();
        assert_eq!(world.turn(), 0);
        assert_eq!(world.phase(), Phase::Finished);
        assert!(control.is_paused());
        assert!(control.is_stopped());
    }

    #[test]
    fn test_resting_skips_turns() {
        let mut world = World::with_config(
            parse_grid_str(TINY).unwrap(),
            MatchConfig {
                rest_after_move: 2,
                ..MatchConfig::default()
            },
        );
        world.begin_game(brain("move 1 1\nturn left 1\n"), brain("turn left 0"));
        world.step_turn().unwrap();
        assert_eq!(world.ant(0).unwrap().position(), Position::new(2, 1));
        assert_eq!(world.ant(0).unwrap().resting(), 2);

        world.step_turn().unwrap();
        world.step_turn().unwrap();
        assert_eq!(world.ant(0).unwrap().direction(), crate::world::Direction::East);
        world.step_turn().unwrap();
        assert_eq!(
            world.ant(0).unwrap().direction(),
            crate::world::Direction::NorthEast
        );
    }

    #[test]
    fn test_fault_removes_ant_without_bonus() {
        let mut world = tiny();
        world.begin_game(brain("drop 9"), brain("turn left 0"));
        let report = world.step_turn().unwrap();
        assert!(report.faults.is_empty());

        let report = world.step_turn().unwrap();
        assert_eq!(report.faults.len(), 1);
        assert!(!world.ant(0).unwrap().is_alive());
        assert_eq!(world.cell(Position::new(1, 1)).unwrap().occupant(), None);
        assert_eq!(world.grid().total_food(), 3);
        assert_eq!(world.faulted_count(), 1);

        // the black ant keeps playing
        assert!(world.step_turn().is_ok());
    }

    #[test]
    fn test_swap_brains_restarts() {
        let mut world = tiny();
        world.begin_game(
            parse_brain_str("alpha", "drop 0").unwrap(),
            parse_brain_str("beta", "drop 0").unwrap(),
        );
        world.step_turn().unwrap();
        world.swap_brains().unwrap();
        assert_eq!(world.team_name(Color::Red), Some("beta"));
        assert_eq!(world.team_name(Color::Black), Some("alpha"));
        assert_eq!(world.turn(), 0);
        assert_eq!(world.ant(0).unwrap().brain().name(), "beta");
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut world = tiny();
        world.begin_game(brain("move 0 0"), brain("drop 0"));
        let before = world.snapshot();
        world.step_turn().unwrap();
        assert_eq!(before.turn, 0);
        assert_eq!(before.ants[0].position(), Position::new(1, 1));
        assert_eq!(world.ant(0).unwrap().position(), Position::new(2, 1));
    }
}
