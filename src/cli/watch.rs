//! Watch command implementation - Interactive TUI viewer.

use super::{CliError, arena, match_config};
use antwar::game::World;
use antwar::replay::{Recording, ReplayEngine, cell_glyph};
use antwar::world::{Color as Colony, Position, Terrain};
use antwar::parse_brain;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io::stdout;
use std::path::Path;
use std::time::{Duration, Instant};

/// Execute the watch command.
///
/// # Errors
///
/// Returns an error if an input file is invalid or the TUI fails.
pub(crate) fn execute(
    red: &Path,
    black: &Path,
    world: Option<&Path>,
    seed: Option<i64>,
    turns: Option<u32>,
    speed: u64,
) -> Result<(), CliError> {
    let red = parse_brain(red)?;
    let black = parse_brain(black)?;
    let config = match_config(seed, turns);
    let grid = arena(world, config.seed)?;

    let recording = Recording::new(&grid, &red, &black, config);
    let engine = ReplayEngine::new(recording)?;

    run_tui(engine, speed, "Antwar")
}

/// App state for the TUI.
struct App {
    engine: ReplayEngine,
    title: &'static str,
    paused: bool,
    speed_ms: u64,
    turns_per_tick: u32,
    last_step: Instant,
    origin: (usize, usize),
}

impl App {
    fn new(engine: ReplayEngine, speed_ms: u64, title: &'static str) -> Self {
        Self {
            engine,
            title,
            paused: true, // Start paused
            speed_ms,
            turns_per_tick: 1,
            last_step: Instant::now(),
            origin: (0, 0),
        }
    }

    fn step_forward(&mut self) {
        for _ in 0..self.turns_per_tick {
            if self.engine.step_forward().is_err() {
                break;
            }
        }
        self.last_step = Instant::now();
    }

    fn step_backward(&mut self) {
        let target = self.engine.turn().saturating_sub(self.turns_per_tick);
        let _ = self.engine.goto_turn(target);
        self.last_step = Instant::now();
    }

    fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    fn increase_speed(&mut self) {
        if self.speed_ms > 10 {
            self.speed_ms = self.speed_ms.saturating_sub(50).max(10);
        } else {
            self.turns_per_tick = (self.turns_per_tick * 10).min(10_000);
        }
    }

    fn decrease_speed(&mut self) {
        if self.turns_per_tick > 1 {
            self.turns_per_tick /= 10;
        } else {
            self.speed_ms = (self.speed_ms + 50).min(2000);
        }
    }

    fn scroll(&mut self, dx: isize, dy: isize) {
        let grid = self.engine.world().grid();
        self.origin.0 = self.origin.0.saturating_add_signed(dx * 8).min(grid.width().saturating_sub(1));
        self.origin.1 = self.origin.1.saturating_add_signed(dy * 4).min(grid.height().saturating_sub(1));
    }

    fn should_auto_step(&self) -> bool {
        !self.paused
            && !self.engine.is_game_over()
            && self.last_step.elapsed() >= Duration::from_millis(self.speed_ms)
    }
}

/// Run the interactive viewer until the user quits.
pub(super) fn run_tui(engine: ReplayEngine, speed: u64, title: &'static str) -> Result<(), CliError> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| CliError::new(e.to_string()))?;

    let mut app = App::new(engine, speed, title);
    let result = event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
) -> Result<(), CliError> {
    loop {
        terminal
            .draw(|f| ui(f, app))
            .map_err(|e| CliError::new(e.to_string()))?;

        if app.should_auto_step() {
            app.step_forward();
        }

        // Handle input with timeout
        if event::poll(Duration::from_millis(10)).map_err(|e| CliError::new(e.to_string()))?
            && let Event::Key(key) = event::read().map_err(|e| CliError::new(e.to_string()))?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Char(' ') => app.toggle_pause(),
                KeyCode::Right | KeyCode::Char('l') => {
                    app.paused = true;
                    app.step_forward();
                }
                KeyCode::Left | KeyCode::Char('h') => {
                    app.paused = true;
                    app.step_backward();
                }
                KeyCode::Char('+' | '=') => app.increase_speed(),
                KeyCode::Char('-') => app.decrease_speed(),
                KeyCode::Char('w') => app.scroll(0, -1),
                KeyCode::Char('s') => app.scroll(0, 1),
                KeyCode::Char('a') => app.scroll(-1, 0),
                KeyCode::Char('d') => app.scroll(1, 0),
                KeyCode::Char('r') => {
                    let _ = app.engine.goto_turn(0);
                    app.paused = true;
                }
                _ => {}
            }
        }
    }
    Ok(())
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main content
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], app);

    // Main content - map and stats
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
        .split(chunks[1]);

    render_map(f, main_chunks[0], app);
    render_stats(f, main_chunks[1], app);
    render_footer(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let turn = app.engine.turn();
    let max_turns = app.engine.recording().config.max_turns;

    let status = if app.engine.is_game_over() {
        "GAME OVER"
    } else if app.paused {
        "PAUSED"
    } else {
        "RUNNING"
    };

    let title = format!(
        " {} | Turn {}/{} | {} | {}ms x{} ",
        app.title, turn, max_turns, status, app.speed_ms, app.turns_per_tick
    );

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn render_map(f: &mut Frame, area: Rect, app: &App) {
    let world = app.engine.world();
    let grid = world.grid();
    let (ox, oy) = app.origin;

    // Two columns per cell plus the odd-row stagger
    let visible_width = usize::from(area.width).saturating_sub(3) / 2;
    let visible_height = usize::from(area.height).saturating_sub(2);

    let mut lines: Vec<Line> = Vec::new();
    for y in oy..grid.height().min(oy + visible_height) {
        let mut spans = Vec::new();
        if y % 2 == 1 {
            spans.push(Span::raw(" "));
        }
        for x in ox..grid.width().min(ox + visible_width) {
            let Some(cell) = grid.cell(Position::new(x, y)) else {
                continue;
            };
            let occupant = cell.occupant().and_then(|id| world.ant(id));
            let color = match (occupant, cell.terrain()) {
                (Some(ant), _) => colony_color(ant.color()),
                (None, Terrain::Rocky) => Color::DarkGray,
                (None, Terrain::RedAnthill) => Color::LightRed,
                (None, Terrain::BlackAnthill) => Color::LightBlue,
                (None, Terrain::Clear) if cell.food() > 0 => Color::Yellow,
                (None, Terrain::Clear) => Color::Gray,
            };
            spans.push(Span::styled(
                format!("{} ", cell_glyph(cell, occupant)),
                Style::default().fg(color),
            ));
        }
        lines.push(Line::from(spans));
    }

    let map_widget =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(format!(" Map ({ox}, {oy}) ")));

    f.render_widget(map_widget, area);
}

const fn colony_color(colony: Colony) -> Color {
    match colony {
        Colony::Red => Color::Red,
        Colony::Black => Color::Blue,
    }
}

fn render_stats(f: &mut Frame, area: Rect, app: &App) {
    let world = app.engine.world();
    let mut lines = vec![Line::from("")];

    for colony in Colony::BOTH {
        let (alive, carrying) = colony_stats(world, colony);
        lines.push(Line::from(vec![
            Span::styled(
                format!("{colony} "),
                Style::default().fg(colony_color(colony)).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("({})", world.team_name(colony).unwrap_or("?"))),
        ]));
        lines.push(Line::from(format!("  Food home: {}", world.score(colony))));
        lines.push(Line::from(format!("  Ants: {alive}  Carrying: {carrying}")));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(format!("Encircled: {}", world.encircled_count())));
    lines.push(Line::from(format!("Faulted: {}", world.faulted_count())));
    lines.push(Line::from(format!("Food in play: {}", world.grid().total_food() + world.carried_food())));

    let stats_widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Colonies "))
        .wrap(Wrap { trim: false });

    f.render_widget(stats_widget, area);
}

fn colony_stats(world: &World, colony: Colony) -> (usize, usize) {
    let carrying = world
        .ants()
        .iter()
        .filter(|a| a.is_alive() && a.color() == colony && a.carrying_food())
        .count();
    (world.alive_count(colony), carrying)
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let controls = if app.engine.is_game_over() {
        " [q] Quit  [r] Restart  [←/→] Step  [wasd] Scroll "
    } else {
        " [q] Quit  [Space] Pause  [←/→] Step  [+/-] Speed  [wasd] Scroll  [r] Restart "
    };

    let footer = Paragraph::new(controls)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}
