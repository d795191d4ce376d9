pub mod driver;
pub mod renderer;

use std::{
    io::{Stdout, Write},
    time::{Duration, Instant},
};

use crossterm::{
    cursor,
    event::{self, KeyCode, KeyModifiers},
    queue,
    terminal::{self, ClearType},
};

use crate::{
    config::Config,
    maze::{Grid, RandomSource, seeded_rng},
};
use driver::{Driver, Tick};
use renderer::Renderer;

/// Set a panic hook to restore terminal state on panic
/// This ensures that the terminal is not left in raw mode or alternate screen on panic
fn set_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
        hook(panic_info);
    }));
}

/// Setup terminal in raw mode and enter alternate screen
/// Also sets a panic hook to restore terminal on panic
pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
    terminal::enable_raw_mode()?;
    set_panic_hook();
    queue!(
        stdout,
        terminal::EnterAlternateScreen,
        terminal::Clear(ClearType::All),
        cursor::Hide,
        cursor::MoveTo(0, 0)
    )?;
    stdout.flush()?;
    Ok(())
}

/// Restore terminal to original state
/// Leave alternate screen and disable raw mode
pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
    queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
    stdout.flush()?;
    terminal::disable_raw_mode()?;
    Ok(())
}

/// What the user asked for with a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UserAction {
    Quit,
    /// Start a new maze, only honored once the current one is finished
    NewMaze,
    /// Start a new maze immediately
    Reset,
    TogglePause,
    SpeedUp,
    SlowDown,
}

fn user_action(key_event: event::KeyEvent) -> Option<UserAction> {
    if key_event.kind != event::KeyEventKind::Press {
        return None;
    }
    match key_event.code {
        KeyCode::Esc | KeyCode::Char('q') => Some(UserAction::Quit),
        KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(UserAction::Quit)
        }
        KeyCode::Enter => Some(UserAction::NewMaze),
        KeyCode::Char('r') => Some(UserAction::Reset),
        KeyCode::Char(' ') => Some(UserAction::TogglePause),
        KeyCode::Up => Some(UserAction::SpeedUp),
        KeyCode::Down => Some(UserAction::SlowDown),
        _ => None,
    }
}

/// Animation state owned by the tick loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AppState {
    paused: bool,
    frame_interval: Duration,
}

/// What the tick loop has to do after a user action was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActionOutcome {
    Quit,
    /// Nothing changed
    Ignored,
    /// The status changed, redraw in place
    Redraw,
    /// The maze was replaced, drop the highlight and redraw
    Replaced,
}

fn apply_action<R: RandomSource>(
    driver: &mut Driver<R>,
    state: &mut AppState,
    action: UserAction,
) -> ActionOutcome {
    match action {
        UserAction::Quit => ActionOutcome::Quit,
        UserAction::NewMaze if !driver.is_finished() => ActionOutcome::Ignored,
        UserAction::NewMaze | UserAction::Reset => {
            driver.reset();
            ActionOutcome::Replaced
        }
        UserAction::TogglePause => {
            state.paused = !state.paused;
            ActionOutcome::Redraw
        }
        UserAction::SpeedUp => {
            state.frame_interval = (state.frame_interval / 2)
                .clamp(Config::MIN_FRAME_INTERVAL, Config::MAX_FRAME_INTERVAL);
            ActionOutcome::Redraw
        }
        UserAction::SlowDown => {
            state.frame_interval = (state.frame_interval * 2)
                .clamp(Config::MIN_FRAME_INTERVAL, Config::MAX_FRAME_INTERVAL);
            ActionOutcome::Redraw
        }
    }
}

/// Status line shown below the maze.
fn status_line<R: RandomSource>(driver: &Driver<R>, state: &AppState) -> String {
    let grid = driver.grid();
    if driver.is_finished() {
        return format!(
            "Maze {} complete in {} steps. Enter: start new maze  Esc: quit",
            driver.generation(),
            driver.steps()
        );
    }
    let fps = 1.0 / state.frame_interval.as_secs_f64();
    format!(
        "Maze {} | step {} | visited {}/{} | {:.0} fps{} | Space: pause  ↑/↓: speed  r: reset  Esc: quit",
        driver.generation(),
        driver.steps(),
        grid.visited_count(),
        grid.len(),
        fps,
        if state.paused { " (paused)" } else { "" }
    )
}

/// Entry point of the interactive app. Expects the terminal to be set up already.
pub fn run(stdout: &mut Stdout, config: &Config) -> std::io::Result<()> {
    let (cols, rows) = config.grid_dimensions();
    let mut driver = Driver::new(
        Grid::new(cols, rows, seeded_rng(config.seed)),
        config.auto_reset,
    );
    let mut renderer = Renderer::new(stdout, terminal::size()?);
    let mut state = AppState {
        paused: false,
        frame_interval: config.frame_interval(),
    };

    renderer.draw_full(driver.grid(), &status_line(&driver, &state))?;
    tracing::info!("[app] started with {:?}", config);

    let mut next_tick = Instant::now() + state.frame_interval;
    loop {
        let timeout = next_tick.saturating_duration_since(Instant::now());
        if event::poll(timeout)? {
            let outcome = match event::read()? {
                event::Event::Key(key_event) => match user_action(key_event) {
                    Some(action) => apply_action(&mut driver, &mut state, action),
                    None => ActionOutcome::Ignored,
                },
                event::Event::Resize(width, height) => {
                    renderer.resize(width, height);
                    ActionOutcome::Redraw
                }
                _ => ActionOutcome::Ignored,
            };
            match outcome {
                ActionOutcome::Quit => {
                    tracing::debug!("[app] quit requested");
                    break;
                }
                ActionOutcome::Ignored => {}
                ActionOutcome::Redraw => {
                    renderer.draw_full(driver.grid(), &status_line(&driver, &state))?;
                }
                ActionOutcome::Replaced => {
                    renderer.clear_frontier();
                    renderer.draw_full(driver.grid(), &status_line(&driver, &state))?;
                }
            }
            continue;
        }

        next_tick = Instant::now() + state.frame_interval;
        if state.paused {
            continue;
        }
        match driver.tick() {
            Tick::Stepped(step) => {
                let status = status_line(&driver, &state);
                renderer.draw_step(driver.grid(), step, &status)?;
            }
            Tick::Reset => {
                renderer.clear_frontier();
                renderer.draw_full(driver.grid(), &status_line(&driver, &state))?;
            }
            Tick::ReadyToReset => {}
        }
    }

    tracing::info!(
        "[app] exiting after {} maze(s), current one at step {}",
        driver.generation(),
        driver.steps()
    );
    Ok(())
}

/// Summary of a headless profiling run.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileReport {
    pub generations: usize,
    pub total_steps: usize,
    pub min_steps: usize,
    pub max_steps: usize,
    pub elapsed: Duration,
}

/// Profiling mode: carve `generations` complete mazes without rendering anything.
///
/// # Panics
/// If a generation takes more than `2 * cols * rows` steps.
pub fn profile(cols: u16, rows: u16, generations: usize, seed: Option<u64>) -> ProfileReport {
    let mut driver = Driver::new(Grid::new(cols, rows, seeded_rng(seed)), false);
    let bound = 2 * driver.grid().len();
    let start = Instant::now();

    let mut report = ProfileReport {
        generations,
        total_steps: 0,
        min_steps: usize::MAX,
        max_steps: 0,
        elapsed: Duration::ZERO,
    };
    for generation in 0..generations {
        if generation > 0 {
            driver.reset();
        }
        let steps = driver.run_to_completion();
        assert!(
            steps <= bound,
            "Generation took {} steps, more than the bound of {}",
            steps,
            bound
        );
        report.total_steps += steps;
        report.min_steps = report.min_steps.min(steps);
        report.max_steps = report.max_steps.max(steps);
    }
    report.elapsed = start.elapsed();
    if generations == 0 {
        report.min_steps = 0;
    }

    tracing::info!("[profile] {:?}", report);
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> event::KeyEvent {
        event::KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_user_action_mapping() {
        let none = KeyModifiers::NONE;
        assert_eq!(user_action(press(KeyCode::Esc, none)), Some(UserAction::Quit));
        assert_eq!(user_action(press(KeyCode::Char('q'), none)), Some(UserAction::Quit));
        assert_eq!(
            user_action(press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(UserAction::Quit)
        );
        assert_eq!(user_action(press(KeyCode::Char('c'), none)), None);
        assert_eq!(user_action(press(KeyCode::Enter, none)), Some(UserAction::NewMaze));
        assert_eq!(user_action(press(KeyCode::Char('r'), none)), Some(UserAction::Reset));
        assert_eq!(
            user_action(press(KeyCode::Char(' '), none)),
            Some(UserAction::TogglePause)
        );
        assert_eq!(user_action(press(KeyCode::Up, none)), Some(UserAction::SpeedUp));
        assert_eq!(user_action(press(KeyCode::Down, none)), Some(UserAction::SlowDown));

        let mut release = press(KeyCode::Esc, none);
        release.kind = event::KeyEventKind::Release;
        assert_eq!(user_action(release), None);
    }

    fn carving_state() -> AppState {
        AppState {
            paused: false,
            frame_interval: Duration::from_millis(20),
        }
    }

    #[test]
    fn test_status_line() {
        let mut driver = Driver::new(Grid::new(2, 2, seeded_rng(Some(0))), false);
        let mut state = carving_state();
        state.paused = true;
        let carving = status_line(&driver, &state);
        assert!(carving.starts_with("Maze 1 | step 0 | visited 1/4 | 50 fps (paused)"));

        driver.run_to_completion();
        let finished = status_line(&driver, &state);
        assert!(finished.starts_with("Maze 1 complete in 7 steps."));
        assert!(finished.contains("Enter: start new maze"));
    }

    #[test]
    fn test_new_maze_ignored_while_carving() {
        let mut driver = Driver::new(Grid::new(4, 4, seeded_rng(Some(1))), false);
        let mut state = carving_state();
        for _ in 0..5 {
            driver.tick();
        }
        let cells = driver.grid().cells().to_vec();
        let outcome = apply_action(&mut driver, &mut state, UserAction::NewMaze);
        assert_eq!(outcome, ActionOutcome::Ignored);
        assert_eq!(driver.generation(), 1);
        assert_eq!(driver.steps(), 5);
        assert_eq!(driver.grid().cells(), &cells[..]);
    }

    #[test]
    fn test_new_maze_after_finish_resets() {
        let mut driver = Driver::new(Grid::new(3, 3, seeded_rng(Some(2))), false);
        let mut state = carving_state();
        driver.run_to_completion();
        let outcome = apply_action(&mut driver, &mut state, UserAction::NewMaze);
        assert_eq!(outcome, ActionOutcome::Replaced);
        assert_eq!(driver.generation(), 2);
        assert_eq!(driver.steps(), 0);
        assert!(!driver.is_finished());
        assert_eq!(driver.grid().path(), &[0]);
    }

    #[test]
    fn test_reset_mid_carve() {
        let mut driver = Driver::new(Grid::new(4, 3, seeded_rng(Some(3))), false);
        let mut state = carving_state();
        for _ in 0..4 {
            driver.tick();
        }
        let outcome = apply_action(&mut driver, &mut state, UserAction::Reset);
        assert_eq!(outcome, ActionOutcome::Replaced);
        assert_eq!(driver.generation(), 2);
        assert_eq!(driver.steps(), 0);
        assert_eq!(driver.grid().visited_count(), 1);
    }

    #[test]
    fn test_pause_and_quit() {
        let mut driver = Driver::new(Grid::new(2, 2, seeded_rng(Some(0))), false);
        let mut state = carving_state();
        let outcome = apply_action(&mut driver, &mut state, UserAction::TogglePause);
        assert_eq!(outcome, ActionOutcome::Redraw);
        assert!(state.paused);
        apply_action(&mut driver, &mut state, UserAction::TogglePause);
        assert!(!state.paused);
        let outcome = apply_action(&mut driver, &mut state, UserAction::Quit);
        assert_eq!(outcome, ActionOutcome::Quit);
        assert_eq!(driver.steps(), 0);
    }

    #[test]
    fn test_speed_changes_stay_in_bounds() {
        let mut driver = Driver::new(Grid::new(2, 2, seeded_rng(Some(0))), false);
        for fps in ["1", "60", "1000"] {
            let config = Config::from_args(["maze-carver", "--fps", fps]).unwrap();
            let mut state = AppState {
                paused: false,
                frame_interval: config.frame_interval(),
            };
            for _ in 0..12 {
                let before = state.frame_interval;
                apply_action(&mut driver, &mut state, UserAction::SpeedUp);
                assert!(state.frame_interval <= before, "speeding up slowed down");
                assert!(state.frame_interval >= Config::MIN_FRAME_INTERVAL);
            }
            assert_eq!(state.frame_interval, Config::MIN_FRAME_INTERVAL);
            for _ in 0..12 {
                let before = state.frame_interval;
                apply_action(&mut driver, &mut state, UserAction::SlowDown);
                assert!(state.frame_interval >= before, "slowing down sped up");
                assert!(state.frame_interval <= Config::MAX_FRAME_INTERVAL);
            }
            assert_eq!(state.frame_interval, Config::MAX_FRAME_INTERVAL);
        }
    }

    #[test]
    fn test_profile_respects_bound() {
        let report = profile(8, 5, 10, Some(3));
        assert_eq!(report.generations, 10);
        assert_eq!(report.min_steps, 79);
        assert_eq!(report.max_steps, 79);
        assert_eq!(report.total_steps, 790);
    }

    #[test]
    fn test_profile_without_generations() {
        let report = profile(3, 3, 0, Some(0));
        assert_eq!(report.total_steps, 0);
        assert_eq!(report.min_steps, 0);
        assert_eq!(report.max_steps, 0);
    }
}
