/// Entry point and event loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand_pcg::Pcg32;

use config::GameConfig;
use sim::session::Session;
use sim::step::{self, Action};
use ui::hud::Hud;
use ui::input::{self, Command, InputEvent, InputState};
use ui::renderer::Renderer;

fn main() {
    let config = GameConfig::load();
    init_logging(&config);

    for w in &config.warnings {
        log::warn!("{w}");
        if config.general.log_file.is_none() {
            eprintln!("Warning: {w}");
        }
    }

    let seed = config.general.seed.unwrap_or_else(rand::random);
    log::info!("starting, seed={seed}");
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut session = Session::new(config.controls.range, &mut rng);

    let mut renderer = Renderer::new(config.display.extent);

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(&mut session, &mut rng, &mut renderer, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        log::error!("game error: {e}");
        eprintln!("Game error: {e}");
    }

    log::info!("finished at level {} with score {}", session.level(), session.score());
    println!();
    println!("Thanks for playing Vector Space Adventure!");
    println!("Reached Level {}  Final Score: {}", session.level(), session.score());
}

/// Install the file logger if one is configured. The UI owns the terminal,
/// so without a log file the `log` macros stay silent.
fn init_logging(config: &GameConfig) {
    let Some(path) = &config.general.log_file else { return };
    match std::fs::OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        Err(e) => eprintln!("Warning: could not open log file {}: {e}", path.display()),
    }
}

fn game_loop(
    session: &mut Session,
    rng: &mut Pcg32,
    renderer: &mut Renderer,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut hud = Hud::new(config.display.banner_ticks);
    let tick_rate = Duration::from_millis(config.display.tick_rate_ms);
    let mut last_tick = Instant::now();

    renderer.render(session, &hud)?;

    loop {
        kb.wait_events(tick_rate.saturating_sub(last_tick.elapsed()))?;

        for event in kb.events.drain(..) {
            let command = match event {
                InputEvent::Key(key) => input::map_key(&key, config.controls.coarse_steps),
                InputEvent::Pointer { col, row } => pointer_command(session, renderer, col, row),
                InputEvent::Resize => None,
            };
            match command {
                Some(Command::Quit) => return Ok(()),
                Some(Command::Act(action)) => {
                    let events = step::apply(session, action, rng);
                    hud.absorb(&events);
                }
                None => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            hud.tick();
            last_tick = Instant::now();
        }

        renderer.render(session, &hud)?;
    }
}

/// Click or drag on a slider gauge sets that coefficient directly.
fn pointer_command(session: &Session, renderer: &Renderer, col: u16, row: u16) -> Option<Command> {
    let (slot, fraction) = renderer.gauge_hit(col, row)?;
    let range = session.range();
    let value = range.snap(range.min + fraction * (range.max - range.min));
    let current = session.coefficients();
    if value == current.get(slot) {
        return None;
    }
    Some(Command::Act(Action::SetCoefficients(current.with(slot, value))))
}
