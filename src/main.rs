use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use loancalc::{app::App, config::Settings, ui::ui};
use log::info;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use simple_logger::SimpleLogger;
use std::io;

fn main() -> Result<()> {
    // silent unless RUST_LOG is set; stderr should be redirected while the UI runs
    SimpleLogger::new()
        .with_level(log::LevelFilter::Off)
        .env()
        .init()
        .context("initialising logger")?;

    let settings = Settings::load()?;
    info!("starting with term limit {} months", settings.max_term_months);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new(&settings);
    let res = run_app(&mut terminal, app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err)
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, &mut app))?;

        if let Event::Key(key) = event::read()? {
            if app.handle_key(key) {
                info!("quit requested");
                return Ok(());
            }
        }
    }
}
