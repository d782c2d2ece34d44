use std::io;
use std::io::Stdout;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossterm::cursor::Show;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use mdlive::app::App;
use mdlive::cli::CliArgs;
use mdlive::config::AppConfig;
use mdlive::print::BrowserPrintHost;
use mdlive::sample::SAMPLE_DOCUMENT;
use mdlive_core::crossterm_input::input_event_from_crossterm;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    mdlive::logging::init();

    let config = AppConfig::load(args.config.as_deref())?.with_overrides(&args);
    let initial = if args.empty { "" } else { SAMPLE_DOCUMENT };
    let printer = BrowserPrintHost::new(config.print_dir());
    tracing::info!(
        frame = %config.frame_size,
        gfm = config.extensions.gfm,
        raw_html = config.extensions.raw_html,
        print_dir = %printer.dir().display(),
        "starting"
    );
    let mut app = App::new(&config, initial, Box::new(printer));

    enable_raw_mode().context("enabling raw mode")?;
    let res = crossterm::execute!(
        io::stdout(),
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )
    .context("entering the alternate screen")
    .and_then(|()| {
        Terminal::new(CrosstermBackend::new(io::stdout())).context("creating the terminal")
    })
    .and_then(|mut terminal| run(&mut terminal, &mut app));

    let restored = restore();
    tracing::info!("exiting");
    res.and(restored)
}

fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> anyhow::Result<()> {
    while !app.should_quit() {
        terminal.draw(|f| {
            if let Some((x, y)) = app.draw(f) {
                f.set_cursor_position((x, y));
            }
        })?;

        if !crossterm::event::poll(Duration::from_millis(50))? {
            continue;
        }
        if let Some(event) = input_event_from_crossterm(crossterm::event::read()?) {
            app.handle_event(event);
        }
    }
    Ok(())
}

fn restore() -> anyhow::Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(
        io::stdout(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen,
        Show
    )?;
    Ok(())
}
