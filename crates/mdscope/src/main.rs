use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;
use std::time::Instant;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use mdscope_core::crossterm_input::input_event;
use mdscope_core::theme::ThemeMode;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use mdscope::app::App;
use mdscope::app::AppOptions;
use mdscope::clipboard::Osc52Clipboard;
use mdscope::logging;
use mdscope::storage::JsonFileStorage;
use mdscope::ui;

const TICK: Duration = Duration::from_millis(50);

/// Terminal markdown viewer/editor with outline navigation.
#[derive(Debug, Parser)]
#[command(name = "mdscope", version)]
struct Cli {
    /// Markdown file to open (.md, .markdown or .txt).
    file: Option<PathBuf>,

    /// Directory for persisted state (recent files, theme, logs).
    #[arg(long)]
    state_dir: Option<PathBuf>,

    /// Start with this theme instead of the persisted preference.
    #[arg(long, value_parser = parse_theme)]
    theme: Option<ThemeMode>,

    /// Disable syntax highlighting in code blocks.
    #[arg(long)]
    no_highlight: bool,
}

fn parse_theme(s: &str) -> Result<ThemeMode, String> {
    ThemeMode::parse(s).ok_or_else(|| format!("unknown theme {s:?} (expected dark or light)"))
}

fn state_dir(cli: &Cli) -> PathBuf {
    cli.state_dir.clone().unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("mdscope")
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let state_dir = state_dir(&cli);
    let _logging = logging::init(&state_dir);

    let storage = Rc::new(JsonFileStorage::new(state_dir.join("state.json")));
    let mut app = App::new(
        storage,
        Box::new(Osc52Clipboard::detect()),
        AppOptions {
            highlight: !cli.no_highlight,
            theme_override: cli.theme,
        },
    );
    if let Some(path) = &cli.file {
        app.open_initial(path, Instant::now());
    }

    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("entering alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("creating terminal")?;

    let result = run(&mut terminal, &mut app);

    disable_raw_mode().ok();
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture).ok();
    terminal.show_cursor().ok();

    result
}

fn run<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        // Layout (and therefore the anchor set) is only known after a draw;
        // sync the outline and active-section tracker against it now.
        if app.sync_navigation() {
            continue;
        }

        if crossterm::event::poll(TICK)? {
            let ev = crossterm::event::read()?;
            if let Some(event) = input_event(ev) {
                app.handle_input(event, Instant::now());
            }
        }

        app.tick(Instant::now());

        if app.should_quit {
            return Ok(());
        }
    }
}
