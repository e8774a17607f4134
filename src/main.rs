mod app;
mod ui;

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tui_globe::config::GlobeConfig;
use tui_globe::data;
use tui_globe::map::ProjectionKind;

#[derive(Parser, Debug)]
#[command(author, version, about = "Terminal globe with switchable map projections")]
struct Cli {
    /// JSON config file; defaults apply when it does not exist
    #[arg(long, default_value = "tui-globe.json")]
    config: PathBuf,

    /// Initial projection (spherical, equirect, mercator, conic)
    #[arg(long)]
    projection: Option<ProjectionKind>,

    /// Write logs to this file (the terminal belongs to the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Directory holding Natural Earth GeoJSON files
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn init_logging(config: &GlobeConfig) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = GlobeConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    if let Some(projection) = cli.projection {
        config.projection = projection;
    }
    if let Some(log_file) = cli.log_file {
        config.log_file = Some(log_file);
    }
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    init_logging(&config)?;
    info!(projection = %config.projection, "starting");

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    // Enable mouse capture
    execute!(std::io::stdout(), EnableMouseCapture)?;

    // Run the app
    let result = run(&mut terminal, config);

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Handle mouse events for rotating and zooming
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    // Always track mouse position for cursor marker
    app.set_mouse_pos(mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::ScrollUp => app.zoom_in(),
        MouseEventKind::ScrollDown => app.zoom_out(),
        // Horizontal scroll (trackpad two-finger swipe)
        MouseEventKind::ScrollLeft => app.pan(-1, 0),
        MouseEventKind::ScrollRight => app.pan(1, 0),
        MouseEventKind::Down(MouseButton::Left) => {
            app.last_mouse = Some((mouse.column, mouse.row));
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            app.handle_drag(mouse.column, mouse.row);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            app.end_drag();
        }
        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal, config: GlobeConfig) -> Result<()> {
    let size = terminal.size()?;
    let data_dir = config.data_dir.clone();
    let mut app = App::new(config, size.width as usize, size.height as usize);

    if data_dir.exists() {
        data::load_all_geojson(&mut app.map_renderer, &data_dir)?;
    }

    // Fall back to simple world if no data loaded
    if !app.map_renderer.has_data() {
        info!("no GeoJSON data found, using built-in outlines");
        data::generate_simple_world(&mut app.map_renderer);
    }

    loop {
        terminal.draw(|frame| ui::render(frame, &mut app))?;

        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events (not release)
                    if key.kind == KeyEventKind::Press {
                        match key.code {
                            KeyCode::Char('q') | KeyCode::Esc => app.quit(),

                            // Rotate with hjkl or arrow keys
                            KeyCode::Left | KeyCode::Char('h') => app.pan(-1, 0),
                            KeyCode::Right | KeyCode::Char('l') => app.pan(1, 0),
                            KeyCode::Up | KeyCode::Char('k') => app.pan(0, 1),
                            KeyCode::Down | KeyCode::Char('j') => app.pan(0, -1),

                            // Zoom
                            KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
                            KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

                            KeyCode::Char('p') | KeyCode::Char('P') => app.cycle_projection(),
                            KeyCode::Char('g') | KeyCode::Char('G') => app.toggle_grid(),
                            KeyCode::Char('o') | KeyCode::Char('O') => app.toggle_shape(),
                            KeyCode::Char('t') | KeyCode::Char('T') => app.toggle_tropics(),
                            KeyCode::Char('w') | KeyCode::Char('W') => app.toggle_repeat(),

                            KeyCode::Char('r') | KeyCode::Char('0') => app.reset(),

                            _ => {}
                        }
                    }
                }
                Event::Mouse(mouse) => {
                    handle_mouse(&mut app, mouse);
                }
                Event::Resize(width, height) => {
                    app.resize(width as usize, height as usize);
                }
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
