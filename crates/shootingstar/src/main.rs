mod logging;

use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::{Color, Stylize},
    text::Line,
};
use shootingstar_config::Config;
use shootingstar_engine::{Launcher, TerminalSurface};
use tracing::{info, warn};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    logging::init()?;
    let config = Config::load()?;
    let terminal = ratatui::init();
    let result = terminal
        .size()
        .map_err(Into::into)
        .and_then(|size| App::new(config, size.width, size.height))
        .and_then(|app| app.run(terminal));
    ratatui::restore();
    result
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// Quit requested, waiting for stars in flight to finish.
    stopping: bool,
    /// Loaded configuration, saved back on demand.
    config: Config,
    /// Where the stars are drawn.
    surface: TerminalSurface,
    /// Launch loop driving every star.
    launcher: Launcher,
    /// Frame clock origin.
    started: Instant,
    /// Last status message shown in the help line.
    status: Option<String>,
}

impl App {
    /// Construct a new instance of [`App`] for a terminal of the given size.
    pub fn new(config: Config, columns: u16, rows: u16) -> color_eyre::Result<Self> {
        let surface = TerminalSurface::new(
            columns,
            rows,
            config.terminal.cell_width,
            config.terminal.cell_height,
        );
        let launcher = Launcher::new(config.launch, &surface)?;
        Ok(Self {
            running: false,
            stopping: false,
            config,
            surface,
            launcher,
            started: Instant::now(),
            status: None,
        })
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        self.launcher.activate(self.now());
        while self.running {
            self.launcher.tick(self.now(), &mut self.surface)?;
            self.surface.collect_garbage();
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events()?;
            if self.stopping && self.launcher.is_idle() {
                self.running = false;
            }
        }
        info!(launched = self.launcher.launched(), "exiting");
        Ok(())
    }

    /// Time on the frame clock.
    fn now(&self) -> Duration {
        self.started.elapsed()
    }

    /// Renders the user interface.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(&self.surface, area);

        let chunks = Layout::vertical([
            Constraint::Fill(1),   // Sky
            Constraint::Length(1), // Help text
        ])
        .split(area);

        let mut help = vec![
            "q".bold().fg(Color::White),
            if self.stopping {
                " quit now  ".dark_gray()
            } else {
                " quit  ".dark_gray()
            },
            "space".bold().fg(Color::White),
            " launch  ".dark_gray(),
            "s".bold().fg(Color::White),
            " save config".dark_gray(),
        ];
        if let Some(status) = &self.status {
            help.push("  ".into());
            help.push(status.clone().yellow());
        }
        frame.render_widget(Line::from(help).centered(), chunks[1]);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Polls with the frame interval as timeout so stars keep moving.
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        let timeout = Duration::from_millis(self.config.terminal.frame_interval_ms);
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key)?,
                Event::Resize(columns, rows) => self.surface.resize(columns, rows),
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) -> color_eyre::Result<()> {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char(' ')) => self.launch_star()?,
            (_, KeyCode::Char('s')) => self.save_config(),
            _ => {}
        }
        Ok(())
    }

    /// Launch an extra star right away.
    fn launch_star(&mut self) -> color_eyre::Result<()> {
        if !self.stopping {
            self.launcher.launch_now()?;
        }
        Ok(())
    }

    /// Write the current configuration file.
    fn save_config(&mut self) {
        self.status = Some(match self.config.save() {
            Ok(path) => {
                info!(path = %path.display(), "configuration saved");
                format!("saved {}", path.display())
            }
            Err(e) => {
                warn!("failed to save configuration: {e}");
                format!("save failed: {e}")
            }
        });
    }

    /// First request lets the stars in flight finish, the second one quits at once.
    fn quit(&mut self) {
        if self.stopping {
            self.running = false;
        } else {
            self.stopping = true;
            self.launcher.stop();
        }
    }
}
