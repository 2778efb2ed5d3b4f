//! Interactive terminal dashboard
//!
//! The event loop owns the [`Shell`]. Page loads run on spawned tasks and
//! report back over a channel; the loop hands each outcome to
//! [`Dashboard::apply`](crate::app::Dashboard::apply), which drops anything
//! but the latest generation.

use std::io::Stdout;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::app::{
    Dashboard, EnrichmentPipeline, LoadOutcome, LoadRequest, LoadStatus, Shell, SortColumn,
};
use crate::cli::commands::{build_pipeline, export_dashboard};
use crate::config::AppConfig;
use crate::errors::Result;

/// Which login field has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum LoginField {
    #[default]
    Username,
    Password,
}

/// Login form contents
#[derive(Debug, Default)]
struct LoginForm {
    username: String,
    password: String,
    focus: LoginField,
}

impl LoginForm {
    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }
}

/// Application state for the terminal UI
struct TuiApp {
    shell: Shell,
    pipeline: EnrichmentPipeline,
    export_file: PathBuf,
    login: LoginForm,
    /// Search text being edited; `None` when not editing
    search_input: Option<String>,
    /// Blocking notice; swallows all keys except dismiss
    modal: Option<String>,
    /// Transient status message (export results)
    message: Option<String>,
    running: bool,
    load_tx: mpsc::UnboundedSender<LoadOutcome>,
}

impl TuiApp {
    fn new(config: &AppConfig, load_tx: mpsc::UnboundedSender<LoadOutcome>) -> Result<Self> {
        Ok(Self {
            shell: Shell::new(config.dashboard_defaults()),
            pipeline: build_pipeline(config)?,
            export_file: config.dashboard.export_file.clone(),
            login: LoginForm::default(),
            search_input: None,
            modal: None,
            message: None,
            running: true,
            load_tx,
        })
    }

    /// Run a load request in the background
    fn spawn_load(&self, request: LoadRequest) {
        let pipeline = self.pipeline.clone();
        let tx = self.load_tx.clone();
        tokio::spawn(async move {
            let outcome = request.run(&pipeline).await;
            // The receiver is gone only when the UI has exited
            let _ = tx.send(outcome);
        });
    }

    fn apply_outcome(&mut self, outcome: LoadOutcome) {
        match self.shell.dashboard_mut() {
            Ok(dashboard) => {
                dashboard.apply_outcome(outcome);
            }
            Err(_) => debug!("Dropping load generation {} after logout", outcome.generation),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.running = false;
            return;
        }

        if self.modal.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.modal = self.shell.take_notice();
            }
            return;
        }

        if self.shell.dashboard().is_ok() {
            self.handle_dashboard_key(key);
        } else {
            self.handle_login_key(key);
        }
    }

    fn handle_login_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.running = false,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.login.toggle_focus()
            }
            KeyCode::Backspace => {
                self.login.focused_mut().pop();
            }
            KeyCode::Enter => self.submit_login(),
            KeyCode::Char(c) => self.login.focused_mut().push(c),
            _ => {}
        }
    }

    fn submit_login(&mut self) {
        let request = self.shell.login(&self.login.username, &self.login.password);
        self.login.password.clear();

        match request {
            Some(request) => {
                self.login = LoginForm::default();
                self.message = None;
                self.spawn_load(request);
            }
            None => {
                self.modal = self.shell.take_notice();
                self.login.focus = LoginField::Password;
            }
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        if let Some(input) = self.search_input.as_mut() {
            match key.code {
                KeyCode::Esc => self.search_input = None,
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Enter => {
                    let query = input.trim().to_string();
                    self.search_input = None;
                    self.with_request(|dashboard| Some(dashboard.set_query(query)));
                }
                KeyCode::Char(c) => input.push(c),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('/') => {
                let current = self
                    .shell
                    .dashboard()
                    .map(|d| d.view().query.clone())
                    .unwrap_or_default();
                self.search_input = Some(current);
            }
            KeyCode::Right | KeyCode::Char('n') => {
                self.with_request(|dashboard| Some(dashboard.next_page()))
            }
            KeyCode::Left | KeyCode::Char('p') => {
                self.with_request(|dashboard| dashboard.previous_page())
            }
            KeyCode::Char('s') => self.with_request(|dashboard| {
                let next = dashboard.view().page_size.next();
                Some(dashboard.set_page_size(next))
            }),
            KeyCode::Char('r') => self.with_request(|dashboard| Some(dashboard.reload())),
            KeyCode::Char(c @ '1'..='7') => {
                let index = c as usize - '1' as usize;
                if let Ok(dashboard) = self.shell.dashboard_mut() {
                    dashboard.request_sort(SortColumn::ALL[index]);
                }
            }
            KeyCode::Char('e') => self.export(),
            KeyCode::Char('l') => {
                self.shell.logout();
                self.search_input = None;
                self.message = None;
            }
            _ => {}
        }
    }

    /// Apply a view change and start the load it asks for
    fn with_request(&mut self, change: impl FnOnce(&mut Dashboard) -> Option<LoadRequest>) {
        let request = match self.shell.dashboard_mut() {
            Ok(dashboard) => change(dashboard),
            Err(_) => None,
        };
        if let Some(request) = request {
            self.message = None;
            self.spawn_load(request);
        }
    }

    fn export(&mut self) {
        let Ok(dashboard) = self.shell.dashboard() else {
            return;
        };

        self.message = Some(match export_dashboard(dashboard, &self.export_file) {
            Ok(()) => format!(
                "Exported {} rows to {}",
                dashboard.export_rows().len(),
                self.export_file.display()
            ),
            Err(e) => format!("Export failed: {}", e),
        });
    }
}

/// Handle the interactive dashboard command
pub async fn handle_tui(config: AppConfig) -> Result<()> {
    let (load_tx, load_rx) = mpsc::unbounded_channel();
    let app = TuiApp::new(&config, load_tx)?;

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    info!("Interactive dashboard started");
    let result = run_event_loop(&mut terminal, app, load_rx).await;

    // Restore the terminal whatever happened
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    info!("Interactive dashboard closed");

    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    mut app: TuiApp,
    mut load_rx: mpsc::UnboundedReceiver<LoadOutcome>,
) -> Result<()> {
    while app.running {
        while let Ok(outcome) = load_rx.try_recv() {
            app.apply_outcome(outcome);
        }

        terminal.draw(|f| render(f, &app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        // Let spawned loads make progress between frames
        tokio::task::yield_now().await;
    }
    Ok(())
}

fn render(f: &mut Frame, app: &TuiApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(f.size());

    let title = Paragraph::new("Open Library Book Dashboard")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    match app.shell.dashboard() {
        Ok(dashboard) => render_dashboard(f, app, dashboard, chunks[1]),
        Err(_) => render_login(f, app, chunks[1]),
    }

    if let Some(notice) = &app.modal {
        render_modal(f, notice, f.size());
    }
}

fn render_login(f: &mut Frame, app: &TuiApp, area: Rect) {
    let form_area = centered_rect(50, 11, area);
    let field_style = |field: LoginField| {
        if app.login.focus == field {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        }
    };

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("Username: ", field_style(LoginField::Username)),
            Span::raw(app.login.username.as_str()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Password: ", field_style(LoginField::Password)),
            Span::raw("*".repeat(app.login.password.chars().count())),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Tab switch field · Enter log in · Esc quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let form = Paragraph::new(lines).block(
        Block::default()
            .title("Login to Dashboard")
            .borders(Borders::ALL),
    );
    f.render_widget(Clear, form_area);
    f.render_widget(form, form_area);
}

fn render_dashboard(f: &mut Frame, app: &TuiApp, dashboard: &Dashboard, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search
            Constraint::Min(0),    // Table
            Constraint::Length(3), // Status
        ])
        .split(area);

    // Search bar
    let (search_text, search_style) = match &app.search_input {
        Some(input) => (format!("{}▏", input), Style::default().fg(Color::Yellow)),
        None => (dashboard.view().query.clone(), Style::default()),
    };
    let search = Paragraph::new(search_text).style(search_style).block(
        Block::default()
            .title("Search (/ to edit)")
            .borders(Borders::ALL),
    );
    f.render_widget(search, chunks[0]);

    // Result table
    let view = dashboard.view();
    let header = Row::new(SortColumn::ALL.iter().enumerate().map(|(i, column)| {
        let mut label = format!("{} {}", i + 1, column.label());
        if *column == view.sort_column {
            label = format!("{} {}", label, view.sort_direction.arrow());
        }
        Cell::from(label)
    }))
    .style(Style::default().add_modifier(Modifier::BOLD));

    let rows = dashboard.displayed_rows().map(|book| {
        Row::new(
            SortColumn::ALL
                .iter()
                .map(|column| Cell::from(column.cell(book))),
        )
    });

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(22),
            Constraint::Percentage(15),
            Constraint::Percentage(7),
            Constraint::Percentage(20),
            Constraint::Percentage(7),
            Constraint::Percentage(12),
            Constraint::Percentage(17),
        ],
    )
    .header(header)
    .block(Block::default().title("Books").borders(Borders::ALL));
    f.render_widget(table, chunks[1]);

    // Status line
    let (status_text, status_color) = match dashboard.status() {
        LoadStatus::Idle => ("Idle".to_string(), Color::Gray),
        LoadStatus::Loading { .. } => ("Loading...".to_string(), Color::Yellow),
        LoadStatus::Loaded { at, rows } => (
            format!("Loaded {} rows at {}", rows, at.format("%H:%M:%S")),
            Color::Green,
        ),
        LoadStatus::Failed { message } => (format!("Error: {}", message), Color::Red),
    };

    let mut spans = vec![
        Span::styled(status_text, Style::default().fg(status_color)),
        Span::raw(format!(
            "  │  {}  │  {} per page",
            dashboard.range_label(),
            view.page_size
        )),
    ];
    if let Some(message) = &app.message {
        spans.push(Span::styled(
            format!("  │  {}", message),
            Style::default().fg(Color::Cyan),
        ));
    }

    let status = Paragraph::new(vec![
        Line::from(spans),
        Line::from(Span::styled(
            "←/→ page · s page size · 1-7 sort · e export · r reload · l logout · q quit",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .block(Block::default().borders(Borders::TOP));
    f.render_widget(status, chunks[2]);
}

fn render_modal(f: &mut Frame, notice: &str, area: Rect) {
    let popup = centered_rect(40, 7, area);
    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(notice.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter to continue",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title("Notice")
            .borders(Borders::ALL)
            .style(Style::default().fg(Color::Red)),
    );

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

/// A `width`% wide, `height`-row tall rectangle centred in `area`
fn centered_rect(width_percent: u16, height: u16, area: Rect) -> Rect {
    let width = (u32::from(area.width) * u32::from(width_percent.min(100)) / 100) as u16;
    let height = height.min(area.height);

    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
