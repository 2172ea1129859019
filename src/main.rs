use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use nexus_terminal::feed;
use nexus_terminal::notes;
use nexus_terminal::quick_ask::QuickAskOutcome;
use nexus_terminal::search::{self, SearchEngine};
use nexus_terminal::settings::{SettingsPatch, SettingsStore};
use nexus_terminal::spotify::NowPlaying;
use nexus_terminal::sports::MatchPhase;
use nexus_terminal::state::{
    apply_delta, AppState, Delta, Focus, FocusPhase, ProviderCommand, Screen,
};
use nexus_terminal::wallpaper;
use nexus_terminal::weather::describe_weather_code;

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: mpsc::Sender<ProviderCommand>,
    settings: Arc<SettingsStore>,
    started_at: Instant,
    notes_path: Option<PathBuf>,
}

const SETTINGS_ROW_COUNT: usize = 13;

const SETTINGS_ROW_LABELS: [&str; SETTINGS_ROW_COUNT] = [
    "User name",
    "Gemini API key",
    "Spotify client id",
    "Focus minutes",
    "Show weather",
    "Show crypto",
    "Show sports",
    "Show notes",
    "Show focus timer",
    "Wallpaper grayscale",
    "Wallpaper rotation hours",
    "Reset custom links",
    "Reset custom wallpapers",
];

impl App {
    fn new(cmd_tx: mpsc::Sender<ProviderCommand>, settings: Arc<SettingsStore>) -> Self {
        let notes_path = notes::notes_path();
        let mut state = AppState::new();
        if let Some(path) = notes_path.as_ref() {
            state.note = notes::load_note(path);
        }
        Self {
            state,
            should_quit: false,
            cmd_tx,
            settings,
            started_at: Instant::now(),
            notes_path,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('q') | KeyCode::Char('c') => {
                    self.should_quit = true;
                    return;
                }
                KeyCode::Char('k') => {
                    self.state.screen = Screen::Palette;
                    self.state.palette_input.clear();
                    self.state.palette_selected = 0;
                    return;
                }
                KeyCode::Char('s') => {
                    self.state.screen = Screen::Settings;
                    self.state.settings_selected = 0;
                    self.state.settings_edit = None;
                    return;
                }
                KeyCode::Char('r') => {
                    self.refresh_all();
                    return;
                }
                KeyCode::Char('t') => {
                    self.state.focus_timer.toggle();
                    return;
                }
                KeyCode::Char('y') => {
                    self.state.focus_timer.reset();
                    return;
                }
                _ => {}
            }
        }

        match self.state.screen {
            Screen::Dashboard => self.on_dashboard_key(key),
            Screen::Palette => self.on_palette_key(key),
            Screen::Settings => self.on_settings_key(key),
        }
    }

    fn refresh_all(&mut self) {
        for cmd in [
            ProviderCommand::RefreshWeather,
            ProviderCommand::RefreshCoins,
            ProviderCommand::RefreshScores,
            ProviderCommand::RefreshNowPlaying,
            ProviderCommand::RefreshQuote,
        ] {
            let _ = self.cmd_tx.send(cmd);
        }
        self.state.push_log("[INFO] Refreshing all widgets");
    }

    fn on_dashboard_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => {
                self.state.focus = match self.state.focus {
                    Focus::Search => Focus::Links,
                    Focus::Links => Focus::Notes,
                    Focus::Notes => Focus::Search,
                };
                return;
            }
            KeyCode::BackTab => {
                self.state.focus = match self.state.focus {
                    Focus::Search => Focus::Notes,
                    Focus::Links => Focus::Search,
                    Focus::Notes => Focus::Links,
                };
                return;
            }
            KeyCode::Esc => {
                if self.state.quick_answer.is_some() || self.state.quick_ask_pending {
                    self.state.quick_answer = None;
                    self.state.quick_ask_pending = false;
                } else {
                    self.state.search_input.clear();
                }
                return;
            }
            _ => {}
        }

        match self.state.focus {
            Focus::Search => self.on_search_key(key),
            Focus::Links => self.on_links_key(key),
            Focus::Notes => self.on_notes_key(key),
        }
    }

    fn on_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.state.search_engine = self.state.search_engine.prev(),
            KeyCode::Down => self.state.search_engine = self.state.search_engine.next(),
            KeyCode::Backspace => {
                self.state.search_input.pop();
            }
            KeyCode::Enter => self.dispatch_search(),
            KeyCode::Char(c) => self.state.search_input.push(c),
            _ => {}
        }
    }

    fn dispatch_search(&mut self) {
        let query = self.state.search_input.trim().to_string();
        if query.is_empty() {
            return;
        }
        let engine = self.state.search_engine;
        if engine.answers_inline() {
            self.state.quick_answer = None;
            self.state.quick_ask_pending = true;
            if self
                .cmd_tx
                .send(ProviderCommand::QuickAsk { prompt: query })
                .is_err()
            {
                self.state.quick_ask_pending = false;
                self.state.push_log("[WARN] Quick ask unavailable");
            }
            return;
        }
        let Some(url) = search::search_url(engine, &query) else {
            return;
        };
        match search::open_in_browser(&url) {
            Ok(()) => self
                .state
                .push_log(format!("[INFO] Opened {}", engine.label())),
            Err(err) => self.state.push_log(format!("[WARN] Browser error: {err:#}")),
        }
    }

    fn on_links_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next_link(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev_link(),
            KeyCode::Enter => {
                let Some(link) = self.state.selected_link() else {
                    return;
                };
                let label = link.label.clone();
                let url = link.url.clone();
                match search::open_in_browser(&url) {
                    Ok(()) => self.state.push_log(format!("[INFO] Opened {label}")),
                    Err(err) => self.state.push_log(format!("[WARN] Browser error: {err:#}")),
                }
            }
            _ => {}
        }
    }

    fn on_notes_key(&mut self, key: KeyEvent) {
        let mut changed = true;
        match key.code {
            KeyCode::Char(c) => self.state.note.push(c),
            KeyCode::Enter => self.state.note.push('\n'),
            KeyCode::Backspace => {
                self.state.note.pop();
            }
            _ => changed = false,
        }
        if changed {
            if let Some(path) = self.notes_path.as_ref() {
                notes::save_note(path, &self.state.note);
            }
        }
    }

    fn on_palette_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.state.screen = Screen::Dashboard,
            KeyCode::Up => {
                self.state.palette_selected = self.state.palette_selected.saturating_sub(1);
            }
            KeyCode::Down => {
                let count = self.palette_actions().len();
                if count > 0 {
                    self.state.palette_selected =
                        (self.state.palette_selected + 1).min(count - 1);
                }
            }
            KeyCode::Backspace => {
                self.state.palette_input.pop();
                self.state.palette_selected = 0;
            }
            KeyCode::Enter => {
                let actions = self.palette_actions();
                if let Some(action) = actions.get(self.state.palette_selected).copied() {
                    self.run_palette_action(action);
                }
            }
            KeyCode::Char(c) => {
                self.state.palette_input.push(c);
                self.state.palette_selected = 0;
            }
            _ => {}
        }
    }

    fn palette_actions(&self) -> Vec<PaletteAction> {
        let all = [
            PaletteAction::SearchGoogle,
            PaletteAction::OpenSettings,
            PaletteAction::RefreshWidgets,
            PaletteAction::Quit,
        ];
        let filter = self.state.palette_input.to_lowercase();
        all.into_iter()
            .filter(|action| {
                filter.is_empty() || action.label().to_lowercase().contains(&filter)
            })
            .collect()
    }

    fn run_palette_action(&mut self, action: PaletteAction) {
        match action {
            PaletteAction::SearchGoogle => {
                let query = self.state.palette_input.trim().to_string();
                if !query.is_empty() {
                    if let Some(url) = search::search_url(SearchEngine::Google, &query) {
                        if let Err(err) = search::open_in_browser(&url) {
                            self.state.push_log(format!("[WARN] Browser error: {err:#}"));
                        }
                    }
                }
                self.state.screen = Screen::Dashboard;
            }
            PaletteAction::OpenSettings => {
                self.state.screen = Screen::Settings;
                self.state.settings_selected = 0;
                self.state.settings_edit = None;
            }
            PaletteAction::RefreshWidgets => {
                self.refresh_all();
                self.state.screen = Screen::Dashboard;
            }
            PaletteAction::Quit => self.should_quit = true,
        }
    }

    fn on_settings_key(&mut self, key: KeyEvent) {
        if self.state.settings_edit.is_some() {
            match key.code {
                KeyCode::Esc => self.state.settings_edit = None,
                KeyCode::Backspace => {
                    if let Some(buffer) = self.state.settings_edit.as_mut() {
                        buffer.pop();
                    }
                }
                KeyCode::Enter => {
                    let value = self.state.settings_edit.take().unwrap_or_default();
                    self.commit_text_row(value);
                }
                KeyCode::Char(c) => {
                    if let Some(buffer) = self.state.settings_edit.as_mut() {
                        buffer.push(c);
                    }
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc => self.state.screen = Screen::Dashboard,
            KeyCode::Char('j') | KeyCode::Down => {
                self.state.settings_selected =
                    (self.state.settings_selected + 1).min(SETTINGS_ROW_COUNT - 1);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.state.settings_selected = self.state.settings_selected.saturating_sub(1);
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.activate_settings_row(),
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Right => self.adjust_number_row(1),
            KeyCode::Char('-') | KeyCode::Left => self.adjust_number_row(-1),
            _ => {}
        }
    }

    fn activate_settings_row(&mut self) {
        let record = self.state.settings.clone();
        match self.state.settings_selected {
            0 => self.state.settings_edit = Some(record.user_name.clone()),
            1 => self.state.settings_edit = Some(record.gemini_api_key.clone()),
            2 => self.state.settings_edit = Some(record.spotify_client_id.clone()),
            4 => self.toggle_row(|p, v| p.show_weather = Some(v), !record.show_weather),
            5 => self.toggle_row(|p, v| p.show_crypto = Some(v), !record.show_crypto),
            6 => self.toggle_row(|p, v| p.show_sports = Some(v), !record.show_sports),
            7 => self.toggle_row(|p, v| p.show_notes = Some(v), !record.show_notes),
            8 => self.toggle_row(|p, v| p.show_focus = Some(v), !record.show_focus),
            9 => self.toggle_row(
                |p, v| p.wallpaper_grayscale = Some(v),
                !record.wallpaper_grayscale,
            ),
            11 => {
                self.settings.write(SettingsPatch {
                    custom_links: Some(None),
                    ..Default::default()
                });
                self.state.push_log("[INFO] Links reset to defaults");
            }
            12 => {
                self.settings.write(SettingsPatch {
                    custom_wallpapers: Some(None),
                    ..Default::default()
                });
                self.state.push_log("[INFO] Wallpapers reset to defaults");
            }
            _ => {}
        }
    }

    fn toggle_row(&mut self, set: impl FnOnce(&mut SettingsPatch, bool), value: bool) {
        let mut patch = SettingsPatch::default();
        set(&mut patch, value);
        self.settings.write(patch);
    }

    fn adjust_number_row(&mut self, delta: i64) {
        match self.state.settings_selected {
            3 => {
                let minutes = self.state.settings.focus_minutes as i64 + delta;
                self.settings.set_focus_minutes(minutes.max(0) as u32);
            }
            10 => {
                let hours = self.state.settings.wallpaper_rotation_hours as i64 + delta;
                self.settings.set_wallpaper_rotation_hours(hours.max(0) as u32);
            }
            _ => {}
        }
    }

    fn commit_text_row(&mut self, value: String) {
        let patch = match self.state.settings_selected {
            0 => SettingsPatch {
                user_name: Some(value),
                ..Default::default()
            },
            1 => SettingsPatch {
                gemini_api_key: Some(value),
                ..Default::default()
            },
            2 => SettingsPatch {
                spotify_client_id: Some(value),
                ..Default::default()
            },
            _ => return,
        };
        self.settings.write(patch);
    }

    fn on_second_tick(&mut self) {
        self.state.focus_timer.tick();
        self.state.wallpaper_index = wallpaper::rotation_index(
            self.started_at.elapsed(),
            self.state.settings.wallpaper_rotation_hours,
            self.state.wallpapers.len(),
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PaletteAction {
    SearchGoogle,
    OpenSettings,
    RefreshWidgets,
    Quit,
}

impl PaletteAction {
    fn label(self) -> &'static str {
        match self {
            PaletteAction::SearchGoogle => "Search Google",
            PaletteAction::OpenSettings => "Open Settings",
            PaletteAction::RefreshWidgets => "Refresh Widgets",
            PaletteAction::Quit => "Quit",
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let settings = Arc::new(SettingsStore::open_default());
    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();

    // Settings writes fan back into the delta channel so widgets react to
    // them like any other update.
    let settings_tx = tx.clone();
    let _settings_sub = settings.subscribe(move |record| {
        let _ = settings_tx.send(Delta::SettingsChanged(record.clone()));
    });

    feed::spawn_provider(tx.clone(), cmd_rx, settings.clone());

    let mut app = App::new(cmd_tx, settings.clone());
    apply_delta(&mut app.state, Delta::SettingsChanged(settings.read()));

    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();
    let mut last_second = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        if last_second.elapsed() >= Duration::from_secs(1) {
            app.on_second_tick();
            last_second = Instant::now();
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let state = &app.state;
    let answer_height = if state.quick_ask_pending || state.quick_answer.is_some() {
        5
    } else {
        0
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Length(answer_height),
            Constraint::Min(6),
            Constraint::Length(8),
            Constraint::Length(1),
        ])
        .split(frame.size());

    render_header(frame, chunks[0], state);
    render_search_bar(frame, chunks[1], state);
    if answer_height > 0 {
        render_quick_answer(frame, chunks[2], state);
    }
    render_links(frame, chunks[3], state);
    render_widget_row(frame, chunks[4], state);

    let footer = Paragraph::new(footer_text(state)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[5]);

    match state.screen {
        Screen::Palette => render_palette(frame, app),
        Screen::Settings => render_settings(frame, state),
        Screen::Dashboard => {}
    }
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(28),
            Constraint::Min(20),
            Constraint::Length(34),
        ])
        .split(area);

    let weather = Paragraph::new(weather_text(state))
        .block(Block::default().borders(Borders::NONE))
        .style(Style::default().fg(Color::Cyan));
    frame.render_widget(weather, cols[0]);

    let now = Local::now();
    let clock_lines = vec![
        Line::from(Span::styled(
            state.greeting(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            now.format("%H:%M:%S").to_string(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            now.format("%A, %B %-d, %Y").to_string(),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let clock = Paragraph::new(clock_lines).alignment(Alignment::Center);
    frame.render_widget(clock, cols[1]);

    let playing = Paragraph::new(now_playing_text(state))
        .alignment(Alignment::Right)
        .style(Style::default().fg(Color::Green));
    frame.render_widget(playing, cols[2]);
}

fn weather_text(state: &AppState) -> String {
    if !state.settings.show_weather {
        return String::new();
    }
    if state.weather_loading {
        return "weather: loading...".to_string();
    }
    match &state.weather {
        Some(snapshot) => {
            let phase = if snapshot.is_day { "day" } else { "night" };
            format!(
                "{}° {} ({phase})",
                snapshot.temperature_c.round(),
                describe_weather_code(snapshot.weather_code)
            )
        }
        None => "weather: unavailable".to_string(),
    }
}

fn now_playing_text(state: &AppState) -> String {
    if state.settings.spotify_client_id.trim().is_empty() {
        return "spotify: add client id in settings".to_string();
    }
    match &state.now_playing {
        Some(NowPlaying {
            track,
            artist,
            is_playing,
            ..
        }) => {
            let marker = if *is_playing { "▶" } else { "⏸" };
            format!("{marker} {track} — {artist}")
        }
        None => "nothing playing".to_string(),
    }
}

fn render_search_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let focused = state.focus == Focus::Search && state.screen == Screen::Dashboard;
    let border_style = if focused {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let cursor = if focused { "_" } else { "" };
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", state.search_engine.label()),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
        Span::raw(format!("{}{cursor}", state.search_input)),
    ]);
    let search = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title("Search (↑/↓ engine, Enter go)"),
    );
    frame.render_widget(search, area);
}

fn render_quick_answer(frame: &mut Frame, area: Rect, state: &AppState) {
    let text = if state.quick_ask_pending {
        "Thinking...".to_string()
    } else {
        match &state.quick_answer {
            Some(QuickAskOutcome::Answer(answer)) => answer.clone(),
            Some(QuickAskOutcome::KeyMissing) => {
                "No Gemini API key configured. Add one in settings (Ctrl+S).".to_string()
            }
            Some(QuickAskOutcome::KeyInvalid) => {
                "Gemini rejected the API key. Update it in settings (Ctrl+S).".to_string()
            }
            Some(QuickAskOutcome::Unavailable(_)) => "Error connecting to Gemini.".to_string(),
            None => String::new(),
        }
    };
    let answer = Paragraph::new(text).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Quick Ask (Esc dismiss)")
            .border_style(Style::default().fg(Color::Magenta)),
    );
    frame.render_widget(answer, area);
}

fn render_links(frame: &mut Frame, area: Rect, state: &AppState) {
    let group_count = state.link_groups.len().max(1);
    let constraints: Vec<Constraint> = (0..group_count)
        .map(|_| Constraint::Ratio(1, group_count as u32))
        .collect();
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    let rows = state.link_rows();
    let selected = rows.get(state.link_selected).copied();
    let links_focused = state.focus == Focus::Links && state.screen == Screen::Dashboard;

    for (gi, group) in state.link_groups.iter().enumerate() {
        let mut lines = Vec::new();
        for (ii, item) in group.items.iter().enumerate() {
            let is_selected = links_focused && selected == Some((gi, ii));
            let style = if is_selected {
                Style::default().fg(Color::Black).bg(Color::White)
            } else {
                Style::default().fg(Color::Gray)
            };
            lines.push(Line::from(Span::styled(
                format!("  {}", item.label),
                style,
            )));
        }
        let block = Block::default()
            .borders(Borders::ALL)
            .title(group.title.clone())
            .border_style(Style::default().fg(Color::DarkGray));
        let paragraph = Paragraph::new(lines).block(block);
        frame.render_widget(paragraph, cols[gi]);
    }

    if let Some(quote) = &state.quote {
        let quote_area = Rect {
            x: area.x,
            y: area.y + area.height.saturating_sub(1),
            width: area.width,
            height: 1,
        };
        let line = Paragraph::new(format!("\"{}\" — {}", quote.text, quote.author))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(line, quote_area);
    }
}

fn render_widget_row(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut panels: Vec<WidgetPanel> = Vec::new();
    if state.settings.show_sports {
        panels.push(WidgetPanel::Sports);
    }
    if state.settings.show_crypto {
        panels.push(WidgetPanel::Crypto);
    }
    if state.settings.show_notes {
        panels.push(WidgetPanel::Notes);
    }
    if state.settings.show_focus {
        panels.push(WidgetPanel::FocusTimer);
    }
    if panels.is_empty() {
        return;
    }

    let constraints: Vec<Constraint> = (0..panels.len())
        .map(|_| Constraint::Ratio(1, panels.len() as u32))
        .collect();
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (i, panel) in panels.iter().enumerate() {
        match panel {
            WidgetPanel::Sports => render_sports(frame, cols[i], state),
            WidgetPanel::Crypto => render_crypto(frame, cols[i], state),
            WidgetPanel::Notes => render_notes(frame, cols[i], state),
            WidgetPanel::FocusTimer => render_focus_timer(frame, cols[i], state),
        }
    }
}

enum WidgetPanel {
    Sports,
    Crypto,
    Notes,
    FocusTimer,
}

fn render_sports(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut lines = Vec::new();
    if state.matches_loading {
        lines.push(Line::from(Span::styled(
            "Loading scores...",
            Style::default().fg(Color::DarkGray),
        )));
    } else if state.matches.is_empty() {
        lines.push(Line::from(Span::styled(
            "No matches active",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        for m in &state.matches {
            let (status, status_style) = match m.phase {
                MatchPhase::Live => (
                    format!("{}'", m.clock),
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                MatchPhase::Ft => ("FT".to_string(), Style::default().fg(Color::DarkGray)),
                MatchPhase::Upcoming => ("SOON".to_string(), Style::default().fg(Color::DarkGray)),
            };
            let score = if m.phase == MatchPhase::Upcoming {
                "vs".to_string()
            } else {
                format!("{}-{}", m.home_score, m.away_score)
            };
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{:<4}", m.home),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("{score:^5}")),
                Span::styled(
                    format!("{:<4}", m.away),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
                Span::styled(status, status_style),
            ]));
        }
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Premier League");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_crypto(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut lines = Vec::new();
    if state.coins_loading {
        lines.push(Line::from(Span::styled(
            "Loading market...",
            Style::default().fg(Color::DarkGray),
        )));
    } else if state.coins.is_empty() {
        lines.push(Line::from(Span::styled(
            "Data unavailable",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        for coin in &state.coins {
            let up = coin.change_24h_pct >= 0.0;
            let change_style = if up {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Red)
            };
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{:<5}", coin.symbol),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("${:<12.2}", coin.price_usd)),
                Span::styled(
                    format!("{}{:.2}%", if up { "+" } else { "-" }, coin.change_24h_pct.abs()),
                    change_style,
                ),
            ]));
        }
    }
    let block = Block::default().borders(Borders::ALL).title("Market");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_notes(frame: &mut Frame, area: Rect, state: &AppState) {
    let focused = state.focus == Focus::Notes && state.screen == Screen::Dashboard;
    let cursor = if focused { "_" } else { "" };
    let border_style = if focused {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let text = if state.note.is_empty() && !focused {
        "// scratchpad...".to_string()
    } else {
        format!("{}{cursor}", state.note)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Brain Dump")
        .border_style(border_style);
    frame.render_widget(
        Paragraph::new(text).wrap(Wrap { trim: false }).block(block),
        area,
    );
}

fn render_focus_timer(frame: &mut Frame, area: Rect, state: &AppState) {
    let timer = &state.focus_timer;
    let phase = match timer.phase {
        FocusPhase::Idle => "idle",
        FocusPhase::Running => "running",
        FocusPhase::Paused => "paused",
        FocusPhase::Done => "done",
    };
    let lines = vec![
        Line::from(Span::styled(
            timer.display(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            phase.to_string(),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            "Ctrl+T start/pause · Ctrl+Y reset",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let block = Block::default().borders(Borders::ALL).title("Focus");
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(block),
        area,
    );
}

fn footer_text(state: &AppState) -> String {
    let wallpaper = state
        .wallpapers
        .get(state.wallpaper_index)
        .map(|url| wallpaper::wallpaper_name(url))
        .unwrap_or("-");
    let shade = if state.settings.wallpaper_grayscale {
        "mono"
    } else {
        "color"
    };
    let last_log = state.logs.back().map(String::as_str).unwrap_or("");
    format!(
        "wall {}/{} {wallpaper} [{shade}] | Tab focus | Ctrl+K palette | Ctrl+S settings | Ctrl+R refresh | Ctrl+Q quit {}",
        state.wallpaper_index + 1,
        state.wallpapers.len().max(1),
        last_log
    )
}

fn render_palette(frame: &mut Frame, app: &App) {
    let area = centered_rect(50, 40, frame.size());
    frame.render_widget(Clear, area);

    let actions = app.palette_actions();
    let mut lines = vec![
        Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Magenta)),
            Span::raw(format!("{}_", app.state.palette_input)),
        ]),
        Line::from(""),
    ];
    if actions.is_empty() {
        lines.push(Line::from(Span::styled(
            "No matching actions",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (i, action) in actions.iter().enumerate() {
        let style = if i == app.state.palette_selected {
            Style::default().fg(Color::Black).bg(Color::White)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(Span::styled(
            format!("  {}", action.label()),
            style,
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Command Palette (Esc close)");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_settings(frame: &mut Frame, state: &AppState) {
    let area = centered_rect(70, 80, frame.size());
    frame.render_widget(Clear, area);

    let record = &state.settings;
    let values: [String; SETTINGS_ROW_COUNT] = [
        record.user_name.clone(),
        mask_secret(&record.gemini_api_key),
        mask_secret(&record.spotify_client_id),
        format!("{} min", record.focus_minutes),
        on_off(record.show_weather),
        on_off(record.show_crypto),
        on_off(record.show_sports),
        on_off(record.show_notes),
        on_off(record.show_focus),
        on_off(record.wallpaper_grayscale),
        format!("{} h", record.wallpaper_rotation_hours),
        match &record.custom_links {
            Some(groups) => format!("{} custom groups", groups.len()),
            None => "defaults".to_string(),
        },
        match &record.custom_wallpapers {
            Some(urls) => format!("{} custom images", urls.len()),
            None => "defaults".to_string(),
        },
    ];

    let mut lines = Vec::new();
    for (i, label) in SETTINGS_ROW_LABELS.iter().enumerate() {
        let selected = i == state.settings_selected;
        let value = if selected {
            match &state.settings_edit {
                Some(buffer) => format!("{buffer}_"),
                None => values[i].clone(),
            }
        } else {
            values[i].clone()
        };
        let style = if selected {
            Style::default().fg(Color::Black).bg(Color::White)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(Span::styled(
            format!(" {label:<26} {value}"),
            style,
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Enter edit/toggle · +/- adjust · Esc back",
        Style::default().fg(Color::DarkGray),
    )));

    let block = Block::default().borders(Borders::ALL).title("Settings");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn mask_secret(value: &str) -> String {
    if value.trim().is_empty() {
        "(unset)".to_string()
    } else {
        "*".repeat(value.len().min(12))
    }
}

fn on_off(value: bool) -> String {
    if value { "on" } else { "off" }.to_string()
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
