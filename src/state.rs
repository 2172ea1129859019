use std::collections::VecDeque;

use chrono::{Local, Timelike};

use crate::crypto::CoinQuote;
use crate::links::{LinkGroup, LinkItem, default_link_groups};
use crate::quick_ask::QuickAskOutcome;
use crate::quote::QuoteLine;
use crate::search::SearchEngine;
use crate::settings::SettingsRecord;
use crate::spotify::NowPlaying;
use crate::sports::ScoreMatch;
use crate::wallpaper::default_wallpapers;
use crate::weather::WeatherSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Palette,
    Settings,
}

/// Which dashboard region receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search,
    Links,
    Notes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPhase {
    Idle,
    Running,
    Paused,
    Done,
}

/// Countdown driven by the 1s UI tick; no wall clock involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusTimer {
    pub duration_secs: u32,
    pub remaining_secs: u32,
    pub phase: FocusPhase,
}

impl FocusTimer {
    pub fn new(minutes: u32) -> Self {
        let duration_secs = minutes * 60;
        Self {
            duration_secs,
            remaining_secs: duration_secs,
            phase: FocusPhase::Idle,
        }
    }

    pub fn toggle(&mut self) {
        self.phase = match self.phase {
            FocusPhase::Idle | FocusPhase::Paused => FocusPhase::Running,
            FocusPhase::Running => FocusPhase::Paused,
            FocusPhase::Done => FocusPhase::Done,
        };
    }

    pub fn reset(&mut self) {
        self.remaining_secs = self.duration_secs;
        self.phase = FocusPhase::Idle;
    }

    pub fn tick(&mut self) {
        if self.phase != FocusPhase::Running {
            return;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.phase = FocusPhase::Done;
        }
    }

    /// A duration change from settings only takes effect while the timer is
    /// sitting untouched at its initial value.
    pub fn apply_duration(&mut self, minutes: u32) {
        let duration_secs = minutes * 60;
        if duration_secs == self.duration_secs {
            return;
        }
        let at_initial =
            self.phase == FocusPhase::Idle && self.remaining_secs == self.duration_secs;
        self.duration_secs = duration_secs;
        if at_initial {
            self.remaining_secs = duration_secs;
        }
    }

    pub fn display(&self) -> String {
        let mins = self.remaining_secs / 60;
        let secs = self.remaining_secs % 60;
        format!("{mins:02}:{secs:02}")
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    SetWeather(Option<WeatherSnapshot>),
    SetCoins(Vec<CoinQuote>),
    SetMatches(Vec<ScoreMatch>),
    SetNowPlaying(Option<NowPlaying>),
    SetQuote(QuoteLine),
    SetQuickAnswer(QuickAskOutcome),
    SettingsChanged(SettingsRecord),
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    RefreshWeather,
    RefreshCoins,
    RefreshScores,
    RefreshNowPlaying,
    RefreshQuote,
    QuickAsk { prompt: String },
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub focus: Focus,
    pub settings: SettingsRecord,

    pub weather: Option<WeatherSnapshot>,
    pub weather_loading: bool,
    pub coins: Vec<CoinQuote>,
    pub coins_loading: bool,
    pub matches: Vec<ScoreMatch>,
    pub matches_loading: bool,
    pub now_playing: Option<NowPlaying>,
    pub quote: Option<QuoteLine>,

    pub search_input: String,
    pub search_engine: SearchEngine,
    pub quick_answer: Option<QuickAskOutcome>,
    pub quick_ask_pending: bool,

    pub note: String,
    pub focus_timer: FocusTimer,

    pub link_groups: Vec<LinkGroup>,
    pub link_selected: usize,
    pub wallpapers: Vec<String>,
    pub wallpaper_index: usize,

    pub palette_input: String,
    pub palette_selected: usize,
    pub settings_selected: usize,
    pub settings_edit: Option<String>,

    pub logs: VecDeque<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        let settings = SettingsRecord::default();
        let focus_timer = FocusTimer::new(settings.focus_minutes);
        Self {
            screen: Screen::Dashboard,
            focus: Focus::Search,
            link_groups: default_link_groups(),
            link_selected: 0,
            wallpapers: default_wallpapers(),
            wallpaper_index: 0,
            weather: None,
            weather_loading: true,
            coins: Vec::new(),
            coins_loading: true,
            matches: Vec::new(),
            matches_loading: true,
            now_playing: None,
            quote: None,
            search_input: String::new(),
            search_engine: SearchEngine::Google,
            quick_answer: None,
            quick_ask_pending: false,
            note: String::new(),
            focus_timer,
            palette_input: String::new(),
            palette_selected: 0,
            settings_selected: 0,
            settings_edit: None,
            logs: VecDeque::new(),
            settings,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    /// Links flattened into navigation order: (group index, item index).
    pub fn link_rows(&self) -> Vec<(usize, usize)> {
        let mut rows = Vec::new();
        for (gi, group) in self.link_groups.iter().enumerate() {
            for ii in 0..group.items.len() {
                rows.push((gi, ii));
            }
        }
        rows
    }

    pub fn selected_link(&self) -> Option<&LinkItem> {
        let rows = self.link_rows();
        let (gi, ii) = *rows.get(self.link_selected)?;
        self.link_groups.get(gi)?.items.get(ii)
    }

    pub fn select_next_link(&mut self) {
        let total = self.link_rows().len();
        if total == 0 {
            return;
        }
        self.link_selected = (self.link_selected + 1) % total;
    }

    pub fn select_prev_link(&mut self) {
        let total = self.link_rows().len();
        if total == 0 {
            return;
        }
        self.link_selected = (self.link_selected + total - 1) % total;
    }

    pub fn greeting(&self) -> String {
        greeting_for_hour(Local::now().hour(), &self.settings.user_name)
    }
}

pub fn greeting_for_hour(hour: u32, name: &str) -> String {
    let part = if hour < 12 {
        "Good morning"
    } else if hour < 18 {
        "Good afternoon"
    } else {
        "Good evening"
    };
    format!("{part}, {name}.")
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetWeather(snapshot) => {
            state.weather = snapshot;
            state.weather_loading = false;
        }
        Delta::SetCoins(coins) => {
            state.coins = coins;
            state.coins_loading = false;
        }
        Delta::SetMatches(matches) => {
            state.matches = matches;
            state.matches_loading = false;
        }
        Delta::SetNowPlaying(track) => {
            state.now_playing = track;
        }
        Delta::SetQuote(quote) => {
            state.quote = Some(quote);
        }
        Delta::SetQuickAnswer(outcome) => {
            state.quick_answer = Some(outcome);
            state.quick_ask_pending = false;
        }
        Delta::SettingsChanged(record) => {
            state.link_groups = record
                .custom_links
                .clone()
                .unwrap_or_else(default_link_groups);
            state.wallpapers = record
                .custom_wallpapers
                .clone()
                .unwrap_or_else(default_wallpapers);
            state.focus_timer.apply_duration(record.focus_minutes);
            state.settings = record;

            let total = state.link_rows().len();
            if total == 0 {
                state.link_selected = 0;
            } else {
                state.link_selected = state.link_selected.min(total - 1);
            }
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
