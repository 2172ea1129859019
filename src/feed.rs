use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::crypto;
use crate::quick_ask;
use crate::quote;
use crate::settings::SettingsStore;
use crate::spotify;
use crate::sports::{self, EspnSource};
use crate::state::{Delta, ProviderCommand};
use crate::weather;

// London, when no coordinates are configured.
const DEFAULT_LAT: f64 = 51.5074;
const DEFAULT_LON: f64 = -0.1278;

pub fn spawn_provider(
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
    settings: Arc<SettingsStore>,
) {
    thread::spawn(move || {
        let pool = build_fetch_pool();
        let (lat, lon) = coords_from_env();

        let mut weather_gate = PollGate::new(interval_env("WEATHER_POLL_SECS", 3600, 60));
        let mut coins_gate = PollGate::new(interval_env("CRYPTO_POLL_SECS", 10_800, 60));
        let mut scores_gate = PollGate::new(interval_env("SPORTS_POLL_SECS", 10_800, 60));
        let mut playing_gate = PollGate::new(interval_env("NOW_PLAYING_POLL_SECS", 30, 10));

        let weather_inflight = Arc::new(AtomicBool::new(false));
        let coins_inflight = Arc::new(AtomicBool::new(false));
        let scores_inflight = Arc::new(AtomicBool::new(false));
        let playing_inflight = Arc::new(AtomicBool::new(false));

        spawn_quote_job(&pool, tx.clone());

        loop {
            thread::sleep(Duration::from_millis(900));
            let record = settings.read();

            if record.show_weather
                && weather_gate.due()
                && !weather_inflight.load(Ordering::SeqCst)
            {
                spawn_weather_job(&pool, tx.clone(), weather_inflight.clone(), lat, lon);
                weather_gate.stamp();
            }

            if record.show_crypto && coins_gate.due() && !coins_inflight.load(Ordering::SeqCst) {
                spawn_coins_job(&pool, tx.clone(), coins_inflight.clone());
                coins_gate.stamp();
            }

            if record.show_sports && scores_gate.due() && !scores_inflight.load(Ordering::SeqCst) {
                spawn_scores_job(&pool, tx.clone(), scores_inflight.clone());
                scores_gate.stamp();
            }

            if !record.spotify_client_id.trim().is_empty()
                && playing_gate.due()
                && !playing_inflight.load(Ordering::SeqCst)
            {
                spawn_now_playing_job(&pool, tx.clone(), playing_inflight.clone());
                playing_gate.stamp();
            }

            while let Ok(cmd) = cmd_rx.try_recv() {
                match cmd {
                    ProviderCommand::RefreshWeather => {
                        if !weather_inflight.load(Ordering::SeqCst) {
                            spawn_weather_job(&pool, tx.clone(), weather_inflight.clone(), lat, lon);
                            weather_gate.stamp();
                        }
                    }
                    ProviderCommand::RefreshCoins => {
                        if !coins_inflight.load(Ordering::SeqCst) {
                            spawn_coins_job(&pool, tx.clone(), coins_inflight.clone());
                            coins_gate.stamp();
                        }
                    }
                    ProviderCommand::RefreshScores => {
                        if !scores_inflight.load(Ordering::SeqCst) {
                            spawn_scores_job(&pool, tx.clone(), scores_inflight.clone());
                            scores_gate.stamp();
                        }
                    }
                    ProviderCommand::RefreshNowPlaying => {
                        if !playing_inflight.load(Ordering::SeqCst) {
                            spawn_now_playing_job(&pool, tx.clone(), playing_inflight.clone());
                            playing_gate.stamp();
                        }
                    }
                    ProviderCommand::RefreshQuote => {
                        spawn_quote_job(&pool, tx.clone());
                    }
                    ProviderCommand::QuickAsk { prompt } => {
                        let tx = tx.clone();
                        let api_key = settings.gemini_api_key();
                        spawn_job(&pool, move || {
                            let outcome = quick_ask::quick_ask(&api_key, &prompt);
                            let _ = tx.send(Delta::SetQuickAnswer(outcome));
                        });
                    }
                }
            }
        }
    });
}

// Widget poll interval: `due` is true before the first fetch and again once
// the interval has elapsed since the last stamp.
struct PollGate {
    last: Option<Instant>,
    interval: Duration,
}

impl PollGate {
    fn new(interval: Duration) -> Self {
        Self {
            last: None,
            interval,
        }
    }

    fn due(&self) -> bool {
        self.last.is_none_or(|t| t.elapsed() >= self.interval)
    }

    fn stamp(&mut self) {
        self.last = Some(Instant::now());
    }
}

fn spawn_weather_job(
    pool: &Option<rayon::ThreadPool>,
    tx: Sender<Delta>,
    inflight: Arc<AtomicBool>,
    lat: f64,
    lon: f64,
) {
    inflight.store(true, Ordering::SeqCst);
    spawn_job(pool, move || {
        match weather::fetch_weather(lat, lon) {
            Ok(snapshot) => {
                let _ = tx.send(Delta::SetWeather(Some(snapshot)));
            }
            Err(err) => {
                let _ = tx.send(Delta::Log(format!("[WARN] Weather fetch error: {err:#}")));
                let _ = tx.send(Delta::SetWeather(None));
            }
        }
        inflight.store(false, Ordering::SeqCst);
    });
}

fn spawn_coins_job(pool: &Option<rayon::ThreadPool>, tx: Sender<Delta>, inflight: Arc<AtomicBool>) {
    inflight.store(true, Ordering::SeqCst);
    spawn_job(pool, move || {
        match crypto::fetch_coin_quotes() {
            Ok(coins) => {
                let _ = tx.send(Delta::SetCoins(coins));
            }
            Err(err) => {
                let _ = tx.send(Delta::Log(format!("[WARN] Crypto fetch error: {err:#}")));
                let _ = tx.send(Delta::SetCoins(Vec::new()));
            }
        }
        inflight.store(false, Ordering::SeqCst);
    });
}

fn spawn_scores_job(pool: &Option<rayon::ThreadPool>, tx: Sender<Delta>, inflight: Arc<AtomicBool>) {
    inflight.store(true, Ordering::SeqCst);
    spawn_job(pool, move || {
        let selection = sports::select_display_matches(&EspnSource);
        for warning in selection.warnings {
            let _ = tx.send(Delta::Log(format!("[WARN] Scores: {warning}")));
        }
        let _ = tx.send(Delta::SetMatches(selection.matches));
        inflight.store(false, Ordering::SeqCst);
    });
}

fn spawn_now_playing_job(
    pool: &Option<rayon::ThreadPool>,
    tx: Sender<Delta>,
    inflight: Arc<AtomicBool>,
) {
    inflight.store(true, Ordering::SeqCst);
    spawn_job(pool, move || {
        let token = env::var("SPOTIFY_TOKEN").unwrap_or_default();
        if token.trim().is_empty() {
            let _ = tx.send(Delta::SetNowPlaying(None));
        } else {
            match spotify::fetch_now_playing(&token) {
                Ok(track) => {
                    let _ = tx.send(Delta::SetNowPlaying(track));
                }
                Err(err) => {
                    let _ =
                        tx.send(Delta::Log(format!("[WARN] Now playing error: {err:#}")));
                    let _ = tx.send(Delta::SetNowPlaying(None));
                }
            }
        }
        inflight.store(false, Ordering::SeqCst);
    });
}

fn spawn_quote_job(pool: &Option<rayon::ThreadPool>, tx: Sender<Delta>) {
    spawn_job(pool, move || match quote::fetch_random_quote() {
        Ok(line) => {
            let _ = tx.send(Delta::SetQuote(line));
        }
        Err(err) => {
            let _ = tx.send(Delta::Log(format!("[WARN] Quote fetch error: {err:#}")));
            let _ = tx.send(Delta::SetQuote(quote::fallback_quote()));
        }
    });
}

fn spawn_job(pool: &Option<rayon::ThreadPool>, job: impl FnOnce() + Send + 'static) {
    if let Some(pool) = pool.as_ref() {
        pool.spawn(job);
    } else {
        thread::spawn(job);
    }
}

fn build_fetch_pool() -> Option<rayon::ThreadPool> {
    let threads = fetch_parallelism();
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .ok()
}

fn fetch_parallelism() -> usize {
    env::var("FETCH_PARALLELISM")
        .ok()
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(4)
        .clamp(2, 16)
}

fn interval_env(key: &str, default_secs: u64, min_secs: u64) -> Duration {
    Duration::from_secs(
        env::var(key)
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(default_secs)
            .max(min_secs),
    )
}

fn coords_from_env() -> (f64, f64) {
    let lat = env::var("NEXUS_LAT")
        .ok()
        .and_then(|val| val.parse::<f64>().ok())
        .unwrap_or(DEFAULT_LAT);
    let lon = env::var("NEXUS_LON")
        .ok()
        .and_then(|val| val.parse::<f64>().ok())
        .unwrap_or(DEFAULT_LON);
    (lat, lon)
}
