use anyhow::{Context, Result};
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use serde_json::Value;

use crate::http_client::http_client;

const CURRENTLY_PLAYING_URL: &str = "https://api.spotify.com/v1/me/player/currently-playing";

#[derive(Debug, Clone, PartialEq)]
pub struct NowPlaying {
    pub track: String,
    pub artist: String,
    pub is_playing: bool,
    pub progress_ms: u64,
    pub duration_ms: u64,
}

/// `Ok(None)` means nothing is playing or the token has expired (204/401);
/// both render as an idle widget rather than an error.
pub fn fetch_now_playing(token: &str) -> Result<Option<NowPlaying>> {
    let client = http_client()?;
    let resp = client
        .get(CURRENTLY_PLAYING_URL)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .send()
        .context("now playing request failed")?;
    let status = resp.status();
    if status == StatusCode::NO_CONTENT || status == StatusCode::UNAUTHORIZED {
        return Ok(None);
    }
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow::anyhow!("http {}: {}", status, body));
    }
    parse_now_playing_json(&body)
}

pub fn parse_now_playing_json(raw: &str) -> Result<Option<NowPlaying>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid now playing json")?;
    let Some(item) = root.get("item").filter(|v| !v.is_null()) else {
        return Ok(None);
    };

    let track = item
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    let artist = item
        .get("artists")
        .and_then(|v| v.as_array())
        .map(|artists| {
            artists
                .iter()
                .filter_map(|a| a.get("name").and_then(|n| n.as_str()))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default();

    Ok(Some(NowPlaying {
        track,
        artist,
        is_playing: root
            .get("is_playing")
            .and_then(|v| v.as_bool())
            .unwrap_or(false),
        progress_ms: root
            .get("progress_ms")
            .and_then(|v| v.as_u64())
            .unwrap_or(0),
        duration_ms: item
            .get("duration_ms")
            .and_then(|v| v.as_u64())
            .unwrap_or(0),
    }))
}
