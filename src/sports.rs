use std::collections::HashSet;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime};
use serde_json::Value;

use crate::http_client::{fetch_json, http_client};

const ESPN_LEAGUE_URL: &str = "https://site.api.espn.com/apis/site/v2/sports/soccer/eng.1";
const ESPN_STANDINGS_URL: &str =
    "https://site.api.espn.com/apis/v2/sports/soccer/eng.1/standings";

const DISPLAY_SLOTS: usize = 3;
const STANDINGS_TOP: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    Upcoming,
    Live,
    Ft,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMatch {
    pub id: String,
    pub home: String,
    pub away: String,
    pub home_score: String,
    pub away_score: String,
    pub phase: MatchPhase,
    pub clock: String,
    pub kickoff_ms: i64,
}

/// The three fetch stages the selection walks through, injectable so the
/// degradation ladder is testable without a network.
pub trait ScoreSource {
    fn scoreboard(&self) -> Result<Vec<ScoreMatch>>;
    fn standings_top(&self, count: usize) -> Result<Vec<String>>;
    fn team_schedule(&self, team_id: &str) -> Result<Vec<ScoreMatch>>;
}

pub struct EspnSource;

impl ScoreSource for EspnSource {
    fn scoreboard(&self) -> Result<Vec<ScoreMatch>> {
        let client = http_client()?;
        let url = format!("{ESPN_LEAGUE_URL}/scoreboard");
        let body = fetch_json(client, &url, &[]).context("scoreboard request failed")?;
        parse_scoreboard_json(&body)
    }

    fn standings_top(&self, count: usize) -> Result<Vec<String>> {
        let client = http_client()?;
        let body =
            fetch_json(client, ESPN_STANDINGS_URL, &[]).context("standings request failed")?;
        parse_standings_json(&body, count)
    }

    fn team_schedule(&self, team_id: &str) -> Result<Vec<ScoreMatch>> {
        let client = http_client()?;
        let url = format!("{ESPN_LEAGUE_URL}/teams/{team_id}/schedule");
        let body = fetch_json(client, &url, &[]).context("team schedule request failed")?;
        parse_scoreboard_json(&body)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub matches: Vec<ScoreMatch>,
    pub warnings: Vec<String>,
}

/// Picks at most three matches for the ticker: the freshest live match if any
/// is on, otherwise a featured result from the top of the table, then
/// upcoming fixtures, then recent results. Every stage failure degrades to
/// the next fallback; a dead scoreboard yields an empty selection.
pub fn select_display_matches(source: &impl ScoreSource) -> Selection {
    let mut selection = Selection::default();

    let board = match source.scoreboard() {
        Ok(board) => board,
        Err(err) => {
            selection.warnings.push(format!("scoreboard: {err:#}"));
            return selection;
        }
    };

    let mut live: Vec<&ScoreMatch> = board.iter().filter(|m| m.phase == MatchPhase::Live).collect();
    live.sort_by_key(|m| std::cmp::Reverse(m.kickoff_ms));

    let mut upcoming: Vec<&ScoreMatch> = board
        .iter()
        .filter(|m| m.phase == MatchPhase::Upcoming)
        .collect();
    upcoming.sort_by_key(|m| m.kickoff_ms);

    let mut finished: Vec<&ScoreMatch> =
        board.iter().filter(|m| m.phase == MatchPhase::Ft).collect();
    finished.sort_by_key(|m| std::cmp::Reverse(m.kickoff_ms));

    let mut picked: Vec<ScoreMatch> = Vec::new();
    if let Some(live_top) = live.first() {
        picked.push((*live_top).clone());
    } else {
        match featured_top_team_result(source) {
            Ok(Some(featured)) => picked.push(featured),
            Ok(None) => {
                if let Some(ft) = finished.first() {
                    picked.push((*ft).clone());
                }
            }
            Err(err) => {
                selection.warnings.push(format!("standings: {err:#}"));
                if let Some(ft) = finished.first() {
                    picked.push((*ft).clone());
                }
            }
        }
    }

    let mut used: HashSet<String> = picked.iter().map(|m| m.id.clone()).collect();
    for m in &upcoming {
        if picked.len() >= DISPLAY_SLOTS {
            break;
        }
        if used.insert(m.id.clone()) {
            picked.push((*m).clone());
        }
    }
    for m in &finished {
        if picked.len() >= DISPLAY_SLOTS {
            break;
        }
        if used.insert(m.id.clone()) {
            picked.push((*m).clone());
        }
    }

    selection.matches = picked;
    selection
}

/// The most recent completed match of the highest-ranked team that has one.
/// Teams are tried in rank order; the first hit wins. Any fetch failure here
/// aborts the featured lookup as a whole so the caller can fall back to the
/// generic scoreboard result.
fn featured_top_team_result(source: &impl ScoreSource) -> Result<Option<ScoreMatch>> {
    let top_teams = source.standings_top(STANDINGS_TOP)?;
    for team_id in top_teams {
        let schedule = source.team_schedule(&team_id)?;
        let mut completed: Vec<ScoreMatch> = schedule
            .into_iter()
            .filter(|m| m.phase == MatchPhase::Ft)
            .collect();
        completed.sort_by_key(|m| std::cmp::Reverse(m.kickoff_ms));
        if let Some(latest) = completed.into_iter().next() {
            return Ok(Some(latest));
        }
    }
    Ok(None)
}

pub fn parse_scoreboard_json(raw: &str) -> Result<Vec<ScoreMatch>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid scoreboard json")?;
    let mut out = Vec::new();
    if let Some(events) = root.get("events").and_then(|v| v.as_array()) {
        for event in events {
            if let Some(m) = parse_event(event) {
                out.push(m);
            }
        }
    }
    Ok(out)
}

pub fn parse_standings_json(raw: &str, count: usize) -> Result<Vec<String>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid standings json")?;
    let entries = root
        .get("children")
        .and_then(|v| v.get(0))
        .and_then(|v| v.get("standings"))
        .and_then(|v| v.get("entries"))
        .and_then(|v| v.as_array());

    let mut out = Vec::new();
    let Some(entries) = entries else {
        return Ok(out);
    };
    for entry in entries.iter().take(count) {
        if let Some(id) = entry
            .get("team")
            .and_then(|t| t.get("id"))
            .and_then(value_as_id)
        {
            out.push(id);
        }
    }
    Ok(out)
}

fn parse_event(event: &Value) -> Option<ScoreMatch> {
    let id = event.get("id").and_then(value_as_id)?;
    let competition = event
        .get("competitions")
        .and_then(|v| v.get(0))
        .unwrap_or(&Value::Null);

    let competitors = competition.get("competitors").and_then(|v| v.as_array())?;
    let home = competitors
        .iter()
        .find(|c| c.get("homeAway").and_then(|v| v.as_str()) == Some("home"))?;
    let away = competitors
        .iter()
        .find(|c| c.get("homeAway").and_then(|v| v.as_str()) == Some("away"))?;

    // The status object sits at the event root or inside the first
    // competition, depending on the endpoint. Root wins when both exist.
    let status = event
        .get("status")
        .filter(|v| !v.is_null())
        .or_else(|| competition.get("status"))
        .unwrap_or(&Value::Null);
    let state = status
        .get("type")
        .and_then(|t| t.get("state"))
        .and_then(|v| v.as_str())
        .unwrap_or("pre");
    let phase = match state {
        "in" => MatchPhase::Live,
        "post" => MatchPhase::Ft,
        _ => MatchPhase::Upcoming,
    };

    let clock = status
        .get("displayClock")
        .and_then(|v| v.as_str())
        .or_else(|| {
            competition
                .get("status")
                .and_then(|s| s.get("displayClock"))
                .and_then(|v| v.as_str())
        })
        .unwrap_or("00:00")
        .to_string();

    let kickoff_ms = event
        .get("date")
        .and_then(|v| v.as_str())
        .map(parse_kickoff_ms)
        .unwrap_or(0);

    Some(ScoreMatch {
        id,
        home: team_abbreviation(home),
        away: team_abbreviation(away),
        home_score: competitor_score(home),
        away_score: competitor_score(away),
        phase,
        clock,
        kickoff_ms,
    })
}

fn team_abbreviation(competitor: &Value) -> String {
    let team = competitor.get("team").unwrap_or(&Value::Null);
    if let Some(abbr) = team.get("abbreviation").and_then(|v| v.as_str()) {
        let trimmed = abbr.trim();
        if !trimmed.is_empty() {
            return trimmed.to_uppercase();
        }
    }
    team.get("name")
        .and_then(|v| v.as_str())
        .unwrap_or("???")
        .chars()
        .take(3)
        .collect::<String>()
        .to_uppercase()
}

// Scores stay display strings: the source sometimes sends a bare number and
// sometimes an object carrying displayValue.
fn competitor_score(competitor: &Value) -> String {
    match competitor.get("score") {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Object(map)) => map
            .get("displayValue")
            .and_then(|v| v.as_str())
            .unwrap_or("0")
            .to_string(),
        _ => "0".to_string(),
    }
}

fn value_as_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// Kickoff timestamps arrive as "2026-08-07T14:00Z", occasionally with
// seconds or a numeric offset.
pub fn parse_kickoff_ms(raw: &str) -> i64 {
    let trimmed = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return parsed.timestamp_millis();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%MZ") {
        return parsed.and_utc().timestamp_millis();
    }
    if let Ok(parsed) = DateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M%z") {
        return parsed.timestamp_millis();
    }
    0
}
