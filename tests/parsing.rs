use std::fs;
use std::path::PathBuf;

use nexus_terminal::crypto::parse_coin_quotes_json;
use nexus_terminal::quick_ask::parse_answer_json;
use nexus_terminal::quote::parse_quote_json;
use nexus_terminal::spotify::parse_now_playing_json;
use nexus_terminal::sports::{MatchPhase, parse_scoreboard_json, parse_standings_json};
use nexus_terminal::weather::parse_weather_json;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_scoreboard_fixture() {
    let raw = read_fixture("espn_scoreboard.json");
    let matches = parse_scoreboard_json(&raw).expect("fixture should parse");
    assert_eq!(matches.len(), 3);

    let live = &matches[0];
    assert_eq!(live.id, "700101");
    assert_eq!(live.phase, MatchPhase::Live);
    assert_eq!(live.home, "ARS");
    assert_eq!(live.away, "CHE");
    assert_eq!(live.home_score, "2");
    assert_eq!(live.away_score, "1");
    assert_eq!(live.clock, "63:12");
    assert!(live.kickoff_ms > 0);

    let finished = &matches[2];
    assert_eq!(finished.phase, MatchPhase::Ft);
    assert_eq!(finished.home_score, "3");
}

#[test]
fn status_nested_in_competition_still_classifies() {
    // Second event carries its status only inside competitions[0].
    let raw = read_fixture("espn_scoreboard.json");
    let matches = parse_scoreboard_json(&raw).expect("fixture should parse");
    let upcoming = &matches[1];
    assert_eq!(upcoming.id, "700102");
    assert_eq!(upcoming.phase, MatchPhase::Upcoming);
    assert_eq!(upcoming.home, "LIV");
    // No abbreviation supplied: falls back to the first three letters.
    assert_eq!(upcoming.away, "MAN");
    assert_eq!(upcoming.home_score, "0");
}

#[test]
fn both_status_shapes_agree_on_phase() {
    let root_status = r#"{"events":[{"id":"1","date":"2026-08-07T14:00Z",
        "status":{"type":{"state":"in"},"displayClock":"12:00"},
        "competitions":[{"competitors":[
            {"homeAway":"home","score":"1","team":{"abbreviation":"AAA"}},
            {"homeAway":"away","score":"0","team":{"abbreviation":"BBB"}}]}]}]}"#;
    let nested_status = r#"{"events":[{"id":"1","date":"2026-08-07T14:00Z",
        "competitions":[{"status":{"type":{"state":"in"},"displayClock":"12:00"},
        "competitors":[
            {"homeAway":"home","score":"1","team":{"abbreviation":"AAA"}},
            {"homeAway":"away","score":"0","team":{"abbreviation":"BBB"}}]}]}]}"#;

    let from_root = parse_scoreboard_json(root_status).expect("root status should parse");
    let from_nested = parse_scoreboard_json(nested_status).expect("nested status should parse");
    assert_eq!(from_root, from_nested);
    assert_eq!(from_root[0].phase, MatchPhase::Live);
}

#[test]
fn parses_standings_fixture_in_rank_order() {
    let raw = read_fixture("espn_standings.json");
    let top = parse_standings_json(&raw, 3).expect("fixture should parse");
    assert_eq!(top, vec!["364", "359", "382"]);
}

#[test]
fn parses_schedule_fixture() {
    let raw = read_fixture("espn_schedule.json");
    let matches = parse_scoreboard_json(&raw).expect("fixture should parse");
    assert_eq!(matches.len(), 3);
    let completed: Vec<_> = matches
        .iter()
        .filter(|m| m.phase == MatchPhase::Ft)
        .collect();
    assert_eq!(completed.len(), 2);
}

#[test]
fn scoreboard_null_is_empty() {
    assert!(
        parse_scoreboard_json("null")
            .expect("null should parse")
            .is_empty()
    );
    assert!(
        parse_standings_json("null", 3)
            .expect("null should parse")
            .is_empty()
    );
}

#[test]
fn parses_weather_fixture() {
    let raw = read_fixture("open_meteo.json");
    let snapshot = parse_weather_json(&raw).expect("fixture should parse");
    assert_eq!(snapshot.temperature_c, 18.4);
    assert_eq!(snapshot.weather_code, 61);
    assert!(snapshot.is_day);
}

#[test]
fn parses_crypto_fixture() {
    let raw = read_fixture("coingecko_markets.json");
    let coins = parse_coin_quotes_json(&raw).expect("fixture should parse");
    assert_eq!(coins.len(), 3);
    assert_eq!(coins[0].symbol, "BTC");
    assert_eq!(coins[0].price_usd, 67412.0);
    assert!(coins[1].change_24h_pct < 0.0);
    // Null change falls back to zero rather than failing the whole list.
    assert_eq!(coins[2].change_24h_pct, 0.0);
}

#[test]
fn parses_now_playing_fixture() {
    let raw = read_fixture("spotify_now_playing.json");
    let playing = parse_now_playing_json(&raw)
        .expect("fixture should parse")
        .expect("a track should be present");
    assert_eq!(playing.track, "Weightless");
    assert_eq!(playing.artist, "Marconi Union, Quiet Village");
    assert!(playing.is_playing);
    assert_eq!(playing.duration_ms, 481_000);
}

#[test]
fn now_playing_without_item_is_none() {
    assert!(
        parse_now_playing_json(r#"{"is_playing":false,"item":null}"#)
            .expect("should parse")
            .is_none()
    );
    assert!(parse_now_playing_json("null").expect("should parse").is_none());
}

#[test]
fn parses_quick_ask_fixture() {
    let raw = read_fixture("gemini_answer.json");
    let answer = parse_answer_json(&raw).expect("fixture should parse");
    assert_eq!(answer, "The Premier League season opens on August 15.");
}

#[test]
fn empty_quick_ask_answer_is_placeholder() {
    let answer = parse_answer_json(r#"{"candidates":[]}"#).expect("should parse");
    assert_eq!(answer, "No response generated.");
}

#[test]
fn parses_quote_fixture() {
    let raw = read_fixture("quote.json");
    let quote = parse_quote_json(&raw).expect("fixture should parse");
    assert_eq!(quote.author, "Ralph Marston");
    assert!(quote.text.contains("tomorrows"));
}
