use anyhow::{Context, Result};
use serde::Deserialize;

use crate::http_client::{fetch_json, http_client};

const OPEN_METEO_URL: &str = "https://api.open-meteo.com/v1/forecast";

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub temperature_c: f64,
    pub weather_code: u16,
    pub is_day: bool,
}

pub fn fetch_weather(lat: f64, lon: f64) -> Result<WeatherSnapshot> {
    let client = http_client()?;
    let url = format!(
        "{OPEN_METEO_URL}?latitude={lat}&longitude={lon}&current=temperature_2m,weather_code,is_day"
    );
    let body = fetch_json(client, &url, &[]).context("weather request failed")?;
    parse_weather_json(&body)
}

#[derive(Debug, Deserialize)]
struct MeteoResponse {
    current: MeteoCurrent,
}

#[derive(Debug, Deserialize)]
struct MeteoCurrent {
    #[serde(rename = "temperature_2m")]
    temperature: f64,
    weather_code: u16,
    is_day: u8,
}

pub fn parse_weather_json(raw: &str) -> Result<WeatherSnapshot> {
    let data: MeteoResponse =
        serde_json::from_str(raw.trim()).context("invalid weather json")?;
    Ok(WeatherSnapshot {
        temperature_c: data.current.temperature,
        weather_code: data.current.weather_code,
        is_day: data.current.is_day == 1,
    })
}

// WMO weather interpretation codes (WW).
pub fn describe_weather_code(code: u16) -> &'static str {
    match code {
        0 => "Clear Sky",
        1..=3 => "Partly Cloudy",
        45..=48 => "Foggy",
        51..=55 => "Drizzle",
        61..=65 => "Rain",
        71..=77 => "Snow",
        80..=82 => "Showers",
        95.. => "Thunderstorm",
        _ => "Unknown",
    }
}
