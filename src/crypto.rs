use anyhow::{Context, Result};
use serde::Deserialize;

use crate::http_client::{fetch_json, http_client};

const COINGECKO_MARKETS_URL: &str = "https://api.coingecko.com/api/v3/coins/markets";
const COIN_IDS: &str = "bitcoin,ethereum,solana";

#[derive(Debug, Clone, PartialEq)]
pub struct CoinQuote {
    pub id: String,
    pub symbol: String,
    pub price_usd: f64,
    pub change_24h_pct: f64,
}

pub fn fetch_coin_quotes() -> Result<Vec<CoinQuote>> {
    let client = http_client()?;
    let url = format!(
        "{COINGECKO_MARKETS_URL}?vs_currency=usd&ids={COIN_IDS}&order=market_cap_desc&per_page=3&page=1&sparkline=false"
    );
    let body = fetch_json(client, &url, &[]).context("crypto request failed")?;
    parse_coin_quotes_json(&body)
}

#[derive(Debug, Deserialize)]
struct MarketCoin {
    id: String,
    symbol: String,
    #[serde(default)]
    current_price: Option<f64>,
    #[serde(default)]
    price_change_percentage_24h: Option<f64>,
}

pub fn parse_coin_quotes_json(raw: &str) -> Result<Vec<CoinQuote>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let coins: Vec<MarketCoin> =
        serde_json::from_str(trimmed).context("invalid crypto json")?;
    Ok(coins
        .into_iter()
        .map(|coin| CoinQuote {
            id: coin.id,
            symbol: coin.symbol.to_uppercase(),
            price_usd: coin.current_price.unwrap_or(0.0),
            change_24h_pct: coin.price_change_percentage_24h.unwrap_or(0.0),
        })
        .collect())
}
