use anyhow::{Context, Result};
use serde::Deserialize;

use crate::http_client::{fetch_json, http_client};

const QUOTE_URL: &str = "https://dummyjson.com/quotes/random";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteLine {
    pub text: String,
    pub author: String,
}

pub fn fetch_random_quote() -> Result<QuoteLine> {
    let client = http_client()?;
    let body = fetch_json(client, QUOTE_URL, &[]).context("quote request failed")?;
    parse_quote_json(&body)
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    quote: String,
    author: String,
}

pub fn parse_quote_json(raw: &str) -> Result<QuoteLine> {
    let data: QuoteResponse = serde_json::from_str(raw.trim()).context("invalid quote json")?;
    Ok(QuoteLine {
        text: data.quote,
        author: data.author,
    })
}

pub fn fallback_quote() -> QuoteLine {
    QuoteLine {
        text: "The only way to do great work is to love what you do.".to_string(),
        author: "Steve Jobs".to_string(),
    }
}
