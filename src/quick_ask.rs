use anyhow::{Context, Result};
use serde_json::{Value, json};

use crate::http_client::http_client;

const GEMINI_GENERATE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent";
const SYSTEM_INSTRUCTION: &str = "You are a concise, helpful dashboard assistant. \
     Give short, direct answers suitable for a quick look widget.";
const MAX_OUTPUT_TOKENS: u32 = 150;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuickAskOutcome {
    Answer(String),
    KeyMissing,
    KeyInvalid,
    Unavailable(String),
}

/// Never propagates an error: every failure collapses into an outcome the
/// widget can render inline.
pub fn quick_ask(api_key: &str, prompt: &str) -> QuickAskOutcome {
    let api_key = api_key.trim();
    if api_key.is_empty() {
        return QuickAskOutcome::KeyMissing;
    }
    match request_answer(api_key, prompt) {
        Ok(text) => QuickAskOutcome::Answer(text),
        Err(err) => {
            let message = format!("{err:#}");
            if looks_like_bad_key(&message) {
                QuickAskOutcome::KeyInvalid
            } else {
                QuickAskOutcome::Unavailable(message)
            }
        }
    }
}

fn looks_like_bad_key(message: &str) -> bool {
    let lowered = message.to_lowercase();
    lowered.contains("api key")
        || lowered.contains("api_key")
        || lowered.contains("http 400")
        || lowered.contains("http 403")
}

fn request_answer(api_key: &str, prompt: &str) -> Result<String> {
    let client = http_client()?;
    let url = format!("{GEMINI_GENERATE_URL}?key={api_key}");
    let payload = json!({
        "contents": [{ "parts": [{ "text": prompt }] }],
        "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
        "generationConfig": {
            "maxOutputTokens": MAX_OUTPUT_TOKENS,
            "thinkingConfig": { "thinkingBudget": 0 },
        },
    });
    let resp = client
        .post(&url)
        .json(&payload)
        .send()
        .context("quick ask request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow::anyhow!("http {}: {}", status, body));
    }
    parse_answer_json(&body)
}

pub fn parse_answer_json(raw: &str) -> Result<String> {
    let root: Value = serde_json::from_str(raw.trim()).context("invalid quick ask json")?;
    let parts = root
        .get("candidates")
        .and_then(|v| v.get(0))
        .and_then(|v| v.get("content"))
        .and_then(|v| v.get("parts"))
        .and_then(|v| v.as_array());

    let text = parts
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        Ok("No response generated.".to_string())
    } else {
        Ok(text.trim().to_string())
    }
}
