use anyhow::{Context, Result};
use reqwest::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchEngine {
    Google,
    GeminiWeb,
    GeminiQuickAsk,
    ChatGpt,
    Claude,
    Kimi,
    DuckDuckGo,
}

impl SearchEngine {
    pub const ALL: [SearchEngine; 7] = [
        SearchEngine::Google,
        SearchEngine::GeminiWeb,
        SearchEngine::GeminiQuickAsk,
        SearchEngine::ChatGpt,
        SearchEngine::Claude,
        SearchEngine::Kimi,
        SearchEngine::DuckDuckGo,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SearchEngine::Google => "Google",
            SearchEngine::GeminiWeb => "Gemini (Web)",
            SearchEngine::GeminiQuickAsk => "Gemini (Quick Ask)",
            SearchEngine::ChatGpt => "ChatGPT",
            SearchEngine::Claude => "Claude",
            SearchEngine::Kimi => "Kimi",
            SearchEngine::DuckDuckGo => "DuckDuckGo",
        }
    }

    /// Quick Ask answers inline instead of opening a browser tab.
    pub fn answers_inline(self) -> bool {
        self == SearchEngine::GeminiQuickAsk
    }

    pub fn next(self) -> SearchEngine {
        let idx = Self::ALL.iter().position(|e| *e == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> SearchEngine {
        let idx = Self::ALL.iter().position(|e| *e == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Destination URL for a query, or `None` when the engine answers inline.
/// Gemini Web and Kimi have no query parameter; the query rides along only
/// where the destination supports it.
pub fn search_url(engine: SearchEngine, query: &str) -> Option<String> {
    match engine {
        SearchEngine::Google => Some(with_query("https://www.google.com/search", query)),
        SearchEngine::GeminiWeb => Some("https://gemini.google.com/app".to_string()),
        SearchEngine::GeminiQuickAsk => None,
        SearchEngine::ChatGpt => Some(with_query("https://chatgpt.com/", query)),
        SearchEngine::Claude => Some(with_query("https://claude.ai/new", query)),
        SearchEngine::Kimi => Some("https://kimi.moonshot.cn/".to_string()),
        SearchEngine::DuckDuckGo => Some(with_query("https://duckduckgo.com/", query)),
    }
}

fn with_query(base: &str, query: &str) -> String {
    Url::parse_with_params(base, &[("q", query)])
        .map(|url| url.to_string())
        .unwrap_or_else(|_| base.to_string())
}

pub fn open_in_browser(url: &str) -> Result<()> {
    open::that(url).context("failed to launch browser")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_is_percent_encoded() {
        let url = search_url(SearchEngine::Google, "rust tui & more").expect("url");
        assert_eq!(url, "https://www.google.com/search?q=rust+tui+%26+more");
    }

    #[test]
    fn quick_ask_has_no_destination() {
        assert!(search_url(SearchEngine::GeminiQuickAsk, "anything").is_none());
    }

    #[test]
    fn kimi_and_gemini_web_ignore_the_query() {
        assert_eq!(
            search_url(SearchEngine::Kimi, "q").as_deref(),
            Some("https://kimi.moonshot.cn/")
        );
        assert_eq!(
            search_url(SearchEngine::GeminiWeb, "q").as_deref(),
            Some("https://gemini.google.com/app")
        );
    }

    #[test]
    fn engine_cycle_wraps_both_ways() {
        assert_eq!(SearchEngine::DuckDuckGo.next(), SearchEngine::Google);
        assert_eq!(SearchEngine::Google.prev(), SearchEngine::DuckDuckGo);
    }
}
