use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkItem {
    pub label: String,
    pub url: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkGroup {
    pub title: String,
    pub items: Vec<LinkItem>,
}

/// Built-in link tree shown until the user saves a custom one.
pub fn default_link_groups() -> Vec<LinkGroup> {
    vec![
        group(
            "intel",
            vec![
                link("hacker-news", "https://news.ycombinator.com", "newspaper"),
                link("marginal-rev", "https://marginalrevolution.com", "trending"),
                link("less-wrong", "https://www.lesswrong.com", "brain"),
            ],
        ),
        group(
            "social",
            vec![link("twitter-x", "https://x.com", "bird")],
        ),
        group(
            "media",
            vec![
                link("youtube", "https://youtube.com", "video"),
                link("spotify", "https://open.spotify.com", "music"),
                link("netflix", "https://netflix.com", "cloud"),
            ],
        ),
        group(
            "dev",
            vec![
                link("github", "https://github.com", "git"),
                link("himalora", "https://himalora.com", "mountain"),
                link("himai", "https://himai.com.np", "code"),
            ],
        ),
    ]
}

fn group(title: &str, items: Vec<LinkItem>) -> LinkGroup {
    LinkGroup {
        title: title.to_string(),
        items,
    }
}

fn link(label: &str, url: &str, icon: &str) -> LinkItem {
    LinkItem {
        label: label.to_string(),
        url: url.to_string(),
        icon: icon.to_string(),
    }
}
