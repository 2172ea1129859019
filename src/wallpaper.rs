use std::time::Duration;

// Curated dark/mountain/cyberpunk set.
const DEFAULT_WALLPAPERS: &[&str] = &[
    "https://images.unsplash.com/photo-1519681393798-38e43269d877?q=80&w=1920&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1555680202-c86f0e12f086?q=80&w=1920&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1483729558449-99ef09a8c325?q=80&w=1920&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1518098268026-4e1877a1c3d9?q=80&w=1920&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1515462277126-2dd0c162007a?q=80&w=1920&auto=format&fit=crop",
];

pub fn default_wallpapers() -> Vec<String> {
    DEFAULT_WALLPAPERS.iter().map(|s| s.to_string()).collect()
}

/// Index of the wallpaper to show after `elapsed` process time. Starts at 0
/// and advances by one (wrapping) every `rotation_hours` hours.
pub fn rotation_index(elapsed: Duration, rotation_hours: u32, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    let period_secs = u64::from(rotation_hours.max(1)) * 3600;
    ((elapsed.as_secs() / period_secs) as usize) % count
}

/// Short display name for a wallpaper URL: the last path segment, stripped of
/// any query string.
pub fn wallpaper_name(url: &str) -> &str {
    let without_query = url.split('?').next().unwrap_or(url);
    without_query
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(without_query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_starts_at_zero_and_advances_every_period() {
        let hours = 3;
        let len = 5;
        assert_eq!(rotation_index(Duration::from_secs(0), hours, len), 0);
        assert_eq!(rotation_index(Duration::from_secs(3 * 3600 - 1), hours, len), 0);
        assert_eq!(rotation_index(Duration::from_secs(3 * 3600), hours, len), 1);
        assert_eq!(rotation_index(Duration::from_secs(6 * 3600), hours, len), 2);
        assert_eq!(rotation_index(Duration::from_secs(15 * 3600), hours, len), 0);
        assert_eq!(rotation_index(Duration::from_secs(18 * 3600), hours, len), 1);
    }

    #[test]
    fn rotation_tolerates_empty_list_and_zero_hours() {
        assert_eq!(rotation_index(Duration::from_secs(7200), 3, 0), 0);
        // Zero hours is clamped to one, not a division by zero.
        assert_eq!(rotation_index(Duration::from_secs(3600), 0, 5), 1);
    }

    #[test]
    fn wallpaper_name_strips_query_and_path() {
        assert_eq!(
            wallpaper_name("https://images.unsplash.com/photo-123?q=80&w=1920"),
            "photo-123"
        );
        assert_eq!(wallpaper_name("plain-name"), "plain-name");
    }
}
