use crate::domain::{TrendItem, TrendMode};

fn search(title: &str, traffic: &str) -> TrendItem {
    TrendItem {
        title: title.to_string(),
        metric: Some(traffic.to_string()),
        tags: Vec::new(),
    }
}

fn story(title: &str, tags: &[&str]) -> TrendItem {
    TrendItem {
        title: title.to_string(),
        metric: None,
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

/// Canned daily trends served when the live feed is unusable, so consumers
/// never render an empty state.
pub fn daily_fallback() -> Vec<TrendItem> {
    vec![
        search("AI-powered productivity tools", "2M+"),
        search("Sustainable fashion brands", "1.5M+"),
        search("Smart home automation", "3M+"),
        search("Vintage collectibles marketplace", "800K+"),
        search("Plant-based protein products", "1.2M+"),
        search("Digital art NFT marketplace", "600K+"),
    ]
}

/// Canned realtime stories, same purpose as [`daily_fallback`].
pub fn realtime_fallback() -> Vec<TrendItem> {
    vec![
        story("Wireless charging accessories", &["Technology"]),
        story("Skincare routine essentials", &["Beauty"]),
        story("Gaming chair ergonomics", &["Gaming"]),
        story("Coffee subscription services", &["Food & Drink"]),
    ]
}

pub fn for_mode(mode: TrendMode) -> Vec<TrendItem> {
    match mode {
        TrendMode::Daily => daily_fallback(),
        TrendMode::Realtime => realtime_fallback(),
    }
}
