//! # Song Search
//!
//! Filters a fixed catalogue of songs by a free-text query.
//!
//! ## Matching
//! - Case-insensitive substring match against the artist **or** the song title
//! - Original catalogue order is kept, there is no ranking
//! - `relevance` is carried through from the catalogue as-is
//! - An empty query returns the whole catalogue
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub song: String,
    pub artist: String,
    pub relevance: f64,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
}

const CATALOGUE: [(&str, &str, f64); 3] = [
    ("Hotline Bling", "Drake", 0.98),
    ("One Dance", "Drake", 0.95),
    ("God's Plan", "Drake", 0.92),
];

pub fn catalogue() -> Vec<SearchResult> {
    CATALOGUE
        .iter()
        .map(|&(song, artist, relevance)| SearchResult {
            song: song.to_string(),
            artist: artist.to_string(),
            relevance,
        })
        .collect()
}

pub fn search_songs(query: &str) -> Vec<SearchResult> {
    let results = catalogue();

    if query.is_empty() {
        return results;
    }

    let needle = query.to_lowercase();

    results
        .into_iter()
        .filter(|r| {
            r.artist.to_lowercase().contains(&needle) || r.song.to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn songs(results: &[SearchResult]) -> Vec<&str> {
        results.iter().map(|r| r.song.as_str()).collect()
    }

    #[test]
    fn test_empty_query() {
        assert_eq!(search_songs(""), catalogue());
    }

    #[test]
    fn test_artist_case_insensitive() {
        assert_eq!(
            songs(&search_songs("dRaKe")),
            vec!["Hotline Bling", "One Dance", "God's Plan"]
        );
    }

    #[test]
    fn test_song_title() {
        let results = search_songs("dance");

        assert_eq!(songs(&results), vec!["One Dance"]);
        assert_eq!(results[0].relevance, 0.95);
    }

    #[test]
    fn test_order_preserved() {
        assert_eq!(songs(&search_songs("n")), vec!["Hotline Bling", "One Dance", "God's Plan"]);
        assert_eq!(songs(&search_songs("AN")), vec!["One Dance", "God's Plan"]);
    }

    #[test]
    fn test_no_match() {
        assert!(search_songs("Rihanna").is_empty());
    }
}
