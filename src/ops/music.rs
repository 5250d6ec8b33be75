//! Mood-based music recommendations.

use super::AppContext;
use crate::errors::{AppError, AppResult};
use tracing::debug;

/// A recommended track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Track {
    /// Track title.
    pub title: &'static str,
    /// Performing artist.
    pub artist: &'static str,
    /// Where the audio can be played from.
    pub url: &'static str,
}

const CATALOG: &[(&str, &[Track])] = &[
    (
        "Relaxed",
        &[
            Track {
                title: "Calm Ocean Waves",
                artist: "Nature Sounds",
                url: "https://samplelib.com/lib/preview/mp3/sample-3s.mp3",
            },
            Track {
                title: "Soft Piano",
                artist: "Piano Moods",
                url: "https://samplelib.com/lib/preview/mp3/sample-6s.mp3",
            },
        ],
    ),
    (
        "Happy",
        &[
            Track {
                title: "Upbeat Acoustic",
                artist: "Sunny Tunes",
                url: "https://samplelib.com/lib/preview/mp3/sample-9s.mp3",
            },
            Track {
                title: "Feel-Good Jazz",
                artist: "Smooth Jazz Band",
                url: "https://samplelib.com/lib/preview/mp3/sample-12s.mp3",
            },
        ],
    ),
    (
        "Focused",
        &[
            Track {
                title: "Deep Concentration",
                artist: "Ambient Works",
                url: "https://samplelib.com/lib/preview/mp3/sample-15s.mp3",
            },
            Track {
                title: "Coding Flow",
                artist: "Lo-Fi Beats",
                url: "https://samplelib.com/lib/preview/mp3/sample-18s.mp3",
            },
        ],
    ),
    (
        "Sleepy",
        &[
            Track {
                title: "Gentle Rain Sounds",
                artist: "Nature Ambience",
                url: "https://samplelib.com/lib/preview/mp3/sample-21s.mp3",
            },
            Track {
                title: "Slow Guitar",
                artist: "Dreamy Strings",
                url: "https://samplelib.com/lib/preview/mp3/sample-24s.mp3",
            },
        ],
    ),
];

/// Moods with recommendations, and their tracks.
pub fn music_catalog() -> &'static [(&'static str, &'static [Track])] {
    CATALOG
}

/// Picks a track for `mood`. With `another`, moves on to the next track in
/// the list, wrapping around.
///
/// # Errors
///
/// Returns `AppError::Cli` for a mood not in the catalog.
pub fn recommend_track(ctx: &mut AppContext, mood: &str, another: bool) -> AppResult<Track> {
    let Some((name, tracks)) = CATALOG
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(mood.trim()))
    else {
        let known: Vec<&str> = CATALOG.iter().map(|(name, _)| *name).collect();
        return Err(AppError::Cli(format!(
            "Unknown mood '{}'. Choose one of: {}",
            mood.trim(),
            known.join(", ")
        )));
    };

    let position = if another {
        ctx.session.advance_music(name, tracks.len())
    } else {
        ctx.session.music_position(name)
    };
    debug!("Recommending track {} for {}", position, name);

    tracks
        .get(position)
        .copied()
        .ok_or_else(|| AppError::Cli(format!("No tracks for mood '{}'", name)))
}
