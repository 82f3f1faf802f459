//! The session's track catalogue.
//!
//! The catalogue is built once at startup from the labels handed over by the
//! playlist source and is read-only afterwards. Each entry keeps the position
//! it had in that sequence, which is also the position the player uses when
//! asked to queue it.

use std::sync::Arc;

/// A single track in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackEntry {
    /// Position in the catalogue (and in the player's playlist)
    pub index: usize,
    /// Label shown to users, usually "Artist - Title"
    pub display: String,
    /// Lower-cased `display`, used for matching
    folded: String,
}

impl TrackEntry {
    fn new(index: usize, display: String) -> Self {
        let folded = display.to_lowercase();
        Self {
            index,
            display,
            folded,
        }
    }

    /// Lower-cased display label.
    pub fn folded(&self) -> &str {
        &self.folded
    }
}

/// Ordered, immutable list of tracks available for requests.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    entries: Arc<[TrackEntry]>,
}

impl Catalogue {
    /// Build a catalogue, assigning indices in the order the labels arrive.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<TrackEntry> = labels
            .into_iter()
            .enumerate()
            .map(|(index, label)| TrackEntry::new(index, label.into()))
            .collect();
        Self {
            entries: entries.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by index.
    pub fn get(&self, index: usize) -> Option<&TrackEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackEntry> {
        self.entries.iter()
    }
}

/// Split a `playlist.json` body from foo_httpcontrol into track labels.
///
/// Entries are separated by `</br>`. An entry carrying markup (`...">label`)
/// is reduced to the text after the first `">`, with quotes removed. Other
/// entries are kept untouched so positions keep matching the player's
/// playlist. Trailing empty entries are dropped.
pub fn parse_playlist_body(body: &str) -> Vec<String> {
    let mut labels: Vec<String> = body
        .split("</br>")
        .map(|segment| match segment.split("\">").nth(1) {
            Some(label) => label.replace(['\'', '"'], ""),
            None => segment.to_string(),
        })
        .collect();

    while labels.last().is_some_and(|l| l.trim().is_empty()) {
        labels.pop();
    }
    labels
}
