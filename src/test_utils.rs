//! Test fixtures shared across modules.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{sample_catalogue, test_policy};
//!
//! let ledger = CooldownLedger::new(test_policy());
//! let catalogue = sample_catalogue();
//! ```

use std::time::Duration;

use crate::catalogue::Catalogue;
use crate::cooldown::CooldownPolicy;

/// Small catalogue covering the matcher's interesting cases.
///
/// | index | label                          |
/// |-------|--------------------------------|
/// | 0     | Artist A - Song One            |
/// | 1     | Artist B - Song One (Remix)    |
/// | 2     | Pegboard Nerds - Hero          |
/// | 3     | Tristam - Once Again           |
/// | 4     | Rogue - Adventures (Acapella)  |
pub fn sample_catalogue() -> Catalogue {
    Catalogue::from_labels([
        "Artist A - Song One",
        "Artist B - Song One (Remix)",
        "Pegboard Nerds - Hero",
        "Tristam - Once Again",
        "Rogue - Adventures (Acapella)",
    ])
}

/// 300s song cooldown, 60s user cooldown, "streamer" exempt.
pub fn test_policy() -> CooldownPolicy {
    CooldownPolicy::new(Duration::from_secs(300), Duration::from_secs(60)).with_privileged("streamer")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_catalogue_layout() {
        let catalogue = sample_catalogue();
        assert_eq!(catalogue.len(), 5);
        assert_eq!(catalogue.get(3).unwrap().display, "Tristam - Once Again");
    }

    #[test]
    fn test_policy_defaults() {
        let policy = test_policy();
        assert_eq!(policy.song, Duration::from_secs(300));
        assert!(policy.is_privileged("Streamer"));
    }
}
