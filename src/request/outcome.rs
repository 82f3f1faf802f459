//! Result of a single song request and its chat reply.

use std::time::Duration;

use crate::matcher::QueryTokens;

/// What happened to a song request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No search terms were given
    UsagePrompt,
    /// Nothing in the catalogue matched
    NotFound { tokens: QueryTokens },
    /// The picked song was queued recently
    SongOnCooldown {
        index: usize,
        display: String,
        remaining: Duration,
    },
    /// The requester has to wait before requesting again
    UserOnCooldown { remaining: Duration },
    /// The song was queued and cooldowns started
    Enqueued {
        index: usize,
        display: String,
        /// How many tracks matched the query
        candidates: usize,
    },
    /// The player did not accept the track; no cooldowns were started
    EnqueueFailed {
        index: usize,
        display: String,
        reason: String,
    },
    /// Unexpected internal fault
    Failed,
}

/// Whole seconds, rounded up so a cooldown never reads "0s" while active.
fn whole_seconds(d: Duration) -> u64 {
    d.as_secs() + u64::from(d.subsec_nanos() > 0)
}

impl Outcome {
    /// Short name for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::UsagePrompt => "usage",
            Outcome::NotFound { .. } => "not_found",
            Outcome::SongOnCooldown { .. } => "song_cooldown",
            Outcome::UserOnCooldown { .. } => "user_cooldown",
            Outcome::Enqueued { .. } => "enqueued",
            Outcome::EnqueueFailed { .. } => "enqueue_failed",
            Outcome::Failed => "failed",
        }
    }

    /// Chat reply addressed to `name`.
    ///
    /// `trigger` is the command as typed (e.g. `!sr`), `hint` is appended to
    /// the usage prompt.
    pub fn reply(&self, name: &str, trigger: &str, hint: &str) -> String {
        let body = match self {
            Outcome::UsagePrompt => {
                let usage = format!("Request songs with \"{} name\".", trigger);
                if hint.is_empty() {
                    usage
                } else {
                    format!("{} {}", usage, hint)
                }
            }
            Outcome::NotFound { tokens } => {
                format!("No song found for \"{}\".", tokens.join(" "))
            }
            Outcome::SongOnCooldown {
                display, remaining, ..
            } => format!(
                "\"{}\" was requested recently, try again in {}s.",
                display,
                whole_seconds(*remaining)
            ),
            Outcome::UserOnCooldown { remaining } => format!(
                "You can request another song in {}s.",
                whole_seconds(*remaining)
            ),
            Outcome::Enqueued {
                display,
                candidates,
                ..
            } if *candidates > 1 => {
                format!("{} songs found, queued \"{}\".", candidates, display)
            }
            Outcome::Enqueued { display, .. } => format!("Queued \"{}\".", display),
            Outcome::EnqueueFailed { display, .. } => {
                format!("Couldn't queue \"{}\" right now, try again later.", display)
            }
            Outcome::Failed => "Something went wrong handling that request.".to_string(),
        };
        format!("[@{}] {}", name, body)
    }
}
