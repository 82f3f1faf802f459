//! Song request handling.
//!
//! A request goes through these steps:
//! 1. Normalize the query (empty → usage prompt)
//! 2. Find matching tracks and pick one (none → not found, logged in the background)
//! 3. Reserve the song and the requester in the cooldown ledger, song first
//! 4. Ask the player to queue the track
//! 5. Arm the cooldowns if the player accepted, release them otherwise
//!
//! Steps 3 to 5 hold a [`Reservation`](crate::cooldown::Reservation), so a
//! concurrent request for the same song sees it as taken while the first one
//! waits on the player, and unrelated requests are not held up.

mod outcome;

pub use outcome::Outcome;

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{error, info, warn};

use crate::catalogue::Catalogue;
use crate::cooldown::{CooldownLedger, Suppressed};
use crate::curation::UnmatchedQueryLog;
use crate::matcher::{self, MatchError};
use crate::player::TrackQueue;

/// Answers song requests against one catalogue.
pub struct RequestService {
    catalogue: Catalogue,
    ledger: CooldownLedger,
    queue: Arc<dyn TrackQueue>,
    unmatched: Arc<dyn UnmatchedQueryLog>,
    rng: Mutex<StdRng>,
}

impl RequestService {
    pub fn new(
        catalogue: Catalogue,
        ledger: CooldownLedger,
        queue: Arc<dyn TrackQueue>,
        unmatched: Arc<dyn UnmatchedQueryLog>,
    ) -> Self {
        Self {
            catalogue,
            ledger,
            queue,
            unmatched,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Replace the random source used to pick among matches.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn ledger(&self) -> &CooldownLedger {
        &self.ledger
    }

    /// Handle one request from `username`.
    ///
    /// Never panics: a fault inside matching, the ledger or the player
    /// collaborator is logged and reported as [`Outcome::Failed`].
    pub async fn handle_song_request(&self, username: &str, raw_query: &str) -> Outcome {
        let outcome = match AssertUnwindSafe(self.process(username, raw_query))
            .catch_unwind()
            .await
        {
            Ok(outcome) => outcome,
            Err(_) => {
                error!(user = %username, query = %raw_query, "Request handler panicked");
                Outcome::Failed
            }
        };
        info!(user = %username, query = %raw_query, outcome = outcome.label(), "Song request handled");
        outcome
    }

    async fn process(&self, username: &str, raw_query: &str) -> Outcome {
        let tokens = matcher::tokenize(raw_query);
        let candidates = match matcher::find_candidates(&self.catalogue, &tokens) {
            Ok(candidates) => candidates,
            Err(MatchError::EmptyQuery) => return Outcome::UsagePrompt,
        };

        let picked = {
            let mut rng = self.rng.lock();
            matcher::choose_candidate(&self.catalogue, &candidates, &mut *rng)
        };
        let Some(index) = picked else {
            self.record_unmatched(username, &tokens);
            return Outcome::NotFound { tokens };
        };
        let Some(display) = self.catalogue.get(index).map(|e| e.display.clone()) else {
            error!(index, "Picked index outside the catalogue");
            return Outcome::Failed;
        };

        let reservation = match self.ledger.try_reserve(index, username) {
            Ok(reservation) => reservation,
            Err(Suppressed::Song { index, remaining }) => {
                return Outcome::SongOnCooldown {
                    index,
                    display,
                    remaining,
                };
            }
            Err(Suppressed::User { remaining }) => return Outcome::UserOnCooldown { remaining },
        };

        match self.queue.enqueue(index).await {
            Ok(()) => {
                reservation.commit();
                Outcome::Enqueued {
                    index,
                    display,
                    candidates: candidates.len(),
                }
            }
            Err(e) => {
                warn!(index, error = %e, "Player did not queue track");
                drop(reservation);
                Outcome::EnqueueFailed {
                    index,
                    display,
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Hand an unmatched query to the curation log in the background.
    ///
    /// The reply never waits on the log, and a failing or panicking log
    /// cannot change the outcome.
    fn record_unmatched(&self, username: &str, tokens: &[String]) {
        let unmatched = Arc::clone(&self.unmatched);
        let username = username.to_string();
        let tokens = tokens.to_vec();
        tokio::spawn(async move {
            if let Err(e) = unmatched.record(&username, &tokens).await {
                warn!(user = %username, error = %e, "Failed to record unmatched query");
            }
        });
    }
}
