//! Per-song and per-user request cooldowns.
//!
//! # State per key
//!
//! ```text
//!   Free ──reserve──▶ Reserved ──commit──▶ Armed ──timer──▶ Free
//!                        │                   ▲
//!                        └──drop──▶ Free     └──arm (restarts timer)
//! ```
//!
//! Songs are keyed by catalogue index, users by lower-cased name. A missing
//! key is free. Every armed key owns an expiry timer; re-arming replaces the
//! timer with a fresh full-length one, and a superseded timer never clears
//! the newer entry.
//!
//! The privileged identity (the channel owner) never gets a user cooldown.
//! Songs it requests are still put on cooldown.

pub mod timer;

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, trace};

/// Cooldown lengths and the exempt identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CooldownPolicy {
    /// How long a song stays blocked after being queued
    pub song: Duration,
    /// How long a user waits between successful requests
    pub user: Duration,
    /// User exempt from user cooldowns
    pub privileged: Option<String>,
}

impl CooldownPolicy {
    pub fn new(song: Duration, user: Duration) -> Self {
        Self {
            song,
            user,
            privileged: None,
        }
    }

    /// Exempt `identity` from user cooldowns.
    pub fn with_privileged(mut self, identity: impl Into<String>) -> Self {
        self.privileged = Some(identity.into().to_lowercase());
        self
    }

    /// Check whether `username` is the exempt identity.
    pub fn is_privileged(&self, username: &str) -> bool {
        self.privileged
            .as_deref()
            .is_some_and(|p| p == user_key(username))
    }
}

/// Why a reservation was refused. Song is always checked first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Suppressed {
    #[error("song {index} is on cooldown for {remaining:?}")]
    Song { index: usize, remaining: Duration },
    #[error("user is on cooldown for {remaining:?}")]
    User { remaining: Duration },
}

#[derive(Debug)]
enum Slot {
    /// Held by an in-flight request, not yet timed
    Reserved,
    Armed {
        generation: u64,
        expires_at: Instant,
        timer: JoinHandle<()>,
    },
}

#[derive(Debug, Default)]
struct LedgerState {
    songs: HashMap<usize, Slot>,
    users: HashMap<String, Slot>,
    next_generation: u64,
}

type Select<K> = fn(&mut LedgerState) -> &mut HashMap<K, Slot>;

fn songs(state: &mut LedgerState) -> &mut HashMap<usize, Slot> {
    &mut state.songs
}

fn users(state: &mut LedgerState) -> &mut HashMap<String, Slot> {
    &mut state.users
}

fn user_key(username: &str) -> String {
    username.to_lowercase()
}

/// Shared cooldown state. Cloning yields another handle to the same ledger.
///
/// Arming spawns tokio tasks, so it must be called from within a runtime.
#[derive(Debug, Clone)]
pub struct CooldownLedger {
    inner: Arc<Mutex<LedgerState>>,
    policy: Arc<CooldownPolicy>,
}

impl CooldownLedger {
    pub fn new(policy: CooldownPolicy) -> Self {
        Self {
            inner: Arc::new(Mutex::new(LedgerState::default())),
            policy: Arc::new(policy),
        }
    }

    pub fn policy(&self) -> &CooldownPolicy {
        &self.policy
    }

    pub fn is_song_suppressed(&self, index: usize) -> bool {
        self.inner.lock().songs.contains_key(&index)
    }

    pub fn is_user_suppressed(&self, username: &str) -> bool {
        self.inner.lock().users.contains_key(&user_key(username))
    }

    /// Time left on a song's cooldown, `None` when free.
    pub fn song_remaining(&self, index: usize) -> Option<Duration> {
        let state = self.inner.lock();
        state.songs.get(&index).map(|s| remaining(s, self.policy.song))
    }

    /// Time left on a user's cooldown, `None` when free.
    pub fn user_remaining(&self, username: &str) -> Option<Duration> {
        let state = self.inner.lock();
        state
            .users
            .get(&user_key(username))
            .map(|s| remaining(s, self.policy.user))
    }

    /// Put a song and a user on cooldown.
    ///
    /// Each key gets its own timer. Arming a key that is already armed
    /// restarts its timer. The privileged identity's user key is left alone.
    pub fn arm(&self, index: usize, username: &str, song_cooldown: Duration, user_cooldown: Duration) {
        let mut state = self.inner.lock();
        self.arm_slot(&mut state, songs, index, song_cooldown);
        if !self.policy.is_privileged(username) {
            self.arm_slot(&mut state, users, user_key(username), user_cooldown);
        }
        debug!(index, user = %username, "Cooldowns armed");
    }

    /// Atomically check a song and user and hold both for one request.
    ///
    /// The song is checked before the user. On success both keys read as
    /// suppressed until the returned [`Reservation`] is committed (armed with
    /// the policy durations) or dropped (released).
    pub fn try_reserve(&self, index: usize, username: &str) -> Result<Reservation, Suppressed> {
        let mut state = self.inner.lock();

        if let Some(slot) = state.songs.get(&index) {
            return Err(Suppressed::Song {
                index,
                remaining: remaining(slot, self.policy.song),
            });
        }

        let user = (!self.policy.is_privileged(username)).then(|| user_key(username));
        if let Some(ref key) = user {
            if let Some(slot) = state.users.get(key) {
                return Err(Suppressed::User {
                    remaining: remaining(slot, self.policy.user),
                });
            }
            state.users.insert(key.clone(), Slot::Reserved);
        }
        state.songs.insert(index, Slot::Reserved);

        trace!(index, user = %username, "Reserved");
        Ok(Reservation {
            ledger: self.clone(),
            index,
            user,
            username: username.to_string(),
            committed: false,
        })
    }

    fn arm_slot<K>(&self, state: &mut LedgerState, select: Select<K>, key: K, duration: Duration)
    where
        K: Hash + Eq + Clone + Debug + Send + 'static,
    {
        state.next_generation += 1;
        let generation = state.next_generation;

        if duration.is_zero() {
            if let Some(Slot::Armed { timer, .. }) = select(state).remove(&key) {
                timer.abort();
            }
            return;
        }

        let weak = Arc::downgrade(&self.inner);
        let expiring = key.clone();
        let timer = timer::schedule(duration, move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let mut state = inner.lock();
            let map = select(&mut state);
            if matches!(map.get(&expiring), Some(Slot::Armed { generation: g, .. }) if *g == generation)
            {
                map.remove(&expiring);
                trace!(key = ?expiring, "Cooldown expired");
            }
        });

        let slot = Slot::Armed {
            generation,
            expires_at: Instant::now() + duration,
            timer,
        };
        if let Some(Slot::Armed { timer: previous, .. }) = select(state).insert(key, slot) {
            previous.abort();
        }
    }

    fn release(&self, index: usize, user: Option<&str>) {
        let mut state = self.inner.lock();
        if matches!(state.songs.get(&index), Some(Slot::Reserved)) {
            state.songs.remove(&index);
        }
        if let Some(key) = user {
            if matches!(state.users.get(key), Some(Slot::Reserved)) {
                state.users.remove(key);
            }
        }
    }
}

fn remaining(slot: &Slot, full: Duration) -> Duration {
    match slot {
        Slot::Reserved => full,
        Slot::Armed { expires_at, .. } => expires_at.saturating_duration_since(Instant::now()),
    }
}

/// Hold on a song (and non-exempt user) taken by [`CooldownLedger::try_reserve`].
///
/// Dropping without [`commit`](Reservation::commit) frees the held keys.
#[derive(Debug)]
#[must_use = "dropping a reservation releases it"]
pub struct Reservation {
    ledger: CooldownLedger,
    index: usize,
    user: Option<String>,
    username: String,
    committed: bool,
}

impl Reservation {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Turn the hold into timed cooldowns using the ledger's policy.
    pub fn commit(mut self) {
        let policy = self.ledger.policy.clone();
        self.ledger
            .arm(self.index, &self.username, policy.song, policy.user);
        self.committed = true;
    }
}

impl Drop for Reservation {
    fn drop(&mut self) {
        if !self.committed {
            self.ledger.release(self.index, self.user.as_deref());
            trace!(index = self.index, "Reservation released");
        }
    }
}
