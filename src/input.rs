/// Turning raw terminal key events into per-frame tap/hold input.
///
/// Terminals differ in what they report: some send a release event for
/// every key, most only send a burst of repeated presses while a key is
/// down.  [`KeyTracker`] handles both by timestamping every press and
/// treating a key as held while its last event is younger than
/// [`HOLD_WINDOW`].  All windows here are wall-clock durations, so the
/// behaviour is the same at any frame rate.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// A key counts as held while its last press/repeat is at most this old.
/// OS key repeat runs at 15 Hz or faster, so a held key refreshes well
/// before the window runs out.
pub const HOLD_WINDOW: Duration = Duration::from_millis(150);

/// Taps are ignored for this long after a run ends, so a player still
/// mashing the thruster does not skip the game-over screen.
pub const RESTART_LOCKOUT: Duration = Duration::from_millis(500);

// ── Held keys ─────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct KeyTracker<K> {
    last_seen: HashMap<K, Instant>,
    /// Set once the terminal has sent a release; from then on a key stays
    /// held until its release arrives.
    reports_release: bool,
}

impl<K> Default for KeyTracker<K> {
    fn default() -> Self {
        KeyTracker {
            last_seen: HashMap::new(),
            reports_release: false,
        }
    }
}

impl<K: Eq + Hash> KeyTracker<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press of `key`.  Returns true for a fresh tap, false when
    /// the key was already held (auto-repeat arriving as a press).
    pub fn press(&mut self, key: K, now: Instant) -> bool {
        let fresh = !self.is_held(&key, now);
        self.last_seen.insert(key, now);
        fresh
    }

    pub fn repeat(&mut self, key: K, now: Instant) {
        self.last_seen.insert(key, now);
    }

    pub fn release(&mut self, key: &K) {
        self.reports_release = true;
        self.last_seen.remove(key);
    }

    pub fn is_held(&self, key: &K, now: Instant) -> bool {
        match self.last_seen.get(key) {
            Some(_) if self.reports_release => true,
            Some(&last) => now.saturating_duration_since(last) <= HOLD_WINDOW,
            None => false,
        }
    }

    pub fn any_held<'a>(&self, keys: impl IntoIterator<Item = &'a K>, now: Instant) -> bool
    where
        K: 'a,
    {
        keys.into_iter().any(|key| self.is_held(key, now))
    }
}

// ── Restart lockout ───────────────────────────────────────────────────────────

/// Swallows taps until a deadline passes.
#[derive(Debug, Default, Clone, Copy)]
pub struct TapGate {
    closed_until: Option<Instant>,
}

impl TapGate {
    pub fn close_for(&mut self, now: Instant, lockout: Duration) {
        self.closed_until = Some(now + lockout);
    }

    pub fn allows(&self, now: Instant) -> bool {
        self.closed_until.map_or(true, |until| now >= until)
    }
}
