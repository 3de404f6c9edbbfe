//! Key-up emulation for terminals that only report presses.
//!
//! A held key auto-repeats, so a key counts as down for as long as presses
//! keep arriving. Once none has arrived for `hold`, it is reported as lifted.

use std::{
    collections::BTreeMap,
    time::{Duration, Instant},
};

pub struct KeyTracker {
    hold: Duration,
    last_seen: BTreeMap<char, Instant>,
}

impl KeyTracker {
    pub fn new(hold: Duration) -> Self {
        Self {
            hold,
            last_seen: BTreeMap::new(),
        }
    }

    /// Record a press or repeat. Returns `true` if the key was not already down.
    pub fn press(&mut self, key: char, now: Instant) -> bool {
        self.last_seen.insert(key, now).is_none()
    }

    /// Keys whose last press is at least `hold` old. They are forgotten.
    pub fn expire(&mut self, now: Instant) -> Vec<char> {
        let hold = self.hold;
        let mut lifted = Vec::new();
        self.last_seen.retain(|&key, &mut seen| {
            let down = now.saturating_duration_since(seen) < hold;
            if !down {
                lifted.push(key);
            }
            down
        });
        lifted
    }

    /// When the next key would expire, if any is down.
    pub fn next_expiry(&self) -> Option<Instant> {
        self.last_seen.values().min().map(|&seen| seen + self.hold)
    }

    pub fn is_down(&self, key: char) -> bool {
        self.last_seen.contains_key(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOLD: Duration = Duration::from_millis(600);

    #[test]
    fn repeats_keep_key_down() {
        let t0 = Instant::now();
        let mut keys = KeyTracker::new(HOLD);

        assert!(keys.press('a', t0));
        assert!(!keys.press('a', t0 + Duration::from_millis(500)));
        assert!(!keys.press('a', t0 + Duration::from_millis(530)));

        assert!(keys.expire(t0 + Duration::from_millis(1_000)).is_empty());
        assert!(keys.is_down('a'));
    }

    #[test]
    fn silence_lifts_key_once() {
        let t0 = Instant::now();
        let mut keys = KeyTracker::new(HOLD);
        keys.press('a', t0);
        keys.press('s', t0 + Duration::from_millis(300));

        assert_eq!(keys.expire(t0 + HOLD), vec!['a']);
        assert!(!keys.is_down('a'));
        assert!(keys.is_down('s'));
        assert_eq!(keys.next_expiry(), Some(t0 + Duration::from_millis(300) + HOLD));

        assert!(keys.expire(t0 + HOLD).is_empty());
        assert!(keys.press('a', t0 + HOLD), "pressing again is a fresh key-down");
    }

    #[test]
    fn nothing_down_means_no_expiry() {
        let keys = KeyTracker::new(HOLD);
        assert_eq!(keys.next_expiry(), None);
    }
}
