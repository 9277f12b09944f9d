//! Delayed effects advanced by the same tick loop as everything else.

use super::CharacterId;

/// Deferred work resolved when its timer runs out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimedAction {
    /// Move the top card of the character's draw pile into its hand.
    DrawCard { character: CharacterId },
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct TimedEntry<T> {
    remaining: f32,
    action: T,
}

/// Queue of `{remaining, action}` records.
///
/// Entries fire in insertion order among those that expire on the same tick.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimedQueue<T> {
    entries: Vec<TimedEntry<T>>,
}

impl<T> TimedQueue<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, delay: f32, action: T) {
        self.entries.push(TimedEntry {
            remaining: delay.max(0.0),
            action,
        });
    }

    /// Counts every timer down by `dt` and returns the expired actions.
    pub fn advance(&mut self, dt: f32) -> Vec<T> {
        for entry in &mut self.entries {
            entry.remaining -= dt;
        }
        let (expired, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|entry| entry.remaining <= 0.0);
        self.entries = pending;
        expired.into_iter().map(|entry| entry.action).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T> Default for TimedQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
