//! InputManager - tracks key state across frames, with a hold timeout for
//! terminals that never report key releases.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

// Most terminals only send repeats while a key is held. A held key whose
// repeats stop arriving within this window counts as released.
const HOLD_TIMEOUT_MS: u64 = 150;

/// Key identity, independent of which backend produced it.
/// Characters are stored lowercase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Up,
    Down,
    Left,
    Right,
    Tab,
    Enter,
    Escape,
}

/// A sink event, already translated out of the backend's own event type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Key { key: Key, pressed: bool },
    Resize { width: i32, height: i32 },
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum KeyState {
    JustPressed,
    Held,
}

pub struct InputManager {
    pressed: HashMap<Key, (KeyState, Instant)>,
    released: HashSet<Key>,
    hold_timeout: Option<Duration>,
}

impl InputManager {
    /// Manager for sinks that never report releases: a hold lapses when
    /// its repeats stop.
    pub fn new() -> Self {
        Self::with_hold_timeout(Some(Duration::from_millis(HOLD_TIMEOUT_MS)))
    }

    /// `None` trusts the backend to deliver every release event, so a
    /// quiet hold stays down indefinitely.
    pub fn with_hold_timeout(hold_timeout: Option<Duration>) -> Self {
        Self {
            pressed: HashMap::new(),
            released: HashSet::new(),
            hold_timeout,
        }
    }

    pub fn handle_key(&mut self, key: Key, pressed: bool) {
        let key = normalize(key);
        if pressed {
            // terminal repeats must not re-arm the just-pressed state
            let now = Instant::now();
            self.pressed
                .entry(key)
                .and_modify(|entry| entry.1 = now)
                .or_insert((KeyState::JustPressed, now));
        } else {
            self.pressed.remove(&key);
            self.released.insert(key);
        }
    }

    /// Down right now, whether fresh or held.
    #[inline]
    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains_key(&normalize(key))
    }

    /// Went down since the last `end_frame` - for toggles.
    #[inline]
    pub fn pressed_this_frame(&self, key: Key) -> bool {
        matches!(
            self.pressed.get(&normalize(key)),
            Some((KeyState::JustPressed, _))
        )
    }

    /// Released since the last `end_frame`.
    #[inline]
    pub fn was_released(&self, key: Key) -> bool {
        self.released.contains(&normalize(key))
    }

    /// Per-frame decay: fresh presses become holds, the released set is
    /// cleared, and stale holds expire (when a timeout is set).
    pub fn end_frame(&mut self) {
        self.released.clear();
        let timeout = self.hold_timeout;
        self.pressed.retain(|_, entry| {
            if let Some(timeout) = timeout {
                if entry.1.elapsed() > timeout {
                    return false;
                }
            }
            entry.0 = KeyState::Held;
            true
        });
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

//------------------
//  Internal stuff

#[inline]
fn normalize(key: Key) -> Key {
    match key {
        Key::Char(ch) => Key::Char(ch.to_ascii_lowercase()),
        other => other,
    }
}
