//! The external mode signal.
//!
//! A gesture classifier (or a keyboard, or a test) decides whether the tree
//! should be aggregated or scattered. It runs at its own cadence on its own
//! thread; the scene reads the latest value once per frame. There is exactly
//! one writer and one reader, so a single atomic byte is all the
//! synchronisation this needs.
//!
//! ```ignore
//! let signal = ModeSignal::new(Mode::Aggregate);
//! let producer = signal.clone();
//! std::thread::spawn(move || {
//!     producer.apply_gesture("Open_Palm"); // -> Scatter
//! });
//! // in the render loop
//! scene.update(clock.tick(), &signal);
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Which formation the tree particles are heading for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Particles gather into the tree.
    #[default]
    Aggregate,
    /// Particles drift outward along their scatter vectors.
    Scatter,
}

impl Mode {
    /// The other mode.
    pub fn toggled(self) -> Mode {
        match self {
            Mode::Aggregate => Mode::Scatter,
            Mode::Scatter => Mode::Aggregate,
        }
    }

    /// Decode a raw wire value. Unknown values give `None`.
    pub fn from_u8(raw: u8) -> Option<Mode> {
        match raw {
            0 => Some(Mode::Aggregate),
            1 => Some(Mode::Scatter),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            Mode::Aggregate => 0,
            Mode::Scatter => 1,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Aggregate => write!(f, "aggregate"),
            Mode::Scatter => write!(f, "scatter"),
        }
    }
}

/// Error returned when a string names no mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMode(pub String);

impl fmt::Display for UnknownMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown mode '{}': expected 'aggregate' or 'scatter'", self.0)
    }
}

impl std::error::Error for UnknownMode {}

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aggregate" | "tree" => Ok(Mode::Aggregate),
            "scatter" => Ok(Mode::Scatter),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

/// Hand gestures reported by the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gesture {
    ClosedFist,
    OpenPalm,
    /// Any other category, including "no hand".
    Other(String),
}

impl Gesture {
    /// Gesture from a classifier category label such as `"Open_Palm"`.
    pub fn from_label(label: &str) -> Gesture {
        match label.trim() {
            "Closed_Fist" => Gesture::ClosedFist,
            "Open_Palm" => Gesture::OpenPalm,
            other => Gesture::Other(other.to_string()),
        }
    }

    /// Mode this gesture requests. Unmapped gestures request nothing.
    pub fn mode(&self) -> Option<Mode> {
        match self {
            Gesture::ClosedFist => Some(Mode::Aggregate),
            Gesture::OpenPalm => Some(Mode::Scatter),
            Gesture::Other(_) => None,
        }
    }
}

/// Shared, latest-value-wins mode cell.
///
/// Cloning gives another handle to the same cell.
#[derive(Debug, Clone)]
pub struct ModeSignal {
    value: Arc<AtomicU8>,
}

impl ModeSignal {
    pub fn new(initial: Mode) -> Self {
        Self {
            value: Arc::new(AtomicU8::new(initial.as_u8())),
        }
    }

    /// Current mode.
    #[inline]
    pub fn get(&self) -> Mode {
        // Only valid encodings are ever stored.
        Mode::from_u8(self.value.load(Ordering::Acquire)).unwrap_or_default()
    }

    pub fn set(&self, mode: Mode) {
        self.value.store(mode.as_u8(), Ordering::Release);
    }

    /// Store a raw value from an untyped producer.
    ///
    /// Unknown values are dropped and the last good mode is kept. Returns the
    /// mode in effect afterwards.
    pub fn store_raw(&self, raw: u8) -> Mode {
        match Mode::from_u8(raw) {
            Some(mode) => {
                self.set(mode);
                mode
            }
            None => {
                log::warn!("ignoring unknown mode value {}", raw);
                self.get()
            }
        }
    }

    /// Apply a classifier label. Returns the mode it set, if any.
    pub fn apply_gesture(&self, label: &str) -> Option<Mode> {
        let gesture = Gesture::from_label(label);
        let mode = gesture.mode();
        match mode {
            Some(mode) => self.set(mode),
            None => log::debug!("gesture {:?} maps to no mode", gesture),
        }
        mode
    }

    /// Flip between aggregate and scatter. Returns the new mode.
    pub fn toggle(&self) -> Mode {
        let toggle = |raw| Mode::from_u8(raw).map(|mode| mode.toggled().as_u8());
        match self.value.fetch_update(Ordering::AcqRel, Ordering::Acquire, toggle) {
            Ok(previous) => Mode::from_u8(previous).unwrap_or_default().toggled(),
            Err(_) => self.get(),
        }
    }
}

impl Default for ModeSignal {
    fn default() -> Self {
        Self::new(Mode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode() {
        assert_eq!("scatter".parse::<Mode>(), Ok(Mode::Scatter));
        assert_eq!(" Tree ".parse::<Mode>(), Ok(Mode::Aggregate));
        assert!("explode".parse::<Mode>().is_err());
    }

    #[test]
    fn test_raw_roundtrip() {
        for mode in [Mode::Aggregate, Mode::Scatter] {
            assert_eq!(Mode::from_u8(mode.as_u8()), Some(mode));
        }
        assert_eq!(Mode::from_u8(7), None);
    }

    #[test]
    fn test_unknown_raw_keeps_last_good() {
        let signal = ModeSignal::new(Mode::Scatter);
        assert_eq!(signal.store_raw(42), Mode::Scatter);
        assert_eq!(signal.get(), Mode::Scatter);
        assert_eq!(signal.store_raw(0), Mode::Aggregate);
    }

    #[test]
    fn test_gesture_mapping() {
        let signal = ModeSignal::default();
        assert_eq!(signal.apply_gesture("Open_Palm"), Some(Mode::Scatter));
        assert_eq!(signal.get(), Mode::Scatter);

        // Unmapped gestures are a no-op
        assert_eq!(signal.apply_gesture("Thumb_Up"), None);
        assert_eq!(signal.apply_gesture("None"), None);
        assert_eq!(signal.get(), Mode::Scatter);

        assert_eq!(signal.apply_gesture("Closed_Fist"), Some(Mode::Aggregate));
        assert_eq!(signal.get(), Mode::Aggregate);
    }

    #[test]
    fn test_clones_share_state() {
        let reader = ModeSignal::default();
        let writer = reader.clone();
        let handle = std::thread::spawn(move || writer.toggle());
        let written = handle.join().unwrap();
        assert_eq!(reader.get(), written);
        assert_eq!(written, Mode::Scatter);
    }

    #[test]
    fn test_concurrent_toggles_are_not_lost() {
        let signal = ModeSignal::new(Mode::Aggregate);
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let signal = signal.clone();
                std::thread::spawn(move || {
                    for _ in 0..1001 {
                        signal.toggle();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        // 4004 flips land back where they started
        assert_eq!(signal.get(), Mode::Aggregate);
    }
}
