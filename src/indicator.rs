//! Single-pixel status indicator
//!
//! The indicator is the only failure channel guaranteed to be visible in
//! the field; each cycle drives it through the fixed color vocabulary.

use tracing::debug;

/// Status colors used by the cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusColor {
    /// Wifi association in progress
    Yellow,
    /// Wifi association established
    Green,
    /// Wifi association failed within the retry limit
    Red,
    /// Collector connect or transmit failed
    Magenta,
    /// Idle, pixel unlit
    Off,
}

impl StatusColor {
    /// RGB value rendered on the pixel
    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            StatusColor::Yellow => (255, 255, 0),
            StatusColor::Green => (0, 255, 0),
            StatusColor::Red => (255, 0, 0),
            StatusColor::Magenta => (255, 0, 255),
            StatusColor::Off => (0, 0, 0),
        }
    }
}

impl std::fmt::Display for StatusColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusColor::Yellow => write!(f, "yellow"),
            StatusColor::Green => write!(f, "green"),
            StatusColor::Red => write!(f, "red"),
            StatusColor::Magenta => write!(f, "magenta"),
            StatusColor::Off => write!(f, "off"),
        }
    }
}

/// A single-pixel display accepting a color
///
/// Pure side-effecting sink with no failure path.
pub trait StatusIndicator: Send {
    /// Set and immediately render a color
    fn show(&mut self, color: StatusColor);

    /// Clear the pixel
    fn off(&mut self) {
        self.show(StatusColor::Off);
    }
}

/// Host-bench indicator that renders onto the log instead of a pixel
#[derive(Debug, Default)]
pub struct LogIndicator;

impl StatusIndicator for LogIndicator {
    fn show(&mut self, color: StatusColor) {
        debug!(%color, rgb = ?color.rgb(), "status indicator");
    }
}

/// Test double that records every color it was asked to render
#[cfg(test)]
pub(crate) struct RecordingIndicator {
    pub(crate) history: std::sync::Arc<std::sync::Mutex<Vec<StatusColor>>>,
}

#[cfg(test)]
impl RecordingIndicator {
    pub(crate) fn new() -> (Self, std::sync::Arc<std::sync::Mutex<Vec<StatusColor>>>) {
        let history = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        (
            Self {
                history: history.clone(),
            },
            history,
        )
    }
}

#[cfg(test)]
impl StatusIndicator for RecordingIndicator {
    fn show(&mut self, color: StatusColor) {
        self.history.lock().unwrap().push(color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_vocabulary_maps_to_rgb() {
        assert_eq!(StatusColor::Yellow.rgb(), (255, 255, 0));
        assert_eq!(StatusColor::Magenta.rgb(), (255, 0, 255));
        assert_eq!(StatusColor::Off.rgb(), (0, 0, 0));
    }

    #[test]
    fn off_renders_unlit() {
        let (mut indicator, history) = RecordingIndicator::new();
        indicator.show(StatusColor::Green);
        indicator.off();
        assert_eq!(
            *history.lock().unwrap(),
            vec![StatusColor::Green, StatusColor::Off]
        );
    }
}
