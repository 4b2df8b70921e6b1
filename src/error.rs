//! Error types for the liquid tank gauge.

use thiserror::Error;

/// Errors reported by the gauge and its hosts.
#[derive(Debug, Error)]
pub enum TankError {
    /// `max` must be strictly greater than `min`.
    #[error("invalid range: max ({max}) must be greater than min ({min})")]
    InvalidRange { min: f64, max: f64 },

    /// A segment whose start does not precede its end.
    #[error("invalid segment #{index}: start ({start}) must be less than end ({end})")]
    InvalidSegment { index: usize, start: f64, end: f64 },

    #[error("unrecognized color: {0:?}")]
    ColorParse(String),

    #[error("font data could not be loaded")]
    Font,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("window error: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("pixels error: {0}")]
    Pixels(#[from] pixels::Error),
}

pub type Result<T> = std::result::Result<T, TankError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_error_message() {
        let err = TankError::InvalidRange { min: 5.0, max: 5.0 };
        assert_eq!(
            err.to_string(),
            "invalid range: max (5) must be greater than min (5)"
        );
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: TankError = io.into();
        assert!(matches!(err, TankError::Io(_)));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn segment_error_names_index() {
        let err = TankError::InvalidSegment {
            index: 2,
            start: 4.0,
            end: 1.5,
        };
        assert!(err.to_string().contains("#2"));
        assert!(err.to_string().contains("1.5"));
    }
}
