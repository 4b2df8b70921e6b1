//! A "liquid tank" gauge: a rounded vessel whose fill level shows a value
//! within `[min, max]`, optionally colored by value bands, animated between
//! values and re-laid out when its container resizes.
//!
//! ```no_run
//! use liquid_tank::{TankConfig, TankWindow};
//!
//! let config = TankConfig::builder().min(0.0).max(100.0).build();
//! TankWindow::new(config).with_initial_value(42.0).show()?;
//! # Ok::<(), liquid_tank::TankError>(())
//! ```

// ============================================================================
// MODULES
// ============================================================================

pub mod color;
pub mod config;
pub mod error;
pub mod fill;
pub mod geometry;
pub mod raster;
pub mod resize;
pub mod surface;
pub mod tank;
pub mod transition;
pub mod window;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use color::{Color, Theme};
pub use config::{
    FillStyle, FontSpec, RangeUpdate, Segment, TankConfig, TankOptions, ValueFormatter,
};
pub use error::{Result, TankError};
pub use fill::{resolve_fill_style, GradientStop, Paint};
pub use geometry::{
    compute_fill_rect, CornerRadii, FillRect, LayoutConstants, Point, Range, Rect, Size,
};
pub use raster::RasterSurface;
pub use resize::{DebouncedResize, ObservedResize, ResizeSource};
pub use surface::{Container, DrawCommand, DrawSurface, RecordingSurface, Scene};
pub use tank::{LiquidTank, TankCommand};
pub use transition::{
    ease_in_out_quart, FrameOutcome, FrameQueue, FrameScheduler, FrameTask, GaugeState,
    TransitionEngine, TRANSITION_DURATION,
};
pub use window::TankWindow;
