//! The gauge instance: owns its state and drives the draw capabilities.

use std::time::Instant;

use crate::color::Theme;
use crate::config::{RangeUpdate, Segment, TankConfig};
use crate::error::{Result, TankError};
use crate::fill::{resolve_fill_style, validate_segments};
use crate::geometry::{
    compute_fill_rect, fit_corners, gradient_axis, label_anchor, outline_rect, CornerRadii,
    LayoutConstants, Range, Size,
};
use crate::resize::{self, ResizeSource};
use crate::surface::{Container, DrawSurface};
use crate::transition::{FrameOutcome, FrameScheduler, FrameTask, GaugeState, TransitionEngine};

/// Command enum for updating a tank running in a window host
#[derive(Debug, Clone)]
pub enum TankCommand {
    SetValue(f64),
    SetRange(f64, f64),
    SetSegments(Vec<Segment>),
    Destroy,
}

pub struct LiquidTank<S: DrawSurface, F: FrameScheduler> {
    config: TankConfig,
    range: Range,
    layout: LayoutConstants,
    theme: Theme,
    state: GaugeState,
    engine: TransitionEngine,
    segment_error: Option<TankError>,
    surface: S,
    scheduler: F,
    container: Box<dyn Container>,
    resize: Box<dyn ResizeSource>,
    destroyed: bool,
}

impl<S: DrawSurface, F: FrameScheduler> LiquidTank<S, F> {
    /// Builds the gauge, draws it empty at `min` and starts listening for
    /// container resizes.
    ///
    /// An invalid range is an error. Malformed segments are not: they are
    /// logged, kept in [`Self::segment_error`], and the tank paints with the
    /// theme base color until [`Self::set_segments`] corrects them.
    pub fn new(
        config: TankConfig,
        surface: S,
        scheduler: F,
        container: Box<dyn Container>,
    ) -> Result<Self> {
        let range = Range::new(config.min, config.max);
        range.validate()?;
        let segment_error = validate_segments(&config.segments).err();
        if let Some(err) = &segment_error {
            log::warn!("{err}; painting with the base color");
        }

        let mut resize = resize::detect(container.as_ref());
        resize.attach();
        log::debug!("resize source: {resize:?}");

        let mut tank = Self {
            layout: LayoutConstants::from_font_size(config.font_size),
            theme: Theme::from_dark(config.dark),
            state: GaugeState::new(range.min),
            engine: TransitionEngine::new(),
            range,
            segment_error,
            config,
            surface,
            scheduler,
            container,
            resize,
            destroyed: false,
        };
        tank.render();
        Ok(tank)
    }

    pub fn config(&self) -> &TankConfig {
        &self.config
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn layout(&self) -> &LayoutConstants {
        &self.layout
    }

    pub fn state(&self) -> &GaugeState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }

    pub fn is_animating(&self) -> bool {
        self.engine.is_animating()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn segment_error(&self) -> Option<&TankError> {
        self.segment_error.as_ref()
    }

    pub fn set_value(&mut self, value: f64) {
        self.set_value_at(value, Instant::now());
    }

    /// Moves the liquid towards `value`, preempting any running animation.
    pub fn set_value_at(&mut self, value: f64, now: Instant) {
        if self.destroyed {
            log::warn!("set_value({value}) on a destroyed tank ignored");
            return;
        }
        match self.engine.set_target(&mut self.state, value, now) {
            Some(task) => self.scheduler.schedule_frame(task),
            None => self.render(),
        }
    }

    /// Runs one scheduled frame; returns `true` when something was drawn.
    pub fn run_frame(&mut self, task: FrameTask, now: Instant) -> bool {
        if self.destroyed {
            return false;
        }
        match self.engine.advance(task, &mut self.state, now) {
            FrameOutcome::Stale => false,
            FrameOutcome::Draw { value, finished } => {
                self.draw(value);
                if !finished {
                    self.scheduler.schedule_frame(task);
                }
                true
            }
        }
    }

    /// Re-measures the container and redraws at the displayed value.
    pub fn render(&mut self) {
        if self.destroyed {
            return;
        }
        let size = self.layout.floor_size(self.container.measure());
        self.state.canvas_width = size.width;
        self.state.canvas_height = size.height;
        self.surface.resize(size);
        self.draw(self.state.current_value);
    }

    /// Host callback for a container size change.
    pub fn notify_resize(&mut self, now: Instant) {
        if self.destroyed {
            return;
        }
        self.resize.notify(now);
        self.poll_resize(now);
    }

    /// Handles a pending resize once it is due; hosts call this every tick.
    pub fn poll_resize(&mut self, now: Instant) {
        if !self.destroyed && self.resize.poll(now) {
            self.relayout(now);
        }
    }

    fn relayout(&mut self, now: Instant) {
        log::debug!(
            "resize at displayed value {} (target {})",
            self.state.current_value,
            self.state.target_value
        );
        self.engine.cancel();
        self.render();
        if self.state.current_value != self.state.target_value {
            self.set_value_at(self.state.target_value, now);
        }
    }

    /// Changes `min` and/or `max`.
    ///
    /// On error the previous range stays in effect. On success the
    /// displayed value is redrawn against the new range; a running animation
    /// continues towards the same target.
    pub fn configure(&mut self, update: RangeUpdate) -> Result<()> {
        self.configure_at(update, Instant::now())
    }

    /// [`Self::configure`] on the host's clock: a transition restarted by the
    /// range change starts at `now`.
    pub fn configure_at(&mut self, update: RangeUpdate, now: Instant) -> Result<()> {
        let range = Range::new(
            update.min.unwrap_or(self.range.min),
            update.max.unwrap_or(self.range.max),
        );
        range.validate()?;
        self.range = range;
        self.config.min = range.min;
        self.config.max = range.max;
        if !self.engine.is_primed() {
            self.state.current_value = range.min;
            self.state.target_value = range.min;
        }
        log::debug!("range now [{}, {}]", range.min, range.max);
        self.relayout(now);
        Ok(())
    }

    /// Replaces the segment list. Malformed lists are reported and the tank
    /// falls back to the base color until a valid list is set.
    pub fn set_segments(&mut self, segments: Vec<Segment>) -> Result<()> {
        self.config.segments = segments;
        self.segment_error = validate_segments(&self.config.segments).err();
        self.render();
        match self.segment_error {
            Some(TankError::InvalidSegment { index, start, end }) => {
                let err = TankError::InvalidSegment { index, start, end };
                log::warn!("{err}; painting with the base color");
                Err(err)
            }
            _ => Ok(()),
        }
    }

    /// Tears the tank down. Calling it again does nothing.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.engine.cancel();
        self.resize.detach();
        self.surface.clear();
        self.destroyed = true;
        log::debug!("tank destroyed");
    }

    pub fn clear(&mut self) {
        self.destroy();
    }

    fn segments(&self) -> &[Segment] {
        if self.segment_error.is_some() {
            &[]
        } else {
            &self.config.segments
        }
    }

    fn draw(&mut self, value: f64) {
        let canvas = Size::new(self.state.canvas_width, self.state.canvas_height);
        let fill = match compute_fill_rect(value, &self.range, canvas, &self.layout) {
            Ok(fill) => fill,
            Err(err) => {
                log::error!("cannot draw tank: {err}");
                return;
            }
        };
        let paint = resolve_fill_style(
            value,
            &self.range,
            self.segments(),
            self.config.fill_style,
            self.theme,
        );

        self.surface.clear();

        let (outline, outline_radii) = fit_corners(
            outline_rect(canvas, &self.layout),
            CornerRadii::lower(self.layout.outer_radius),
        );
        self.surface
            .draw_outline(outline, outline_radii, self.theme.border());

        let (liquid, liquid_radii) =
            fit_corners(fill.rect(), CornerRadii::lower(self.layout.inner_radius));
        self.surface.draw_fill(
            liquid,
            liquid_radii,
            &paint,
            gradient_axis(canvas, &self.layout),
        );

        let text = self.config.value_formatter.format(self.state.target_value);
        self.surface.draw_label(
            &text,
            label_anchor(canvas, &self.layout),
            &self.config.font(),
            self.theme.text(),
        );
    }
}

impl<S: DrawSurface, F: FrameScheduler> Drop for LiquidTank<S, F> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<S: DrawSurface, F: FrameScheduler> LiquidTank<S, F> {
    /// Applies one command received from another thread.
    pub fn apply(&mut self, command: TankCommand, now: Instant) {
        match command {
            TankCommand::SetValue(value) => self.set_value_at(value, now),
            TankCommand::SetRange(min, max) => {
                if let Err(err) = self.configure_at(RangeUpdate::new(min, max), now) {
                    log::warn!("{err}");
                }
            }
            TankCommand::SetSegments(segments) => {
                // already logged by set_segments
                let _ = self.set_segments(segments);
            }
            TankCommand::Destroy => self.destroy(),
        }
    }
}
