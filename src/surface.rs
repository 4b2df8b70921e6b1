//! Drawing and measuring capabilities the gauge is handed by its host.

use crate::color::Color;
use crate::config::FontSpec;
use crate::fill::Paint;
use crate::geometry::{CornerRadii, Point, Rect, Size};

/// The element the tank lives in.
pub trait Container {
    /// Current drawable area.
    fn measure(&self) -> Size;

    /// Whether the host pushes a notification for every size change.
    ///
    /// Hosts without this capability get debounced resize handling.
    fn observes_resize(&self) -> bool {
        false
    }
}

/// 2-D drawing target.
pub trait DrawSurface {
    /// Resizes the surface, discarding its content.
    fn resize(&mut self, size: Size);

    fn clear(&mut self);

    fn draw_outline(&mut self, rect: Rect, radii: CornerRadii, stroke: Color);

    /// Fills `rect`. Gradients run along `axis`, from offset 0 to offset 1.
    fn draw_fill(&mut self, rect: Rect, radii: CornerRadii, paint: &Paint, axis: (Point, Point));

    /// Draws `text` horizontally centered on `position`, which is the baseline.
    ///
    /// `font.family` names the face the host is expected to use; surfaces
    /// that carry their own font data may ignore it.
    fn draw_label(&mut self, text: &str, position: Point, font: &FontSpec, color: Color);
}

// ============================================================================
// RETAINED MODE ABSTRACTIONS
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear,
    Outline {
        rect: Rect,
        radii: CornerRadii,
        stroke: Color,
    },
    Fill {
        rect: Rect,
        radii: CornerRadii,
        paint: Paint,
        axis: (Point, Point),
    },
    Label {
        text: String,
        position: Point,
        font: FontSpec,
        color: Color,
    },
}

#[derive(Clone, Debug, Default)]
pub struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Replays the recorded commands onto another surface.
    pub fn render(&self, surface: &mut impl DrawSurface) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear => surface.clear(),
                DrawCommand::Outline {
                    rect,
                    radii,
                    stroke,
                } => surface.draw_outline(*rect, *radii, *stroke),
                DrawCommand::Fill {
                    rect,
                    radii,
                    paint,
                    axis,
                } => surface.draw_fill(*rect, *radii, paint, *axis),
                DrawCommand::Label {
                    text,
                    position,
                    font,
                    color,
                } => surface.draw_label(text, *position, font, *color),
            }
        }
    }
}

/// Surface that keeps every draw call it receives. Resizing only records
/// the new size; [`Self::forget`] drops the history.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    size: Size,
    scene: Scene,
    resizes: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn resize_count(&self) -> usize {
        self.resizes
    }

    /// Commands issued since the last `clear`, i.e. the current picture.
    pub fn last_frame(&self) -> &[DrawCommand] {
        let commands = self.scene.commands();
        let start = commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear))
            .map_or(0, |i| i + 1);
        &commands[start..]
    }

    pub fn frame_count(&self) -> usize {
        self.scene
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Clear))
            .count()
    }

    pub fn last_fill(&self) -> Option<(Rect, &Paint)> {
        self.last_frame().iter().find_map(|c| match c {
            DrawCommand::Fill { rect, paint, .. } => Some((*rect, paint)),
            _ => None,
        })
    }

    pub fn last_label(&self) -> Option<&str> {
        self.last_frame().iter().find_map(|c| match c {
            DrawCommand::Label { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn forget(&mut self) {
        self.scene = Scene::new();
    }
}

impl DrawSurface for RecordingSurface {
    fn resize(&mut self, size: Size) {
        self.size = size;
        self.resizes += 1;
    }

    fn clear(&mut self) {
        self.scene.add_command(DrawCommand::Clear);
    }

    fn draw_outline(&mut self, rect: Rect, radii: CornerRadii, stroke: Color) {
        self.scene.add_command(DrawCommand::Outline {
            rect,
            radii,
            stroke,
        });
    }

    fn draw_fill(&mut self, rect: Rect, radii: CornerRadii, paint: &Paint, axis: (Point, Point)) {
        self.scene.add_command(DrawCommand::Fill {
            rect,
            radii,
            paint: paint.clone(),
            axis,
        });
    }

    fn draw_label(&mut self, text: &str, position: Point, font: &FontSpec, color: Color) {
        self.scene.add_command(DrawCommand::Label {
            text: text.to_string(),
            position,
            font: font.clone(),
            color,
        });
    }
}
