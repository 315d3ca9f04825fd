// crates/forgeboard-render/src/lib.rs
//
// Interface seam to the presentation layer. The core never renders;
// backends implement these traits against whatever technology they use
// and must not perform dependency or geometry computation themselves.

use forgeboard_core::{WidgetId, WidgetKind};
use glam::Vec2;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Renderer initialization failed: {0}")]
    InitializationFailed(String),
    #[error("Render operation failed: {0}")]
    RenderFailed(String),
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
}

pub type RenderResult<T> = std::result::Result<T, RenderError>;

/// High-level drawing commands derived from the widget collection.
#[derive(Debug, Clone)]
pub enum ViewCommand {
    DrawWidget {
        id: WidgetId,
        kind: WidgetKind,
        title: String,
        position: Vec2,
        size: Vec2,
    },
    /// Connection from a feature widget to the external service it
    /// implies.
    DrawLink { from: WidgetId, to: WidgetId },
}

/// Canvas backend contract. Implementations live outside the core.
pub trait CanvasRenderer {
    type Output;

    /// Begin a frame over a viewport of the given canvas-space size.
    fn begin_frame(&mut self, viewport: Vec2) -> RenderResult<()>;

    /// Execute a batch of drawing commands.
    fn execute_commands(&mut self, commands: &[ViewCommand]) -> RenderResult<()>;

    /// Finish the frame and hand back whatever the backend produces.
    fn end_frame(&mut self) -> RenderResult<Self::Output>;
}
