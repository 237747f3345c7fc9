pub mod codec;
pub mod config;
pub mod coords;
pub mod drawing;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod plugin;
pub mod render;
pub mod session;
pub mod storage;
pub mod store;

pub use config::EngineConfig;
pub use coords::{ChartProjection, CoordinateMapper, LinearProjection};
pub use drawing::{Drawing, DrawingId, DrawingKind, DrawingPatch, ForeignId, Shape};
pub use error::{EngineError, EngineResult};
pub use plugin::AnnotationPlugin;
pub use render::{FrameScale, Painter};
pub use session::{PointerInput, SessionOutcome, ToolKind};
pub use storage::{DrawingRepository, FileRepository};

/// Entrypoint used by host integrations: installs logging, reads the user
/// config and returns a plugin ready to attach.
pub fn bootstrap() -> AnnotationPlugin {
    logging::init();
    let config = config::load_engine_config();
    tracing::info!(
        sticky_tools = ?config.sticky_tools,
        glow = config.glow,
        "starting chartmark"
    );
    AnnotationPlugin::new(&config)
}
