use thiserror::Error;

/// Failures raised while bringing up or presenting a windowed canvas.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("framebuffer error: {0}")]
    Pixels(#[from] pixels::Error),
    #[error("framebuffer surface error: {0}")]
    Texture(#[from] pixels::TextureError),
}
