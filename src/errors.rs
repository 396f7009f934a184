#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Context initialization failed: {0}")]
    ContextInit(String),

    #[error("Drawing operation issued on a finalized context")]
    ContextNotDrawable,

    #[error("close_layer called without a matching start_layer")]
    UnbalancedLayer,

    #[error("Raster buffer requested before the surface was finalized")]
    SurfaceNotFinalized,

    #[error("Unsupported operation: {operation}")]
    Unsupported { operation: &'static str },
}
