use thiserror::Error;

/// Failures the hero scene can hit. None of these reach the page: each one is
/// handled (usually logged) where it occurs.
#[derive(Debug, Error)]
pub enum HeroError {
    #[error("failed to fetch model `{path}`: {reason}")]
    Fetch { path: String, reason: String },

    #[error("failed to parse model: {0}")]
    Parse(#[from] gltf::Error),

    #[error("model has no triangle meshes")]
    EmptyModel,

    #[error("render surface error: {0}")]
    Surface(String),

    #[error("render surface is not attached")]
    Detached,

    #[error("graphics initialization failed: {0}")]
    Gpu(String),
}
