//! Error types for the renderer.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by configuration, scene validation and dispatch.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("scene has {0} primitives but no acceleration structure; call build_acceleration_structure first")]
    AccelerationStructureNotBuilt(usize),

    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to build worker thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to parse render configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("texture has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },

    #[error("texture pixel count {actual} does not match {width}x{height}")]
    SizeMismatch { width: u32, height: u32, actual: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    ImageError(#[from] image::ImageError),
}

pub type TextureResult<T> = Result<T, TextureError>;
