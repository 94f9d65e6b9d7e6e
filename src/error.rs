use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Failed to allocate a {width}x{height} pixel buffer")]
    Allocation { width: u32, height: u32 },
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("Grain size {grain_size} rendered a different image than grain size {reference}")]
    Inconsistent { grain_size: u32, reference: u32 },
    #[error("Failed to write image {path:?}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
