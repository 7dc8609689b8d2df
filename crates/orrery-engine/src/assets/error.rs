use std::path::PathBuf;

/// Failure to load an asset from disk.
#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    #[error("can't read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("can't decode image {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("{}:{line}: malformed vertex", .path.display())]
    MalformedVertex { path: PathBuf, line: usize },
    #[error("model {} has no vertices", .path.display())]
    EmptyModel { path: PathBuf },
}
