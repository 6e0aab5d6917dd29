use std::fmt;
use std::path::{Path, PathBuf};

/// Failure while loading a shader, texture, or level from disk.
#[derive(Debug)]
pub enum AssetError {
    MissingFile {
        path: PathBuf,
    },
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    ImageDecode {
        path: PathBuf,
        source: image::ImageError,
    },
    ShaderCompile {
        name: String,
        message: String,
    },
    LevelParse {
        path: PathBuf,
        line: usize,
        message: String,
    },
    UnknownAsset {
        kind: AssetKind,
        name: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Shader,
    Texture,
}

impl AssetError {
    /// Maps a read failure to `MissingFile` when the file is absent, `Io` otherwise.
    pub fn from_io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            AssetError::MissingFile {
                path: path.to_path_buf(),
            }
        } else {
            AssetError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    pub fn is_missing_file(&self) -> bool {
        matches!(self, AssetError::MissingFile { .. })
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Shader => f.write_str("shader"),
            AssetKind::Texture => f.write_str("texture"),
        }
    }
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::MissingFile { path } => write!(f, "missing asset file {}", path.display()),
            AssetError::Io { path, .. } => write!(f, "failed to read {}", path.display()),
            AssetError::ImageDecode { path, .. } => {
                write!(f, "failed to decode image {}", path.display())
            }
            AssetError::ShaderCompile { name, message } => {
                write!(f, "shader `{name}` failed to compile: {message}")
            }
            AssetError::LevelParse {
                path,
                line,
                message,
            } => write!(f, "{}:{line}: {message}", path.display()),
            AssetError::UnknownAsset { kind, name } => write!(f, "no {kind} named `{name}`"),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Io { source, .. } => Some(source),
            AssetError::ImageDecode { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Requested level index is outside the loaded level list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelIndexError {
    pub index: usize,
    pub len: usize,
}

impl fmt::Display for LevelIndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "level {} out of range ({} levels loaded)",
            self.index, self.len
        )
    }
}

impl std::error::Error for LevelIndexError {}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, .. } => write!(f, "failed to read config {}", path.display()),
            ConfigError::Parse { path, source } => {
                write!(f, "invalid config {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}
