//! Error taxonomy for loading and merging input files.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("malformed metadata file {path}: {source}")]
    MalformedMetadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("missing reading file {path}")]
    MissingTabularFile { path: PathBuf },
    #[error("reading file {path} has no rows")]
    EmptyTabularFile { path: PathBuf },
    #[error("malformed reading file {path}: {source}")]
    MalformedTabularFile {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("every consumption value in {path} is missing")]
    AllValuesMissing { path: PathBuf },
    #[error("no data found under {metadata_dir}, run data generation first")]
    NoData { metadata_dir: PathBuf },
}

impl LoadError {
    /// Whether the loader can skip the offending file and continue.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, LoadError::NoData { .. })
    }

    /// The file the error refers to, if any.
    pub fn path(&self) -> &PathBuf {
        match self {
            LoadError::MalformedMetadata { path, .. }
            | LoadError::MissingTabularFile { path }
            | LoadError::EmptyTabularFile { path }
            | LoadError::MalformedTabularFile { path, .. }
            | LoadError::AllValuesMissing { path } => path,
            LoadError::NoData { metadata_dir } => metadata_dir,
        }
    }
}
