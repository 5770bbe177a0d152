use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Every way a single `mvnget` run can fail. None of these are retried - the first one aborts
///  the whole run.
#[derive(Debug, Error)]
pub enum MvngetError {
    #[error("invalid package {package:?}: {reason}")]
    Usage {
        package: String,
        reason: &'static str,
    },

    #[error("invalid configuration ({location}): {reason}")]
    Config {
        location: String,
        reason: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("failed to fetch metadata from {url}")]
    MetadataFetch {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("no version found in {url}")]
    NoVersionsFound {
        url: String,
    },

    #[error("no binary snapshot found for version {version} in {url}")]
    NoBinarySnapshotFound {
        url: String,
        version: String,
    },

    #[error("failed to download {url}")]
    Download {
        url: String,
        #[source]
        source: BoxError,
    },
}

impl MvngetError {
    pub fn metadata_fetch(url: &str, source: impl Into<BoxError>) -> MvngetError {
        MvngetError::MetadataFetch {
            url: url.to_string(),
            source: source.into(),
        }
    }

    pub fn download(url: &str, source: impl Into<BoxError>) -> MvngetError {
        MvngetError::Download {
            url: url.to_string(),
            source: source.into(),
        }
    }
}
