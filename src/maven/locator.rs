use tracing::{debug, info};

use crate::error::MvngetError;
use crate::maven::coordinates::{MavenArtifactId, PackageCoordinate};
use crate::maven::metadata_client::MetadataSource;
use crate::maven::paths::{artifact_url, metadata_url, snapshot_jar_file_name};
use crate::maven::version::latest_version;

/// Everything needed to download the latest snapshot binary of a package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact {
    /// the artifact's directory, without version
    pub base_url: String,
    pub artifact_id: MavenArtifactId,
    pub version: String,
    /// timestamped version of the binary, e.g. "1.10-20160613.091022-3"
    pub snapshot_value: String,
}
impl ResolvedArtifact {
    pub fn version_url(&self) -> String {
        format!("{}/{}", self.base_url, self.version)
    }

    pub fn download_url(&self) -> String {
        format!("{}/{}", self.version_url(), snapshot_jar_file_name(&self.artifact_id, &self.snapshot_value))
    }
}

/// Finds the latest snapshot of a package with two metadata lookups: the artifact's version list,
///  then the snapshot file listing of the newest version.
pub struct ArtifactLocator<'a, M: MetadataSource> {
    metadata_source: &'a M,
    repo_root: &'a str,
}
impl <'a, M: MetadataSource> ArtifactLocator<'a, M> {
    /// `repo_root` must end with '/'
    pub fn new(metadata_source: &'a M, repo_root: &'a str) -> ArtifactLocator<'a, M> {
        ArtifactLocator {
            metadata_source,
            repo_root,
        }
    }

    pub async fn locate(&self, coordinate: &PackageCoordinate) -> Result<ResolvedArtifact, MvngetError> {
        let base_url = artifact_url(self.repo_root, coordinate);

        let versions_url = metadata_url(&base_url);
        let artifact_metadata = self.metadata_source.fetch_metadata(&versions_url).await?;

        let version = latest_version(artifact_metadata.versions())
            .ok_or_else(|| MvngetError::NoVersionsFound { url: versions_url.clone() })?
            .to_string();
        debug!("latest version of {} is {}", coordinate, version);

        let snapshots_url = metadata_url(&format!("{}/{}", base_url, version));
        let version_metadata = self.metadata_source.fetch_metadata(&snapshots_url).await?;

        let binary = version_metadata.binary_snapshot()
            .ok_or_else(|| MvngetError::NoBinarySnapshotFound {
                url: snapshots_url.clone(),
                version: version.clone(),
            })?;

        if let Some(snapshot) = version_metadata.snapshot() {
            info!(
                "resolved {} {} to build {} (timestamp {})",
                coordinate,
                version,
                snapshot.build_number.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string()),
                snapshot.timestamp.as_deref().unwrap_or("-"),
            );
        }

        Ok(ResolvedArtifact {
            base_url,
            artifact_id: coordinate.artifact_id.clone(),
            version,
            snapshot_value: binary.value.clone(),
        })
    }
}
