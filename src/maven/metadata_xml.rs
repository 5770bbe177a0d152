//! Typed view of `maven-metadata.xml`, see
//!  https://maven.apache.org/ref/3.9.5/maven-repository-metadata/repository-metadata.html
//!
//! The same file name holds two different documents: at the artifact level it lists the
//!  versions, at the level of a snapshot version it lists the timestamped files of the latest
//!  build. Both are read into the same structs, with everything the respective other document
//!  has left empty.

use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub artifact_id: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub versioning: Option<Versioning>,
}
impl Metadata {
    pub fn parse(xml: &str) -> Result<Metadata, serde_xml_rs::Error> {
        serde_xml_rs::from_str(xml)
    }

    /// all versions in document order
    pub fn versions(&self) -> Vec<&str> {
        self.versioning.as_ref()
            .and_then(|v| v.versions.as_ref())
            .map(|v| v.version.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn snapshot_versions(&self) -> &[SnapshotVersion] {
        self.versioning.as_ref()
            .and_then(|v| v.snapshot_versions.as_ref())
            .map(|v| v.snapshot_version.as_slice())
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.versioning.as_ref()?.snapshot.as_ref()
    }

    /// The first file that is the plain binary: extension "jar" and no classifier
    pub fn binary_snapshot(&self) -> Option<&SnapshotVersion> {
        self.snapshot_versions()
            .iter()
            .find(|s| s.extension == "jar" && !s.is_classified())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Versioning {
    #[serde(default)]
    pub latest: Option<String>,
    #[serde(default)]
    pub release: Option<String>,
    #[serde(default)]
    pub versions: Option<Versions>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub snapshot: Option<Snapshot>,
    #[serde(default)]
    pub snapshot_versions: Option<SnapshotVersions>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Versions {
    #[serde(default)]
    pub version: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub build_number: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotVersions {
    #[serde(default)]
    pub snapshot_version: Vec<SnapshotVersion>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SnapshotVersion {
    #[serde(default)]
    pub classifier: Option<String>,
    pub extension: String,
    /// timestamped version, e.g. "1.10-20160613.091022-3"
    pub value: String,
    #[serde(default)]
    pub updated: Option<String>,
}
impl SnapshotVersion {
    /// a blank `<classifier/>` counts as no classifier
    pub fn is_classified(&self) -> bool {
        self.classifier.as_deref()
            .map(|c| !c.trim().is_empty())
            .unwrap_or(false)
    }
}
