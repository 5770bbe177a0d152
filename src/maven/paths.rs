use crate::maven::coordinates::{MavenArtifactId, PackageCoordinate};

pub const METADATA_FILE_NAME: &str = "maven-metadata.xml";

/// The relative path of an artifact's directory inside a Maven repository, e.g.
///  "net/md-5/bungeecord-api" for "net.md-5:bungeecord-api"
pub fn as_maven_path(coordinate: &PackageCoordinate) -> String {
    format!(
        "{}/{}",
        coordinate.group_id.0.replace([':', '.'], "/"),
        coordinate.artifact_id.0,
    )
}

/// `repo_root` is expected to end with '/'
pub fn artifact_url(repo_root: &str, coordinate: &PackageCoordinate) -> String {
    format!("{}{}", repo_root, as_maven_path(coordinate))
}

pub fn metadata_url(directory_url: &str) -> String {
    format!("{}/{}", directory_url, METADATA_FILE_NAME)
}

/// `snapshot_value` is the timestamped version from the snapshot metadata, e.g.
///  "1.10-20160613.091022-3"
pub fn snapshot_jar_file_name(artifact_id: &MavenArtifactId, snapshot_value: &str) -> String {
    format!("{}-{}.jar", artifact_id.0, snapshot_value)
}
