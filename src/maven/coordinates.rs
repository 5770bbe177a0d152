use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use crate::error::MvngetError;

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct MavenGroupId(pub String);

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct MavenArtifactId(pub String);

/// A package as `group:artifact`, without a version - the version is resolved from the
///  repository's metadata.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct PackageCoordinate {
    pub group_id: MavenGroupId,
    pub artifact_id: MavenArtifactId,
}
impl PackageCoordinate {
    /// Splits at the *first* ':'. Anything after it, including further colons, is the artifact id.
    pub fn parse(coordinate: &str) -> Result<PackageCoordinate, MvngetError> {
        let (group_id, artifact_id) = coordinate.split_once(':')
            .ok_or(MvngetError::Usage {
                package: coordinate.to_string(),
                reason: "expected group:artifact",
            })?;

        if group_id.is_empty() {
            return Err(MvngetError::Usage { package: coordinate.to_string(), reason: "empty group id" });
        }
        if artifact_id.is_empty() {
            return Err(MvngetError::Usage { package: coordinate.to_string(), reason: "empty artifact id" });
        }

        Ok(PackageCoordinate {
            group_id: MavenGroupId(group_id.to_string()),
            artifact_id: MavenArtifactId(artifact_id.to_string()),
        })
    }
}
impl Display for PackageCoordinate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.group_id.0, self.artifact_id.0)
    }
}

/// Turns what the user typed into a full coordinate: aliases are looked up first, a bare
///  artifact name gets the default group.
pub struct PackageResolver<'a> {
    aliases: &'a BTreeMap<String, String>,
    default_group: &'a str,
}
impl <'a> PackageResolver<'a> {
    pub fn new(aliases: &'a BTreeMap<String, String>, default_group: &'a str) -> PackageResolver<'a> {
        PackageResolver {
            aliases,
            default_group,
        }
    }

    pub fn resolve(&self, package: &str) -> Result<PackageCoordinate, MvngetError> {
        if let Some(aliased) = self.aliases.get(package) {
            return PackageCoordinate::parse(aliased);
        }

        if package.contains(':') {
            PackageCoordinate::parse(package)
        }
        else {
            PackageCoordinate::parse(&format!("{}:{}", self.default_group, package))
        }
    }
}
