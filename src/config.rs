use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use hyper::Uri;
use serde::Deserialize;

use crate::error::MvngetError;
use crate::maven::coordinates::PackageCoordinate;

pub const DEFAULT_REPO: &str = "https://maven.doridian.net/repository/maven-snapshots/";
pub const DEFAULT_GROUP: &str = "net.md-5";

/// Where to look for packages and how to expand short package names. Read from a TOML file,
///  every key is optional:
///
/// ```toml
/// repo = "https://maven.doridian.net/repository/maven-snapshots/"
/// default_group = "net.md-5"
/// timeout_secs = 60
///
/// [aliases]
/// bungeecord = "net.md-5:bungeecord-bootstrap"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MvngetConfig {
    pub repo: String,
    pub default_group: String,
    pub aliases: BTreeMap<String, String>,
    pub user_agent: String,
    pub timeout_secs: Option<u64>,
}
impl Default for MvngetConfig {
    fn default() -> Self {
        MvngetConfig {
            repo: DEFAULT_REPO.to_string(),
            default_group: DEFAULT_GROUP.to_string(),
            aliases: BTreeMap::new(),
            user_agent: format!("mvnget/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: None,
        }
    }
}
impl MvngetConfig {
    pub fn load(path: &Path) -> Result<MvngetConfig, MvngetError> {
        let location = path.display().to_string();
        let toml_string = std::fs::read_to_string(path)
            .map_err(|e| MvngetError::Config {
                location: location.clone(),
                reason: "cannot read file".to_string(),
                source: Some(e.into()),
            })?;

        Self::parse(&toml_string, &location)
    }

    /// `location` is only used in error messages
    pub fn parse(toml_string: &str, location: &str) -> Result<MvngetConfig, MvngetError> {
        let config: MvngetConfig = toml::from_str(toml_string)
            .map_err(|e| MvngetError::Config {
                location: location.to_string(),
                reason: "not a valid configuration file".to_string(),
                source: Some(e.into()),
            })?;

        config.validated(location)
    }

    /// Checks the repository URI and the aliases, and normalizes the repository URI to end
    ///  with '/'
    pub fn validated(mut self, location: &str) -> Result<MvngetConfig, MvngetError> {
        let config_error = |reason: String| MvngetError::Config {
            location: location.to_string(),
            reason,
            source: None,
        };

        if !self.repo.ends_with('/') {
            self.repo.push('/');
        }

        let uri = Uri::try_from(self.repo.as_str())
            .map_err(|e| MvngetError::Config {
                location: location.to_string(),
                reason: format!("invalid repo {:?}", self.repo),
                source: Some(e.into()),
            })?;
        if !matches!(uri.scheme_str(), Some("http") | Some("https")) {
            return Err(config_error(format!("repo {:?} is not an http(s) URL", self.repo)));
        }

        if self.default_group.is_empty() {
            return Err(config_error("empty default_group".to_string()));
        }

        for (alias, target) in &self.aliases {
            if let Err(e) = PackageCoordinate::parse(target) {
                return Err(config_error(format!("alias {:?}: {}", alias, e)));
            }
        }

        Ok(self)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
