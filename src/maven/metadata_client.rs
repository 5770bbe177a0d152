use async_trait::async_trait;
use tracing::debug;

use crate::error::MvngetError;
use crate::maven::metadata_xml::Metadata;
use crate::util::http_client::HttpClient;

/// Where `maven-metadata.xml` documents come from
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn fetch_metadata(&self, url: &str) -> Result<Metadata, MvngetError>;
}

/// Fetches metadata documents over HTTP. Transport failures, non-2xx responses and documents that
///  do not parse all end up as [MvngetError::MetadataFetch].
pub struct MetadataClient {
    http_client: HttpClient,
}
impl MetadataClient {
    pub fn new(http_client: HttpClient) -> MetadataClient {
        MetadataClient {
            http_client,
        }
    }
}

#[async_trait]
impl MetadataSource for MetadataClient {
    async fn fetch_metadata(&self, url: &str) -> Result<Metadata, MvngetError> {
        debug!("fetching metadata {}", url);

        let bytes = self.http_client.get_bytes(url)
            .await
            .map_err(|e| MvngetError::metadata_fetch(url, e))?;
        let xml = std::str::from_utf8(&bytes)
            .map_err(|e| MvngetError::metadata_fetch(url, e))?;

        Metadata::parse(xml)
            .map_err(|e| MvngetError::metadata_fetch(url, e))
    }
}
