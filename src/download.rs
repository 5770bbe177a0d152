use std::ffi::OsString;
use std::path::{Path, PathBuf};

use futures::StreamExt;
use tokio::fs::{remove_file, rename, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, trace};

use crate::error::MvngetError;
use crate::util::checked_http_body::CheckedHttpBody;
use crate::util::http_client::HttpClient;

/// Streams a URL's content into a local file.
///
/// The data goes to a sibling file with a ".part" suffix first, which replaces the destination only
///  after every byte was written and synced. On failure the partial file is removed, so an
///  existing destination file is never left half overwritten.
pub struct Downloader {
    http_client: HttpClient,
}
impl Downloader {
    pub fn new(http_client: HttpClient) -> Downloader {
        Downloader {
            http_client,
        }
    }

    /// returns the number of bytes written
    pub async fn download(&self, url: &str, dest: &Path) -> Result<u64, MvngetError> {
        let partial_path = partial_path(dest)
            .map_err(|e| MvngetError::download(url, e))?;

        let body = self.http_client.get_body(url)
            .await
            .map_err(|e| MvngetError::download(url, e))?;

        trace!("downloading {} to {}", url, partial_path.display());

        match Self::do_download(body, &partial_path, dest).await {
            Ok(len) => {
                debug!("downloaded {} bytes from {} to {}", len, url, dest.display());
                Ok(len)
            }
            Err(e) => {
                match remove_file(&partial_path).await {
                    Ok(_) => {}
                    Err(cleanup_error) => {
                        error!("error removing partial download {}: {}", partial_path.display(), cleanup_error);
                    }
                }
                Err(MvngetError::download(url, e))
            }
        }
    }

    /// Writes the body to `partial_path` and moves it to `dest`. On error, `partial_path` may
    ///  still exist.
    async fn do_download(mut body: CheckedHttpBody, partial_path: &Path, dest: &Path) -> anyhow::Result<u64> {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(partial_path)
            .await?;

        let mut len = 0u64;
        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            len += chunk.len() as u64;
        }

        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        rename(partial_path, dest).await?;
        Ok(len)
    }
}

fn partial_path(dest: &Path) -> anyhow::Result<PathBuf> {
    let file_name = dest.file_name()
        .ok_or_else(|| anyhow::anyhow!("destination {} is not a file path", dest.display()))?;

    let mut partial_name = OsString::from(file_name);
    partial_name.push(".part");
    Ok(dest.with_file_name(partial_name))
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use hyper::StatusCode;
    use super::*;
    use crate::util::test_server::TestServer;

    fn downloader() -> Downloader {
        Downloader::new(HttpClient::new("mvnget-test".to_string(), Some(Duration::from_secs(10))))
    }

    #[test]
    fn test_partial_path() {
        assert_eq!(partial_path(Path::new("/tmp/x/a.jar")).unwrap(), PathBuf::from("/tmp/x/a.jar.part"));
        assert_eq!(partial_path(Path::new("a.jar")).unwrap(), PathBuf::from("a.jar.part"));
        assert!(partial_path(Path::new("/")).is_err());
        assert!(partial_path(Path::new("x/..")).is_err());
    }

    #[tokio::test]
    async fn test_download() {
        let content = vec![7u8; 100_000];
        let server = TestServer::builder()
            .with("/a.jar", StatusCode::OK, content.clone())
            .start()
            .await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("a.jar");

        let len = downloader().download(&server.url("/a.jar"), &dest).await.unwrap();

        assert_eq!(len, 100_000);
        assert_eq!(std::fs::read(&dest).unwrap(), content);
        assert!(!dir.path().join("a.jar.part").exists());
    }

    #[tokio::test]
    async fn test_download_replaces_existing_file() {
        let server = TestServer::builder()
            .with("/a.jar", StatusCode::OK, "new")
            .start()
            .await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("a.jar");
        std::fs::write(&dest, "old content that is longer").unwrap();

        downloader().download(&server.url("/a.jar"), &dest).await.unwrap();

        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "new");
    }

    #[tokio::test]
    async fn test_not_found_leaves_destination_alone() {
        let server = TestServer::builder().start().await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("a.jar");
        std::fs::write(&dest, "old").unwrap();

        let result = downloader().download(&server.url("/a.jar"), &dest).await;

        assert!(matches!(result, Err(MvngetError::Download { .. })));
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "old");
        assert!(!dir.path().join("a.jar.part").exists());
    }

    #[tokio::test]
    async fn test_failed_rename_removes_partial_file() {
        let server = TestServer::builder()
            .with("/a.jar", StatusCode::OK, "data")
            .start()
            .await;
        let dir = tempfile::tempdir().unwrap();
        // a non-empty directory can not be replaced by a file
        let dest = dir.path().join("a.jar");
        std::fs::create_dir(&dest).unwrap();
        std::fs::write(dest.join("inside.txt"), "keep").unwrap();

        let result = downloader().download(&server.url("/a.jar"), &dest).await;

        assert!(matches!(result, Err(MvngetError::Download { .. })));
        assert!(!dir.path().join("a.jar.part").exists());
        assert_eq!(std::fs::read_to_string(dest.join("inside.txt")).unwrap(), "keep");
    }

    #[tokio::test]
    async fn test_unwritable_destination() {
        let server = TestServer::builder()
            .with("/a.jar", StatusCode::OK, "data")
            .start()
            .await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("no-such-dir").join("a.jar");

        let result = downloader().download(&server.url("/a.jar"), &dest).await;

        assert!(matches!(result, Err(MvngetError::Download { .. })));
        assert!(!dest.exists());
    }
}
