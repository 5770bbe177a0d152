use std::time::Duration;

use anyhow::anyhow;
use bytes::Bytes;
use hyper::{Body, Client, Request, Response, StatusCode, Uri};
use hyper::body::to_bytes;
use hyper::client::HttpConnector;
use hyper::header::{CONTENT_LENGTH, LOCATION, USER_AGENT};
use hyper_tls::HttpsConnector;
use tracing::{debug, trace};

use crate::util::checked_http_body::CheckedHttpBody;

const MAX_REDIRECTS: usize = 5;

/// Plain HTTP(S) GET with a fixed user agent, following redirects and failing on non-2xx status.
///
/// Instances do HTTP connection caching internally, so the metadata requests and the download of
///  a run share one instance.
#[derive(Clone)]
pub struct HttpClient {
    client: Client<HttpsConnector<HttpConnector>>,
    user_agent: String,
    timeout: Option<Duration>,
}
impl HttpClient {
    pub fn new(user_agent: String, timeout: Option<Duration>) -> HttpClient {
        HttpClient {
            client: Client::builder()
                .build::<_, Body>(HttpsConnector::new()),
            user_agent,
            timeout,
        }
    }

    /// The response once its headers are in - the body is left for the caller to consume
    pub async fn get(&self, url: &str) -> anyhow::Result<Response<Body>> {
        let mut uri = Uri::try_from(url)?;

        for _ in 0..=MAX_REDIRECTS {
            let request = Request::builder()
                .method("GET")
                .uri(uri.clone())
                .header(USER_AGENT, &self.user_agent)
                .body(Body::empty())?;

            trace!("getting {:?}", request);

            let response = self.send(request).await?;
            let status = response.status();

            if is_redirect(status) {
                let location = response.headers().get(LOCATION)
                    .ok_or_else(|| anyhow!("redirect {} from {} without location", status, uri))?
                    .to_str()?;
                let target = resolve_location(&uri, location)?;
                debug!("following redirect {} from {} to {}", status, uri, target);
                uri = target;
                continue;
            }

            if !status.is_success() {
                return Err(anyhow!("GET {} failed: {}", uri, status));
            }
            return Ok(response);
        }

        Err(anyhow!("GET {} failed: more than {} redirects", url, MAX_REDIRECTS))
    }

    pub async fn get_bytes(&self, url: &str) -> anyhow::Result<Bytes> {
        let response = self.get(url).await?;
        Ok(to_bytes(response.into_body()).await?)
    }

    pub async fn get_body(&self, url: &str) -> anyhow::Result<CheckedHttpBody> {
        let response = self.get(url).await?;

        let content_length = match response.headers().get(CONTENT_LENGTH) {
            Some(h) => Some(h.to_str()?.trim().parse::<u64>()?),
            None => None,
        };
        Ok(CheckedHttpBody::new(response.into_body(), content_length))
    }

    async fn send(&self, request: Request<Body>) -> anyhow::Result<Response<Body>> {
        match self.timeout {
            None => Ok(self.client.request(request).await?),
            Some(timeout) => {
                let uri = request.uri().clone();
                match tokio::time::timeout(timeout, self.client.request(request)).await {
                    Ok(response) => Ok(response?),
                    Err(_) => Err(anyhow!("GET {} timed out after {:?}", uri, timeout)),
                }
            }
        }
    }
}

fn is_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}

/// Resolves a `Location` header against the requested URI: absolute URLs, scheme relative
///  ("//host/path"), host relative ("/path") and document relative ("path", "../path") locations
///  are supported.
fn resolve_location(base: &Uri, location: &str) -> anyhow::Result<Uri> {
    if let Some(without_slashes) = location.strip_prefix("//") {
        let scheme = base.scheme_str().unwrap_or("http");
        return Ok(Uri::try_from(format!("{}://{}", scheme, without_slashes))?);
    }

    if let Ok(location_uri) = Uri::try_from(location) {
        if location_uri.scheme().is_some() {
            return Ok(location_uri);
        }
    }

    let (path, query) = match location.find('?') {
        Some(idx) => location.split_at(idx),
        None => (location, ""),
    };
    let path = if path.starts_with('/') {
        path.to_string()
    }
    else if path.is_empty() {
        base.path().to_string()
    }
    else {
        let base_path = base.path();
        let directory_end = base_path.rfind('/').map(|idx| idx + 1).unwrap_or(0);
        format!("{}{}", &base_path[..directory_end], path)
    };

    let mut parts = base.clone().into_parts();
    parts.path_and_query = Some(format!("{}{}", remove_dot_segments(&path), query).parse()?);
    Ok(Uri::from_parts(parts)?)
}

/// `path` starts with '/'
fn remove_dot_segments(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').skip(1).collect();
    let mut result: Vec<&str> = Vec::new();

    for (idx, segment) in segments.iter().enumerate() {
        let is_last = idx == segments.len() - 1;
        match *segment {
            "." => {}
            ".." => {
                result.pop();
            }
            s => {
                result.push(s);
                continue;
            }
        }
        // a trailing "." or ".." still denotes a directory
        if is_last {
            result.push("");
        }
    }

    format!("/{}", result.join("/"))
}
