use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_core::{ready, Stream};
use hyper::Body;
use pin_project_lite::pin_project;

/// This struct wraps an HTTP body, allowing it to be consumed asynchronously without materializing
///  it, while checking that the number of bytes received matches the announced content length.
///  A connection that is closed early must not look like a complete download.
///
/// If the check fails, an error chunk is appended to the stream. Once a stream chunk with an error
///  was returned, this stream will stop polling from upstream and always return an error.
pin_project! {
    pub struct CheckedHttpBody {
        #[pin]
        http_body: Body,
        expected_len: Option<u64>,
        received_len: u64,
        is_failed: bool,
    }
}
impl CheckedHttpBody {
    pub fn new(http_body: Body, expected_len: Option<u64>) -> CheckedHttpBody {
        CheckedHttpBody {
            http_body,
            expected_len,
            received_len: 0,
            is_failed: false,
        }
    }
}

impl Stream for CheckedHttpBody {
    type Item = anyhow::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        if *this.is_failed {
            return Poll::Ready(Some(Err(anyhow::Error::msg("polling from failed stream"))));
        }

        let inner = ready!(this.http_body.poll_next(cx));
        match inner {
            Some(Ok(data)) => {
                *this.received_len += data.len() as u64;
                match *this.expected_len {
                    Some(expected) if *this.received_len > expected => {
                        *this.is_failed = true;
                        Poll::Ready(Some(Err(anyhow::anyhow!("received more than the announced {} bytes", expected))))
                    }
                    _ => Poll::Ready(Some(Ok(data))),
                }
            }
            None => {
                // wrapped HTTP body is fully drained -> check it was complete
                match *this.expected_len {
                    Some(expected) if *this.received_len != expected => {
                        *this.is_failed = true;
                        Poll::Ready(Some(Err(anyhow::anyhow!("body ended after {} of {} bytes", this.received_len, expected))))
                    }
                    _ => Poll::Ready(None),
                }
            }
            Some(Err(e)) => {
                *this.is_failed = true;
                Poll::Ready(Some(Err(e.into())))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.http_body.size_hint()
    }
}

#[cfg(test)]
mod test {
    use futures::StreamExt;
    use super::*;

    async fn drain(mut body: CheckedHttpBody) -> anyhow::Result<Vec<u8>> {
        let mut result = Vec::new();
        while let Some(chunk) = body.next().await {
            result.extend_from_slice(&chunk?);
        }
        Ok(result)
    }

    fn chunked(chunks: Vec<&'static str>) -> Body {
        let chunks = chunks.into_iter()
            .map(|c| Ok::<_, std::io::Error>(Bytes::from_static(c.as_bytes())));
        Body::wrap_stream(futures::stream::iter(chunks))
    }

    #[tokio::test]
    async fn test_without_content_length() {
        let body = CheckedHttpBody::new(chunked(vec!["abc", "def"]), None);
        assert_eq!(drain(body).await.unwrap(), b"abcdef");
    }

    #[tokio::test]
    async fn test_matching_content_length() {
        let body = CheckedHttpBody::new(chunked(vec!["abc", "def"]), Some(6));
        assert_eq!(drain(body).await.unwrap(), b"abcdef");
    }

    #[tokio::test]
    async fn test_truncated_body() {
        let body = CheckedHttpBody::new(chunked(vec!["abc"]), Some(6));
        assert!(drain(body).await.is_err());
    }

    #[tokio::test]
    async fn test_oversized_body() {
        let body = CheckedHttpBody::new(chunked(vec!["abc", "def"]), Some(4));
        assert!(drain(body).await.is_err());
    }

    #[tokio::test]
    async fn test_upstream_error_fails_stream() {
        let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
            Ok(Bytes::from_static(b"abc")),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
        ];
        let mut body = CheckedHttpBody::new(Body::wrap_stream(futures::stream::iter(chunks)), None);

        assert!(body.next().await.unwrap().is_ok());
        assert!(body.next().await.unwrap().is_err());
        assert!(body.next().await.unwrap().is_err());
    }
}
