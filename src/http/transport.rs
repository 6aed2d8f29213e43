//! Transport seam: anything that can turn a [`RequestDescriptor`] into an
//! [`InFlight`] transfer. `ReqwestTransport` is the default implementation.

use crate::http::request::RequestDescriptor;
use crate::http::transfer::InFlight;

/// Performs requests on behalf of the helper.
///
/// Implementations must be safe to share between concurrent requests. `send`
/// is called from inside the helper's task and must not block; the transfer
/// itself runs elsewhere and reports through a
/// [`TransferReporter`](crate::http::transfer::TransferReporter).
pub trait Transport: Send + Sync + 'static {
    fn send(&self, request: RequestDescriptor) -> InFlight;
}

#[cfg(feature = "http")]
pub use self::reqwest_transport::ReqwestTransport;
#[cfg(feature = "http")]
pub(crate) use self::reqwest_transport::parse_header;

#[cfg(feature = "http")]
mod reqwest_transport {
    use std::time::Duration;

    use bytes::{Bytes, BytesMut};
    use futures_util::StreamExt;
    use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
    use reqwest::Client;

    use super::Transport;
    use crate::error::HttpError;
    use crate::http::request::RequestDescriptor;
    use crate::http::transfer::{InFlight, RequestResult, TransferReporter};

    /// [`Transport`] backed by a shared `reqwest::Client`.
    ///
    /// Every request runs as its own tokio task, so `send` must be called
    /// from within a tokio runtime.
    #[derive(Debug, Clone)]
    pub struct ReqwestTransport {
        client: Client,
    }

    impl ReqwestTransport {
        /// Build a transport with an optional timeout and default headers.
        pub fn new(
            timeout: Option<Duration>,
            default_headers: &[(String, String)],
        ) -> Result<Self, HttpError> {
            let mut headers = HeaderMap::new();
            for (name, value) in default_headers {
                let (header_name, header_value) = parse_header(name, value)?;
                headers.insert(header_name, header_value);
            }

            let mut builder = Client::builder().default_headers(headers);
            if let Some(timeout) = timeout {
                builder = builder.timeout(timeout);
            }

            Ok(Self {
                client: builder.build()?,
            })
        }

        /// Wrap an already configured client.
        pub fn from_client(client: Client) -> Self {
            Self { client }
        }
    }

    /// Validate a header pair the way reqwest will put it on the wire.
    pub(crate) fn parse_header(
        name: &str,
        value: &str,
    ) -> Result<(HeaderName, HeaderValue), HttpError> {
        let invalid = |reason: String| HttpError::InvalidHeader {
            name: name.to_string(),
            reason,
        };
        let header_name = HeaderName::try_from(name).map_err(|e| invalid(e.to_string()))?;
        let header_value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
        Ok((header_name, header_value))
    }

    impl Transport for ReqwestTransport {
        fn send(&self, request: RequestDescriptor) -> InFlight {
            let (reporter, in_flight) = InFlight::channel();
            let task = tokio::spawn(transfer(self.client.clone(), request, reporter));
            in_flight.abort_on_drop(task.abort_handle())
        }
    }

    async fn transfer(client: Client, request: RequestDescriptor, reporter: TransferReporter) {
        let mut req = client.request(request.method().into(), request.url());
        for (name, value) in request.headers() {
            req = req.header(name, value);
        }
        if let Some(body) = request.body() {
            req = req.body(body.clone());
        }

        let resp = match req.send().await {
            Ok(resp) => resp,
            Err(e) => {
                reporter.fail(RequestResult::ConnectionError, 0, Bytes::new(), e.to_string());
                return;
            }
        };

        let status = resp.status();
        let code = i64::from(status.as_u16());
        let total = resp.content_length().filter(|len| *len > 0);

        let mut body = BytesMut::new();
        let mut chunks = resp.bytes_stream();
        while let Some(chunk) = chunks.next().await {
            match chunk {
                Ok(chunk) => {
                    body.extend_from_slice(&chunk);
                    if let Some(total) = total {
                        reporter.progress(body.len() as f32 / total as f32);
                    }
                }
                Err(e) => {
                    reporter.fail(
                        RequestResult::ConnectionError,
                        code,
                        body.freeze(),
                        e.to_string(),
                    );
                    return;
                }
            }
        }

        if status.is_client_error() || status.is_server_error() {
            reporter.fail(
                RequestResult::ProtocolError,
                code,
                body.freeze(),
                status.to_string(),
            );
        } else {
            reporter.succeed(code, body.freeze());
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_new_rejects_invalid_header_name() {
            let headers = vec![("bad header".to_string(), "v".to_string())];
            let err = ReqwestTransport::new(None, &headers).unwrap_err();
            assert!(matches!(err, HttpError::InvalidHeader { ref name, .. } if name == "bad header"));
        }

        #[test]
        fn test_new_rejects_invalid_header_value() {
            let headers = vec![("X-Game".to_string(), "line\nbreak".to_string())];
            assert!(matches!(
                ReqwestTransport::new(None, &headers),
                Err(HttpError::InvalidHeader { .. })
            ));
        }

        #[test]
        fn test_new_accepts_valid_headers() {
            let headers = vec![("X-Game".to_string(), "demo".to_string())];
            assert!(ReqwestTransport::new(Some(Duration::from_secs(5)), &headers).is_ok());
        }

        #[tokio::test]
        async fn test_progress_is_received_over_content_length() {
            use tokio::io::{AsyncReadExt, AsyncWriteExt};
            use tokio::net::TcpListener;
            use tokio::sync::oneshot;

            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            let (release_tx, release_rx) = oneshot::channel::<()>();

            // Sends 4 of 10 body bytes, then the rest once released.
            let server = tokio::spawn(async move {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = socket.read(&mut buf).await.unwrap();
                    assert!(n > 0, "client closed before sending headers");
                    request.extend_from_slice(&buf[..n]);
                }
                socket
                    .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\nabcd")
                    .await
                    .unwrap();
                socket.flush().await.unwrap();
                release_rx.await.unwrap();
                socket.write_all(b"efghij").await.unwrap();
                socket.flush().await.unwrap();
            });

            let transport = ReqwestTransport::new(None, &[]).unwrap();
            let mut in_flight = transport.send(RequestDescriptor::new(
                format!("http://{addr}/bundle"),
                crate::http::request::RequestMethod::Get,
            ));

            let partial = tokio::time::timeout(Duration::from_secs(5), async {
                loop {
                    let progress = in_flight.progress();
                    if progress > 0.0 {
                        return progress;
                    }
                    tokio::time::sleep(Duration::from_millis(1)).await;
                }
            })
            .await
            .expect("partial progress should be reported");
            assert!((partial - 0.4).abs() < f32::EPSILON);
            assert_eq!(in_flight.result(), RequestResult::InProgress);

            release_tx.send(()).unwrap();
            let state = in_flight.finished().await;
            server.await.unwrap();

            assert_eq!(state.result, RequestResult::Success);
            assert_eq!(state.progress, 1.0);
            assert_eq!(state.body.as_ref(), b"abcdefghij");
        }
    }
}
