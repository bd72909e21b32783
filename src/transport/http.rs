use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Proxy;

use super::{
    FormValue, Transport, TransportBody, TransportError, TransportRequest, TransportResponse,
};
use crate::config::CredentialsMode;

/// Default transport over a pooled reqwest client.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build the production transport.
    ///
    /// Minimal production-friendly defaults (env-overridable):
    /// - `REALTY_HTTP_POOL_MAX_IDLE_PER_HOST` (default 32)
    /// - `REALTY_HTTP_POOL_IDLE_TIMEOUT_SECS` (default 90)
    /// - `REALTY_PROXY_URL`
    ///
    /// No client-level timeout is set: the request pipeline owns the
    /// deadline, so per-call overrides stay authoritative and dropping a
    /// timed-out call aborts the in-flight request.
    pub fn new(credentials: Option<CredentialsMode>) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder()
            .pool_max_idle_per_host(
                env::var("REALTY_HTTP_POOL_MAX_IDLE_PER_HOST")
                    .ok()
                    .and_then(|s| s.parse::<usize>().ok())
                    .unwrap_or(32),
            )
            .pool_idle_timeout(Some(Duration::from_secs(
                env::var("REALTY_HTTP_POOL_IDLE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(90),
            )));

        if matches!(
            credentials,
            Some(CredentialsMode::SameOrigin) | Some(CredentialsMode::Include)
        ) {
            builder = builder.cookie_store(true);
        }

        if let Ok(proxy_url) = env::var("REALTY_PROXY_URL") {
            if let Ok(proxy) = Proxy::all(&proxy_url) {
                builder = builder.proxy(proxy);
            }
        }

        let client = builder.build().map_err(TransportError::Http)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let mut req = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers);

        match request.body {
            Some(TransportBody::Json(bytes)) => {
                req = req.body(bytes);
            }
            Some(TransportBody::Multipart(form)) => {
                let mut multipart = reqwest::multipart::Form::new();
                for part in form.parts {
                    match part.value {
                        FormValue::Text(value) => {
                            multipart = multipart.text(part.name, value);
                        }
                        FormValue::Bytes {
                            data,
                            filename,
                            mime,
                        } => {
                            let mut p = reqwest::multipart::Part::bytes(data.to_vec());
                            if let Some(filename) = filename {
                                p = p.file_name(filename);
                            }
                            if let Some(mime) = mime {
                                p = p
                                    .mime_str(&mime)
                                    .map_err(|e| TransportError::Other(e.to_string()))?;
                            }
                            multipart = multipart.part(part.name, p);
                        }
                    }
                }
                req = req.multipart(multipart);
            }
            None => {}
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::Http(e)
            }
        })?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(TransportError::Http)?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}
