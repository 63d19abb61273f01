//! Pingora-based HTTP handler that serves rendered PAC scripts.
//!
//! Every request is answered locally during the request phase: the
//! handler resolves the request's host, renders the PAC script and writes
//! a complete response, so nothing is ever proxied upstream. A truncated
//! render (bad custom template) is logged and the partial script is still
//! delivered.

use crate::renderer::{PacRenderer, RenderOutcome};
use async_trait::async_trait;
use bytes::Bytes;
use http::header;
use pingora_core::prelude::*;
use pingora_core::upstreams::peer::HttpPeer;
use pingora_http::{RequestHeader, ResponseHeader};
use pingora_proxy::{ProxyHttp, Session};
use tracing::{debug, warn};

/// MIME type browsers expect for PAC scripts.
pub const PAC_CONTENT_TYPE: &str = "application/x-ns-proxy-autoconfig";

/// Per-request context: the host the script was resolved against.
#[derive(Default)]
pub struct PacContext {
    pub host: String,
}

/// HTTP handler serving the rendered PAC script for every request.
pub struct PacHandler {
    renderer: PacRenderer,
}

impl PacHandler {
    /// Creates a handler around a configured renderer.
    pub fn new(renderer: PacRenderer) -> Self {
        Self { renderer }
    }

    /// Extracts the request host: `Host` header first, URI authority as
    /// fallback, empty string when neither is present.
    pub fn request_host(req: &RequestHeader) -> String {
        let host = req
            .headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if host.is_empty() {
            req.uri
                .authority()
                .map(|a| a.as_str())
                .unwrap_or("")
                .to_string()
        } else {
            host.to_string()
        }
    }

    /// Renders the PAC script for `host` into a ready-to-send response.
    ///
    /// A truncated render is logged at warn level; the partial body is
    /// still returned so the caller delivers whatever was produced.
    pub fn build_response(&self, host: &str) -> Result<(ResponseHeader, Bytes)> {
        let outcome = self.renderer.render(host);
        if let RenderOutcome::Truncated { error, .. } = &outcome {
            warn!(
                host = %host,
                error = %error,
                "PAC template rendered partially"
            );
        }

        let body = Bytes::from(outcome.into_output());
        let mut resp = ResponseHeader::build(200, Some(2))?;
        resp.insert_header(header::CONTENT_TYPE, PAC_CONTENT_TYPE)?;
        resp.insert_header(header::CONTENT_LENGTH, body.len().to_string())?;

        Ok((resp, body))
    }
}

#[async_trait]
impl ProxyHttp for PacHandler {
    type CTX = PacContext;

    fn new_ctx(&self) -> Self::CTX {
        PacContext::default()
    }

    /// Serves the PAC script and short-circuits the proxy flow.
    async fn request_filter(&self, session: &mut Session, ctx: &mut Self::CTX) -> Result<bool>
    where
        Self::CTX: Send + Sync,
    {
        let host = Self::request_host(session.req_header());
        ctx.host = host.clone();

        let (resp, body) = self.build_response(&host)?;
        session.write_response_header(Box::new(resp), false).await?;
        session.write_response_body(Some(body), true).await?;

        Ok(true)
    }

    /// Unreachable: every request is answered in `request_filter`.
    async fn upstream_peer(
        &self,
        _session: &mut Session,
        _ctx: &mut Self::CTX,
    ) -> Result<Box<HttpPeer>> {
        Err(Error::new(ErrorType::Custom(
            "pac handler answers all requests locally",
        )))
    }

    /// Logging after request completion.
    async fn logging(&self, session: &mut Session, _e: Option<&Error>, ctx: &mut Self::CTX) {
        let status = session
            .response_written()
            .map(|r| r.status.as_u16())
            .unwrap_or(0);

        debug!(
            host = %ctx.host,
            status = status,
            "PAC request completed"
        );
    }
}
