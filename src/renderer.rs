//! Effective address/port resolution and PAC script rendering.
//!
//! The renderer holds the static configuration (override address, override
//! port, domain suffix, compiled template) and resolves the advertised
//! proxy endpoint per request:
//!
//! 1. Configured overrides always win.
//! 2. Otherwise the value is derived from the request's `host:port`.
//! 3. A port that cannot be derived falls back to 80; an address that
//!    cannot be derived falls back to the empty string.
//!
//! The request host is an explicit parameter of every method, so one
//! renderer is safely shared across concurrent requests.

use crate::config::PacConfig;
use crate::error::{PacError, Result};
use crate::template::{PacTemplate, TemplateValues};
use std::fmt::Write;
use tracing::trace;

/// Fallback port advertised when neither an override nor the request host
/// supplies one.
const DEFAULT_PORT: u16 = 80;

/// Renders PAC scripts for incoming requests.
#[derive(Debug, Clone)]
pub struct PacRenderer {
    /// Explicit proxy address to advertise; empty = derive from request.
    address: String,

    /// Explicit proxy port to advertise; 0 = derive from request.
    port: u16,

    /// Domain suffix that triggers proxying in the generated script.
    tld: String,

    /// Compiled script template.
    template: PacTemplate,
}

/// Outcome of a buffered render.
///
/// Rendering is best-effort: a template that references an unknown
/// placeholder still yields everything produced up to that point. The two
/// variants make the distinction explicit instead of discarding the error.
#[derive(Debug)]
pub enum RenderOutcome {
    /// The whole template was rendered.
    Complete(String),

    /// Rendering stopped early; `output` holds the prefix produced before
    /// the failure.
    Truncated { output: String, error: PacError },
}

impl RenderOutcome {
    /// The rendered text, complete or not.
    pub fn output(&self) -> &str {
        match self {
            Self::Complete(output) => output,
            Self::Truncated { output, .. } => output,
        }
    }

    /// Consumes the outcome, returning the rendered text.
    pub fn into_output(self) -> String {
        match self {
            Self::Complete(output) => output,
            Self::Truncated { output, .. } => output,
        }
    }

    /// Whether the whole template was rendered.
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }

    /// The error that stopped rendering, if any.
    pub fn error(&self) -> Option<&PacError> {
        match self {
            Self::Complete(_) => None,
            Self::Truncated { error, .. } => Some(error),
        }
    }
}

impl PacRenderer {
    /// Creates a renderer from a compiled template and static configuration.
    pub fn new(
        template: PacTemplate,
        address: impl Into<String>,
        port: u16,
        tld: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            port,
            tld: tld.into(),
            template,
        }
    }

    /// Creates a renderer from the `pac` configuration section, compiling
    /// the configured template or falling back to the built-in one.
    pub fn from_config(config: &PacConfig) -> Self {
        let template = match &config.template {
            Some(source) => PacTemplate::parse(source),
            None => PacTemplate::default(),
        };
        Self::new(template, config.address.clone(), config.port, config.tld.clone())
    }

    /// The address to advertise for a request from `request_host`.
    ///
    /// Returns the configured override when one is set, otherwise the host
    /// portion of `request_host`, otherwise the empty string.
    pub fn effective_address<'a>(&'a self, request_host: &'a str) -> &'a str {
        if !self.address.is_empty() {
            return &self.address;
        }
        split_host_port(request_host).0
    }

    /// The port to advertise for a request from `request_host`.
    ///
    /// Returns the configured override when non-zero, otherwise the port
    /// portion of `request_host`, otherwise 80 (also when the derived port
    /// is zero or unparseable).
    pub fn effective_port(&self, request_host: &str) -> u16 {
        if self.port != 0 {
            return self.port;
        }
        match split_host_port(request_host).1.parse::<u16>() {
            Ok(0) | Err(_) => DEFAULT_PORT,
            Ok(port) => port,
        }
    }

    /// The configured domain suffix.
    pub fn tld(&self) -> &str {
        &self.tld
    }

    /// Renders the PAC script for `request_host` into a string.
    pub fn render(&self, request_host: &str) -> RenderOutcome {
        let mut output = String::with_capacity(self.template.size_hint());
        match self.render_to(request_host, &mut output) {
            Ok(()) => RenderOutcome::Complete(output),
            Err(error) => RenderOutcome::Truncated { output, error },
        }
    }

    /// Renders the PAC script for `request_host` directly into `out`.
    ///
    /// On error the sink already holds the prefix produced before the
    /// failure; callers that forward it deliver a truncated script.
    pub fn render_to<W: Write>(&self, request_host: &str, out: &mut W) -> Result<()> {
        let values = TemplateValues {
            address: self.effective_address(request_host),
            port: self.effective_port(request_host),
            tld: &self.tld,
        };
        trace!(
            request_host = %request_host,
            address = %values.address,
            port = values.port,
            "Rendering PAC script"
        );
        self.template.render_to(&values, out)
    }
}

/// Splits a `host:port` string into its two parts.
///
/// The split is all-or-nothing: any input without a port (no colon, a
/// bracketed IPv6 literal like `[::1]`, or an unbracketed IPv6 literal)
/// yields `("", "")`. Bracketed IPv6 with a port splits into
/// `("[::1]", "8080")`.
fn split_host_port(raw: &str) -> (&str, &str) {
    let Some(colon) = raw.rfind(':') else {
        return ("", "");
    };
    if raw.starts_with('[') {
        // Bracketed IPv6 literal, e.g. [::1]:8080
        match raw.find(']') {
            Some(bracket) if colon > bracket => (&raw[..colon], &raw[colon + 1..]),
            _ => ("", ""),
        }
    } else if raw[..colon].contains(':') {
        // Unbracketed IPv6 literal; no way to tell host from port.
        ("", "")
    } else {
        (&raw[..colon], &raw[colon + 1..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::DEFAULT_TEMPLATE;
    use pretty_assertions::assert_eq;

    fn renderer(address: &str, port: u16, tld: &str) -> PacRenderer {
        PacRenderer::new(PacTemplate::default(), address, port, tld)
    }

    #[test]
    fn test_address_override_wins() {
        let this = renderer("donald.trump", 0, "");
        assert_eq!(this.effective_address("something.else:2016"), "donald.trump");
    }

    #[test]
    fn test_address_derived_from_request() {
        let this = renderer("", 0, "");
        assert_eq!(this.effective_address("also.trump:2016"), "also.trump");
    }

    #[test]
    fn test_address_empty_when_unparseable() {
        let this = renderer("", 0, "");
        assert_eq!(this.effective_address("bare-host"), "");
        assert_eq!(this.effective_address(""), "");
    }

    #[test]
    fn test_port_override_wins() {
        let this = renderer("", 2016, "");
        assert_eq!(this.effective_port("theywill.payforit:2020"), 2016);
    }

    #[test]
    fn test_port_derived_from_request() {
        let this = renderer("", 0, "");
        assert_eq!(this.effective_port("theywill.payforit:2020"), 2020);
    }

    #[test]
    fn test_port_defaults_to_80() {
        let this = renderer("", 0, "");
        assert_eq!(this.effective_port("no-port-here"), 80);
        assert_eq!(this.effective_port("zero.port:0"), 80);
        assert_eq!(this.effective_port("bad.port:abc"), 80);
        assert_eq!(this.effective_port(""), 80);
    }

    #[test]
    fn test_tld_accessor() {
        let this = renderer("", 0, "drumpf");
        assert_eq!(this.tld(), "drumpf");
    }

    #[test]
    fn test_render_default_template() {
        let this = renderer("1.2.3.4", 8080, "example.com");
        let outcome = this.render("www.example.com");

        assert!(outcome.is_complete());
        let script = outcome.output();
        assert!(script.contains("dnsDomainIs(host, 'example.com')"));
        assert!(script.contains("return 'PROXY 1.2.3.4:8080'"));
        assert!(script.contains("return 'DIRECT'"));
    }

    #[test]
    fn test_render_and_render_to_match() {
        let this = PacRenderer::new(
            PacTemplate::parse(DEFAULT_TEMPLATE),
            "",
            0,
            "drumpf",
        );

        let buffered = this.render("bling.drumpf:8080");
        let mut streamed = String::new();
        this.render_to("bling.drumpf:8080", &mut streamed).unwrap();

        assert!(buffered.is_complete());
        assert_eq!(buffered.output().as_bytes(), streamed.as_bytes());
    }

    #[test]
    fn test_render_truncated_keeps_prefix() {
        let this = PacRenderer::new(
            PacTemplate::parse("// {tld}\n{bogus}\nnever reached"),
            "",
            0,
            "drumpf",
        );

        let outcome = this.render("");
        assert!(!outcome.is_complete());
        assert_eq!(outcome.output(), "// drumpf\n");
        assert!(matches!(
            outcome.error(),
            Some(PacError::UnknownPlaceholder { name }) if name == "bogus"
        ));
    }

    #[test]
    fn test_from_config_custom_template() {
        let config = PacConfig {
            address: "proxy.corp".to_string(),
            port: 3128,
            tld: "corp".to_string(),
            template: Some("{address}:{port} {tld}".to_string()),
        };
        let this = PacRenderer::from_config(&config);
        assert_eq!(this.render("ignored:1").into_output(), "proxy.corp:3128 corp");
    }

    #[test]
    fn test_split_host_port() {
        assert_eq!(split_host_port("example.com:8080"), ("example.com", "8080"));
        assert_eq!(split_host_port("example.com"), ("", ""));
        assert_eq!(split_host_port("[::1]:8080"), ("[::1]", "8080"));
        assert_eq!(split_host_port("[::1]"), ("", ""));
        assert_eq!(split_host_port("::1"), ("", ""));
    }
}
