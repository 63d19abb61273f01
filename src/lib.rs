//! # pac-serve
//!
//! This crate renders Proxy Auto-Configuration (PAC) scripts per HTTP
//! request: browsers fetch the script and use it to decide whether to proxy
//! traffic for a configured domain suffix. The HTTP surface is built on the
//! Pingora framework.
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading and validation
//! - [`error`]: Error types and handling
//! - [`handler`]: The Pingora-based HTTP handler
//! - [`logging`]: Logging setup and configuration
//! - [`renderer`]: Effective address/port resolution and rendering
//! - [`template`]: Compiled PAC script templates
//!
//! ## Resolution rules
//!
//! The endpoint advertised in the generated script is resolved per request:
//!
//! 1. **Configured overrides**: a non-empty address or non-zero port always
//!    wins.
//! 2. **Request host**: otherwise both are derived from the request's
//!    `host:port`.
//! 3. **Defaults**: a port that cannot be derived falls back to 80; an
//!    address that cannot be derived falls back to the empty string.
//!
//! ## Example
//!
//! The embedding server constructs the handler and mounts it:
//!
//! ```ignore
//! use pac_serve::{init_logging, AppConfig, PacHandler, PacRenderer};
//! use pingora_core::server::Server;
//!
//! let config = AppConfig::load("config.yaml")?;
//! let _log_guard = init_logging(&config.logging)?;
//!
//! let handler = PacHandler::new(PacRenderer::from_config(&config.pac));
//!
//! let mut server = Server::new(None)?;
//! server.bootstrap();
//! let mut service = pingora_proxy::http_proxy_service(&server.configuration, handler);
//! service.add_tcp("0.0.0.0:1984");
//! server.add_service(service);
//! server.run_forever();
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod logging;
pub mod renderer;
pub mod template;

pub use config::{AppConfig, LogFormat, LoggingConfig, PacConfig};
pub use error::{PacError, Result};
pub use handler::{PacContext, PacHandler, PAC_CONTENT_TYPE};
pub use logging::init_logging;
pub use renderer::{PacRenderer, RenderOutcome};
pub use template::{PacTemplate, TemplateValues, DEFAULT_TEMPLATE};
