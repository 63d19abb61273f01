//! PAC script templates.
//!
//! A template source is scanned once into a sequence of tags: literal runs
//! and `{placeholder}` substitutions. Rendering walks the tags and writes
//! into any [`std::fmt::Write`] sink. Three placeholders form the contract
//! between the renderer and operator-supplied templates: `{address}`,
//! `{port}` and `{tld}`.
//!
//! Unknown placeholders are kept in the compiled template and only fail when
//! rendering reaches them, so a bad custom template produces a truncated
//! script instead of a load error.

use crate::error::{PacError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Write;

/// The built-in minimal PAC script: proxy the configured domain suffix,
/// everything else goes direct.
pub const DEFAULT_TEMPLATE: &str = r#"function FindProxyForURL (url, host) {
    if (dnsDomainIs(host, '{tld}')) {
        return 'PROXY {address}:{port}'
    }
    return 'DIRECT'
}
"#;

static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[a-z_]+\}").unwrap());

/// A single compiled template segment.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    /// Literal text copied through unchanged.
    Fill(String),
    /// `{address}`: the effective proxy address.
    Address,
    /// `{port}`: the effective proxy port.
    Port,
    /// `{tld}`: the configured domain suffix.
    Tld,
    /// Any other `{name}`; rendering stops when one is reached.
    Unknown(String),
}

/// Field values substituted into a template during one render.
#[derive(Debug, Clone, Copy)]
pub struct TemplateValues<'a> {
    pub address: &'a str,
    pub port: u16,
    pub tld: &'a str,
}

/// A PAC template compiled into its tag sequence.
#[derive(Debug, Clone)]
pub struct PacTemplate {
    tags: Vec<Tag>,
    capacity: usize,
}

impl PacTemplate {
    /// Compiles a template source. Never fails: placeholders outside the
    /// contract are preserved as [`Tag::Unknown`] and surface as a render
    /// error instead.
    pub fn parse(source: &str) -> Self {
        let mut tags = Vec::new();
        let mut end = 0;

        for found in PLACEHOLDER_RE.find_iter(source) {
            if end < found.start() {
                tags.push(Tag::Fill(source[end..found.start()].to_string()));
            }
            // Strip the surrounding braces.
            let name = &source[found.start() + 1..found.end() - 1];
            tags.push(match name {
                "address" => Tag::Address,
                "port" => Tag::Port,
                "tld" => Tag::Tld,
                _ => Tag::Unknown(name.to_string()),
            });
            end = found.end();
        }
        if end < source.len() {
            tags.push(Tag::Fill(source[end..].to_string()));
        }

        // Substituted values are short; the source length is a good
        // allocation estimate for rendered output.
        let capacity = source.len() + 16;
        Self { tags, capacity }
    }

    /// Suggested buffer capacity for one rendered output.
    pub fn size_hint(&self) -> usize {
        self.capacity
    }

    /// Renders the template into `out`.
    ///
    /// Stops at the first [`Tag::Unknown`]: everything before it has already
    /// been written when the error is returned, so the sink holds a
    /// truncated prefix rather than nothing.
    pub fn render_to<W: Write>(&self, values: &TemplateValues<'_>, out: &mut W) -> Result<()> {
        for tag in &self.tags {
            match tag {
                Tag::Fill(text) => out.write_str(text)?,
                Tag::Address => out.write_str(values.address)?,
                Tag::Port => write!(out, "{}", values.port)?,
                Tag::Tld => out.write_str(values.tld)?,
                Tag::Unknown(name) => {
                    return Err(PacError::UnknownPlaceholder { name: name.clone() })
                }
            }
        }
        Ok(())
    }
}

impl Default for PacTemplate {
    /// The compiled [`DEFAULT_TEMPLATE`].
    fn default() -> Self {
        Self::parse(DEFAULT_TEMPLATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const VALUES: TemplateValues<'static> = TemplateValues {
        address: "1.2.3.4",
        port: 8080,
        tld: "example.com",
    };

    fn render(template: &PacTemplate) -> Result<String> {
        let mut out = String::new();
        template.render_to(&VALUES, &mut out)?;
        Ok(out)
    }

    #[test]
    fn test_parse_literal_only() {
        let template = PacTemplate::parse("return 'DIRECT'");
        assert_eq!(
            template.tags,
            vec![Tag::Fill("return 'DIRECT'".to_string())]
        );
    }

    #[test]
    fn test_parse_placeholders() {
        let template = PacTemplate::parse("PROXY {address}:{port} for {tld}");
        assert_eq!(
            template.tags,
            vec![
                Tag::Fill("PROXY ".to_string()),
                Tag::Address,
                Tag::Fill(":".to_string()),
                Tag::Port,
                Tag::Fill(" for ".to_string()),
                Tag::Tld,
            ]
        );
    }

    #[test]
    fn test_render_substitutes_values() {
        let template = PacTemplate::parse("PROXY {address}:{port}");
        assert_eq!(render(&template).unwrap(), "PROXY 1.2.3.4:8080");
    }

    #[test]
    fn test_render_default_template() {
        let rendered = render(&PacTemplate::default()).unwrap();
        assert!(rendered.contains("dnsDomainIs(host, 'example.com')"));
        assert!(rendered.contains("return 'PROXY 1.2.3.4:8080'"));
        assert!(rendered.contains("return 'DIRECT'"));
    }

    #[test]
    fn test_unknown_placeholder_truncates() {
        let template = PacTemplate::parse("head {address} {nope} tail");
        let mut out = String::new();
        let err = template.render_to(&VALUES, &mut out).unwrap_err();

        // The prefix before the bad placeholder is delivered.
        assert_eq!(out, "head 1.2.3.4 ");
        assert!(matches!(
            err,
            PacError::UnknownPlaceholder { name } if name == "nope"
        ));
    }

    #[test]
    fn test_javascript_braces_are_literal() {
        // PAC scripts are full of JS blocks; only tight {word} runs are tags.
        let template = PacTemplate::parse("function f() {\n    return 1\n}\n");
        assert_eq!(template.tags.len(), 1);
        assert!(matches!(template.tags[0], Tag::Fill(_)));
    }
}
