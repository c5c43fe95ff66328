//! Template rendering for the two per-keyword artifacts.
//!
//! A [`Renderer`] holds the parsed article and descriptor templates
//! (Go-template syntax via `gtmpl`). Built-in templates are embedded in the
//! crate; both can be overridden from a directory. Variable values are
//! escaped for the target artifact before substitution: HTML-escaped for the
//! page title/heading, JSON-string-escaped for the descriptor.

use std::collections::HashMap;
use std::path::Path;

use gtmpl::{Context, Template, Value};
use tracing::debug;

use pageforge_shared::{PageForgeError, Result};

/// Built-in HTML article template. Variables: `article_content`,
/// `display_keyword`.
const ARTICLE_TEMPLATE: &str = include_str!("../templates/article.html.tmpl");

/// Built-in JSON descriptor template. Variables: `display_keyword`, `slug`.
const DESCRIPTOR_TEMPLATE: &str = include_str!("../templates/article.html.json.tmpl");

/// File name of the article template inside an override directory.
pub const ARTICLE_TEMPLATE_FILE: &str = "article.html.tmpl";

/// File name of the descriptor template inside an override directory.
pub const DESCRIPTOR_TEMPLATE_FILE: &str = "article.html.json.tmpl";

/// Renders the HTML page and JSON descriptor for a keyword.
pub struct Renderer {
    article: Template,
    descriptor: Template,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer").finish_non_exhaustive()
    }
}

impl Renderer {
    /// Create a renderer from the built-in templates.
    pub fn builtin() -> Result<Self> {
        Ok(Self {
            article: parse_template("article.html", ARTICLE_TEMPLATE)?,
            descriptor: parse_template("article.html.json", DESCRIPTOR_TEMPLATE)?,
        })
    }

    /// Create a renderer from template files in `dir`.
    ///
    /// Expects [`ARTICLE_TEMPLATE_FILE`] and [`DESCRIPTOR_TEMPLATE_FILE`] to
    /// exist in the directory.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let article_path = dir.join(ARTICLE_TEMPLATE_FILE);
        let article_src = std::fs::read_to_string(&article_path)
            .map_err(|e| PageForgeError::io(&article_path, e))?;

        let descriptor_path = dir.join(DESCRIPTOR_TEMPLATE_FILE);
        let descriptor_src = std::fs::read_to_string(&descriptor_path)
            .map_err(|e| PageForgeError::io(&descriptor_path, e))?;

        debug!(dir = %dir.display(), "loaded template overrides");

        Ok(Self {
            article: parse_template(ARTICLE_TEMPLATE_FILE, &article_src)?,
            descriptor: parse_template(DESCRIPTOR_TEMPLATE_FILE, &descriptor_src)?,
        })
    }

    /// Render the HTML page for a keyword.
    ///
    /// `article_content` is inserted verbatim (it is already an HTML
    /// fragment); `display_keyword` is HTML-escaped.
    pub fn render_article(&self, article_content: &str, display_keyword: &str) -> Result<String> {
        let mut vars: HashMap<String, Value> = HashMap::new();
        vars.insert(
            "article_content".into(),
            Value::String(article_content.to_string()),
        );
        vars.insert(
            "display_keyword".into(),
            Value::String(escape_html(display_keyword)),
        );
        execute(&self.article, vars)
    }

    /// Render the JSON descriptor for a keyword. Both values are escaped as
    /// JSON string contents.
    pub fn render_descriptor(&self, display_keyword: &str, slug: &str) -> Result<String> {
        let mut vars: HashMap<String, Value> = HashMap::new();
        vars.insert(
            "display_keyword".into(),
            Value::String(escape_json(display_keyword)),
        );
        vars.insert("slug".into(), Value::String(escape_json(slug)));
        execute(&self.descriptor, vars)
    }
}

/// Parse a template source, naming it for error messages.
fn parse_template(name: &str, source: &str) -> Result<Template> {
    let mut template = Template::default();
    template
        .parse(source)
        .map_err(|e| PageForgeError::template(format!("failed to parse {name}: {e}")))?;
    Ok(template)
}

/// Execute a template against a variable map, collecting output as a string.
fn execute(template: &Template, vars: HashMap<String, Value>) -> Result<String> {
    let context = Context::from(Value::Object(vars))
        .map_err(|e| PageForgeError::template(format!("invalid template context: {e}")))?;

    let mut buf: Vec<u8> = Vec::new();
    template
        .execute(&mut buf, &context)
        .map_err(|e| PageForgeError::template(format!("render failed: {e}")))?;

    String::from_utf8(buf)
        .map_err(|e| PageForgeError::template(format!("rendered non-UTF-8 output: {e}")))
}

/// Escape a string for insertion into HTML text content.
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Escape a string for insertion into a JSON string literal.
fn escape_json(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_embeds_fragment_verbatim() {
        let renderer = Renderer::builtin().unwrap();
        let fragment = "<h2>Trails</h2><p>Walk more.</p>";
        let html = renderer.render_article(fragment, "Hiking Trails").unwrap();

        assert!(html.contains(fragment));
        assert!(html.contains("<title>Hiking Trails</title>"));
        assert!(html.contains("<h1>Hiking Trails</h1>"));
    }

    #[test]
    fn article_escapes_display_keyword() {
        let renderer = Renderer::builtin().unwrap();
        let html = renderer
            .render_article("<p>x</p>", "Cats & <Dogs>")
            .unwrap();

        assert!(html.contains("Cats &amp; &lt;Dogs&gt;"));
        // The fragment itself must stay raw HTML.
        assert!(html.contains("<p>x</p>"));
    }

    #[test]
    fn descriptor_is_valid_json() {
        let renderer = Renderer::builtin().unwrap();
        let json = renderer
            .render_descriptor("Hiking Trails", "hiking-trails")
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");
        assert_eq!(parsed["title"], "Hiking Trails");
        assert_eq!(parsed["slug"], "hiking-trails");
        assert_eq!(parsed["path"], "/hiking-trails.html");
    }

    #[test]
    fn descriptor_escapes_quotes() {
        let renderer = Renderer::builtin().unwrap();
        let json = renderer
            .render_descriptor("Say \"Cheese\"", "say-cheese")
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");
        assert_eq!(parsed["title"], "Say \"Cheese\"");
    }

    #[test]
    fn renderer_is_deterministic() {
        let renderer = Renderer::builtin().unwrap();
        let a = renderer.render_article("<p>x</p>", "Tea").unwrap();
        let b = renderer.render_article("<p>x</p>", "Tea").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn from_dir_loads_overrides() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(ARTICLE_TEMPLATE_FILE),
            "<article>{{.display_keyword}}: {{.article_content}}</article>",
        )
        .unwrap();
        std::fs::write(
            dir.path().join(DESCRIPTOR_TEMPLATE_FILE),
            "{\"name\": \"{{.slug}}\"}",
        )
        .unwrap();

        let renderer = Renderer::from_dir(dir.path()).unwrap();
        let html = renderer.render_article("<p>hi</p>", "Tea").unwrap();
        assert_eq!(html, "<article>Tea: <p>hi</p></article>");

        let json = renderer.render_descriptor("Tea", "tea").unwrap();
        assert_eq!(json, "{\"name\": \"tea\"}");
    }

    #[test]
    fn from_dir_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Renderer::from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, PageForgeError::Io { .. }));
    }

    #[test]
    fn malformed_template_is_template_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(ARTICLE_TEMPLATE_FILE), "{{.unclosed").unwrap();
        std::fs::write(dir.path().join(DESCRIPTOR_TEMPLATE_FILE), "{}").unwrap();

        let err = Renderer::from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, PageForgeError::Template { .. }));
    }
}
