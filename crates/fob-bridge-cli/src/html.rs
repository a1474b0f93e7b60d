//! minijinja templates shared by `resolve --format html` and `serve`.
//!
//! Auto-escaping is off; attribute values are escaped explicitly with the
//! `attr` filter so URLs keep their slashes.

use fob_bridge::AssetDescriptor;
use minijinja::{context, AutoEscape, Environment};

use crate::error::Result;

const TAGS: &str = include_str!("../assets/templates/tags.html");
const TAG_LIST: &str = include_str!("../assets/templates/tag_list.html");
const PAGE: &str = include_str!("../assets/templates/page.html");

/// Name of the reference host page template.
pub const PAGE_TEMPLATE: &str = "page.html";

/// Environment with every CLI template loaded.
pub fn environment() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.add_filter("attr", escape_attribute);
    env.add_template("tags.html", TAGS)?;
    env.add_template("tag_list.html", TAG_LIST)?;
    env.add_template(PAGE_TEMPLATE, PAGE)?;
    Ok(env)
}

/// Render descriptors as one tag per line.
pub fn render_tags(assets: &[AssetDescriptor]) -> Result<String> {
    let env = environment()?;
    let rendered = env
        .get_template("tag_list.html")?
        .render(context! { assets => assets })?;
    Ok(rendered.trim().to_string())
}

/// Escape a value for use inside a double-quoted attribute.
pub fn escape_attribute(value: String) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_script_and_stylesheet() {
        let assets = vec![
            AssetDescriptor::module_script("/assets/app-abc123.js"),
            AssetDescriptor::stylesheet("/assets/app-def456.css"),
        ];
        let html = render_tags(&assets).unwrap();
        assert_eq!(
            html,
            "<script src=\"/assets/app-abc123.js\" type=\"module\"></script>\n\
             <link href=\"/assets/app-def456.css\" rel=\"stylesheet\">"
        );
    }

    #[test]
    fn test_boolean_and_escaped_attributes() {
        let assets = vec![AssetDescriptor::module_script("/app.js?v=1&x=2")
            .with_attribute("defer", "")
            .with_attribute("data-note", "a \"quoted\" <value>")];
        let html = render_tags(&assets).unwrap();
        assert_eq!(
            html,
            "<script src=\"/app.js?v=1&amp;x=2\" type=\"module\" defer \
             data-note=\"a &quot;quoted&quot; &lt;value&gt;\"></script>"
        );
    }

    #[test]
    fn test_module_preload_is_a_link() {
        let assets = vec![AssetDescriptor::module_preload("/assets/chunk.js")];
        assert_eq!(
            render_tags(&assets).unwrap(),
            "<link href=\"/assets/chunk.js\" rel=\"modulepreload\">"
        );
    }

    #[test]
    fn test_empty_list_renders_nothing() {
        assert_eq!(render_tags(&[]).unwrap(), "");
    }
}
