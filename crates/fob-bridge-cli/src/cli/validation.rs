/// Parse a `--attr` value into a tag attribute.
///
/// `KEY=VALUE` sets a valued attribute; a bare `KEY` becomes a boolean
/// attribute (empty value), e.g. `--attr defer`.
///
/// # Errors
///
/// Returns an error message if the name is empty or contains whitespace,
/// quotes, or `=`/`>` characters that cannot appear in an attribute name.
pub fn parse_attribute(s: &str) -> Result<(String, String), String> {
    let (name, value) = match s.split_once('=') {
        Some((name, value)) => (name.trim(), value),
        None => (s.trim(), ""),
    };

    if name.is_empty() {
        return Err(format!("Attribute name cannot be empty: '{}'", s));
    }

    if let Some(c) = name
        .chars()
        .find(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '>' | '/' | '='))
    {
        return Err(format!(
            "Attribute name contains an invalid character '{}': '{}'",
            c, name
        ));
    }

    Ok((name.to_ascii_lowercase(), value.to_string()))
}
