//! `TemplateEngine` for `minijinja::Environment`.
//!
//! Helpers are exposed as global functions:
//!
//! ```jinja
//! {% for asset in vite_entrypoints(["resources/js/app.js"], nonce=nonce, preload=true) %}
//!   ...
//! {% endfor %}
//! <img src="{{ vite_asset("resources/images/logo.svg") }}">
//! ```
//!
//! Keyword arguments become descriptor attributes. `true` renders as a bare
//! attribute, `false` omits it, and `preload` toggles module preloads.

use minijinja::value::{Kwargs, ValueKind};
use minijinja::{Environment, Error, ErrorKind, Value};

use super::{HelperCall, HelperFn, TemplateEngine};

impl TemplateEngine for Environment<'_> {
    fn register_helper(&mut self, name: &'static str, helper: HelperFn) {
        self.add_function(
            name,
            move |entries: Option<Value>, kwargs: Kwargs| -> Result<Value, Error> {
                let call = helper_call(entries, &kwargs)?;
                let result = helper(&call)
                    .map_err(|e| Error::new(ErrorKind::InvalidOperation, e.to_string()))?;
                Ok(Value::from_serialize(&result))
            },
        );
    }
}

fn helper_call(entries: Option<Value>, kwargs: &Kwargs) -> Result<HelperCall, Error> {
    let mut call = HelperCall {
        entries: entry_names(entries)?,
        ..HelperCall::default()
    };

    let keys: Vec<String> = kwargs.args().map(str::to_string).collect();
    for key in keys {
        let value: Value = kwargs.get(&key)?;
        if key == "preload" {
            call.preload_imports = value.is_true();
            continue;
        }
        match value.kind() {
            ValueKind::Bool if value.is_true() => {
                call.attributes.insert(key, String::new());
            }
            ValueKind::Bool | ValueKind::None | ValueKind::Undefined => {}
            _ => {
                let rendered = match value.as_str() {
                    Some(s) => s.to_string(),
                    None => value.to_string(),
                };
                call.attributes.insert(key, rendered);
            }
        }
    }

    Ok(call)
}

fn entry_names(entries: Option<Value>) -> Result<Vec<String>, Error> {
    let Some(entries) = entries else {
        return Ok(Vec::new());
    };

    match entries.kind() {
        ValueKind::Undefined | ValueKind::None => Ok(Vec::new()),
        ValueKind::String => Ok(entries.as_str().map(str::to_string).into_iter().collect()),
        ValueKind::Seq => entries
            .try_iter()?
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    Error::new(
                        ErrorKind::InvalidOperation,
                        format!("entry names must be strings, got {}", item.kind()),
                    )
                })
            })
            .collect(),
        other => Err(Error::new(
            ErrorKind::InvalidOperation,
            format!("expected an entry name or a list of names, got {}", other),
        )),
    }
}

#[cfg(test)]
mod tests {
    use crate::template::register_helpers;
    use crate::AssetBridge;
    use fob_bridge_config::BridgeConfig;
    use minijinja::{context, Environment};
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn environment(dir: &TempDir) -> Environment<'static> {
        let vite = dir.path().join("public/assets/.vite");
        fs::create_dir_all(&vite).unwrap();
        fs::write(
            vite.join("manifest.json"),
            r#"{
                "app.js": {"file": "app-1.js", "isEntry": true, "css": ["app-1.css"], "imports": ["_chunk.js"]},
                "_chunk.js": {"file": "chunk-3.js"},
                "logo.svg": {"file": "logo-2.svg"}
            }"#,
        )
        .unwrap();

        let config = BridgeConfig {
            entrypoints: vec!["app.js".into()],
            ..BridgeConfig::default()
        };
        let bridge = Arc::new(AssetBridge::new(config, dir.path()));
        let mut env = Environment::new();
        register_helpers(&mut env, &bridge);
        env
    }

    #[test]
    fn renders_descriptors_with_kwargs() {
        let dir = TempDir::new().unwrap();
        let env = environment(&dir);

        let out = env
            .render_str(
                "{% for a in vite_entrypoints('app.js', nonce=n, async=true, defer=false) %}\
                 {{ a.kind }}:{{ a.url }}:{{ a.attributes.nonce }}:{{ 'async' in a.attributes }}:{{ 'defer' in a.attributes }}\n\
                 {% endfor %}",
                context! { n => "r4nd" },
            )
            .unwrap();
        assert_eq!(
            out,
            "script:/assets/app-1.js:r4nd:true:false\nstyle:/assets/app-1.css:r4nd:true:false\n"
        );
    }

    #[test]
    fn preload_kwarg_adds_module_preloads() {
        let dir = TempDir::new().unwrap();
        let env = environment(&dir);

        let out = env
            .render_str(
                "{{ vite_entrypoints(['app.js'], preload=true) | map(attribute='kind') | join(',') }}",
                context! {},
            )
            .unwrap();
        assert_eq!(out, "script,style,modulepreload");
    }

    #[test]
    fn asset_default_entries_and_dev_url() {
        let dir = TempDir::new().unwrap();
        let env = environment(&dir);

        let out = env
            .render_str(
                "{{ vite_asset('logo.svg') }}|{{ vite_default_entrypoints() | length }}|{{ vite_dev_url() }}",
                context! {},
            )
            .unwrap();
        assert_eq!(out, "/assets/logo-2.svg|2|");
    }

    #[test]
    fn missing_entry_fails_render() {
        let dir = TempDir::new().unwrap();
        let env = environment(&dir);

        let err = env
            .render_str("{{ vite_entrypoints('missing-entry') }}", context! {})
            .unwrap_err();
        assert!(err.to_string().contains("missing-entry"));
    }
}
