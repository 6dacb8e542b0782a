// Configuration module entry point
// Loads the reference host configuration and derives handler options from it

mod types;

use crate::handler::StaticOptions;
use hyper::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::{Map, Value};
use std::net::SocketAddr;

pub use types::{Config, LoggingConfig, PerformanceConfig, ServerConfig, StaticFilesConfig};

impl Config {
    /// Load configuration from specified file path (without extension).
    ///
    /// The file is optional; `SPA_`-prefixed environment variables override it,
    /// with `__` separating nested keys (`SPA_SERVER__PORT=9000`).
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("SPA")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.timeout_secs", 30)?
            .set_default("static_files.root", "./public")?
            .set_default("static_files.entry", "index.html")?
            .set_default("static_files.dynamic", false)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Extra response headers as a `HeaderMap`
    pub fn header_map(&self) -> Result<HeaderMap, String> {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.static_files.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| format!("Invalid header name '{name}': {e}"))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| format!("Invalid value for header '{name}': {e}"))?;
            headers.append(name, value);
        }
        Ok(headers)
    }

    /// Handler options described by this configuration.
    ///
    /// In dynamic mode the template sees the configured `values` plus `Path`
    /// and `Query` taken from the request.
    pub fn static_options(&self) -> Result<StaticOptions, String> {
        let options = StaticOptions::new()
            .entry_document(self.static_files.entry.clone())
            .headers(self.header_map()?);

        if !self.static_files.dynamic {
            return Ok(options);
        }

        let base: Map<String, Value> = self
            .static_files
            .values
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();

        Ok(options.values_provider(move |parts| {
            let mut values = base.clone();
            values.insert("Path".to_string(), Value::from(parts.uri.path()));
            values.insert(
                "Query".to_string(),
                Value::from(parts.uri.query().unwrap_or_default()),
            );
            Value::Object(values)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn load_toml(contents: &str) -> Config {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spa.toml");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(contents.as_bytes())
            .unwrap();
        Config::load_from(dir.path().join("spa").to_str().unwrap()).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::load_from("/nonexistent/spa-static-config").unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert!(cfg.server.workers.is_none());
        assert_eq!(cfg.static_files.root, "./public");
        assert_eq!(cfg.static_files.entry, "index.html");
        assert!(!cfg.static_files.dynamic);
        assert!(cfg.static_files.headers.is_empty());
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 8080);
    }

    #[test]
    fn test_file_overrides() {
        let cfg = load_toml(
            r#"
[server]
port = 9090

[static_files]
root = "dist"
dynamic = true

[static_files.headers]
X-Frame-Options = "DENY"

[static_files.values]
Title = "Console"
"#,
        );
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.static_files.root, "dist");
        assert!(cfg.static_files.dynamic);

        let headers = cfg.header_map().unwrap();
        assert_eq!(headers["x-frame-options"], "DENY");

        let options = cfg.static_options().unwrap();
        assert!(options.is_dynamic());
    }

    #[test]
    fn test_invalid_header_name() {
        let mut cfg = Config::load_from("/nonexistent/spa-static-config").unwrap();
        cfg.static_files
            .headers
            .insert("Bad Header".to_string(), "x".to_string());
        assert!(cfg.header_map().is_err());
        assert!(cfg.static_options().is_err());
    }

    #[test]
    fn test_invalid_address() {
        let mut cfg = Config::load_from("/nonexistent/spa-static-config").unwrap();
        cfg.server.host = "not an address".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}
