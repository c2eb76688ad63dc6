//! Endpoint definitions and endpoint file loading
//!
//! The file is a YAML sequence of endpoint objects. Each entry is checked once
//! here so the probe loop only ever sees well-formed requests.

use crate::errors::{MonitorError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Url};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// One entry of the endpoint file, as written by the operator
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EndpointDefinition {
    #[serde(default)]
    pub name: Option<String>,
    pub url: String,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub body: Option<Value>,
}

/// A validated probe target
#[derive(Debug, Clone)]
pub struct EndpointSpec {
    name: Option<String>,
    raw_url: String,
    url: Url,
    domain: String,
    method: Method,
    headers: HeaderMap,
    body: Option<Value>,
}

impl EndpointSpec {
    /// Validate a definition; `index` is its position in the file
    pub fn from_definition(index: usize, def: EndpointDefinition) -> Result<Self> {
        let invalid = |reason: String| MonitorError::InvalidEndpoint { index, reason };

        let url = Url::parse(&def.url)
            .map_err(|e| invalid(format!("cannot parse url '{}': {}", def.url, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }

        let domain = url
            .host_str()
            .ok_or_else(|| invalid(format!("url '{}' has no host", def.url)))?
            .to_string();

        // GET when the file leaves the method out
        let method = match def.method.as_deref() {
            None => Method::GET,
            Some(m) => Method::from_bytes(m.trim().to_uppercase().as_bytes())
                .map_err(|_| invalid(format!("invalid HTTP method '{}'", m)))?,
        };

        let mut headers = HeaderMap::with_capacity(def.headers.len());
        for (key, value) in &def.headers {
            let header_name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|_| invalid(format!("invalid header name '{}'", key)))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| invalid(format!("invalid value for header '{}'", key)))?;
            headers.insert(header_name, header_value);
        }

        Ok(Self {
            name: def.name,
            raw_url: def.url,
            url,
            domain,
            method,
            headers,
            body: def.body,
        })
    }

    /// Shorthand for a GET endpoint without headers or body
    pub fn get(url: &str) -> Result<Self> {
        Self::from_definition(
            0,
            EndpointDefinition {
                name: None,
                url: url.to_string(),
                method: None,
                headers: HashMap::new(),
                body: None,
            },
        )
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// `name (url)` when the entry is named, the bare URL otherwise
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => format!("{} ({})", name, self.raw_url),
            None => self.raw_url.clone(),
        }
    }

    /// URL exactly as configured, used in log lines
    pub fn raw_url(&self) -> &str {
        &self.raw_url
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Host component of the URL; the aggregation key
    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

/// Parse and validate endpoint definitions from YAML (or JSON) text
pub fn parse_endpoints(content: &str) -> Result<Vec<EndpointSpec>> {
    // A null document means an empty list
    let definitions: Option<Vec<EndpointDefinition>> = serde_yaml::from_str(content)?;

    definitions
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(index, def)| EndpointSpec::from_definition(index, def))
        .collect()
}

/// Read and validate the endpoint file at `path`
pub fn load_endpoints<P: AsRef<Path>>(path: P) -> Result<Vec<EndpointSpec>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let endpoints = parse_endpoints(&content)?;

    debug!("Loaded {} endpoints from {}", endpoints.len(), path.display());
    Ok(endpoints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_definition() {
        let yaml = r#"
- name: example api
  url: https://example.com/api/v1
  method: post
  headers:
    content-type: application/json
    x-api-key: secret
  body:
    ping: true
    tags: [a, b]
"#;
        let endpoints = parse_endpoints(yaml).unwrap();
        assert_eq!(endpoints.len(), 1);

        let endpoint = &endpoints[0];
        assert_eq!(endpoint.name(), Some("example api"));
        assert_eq!(endpoint.raw_url(), "https://example.com/api/v1");
        assert_eq!(endpoint.domain(), "example.com");
        assert_eq!(endpoint.method(), &Method::POST);
        assert_eq!(endpoint.headers()["x-api-key"], "secret");
        assert_eq!(
            endpoint.body(),
            Some(&serde_json::json!({"ping": true, "tags": ["a", "b"]}))
        );
    }

    #[test]
    fn test_label_prefers_name() {
        let yaml = "- name: careers\n  url: https://fetch.com/careers\n- url: https://fetch.com/\n";
        let endpoints = parse_endpoints(yaml).unwrap();
        assert_eq!(endpoints[0].label(), "careers (https://fetch.com/careers)");
        assert_eq!(endpoints[1].label(), "https://fetch.com/");
    }

    #[test]
    fn test_method_defaults_to_get() {
        let endpoints = parse_endpoints("- url: http://example.com\n").unwrap();
        assert_eq!(endpoints[0].method(), &Method::GET);
        assert!(endpoints[0].headers().is_empty());
        assert!(endpoints[0].body().is_none());
    }

    #[test]
    fn test_domain_ignores_scheme_port_and_path() {
        let a = EndpointSpec::get("https://a.com:8080/x?q=1").unwrap();
        let b = EndpointSpec::get("http://a.com/y").unwrap();
        assert_eq!(a.domain(), "a.com");
        assert_eq!(a.domain(), b.domain());
    }

    #[test]
    fn test_raw_url_is_preserved() {
        let endpoint = EndpointSpec::get("https://example.com").unwrap();
        assert_eq!(endpoint.raw_url(), "https://example.com");
        assert_eq!(endpoint.url().as_str(), "https://example.com/");
    }

    #[test]
    fn test_json_document_is_accepted() {
        let json = r#"[{"url": "https://example.com/", "body": [1, 2, 3]}]"#;
        let endpoints = parse_endpoints(json).unwrap();
        assert_eq!(endpoints[0].body(), Some(&serde_json::json!([1, 2, 3])));
    }

    #[test]
    fn test_empty_document_is_empty_list() {
        assert!(parse_endpoints("~").unwrap().is_empty());
        assert!(parse_endpoints("[]").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_invalid_entries() {
        let err = parse_endpoints("- url: not a url\n").unwrap_err();
        assert!(matches!(err, MonitorError::InvalidEndpoint { index: 0, .. }));

        let err = parse_endpoints("- url: http://ok.com\n- url: mailto:someone@example.com\n")
            .unwrap_err();
        assert!(matches!(err, MonitorError::InvalidEndpoint { index: 1, .. }));

        let err = parse_endpoints("- url: ftp://files.ok.com/x\n").unwrap_err();
        assert!(err.to_string().contains("unsupported scheme 'ftp'"));

        let err = parse_endpoints("- url: http://ok.com\n  method: \"GE T\"\n").unwrap_err();
        assert!(err.to_string().contains("invalid HTTP method"));

        let err = parse_endpoints("- url: http://ok.com\n  headers:\n    \"bad header\": x\n")
            .unwrap_err();
        assert!(err.to_string().contains("invalid header name"));
    }

    #[test]
    fn test_missing_url_is_yaml_error() {
        let err = parse_endpoints("- method: GET\n").unwrap_err();
        assert!(matches!(err, MonitorError::Yaml(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "- url: https://fetch.com/\n- url: https://fetch.com/careers").unwrap();

        let endpoints = tokio_test::assert_ok!(load_endpoints(file.path()));
        assert_eq!(endpoints.len(), 2);
        assert!(endpoints.iter().all(|e| e.domain() == "fetch.com"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = tokio_test::assert_err!(load_endpoints(dir.path().join("absent.yaml")));
        assert!(matches!(err, MonitorError::Io(_)));
    }
}
