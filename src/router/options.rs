use crate::error::{Result, RoutingError};
use crate::request::{RequestContext, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_SCHEME};
use crate::url_generator::UrlType;
use http::Method;
use serde::Deserialize;

/// Options accepted by [`crate::router::Router::dispatch_route`].
///
/// Every field is optional; unset fields take the defaults
/// `GET http://localhost:80` with empty query and base path. Unknown keys
/// are ignored when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DispatchOptions {
    pub method: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub query: Option<String>,
    pub scheme: Option<String>,
    pub base_path: Option<String>,
    /// Forces the URL type instead of the "`localhost` means relative" rule
    pub url_type: Option<UrlType>,
}

impl DispatchOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method.as_str().to_string());
        self
    }

    #[must_use]
    pub fn host(mut self, host: &str) -> Self {
        self.host = Some(host.to_string());
        self
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    #[must_use]
    pub fn query(mut self, query: &str) -> Self {
        self.query = Some(query.to_string());
        self
    }

    #[must_use]
    pub fn scheme(mut self, scheme: &str) -> Self {
        self.scheme = Some(scheme.to_string());
        self
    }

    #[must_use]
    pub fn base_path(mut self, base_path: &str) -> Self {
        self.base_path = Some(base_path.to_string());
        self
    }

    #[must_use]
    pub fn url_type(mut self, url_type: UrlType) -> Self {
        self.url_type = Some(url_type);
        self
    }

    /// Merge with the defaults.
    pub fn resolve(&self) -> Result<ResolvedOptions> {
        let method = match &self.method {
            Some(m) => Method::from_bytes(m.to_ascii_uppercase().as_bytes()).map_err(|_| {
                RoutingError::InvalidOption {
                    option: "method".to_string(),
                    value: m.clone(),
                }
            })?,
            None => Method::GET,
        };
        let host = self.host.clone().unwrap_or_else(|| DEFAULT_HOST.to_string());
        let url_type = self.url_type.unwrap_or(if host == DEFAULT_HOST {
            UrlType::RelativePath
        } else {
            UrlType::AbsolutePath
        });
        Ok(ResolvedOptions {
            method,
            port: self.port.unwrap_or(DEFAULT_PORT),
            query: self.query.clone().unwrap_or_default(),
            scheme: self
                .scheme
                .clone()
                .unwrap_or_else(|| DEFAULT_SCHEME.to_string()),
            base_path: self.base_path.clone().unwrap_or_default(),
            host,
            url_type,
        })
    }
}

/// [`DispatchOptions`] merged with defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOptions {
    pub method: Method,
    pub host: String,
    pub port: u16,
    pub query: String,
    pub scheme: String,
    pub base_path: String,
    pub url_type: UrlType,
}

impl ResolvedOptions {
    /// The synthetic request context these options describe. Its path is
    /// empty until the URL is generated.
    #[must_use]
    pub fn request_context(&self) -> RequestContext {
        RequestContext::builder()
            .method(self.method.clone())
            .host(&self.host)
            .port(self.port)
            .query(&self.query)
            .scheme(&self.scheme)
            .base_path(&self.base_path)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_options_resolve_to_defaults() {
        let resolved = DispatchOptions::new().resolve().unwrap();
        assert_eq!(resolved.method, Method::GET);
        assert_eq!(resolved.host, "localhost");
        assert_eq!(resolved.port, 80);
        assert_eq!(resolved.query, "");
        assert_eq!(resolved.scheme, "http");
        assert_eq!(resolved.base_path, "");
        assert_eq!(resolved.url_type, UrlType::RelativePath);
        assert_eq!(resolved.request_context(), RequestContext::default());
    }

    #[test]
    fn explicit_host_switches_to_absolute() {
        let resolved = DispatchOptions::new().host("example.com").resolve().unwrap();
        assert_eq!(resolved.url_type, UrlType::AbsolutePath);

        let forced = DispatchOptions::new()
            .host("example.com")
            .url_type(UrlType::RelativePath)
            .resolve()
            .unwrap();
        assert_eq!(forced.url_type, UrlType::RelativePath);
    }

    #[test]
    fn deserializes_and_ignores_unknown_keys() {
        let opts: DispatchOptions =
            serde_json::from_str(r#"{"method":"post","port":8080,"flavour":"vanilla"}"#).unwrap();
        let resolved = opts.resolve().unwrap();
        assert_eq!(resolved.method, Method::POST);
        assert_eq!(resolved.port, 8080);
    }

    #[test]
    fn invalid_method_is_rejected() {
        let opts = DispatchOptions {
            method: Some("NOT A METHOD".to_string()),
            ..DispatchOptions::default()
        };
        assert!(matches!(opts.resolve(), Err(RoutingError::InvalidOption { .. })));
    }
}
