use http::Method;
use url::Url;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_SCHEME: &str = "http";
pub const DEFAULT_PORT: u16 = 80;

/// Immutable snapshot of one request's addressing information.
///
/// `path` is the path below `base_path`; the full request path is
/// `base_path + path`. One instance is either a real inbound request or a
/// context synthesized from explicit options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    method: Method,
    path: String,
    query: String,
    host: String,
    scheme: String,
    port: u16,
    base_path: String,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self {
            method: Method::GET,
            path: "/".to_string(),
            query: String::new(),
            host: DEFAULT_HOST.to_string(),
            scheme: DEFAULT_SCHEME.to_string(),
            port: DEFAULT_PORT,
            base_path: String::new(),
        }
    }
}

impl RequestContext {
    /// Start from `GET http://localhost:80/`.
    #[must_use]
    pub fn builder() -> RequestContextBuilder {
        RequestContextBuilder {
            ctx: RequestContext::default(),
        }
    }

    /// Shorthand for a context that only differs from the default by method and path.
    #[must_use]
    pub fn new(method: Method, path: &str) -> Self {
        Self::builder().method(method).path(path).build()
    }

    /// Parse an absolute URL. `base_path` is stripped from the URL path when
    /// it is a prefix of it.
    pub fn from_url(method: Method, url: &str, base_path: &str) -> anyhow::Result<Self> {
        let parsed = Url::parse(url)?;
        let host = parsed
            .host_str()
            .ok_or_else(|| anyhow::anyhow!("url '{url}' has no host"))?;
        let scheme = parsed.scheme();
        let port = parsed
            .port_or_known_default()
            .unwrap_or_else(|| default_port(scheme));
        let path = strip_base(parsed.path(), base_path);
        Ok(Self::builder()
            .method(method)
            .scheme(scheme)
            .host(host)
            .port(port)
            .base_path(base_path)
            .path(path)
            .query(parsed.query().unwrap_or_default())
            .build())
    }

    /// Build from an `http::Request`, reading the host from the URI authority
    /// or the `Host` header.
    #[must_use]
    pub fn from_http_request<B>(req: &http::Request<B>, base_path: &str) -> Self {
        let uri = req.uri();
        let header_host = req
            .headers()
            .get(http::header::HOST)
            .and_then(|v| v.to_str().ok());
        let (host, header_port) = match (uri.host(), header_host) {
            (Some(h), _) => (h.to_string(), None),
            (None, Some(h)) if !h.is_empty() => split_host_port(h),
            _ => (DEFAULT_HOST.to_string(), None),
        };
        let scheme = uri.scheme_str().unwrap_or(DEFAULT_SCHEME);
        let port = uri
            .port_u16()
            .or(header_port)
            .unwrap_or_else(|| default_port(scheme));
        Self::builder()
            .method(req.method().clone())
            .scheme(scheme)
            .host(&host)
            .port(port)
            .base_path(base_path)
            .path(strip_base(uri.path(), base_path))
            .query(uri.query().unwrap_or_default())
            .build()
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Whether `port` is the well-known port of `scheme`.
    #[must_use]
    pub fn is_default_port(&self) -> bool {
        self.port == default_port(&self.scheme)
    }
}

/// Builder for [`RequestContext`].
#[derive(Debug, Clone)]
pub struct RequestContextBuilder {
    ctx: RequestContext,
}

impl RequestContextBuilder {
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.ctx.method = method;
        self
    }

    #[must_use]
    pub fn path(mut self, path: &str) -> Self {
        self.ctx.path = normalize_path(path);
        self
    }

    #[must_use]
    pub fn query(mut self, query: &str) -> Self {
        self.ctx.query = query.trim_start_matches('?').to_string();
        self
    }

    #[must_use]
    pub fn host(mut self, host: &str) -> Self {
        self.ctx.host = host.to_ascii_lowercase();
        self
    }

    #[must_use]
    pub fn scheme(mut self, scheme: &str) -> Self {
        self.ctx.scheme = scheme.to_ascii_lowercase();
        self
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.ctx.port = port;
        self
    }

    #[must_use]
    pub fn base_path(mut self, base_path: &str) -> Self {
        self.ctx.base_path = base_path.trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn build(self) -> RequestContext {
        self.ctx
    }
}

/// Well-known port for a scheme; unknown schemes fall back to 80.
#[must_use]
pub fn default_port(scheme: &str) -> u16 {
    match scheme {
        "https" | "wss" => 443,
        _ => DEFAULT_PORT,
    }
}

fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

fn strip_base<'a>(path: &'a str, base_path: &str) -> &'a str {
    let base = base_path.trim_end_matches('/');
    if base.is_empty() {
        return path;
    }
    match path.strip_prefix(base) {
        Some(rest) if rest.is_empty() => "/",
        Some(rest) if rest.starts_with('/') => rest,
        _ => path,
    }
}

fn split_host_port(value: &str) -> (String, Option<u16>) {
    match value.rsplit_once(':') {
        Some((host, port)) => match port.parse() {
            Ok(p) => (host.to_ascii_lowercase(), Some(p)),
            Err(_) => (value.to_ascii_lowercase(), None),
        },
        None => (value.to_ascii_lowercase(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dispatch_options() {
        let ctx = RequestContext::default();
        assert_eq!(ctx.method(), Method::GET);
        assert_eq!(ctx.host(), "localhost");
        assert_eq!(ctx.port(), 80);
        assert_eq!(ctx.scheme(), "http");
        assert_eq!(ctx.query(), "");
        assert_eq!(ctx.base_path(), "");
    }

    #[test]
    fn from_url_strips_base_path() {
        let ctx = RequestContext::from_url(
            Method::POST,
            "https://Example.com:8443/app/users/7?x=1",
            "/app",
        )
        .unwrap();
        assert_eq!(ctx.method(), Method::POST);
        assert_eq!(ctx.host(), "example.com");
        assert_eq!(ctx.scheme(), "https");
        assert_eq!(ctx.port(), 8443);
        assert_eq!(ctx.base_path(), "/app");
        assert_eq!(ctx.path(), "/users/7");
        assert_eq!(ctx.query(), "x=1");
        assert!(!ctx.is_default_port());
    }

    #[test]
    fn from_http_request_reads_host_header() {
        let req = http::Request::builder()
            .method(Method::DELETE)
            .uri("/items/3?force=true")
            .header(http::header::HOST, "api.example.com:8080")
            .body(())
            .unwrap();
        let ctx = RequestContext::from_http_request(&req, "");
        assert_eq!(ctx.host(), "api.example.com");
        assert_eq!(ctx.port(), 8080);
        assert_eq!(ctx.path(), "/items/3");
        assert_eq!(ctx.query(), "force=true");
    }

    #[test]
    fn builder_normalizes_path_and_query() {
        let ctx = RequestContext::builder().path("users").query("?a=b").build();
        assert_eq!(ctx.path(), "/users");
        assert_eq!(ctx.query(), "a=b");
    }
}
