//! Route tables from YAML or JSON files.
//!
//! ```yaml
//! routes:
//!   - name: user.show
//!     path: /users/{id}
//!     methods: [GET]
//!     handler: users@show
//!     requirements: { id: '\d+' }
//!     defaults: { format: json }
//! ```

use super::collection::RouteCollection;
use super::core::Route;
use anyhow::Context;
use http::Method;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Serialized form of a route table.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteTable {
    #[serde(default)]
    pub routes: Vec<RouteDefinition>,
}

/// Serialized form of one route.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteDefinition {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub methods: Vec<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub schemes: Vec<String>,
    pub handler: String,
    #[serde(default)]
    pub requirements: BTreeMap<String, String>,
    #[serde(default)]
    pub defaults: BTreeMap<String, Scalar>,
}

/// YAML/JSON scalar accepted as a default value.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Str(s) => f.write_str(s),
        }
    }
}

impl RouteDefinition {
    /// Compile into a [`Route`].
    pub fn into_route(self) -> anyhow::Result<Route> {
        let mut builder = Route::builder(&self.name, &self.path).handler(&self.handler);
        for m in &self.methods {
            let method = Method::from_bytes(m.to_ascii_uppercase().as_bytes())
                .with_context(|| format!("route '{}': invalid method '{m}'", self.name))?;
            builder = builder.method(method);
        }
        if let Some(host) = &self.host {
            builder = builder.host(host);
        }
        for scheme in &self.schemes {
            builder = builder.scheme(scheme);
        }
        for (name, pattern) in &self.requirements {
            builder = builder.requirement(name, pattern);
        }
        for (name, value) in &self.defaults {
            builder = builder.default(name, &value.to_string());
        }
        Ok(builder.build()?)
    }
}

/// Input format of a route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Yaml,
    Json,
}

impl TableFormat {
    /// `.yaml`/`.yml` are YAML, everything else is JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => TableFormat::Yaml,
            _ => TableFormat::Json,
        }
    }
}

/// Parse a route table from a string.
pub fn load_routes_from_str(content: &str, format: TableFormat) -> anyhow::Result<RouteCollection> {
    let table: RouteTable = match format {
        TableFormat::Yaml => serde_yaml::from_str(content).context("invalid YAML route table")?,
        TableFormat::Json => serde_json::from_str(content).context("invalid JSON route table")?,
    };
    let routes = table
        .routes
        .into_iter()
        .map(RouteDefinition::into_route)
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(RouteCollection::from_routes(routes)?)
}

/// Load a route table from a file; the format follows the extension.
pub fn load_routes(path: impl AsRef<Path>) -> anyhow::Result<RouteCollection> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read route table {}", path.display()))?;
    load_routes_from_str(&content, TableFormat::from_path(path))
        .with_context(|| format!("failed to load route table {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_table_preserves_order_and_fields() {
        let yaml = r#"
routes:
  - name: user.show
    path: /users/{id}
    methods: [get, HEAD]
    handler: users@show
    requirements: { id: '\d+' }
    defaults: { format: json, page: 1 }
  - name: home
    path: /
    handler: "Pages::home"
"#;
        let routes = load_routes_from_str(yaml, TableFormat::Yaml).unwrap();
        assert_eq!(routes.names().collect::<Vec<_>>(), vec!["user.show", "home"]);
        let show = routes.get("user.show").unwrap();
        assert_eq!(show.methods(), &[Method::GET, Method::HEAD]);
        assert_eq!(show.defaults().get("page"), Some("1"));
        assert_eq!(show.requirements().get("id").map(String::as_str), Some(r"\d+"));
    }

    #[test]
    fn json_table_with_bad_method_fails() {
        let json = r#"{"routes":[{"name":"x","path":"/","methods":["G E T"],"handler":"A::b"}]}"#;
        assert!(load_routes_from_str(json, TableFormat::Json).is_err());
    }
}
