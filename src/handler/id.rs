use super::invocable::Invocable;
use crate::error::{Result, RoutingError};
use std::fmt;
use std::str::FromStr;

/// A route's handler, parsed once when the route is built.
#[derive(Clone)]
pub enum HandlerId {
    /// `Class::method`, a static method in the class registry
    Static { class: String, method: String },
    /// `service@method`, an instance method on a service (or instantiable class)
    Service { key: String, method: String },
    /// A callable attached directly to the route
    Direct(Invocable),
}

impl HandlerId {
    /// Parse `Class::method` or `key@method`, checked in that order.
    pub fn parse(identifier: &str) -> Result<Self> {
        let identifier = identifier.trim();

        if let Some((class, method)) = identifier.split_once("::") {
            if is_name(class) && is_name(method) {
                return Ok(HandlerId::Static {
                    class: class.to_string(),
                    method: method.to_string(),
                });
            }
            return Err(RoutingError::unresolved(identifier));
        }

        if let Some((key, method)) = identifier.split_once('@') {
            if is_name(key) && is_name(method) {
                return Ok(HandlerId::Service {
                    key: key.to_string(),
                    method: method.to_string(),
                });
            }
        }

        Err(RoutingError::unresolved(identifier))
    }
}

// Class names may be namespaced (`App\Http\Users`, `app.users`).
fn is_name(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '\\' | '.' | '-'))
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerId::Static { class, method } => write!(f, "{class}::{method}"),
            HandlerId::Service { key, method } => write!(f, "{key}@{method}"),
            HandlerId::Direct(_) => f.write_str("<direct>"),
        }
    }
}

impl fmt::Debug for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HandlerId({self})")
    }
}

impl FromStr for HandlerId {
    type Err = RoutingError;

    fn from_str(s: &str) -> Result<Self> {
        HandlerId::parse(s)
    }
}

impl From<Invocable> for HandlerId {
    fn from(invocable: Invocable) -> Self {
        HandlerId::Direct(invocable)
    }
}
