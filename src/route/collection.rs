use super::core::Route;
use crate::error::{Result, RoutingError};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Ordered registry of routes keyed by unique name.
///
/// Registration order is the match priority: the matcher walks routes in
/// this order and the first route satisfying every constraint wins.
#[derive(Debug, Clone, Default)]
pub struct RouteCollection {
    routes: Vec<Arc<Route>>,
    index: HashMap<String, usize>,
}

impl RouteCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from routes in iteration order.
    pub fn from_routes(routes: impl IntoIterator<Item = Route>) -> Result<Self> {
        let mut collection = Self::new();
        for route in routes {
            collection.add(route)?;
        }
        info!(
            routes_count = collection.len(),
            routes_summary = ?collection.names().take(10).collect::<Vec<_>>(),
            "Route collection loaded"
        );
        Ok(collection)
    }

    /// Register a route. Names must be unique.
    pub fn add(&mut self, route: Route) -> Result<()> {
        if self.index.contains_key(route.name()) {
            return Err(RoutingError::DuplicateRoute {
                name: route.name().to_string(),
            });
        }
        debug!(
            route_name = %route.name(),
            path = %route.path().source(),
            methods = ?route.methods(),
            "Route registered"
        );
        self.index.insert(route.name().to_string(), self.routes.len());
        self.routes.push(Arc::new(route));
        Ok(())
    }

    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Look up a route by name.
    pub fn get(&self, name: &str) -> Result<&Arc<Route>> {
        self.index
            .get(name)
            .map(|&i| &self.routes[i])
            .ok_or_else(|| RoutingError::RouteNotFound {
                name: name.to_string(),
            })
    }

    /// Routes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Route>> {
        self.routes.iter()
    }

    /// Route names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|r| r.name())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl<'a> IntoIterator for &'a RouteCollection {
    type Item = &'a Arc<Route>;
    type IntoIter = std::slice::Iter<'a, Arc<Route>>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.iter()
    }
}
