use super::id::HandlerId;
use super::invocable::Invocable;
use crate::error::{Result, RoutingError};
use crate::route::RouteCollection;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// An object exposing instance methods to the router.
pub trait Service: Send + Sync {
    /// Look up an instance method by name.
    fn method(&self, name: &str) -> Option<Invocable>;
}

/// Service locator handed to the parser: `service key → object`.
pub type ServiceMap = HashMap<String, Arc<dyn Service>>;

/// Creates a fresh instance of an instantiable class.
pub type ClassFactory = Arc<dyn Fn() -> Arc<dyn Service> + Send + Sync>;

/// Named methods, used both for a class's static methods and as a ready-made
/// [`Service`] implementation.
#[derive(Debug, Clone, Default)]
pub struct MethodTable {
    methods: HashMap<String, Invocable>,
}

impl MethodTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn method(mut self, name: &str, invocable: Invocable) -> Self {
        self.methods.insert(name.to_string(), invocable);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Invocable> {
        self.methods.get(name)
    }
}

impl Service for MethodTable {
    fn method(&self, name: &str) -> Option<Invocable> {
        self.methods.get(name).cloned()
    }
}

#[derive(Clone, Default)]
struct ClassEntry {
    statics: MethodTable,
    factory: Option<ClassFactory>,
}

/// Resolves [`HandlerId`]s into [`Invocable`]s.
///
/// - `Static` looks up the class registry and its static methods.
/// - `Service` looks up the service map; if the key is not a service but a
///   registered instantiable class, a fresh instance is created.
/// - `Direct` is returned as is.
///
/// Routes are immutable, so resolutions are memoised per identifier.
#[derive(Default)]
pub struct HandlerParser {
    classes: HashMap<String, ClassEntry>,
    services: ServiceMap,
    cache: RefCell<HashMap<String, Invocable>>,
}

impl HandlerParser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parser backed by an existing service map.
    #[must_use]
    pub fn with_services(services: ServiceMap) -> Self {
        Self {
            services,
            ..Self::default()
        }
    }

    /// Register a service under `key`.
    #[must_use]
    pub fn service(mut self, key: &str, service: Arc<dyn Service>) -> Self {
        self.services.insert(key.to_string(), service);
        self.cache.get_mut().clear();
        self
    }

    /// Register `class` with its static methods.
    #[must_use]
    pub fn class(mut self, class: &str, statics: MethodTable) -> Self {
        self.classes.entry(class.to_string()).or_default().statics = statics;
        self.cache.get_mut().clear();
        self
    }

    /// Register a factory so `class@method` can instantiate `class`.
    #[must_use]
    pub fn instantiable<F>(mut self, class: &str, factory: F) -> Self
    where
        F: Fn() -> Arc<dyn Service> + Send + Sync + 'static,
    {
        self.classes.entry(class.to_string()).or_default().factory = Some(Arc::new(factory));
        self.cache.get_mut().clear();
        self
    }

    #[must_use]
    pub fn services(&self) -> &ServiceMap {
        &self.services
    }

    /// Parse a raw identifier and resolve it.
    pub fn parse(&self, identifier: &str) -> Result<Invocable> {
        self.resolve(&HandlerId::parse(identifier)?)
    }

    /// Resolve a parsed identifier.
    pub fn resolve(&self, id: &HandlerId) -> Result<Invocable> {
        let key = match id {
            HandlerId::Direct(invocable) => return Ok(invocable.clone()),
            other => other.to_string(),
        };

        if let Some(hit) = self.cache.borrow().get(&key) {
            return Ok(hit.clone());
        }

        let resolved = match id {
            HandlerId::Static { class, method } => self
                .classes
                .get(class)
                .and_then(|entry| entry.statics.get(method))
                .cloned(),
            HandlerId::Service { key: service, method } => match self.services.get(service) {
                Some(svc) => svc.method(method),
                None => self
                    .classes
                    .get(service)
                    .and_then(|entry| entry.factory.as_ref())
                    .and_then(|factory| factory().method(method)),
            },
            HandlerId::Direct(_) => None,
        };

        match resolved {
            Some(invocable) => {
                debug!(handler = %key, "Handler resolved");
                // Instances created by a factory are not shared between resolutions.
                if !self.is_factory_backed(id) {
                    self.cache
                        .borrow_mut()
                        .insert(key, invocable.clone());
                }
                Ok(invocable)
            }
            None => {
                warn!(handler = %key, "Handler resolution failed");
                Err(RoutingError::unresolved(key))
            }
        }
    }

    fn is_factory_backed(&self, id: &HandlerId) -> bool {
        matches!(id, HandlerId::Service { key, .. } if !self.services.contains_key(key))
    }

    /// Resolve every route's handler once, surfacing configuration mistakes
    /// before the first request.
    pub fn validate(&self, routes: &RouteCollection) -> Result<()> {
        for route in routes {
            self.resolve(route.handler())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn constant(v: serde_json::Value) -> Invocable {
        Invocable::new(move |_| Ok(v.clone()))
    }

    #[test]
    fn parses_static_handlers() {
        let parser = HandlerParser::new().class(
            "Pages",
            MethodTable::new().method("home", constant(json!(true))),
        );
        assert!(parser.parse("Pages::home").is_ok());
        let err = parser.parse("Pages::missing").unwrap_err();
        assert_eq!(err.to_string(), "no routing handler could be found for 'Pages::missing'");
        assert!(matches!(
            parser.parse("Missing::bar"),
            Err(RoutingError::HandlerResolution { ref identifier }) if identifier == "Missing::bar"
        ));
    }

    #[test]
    fn parses_handler_as_service() {
        let parser = HandlerParser::new()
            .service(
                "handler",
                Arc::new(MethodTable::new().method("fake", constant(json!(1)))),
            )
            .service(
                "simple_handler",
                Arc::new(MethodTable::new().method("none_param", constant(json!(2)))),
            );
        assert!(parser.parse("handler@fake").is_ok());
        assert!(parser.parse("simple_handler@none_param").is_ok());
        assert!(parser.parse("handler@none_param").is_err());
        assert!(parser.parse("absent@fake").is_err());
    }

    #[test]
    fn instantiates_classes_without_a_service() {
        let created = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&created);
        let parser = HandlerParser::new().instantiable("SimpleHandler", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Arc::new(MethodTable::new().method("none_param", constant(json!(null))))
        });
        assert!(parser.parse("SimpleHandler@none_param").is_ok());
        assert!(parser.parse("SimpleHandler@none_param").is_ok());
        assert_eq!(created.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn direct_invocables_bypass_lookup() {
        let parser = HandlerParser::new();
        let id = HandlerId::Direct(constant(json!("x")));
        assert!(parser.resolve(&id).is_ok());
    }
}
