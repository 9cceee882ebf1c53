#![allow(dead_code)]

pub mod fixtures {
    use http::Method;
    use serde_json::json;
    use std::sync::Arc;
    use switchyard::handler::{HandlerParser, Invocable, MethodTable, Service};
    use switchyard::route::{Route, RouteCollection};
    use switchyard::runtime_config::RuntimeConfig;
    use switchyard::{DispatchOptions, Parameters, Router};

    /// `home`, `user.show`, `user.forward`, `user.fail`, in that order.
    pub fn routes() -> RouteCollection {
        RouteCollection::from_routes([
            Route::builder("home", "/")
                .method(Method::GET)
                .handler("Pages::home")
                .build()
                .unwrap(),
            Route::builder("user.show", "/users/{id}")
                .method(Method::GET)
                .requirement("id", r"\d+")
                .handler("users@show")
                .build()
                .unwrap(),
            Route::builder("user.forward", "/forward/{id}")
                .handler("users@forward")
                .build()
                .unwrap(),
            Route::builder("user.fail", "/fail")
                .handler("users@fail")
                .build()
                .unwrap(),
        ])
        .unwrap()
    }

    /// The `users` service: `show` echoes `id`, `forward` dispatches
    /// `user.show` with its own `id`, `fail` returns an error.
    pub fn users_service() -> Arc<dyn Service> {
        Arc::new(
            MethodTable::new()
                .method(
                    "show",
                    Invocable::new(|call| Ok(json!(call.args()[0]))).with_argument("id"),
                )
                .method(
                    "forward",
                    Invocable::new(|call| {
                        let params = Parameters::new().with("id", call.require("id")?);
                        let inner = call.router().dispatch_route(
                            "user.show",
                            &params,
                            &DispatchOptions::new(),
                        )?;
                        Ok(json!({ "forwarded": inner }))
                    }),
                )
                .method(
                    "fail",
                    Invocable::new(|_| Err(anyhow::anyhow!("users backend unavailable"))),
                ),
        )
    }

    pub fn parser() -> HandlerParser {
        HandlerParser::new()
            .class(
                "Pages",
                MethodTable::new().method("home", Invocable::new(|_| Ok(json!("ok")))),
            )
            .service("users", users_service())
    }

    pub fn router() -> Router {
        Router::builder(routes())
            .config(RuntimeConfig::default())
            .parser(parser())
            .build()
            .unwrap()
    }
}

pub mod temp_files {
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Route table file with the given extension; removed on drop.
    pub fn route_table(content: &str, ext: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .prefix("switchyard_test_")
            .suffix(&format!(".{ext}"))
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }
}

pub mod tracing_util {
    use std::sync::{Arc, Mutex};
    use tracing::span::{Attributes, Id};
    use tracing::Subscriber;
    use tracing_subscriber::field::Visit;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::registry::LookupSpan;
    use tracing_subscriber::{Layer, Registry};

    /// A span seen by [`TestTracing`]: its name and recorded fields.
    #[derive(Debug, Clone, Default)]
    pub struct CapturedSpan {
        pub name: String,
        pub fields: Vec<(String, String)>,
    }

    impl CapturedSpan {
        pub fn field(&self, name: &str) -> Option<&str> {
            self.fields
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
        }
    }

    struct FieldVisitor<'a>(&'a mut Vec<(String, String)>);

    impl Visit for FieldVisitor<'_> {
        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
            self.0.push((field.name().to_string(), format!("{value:?}")));
        }

        fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
            self.0.push((field.name().to_string(), value.to_string()));
        }
    }

    struct CaptureLayer {
        spans: Arc<Mutex<Vec<CapturedSpan>>>,
    }

    impl<S> Layer<S> for CaptureLayer
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
    {
        fn on_new_span(&self, attrs: &Attributes<'_>, _id: &Id, _ctx: Context<'_, S>) {
            let mut span = CapturedSpan {
                name: attrs.metadata().name().to_string(),
                fields: Vec::new(),
            };
            attrs.record(&mut FieldVisitor(&mut span.fields));
            self.spans.lock().unwrap().push(span);
        }
    }

    /// Captures spans created on the current thread while alive.
    pub struct TestTracing {
        spans: Arc<Mutex<Vec<CapturedSpan>>>,
        _guard: tracing::subscriber::DefaultGuard,
    }

    impl TestTracing {
        pub fn init() -> Self {
            let spans = Arc::new(Mutex::new(Vec::new()));
            let layer = CaptureLayer {
                spans: Arc::clone(&spans),
            };
            let subscriber = Registry::default().with(layer);
            let guard = tracing::subscriber::set_default(subscriber);
            Self {
                spans,
                _guard: guard,
            }
        }

        pub fn spans_named(&self, name: &str) -> Vec<CapturedSpan> {
            self.spans
                .lock()
                .unwrap()
                .iter()
                .filter(|s| s.name == name)
                .cloned()
                .collect()
        }
    }
}
