use crate::matcher::{PatternMatcher, RequestMatcher};
use crate::request::{Parameters, RequestContext};
use crate::route::{load_routes, RouteCollection};
use crate::url_generator::{UrlGenerator, UrlType};
use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use http::Method;
use serde_json::json;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// Command-line interface for switchyard
///
/// Inspects a route table and exercises matching and URL generation
/// against it without running any handler.
#[derive(Parser, Debug)]
#[command(name = "switchyard")]
#[command(about = "Route table inspection, matching and URL generation", long_about = None)]
pub struct Cli {
    /// Route table (YAML or JSON)
    #[arg(short, long, global = true, env = "SWITCHYARD_ROUTE_TABLE")]
    pub table: Option<PathBuf>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List routes in registration (matching) order
    Routes,
    /// Match a request against the table and print the outcome as JSON
    Match {
        /// Request URL; a bare path is taken as `http://localhost<path>`
        url: String,

        /// HTTP method
        #[arg(short, long, default_value = "GET")]
        method: String,

        /// Prefix stripped from the URL path before matching
        #[arg(long, default_value = "")]
        base_path: String,
    },
    /// Generate the URL of a named route
    Generate {
        /// Route name
        name: String,

        /// Route parameter, repeatable: `--param id=42`
        #[arg(short, long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,

        /// Produce `scheme://host[:port]/...` instead of a path
        #[arg(long, default_value_t = false)]
        absolute: bool,

        /// Host of the ambient request
        #[arg(long)]
        host: Option<String>,

        /// Scheme of the ambient request
        #[arg(long)]
        scheme: Option<String>,

        /// Port of the ambient request
        #[arg(long)]
        port: Option<u16>,

        /// Base path prepended to generated paths
        #[arg(long, default_value = "")]
        base_path: String,
    },
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Parse arguments from the process and run.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    execute(&cli, &mut stdout.lock())
}

/// Run `cli`, writing command output to `out`.
pub fn execute(cli: &Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let table = cli
        .table
        .as_ref()
        .ok_or_else(|| anyhow!("no route table given (use --table or SWITCHYARD_ROUTE_TABLE)"))?;
    let routes = load_routes(table)?;
    match &cli.command {
        Commands::Routes => print_routes(&routes, out),
        Commands::Match {
            url,
            method,
            base_path,
        } => print_match(&routes, url, method, base_path, out),
        Commands::Generate {
            name,
            params,
            absolute,
            host,
            scheme,
            port,
            base_path,
        } => {
            let mut ctx = RequestContext::builder().base_path(base_path);
            if let Some(host) = host {
                ctx = ctx.host(host);
            }
            if let Some(scheme) = scheme {
                ctx = ctx.scheme(scheme);
            }
            if let Some(port) = port {
                ctx = ctx.port(*port);
            } else if let Some(scheme) = scheme {
                ctx = ctx.port(crate::request::default_port(scheme));
            }
            let generator = UrlGenerator::with_context(Arc::new(routes), ctx.build());
            let params: Parameters = params.iter().map(|(k, v)| (k, v.as_str())).collect();
            let url_type = if *absolute {
                UrlType::AbsolutePath
            } else {
                UrlType::RelativePath
            };
            let url = generator.generate(name, &params, None, url_type)?;
            writeln!(out, "{url}")?;
            Ok(())
        }
    }
}

fn print_routes(routes: &RouteCollection, out: &mut impl Write) -> anyhow::Result<()> {
    for route in routes {
        let methods = if route.methods().is_empty() {
            "ANY".to_string()
        } else {
            route
                .methods()
                .iter()
                .map(Method::as_str)
                .collect::<Vec<_>>()
                .join("|")
        };
        let host = route.host().map(|h| h.source()).unwrap_or("*");
        writeln!(
            out,
            "{:<24} {:<12} {:<32} {:<24} {}",
            route.name(),
            methods,
            route.path().source(),
            host,
            route.handler()
        )?;
    }
    Ok(())
}

fn print_match(
    routes: &RouteCollection,
    url: &str,
    method: &str,
    base_path: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .with_context(|| format!("invalid method '{method}'"))?;
    let absolute = if url.starts_with('/') {
        format!("http://localhost{url}")
    } else {
        url.to_string()
    };
    let request = RequestContext::from_url(method, &absolute, base_path)?;
    let matched = PatternMatcher.match_request(&request, routes);
    let report = if matched.is_match() {
        json!({
            "status": "match",
            "name": matched.name(),
            "handler": matched.handler().map(ToString::to_string),
            "parameters": matched.parameters().to_map(),
        })
    } else {
        json!({ "status": "no_match", "path": matched.path() })
    };
    writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    Ok(())
}
