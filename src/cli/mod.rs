//! # CLI Module
//!
//! Command-line access to a route table, for checking configuration without
//! wiring up handlers.
//!
//! ## Commands
//!
//! ### `routes`
//!
//! List every route in matching order with its methods, path, host template
//! and handler identifier:
//!
//! ```bash
//! switchyard --table routes.yaml routes
//! ```
//!
//! ### `match`
//!
//! Report which route a request would hit and the parameters it captures:
//!
//! ```bash
//! switchyard --table routes.yaml match /users/42
//! switchyard --table routes.yaml match --method PUT https://api.example.com/app/users/42 --base-path /app
//! ```
//!
//! ### `generate`
//!
//! Build the URL of a named route:
//!
//! ```bash
//! switchyard --table routes.yaml generate user.show --param id=42
//! switchyard --table routes.yaml generate user.show --param id=42 --absolute --host api.example.com --scheme https
//! ```
//!
//! The table may also be given through `SWITCHYARD_ROUTE_TABLE`.

mod commands;


pub use commands::{execute, run_cli, Cli, Commands};
