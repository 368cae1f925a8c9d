//! novahub is a terminal client for a multi-agent HTTP backend.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the mode registry, the conversation controller, reply
//!   projection, and configuration.
//! - [`api`] defines the wire types and the [`api::AgentBackend`] seam with its
//!   HTTP implementation.
//! - [`ui`] renders the terminal interface and runs the interactive event loop.
//! - [`utils`] holds logging and URL helpers.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
