//! xldc: command line client for XL Deploy
//!
//! Layers, innermost first: `domain` (profile, types, templates),
//! `application` (services, rendering), `infrastructure` (REST client,
//! filesystem, wiring), `cli` (arguments and dispatch).

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
