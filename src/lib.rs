//! Potplot: Plot Generation Client
//!
//! Configures parameters for quantum-potential models, requests rendered plot
//! data from a remote computation service, and presents or exports the result.

pub mod cli;
pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod params;
pub mod render;
pub mod request;
pub mod session;
