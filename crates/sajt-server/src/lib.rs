//! Development file server for sajt sites.
//!
//! Serves the generated output tree over plain HTTP while the rebuild loop
//! keeps rewriting it.

pub mod server;

pub use server::{router, DevServer, DevServerConfig, ServerError};
