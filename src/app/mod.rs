//! Application Layer
//!
//! Wires configuration, session state, guard, interceptor and logout into a
//! single context owned by the UI shell.

pub mod context;

pub use context::AppContext;
