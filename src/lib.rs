//! Oplog - audit-log message templates rendered against request context.
//!
//! A template such as `"User {authUser.userName} updated order {param.id}"`
//! is rendered by a chain of expression handlers. Placeholders no handler
//! resolves are kept verbatim.

pub mod config;
pub mod context;
pub mod display;
pub mod engine;
pub mod handlers;
pub mod math;
pub mod record;
