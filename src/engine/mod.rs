//! Template rendering engine.
//!
//! - [`TemplateEngine`]: owns the template queue and the handler chain
//! - [`HandlerRegistry`]: ordered, first-match-wins chain of handlers
//! - [`ObjectResolver`]: maps `(obj)` keys to live objects
//! - [`FaultReporter`]: receives batch faults

mod error;
mod registry;
mod render;
mod report;
mod resolver;
pub mod scanner;

pub use error::*;
pub use registry::*;
pub use render::*;
pub use report::*;
pub use resolver::*;
