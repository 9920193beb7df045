//! Audit record assembly and delivery.
//!
//! An [`OperationLog`] declares the content and business-id templates for one
//! kind of operation. [`Recorder`] renders them against a request context,
//! fans the business id out into [`LogRecord`]s and hands them to a
//! [`RecordSink`].

mod biz_no;
mod error;
mod operation;
mod recorder;
mod sink;
mod user;

pub use biz_no::*;
pub use error::*;
pub use operation::*;
pub use recorder::*;
pub use sink::*;
pub use user::*;
