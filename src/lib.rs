//! `annot` - Annotation recorder for monitoring APIs
//!
//! # Features
//!
//! - **Timed annotations**: bracket a unit of work with UTC start/stop
//!   capture and submit one event record per activation
//! - **Closure mode**: wrap a call with [`Annotation::record`] /
//!   [`Annotation::try_record`] — submission runs even when the work fails
//! - **Scoped mode**: [`Annotation::enter`] returns a guard that submits on
//!   every exit path, including early return and panic unwind
//! - **Pluggable transport**: the [`ResourceClient`] trait keeps the
//!   recorder independent of the HTTP layer; [`MonitoringClient`] is the
//!   bundled blocking `reqwest` implementation
//!
//! # Example
//!
//! ```rust,no_run
//! use annot::{Annotation, MonitoringClient};
//!
//! fn main() -> annot::Result<()> {
//!     let client = MonitoringClient::new("https://api.example.com/v2", "token")?;
//!     let mut annotation = Annotation::new(&client, "deploy 1.4.2", "deploys");
//!
//!     let mut guard = annotation.enter();
//!     guard.description = "rolling restart of web tier".into();
//!     // ... the work being annotated ...
//!     guard.finish()?;
//!     Ok(())
//! }
//! ```

pub mod annotation;
pub mod client;
pub mod error;
pub mod guard;

pub use annotation::{datetime_to_epoch, Annotation, RESOURCE_PATH};
pub use client::{ApiResponse, HttpResponse, MonitoringClient, ResourceClient};
pub use error::{AnnotationError, Result};
pub use guard::AnnotationGuard;

/// Version of annot
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
