//! Annotation recording
//!
//! An [`Annotation`] holds the descriptive fields of a monitoring-API
//! annotation (title, category, description, related metric names), captures
//! a start and a stop instant around a unit of work, and submits one
//! creation request per [`create`](Annotation::create) call.
//!
//! Two activation modes bracket the work automatically:
//! - [`record`](Annotation::record) / [`try_record`](Annotation::try_record)
//!   wrap a closure, submitting after it returns or fails.
//! - [`enter`](Annotation::enter) returns a scoped [`AnnotationGuard`] that
//!   submits on every exit path.

use chrono::{NaiveDateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::client::{ApiResponse, ResourceClient};
use crate::error::{AnnotationError, Result};
use crate::guard::AnnotationGuard;

/// Resource path annotations are created under
pub const RESOURCE_PATH: &str = "annotation";

/// Convert a UTC-naive instant to whole seconds since the Unix epoch.
///
/// The instant's fields are interpreted as UTC, never local time, and any
/// sub-second component is truncated (1970-01-01T00:00:01.999 → 1).
#[must_use]
pub fn datetime_to_epoch(dt: NaiveDateTime) -> i64 {
    dt.and_utc().timestamp()
}

/// Wire record submitted to the API; field set and order match the
/// annotation endpoint's contract.
#[derive(Serialize)]
struct AnnotationRecord<'a> {
    title: &'a str,
    category: &'a str,
    start: i64,
    stop: i64,
    description: &'a str,
    rel_metrics: &'a [String],
}

/// A timestamped, titled event record for the monitoring API.
///
/// Construction performs no network call; one of the activation modes (or a
/// manual [`begin`](Self::begin)/[`end`](Self::end) pair) populates the
/// timestamps, and [`create`](Self::create) submits the current state.
///
/// One activation per instance at a time: the timestamps are plain mutable
/// fields, so overlapping activations sharing an instance would race. Use
/// [`fresh`](Self::fresh) to get an independent instance per activation.
pub struct Annotation<'c, C: ResourceClient> {
    client: &'c C,
    title: String,
    category: String,
    /// Free-form description, mutable until submission
    pub description: String,
    /// Names of metrics related to this annotation. The API expects the
    /// fully qualified `<digits>_<name>` form; not validated locally.
    pub rel_metrics: Vec<String>,
    start: Option<NaiveDateTime>,
    stop: Option<NaiveDateTime>,
    last_response: Option<C::Response>,
}

impl<'c, C: ResourceClient> Annotation<'c, C> {
    /// Create an annotation with the required fields and empty
    /// description/related metrics.
    pub fn new(client: &'c C, title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            client,
            title: title.into(),
            category: category.into(),
            description: String::new(),
            rel_metrics: Vec::new(),
            start: None,
            stop: None,
            last_response: None,
        }
    }

    /// Create an annotation with all descriptive fields set.
    pub fn with_details(
        client: &'c C,
        title: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
        rel_metrics: Vec<String>,
    ) -> Self {
        Self {
            description: description.into(),
            rel_metrics,
            ..Self::new(client, title, category)
        }
    }

    /// Clone the descriptive metadata into a new instance with unset
    /// timestamps, for use by a separate activation.
    #[must_use]
    pub fn fresh(&self) -> Annotation<'c, C> {
        Annotation {
            client: self.client,
            title: self.title.clone(),
            category: self.category.clone(),
            description: self.description.clone(),
            rel_metrics: self.rel_metrics.clone(),
            start: None,
            stop: None,
            last_response: None,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Start instant of the current activation, if captured
    #[must_use]
    pub fn start(&self) -> Option<NaiveDateTime> {
        self.start
    }

    /// Stop instant of the current activation, if captured
    #[must_use]
    pub fn stop(&self) -> Option<NaiveDateTime> {
        self.stop
    }

    /// Response from the most recent submission attempt
    #[must_use]
    pub fn last_response(&self) -> Option<&C::Response> {
        self.last_response.as_ref()
    }

    /// Capture the current UTC instant as the activation start
    pub fn begin(&mut self) {
        self.start = Some(Utc::now().naive_utc());
    }

    /// Capture the current UTC instant as the activation end
    pub fn end(&mut self) {
        self.stop = Some(Utc::now().naive_utc());
    }

    /// Submit an annotation built from the current state.
    ///
    /// Exactly one creation request per call, no retries. The response is
    /// stored in [`last_response`](Self::last_response) before its status is
    /// checked, so a rejected submission still leaves the response
    /// inspectable. Returns `&mut self` for chaining.
    ///
    /// # Errors
    ///
    /// [`AnnotationError::MissingTimestamp`] if `begin`/`end` have not both
    /// run; any transport or API error from the client, unmodified.
    pub fn create(&mut self) -> Result<&mut Self> {
        let start = self
            .start
            .ok_or(AnnotationError::MissingTimestamp("start"))?;
        let stop = self.stop.ok_or(AnnotationError::MissingTimestamp("stop"))?;

        let record = AnnotationRecord {
            title: &self.title,
            category: &self.category,
            start: datetime_to_epoch(start),
            stop: datetime_to_epoch(stop),
            description: &self.description,
            rel_metrics: &self.rel_metrics,
        };
        let data = serde_json::to_value(&record)?;

        let response = self.client.create(RESOURCE_PATH, &data)?;
        let status = response.raise_for_status();
        self.last_response = Some(response);
        status?;
        Ok(self)
    }

    /// Run `f` bracketed by start/stop capture, then submit.
    ///
    /// Returns `f`'s value once the submission succeeds. A panic in `f`
    /// still ends timing and submits before the unwind continues (the
    /// submission error, if any, is logged on that path).
    pub fn record<F, T>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce() -> T,
    {
        let guard = self.enter();
        let value = f();
        guard.finish()?;
        Ok(value)
    }

    /// Run fallible work bracketed by start/stop capture, submitting whether
    /// or not it succeeds.
    ///
    /// If `f` fails, the annotation is still submitted and `f`'s error is
    /// returned; a submission failure on that path is logged at `warn`
    /// level rather than displacing it. If `f` succeeds, a submission
    /// failure propagates via `From`. A panic in `f` also submits before
    /// the unwind continues.
    pub fn try_record<F, T, E>(&mut self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce() -> std::result::Result<T, E>,
        E: From<AnnotationError>,
    {
        let guard = self.enter();
        let result = f();
        let submitted = guard.finish();
        match result {
            Ok(value) => {
                submitted?;
                Ok(value)
            }
            Err(inner) => {
                if let Err(err) = submitted {
                    warn!("annotation submission failed after inner error: {err}");
                }
                Err(inner)
            }
        }
    }

    /// Begin a scoped activation: captures the start instant and returns a
    /// guard that ends timing and submits on every exit path.
    pub fn enter(&mut self) -> AnnotationGuard<'_, 'c, C> {
        self.begin();
        AnnotationGuard::new(self)
    }
}
