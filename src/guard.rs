//! Scoped activation guard
//!
//! [`AnnotationGuard`] brackets a block of work: [`Annotation::enter`]
//! captures the start instant, the guard derefs to the annotation so the
//! block can still adjust `description`/`rel_metrics`, and leaving the scope
//! captures the stop instant and submits. [`finish`](AnnotationGuard::finish)
//! surfaces the submission error; dropping the guard any other way (early
//! return, `?`, panic unwind) still submits and logs a failure instead.

use std::ops::{Deref, DerefMut};

use tracing::warn;

use crate::annotation::Annotation;
use crate::client::ResourceClient;
use crate::error::Result;

/// Guard for one scoped activation of an [`Annotation`]
pub struct AnnotationGuard<'a, 'c, C: ResourceClient> {
    annotation: &'a mut Annotation<'c, C>,
    finished: bool,
}

impl<'a, 'c, C: ResourceClient> AnnotationGuard<'a, 'c, C> {
    pub(crate) fn new(annotation: &'a mut Annotation<'c, C>) -> Self {
        Self {
            annotation,
            finished: false,
        }
    }

    /// End timing and submit, surfacing any submission error.
    pub fn finish(mut self) -> Result<()> {
        self.finished = true;
        self.annotation.end();
        self.annotation.create().map(|_| ())
    }
}

impl<'c, C: ResourceClient> Deref for AnnotationGuard<'_, 'c, C> {
    type Target = Annotation<'c, C>;

    fn deref(&self) -> &Self::Target {
        self.annotation
    }
}

impl<'c, C: ResourceClient> DerefMut for AnnotationGuard<'_, 'c, C> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.annotation
    }
}

impl<C: ResourceClient> Drop for AnnotationGuard<'_, '_, C> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        self.annotation.end();
        if let Err(err) = self.annotation.create() {
            // Drop cannot propagate; callers needing the error use finish()
            warn!("annotation submission failed on scope exit: {err}");
        }
    }
}
