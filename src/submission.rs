//! Check-in and journal form submission.
//!
//! A form is `Idle` until submitted, `Submitting` while the service call is
//! in flight, then back to `Idle`: cleared after a success, untouched after
//! a failure. A result that arrives after the form was unmounted is
//! dropped without touching the form.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, MutexGuard,
};

use async_trait::async_trait;
use log::{debug, trace};

use crate::{Notice, Presence, RatingsDraft, Result, WellError, WellnessClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting,
}

#[derive(Debug)]
pub enum SubmissionOutcome {
    /// Saved; the form has been cleared
    Saved(Notice),
    /// Not saved; the form keeps the user's input
    Failed { notice: Notice, error: WellError },
    /// The form was unmounted before the call resolved
    Discarded,
}

/// A draft that knows how to submit itself through the client.
#[async_trait]
pub trait Submit: Clone + Default + Send + Sync + 'static {
    /// Shown when the submission succeeds
    const SUCCESS: &'static str;
    /// Shown when the service call fails
    const FAILURE: &'static str;

    async fn submit(&self, client: &WellnessClient) -> Result<()>;
}

/// Inputs of the daily check-in form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckInDraft {
    pub ratings: RatingsDraft,
    pub notes: String,
}

#[async_trait]
impl Submit for CheckInDraft {
    const SUCCESS: &'static str = "Check-in saved successfully!";
    const FAILURE: &'static str = "Failed to save check-in";

    async fn submit(&self, client: &WellnessClient) -> Result<()> {
        client.submit_check_in(&self.ratings, &self.notes).await
    }
}

/// Inputs of the journal form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JournalDraft {
    pub prompt: Presence<String>,
    pub entry: String,
}

#[async_trait]
impl Submit for JournalDraft {
    const SUCCESS: &'static str = "Journal entry saved!";
    const FAILURE: &'static str = "Failed to save journal entry";

    async fn submit(&self, client: &WellnessClient) -> Result<()> {
        client
            .submit_journal_entry(&self.entry, self.prompt.clone())
            .await
    }
}

struct FormInner<D> {
    draft: D,
    state: SubmissionState,
}

/// Form state shared between a view and its in-flight submission.
pub struct Form<D> {
    inner: Arc<Mutex<FormInner<D>>>,
    mounted: Arc<AtomicBool>,
}

impl<D> Clone for Form<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            mounted: Arc::clone(&self.mounted),
        }
    }
}

impl<D: Submit> Default for Form<D> {
    fn default() -> Self {
        Self::new(D::default())
    }
}

impl<D: Submit> Form<D> {
    pub fn new(draft: D) -> Self {
        Self {
            inner: Arc::new(Mutex::new(FormInner {
                draft,
                state: SubmissionState::Idle,
            })),
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, FormInner<D>>> {
        self.inner
            .lock()
            .map_err(|_| WellError::LockAcquisitionFailed {
                message: "Failed to acquire lock on form state".to_string(),
            })
    }

    pub fn draft(&self) -> Result<D> {
        Ok(self.lock()?.draft.clone())
    }

    pub fn edit(&self, change: impl FnOnce(&mut D)) -> Result<()> {
        change(&mut self.lock()?.draft);
        Ok(())
    }

    pub fn state(&self) -> Result<SubmissionState> {
        Ok(self.lock()?.state)
    }

    /// The view owning this form went away.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    /// Submits the current draft. Refused while another submission is in flight.
    pub async fn submit(&self, client: &WellnessClient) -> Result<SubmissionOutcome> {
        let draft = {
            let mut inner = self.lock()?;
            if inner.state == SubmissionState::Submitting {
                return Err(WellError::SubmissionInProgress);
            }
            inner.state = SubmissionState::Submitting;
            inner.draft.clone()
        };
        trace!("Form submitting");

        let result = draft.submit(client).await;

        if !self.is_mounted() {
            debug!("Form unmounted before its submission resolved, discarding result");
            return Ok(SubmissionOutcome::Discarded);
        }

        let mut inner = self.lock()?;
        inner.state = SubmissionState::Idle;
        match result {
            Ok(()) => {
                inner.draft = D::default();
                Ok(SubmissionOutcome::Saved(Notice::success(D::SUCCESS)))
            }
            Err(error) => {
                debug!("Form submission failed, keeping input: {}", error);
                Ok(SubmissionOutcome::Failed {
                    notice: Notice::for_error(&error, D::FAILURE),
                    error,
                })
            }
        }
    }
}
