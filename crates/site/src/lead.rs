//! Lead-capture form and the single webhook POST it produces.
//!
//! A submission attempt is never retried. Success is judged only by the HTTP
//! status (2xx); any other status or a network failure shows the failure
//! banner with the fallback contact email. The form is cleared after every
//! attempt, successful or not.

use chrono::{DateTime, SecondsFormat, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use voicefx_core::error::FxError;

use crate::config::SiteConfig;

/// Value of the `source` field on every submission.
pub const LEAD_SOURCE: &str = "website";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub message: String,
}

impl LeadForm {
    pub fn is_empty(&self) -> bool {
        [
            &self.name,
            &self.email,
            &self.phone,
            &self.company,
            &self.message,
        ]
        .iter()
        .all(|f| f.trim().is_empty())
    }

    /// Names of the required fields (`name`, `email`) that are blank or, for
    /// email, lack an `@`.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if !self.email.contains('@') {
            missing.push("email");
        }
        missing
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// JSON body posted to the webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadSubmission {
    pub source: String,
    /// ISO-8601 UTC timestamp with millisecond precision.
    pub ts: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub message: String,
}

impl LeadSubmission {
    pub fn new(form: &LeadForm, at: DateTime<Utc>) -> Self {
        Self {
            source: LEAD_SOURCE.to_owned(),
            ts: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            name: form.name.trim().to_owned(),
            email: form.email.trim().to_owned(),
            phone: form.phone.trim().to_owned(),
            company: form.company.trim().to_owned(),
            message: form.message.trim().to_owned(),
        }
    }

    pub fn to_json(&self) -> Result<String, FxError> {
        serde_json::to_string(self).map_err(|e| FxError::Io(e.to_string()))
    }
}

/// Which banner to show after an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Sent,
    Failed,
}

impl SubmitOutcome {
    pub fn from_status(status: u16) -> Self {
        if (200..300).contains(&status) {
            SubmitOutcome::Sent
        } else {
            SubmitOutcome::Failed
        }
    }

    /// Maps a transport result (status code or network error) to an outcome.
    pub fn from_response(response: Result<u16, FxError>) -> Self {
        match response {
            Ok(status) => {
                let outcome = Self::from_status(status);
                if outcome == SubmitOutcome::Failed {
                    warn!("lead webhook answered {status}");
                }
                outcome
            }
            Err(e) => {
                warn!("lead webhook unreachable: {e}");
                SubmitOutcome::Failed
            }
        }
    }

    pub fn is_success(self) -> bool {
        self == SubmitOutcome::Sent
    }

    /// Inline banner text.
    pub fn message(self, config: &SiteConfig) -> String {
        match self {
            SubmitOutcome::Sent => {
                "Thanks! We'll be in touch within one business day.".to_owned()
            }
            SubmitOutcome::Failed => format!(
                "Something went wrong sending your details. Please email us at {}.",
                config.contact_email
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormStatus {
    #[default]
    Idle,
    Submitting,
    Finished(SubmitOutcome),
}

/// The form's fields plus where it is in the submit cycle.
#[derive(Debug, Clone, Default)]
pub struct LeadFormState {
    pub form: LeadForm,
    status: FormStatus,
}

impl LeadFormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> FormStatus {
        self.status
    }

    /// Starts an attempt and returns the payload to send. Returns `None`
    /// while a previous attempt is still in flight.
    pub fn begin_submit(&mut self, at: DateTime<Utc>) -> Option<LeadSubmission> {
        if self.status == FormStatus::Submitting {
            return None;
        }
        self.status = FormStatus::Submitting;
        Some(LeadSubmission::new(&self.form, at))
    }

    /// Records the result of the POST. Fields are cleared whatever the
    /// outcome, so a failed attempt also loses the user's input.
    pub fn finish_submit(&mut self, response: Result<u16, FxError>) -> SubmitOutcome {
        let outcome = SubmitOutcome::from_response(response);
        if outcome.is_success() {
            info!("lead submitted");
        }
        self.form.clear();
        self.status = FormStatus::Finished(outcome);
        outcome
    }
}
