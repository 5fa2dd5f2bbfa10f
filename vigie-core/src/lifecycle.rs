//! Analysis request lifecycle.
//!
//! ```text
//! Idle ──submit──▶ Submitting ──ok──▶ Success
//!                       │
//!                       └──error──▶ Failure
//! any ──reset──▶ Idle
//! ```
//!
//! Only one submission may be in flight. Each submission is tagged with a generation
//! number; a response that comes back after `reset()` (or after a newer submission) no
//! longer matches the current generation and is dropped instead of overwriting the
//! visitor's fresh state.

use crate::analytics::{self, AnalyticsEvent, EventSink};
use crate::normalize::normalize_url;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tracing::{debug, info, warn};
use vigie_client::{
    AnalysisError, AnalysisRequest, AnalysisResult, ApiClient, ConfirmationPayload,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    #[default]
    Idle,
    Submitting,
    Success,
    Failure,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("Please accept the terms of use to continue.")]
    TermsNotAccepted,

    #[error("Please enter the URL of the site to analyze.")]
    EmptyUrl,

    #[error("An analysis is already in progress.")]
    AlreadySubmitting,
}

/// What the visitor submitted plus what came back, kept for the booking relay.
#[derive(Debug, Clone, PartialEq)]
pub struct UserContext {
    pub request: AnalysisRequest,
    /// Raw `/api/analyze` body.
    pub results: serde_json::Value,
}

impl UserContext {
    pub fn confirmation_payload(&self) -> ConfirmationPayload {
        ConfirmationPayload {
            email: self.request.email.clone(),
            url: self.request.url.clone(),
            sector: self.request.sector.clone(),
            offer: self.request.offer.clone(),
            analysis_type: self.request.analysis_type,
            results: self.results.clone(),
        }
    }
}

/// Observable state of the current visitor session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub state: LifecycleState,
    pub result: Option<AnalysisResult>,
    pub error: Option<String>,
    /// URL shown while the analysis runs.
    pub analyzing_url: Option<String>,
    pub user_context: Option<UserContext>,
    generation: u64,
}

impl Session {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Completed(AnalysisResult),
    Failed(AnalysisError),
    /// The session was reset or resubmitted while this request was in flight.
    Discarded,
}

/// Validates a request and canonicalizes its URL.
pub fn prepare_request(request: AnalysisRequest) -> Result<AnalysisRequest, LifecycleError> {
    if !request.accept_terms {
        return Err(LifecycleError::TermsNotAccepted);
    }

    let url = normalize_url(&request.url);
    if url.is_empty() {
        return Err(LifecycleError::EmptyUrl);
    }

    Ok(AnalysisRequest { url, ..request })
}

#[derive(Clone)]
pub struct AnalysisController {
    client: ApiClient,
    session: Arc<Mutex<Session>>,
    events: Arc<dyn EventSink>,
}

impl AnalysisController {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            session: Arc::new(Mutex::new(Session::default())),
            events: analytics::default_sink(),
        }
    }

    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn snapshot(&self) -> Session {
        self.session().clone()
    }

    pub fn state(&self) -> LifecycleState {
        self.session().state
    }

    /// False while a submission is in flight; the submit control should be disabled.
    pub fn can_submit(&self) -> bool {
        self.state() != LifecycleState::Submitting
    }

    pub fn result(&self) -> Option<AnalysisResult> {
        self.session().result.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.session().error.clone()
    }

    pub fn analyzing_url(&self) -> Option<String> {
        self.session().analyzing_url.clone()
    }

    pub fn user_context(&self) -> Option<UserContext> {
        self.session().user_context.clone()
    }

    /// Submits an analysis and waits for its outcome.
    ///
    /// Rejected submissions leave the session untouched.
    pub async fn submit(&self, request: AnalysisRequest) -> Result<SubmitOutcome, LifecycleError> {
        let (generation, request) = self.begin(request)?;

        self.emit(AnalyticsEvent::analysis_started(
            &request.url,
            request.analysis_type,
        ));

        let response = self.client.analyze(&request).await;

        let mut session = self.session();
        if session.generation != generation || session.state != LifecycleState::Submitting {
            warn!(
                "Discarding analysis response for {} (generation {}, current {})",
                request.url, generation, session.generation
            );
            return Ok(SubmitOutcome::Discarded);
        }
        session.analyzing_url = None;

        match response {
            Ok(response) => {
                let result = response.result;
                session.state = LifecycleState::Success;
                session.error = None;
                session.result = Some(result.clone());
                session.user_context = Some(UserContext {
                    request: request.clone(),
                    results: response.raw,
                });
                drop(session);

                info!("Analysis of {} completed", request.url);
                self.emit(AnalyticsEvent::analysis_completed(
                    &request.url,
                    request.analysis_type,
                    result.seo.as_ref().map(|s| s.score),
                    result.ia.as_ref().map(|s| s.score),
                ));
                Ok(SubmitOutcome::Completed(result))
            }
            Err(error) => {
                session.state = LifecycleState::Failure;
                session.error = Some(error.to_string());
                drop(session);

                info!("Analysis of {} failed: {}", request.url, error);
                Ok(SubmitOutcome::Failed(error))
            }
        }
    }

    /// Returns to `Idle`, clearing result, error, in-progress URL and user context.
    ///
    /// An in-flight request is not cancelled; its response will be discarded.
    pub fn reset(&self) {
        let mut session = self.session();
        if session.state == LifecycleState::Submitting {
            debug!(
                "Reset while analysis of {:?} is in flight",
                session.analyzing_url
            );
        }

        let generation = session.generation + 1;
        *session = Session {
            generation,
            ..Session::default()
        };
    }

    fn begin(&self, request: AnalysisRequest) -> Result<(u64, AnalysisRequest), LifecycleError> {
        let mut session = self.session();
        if session.state == LifecycleState::Submitting {
            return Err(LifecycleError::AlreadySubmitting);
        }

        let request = prepare_request(request)?;

        session.generation += 1;
        session.state = LifecycleState::Submitting;
        session.result = None;
        session.error = None;
        session.user_context = None;
        session.analyzing_url = Some(request.url.clone());

        debug!(
            "Submitting analysis #{} for {}",
            session.generation, request.url
        );
        Ok((session.generation, request))
    }

    fn emit(&self, event: AnalyticsEvent) {
        if let Err(e) = self.events.track(&event) {
            warn!("Failed to record analytics event {}: {}", event.name, e);
        }
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_request_normalizes_url() {
        let request = AnalysisRequest::new("example.com/pricing", "a@b.com").with_accept_terms(true);
        let prepared = prepare_request(request).unwrap();
        assert_eq!(prepared.url, "https://example.com");
    }

    #[test]
    fn test_prepare_request_requires_terms() {
        let request = AnalysisRequest::new("example.com", "a@b.com");
        assert_eq!(
            prepare_request(request),
            Err(LifecycleError::TermsNotAccepted)
        );
    }

    #[test]
    fn test_prepare_request_requires_url() {
        let request = AnalysisRequest::new("  ", "a@b.com").with_accept_terms(true);
        assert_eq!(prepare_request(request), Err(LifecycleError::EmptyUrl));
    }
}
