use crate::config::BackendSettings;
use crate::models::{CandidateId, DecisionAck, DecisionKind, NextCandidate, NextPetResponse};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the adoption backend
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    #[error("Backend rejected request with status {status}")]
    Rejected { status: u16 },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

impl BackendError {
    /// True when the request never produced an HTTP response
    pub fn is_transport(&self) -> bool {
        match self {
            BackendError::RequestError(e) => e.status().is_none(),
            BackendError::Unreachable(_) => true,
            BackendError::Rejected { .. } | BackendError::InvalidResponse(_) => false,
        }
    }
}

/// The three endpoints the client consumes
#[async_trait]
pub trait DecisionBackend: Send + Sync {
    /// `POST /skip/{id}` or `POST /adopt/{id}`; any 2xx is success
    async fn submit_decision(
        &self,
        kind: DecisionKind,
        candidate_id: &CandidateId,
    ) -> Result<(), BackendError>;

    /// `GET /next-pet`
    async fn next_candidate(&self) -> Result<NextCandidate, BackendError>;
}

/// reqwest-backed client for the adoption backend
pub struct HttpBackend {
    base_url: String,
    client: Client,
}

impl HttpBackend {
    /// Create a new backend client
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    pub fn from_settings(settings: &BackendSettings) -> Result<Self, BackendError> {
        Self::new(
            settings.base_url.clone(),
            Duration::from_secs(settings.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn decision_url(&self, kind: DecisionKind, candidate_id: &CandidateId) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            kind.endpoint(),
            urlencoding::encode(candidate_id.as_str())
        )
    }

    fn next_pet_url(&self) -> String {
        format!("{}/next-pet", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl DecisionBackend for HttpBackend {
    async fn submit_decision(
        &self,
        kind: DecisionKind,
        candidate_id: &CandidateId,
    ) -> Result<(), BackendError> {
        let url = self.decision_url(kind, candidate_id);

        tracing::debug!("Submitting {} decision: {}", kind, url);

        // Without this header the backend answers with a redirect to an HTML page
        let response = self
            .client
            .post(&url)
            .header("X-Requested-With", "XMLHttpRequest")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Rejected {
                status: status.as_u16(),
            });
        }

        match response.json::<DecisionAck>().await {
            Ok(ack) => tracing::debug!("Decision {} for {} acknowledged: {}", kind, candidate_id, ack.status),
            Err(_) => tracing::debug!("Decision {} for {} accepted ({})", kind, candidate_id, status),
        }

        Ok(())
    }

    async fn next_candidate(&self) -> Result<NextCandidate, BackendError> {
        let url = self.next_pet_url();

        tracing::debug!("Fetching next candidate from: {}", url);

        let response = self
            .client
            .get(&url)
            .header("X-Requested-With", "XMLHttpRequest")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Rejected {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed: NextPetResponse = serde_json::from_str(&body)
            .map_err(|e| BackendError::InvalidResponse(format!("Failed to parse next pet: {}", e)))?;

        match parsed {
            NextPetResponse::Exhausted { no_more: true } => Ok(NextCandidate::Exhausted),
            NextPetResponse::Exhausted { no_more: false } => Err(BackendError::InvalidResponse(
                "no_more is false but no candidate was sent".into(),
            )),
            NextPetResponse::Candidate(candidate) => {
                candidate.verify().map_err(|e| {
                    BackendError::InvalidResponse(format!("Invalid candidate: {}", e))
                })?;
                Ok(NextCandidate::Available(candidate))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_url_building() {
        let backend = HttpBackend::new("http://pets.test/", Duration::from_secs(1)).unwrap();

        assert_eq!(
            backend.decision_url(DecisionKind::Skip, &CandidateId::new("42")),
            "http://pets.test/skip/42"
        );
        assert_eq!(
            backend.decision_url(DecisionKind::Heart, &CandidateId::new("a b")),
            "http://pets.test/adopt/a%20b"
        );
        assert_eq!(backend.next_pet_url(), "http://pets.test/next-pet");
    }

    #[test]
    fn test_transport_classification() {
        assert!(BackendError::Unreachable("down".into()).is_transport());
        assert!(!BackendError::Rejected { status: 500 }.is_transport());
        assert!(!BackendError::InvalidResponse("bad".into()).is_transport());
    }

    #[tokio::test]
    async fn test_submit_decision_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/adopt/7")
            .match_header("x-requested-with", "XMLHttpRequest")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status": "success"}"#)
            .expect(1)
            .create_async()
            .await;

        let backend = HttpBackend::new(server.url(), Duration::from_secs(5)).unwrap();
        backend
            .submit_decision(DecisionKind::Heart, &CandidateId::new("7"))
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_submit_decision_rejected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/skip/7")
            .with_status(500)
            .create_async()
            .await;

        let backend = HttpBackend::new(server.url(), Duration::from_secs(5)).unwrap();
        let err = backend
            .submit_decision(DecisionKind::Skip, &CandidateId::new("7"))
            .await
            .unwrap_err();

        assert!(matches!(err, BackendError::Rejected { status: 500 }));
        assert!(!err.is_transport());
    }

    #[tokio::test]
    async fn test_submit_decision_transport_failure() {
        // Nothing listens on port 1
        let backend = HttpBackend::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
        let err = backend
            .submit_decision(DecisionKind::Skip, &CandidateId::new("7"))
            .await
            .unwrap_err();

        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_next_candidate_parses_candidate() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/next-pet")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id": 12, "name": "Biscuit", "breed": "Beagle", "gender": "Female",
                    "age": "Young", "size": "Small", "image_url": "http://img/12.jpg",
                    "description": "Loves naps"}"#,
            )
            .create_async()
            .await;

        let backend = HttpBackend::new(server.url(), Duration::from_secs(5)).unwrap();
        match backend.next_candidate().await.unwrap() {
            NextCandidate::Available(candidate) => {
                assert_eq!(candidate.id, CandidateId::new("12"));
                assert_eq!(candidate.name.as_deref(), Some("Biscuit"));
                assert_eq!(candidate.breed.as_deref(), Some("Beagle"));
            }
            other => panic!("expected a candidate, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_next_candidate_exhausted() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/next-pet")
            .with_status(200)
            .with_body(r#"{"no_more": true}"#)
            .create_async()
            .await;

        let backend = HttpBackend::new(server.url(), Duration::from_secs(5)).unwrap();
        assert_eq!(backend.next_candidate().await.unwrap(), NextCandidate::Exhausted);
    }

    #[tokio::test]
    async fn test_next_candidate_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/next-pet")
            .with_status(200)
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let backend = HttpBackend::new(server.url(), Duration::from_secs(5)).unwrap();
        let err = backend.next_candidate().await.unwrap_err();
        assert!(matches!(err, BackendError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_next_candidate_accepts_null_and_blank_names() {
        let mut server = mockito::Server::new_async().await;
        let backend = HttpBackend::new(server.url(), Duration::from_secs(5)).unwrap();

        for (body, expected) in [
            (r#"{"id": 3, "name": null, "gender": "Male", "age": null}"#, None),
            (r#"{"id": 4, "name": ""}"#, Some("")),
        ] {
            let mock = server
                .mock("GET", "/next-pet")
                .with_status(200)
                .with_body(body)
                .create_async()
                .await;

            match backend.next_candidate().await.unwrap() {
                NextCandidate::Available(candidate) => {
                    assert_eq!(candidate.name.as_deref(), expected)
                }
                other => panic!("expected a candidate, got {:?}", other),
            }
            mock.remove_async().await;
        }
    }

    #[tokio::test]
    async fn test_next_candidate_rejects_blank_id() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/next-pet")
            .with_status(200)
            .with_body(r#"{"id": " ", "name": "Rex"}"#)
            .create_async()
            .await;

        let backend = HttpBackend::new(server.url(), Duration::from_secs(5)).unwrap();
        let err = backend.next_candidate().await.unwrap_err();
        assert!(matches!(err, BackendError::InvalidResponse(_)));
    }
}
