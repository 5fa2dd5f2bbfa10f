use crate::error::{AnalysisError, ClientError, GENERIC_FAILURE_MESSAGE, Result};
use crate::request::{AnalysisRequest, ConfirmationPayload};
use crate::result::{AnalysisResult, Stats, StatsEnvelope};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

pub const ANALYZE_PATH: &str = "/api/analyze";
pub const CONFIRM_APPOINTMENT_PATH: &str = "/api/confirm-appointment";
pub const STATS_PATH: &str = "/api/stats";

/// A successful analysis, typed and verbatim.
#[derive(Debug, Clone)]
pub struct AnalysisResponse {
    pub result: AnalysisResult,
    /// The body exactly as the backend sent it, relayed untouched on booking.
    pub raw: serde_json::Value,
}

/// HTTP client for the analysis backend.
///
/// No request timeout is configured: the analysis call is bounded only by the transport.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", trimmed, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(trimmed.to_string()));
        }

        let client = Client::builder()
            .user_agent(concat!("Vigie/", env!("CARGO_PKG_VERSION")))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            base_url: trimmed.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Submits an analysis and classifies every failure into a displayable error.
    pub async fn analyze(
        &self,
        request: &AnalysisRequest,
    ) -> std::result::Result<AnalysisResponse, AnalysisError> {
        let endpoint = self.endpoint(ANALYZE_PATH);
        info!("Submitting analysis of {} to {}", request.url, endpoint);

        let start = Instant::now();
        let response = self
            .client
            .post(&endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| classify_transport(&e.to_string()))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let body = response
            .text()
            .await
            .map_err(|e| classify_transport(&e.to_string()))?;
        debug!(
            "Analysis answered {} ({:?}) in {:?}",
            status.as_u16(),
            content_type,
            start.elapsed()
        );

        if !status.is_success() {
            let error = classify_failure(status.as_u16(), content_type.as_deref(), &body);
            warn!("Analysis of {} failed: {}", request.url, error);
            return Err(error);
        }

        if !is_json(content_type.as_deref()) {
            let error = classify_unexpected_content(&body);
            warn!("Analysis of {} returned non-JSON content: {}", request.url, error);
            return Err(error);
        }

        parse_analysis_body(&body)
    }

    pub async fn confirm_appointment(&self, payload: &ConfirmationPayload) -> Result<()> {
        let endpoint = self.endpoint(CONFIRM_APPOINTMENT_PATH);
        debug!("Relaying appointment confirmation for {} to {}", payload.email, endpoint);

        let response = self.client.post(&endpoint).json(payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }
        Ok(())
    }

    pub async fn stats(&self) -> Result<Stats> {
        let endpoint = self.endpoint(STATS_PATH);
        let response = self.client.get(&endpoint).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let envelope: StatsEnvelope = serde_json::from_str(&body)?;
        Ok(envelope.counter.unwrap_or_default())
    }
}

pub fn is_json(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.to_ascii_lowercase().contains("application/json"))
        .unwrap_or(false)
}

/// True for proxy error pages and any HTML document.
pub fn looks_like_gateway_page(text: &str) -> bool {
    let lowered = text.to_ascii_lowercase();
    text.contains("Proxy")
        || text.contains("proxy")
        || lowered.contains("<html")
        || lowered.contains("<!doctype html")
}

/// Classifies a non-2xx answer from `/api/analyze`.
pub fn classify_failure(status: u16, content_type: Option<&str>, body: &str) -> AnalysisError {
    if is_json(content_type)
        && let Ok(payload) = serde_json::from_str::<serde_json::Value>(body)
    {
        let message = ["error", "message"]
            .iter()
            .filter_map(|field| payload.get(*field))
            .filter_map(|value| value.as_str())
            .find(|text| !text.is_empty())
            .unwrap_or(GENERIC_FAILURE_MESSAGE);
        return AnalysisError::Application(message.to_string());
    }

    if looks_like_gateway_page(body) {
        return AnalysisError::Connectivity;
    }

    if body.trim().is_empty() {
        AnalysisError::Application(format!("HTTP {}", status))
    } else {
        AnalysisError::Application(body.to_string())
    }
}

/// Classifies a 2xx answer whose content type is not JSON.
pub fn classify_unexpected_content(body: &str) -> AnalysisError {
    if looks_like_gateway_page(body) {
        AnalysisError::Connectivity
    } else {
        AnalysisError::ResponseFormat
    }
}

/// Classifies a request that never produced a response.
pub fn classify_transport(message: &str) -> AnalysisError {
    if message.to_ascii_lowercase().contains("proxy") {
        AnalysisError::Connectivity
    } else {
        AnalysisError::Transport(message.to_string())
    }
}

fn parse_analysis_body(body: &str) -> std::result::Result<AnalysisResponse, AnalysisError> {
    let result = serde_json::from_str::<AnalysisResult>(body).map_err(|e| {
        warn!("Analysis body did not match the expected shape: {}", e);
        AnalysisError::ResponseFormat
    })?;
    let raw = serde_json::from_str::<serde_json::Value>(body)
        .map_err(|_| AnalysisError::ResponseFormat)?;
    if !raw.is_object() {
        return Err(AnalysisError::ResponseFormat);
    }

    Ok(AnalysisResponse { result, raw })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::AnalysisType;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_partial_json, method, path},
    };

    fn request() -> AnalysisRequest {
        AnalysisRequest::new("https://example.com", "a@b.com")
            .with_analysis_type(AnalysisType::Both)
            .with_accept_terms(true)
    }

    #[test]
    fn test_new_rejects_invalid_base_url() {
        assert!(matches!(
            ApiClient::new("not a url"),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = ApiClient::new("https://backend.example.com/vigie/").unwrap();
        assert_eq!(
            client.endpoint(ANALYZE_PATH),
            "https://backend.example.com/vigie/api/analyze"
        );
    }

    #[test]
    fn test_classify_json_error_field() {
        let error = classify_failure(
            400,
            Some("application/json; charset=utf-8"),
            r#"{"error": "URL unreachable"}"#,
        );
        assert_eq!(error, AnalysisError::Application("URL unreachable".to_string()));
    }

    #[test]
    fn test_classify_json_message_field() {
        let error = classify_failure(422, Some("application/json"), r#"{"message": "Bad email"}"#);
        assert_eq!(error, AnalysisError::Application("Bad email".to_string()));
    }

    #[test]
    fn test_classify_json_without_known_fields() {
        let error = classify_failure(500, Some("application/json"), r#"{"detail": "x"}"#);
        assert_eq!(
            error,
            AnalysisError::Application(GENERIC_FAILURE_MESSAGE.to_string())
        );
    }

    #[test]
    fn test_classify_broken_json_falls_back_to_text() {
        let error = classify_failure(502, Some("application/json"), "<html>Bad Gateway</html>");
        assert_eq!(error, AnalysisError::Connectivity);
    }

    #[test]
    fn test_classify_proxy_text() {
        let error = classify_failure(504, Some("text/plain"), "Error occurred while trying to proxy");
        assert_eq!(error, AnalysisError::Connectivity);
    }

    #[test]
    fn test_classify_plain_text_verbatim() {
        let error = classify_failure(503, Some("text/plain"), "Maintenance in progress");
        assert_eq!(
            error,
            AnalysisError::Application("Maintenance in progress".to_string())
        );
    }

    #[test]
    fn test_classify_empty_body_uses_status() {
        let error = classify_failure(500, None, "");
        assert_eq!(error.to_string(), "HTTP 500");
    }

    #[test]
    fn test_classify_transport_proxy() {
        assert_eq!(
            classify_transport("error sending request: Proxy connection refused"),
            AnalysisError::Connectivity
        );
        assert_eq!(
            classify_transport("connection refused"),
            AnalysisError::Transport("connection refused".to_string())
        );
    }

    #[tokio::test]
    async fn test_analyze_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(ANALYZE_PATH))
            .and(body_partial_json(json!({
                "url": "https://example.com",
                "analysis_type": "both",
                "acceptTerms": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "seo": {"score": 72, "maxScore": 100, "scoreOn10": 7.2},
                "ia": {"score": 50, "maxScore": 100, "maturityOn100": 69},
                "orientation": "SEO"
            })))
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri()).unwrap();
        let response = client.analyze(&request()).await.unwrap();

        assert_eq!(response.result.seo.as_ref().unwrap().on_ten(), 7.2);
        assert_eq!(response.result.ia.as_ref().unwrap().on_ten(), 5.0);
        assert_eq!(response.raw["ia"]["maturityOn100"], 69);
    }

    #[tokio::test]
    async fn test_analyze_html_error_is_connectivity() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(ANALYZE_PATH))
            .respond_with(
                ResponseTemplate::new(500)
                    .insert_header("content-type", "text/html")
                    .set_body_string("<html>Proxy Error</html>"),
            )
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri()).unwrap();
        let error = client.analyze(&request()).await.unwrap_err();

        assert_eq!(error, AnalysisError::Connectivity);
        assert!(!error.to_string().contains("<html>"));
    }

    #[tokio::test]
    async fn test_analyze_success_with_wrong_content_type() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(ANALYZE_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/plain")
                    .set_body_string("ok"),
            )
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri()).unwrap();
        let error = client.analyze(&request()).await.unwrap_err();
        assert_eq!(error, AnalysisError::ResponseFormat);
    }

    #[tokio::test]
    async fn test_analyze_success_with_gateway_page_is_connectivity() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(ANALYZE_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html; charset=utf-8")
                    .set_body_string("<!DOCTYPE html><html><body>Welcome</body></html>"),
            )
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri()).unwrap();
        let error = client.analyze(&request()).await.unwrap_err();
        assert_eq!(error, AnalysisError::Connectivity);
    }

    #[tokio::test]
    async fn test_analyze_success_with_unparseable_json() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(ANALYZE_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/json")
                    .set_body_string("{\"seo\": "),
            )
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri()).unwrap();
        let error = client.analyze(&request()).await.unwrap_err();
        assert_eq!(error, AnalysisError::ResponseFormat);
    }

    #[tokio::test]
    async fn test_analyze_accepts_loosely_typed_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(ANALYZE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "seo": {"score": 70},
                "siteType": {"type": "blog", "confidence": null},
                "crawlData": {
                    "pagesAnalyzed": 3.0,
                    "protocol": null,
                    "sitemap": null,
                    "statistics": {"totalWords": 1200.0}
                }
            })))
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri()).unwrap();
        let response = client.analyze(&request()).await.unwrap();

        let crawl = response.result.crawl_data.unwrap();
        assert_eq!(crawl.pages_analyzed, 3);
        assert_eq!(crawl.protocol, "");
        assert!(!crawl.sitemap.present);
        assert_eq!(crawl.statistics.unwrap().total_words, 1200);
        assert_eq!(response.result.site_type.unwrap().confidence, 0.0);
    }

    #[tokio::test]
    async fn test_stats_partial_formatted_counter() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(STATS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "counter": {"total": 1500, "today": 2, "formatted": {"total": "1.5k"}}
            })))
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri()).unwrap();
        let stats = client.stats().await.unwrap();
        assert_eq!(stats.total, 1500);
        assert_eq!(stats.today, 2);
        assert_eq!(stats.formatted.total, "1.5k");
        assert_eq!(stats.formatted.today, "0");
    }

    #[tokio::test]
    async fn test_stats_missing_counter_defaults() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(STATS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri()).unwrap();
        let stats = client.stats().await.unwrap();
        assert_eq!(stats, Stats::default());
    }

    #[tokio::test]
    async fn test_confirm_appointment_status_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(CONFIRM_APPOINTMENT_PATH))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri()).unwrap();
        let payload = ConfirmationPayload {
            email: "a@b.com".to_string(),
            url: "https://example.com".to_string(),
            sector: None,
            offer: None,
            analysis_type: AnalysisType::Seo,
            results: json!({}),
        };
        let error = client.confirm_appointment(&payload).await.unwrap_err();
        assert!(matches!(error, ClientError::Status(503)));
    }
}
