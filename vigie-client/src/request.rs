use serde::{Deserialize, Serialize};
use std::fmt;

/// Which scores the backend should compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    #[default]
    Both,
    Seo,
    Ia,
}

impl AnalysisType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "both" => Some(AnalysisType::Both),
            "seo" => Some(AnalysisType::Seo),
            "ia" | "ai" => Some(AnalysisType::Ia),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::Both => "both",
            AnalysisType::Seo => "seo",
            AnalysisType::Ia => "ia",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AnalysisType::Both => "Full analysis (SEO + AI)",
            AnalysisType::Seo => "SEO analysis only",
            AnalysisType::Ia => "AI analysis only",
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /api/analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub url: String,
    pub sector: Option<String>,
    pub offer: Option<String>,
    pub email: String,
    #[serde(rename = "analysis_type", default)]
    pub analysis_type: AnalysisType,
    #[serde(rename = "acceptTerms", default)]
    pub accept_terms: bool,
}

impl AnalysisRequest {
    pub fn new(url: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            sector: None,
            offer: None,
            email: email.into(),
            analysis_type: AnalysisType::Both,
            accept_terms: false,
        }
    }

    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    pub fn with_offer(mut self, offer: impl Into<String>) -> Self {
        self.offer = Some(offer.into());
        self
    }

    pub fn with_analysis_type(mut self, analysis_type: AnalysisType) -> Self {
        self.analysis_type = analysis_type;
        self
    }

    pub fn with_accept_terms(mut self, accept: bool) -> Self {
        self.accept_terms = accept;
        self
    }
}

/// Body of `POST /api/confirm-appointment`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmationPayload {
    pub email: String,
    pub url: String,
    pub sector: Option<String>,
    pub offer: Option<String>,
    pub analysis_type: AnalysisType,
    pub results: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_keys() {
        let request = AnalysisRequest::new("https://example.com", "a@b.com")
            .with_sector("SaaS B2B")
            .with_analysis_type(AnalysisType::Seo)
            .with_accept_terms(true);

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "url": "https://example.com",
                "sector": "SaaS B2B",
                "offer": null,
                "email": "a@b.com",
                "analysis_type": "seo",
                "acceptTerms": true
            })
        );
    }

    #[test]
    fn test_analysis_type_from_str() {
        assert_eq!(AnalysisType::from_str("BOTH"), Some(AnalysisType::Both));
        assert_eq!(AnalysisType::from_str("seo"), Some(AnalysisType::Seo));
        assert_eq!(AnalysisType::from_str("ia"), Some(AnalysisType::Ia));
        assert_eq!(AnalysisType::from_str("geo"), None);
    }

    #[test]
    fn test_confirmation_payload_uses_snake_case_type() {
        let payload = ConfirmationPayload {
            email: "a@b.com".to_string(),
            url: "https://example.com".to_string(),
            sector: None,
            offer: Some("Invoicing".to_string()),
            analysis_type: AnalysisType::Both,
            results: json!({"seo": {"score": 70}}),
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["analysis_type"], "both");
        assert_eq!(value["results"]["seo"]["score"], 70);
    }
}
