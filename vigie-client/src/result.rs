use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Score of one family (SEO or IA) as returned by `/api/analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawAxisScore", rename_all = "camelCase")]
pub struct AxisScore {
    /// Raw score as sent by the backend, out of 100.
    pub score: f64,
    pub max_score: Option<f64>,
    pub scale: ScoreScale,
    pub maturity_on_100: Option<f64>,
    pub note: Option<String>,
    /// Per-axis breakdown, in document order.
    pub details: Vec<AxisDetail>,
}

impl AxisScore {
    /// The score on the 0-10 scale used by every interpretation rule.
    pub fn on_ten(&self) -> f64 {
        self.scale.on_ten()
    }
}

/// The two ways the backend expresses a headline score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "scale", content = "value", rename_all = "snake_case")]
pub enum ScoreScale {
    OnTen(f64),
    OnHundred(f64),
}

impl ScoreScale {
    pub fn on_ten(&self) -> f64 {
        match *self {
            ScoreScale::OnTen(value) => value,
            ScoreScale::OnHundred(value) => value / 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisDetail {
    pub key: String,
    pub score: f64,
    pub max_score: Option<f64>,
}

#[derive(Deserialize)]
struct RawAxisScore {
    #[serde(default)]
    score: Option<f64>,
    #[serde(rename = "maxScore", default)]
    max_score: Option<f64>,
    #[serde(rename = "scoreOn10", default)]
    score_on_10: Option<f64>,
    #[serde(rename = "maturityOn100", default)]
    maturity_on_100: Option<f64>,
    #[serde(default)]
    note: Option<String>,
    #[serde(default, deserialize_with = "ordered_details")]
    details: Vec<AxisDetail>,
}

impl From<RawAxisScore> for AxisScore {
    fn from(raw: RawAxisScore) -> Self {
        let score = raw.score.unwrap_or(0.0);
        let scale = match raw.score_on_10 {
            Some(on_ten) => ScoreScale::OnTen(on_ten),
            None => ScoreScale::OnHundred(score),
        };

        Self {
            score,
            max_score: raw.max_score,
            scale,
            maturity_on_100: raw.maturity_on_100,
            note: raw.note.filter(|n| !n.trim().is_empty()),
            details: raw.details,
        }
    }
}

#[derive(Deserialize)]
struct RawDetail {
    #[serde(default)]
    score: Option<f64>,
    #[serde(rename = "maxScore", default)]
    max_score: Option<f64>,
}

/// Deserializes the `details` object into a Vec, keeping the key order of the document.
fn ordered_details<'de, D>(deserializer: D) -> Result<Vec<AxisDetail>, D::Error>
where
    D: Deserializer<'de>,
{
    struct DetailsVisitor;

    impl<'de> Visitor<'de> for DetailsVisitor {
        type Value = Vec<AxisDetail>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a map of axis keys to scores")
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut details = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, value)) = map.next_entry::<String, RawDetail>()? {
                details.push(AxisDetail {
                    key,
                    score: value.score.unwrap_or(0.0),
                    max_score: value.max_score,
                });
            }
            Ok(details)
        }
    }

    deserializer.deserialize_any(DetailsVisitor)
}

/// Strategic orientation computed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    #[serde(rename = "SEO")]
    Seo,
    #[serde(rename = "IA")]
    Ia,
    #[serde(rename = "HYBRIDE")]
    Hybride,
    #[serde(other)]
    Other,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Seo => "SEO",
            Orientation::Ia => "IA",
            Orientation::Hybride => "HYBRIDE",
            Orientation::Other => "OTHER",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteKind {
    Blog,
    Ecommerce,
    Saas,
    Vitrine,
    Local,
    #[default]
    #[serde(other)]
    Unknown,
}

impl SiteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SiteKind::Blog => "blog",
            SiteKind::Ecommerce => "ecommerce",
            SiteKind::Saas => "saas",
            SiteKind::Vitrine => "vitrine",
            SiteKind::Local => "local",
            SiteKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteType {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: SiteKind,
    #[serde(default, deserialize_with = "null_as_default")]
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlStatistics {
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_words: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub average_words_per_page: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_internal_links: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_external_links: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub pages_with_meta_desc: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub pages_with_schema: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDetail {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub word_count: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub h1_count: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presence {
    #[serde(default, deserialize_with = "null_as_default")]
    pub present: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlSummary {
    #[serde(default, deserialize_with = "lenient_count")]
    pub pages_analyzed: u64,
    #[serde(default)]
    pub statistics: Option<CrawlStatistics>,
    #[serde(default)]
    pub pages_details: Option<Vec<PageDetail>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub protocol: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub robots_txt: Presence,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sitemap: Presence,
}

/// Successful body of `POST /api/analyze`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(default)]
    pub seo: Option<AxisScore>,
    #[serde(default)]
    pub ia: Option<AxisScore>,
    #[serde(default)]
    pub orientation: Option<Orientation>,
    #[serde(default)]
    pub site_type: Option<SiteType>,
    #[serde(default)]
    pub crawl_data: Option<CrawlSummary>,
}

/// Counter returned by `GET /api/stats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default, deserialize_with = "lenient_count")]
    pub total: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub today: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub formatted: FormattedStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedStats {
    #[serde(default = "zero_label", deserialize_with = "label_or_zero")]
    pub total: String,
    #[serde(default = "zero_label", deserialize_with = "label_or_zero")]
    pub today: String,
}

impl Default for FormattedStats {
    fn default() -> Self {
        Self {
            total: zero_label(),
            today: zero_label(),
        }
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            total: 0,
            today: 0,
            formatted: FormattedStats::default(),
        }
    }
}

fn zero_label() -> String {
    "0".to_string()
}

// The backend fills missing values loosely: explicit nulls, and floats where a count
// is expected. Both read as the field's zero value.

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts any JSON number (or null) for a count; fractions round, negatives clamp to 0.
fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value
        .filter(|n| n.is_finite() && *n > 0.0)
        .map(|n| n.round() as u64)
        .unwrap_or(0))
}

fn label_or_zero<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(zero_label))
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatsEnvelope {
    #[serde(default)]
    pub counter: Option<Stats>,
}
