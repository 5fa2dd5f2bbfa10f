// Business interpretation of SEO and IA scores
//
// Every function works on the 0-10 scale. Bands are inclusive on their lower bound, so a
// score sitting exactly on a threshold lands in the higher band.

use serde::Serialize;
use std::fmt;
use vigie_client::{AxisScore, Orientation, SiteKind};

/// Traffic-light band of a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreColor {
    Good,
    Warning,
    Poor,
}

impl ScoreColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreColor::Good => "good",
            ScoreColor::Warning => "warning",
            ScoreColor::Poor => "poor",
        }
    }

    /// Hex color used by the web front-end for this band.
    pub fn hex(&self) -> &'static str {
        match self {
            ScoreColor::Good => "#4CAF50",
            ScoreColor::Warning => "#C9AD01",
            ScoreColor::Poor => "#FF6B6B",
        }
    }
}

impl fmt::Display for ScoreColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn color_for(score: f64) -> ScoreColor {
    if score >= 7.0 {
        ScoreColor::Good
    } else if score >= 5.0 {
        ScoreColor::Warning
    } else {
        ScoreColor::Poor
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpretation {
    Excellent,
    Good,
    Average,
    Weak,
}

impl Interpretation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interpretation::Excellent => "excellent",
            Interpretation::Good => "good",
            Interpretation::Average => "average",
            Interpretation::Weak => "weak",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Interpretation::Excellent => "Excellent: your site is very well prepared.",
            Interpretation::Good => {
                "Good: your site is well prepared, with a few areas to improve."
            }
            Interpretation::Average => "Average: your site needs significant improvements.",
            Interpretation::Weak => "Weak: your site needs a major overhaul.",
        }
    }
}

impl fmt::Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn interpretation_for(score: f64) -> Interpretation {
    if score >= 8.0 {
        Interpretation::Excellent
    } else if score >= 6.0 {
        Interpretation::Good
    } else if score >= 4.0 {
        Interpretation::Average
    } else {
        Interpretation::Weak
    }
}

/// Business reading of the IA score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IaLabel {
    CoreValue,
    StrategicLever,
    WorthConsidering,
    Premature,
    NotRelevant,
}

impl IaLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            IaLabel::CoreValue => "core value",
            IaLabel::StrategicLever => "strategic lever",
            IaLabel::WorthConsidering => "worth considering",
            IaLabel::Premature => "premature",
            IaLabel::NotRelevant => "not relevant",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IaLabel::CoreValue => "🧠 AI as a core value",
            IaLabel::StrategicLever => "🚀 AI as a strategic lever",
            IaLabel::WorthConsidering => "✅ AI worth considering",
            IaLabel::Premature => "⚠️ AI is premature",
            IaLabel::NotRelevant => "❌ AI not relevant",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            IaLabel::CoreValue => "AI is at the heart of your visibility strategy",
            IaLabel::StrategicLever => "AI is a lever worth exploiting",
            IaLabel::WorthConsidering => "AI can become an interesting lever",
            IaLabel::Premature => "AI is not a priority yet",
            IaLabel::NotRelevant => "AI is not a profitable lever for your site",
        }
    }
}

impl fmt::Display for IaLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn ia_label_for(ia_score: f64) -> IaLabel {
    let on_hundred = ia_score * 10.0;

    if on_hundred >= 80.0 {
        IaLabel::CoreValue
    } else if on_hundred >= 65.0 {
        IaLabel::StrategicLever
    } else if on_hundred >= 45.0 {
        IaLabel::WorthConsidering
    } else if on_hundred >= 25.0 {
        IaLabel::Premature
    } else {
        IaLabel::NotRelevant
    }
}

/// Which narrative applies to an orientation and pair of scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrientationReading {
    IaOnlyViable,
    StronglyIaFavored,
    IaFavored,
    SeoOnlyViable,
    StronglySeoFavored,
    SeoFavored,
    ExcellentBalance,
    GoodBalance,
    ImprovableBalance,
}

impl OrientationReading {
    pub fn text(&self) -> &'static str {
        match self {
            OrientationReading::IaOnlyViable => {
                "Your site is clearly better prepared for AI visibility. Its SEO potential is \
                 low: prioritize improving its structure for conversational engines (ChatGPT, \
                 Perplexity)."
            }
            OrientationReading::StronglyIaFavored => {
                "Your site is significantly better prepared for AI visibility. Conversational \
                 engines will be able to understand and cite your content more easily."
            }
            OrientationReading::IaFavored => {
                "Your site is better prepared for AI visibility. Conversational engines will be \
                 able to understand and cite your content more easily."
            }
            OrientationReading::SeoOnlyViable => {
                "Your site is clearly better prepared for traditional SEO visibility. Its AI \
                 potential is low: prioritize clarity and citability for classic search engines."
            }
            OrientationReading::StronglySeoFavored => {
                "Your site is significantly better prepared for traditional SEO visibility. \
                 Classic search engines (Google, Bing) will be able to crawl and rank your pages \
                 more easily."
            }
            OrientationReading::SeoFavored => {
                "Your site is better prepared for traditional SEO visibility. Classic search \
                 engines will be able to crawl and rank your pages more easily."
            }
            OrientationReading::ExcellentBalance => {
                "Excellent! Your site strikes an optimal balance between SEO and AI readiness. \
                 Both visibility channels are well optimized."
            }
            OrientationReading::GoodBalance => {
                "Your site strikes a good balance between SEO and AI readiness. A hybrid approach \
                 is recommended to maximize your visibility on every channel."
            }
            OrientationReading::ImprovableBalance => {
                "Your site balances SEO and AI readiness, but both potentials can be improved. A \
                 hybrid approach is recommended to maximize your visibility."
            }
        }
    }
}

/// Picks the narrative for `orientation`, or `None` for an orientation with no narrative.
pub fn orientation_reading_for(
    orientation: Orientation,
    seo_score: f64,
    ia_score: f64,
) -> Option<OrientationReading> {
    let diff = (ia_score - seo_score).abs();

    match orientation {
        Orientation::Ia => Some(if seo_score < 4.0 {
            OrientationReading::IaOnlyViable
        } else if diff >= 2.0 {
            OrientationReading::StronglyIaFavored
        } else {
            OrientationReading::IaFavored
        }),
        Orientation::Seo => Some(if ia_score < 4.0 {
            OrientationReading::SeoOnlyViable
        } else if diff >= 2.0 {
            OrientationReading::StronglySeoFavored
        } else {
            OrientationReading::SeoFavored
        }),
        Orientation::Hybride => Some(if seo_score >= 7.0 && ia_score >= 7.0 {
            OrientationReading::ExcellentBalance
        } else if seo_score >= 5.0 && ia_score >= 5.0 {
            OrientationReading::GoodBalance
        } else {
            OrientationReading::ImprovableBalance
        }),
        Orientation::Other => None,
    }
}

pub fn orientation_text_for(orientation: Orientation, seo_score: f64, ia_score: f64) -> &'static str {
    orientation_reading_for(orientation, seo_score, ia_score)
        .map(|reading| reading.text())
        .unwrap_or("")
}

/// Display name of an SEO or IA axis key; unknown keys are shown as-is.
pub fn axis_label(key: &str) -> &str {
    match key {
        "crawl" => "Crawl & Access",
        "contenu" => "On-Page Optimization",
        "technique" => "On-Page Technical",
        "architecture" => "Architecture & Linking",
        "autorite" => "Authority",
        "exploitabilite" => "Machine Exploitability",
        "credibilite" => "Credibility / Entity",
        "stabilite" => "Stability & Freshness",
        other => other,
    }
}

pub fn axis_definition(key: &str) -> Option<&'static str> {
    let definition = match key {
        "crawl" => {
            "Site accessibility: HTTPS, robots.txt, LLMs.txt, sitemap.xml, response time \
             (TTFB), error rate, URL hygiene and page indexing."
        }
        "contenu" => {
            "Content optimization: exploitable pages (300+ words), titles of 25-65 characters, \
             meta descriptions of 70-160 characters, H1 quality and H2/H3 structure."
        }
        "technique" => {
            "On-page technical elements: meta viewport, image alt text, canonical tags, \
             Schema.org, indexability and HTTP status code distribution."
        }
        "architecture" => {
            "Site structure: navigation depth, inbound and outbound internal links and \
             descriptive anchor text."
        }
        "autorite" => {
            "Site authority: referring domains, share of follow links, domain age and brand \
             mentions."
        }
        "exploitabilite" => {
            "Can an AI technically read, split and extract the content? Heading structure, \
             extractable formats (lists, tables), accessible content, stable HTML."
        }
        "credibilite" => {
            "Does an AI have a reason to trust this site? NAP, Schema.org entity, About page, \
             credible external references, customer reviews. Below 20%, AI visibility is \
             structurally fragile."
        }
        "stabilite" => {
            "Is the content reliable over time? Dates and authors present, site kept up to \
             date, minimal publishing regularity."
        }
        _ => return None,
    };
    Some(definition)
}

/// Maturity of one IA axis as a whole percentage; the axis score is clamped to [0, 1].
pub fn maturity_percent(axis_score: f64) -> u8 {
    (axis_score.clamp(0.0, 1.0) * 100.0).round() as u8
}

pub fn site_kind_label(kind: SiteKind) -> &'static str {
    match kind {
        SiteKind::Blog => "📝 Blog / Media",
        SiteKind::Ecommerce => "🛒 E-commerce",
        SiteKind::Saas => "💼 SaaS / B2B Product",
        SiteKind::Vitrine => "🎨 Showcase / One-page",
        SiteKind::Local => "📍 Local Business",
        SiteKind::Unknown => "❓ Unknown type",
    }
}

/// Interpretation of one score card, as rendered in reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreCard {
    pub score_on_10: f64,
    pub color: ScoreColor,
    pub interpretation: Interpretation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ia_label: Option<IaLabel>,
}

impl ScoreCard {
    pub fn seo(axis: &AxisScore) -> Self {
        let score = axis.on_ten();
        Self {
            score_on_10: score,
            color: color_for(score),
            interpretation: interpretation_for(score),
            ia_label: None,
        }
    }

    pub fn ia(axis: &AxisScore) -> Self {
        let score = axis.on_ten();
        Self {
            score_on_10: score,
            color: color_for(score),
            interpretation: interpretation_for(score),
            ia_label: Some(ia_label_for(score)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maturity_percent_clamps() {
        assert_eq!(maturity_percent(0.456), 46);
        assert_eq!(maturity_percent(1.7), 100);
        assert_eq!(maturity_percent(-0.2), 0);
    }

    #[test]
    fn test_axis_label_fallback() {
        assert_eq!(axis_label("crawl"), "Crawl & Access");
        assert_eq!(axis_label("vitesse"), "vitesse");
        assert!(axis_definition("vitesse").is_none());
    }

    #[test]
    fn test_other_orientation_has_no_reading() {
        assert_eq!(orientation_reading_for(Orientation::Other, 9.0, 9.0), None);
    }
}
