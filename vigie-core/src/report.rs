// Report generation from an analysis result

use crate::interpret::{
    ScoreCard, ScoreColor, axis_label, maturity_percent, orientation_text_for, site_kind_label,
};
use colored::{ColoredString, Colorize};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use vigie_client::{AnalysisResult, AxisScore, CrawlSummary, PageDetail};

/// Pages listed individually in the crawl section.
pub const MAX_LISTED_PAGES: usize = 20;

/// Placeholder the backend sends for pages whose URL could not be recovered.
pub const MISSING_PAGE_URL: &str = "URL non disponible";

/// SEO axis maximum assumed when the backend omits it.
pub const DEFAULT_AXIS_MAX: f64 = 20.0;

const RULE: &str =
    "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AxisLine {
    pub key: String,
    pub label: String,
    pub score: f64,
    pub max_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MaturityLine {
    pub key: String,
    pub label: String,
    pub maturity_percent: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeoSection {
    #[serde(flatten)]
    pub card: ScoreCard,
    pub interpretation_message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub axes: Vec<AxisLine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IaSection {
    #[serde(flatten)]
    pub card: ScoreCard,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maturity_on_100: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub label: &'static str,
    pub label_message: &'static str,
    pub axes: Vec<MaturityLine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrientationSection {
    pub orientation: String,
    pub text: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SiteTypeSection {
    #[serde(rename = "type")]
    pub kind: String,
    pub label: &'static str,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CrawlSection {
    pub pages_analyzed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<vigie_client::CrawlStatistics>,
    pub listed_pages: Vec<PageDetail>,
    pub other_pages: u64,
    pub https: bool,
    pub protocol: String,
    pub robots_txt: bool,
    pub sitemap: bool,
    pub pages_with_schema: u64,
}

/// Everything a report shows, already interpreted.
#[derive(Debug, Clone, Serialize)]
pub struct ReportData {
    pub analyzed_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_type: Option<SiteTypeSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo: Option<SeoSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ia: Option<IaSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<OrientationSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crawl: Option<CrawlSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_url: Option<String>,
}

impl ReportData {
    pub fn from_result(result: &AnalysisResult, analyzed_url: &str) -> Self {
        let seo = result.seo.as_ref().map(seo_section);
        let ia = result.ia.as_ref().map(ia_section);

        // Orientation needs both cards to be meaningful
        let orientation = match (&result.orientation, &seo, &ia) {
            (Some(orientation), Some(seo), Some(ia)) => Some(OrientationSection {
                orientation: orientation.as_str().to_string(),
                text: orientation_text_for(*orientation, seo.card.score_on_10, ia.card.score_on_10),
            }),
            _ => None,
        };

        Self {
            analyzed_url: analyzed_url.to_string(),
            site_type: result.site_type.as_ref().map(|site_type| SiteTypeSection {
                kind: site_type.kind.as_str().to_string(),
                label: site_kind_label(site_type.kind),
                confidence: site_type.confidence,
            }),
            seo,
            ia,
            orientation,
            crawl: result.crawl_data.as_ref().and_then(crawl_section),
            booking_url: None,
        }
    }

    pub fn with_booking_url(mut self, booking_url: impl Into<String>) -> Self {
        self.booking_url = Some(booking_url.into());
        self
    }
}

fn seo_section(axis: &AxisScore) -> SeoSection {
    let card = ScoreCard::seo(axis);
    SeoSection {
        interpretation_message: card.interpretation.message(),
        card,
        note: axis.note.clone(),
        axes: axis
            .details
            .iter()
            .map(|detail| AxisLine {
                key: detail.key.clone(),
                label: axis_label(&detail.key).to_string(),
                score: detail.score,
                max_score: detail
                    .max_score
                    .filter(|max| *max > 0.0)
                    .unwrap_or(DEFAULT_AXIS_MAX),
            })
            .collect(),
    }
}

fn ia_section(axis: &AxisScore) -> IaSection {
    let card = ScoreCard::ia(axis);
    let (label, label_message) = card
        .ia_label
        .map(|label| (label.label(), label.message()))
        .unwrap_or_default();

    IaSection {
        card,
        maturity_on_100: axis.maturity_on_100,
        note: axis.note.clone(),
        label,
        label_message,
        axes: axis
            .details
            .iter()
            .map(|detail| MaturityLine {
                key: detail.key.clone(),
                label: axis_label(&detail.key).to_string(),
                maturity_percent: maturity_percent(detail.score),
            })
            .collect(),
    }
}

fn crawl_section(crawl: &CrawlSummary) -> Option<CrawlSection> {
    if crawl.pages_analyzed == 0 {
        return None;
    }

    let listed_pages: Vec<PageDetail> = crawl
        .pages_details
        .iter()
        .flatten()
        .filter(|page| {
            page.url
                .as_deref()
                .is_some_and(|url| !url.is_empty() && url != MISSING_PAGE_URL)
        })
        .take(MAX_LISTED_PAGES)
        .cloned()
        .collect();

    Some(CrawlSection {
        pages_analyzed: crawl.pages_analyzed,
        statistics: crawl.statistics.clone(),
        listed_pages,
        other_pages: crawl.pages_analyzed.saturating_sub(MAX_LISTED_PAGES as u64),
        https: crawl.protocol.eq_ignore_ascii_case("https"),
        protocol: crawl.protocol.clone(),
        robots_txt: crawl.robots_txt.present,
        sitemap: crawl.sitemap.present,
        pages_with_schema: crawl
            .statistics
            .as_ref()
            .map(|s| s.pages_with_schema)
            .unwrap_or(0),
    })
}

pub fn generate_text_report(data: &ReportData) -> String {
    let mut report = String::new();

    // Header
    report.push_str(RULE);
    report.push_str("                     VIGIE SEO & AI VISIBILITY REPORT\n");
    report.push_str(RULE);
    report.push('\n');

    report.push_str(&format!("Analyzed URL: {}\n", data.analyzed_url));
    if let Some(ref site_type) = data.site_type {
        report.push_str(&format!(
            "Site type:    {} (confidence {}%, scoring adapted to this type)\n",
            site_type.label,
            format_number(site_type.confidence)
        ));
    }
    report.push('\n');

    if let Some(ref seo) = data.seo {
        section(&mut report, "SEO POTENTIAL");
        report.push_str(&format!("Score:        {}\n", paint_score(seo.card.score_on_10, seo.card.color)));
        if let Some(ref note) = seo.note {
            report.push_str(&format!("              {}\n", note.italic()));
        }
        report.push_str(&format!("{}\n\n", seo.interpretation_message));

        if !seo.axes.is_empty() {
            report.push_str("Breakdown by axis:\n");
            for axis in &seo.axes {
                report.push_str(&format!(
                    "  {:<28} {}/{} points\n",
                    format!("{}:", axis.label),
                    format_number(axis.score),
                    format_number(axis.max_score)
                ));
            }
            report.push('\n');
        }
    }

    if let Some(ref ia) = data.ia {
        section(&mut report, "AI POTENTIAL");
        report.push_str(&format!("Score:        {}\n", paint_score(ia.card.score_on_10, ia.card.color)));
        if let Some(maturity) = ia.maturity_on_100 {
            report.push_str(&format!("AI maturity:  {}%\n", format_number(maturity)));
        }
        if let Some(ref note) = ia.note {
            report.push_str(&format!("              {}\n", note.italic()));
        }
        report.push_str(&format!("{}\n", ia.label.bold()));
        report.push_str(&format!("{}\n\n", ia.label_message));

        if !ia.axes.is_empty() {
            report.push_str("Breakdown by axis (maturity):\n");
            for axis in &ia.axes {
                report.push_str(&format!(
                    "  {:<28} {}%\n",
                    format!("{}:", axis.label),
                    axis.maturity_percent
                ));
            }
            report.push('\n');
        }
    }

    if let Some(ref orientation) = data.orientation {
        section(&mut report, "STRATEGIC ORIENTATION");
        report.push_str(&format!("[{}]\n", orientation.orientation.bold()));
        report.push_str(&wrap_text(orientation.text, 80, ""));
        report.push('\n');
    }

    if let Some(ref crawl) = data.crawl {
        section(&mut report, "ANALYZED SITE DATA");
        report.push_str(&format!("Pages analyzed:               {}\n", crawl.pages_analyzed));
        if let Some(ref stats) = crawl.statistics {
            report.push_str(&format!("Total words:                  {}\n", stats.total_words));
            report.push_str(&format!(
                "Words per page (avg.):        {}\n",
                format_number(stats.average_words_per_page)
            ));
            report.push_str(&format!("Internal links:               {}\n", stats.total_internal_links));
            report.push_str(&format!("External links:               {}\n", stats.total_external_links));
            report.push_str(&format!(
                "Pages with meta description:  {}/{}\n",
                stats.pages_with_meta_desc, crawl.pages_analyzed
            ));
        }
        report.push('\n');

        if !crawl.listed_pages.is_empty() {
            report.push_str("Pages analyzed in detail:\n");
            for page in &crawl.listed_pages {
                report.push_str(&format!("  {}\n", page.url.as_deref().unwrap_or_default()));
                report.push_str(&format!(
                    "    📄 {}  ({} words, {} H1)\n",
                    page.title.as_deref().filter(|t| !t.is_empty()).unwrap_or("Untitled"),
                    page.word_count,
                    page.h1_count
                ));
            }
            if crawl.other_pages > 0 {
                report.push_str(&format!("  + {} other page(s) analyzed\n", crawl.other_pages));
            }
            report.push('\n');
        }

        report.push_str("Technical checks:\n");
        report.push_str(&format!(
            "  Protocol:         {}\n",
            check(crawl.https, &crawl.protocol, &crawl.protocol)
        ));
        report.push_str(&format!(
            "  robots.txt:       {}\n",
            check(crawl.robots_txt, "Present", "Missing")
        ));
        report.push_str(&format!(
            "  sitemap.xml:      {}\n",
            check(crawl.sitemap, "Present", "Missing")
        ));
        let schema = format!("{} page(s)", crawl.pages_with_schema);
        report.push_str(&format!(
            "  Structured data:  {}\n",
            check(crawl.pages_with_schema > 0, &schema, "None")
        ));
        report.push('\n');
    }

    // Call to action
    report.push_str(RULE);
    report.push_str(&format!("{}\n", "🚀 Ready to improve your visibility?".bold()));
    report.push_str(
        "Find out how to optimize your site for classic search engines and conversational engines.\n",
    );
    match data.booking_url {
        Some(ref url) => report.push_str(&format!("Book a free call: {}\n", url.underline())),
        None => report.push_str("Book a free call with `vigie analyze --book`.\n"),
    }
    report.push_str("No commitment • 30 minutes • Personalized diagnosis\n");
    report.push_str(RULE);

    report
}

pub fn generate_json_report(data: &ReportData) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "Vigie",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "analysis": data
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn section(report: &mut String, title: &str) {
    report.push_str(RULE);
    report.push_str(title);
    report.push('\n');
    report.push_str(RULE);
    report.push('\n');
}

fn paint_score(score: f64, color: ScoreColor) -> ColoredString {
    let text = format!("{:.1}/10", score);
    match color {
        ScoreColor::Good => text.green().bold(),
        ScoreColor::Warning => text.yellow().bold(),
        ScoreColor::Poor => text.red().bold(),
    }
}

fn check(ok: bool, good: &str, bad: &str) -> ColoredString {
    if ok {
        format!("✅ {}", good).green()
    } else {
        format!("❌ {}", bad).red()
    }
}

/// Whole numbers without decimals, others as sent.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

fn wrap_text(text: &str, width: usize, indent: &str) -> String {
    let mut result = String::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if current_line.len() + word.len() + 1 > width - indent.len() && !current_line.is_empty() {
            result.push_str(indent);
            result.push_str(&current_line);
            result.push('\n');
            current_line.clear();
        }

        if !current_line.is_empty() {
            current_line.push(' ');
        }
        current_line.push_str(word);
    }

    if !current_line.is_empty() {
        result.push_str(indent);
        result.push_str(&current_line);
        result.push('\n');
    }

    result
}
