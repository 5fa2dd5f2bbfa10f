pub mod client;
pub mod error;
pub mod request;
pub mod result;

pub use client::{AnalysisResponse, ApiClient};
pub use error::{AnalysisError, ClientError};
pub use request::{AnalysisRequest, AnalysisType, ConfirmationPayload};
pub use result::{
    AnalysisResult, AxisDetail, AxisScore, CrawlStatistics, CrawlSummary, Orientation,
    PageDetail, Presence, ScoreScale, SiteKind, SiteType, Stats,
};
