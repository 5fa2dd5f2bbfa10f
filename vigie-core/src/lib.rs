pub mod analytics;
pub mod config;
pub mod interpret;
pub mod lifecycle;
pub mod normalize;
pub mod relay;
pub mod report;
pub mod stats;

pub use config::Config;
pub use lifecycle::{AnalysisController, LifecycleError, LifecycleState, SubmitOutcome, UserContext};
pub use normalize::{normalize, normalize_url};
pub use relay::{BookingSession, ConfirmationRelay, RelayOutcome, WidgetBus, WidgetMessage};

use colored::Colorize;

pub fn print_banner() {
    println!(
        "{}",
        r"
 __   __ _         _
 \ \ / /(_)  __ _ (_)  ___
  \ V / | | / _` || | / -_)
   \_/  |_| \__, ||_| \___|
            |___/"
            .bright_cyan()
            .bold()
    );
    println!(
        "  {} {}\n",
        "SEO & AI visibility checker".bright_white(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
}
