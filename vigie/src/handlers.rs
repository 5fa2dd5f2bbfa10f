use anyhow::{Context, Result, anyhow, bail};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use url::Url;
use vigie_client::{AnalysisRequest, AnalysisResult, AnalysisType, ApiClient};
use vigie_core::analytics::{self, AnalyticsConfig, AnalyticsEvent, EventSink};
use vigie_core::report::{
    ReportData, ReportFormat, generate_json_report, generate_text_report, save_report,
};
use vigie_core::stats::{STATS_REFRESH_INTERVAL, display_total, fetch_stats, spawn_refresh};
use vigie_core::{
    AnalysisController, BookingSession, Config, ConfirmationRelay, RelayOutcome, SubmitOutcome,
    WidgetBus, WidgetMessage, normalize_url,
};

pub struct LoadingStep {
    pub icon: &'static str,
    pub text: &'static str,
}

pub const LOADING_STEPS: [LoadingStep; 8] = [
    LoadingStep { icon: "🔗", text: "Connecting to the site..." },
    LoadingStep { icon: "🏠", text: "Analyzing the home page..." },
    LoadingStep { icon: "🔍", text: "Discovering important pages..." },
    LoadingStep { icon: "📄", text: "Crawling detected pages..." },
    LoadingStep { icon: "📊", text: "Extracting SEO data..." },
    LoadingStep { icon: "🤖", text: "Extracting AI data..." },
    LoadingStep { icon: "📈", text: "Computing scores..." },
    LoadingStep { icon: "✅", text: "Finalizing the analysis..." },
];

pub const STEP_INTERVAL: Duration = Duration::from_millis(800);

/// The progress bar never reaches 100% before the backend answers.
const MAX_PROGRESS: u64 = 95;

/// Step shown after `elapsed`; holds on the last one.
pub fn step_index(elapsed: Duration) -> usize {
    let step = (elapsed.as_millis() / STEP_INTERVAL.as_millis()) as usize;
    step.min(LOADING_STEPS.len() - 1)
}

pub fn progress_percent(step: usize) -> u64 {
    let percent = ((step as u64 + 1) * 100) / LOADING_STEPS.len() as u64;
    percent.min(MAX_PROGRESS)
}

pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A second initialization (tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Builds the runtime configuration from the global arguments.
pub fn config_from_args(matches: &ArgMatches) -> Result<Config> {
    let api_url = matches
        .get_one::<Url>("api-url")
        .ok_or_else(|| anyhow!("Missing API URL"))?;
    let booking_url = matches
        .get_one::<String>("booking-url")
        .ok_or_else(|| anyhow!("Missing booking URL"))?;

    let analytics = AnalyticsConfig::new(
        matches.get_one::<String>("ga-measurement-id").cloned(),
        matches.get_one::<String>("plausible-domain").cloned(),
    );

    Ok(Config::new(api_url.as_str())
        .with_analytics(analytics)
        .with_booking_url(booking_url.as_str()))
}

pub fn request_from_args(args: &ArgMatches) -> Result<AnalysisRequest> {
    let url = args
        .get_one::<String>("url")
        .ok_or_else(|| anyhow!("--url is required"))?;
    let email = args
        .get_one::<String>("email")
        .ok_or_else(|| anyhow!("--email is required"))?;
    let analysis_type = args
        .get_one::<String>("type")
        .and_then(|t| AnalysisType::from_str(t))
        .unwrap_or_default();

    // Canonical form as soon as it is read; submission normalizes again
    let mut request = AnalysisRequest::new(normalize_url(url), email.as_str())
        .with_analysis_type(analysis_type)
        .with_accept_terms(args.get_flag("accept-terms"));

    if let Some(sector) = args.get_one::<String>("sector").filter(|s| !s.trim().is_empty()) {
        request = request.with_sector(sector.as_str());
    }
    if let Some(offer) = args.get_one::<String>("offer").filter(|s| !s.trim().is_empty()) {
        request = request.with_offer(offer.as_str());
    }

    Ok(request)
}

/// Expands `~` in a user-supplied output path.
pub fn resolve_output_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

pub fn render_report(data: &ReportData, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(data)),
        ReportFormat::Json => generate_json_report(data).context("Failed to encode JSON report"),
    }
}

/// Writes a report to disk, without terminal colors.
pub fn write_report(data: &ReportData, format: ReportFormat, path: &str) -> Result<PathBuf> {
    let output_path = resolve_output_path(path);

    colored::control::set_override(false);
    let content = render_report(data, format);
    colored::control::unset_override();

    save_report(&content?, &output_path)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;
    Ok(output_path)
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

fn loading_bar(url: &str) -> Result<ProgressBar> {
    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos:>2}% {msg}")?
            .progress_chars("█▓░"),
    );
    bar.enable_steady_tick(Duration::from_millis(100));
    bar.println(format!("{} Analysis in progress: {}", "→".blue(), url.bright_white()));
    bar.println(format!(
        "{} A full crawl can take up to 5 minutes...",
        "ℹ".blue()
    ));
    Ok(bar)
}

fn show_step(bar: &ProgressBar, step: usize) {
    let current = &LOADING_STEPS[step];
    bar.set_position(progress_percent(step));
    bar.set_message(format!("{} {}", current.icon, current.text));
}

pub async fn handle_analyze(config: &Config, args: &ArgMatches, quiet: bool) -> Result<()> {
    let request = request_from_args(args)?;
    if !quiet && !request.url.is_empty() {
        println!("{} Site: {}", "→".blue(), request.url.bright_white());
    }
    let format = args
        .get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text);

    let client = ApiClient::new(&config.api_base_url)?;
    let controller = AnalysisController::new(client);

    let submission = controller.submit(request);
    tokio::pin!(submission);

    let started = Instant::now();
    let mut ticker = tokio::time::interval(STEP_INTERVAL);
    let mut bar: Option<ProgressBar> = None;

    let outcome = loop {
        tokio::select! {
            outcome = &mut submission => break outcome,
            _ = ticker.tick() => {
                if bar.is_none() && !quiet
                    && let Some(url) = controller.analyzing_url()
                {
                    bar = Some(loading_bar(&url)?);
                }
                if let Some(ref bar) = bar {
                    show_step(bar, step_index(started.elapsed()));
                }
            }
        }
    };

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    let result = match outcome? {
        SubmitOutcome::Completed(result) => result,
        SubmitOutcome::Failed(error) => return Err(error.into()),
        SubmitOutcome::Discarded => bail!("Analysis was superseded"),
    };

    let analyzed_url = controller.snapshot().user_context.map(|c| c.request.url).unwrap_or_default();
    info!("Rendering report for {}", analyzed_url);
    present_result(config, &result, &analyzed_url, format, args.get_one::<String>("output"))?;

    if args.get_flag("book") {
        book_appointment(config, &controller).await?;
    }

    Ok(())
}

fn present_result(
    config: &Config,
    result: &AnalysisResult,
    analyzed_url: &str,
    format: ReportFormat,
    output: Option<&String>,
) -> Result<()> {
    let data = ReportData::from_result(result, analyzed_url).with_booking_url(&config.booking_url);

    match output {
        Some(path) => {
            let saved = write_report(&data, format, path)?;
            println!(
                "{} Report saved to {}",
                "✓".green().bold(),
                saved.display().to_string().bright_white()
            );
        }
        None => println!("{}", render_report(&data, format)?),
    }
    Ok(())
}

/// Opens a booking session; Enter stands in for the scheduling widget's confirmation.
async fn book_appointment(config: &Config, controller: &AnalysisController) -> Result<()> {
    print_divider();
    println!("{}", "  BOOK A FREE CALL".bright_white().bold());
    print_divider();
    println!(
        "{} Open {} and pick a slot.",
        "→".blue(),
        config.booking_url.bright_white().underline()
    );
    print!(
        "{} ",
        "Press Enter once your appointment is scheduled (Ctrl+D to skip):"
            .bright_cyan()
            .bold()
    );
    io::stdout().flush()?;

    let bus = WidgetBus::default();
    let relay = ConfirmationRelay::new(controller.client().clone());
    let session = BookingSession::open(&bus, relay, controller.user_context());

    let line = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        io::stdin().read_line(&mut line).map(|read| read > 0)
    })
    .await?;

    match line {
        Ok(true) => {
            bus.publish(WidgetMessage::event_scheduled());
        }
        Ok(false) => {
            println!();
            println!("{} Booking skipped", "→".blue());
            session.close().await;
            return Ok(());
        }
        Err(e) => {
            session.close().await;
            return Err(e).context("Failed to read from stdin");
        }
    }

    if session.wait_confirmed().await {
        println!("{} Appointment confirmed. See you soon!", "✓".green().bold());
    }

    match session.finished().await {
        Some(RelayOutcome::Sent) => debug!("Analysis forwarded with the appointment"),
        Some(outcome) => debug!("Appointment confirmation not forwarded: {:?}", outcome),
        None => debug!("Booking session ended without confirmation"),
    }
    Ok(())
}

fn print_stats(stats: &vigie_client::Stats) {
    print!("{} {} ", display_total(stats).bright_white().bold(), "sites analyzed".blue());
    if stats.today > 0 {
        print!("{} {} {}", "•".blue(), stats.today.to_string().bright_white(), "today".blue());
    }
    println!();
}

pub async fn handle_stats(config: &Config, args: &ArgMatches) -> Result<()> {
    let client = ApiClient::new(&config.api_base_url)?;

    if !args.get_flag("watch") {
        print_stats(&fetch_stats(&client).await);
        return Ok(());
    }

    println!(
        "{} Refreshing every {} minutes, Ctrl+C to stop",
        "ℹ".blue(),
        STATS_REFRESH_INTERVAL.as_secs() / 60
    );
    let refresh = spawn_refresh(client, STATS_REFRESH_INTERVAL, |stats| print_stats(&stats));

    tokio::signal::ctrl_c().await?;
    refresh.abort();
    Ok(())
}

/// Records the command as a page view of the equivalent web page.
pub fn track_command(config: &Config, command: &str) {
    let analytics = analytics::init(config.analytics.clone());
    if let Err(e) = analytics.track(&AnalyticsEvent::page_view(&format!("/{}", command))) {
        debug!("Failed to record page view: {}", e);
    }
}
