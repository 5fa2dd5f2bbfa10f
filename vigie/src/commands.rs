use crate::CLAP_STYLING;
use clap::{arg, command};
use vigie_core::config::{DEFAULT_API_URL, DEFAULT_BOOKING_URL};

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("vigie")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("vigie")
        .about("Checks how visible a website is to search engines and conversational AI")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(arg!(-v --"verbose" "Enable debug logging").required(false))
        .arg(
            arg!(--"api-url" <URL>)
                .required(false)
                .global(true)
                .help("Base URL of the analysis backend")
                .env("VIGIE_API_URL")
                .value_parser(clap::value_parser!(url::Url))
                .default_value(DEFAULT_API_URL),
        )
        .arg(
            arg!(--"ga-measurement-id" <ID>)
                .required(false)
                .global(true)
                .help("Google Analytics measurement id")
                .env("VIGIE_GA_MEASUREMENT_ID"),
        )
        .arg(
            arg!(--"plausible-domain" <DOMAIN>)
                .required(false)
                .global(true)
                .help("Plausible Analytics domain")
                .env("VIGIE_PLAUSIBLE_DOMAIN"),
        )
        .arg(
            arg!(--"booking-url" <URL>)
                .required(false)
                .global(true)
                .help("Scheduling page offered after an analysis")
                .env("VIGIE_BOOKING_URL")
                .default_value(DEFAULT_BOOKING_URL),
        )
        .subcommand_required(false)
        .subcommand(
            command!("analyze")
                .about("Analyze the SEO and AI visibility of a website")
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The site to analyze. Only its scheme and host are kept."),
                )
                .arg(
                    arg!(-e --"email" <EMAIL>)
                        .required(true)
                        .help("Where the analysis follow-up is sent"),
                )
                .arg(
                    arg!(-s --"sector" <SECTOR>)
                        .required(false)
                        .help("Business sector, improves the relevance of the analysis"),
                )
                .arg(
                    arg!(-O --"offer" <OFFER>)
                        .required(false)
                        .help("Main offer, improves the relevance of the analysis"),
                )
                .arg(
                    arg!(-t --"type" <TYPE>)
                        .required(false)
                        .help("Analysis type: both (SEO + AI), seo, ia")
                        .value_parser(["both", "seo", "ia"])
                        .default_value("both"),
                )
                .arg(
                    arg!(--"accept-terms")
                        .required(false)
                        .help("Accept the terms of use and the processing of your data")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                )
                .arg(
                    arg!(--"book")
                        .required(false)
                        .help("Book a free call once the analysis is done")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("stats")
                .about("Show how many sites have been analyzed")
                .arg(
                    arg!(-w --"watch")
                        .required(false)
                        .help("Keep refreshing the counter every 5 minutes")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
}
