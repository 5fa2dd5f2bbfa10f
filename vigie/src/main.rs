use colored::Colorize;
use vigie::command_argument_builder;
use vigie::handlers::{config_from_args, handle_analyze, handle_stats, init_tracing, track_command};
use vigie_core::print_banner;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    init_tracing(chosen_command.get_flag("verbose"));

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    if chosen_command.subcommand().is_none() {
        // No subcommand provided, just show the banner
        return;
    }

    let config = match config_from_args(&chosen_command) {
        Ok(config) => config,
        Err(e) => fail(e),
    };

    let result = match chosen_command.subcommand() {
        Some(("analyze", primary_command)) => {
            track_command(&config, "analyze");
            handle_analyze(&config, primary_command, quiet).await
        }
        Some(("stats", primary_command)) => {
            track_command(&config, "stats");
            handle_stats(&config, primary_command).await
        }
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = result {
        fail(e);
    }
}

fn fail(error: anyhow::Error) -> ! {
    eprintln!("{} {:#}", "✗".red().bold(), error);
    std::process::exit(1);
}
