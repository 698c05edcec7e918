use clap::CommandFactory;
use clap::Parser;
use clap_complete::generate;

use kachery_daemon::commands::Cli;
use kachery_daemon::commands::Commands;
use kachery_daemon::handlers;
use kachery_daemon::telemetry;
use kachery_daemon_common::color_init;
use kachery_daemon_common::Colors;
use kachery_daemon_connection::ConnectionError;
use kachery_daemon_launch::LaunchError;

fn main() {
    let cli = Cli::parse();

    color_init(cli.no_color);
    let _telemetry = telemetry::init_tracing("info");

    let result = match cli.command {
        Commands::Start {
            label,
            owner,
            verbose,
            method,
            node_arg,
            auth_group,
            kachery_hub_url,
        } => handlers::handle_start(
            label,
            owner,
            verbose,
            method,
            node_arg,
            auth_group,
            kachery_hub_url,
        ),
        Commands::Info => handlers::handle_info(),
        Commands::Version => handlers::handle_version(),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "kachery-daemon", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        if let Some(launch_error) = e.downcast_ref::<LaunchError>() {
            eprintln!("{} {}", Colors::error("Error:"), launch_error);
            if let Some(suggestion) = launch_error.suggestion() {
                eprintln!("{} {}", Colors::dim("Suggestion:"), suggestion);
            }
            if launch_error.is_retryable() {
                eprintln!(
                    "{}",
                    Colors::dim("(This error may be transient - retry may succeed)")
                );
            }
            std::process::exit(launch_error.exit_code());
        } else if let Some(connection_error) = e.downcast_ref::<ConnectionError>() {
            eprintln!("{} {}", Colors::error("Error:"), connection_error);
            eprintln!(
                "{} {}",
                Colors::dim("Suggestion:"),
                connection_error.suggestion()
            );
            std::process::exit(connection_error.exit_code());
        } else {
            eprintln!("{} {}", Colors::error("Error:"), e);
            std::process::exit(1);
        }
    }
}
