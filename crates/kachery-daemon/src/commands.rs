use clap::Parser;
use clap::Subcommand;
pub use clap_complete::Shell;

use kachery_daemon_launch::DEFAULT_KACHERY_HUB_URL;

const LONG_ABOUT: &str = r#"kachery-daemon controls the background daemon that serves a kachery node.

WORKFLOW:
    1. Start a daemon for this machine with a human-readable label
    2. Query the node identity and your access status with `info`
    3. Stop the daemon (Ctrl-C on the start command) when done

The daemon binds the host/port from KACHERY_DAEMON_HOST and
KACHERY_DAEMON_PORT (default localhost:20431) and keeps its storage under
KACHERY_STORAGE_DIR (default ~/kachery-storage).

EXAMPLES:
    # Start a daemon for this node
    kachery-daemon start --label my-lab-node

    # Start with an owner and access group
    kachery-daemon start --label my-lab-node --owner user@example.org --auth-group kachery

    # Run from a local development tree instead of the released package
    kachery-daemon start --label dev-node --method source

    # Check identity and authorization
    kachery-daemon info"#;

#[derive(Parser)]
#[command(name = "kachery-daemon")]
#[command(author, version)]
#[command(about = "Kachery daemon command-line client")]
#[command(long_about = LONG_ABOUT)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Disable colored output (also respects NO_COLOR env var)
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the kachery daemon
    Start {
        /// Label for this node
        #[arg(long)]
        label: String,

        /// Owner of this node (google ID)
        #[arg(long, default_value = "")]
        owner: String,

        /// Verbosity level
        #[arg(long, default_value_t = 0)]
        verbose: u32,

        /// Method for starting the daemon: packaged (default) or source
        #[arg(long, default_value = "packaged")]
        method: String,

        /// Additional argument to send to the node runtime (repeatable)
        #[arg(long = "node-arg", allow_hyphen_values = true)]
        node_arg: Vec<String>,

        /// The os group that has access to this daemon
        #[arg(long, default_value = "")]
        auth_group: String,

        /// The url for the kacheryhub app
        #[arg(long, default_value = DEFAULT_KACHERY_HUB_URL)]
        kachery_hub_url: String,
    },

    /// Print information about this node
    Info,

    /// Display kachery-daemon version and exit
    Version,

    /// Generate shell completion scripts
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_defaults() {
        let cli = Cli::try_parse_from(["kachery-daemon", "start", "--label", "node1"]).unwrap();
        match cli.command {
            Commands::Start {
                label,
                owner,
                verbose,
                method,
                node_arg,
                auth_group,
                kachery_hub_url,
            } => {
                assert_eq!(label, "node1");
                assert_eq!(owner, "");
                assert_eq!(verbose, 0);
                assert_eq!(method, "packaged");
                assert!(node_arg.is_empty());
                assert_eq!(auth_group, "");
                assert_eq!(kachery_hub_url, DEFAULT_KACHERY_HUB_URL);
            }
            _ => panic!("expected start command"),
        }
    }

    #[test]
    fn test_start_requires_label() {
        assert!(Cli::try_parse_from(["kachery-daemon", "start"]).is_err());
    }

    #[test]
    fn test_node_arg_is_repeatable() {
        let cli = Cli::try_parse_from([
            "kachery-daemon",
            "start",
            "--label",
            "node1",
            "--node-arg",
            "--max-old-space-size=4096",
            "--node-arg",
            "--inspect",
        ])
        .unwrap();
        match cli.command {
            Commands::Start { node_arg, .. } => {
                assert_eq!(node_arg, vec!["--max-old-space-size=4096", "--inspect"]);
            }
            _ => panic!("expected start command"),
        }
    }

    #[test]
    fn test_info_takes_no_flags() {
        let cli = Cli::try_parse_from(["kachery-daemon", "info"]).unwrap();
        assert!(matches!(cli.command, Commands::Info));
    }
}
