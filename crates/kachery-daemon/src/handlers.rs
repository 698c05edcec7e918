//! Command handlers for the kachery-daemon CLI.

use kachery_daemon_common::Colors;
use kachery_daemon_connection::{node_status, ConnectionConfig, HttpProber};
use kachery_daemon_launch::{
    start_daemon, LaunchError, LaunchMethod, LauncherConfig, StartupOptions, SubprocessLauncher,
};

pub type HandlerResult = Result<(), Box<dyn std::error::Error>>;

pub fn handle_start(
    label: String,
    owner: String,
    verbose: u32,
    method: String,
    node_args: Vec<String>,
    auth_group: String,
    hub_url: String,
) -> HandlerResult {
    // validate before anything touches the system
    let method = method.parse::<LaunchMethod>()?;
    let options = StartupOptions::new(label)
        .with_owner(owner)
        .with_verbose(verbose)
        .with_method(method)
        .with_node_args(node_args)
        .with_auth_group(auth_group)
        .with_hub_url(hub_url);

    let config = ConnectionConfig::from_env();
    let prober = HttpProber::new();
    let launcher = SubprocessLauncher::new(LauncherConfig::resolve()?);

    let code = start_daemon(&prober, &launcher, &config, &options)?;
    if code != 0 {
        return Err(Box::new(LaunchError::DaemonExited { code }));
    }
    Ok(())
}

pub fn handle_info() -> HandlerResult {
    let config = ConnectionConfig::from_env();
    let status = node_status(&HttpProber::new(), &config)?;

    println!("Node ID: {}", status.node_id);
    if status.has_access {
        println!("{}", Colors::success("You have access to this daemon"));
    } else {
        println!("{}", Colors::warning("You do not have access to this daemon"));
    }
    Ok(())
}

pub fn handle_version() -> HandlerResult {
    println!(
        "This is kachery-daemon version {}",
        env!("CARGO_PKG_VERSION")
    );
    Ok(())
}
