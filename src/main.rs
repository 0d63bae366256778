use std::io;
use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use nestegg::api::{ServerConfig, run_http_server};
use nestegg::chart::Viewport;
use nestegg::core::{Profile, RawInput};
use nestegg::session::{DEFAULT_VIEWPORT, calculate_once};

#[derive(Debug, Parser)]
#[command(
    name = "nestegg",
    about = "Savings growth calculator: compound projections to ages 18, 22 and 65"
)]
struct Cli {
    #[arg(long, global = true, help = "Enable debug logging")]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the calculator page and its JSON API
    Serve(ServeArgs),
    /// Print one projection as JSON
    Project(ProjectArgs),
}

#[derive(Debug, Args)]
struct ServeArgs {
    #[arg(long, default_value_t = 8080)]
    port: u16,
    #[arg(long, default_value = "0.0.0.0")]
    bind: IpAddr,
    #[arg(long, default_value = "grayson", help = "Profile active when the page first loads")]
    profile: String,
}

#[derive(Debug, Args)]
struct ProjectArgs {
    #[arg(long, default_value = "grayson")]
    profile: String,
    #[arg(long, default_value = "", help = "Current balance in whole dollars, commas allowed; empty uses the default balance")]
    balance: String,
    #[arg(long, help = "Include the one-time gift")]
    gift: bool,
    #[arg(long, default_value = "0", help = "Monthly contribution")]
    monthly: String,
    #[arg(long, default_value_t = 800.0)]
    width: f64,
    #[arg(long, default_value_t = 400.0)]
    height: f64,
    #[arg(long, help = "Also write the growth chart as SVG to this path")]
    chart_svg: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let result = match cli.command {
        Command::Serve(args) => serve(args).await,
        Command::Project(args) => project(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn serve(args: ServeArgs) -> Result<(), String> {
    let profile = Profile::lookup(&args.profile)?;
    let config = ServerConfig {
        bind: args.bind,
        port: args.port,
        profile,
        viewport: DEFAULT_VIEWPORT,
    };
    run_http_server(config)
        .await
        .map_err(|e| format!("Server error: {e}"))
}

fn project(args: ProjectArgs) -> Result<(), String> {
    let profile = Profile::lookup(&args.profile)?;
    let input = RawInput {
        current_balance: args.balance,
        gift_enabled: args.gift,
        monthly_contribution: args.monthly,
    };
    let calc = calculate_once(profile, input, Viewport::new(args.width, args.height));

    if let Some(path) = args.chart_svg {
        let chart = calc
            .chart
            .as_ref()
            .ok_or_else(|| {
                format!(
                    "no chart to write: {} has no years left to plot or the surface is too small",
                    profile.name
                )
            })?;
        std::fs::write(&path, &chart.svg)
            .map_err(|e| format!("failed to write {}: {e}", path.display()))?;
        info!(path = %path.display(), points = chart.points.len(), "chart written");
    }

    let json = serde_json::to_string_pretty(&calc.results)
        .map_err(|e| format!("failed to serialize results: {e}"))?;
    println!("{json}");
    Ok(())
}
