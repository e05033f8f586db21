use crate::render::{run_properties, PropertiesArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use propdesk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "propdesk-api",
    about = "Serve and browse the property desk from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Render the property list panel from seed data
    Properties(PropertiesArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Properties(args) => run_properties(args),
    }
}
