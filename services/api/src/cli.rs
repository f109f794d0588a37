use crate::demo::{run_alert, run_demo, run_score, AlertArgs, DemoArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use jubilee::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Jubilee Watch",
    about = "Score Mobile Bay jubilee conditions and run the community alert service",
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
    /// Score a single environmental reading
    Score(ScoreArgs),
    /// Evaluate the community alert level for a batch of reports
    Alert(AlertArgs),
    /// Walk through sample readings and an escalating report stream
    Demo(DemoArgs),
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
        Command::Score(args) => run_score(args),
        Command::Alert(args) => run_alert(args),
        Command::Demo(args) => run_demo(args),
    }
}
