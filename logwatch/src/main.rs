use clap::{Parser, Subcommand};
use logwatch_core::cli;
use logwatch_core::cli::generate::GenerateArgs;
use logwatch_core::cli::watch::WatchArgs;
use logwatch_core::logging::{LogMode, init_file_logging, init_logging};

#[derive(Parser, Debug)]
#[command(
    name = "logwatch",
    version,
    about = "logwatch: HTTP access log monitor"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Follow an access log and alert on high traffic (default)
    Watch(WatchArgs),

    /// Append synthetic access log entries
    Generate(GenerateArgs),

    /// Configuration tooling
    Config {
        #[command(subcommand)]
        cmd: cli::config::ConfigCmd,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or_else(|| Command::Watch(WatchArgs::default())) {
        Command::Watch(args) => {
            // The dashboard owns the terminal, so logs go to a file instead.
            let _guard = match args.mode() {
                LogMode::Dashboard => Some(init_file_logging(&args.log_dir)?),
                LogMode::Json => {
                    init_logging();
                    None
                }
            };
            cli::watch::run_watch(args).await
        }

        Command::Generate(args) => {
            init_logging();
            cli::generate::run_generate(args).await
        }

        Command::Config { cmd } => cli::config::run(cmd),
    }
}
