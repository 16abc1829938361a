use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "socsec",
    about = "Social Security retirement benefits explained: earnings curve, cap, indexing, top 35 years, benefit formula"
)]
struct Cli {
    #[arg(long, global = true, default_value = "info", help = "Log level when RUST_LOG is unset")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the interactive explainer and its JSON API
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Print the computed series and benefit for a navigation state
    Compute {
        #[arg(
            long,
            default_value = "",
            help = "Query string such as 'step=3&dots=[...]'; defaults apply when empty"
        )]
        state: String,
        #[arg(long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("socsec={},warn", cli.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Command::Serve { port } => {
            if let Err(e) = socsec::api::run_http_server(port).await {
                error!("server error: {e}");
                std::process::exit(1);
            }
        }
        Command::Compute { state, pretty } => match socsec::api::compute_json(&state, pretty) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                error!("compute failed: {e}");
                std::process::exit(1);
            }
        },
    }
}
