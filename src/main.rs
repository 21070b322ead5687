//! www-redirect - serve the redirect locally or evaluate a single event.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use www_redirect::prelude::*;

#[derive(Parser)]
#[command(name = "www-redirect")]
#[command(about = "Redirect bare-domain requests to their www variant", long_about = None)]
struct Cli {
    /// Bare domain to redirect.
    #[arg(short, long, global = true, default_value = "example.com")]
    domain: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the local edge host (default)
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        #[arg(short, long, default_value_t = 8080)]
        port: u16,
    },
    /// Read one JSON event from stdin and print the function output
    Eval,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    // Logs go to stderr so `eval` output stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Commands::Serve {
        host: "0.0.0.0".to_string(),
        port: 8080,
    }) {
        Commands::Serve { host, port } => {
            let config = HostConfig::new().host(host).port(port).domain(cli.domain);

            tracing::info!("Starting www-redirect edge host...");
            tracing::info!(
                "Try: curl -i -H 'Host: {}' http://localhost:{}/path?q=1",
                config.domain,
                config.port
            );

            let host = EdgeHost::www_redirect(config).await?;
            host.run().await
        }
        Commands::Eval => {
            let function = WwwRedirect::new(cli.domain);
            run_event_io(&function, tokio::io::stdin(), tokio::io::stdout()).await?;
            Ok(())
        }
    }
}
