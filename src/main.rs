use anyhow::Context;
use clap::Parser;
use tokio::io::{stdin, stdout};
use tower_lsp::{LspService, Server};
use tracing_subscriber::EnvFilter;

use camel_ls::server::CamelLanguageServer;

/// Language server for Camel endpoint URIs
#[derive(Parser, Debug)]
#[command(name = "camel-ls", version)]
struct Cli {
    /// Tracing filter directive, e.g. "camel_ls=debug"
    #[arg(long, default_value = "camel_ls=info")]
    log_filter: String,

    /// Directory of component descriptors, overriding the `catalog_path` setting
    #[arg(long)]
    catalog: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries the protocol
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&cli.log_filter)
                .with_context(|| format!("Invalid log filter '{}'", cli.log_filter))?,
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let catalog = cli.catalog;
    let (service, socket) =
        LspService::new(move |client| CamelLanguageServer::new(client, catalog.clone()));
    Server::new(stdin(), stdout(), socket).serve(service).await;

    Ok(())
}
