use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::{fmt, EnvFilter};

use site_builder::{
    config::Config,
    controller::{ChannelSink, GenerationController, NotificationSink, SubmitOutcome, TracingSink},
    generator::HttpGenerationService,
    service, view,
};

#[derive(Parser, Debug)]
#[command(name = "site-builder", about = "AI Builder: generate a website template from a description")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the demo generation service
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
    /// Submit one description and print the result region
    Generate {
        description: String,
        #[arg(long)]
        url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    match Cli::parse().command {
        Command::Serve { port } => serve(port.unwrap_or(config.port)).await,
        Command::Generate { description, url } => {
            generate(description, url.unwrap_or(config.generator_url)).await
        }
    }
}

async fn serve(port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "Starting generation service");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    axum::serve(listener, service::router())
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await
        .context("serving")
}

async fn generate(description: String, url: String) -> Result<()> {
    let (sink, mut notifications) = ChannelSink::new();
    let sinks: Vec<Arc<dyn NotificationSink>> = vec![Arc::new(TracingSink), Arc::new(sink)];
    let controller = GenerationController::new(
        Arc::new(HttpGenerationService::new(url)),
        Arc::new(sinks),
    );
    controller.update_description(description);

    if let SubmitOutcome::Ignored(reason) = controller.submit() {
        tracing::warn!("Nothing submitted: {}", reason);
        return Ok(());
    }
    println!("{}", view::render_state(&controller.state()));

    let settled = tokio::select! {
        state = controller.wait_settled() => Some(state),
        _ = tokio::signal::ctrl_c() => {
            controller.reset();
            None
        }
    };
    let Some(settled) = settled else {
        return Ok(());
    };

    // every settled submission announces exactly one notification
    if let Some(n) = notifications.recv().await {
        println!("{}", view::render_notification(&n));
    }
    let region = view::render_state(&settled);
    if !region.is_empty() {
        println!("{}", region);
    }
    Ok(())
}
