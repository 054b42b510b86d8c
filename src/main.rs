// src/main.rs
// =============================================================================
// Entry point of the webmap CLI.
//
// What happens here:
// 1. Parse command-line arguments with clap
// 2. Wire up tracing to stderr at the requested verbosity
// 3. Run the crawl and print the sorted site map to stdout
// 4. Exit 0 on success, 1 on any crawl failure
// =============================================================================

mod cli;

use std::io::{self, Write};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;
use webmap::{crawl_domain, CrawlConfig};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("error: {e}");
            1
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.debug);

    let config = CrawlConfig {
        max_concurrency: cli.concurrency,
        max_pending_urls: cli.max_pending,
        crawl_timeout: match cli.crawl_timeout {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        },
        request_timeout: Duration::from_secs(cli.request_timeout),
        keep_alive: Duration::from_secs(cli.keep_alive),
        ..CrawlConfig::default()
    };

    let site_map = crawl_domain(&cli.url, config).await?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    site_map.write_map(&mut out)?;
    out.flush()?;

    Ok(())
}

// Logs go to stderr so the site map on stdout stays pipeable. The
// default level only surfaces warnings; RUST_LOG still takes precedence
// over the flags when set.
fn init_logging(verbose: bool, debug: bool) {
    let level = if debug {
        "webmap=debug"
    } else if verbose {
        "webmap=info"
    } else {
        "webmap=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
