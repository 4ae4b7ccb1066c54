mod cli;

use clipforge::{
    config::{self, Config},
    pipeline::{self, PipelineExecutor, TopicOutcome},
    server,
};
use clipforge_common::CatalogStats;
use clipforge_store::{JsonFileStore, RecordStore};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;

fn open_store(config: &Config) -> Arc<dyn RecordStore> {
    tracing::debug!("Using record store at {:?}", config.paths.data_file);
    Arc::new(JsonFileStore::new(&config.paths.data_file))
}

fn main() -> Result<()> {
    // Credentials may come from a .env file; real environment variables win.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "clipforge=trace,clipforge_store=trace,clipforge_common=debug,tower_http=debug"
                .to_string()
        } else {
            "clipforge=debug,clipforge_store=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Generate { topics } => generate(topics, cli.config.as_deref()),
        Commands::Interactive { max_rounds } => interactive(max_rounds, cli.config.as_deref()),
        Commands::Serve { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(serve(host, port, cli.config.as_deref()))
        }
        Commands::Stats => stats(cli.config.as_deref()),
        Commands::Validate { file } => {
            let path = file.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("clipforge {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn build_executor(config_path: Option<&Path>) -> Result<PipelineExecutor> {
    let config = config::load_config_or_default(config_path)?;
    let store = open_store(&config);
    Ok(PipelineExecutor::from_config(&config, store))
}

/// Read one line from stdin. `None` on end of input.
fn prompt_line(prompt: &str) -> Result<Option<String>> {
    print!("{}", prompt);
    std::io::stdout().flush()?;

    let mut line = String::new();
    let read = std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read topics from stdin")?;

    Ok((read > 0).then_some(line))
}

fn generate(topics: Vec<String>, config_path: Option<&Path>) -> Result<()> {
    // Arguments go through the same comma splitting as a typed line.
    let line = if topics.is_empty() {
        let Some(line) = prompt_line("Enter topics (comma-separated): ")? else {
            println!("No topics provided.");
            return Ok(());
        };
        line
    } else {
        topics.join(",")
    };

    if pipeline::is_quit(&line) {
        println!("Bye.");
        return Ok(());
    }
    let topics = pipeline::parse_topics(&line);

    if topics.is_empty() {
        println!("No topics provided.");
        return Ok(());
    }

    let executor = build_executor(config_path)?;
    let rt = tokio::runtime::Runtime::new()?;
    let outcomes = rt.block_on(executor.run_batch(&topics));
    print_outcomes(&outcomes);

    Ok(())
}

fn interactive(max_rounds: u32, config_path: Option<&Path>) -> Result<()> {
    let executor = build_executor(config_path)?;
    let rt = tokio::runtime::Runtime::new()?;

    for round in 1..=max_rounds {
        let Some(line) = prompt_line("\nEnter topics (comma-separated, blank or 'quit' to exit): ")?
        else {
            break;
        };
        if line.trim().is_empty() || pipeline::is_quit(&line) {
            break;
        }

        let topics = pipeline::parse_topics(&line);
        tracing::debug!(round, max_rounds, topics = topics.len(), "Interactive round");

        let outcomes = rt.block_on(executor.run_batch(&topics));
        print_outcomes(&outcomes);
    }

    println!("Bye.");
    Ok(())
}

fn print_outcomes(outcomes: &[TopicOutcome]) {
    for outcome in outcomes {
        match outcome {
            TopicOutcome::Generated(record) => {
                println!("✓ Success: {} -> {}", record.title, record.video_url);
            }
            TopicOutcome::Failed { title, error } => {
                println!("✗ Failed: {} ({})", title, error);
            }
        }
    }

    let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
    println!(
        "\nGenerated {} of {} videos ({} failed)",
        succeeded,
        outcomes.len(),
        outcomes.len() - succeeded
    );
}

async fn serve(host: Option<String>, port: Option<u16>, config_path: Option<&Path>) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;

    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config::validate_config(&config)?;

    let store = open_store(&config);
    server::start_server(config, store).await
}

fn stats(config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let records = open_store(&config).load()?;
    let stats = CatalogStats::from_records(&records);

    println!("Catalog: {}", config.paths.data_file.display());
    println!("  Total:        {}", stats.total);
    println!("  Posted:       {}", stats.posted);
    println!("  Drafts:       {}", stats.drafts);
    println!("  Failed:       {}", stats.failed);
    println!("  Success rate: {:.1}%", stats.success_rate);

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            config::load_config(p)?
        }
        None => {
            println!("No config file specified, using defaults");
            config::load_config_or_default(None)?
        }
    };

    let configured = |set: bool| if set { "configured" } else { "fallback" };

    println!("✓ Configuration is valid");
    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Catalog file: {}", config.paths.data_file.display());
    println!(
        "  Script provider: {}",
        configured(config::credential(&config.script.api_key).is_some())
    );
    println!(
        "  Speech provider: {}",
        configured(config::credential(&config.speech.api_key).is_some())
    );
    println!(
        "  Video provider: {}",
        configured(config::credential(&config.video.api_key).is_some())
    );
    println!(
        "  Catalog sync: {}",
        configured(
            config::credential(&config.catalog.api_key).is_some()
                && config::credential(&config.catalog.base_id).is_some()
        )
    );

    Ok(())
}
