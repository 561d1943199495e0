use clap::Parser;
use std::path::PathBuf;

use logomark::config::Config;
use logomark::constants::DEFAULT_ENV_FILE;

/// Logomark - image upload service that stamps a watermark logo and publishes to S3
#[derive(Parser, Debug)]
#[command(name = "logomark")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to environment file
    #[arg(long, default_value = DEFAULT_ENV_FILE)]
    env_file: PathBuf,

    /// Listen port, overriding PORT from the environment
    #[arg(short, long)]
    port: Option<u16>,

    /// Test configuration and exit
    #[arg(long)]
    test: bool,
}

#[tokio::main]
async fn main() {
    // Initialize logging subsystem
    logomark::logging::init_subscriber().expect("Failed to initialize logging subsystem");

    // Parse command-line arguments
    let args = Args::parse();

    // A missing env file is not an error; variables may come from the
    // process environment directly.
    if let Err(e) = dotenvy::from_path(&args.env_file) {
        if !e.not_found() {
            eprintln!(
                "Failed to read environment file {}: {}",
                args.env_file.display(),
                e
            );
            std::process::exit(1);
        }
    }

    // Load configuration from the environment
    let mut config = Config::from_env().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::process::exit(1);
    });

    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!(
        server_port = config.server.port,
        tls_enabled = config.server.tls.is_some(),
        region = %config.storage.region,
        stack_name = %config.stack_name,
        logo = %config.logo_path.display(),
        "Configuration loaded successfully"
    );

    if !config.logo_path.exists() {
        tracing::warn!(
            logo = %config.logo_path.display(),
            "Watermark logo not found; uploads will fail until it exists"
        );
    }

    if args.test {
        println!("Configuration OK");
        return;
    }

    // Run server forever (blocks until shutdown)
    if let Err(e) = logomark::server::run(config).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
