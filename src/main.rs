//! Barcode Server - renders text barcodes as PNG images.
//!
//! This binary starts the HTTP server or renders a single barcode from the
//! command line.

use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use barcode_server::{
    barcode::{BarcodeGenerator, TtfFace},
    cache::FsCacheStore,
    config::{Cli, Command, FontConfig, RenderConfig, ServeConfig},
    server::{create_router, RouterConfig},
    RenderError,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Serve(config) => run_serve(config).await,
        Command::Render(config) => run_render(config),
    }
}

// =============================================================================
// Serve Command
// =============================================================================

async fn run_serve(config: ServeConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Barcode Server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Cache directory: {}", config.cache_dir.display());
    info!("  Cache max-age: {}s", config.cache_max_age);
    info!("  Barcode font: {}", config.fonts.barcode_font.display());
    info!("  Plain font: {}", config.fonts.plain_font.display());

    let generator = match load_generator(&config.fonts) {
        Ok(generator) => generator,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let store = FsCacheStore::new(&config.cache_dir);
    if let Err(e) = store.ensure_dir().await {
        error!("Failed to prepare cache directory: {}", e);
        return ExitCode::FAILURE;
    }

    let router = create_router(store, generator, build_router_config(&config));

    let addr = config.bind_address();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    info!("Server listening on: http://{}", addr);
    info!("  Try: curl -i http://{}/barcode/TEST123", addr);

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "barcode_server=debug,tower_http=debug"
    } else {
        "barcode_server=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application ServeConfig.
fn build_router_config(config: &ServeConfig) -> RouterConfig {
    let mut router_config = RouterConfig::new().with_cache_max_age(config.cache_max_age);

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config.with_tracing(!config.no_tracing)
}

/// Load both faces; a missing or unreadable font is fatal.
fn load_generator(fonts: &FontConfig) -> Result<BarcodeGenerator, RenderError> {
    let barcode = TtfFace::from_file(&fonts.barcode_font)?;
    let plain = TtfFace::from_file(&fonts.plain_font)?;
    info!(
        barcode = barcode.name(),
        plain = plain.name(),
        "Fonts loaded"
    );
    Ok(BarcodeGenerator::from_faces(Arc::new(barcode), Arc::new(plain)))
}

// =============================================================================
// Render Command
// =============================================================================

fn run_render(config: RenderConfig) -> ExitCode {
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let generator = match load_generator(&config.fonts) {
        Ok(generator) => generator,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match config.output {
        Some(ref path) => generator
            .save(&config.code, path, config.width, config.height)
            .map(|()| eprintln!("Wrote {}", path.display())),
        None => generator
            .base64(&config.code, config.width, config.height)
            .map(|text| println!("{}", text)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
