use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tile_quant::MapperKind;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use pixelforge::api;
use pixelforge::models::{self, flatten, load_palette_file, AppConfig, JobId, WorkerEvent};
use pixelforge::rendering::JobSource;
use pixelforge::server;
use pixelforge::services::{JobRequest, Request, WorkerHandle, WorkerOptions};

#[derive(Parser)]
#[command(name = "pixelforge")]
#[command(about = "Pixel-art conversion service: block tiling and palette mapping")]
struct Cli {
    /// Config file (YAML); falls back to the CONFIG_FILE environment variable
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Pixelate a PNG file directly (no server needed)
    Render {
        /// Input PNG file path
        #[arg(short, long)]
        input: PathBuf,

        /// Output PNG file path
        #[arg(short, long)]
        output: PathBuf,

        /// Tile edge length in source pixels (1-32)
        #[arg(short, long)]
        block_size: Option<u32>,

        /// Palette JSON file (overrides the configured palette file)
        #[arg(short, long)]
        palette: Option<PathBuf>,

        /// Color mapper: "classic" or "perceptual"
        #[arg(short, long, value_parser = MapperKind::from_str)]
        mapper: Option<MapperKind>,

        /// Keep the tile colors instead of mapping them to the palette
        #[arg(long)]
        no_colorize: bool,
    },
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "pixelforge API",
        description = "Pixel-art conversion: block tiling and palette mapping",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(api::handle_worker, api::handle_palettes),
    components(schemas(
        models::WorkerMessage,
        models::ProcessRequest,
        models::SourceImage,
        models::JobRef,
        models::WorkerEvent,
        models::JobResult,
        models::ResultMeta,
        models::ExportFile,
        models::JobFailure,
        models::MapperChoice,
        models::Swatch,
        api::PaletteListResponse,
    )),
    tags(
        (name = "Worker", description = "Pixelation jobs, cancellation and export"),
        (name = "Palettes", description = "Configured palette swatches")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = cli
        .config
        .or_else(|| std::env::var("CONFIG_FILE").ok().map(PathBuf::from));

    match cli.command {
        Some(Commands::Serve) => run_server(config_path.as_deref()).await,
        Some(Commands::Render {
            input,
            output,
            block_size,
            palette,
            mapper,
            no_colorize,
        }) => {
            run_render_command(
                config_path.as_deref(),
                &input,
                &output,
                block_size,
                palette.as_deref(),
                mapper,
                no_colorize,
            )
            .await
        }
        None => {
            run_status_command(config_path.as_deref());
            Ok(())
        }
    }
}

/// Pixelate a PNG file through the same worker the server uses
async fn run_render_command(
    config_path: Option<&Path>,
    input: &Path,
    output: &Path,
    block_size: Option<u32>,
    palette_path: Option<&Path>,
    mapper: Option<MapperKind>,
    no_colorize: bool,
) -> anyhow::Result<()> {
    // Minimal logging for CLI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixelforge=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let config = AppConfig::load(config_path);

    let png_bytes = std::fs::read(input)?;

    let palette = match palette_path.or(config.palette_file.as_deref()) {
        Some(path) => Some(flatten(&load_palette_file(path)?)),
        None => None,
    };

    let worker = WorkerHandle::spawn(WorkerOptions::from(&config));
    let job_id = JobId(1);
    let request = Request::Process(JobRequest {
        job_id,
        block_size: block_size.unwrap_or(config.defaults.block_size),
        source: Some(JobSource::Png(png_bytes)),
        colorize: Some(!no_colorize),
        palette,
        mapper,
    });

    let meta = match worker.post(request)?.recv().await {
        Some(WorkerEvent::Result(result)) => result.meta,
        Some(WorkerEvent::Error(failure)) => anyhow::bail!("Render error: {}", failure.message),
        other => anyhow::bail!("Render error: unexpected worker response {other:?}"),
    };

    let file_bytes = match worker.post(Request::Export(job_id))?.recv().await {
        Some(WorkerEvent::ExportFile(file)) => file.file_bytes,
        Some(WorkerEvent::Error(failure)) => anyhow::bail!("Export error: {}", failure.message),
        other => anyhow::bail!("Export error: unexpected worker response {other:?}"),
    };

    std::fs::write(output, &file_bytes)?;
    println!(
        "Rendered {} ({}x{} tiles, block {}, {} bytes)",
        output.display(),
        meta.tiles_x,
        meta.tiles_y,
        meta.block_size,
        file_bytes.len()
    );

    Ok(())
}

/// Display status and configuration information
fn run_status_command(config_path: Option<&Path>) {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let bind_addr = std::env::var("BIND_ADDR").ok();

    println!("pixelforge v{VERSION}");
    println!("Pixel-art conversion service\n");

    println!("Environment Variables:");
    println!(
        "  BIND_ADDR   = {}",
        bind_addr.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  CONFIG_FILE = {}",
        config_path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not set)".to_string())
    );

    let config = match config_path {
        Some(path) => match AppConfig::from_file(path) {
            Ok(config) => {
                println!("\nConfig: {}", path.display());
                config
            }
            Err(e) => {
                println!("\nConfig: defaults ({e})");
                AppConfig::default()
            }
        },
        None => {
            println!("\nConfig: defaults");
            AppConfig::default()
        }
    };

    println!("  Bind address:  {}", config.bind_addr);
    println!("  Block size:    {}", config.defaults.block_size);
    println!(
        "  Mapper:        {}",
        MapperKind::from(config.defaults.mapper)
    );
    println!("  Colorize:      {}", config.defaults.colorize);
    match &config.palette_file {
        Some(path) => match load_palette_file(path) {
            Ok(swatches) => println!("  Palette:       {} ({} swatches)", path.display(), swatches.len()),
            Err(e) => println!("  Palette:       {} ({e})", path.display()),
        },
        None => println!("  Palette:       (none)"),
    }

    println!("\nCommands:");
    println!("  pixelforge serve    Start the HTTP server");
    println!("  pixelforge render   Pixelate a PNG file");
    println!("\nRun 'pixelforge --help' for more details.");
}

/// Run the HTTP server
async fn run_server(config_path: Option<&Path>) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixelforge=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load(config_path).with_env_overrides();
    let bind_addr = config.bind_addr.clone();

    let state = server::create_app_state(config)?;

    let app = server::build_router(state)
        // OpenAPI documentation (production only)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "pixelforge server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
