use anyhow::Context;
use certforge::session::{EXPORT_FAILED_MESSAGE, LOOKUP_FAILED_MESSAGE, NOT_FOUND_MESSAGE};
use certforge::{AppState, Config, SessionState, VerificationSession, build_router};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

// Renders allocate and free full-page buffers continuously.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "certforge")]
#[command(about = "Verify, render and export issued certificates")]
struct Cli {
    /// Configuration file (defaults to config/default.toml)
    #[arg(long, env = "CERTFORGE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve,

    /// Look up a certificate and print its details
    Verify {
        /// Certificate ID, e.g. EZZCODE-2024-WD-001
        id: String,
    },

    /// Render a certificate to a PNG file
    Render {
        id: String,

        #[arg(short, long)]
        output: PathBuf,
    },

    /// Export a certificate as <ID>.pdf into a directory
    Export {
        id: String,

        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = Config::load_from(cli.config.as_deref()).context("loading configuration")?;
    let state = AppState::from_config(config).context("initialising certificate services")?;

    match cli.command {
        Commands::Serve => serve(state).await,
        Commands::Verify { id } => verify(&state, &id).await,
        Commands::Render { id, output } => render(&state, &id, output).await,
        Commands::Export { id, output } => export(&state, &id, output).await,
    }
}

async fn serve(state: AppState) -> anyhow::Result<()> {
    let addr = state.config.bind_address();
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    log::info!("certforge listening on {}", addr);
    log::info!("Endpoints:");
    log::info!("  - GET /api/v1/certificates/:id");
    log::info!("  - GET /api/v1/certificates/:id/preview.png");
    log::info!("  - GET /api/v1/certificates/:id/download");
    log::info!("  - GET /health");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }
    log::info!("Shutting down");
}

/// Runs a lookup and fails with the user-facing message unless the record was found.
async fn found_session(state: &AppState, id: &str) -> anyhow::Result<VerificationSession> {
    let mut session = VerificationSession::new();
    session.verify(state.store.as_ref(), id).await?;
    match session.state() {
        SessionState::Found { .. } => {}
        SessionState::NotFound { display_id } => {
            anyhow::bail!("{} ({})", NOT_FOUND_MESSAGE, display_id)
        }
        SessionState::LookupFailed { error, .. } => {
            anyhow::bail!("{} ({})", LOOKUP_FAILED_MESSAGE, error)
        }
        other => anyhow::bail!("unexpected session state: {}", other.name()),
    }
    Ok(session)
}

async fn verify(state: &AppState, id: &str) -> anyhow::Result<()> {
    let session = found_session(state, id).await?;
    if let Some(record) = session.state().record() {
        println!("Certificate ID : {}", record.display_id);
        println!("Holder         : {}", record.holder_name);
        println!("Program        : {}", record.program_name);
        println!("Issued         : {}", record.formatted_issue_date());
        println!("Status         : {}", record.status.label());
    }
    Ok(())
}

async fn render(state: &AppState, id: &str, output: PathBuf) -> anyhow::Result<()> {
    let mut session = found_session(state, id).await?;
    let rendered = session.render(&state.renderer).await?;
    let png = rendered.to_png()?;
    tokio::fs::write(&output, &png)
        .await
        .with_context(|| format!("writing {}", output.display()))?;
    println!(
        "Rendered {} ({}x{}) to {}",
        rendered.display_id,
        rendered.width(),
        rendered.height(),
        output.display()
    );
    Ok(())
}

async fn export(state: &AppState, id: &str, output: PathBuf) -> anyhow::Result<()> {
    let mut session = found_session(state, id).await?;
    session.render(&state.renderer).await?;

    session.export(&state.exporter).await?;
    let document = match session.state() {
        SessionState::ExportReady { document, .. } => document.clone(),
        SessionState::ExportFailed { error, .. } => {
            anyhow::bail!("{} ({})", EXPORT_FAILED_MESSAGE, error)
        }
        other => anyhow::bail!("unexpected session state: {}", other.name()),
    };

    tokio::fs::create_dir_all(&output).await?;
    let path = output.join(&document.filename);
    tokio::fs::write(&path, &document.bytes)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    println!("Exported {} to {}", document.filename, path.display());
    Ok(())
}
