//! Compose image-generation prompts from a fragment catalog, format them for
//! a target tool and optionally enhance them through a language model.

pub mod adapters;
pub mod catalog;
pub mod commands;
pub mod diagnostics;
pub mod llm;
pub mod session;
pub mod settings;
pub mod shell;

use crate::adapters::ToolId;
use crate::catalog::CsvCatalogStore;
use crate::diagnostics::DiagnosticLog;
use crate::llm::{Enhancer, HttpChatBackend};
use crate::session::SessionController;
use crate::settings::Settings;
use crate::shell::Shell;
use anyhow::anyhow;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug, Default)]
#[command(name = "promptcraft", version, about)]
pub struct Cli {
    /// Settings file (TOML). Defaults to ./promptcraft.toml when present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Catalog CSV file with 'category' and 'prompt' columns.
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Target tool to start with, e.g. "Midjourney" or "Stable Diffusion".
    #[arg(long)]
    pub tool: Option<String>,

    /// Append diagnostic records to this JSON-lines file.
    #[arg(long)]
    pub diagnostics: Option<PathBuf>,

    /// Show internal diagnostic detail.
    #[arg(long)]
    pub debug: bool,

    /// Write a starter catalog if the catalog file does not exist.
    #[arg(long)]
    pub seed: bool,
}

impl Cli {
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(path) = &self.catalog {
            settings.catalog_path = path.clone();
        }
        if let Some(tool) = &self.tool {
            settings.default_tool = tool.clone();
        }
        if let Some(path) = &self.diagnostics {
            settings.diagnostics_path = Some(path.clone());
        }
        if self.debug {
            settings.debug = true;
        }
    }
}

pub fn init_tracing(debug: bool) {
    let fallback = if debug { "debug" } else { "warn" };
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(debug)
                .with_line_number(debug),
        )
        .try_init();
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref())?;
    cli.apply(&mut settings);
    init_tracing(settings.debug);

    let missing = settings.missing_credentials();
    if !missing.is_empty() {
        warn!(
            missing = %missing.join(", "),
            "Enhancement is not configured; optimize will keep prompts unchanged"
        );
    }

    let store = CsvCatalogStore::new(&settings.catalog_path);
    if cli.seed && store.seed_defaults()? {
        info!(path = %settings.catalog_path.display(), "Starter catalog written");
    }

    let backend = HttpChatBackend::new(settings.backend_config())?;
    let controller = SessionController::new(store, Enhancer::new(backend));

    let mut diagnostics = DiagnosticLog::new().surfacing(settings.debug);
    if let Some(path) = &settings.diagnostics_path {
        diagnostics = diagnostics.with_file(path);
    }

    let session = controller
        .open_session(diagnostics)
        .map_err(|e| anyhow!("{} {}", e, e.user_hint()))?
        .with_tool(ToolId::parse(&settings.default_tool));

    let mut shell = Shell::new(&controller, session);
    let mut stdout = tokio::io::stdout();
    shell
        .run(tokio::io::stdin(), &mut stdout)
        .await
        .map_err(|e| anyhow!("{} {}", e, e.user_hint()))?;

    Ok(())
}
