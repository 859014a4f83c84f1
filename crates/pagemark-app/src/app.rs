//! Command-line host: configuration, errors and the replay entry point.

use crate::session::{Session, SessionReport, SessionScript};
use crate::shortcuts::ShortcutRegistry;
use clap::Parser;
use kurbo::Size;
use pagemark_core::attributes::AttributeError;
use pagemark_core::config::EditorConfig;
use pagemark_core::editor::AnnotationEditor;
use pagemark_render::RendererError;
use std::path::PathBuf;
use thiserror::Error;

/// Host errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid session script: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Attribute edit rejected: {0}")]
    Attribute(#[from] AttributeError),
    #[error(transparent)]
    Render(#[from] RendererError),
}

/// Result type for host operations.
pub type AppResult<T> = Result<T, AppError>;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "pagemark",
    about = "Replay an annotation editing session and print the resulting annotations",
    version
)]
pub struct Cli {
    /// Session script (JSON), e.g. demos/session.json
    pub script: Option<PathBuf>,

    /// Surface width in pixels
    #[arg(long, default_value_t = 800.0)]
    pub width: f64,

    /// Surface height in pixels
    #[arg(long, default_value_t = 1000.0)]
    pub height: f64,

    /// Page the session starts on
    #[arg(short, long, default_value_t = 0)]
    pub page: u32,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    pub verbose: bool,

    /// List the keyboard shortcuts and exit
    #[arg(long)]
    pub shortcuts: bool,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub width: f64,
    pub height: f64,
    pub page: u32,
    pub verbose: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 1000.0,
            page: 0,
            verbose: false,
        }
    }
}

impl From<&Cli> for AppConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            width: cli.width,
            height: cli.height,
            page: cli.page,
            verbose: cli.verbose,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> AppResult<()> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(self.width) || !valid(self.height) {
            return Err(AppError::InvalidConfig(format!(
                "Surface must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Editor sized and positioned per this configuration.
    pub fn build_editor(&self) -> AppResult<AnnotationEditor> {
        self.validate()?;
        let mut editor = AnnotationEditor::new(EditorConfig::default());
        editor.set_surface_size(Size::new(self.width, self.height));
        editor.set_page(self.page);
        Ok(editor)
    }
}

/// Replay `script` on a fresh editor.
pub fn replay(config: &AppConfig, script: &SessionScript) -> AppResult<SessionReport> {
    let mut session = Session::new(config.build_editor()?);
    let report = session.replay(script)?;
    log::info!(
        "Replayed {} steps: {} annotations created, {} remaining, {} frames",
        script.steps.len(),
        report.created.len(),
        report.annotations.len(),
        report.frames
    );
    Ok(report)
}

/// Entry point behind `main`: returns the text to print on stdout.
pub fn run(cli: &Cli) -> AppResult<String> {
    if cli.shortcuts {
        return Ok(ShortcutRegistry::format_all());
    }

    let Some(path) = &cli.script else {
        return Err(AppError::InvalidConfig(
            "No session script given (see --help)".to_string(),
        ));
    };

    let config = AppConfig::from(cli);
    let script = SessionScript::load(path)?;
    let report = replay(&config, &script)?;
    Ok(serde_json::to_string_pretty(&report)?)
}
