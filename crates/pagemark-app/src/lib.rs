//! Pagemark Application
//!
//! Command-line host that replays scripted editing sessions against the
//! annotation editor.

pub mod app;
pub mod session;
pub mod shortcuts;

pub use app::{AppConfig, AppError, AppResult, Cli, replay, run};
pub use session::{Session, SessionReport, SessionScript, Step};
pub use shortcuts::{Shortcut, ShortcutRegistry};
