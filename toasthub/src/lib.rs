//! Process-local toast notifications: a capacity-bounded, ordered set of
//! short-lived status messages with timed expiry and an animated
//! remaining-lifetime indicator.
//!
//! The manager owns all timing side effects; a presentation layer polls
//! [`ToastManager::snapshot`] and renders whatever it finds there.

pub mod config;
pub mod domain;
pub mod manager;

pub use config::{ManagerConfig, load_config, resolve_config_path, save_config};
pub use domain::{Lifetime, Severity, Toast, ToastId, ToastOptions};
pub use manager::ToastManager;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
