use std::path::PathBuf;

use clap::Parser;

const HELP_EPILOG: &str = r#"Config resolution order:
  1) --config/-c PATH
  2) $TOASTHUB_CONFIG
  3) XDG default: ~/.config/toasthub/toasthub.yaml
"#;

#[derive(Debug, Parser)]
#[command(
    name = "toasthub-cli",
    version,
    about = "Demo driver that feeds toasts into the manager and logs its state",
    long_about = None,
    after_long_help = HELP_EPILOG,
)]
pub struct Cli {
    /// Path to YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Milliseconds between demo toasts
    #[arg(long, default_value_t = 1500)]
    pub feed_interval_ms: u64,
    /// Lifetime of each demo toast in milliseconds
    #[arg(long, default_value_t = 4000)]
    pub toast_duration_ms: u64,
}
