//! Masonry Feed - Entry Point

use clap::{Parser, ValueEnum};
use masonry_feed::config::{self, CliOverrides};
use masonry_feed::headless::{self, HeadlessOptions};
use masonry_feed::model::AppError;
use masonry_feed::state::TriggerKind;
use std::path::PathBuf;
use tracing::info;

/// Near-bottom detection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TriggerArg {
    /// Distance-to-bottom threshold on scroll events
    Threshold,
    /// Visibility of a sentinel at the end of the grid
    Sentinel,
}

impl From<TriggerArg> for TriggerKind {
    fn from(arg: TriggerArg) -> Self {
        match arg {
            TriggerArg::Threshold => TriggerKind::Threshold,
            TriggerArg::Sentinel => TriggerKind::Sentinel,
        }
    }
}

/// Masonry Feed - infinite-scroll gallery in the terminal
#[derive(Parser, Debug)]
#[command(name = "masonry-feed")]
#[command(version)]
#[command(about = "Infinite-scroll masonry gallery with per-tab sessions")]
pub struct Args {
    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Items per batch
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: Option<u32>,

    /// Stop loading once a tab holds this many items
    #[arg(long)]
    pub max_items: Option<usize>,

    /// Near-bottom detection strategy
    #[arg(long, value_enum)]
    pub trigger: Option<TriggerArg>,

    /// Feed tab name (repeat for several tabs)
    #[arg(long = "tab")]
    pub tabs: Vec<String>,

    /// Run a scripted scroll-to-bottom over every tab and print a JSON report
    #[arg(long)]
    pub headless: bool,

    /// Headless viewport width in pixels
    #[arg(long, default_value = "1280", requires = "headless")]
    pub viewport_width: u32,

    /// Headless viewport height in pixels
    #[arg(long, default_value = "800", requires = "headless")]
    pub viewport_height: u32,
}

impl Args {
    fn cli_overrides(&self) -> CliOverrides {
        CliOverrides {
            page_size: self.page_size.map(|n| n as usize),
            max_items: self.max_items,
            trigger: self.trigger.map(TriggerKind::from),
            tabs: (!self.tabs.is_empty()).then(|| self.tabs.clone()),
        }
    }
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Load configuration with full precedence chain:
    // Defaults → Config File → Env Vars → CLI Args
    let config_file = config::load_config_with_precedence(args.config.clone())?;
    let merged = config::merge_config(config_file);

    // The log path is settled once the file is merged; start logging before the
    // env layer so its warnings are recorded
    masonry_feed::logging::init(&merged.log_file_path)?;

    let with_env = config::apply_env_overrides(merged);
    let config = config::apply_cli_overrides(with_env, args.cli_overrides());
    config::validate(&config)?;

    info!(
        config = ?config,
        "Configuration loaded and resolved"
    );

    if args.headless {
        let options = HeadlessOptions {
            viewport_width: args.viewport_width,
            viewport_height: args.viewport_height,
            ..HeadlessOptions::default()
        };
        let report = headless::simulate(&config, &options)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    masonry_feed::view::run_with_config(&config)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_help_does_not_error() {
        let result = Args::try_parse_from(["masonry-feed", "--help"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_does_not_error() {
        let result = Args::try_parse_from(["masonry-feed", "--version"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_no_args_defaults() {
        let args = Args::parse_from(["masonry-feed"]);
        assert_eq!(args.config, None);
        assert_eq!(args.page_size, None);
        assert_eq!(args.max_items, None);
        assert_eq!(args.trigger, None);
        assert!(args.tabs.is_empty());
        assert!(!args.headless);
        assert_eq!(args.cli_overrides(), CliOverrides::default());
    }

    #[test]
    fn test_page_size_rejects_zero() {
        let err = Args::try_parse_from(["masonry-feed", "--page-size", "0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_trigger_values() {
        let args = Args::parse_from(["masonry-feed", "--trigger", "sentinel"]);
        assert_eq!(args.trigger, Some(TriggerArg::Sentinel));
        assert!(Args::try_parse_from(["masonry-feed", "--trigger", "observer"]).is_err());
    }

    #[test]
    fn test_tab_is_repeatable() {
        let args = Args::parse_from(["masonry-feed", "--tab", "photos", "--tab", "videos"]);
        assert_eq!(args.tabs, vec!["photos", "videos"]);
    }

    #[test]
    fn test_viewport_requires_headless() {
        assert!(Args::try_parse_from(["masonry-feed", "--viewport-width", "900"]).is_err());
        let args = Args::parse_from(["masonry-feed", "--headless", "--viewport-width", "900"]);
        assert_eq!(args.viewport_width, 900);
    }

    #[test]
    fn test_cli_overrides_flow_through_precedence_chain() {
        use masonry_feed::config::{apply_cli_overrides, merge_config, ConfigFile};

        let config_file = ConfigFile {
            page_size: Some(9),
            max_items: Some(30),
            ..ConfigFile::default()
        };
        let merged = merge_config(Some(config_file));
        assert_eq!(merged.page_size, 9, "Config file should override default");

        let args = Args::parse_from([
            "masonry-feed",
            "--page-size",
            "3",
            "--trigger",
            "sentinel",
        ]);
        let resolved = apply_cli_overrides(merged, args.cli_overrides());

        assert_eq!(resolved.page_size, 3, "CLI should override config file");
        assert_eq!(resolved.max_items, 30, "Unset CLI flags keep lower layers");
        assert_eq!(resolved.trigger, TriggerKind::Sentinel);
    }
}
