//! Command-line arguments and their mapping onto the scan configuration.

use anyhow::{Context, Result};
use apexscan_core::ScanConfig;
use clap::Parser;
use std::path::PathBuf;

const ENV_HELP: &str = "\
Environment variables:
  TARGET_URL: Frontend URL (default: https://apexshare.be)
  API_URL: API URL (default: https://api.apexshare.be)
  REPORT_OUTPUT_DIR: Report directory (default: ./security-reports)
  ZAP_API_URL: ZAP control API (default: http://localhost:8080)
  ZAP_API_KEY: ZAP API key, if required
  APEXSCAN_CONFIG: Configuration file
  RUST_LOG: Log filter (default: info,apexscan=debug)";

/// ApexShare Security Scanner
#[derive(Parser, Debug)]
#[command(name = "apexscan")]
#[command(author, version, about = "ApexShare Security Scanner", long_about = None)]
#[command(after_help = ENV_HELP)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "APEXSCAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Frontend URL
    #[arg(long, env = "TARGET_URL")]
    pub target_url: Option<String>,

    /// API URL
    #[arg(long, env = "API_URL")]
    pub api_url: Option<String>,

    /// Report directory
    #[arg(short, long, env = "REPORT_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// ZAP control API base URL
    #[arg(long, env = "ZAP_API_URL")]
    pub zap_api_url: Option<String>,

    /// ZAP API key
    #[arg(long, env = "ZAP_API_KEY", hide_env_values = true)]
    pub zap_api_key: Option<String>,

    /// Give up on a spider scan after this many seconds
    #[arg(long)]
    pub spider_timeout: Option<u64>,

    /// Give up on an active scan after this many seconds
    #[arg(long)]
    pub active_scan_timeout: Option<u64>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Cli {
    /// Load the configuration file (if any) and apply the command-line and
    /// environment overrides on top of it.
    pub fn load_config(&self) -> Result<ScanConfig> {
        let mut config = ScanConfig::load(self.config.as_deref()).with_context(|| {
            match &self.config {
                Some(path) => format!("failed to load configuration from {}", path.display()),
                None => "failed to load configuration".to_string(),
            }
        })?;

        self.apply(&mut config);
        config.validate().context("invalid configuration")?;
        Ok(config)
    }

    /// Overwrite configuration values that were given explicitly.
    pub fn apply(&self, config: &mut ScanConfig) {
        if let Some(url) = &self.target_url {
            config.target.target_url.clone_from(url);
        }
        if let Some(url) = &self.api_url {
            config.target.api_url.clone_from(url);
        }
        if let Some(dir) = &self.output_dir {
            config.report.output_dir.clone_from(dir);
        }
        if let Some(url) = &self.zap_api_url {
            config.engine.api_url.clone_from(url);
        }
        if let Some(key) = &self.zap_api_key {
            config.engine.api_key = Some(key.clone());
        }
        if let Some(secs) = self.spider_timeout {
            config.spider.timeout_secs = Some(secs);
        }
        if let Some(secs) = self.active_scan_timeout {
            config.active_scan.timeout_secs = Some(secs);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_overrides_replace_defaults() {
        let cli = Cli::parse_from([
            "apexscan",
            "--target-url",
            "http://localhost:3000",
            "--api-url",
            "http://localhost:4000",
            "--output-dir",
            "/tmp/reports",
            "--zap-api-key",
            "secret",
            "--spider-timeout",
            "600",
        ]);

        let mut config = ScanConfig::default();
        cli.apply(&mut config);

        assert_eq!(config.target.target_url, "http://localhost:3000");
        assert_eq!(config.target.api_url, "http://localhost:4000");
        assert_eq!(config.report.output_dir, PathBuf::from("/tmp/reports"));
        assert_eq!(config.engine.api_key.as_deref(), Some("secret"));
        assert_eq!(config.spider.timeout_secs, Some(600));
        assert_eq!(config.active_scan.timeout_secs, None);
    }

    #[test]
    fn test_override_replaces_invalid_file_value() {
        let tmp = tempfile::TempDir::new().expect("create temp dir");
        let path = tmp.path().join("apexscan.toml");
        std::fs::write(
            &path,
            r#"
[target]
target_url = "apexshare.be"
"#,
        )
        .expect("write config");

        let path = path.to_str().expect("utf-8 temp path");

        let cli = Cli::parse_from([
            "apexscan",
            "--config",
            path,
            "--target-url",
            "http://localhost:3000",
        ]);
        let config = cli.load_config().expect("override makes the config valid");
        assert_eq!(config.target.target_url, "http://localhost:3000");

        let cli = Cli::parse_from(["apexscan", "--config", path]);
        assert!(cli.load_config().is_err());
    }

    #[test]
    fn test_help_lists_environment_variables() {
        let help = Cli::command().render_long_help().to_string();
        for var in ["TARGET_URL", "API_URL", "REPORT_OUTPUT_DIR", "ZAP_API_URL"] {
            assert!(help.contains(var), "help is missing {var}");
        }
    }
}
