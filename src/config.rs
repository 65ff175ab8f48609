use anyhow::Result;
use clap::Parser;
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static ENV_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}").expect("valid placeholder regex"));

#[derive(Parser, Debug)]
#[command(name = "marginalia")]
#[command(about = "Import e-reader clippings into Notion, one page per book", long_about = None)]
#[command(after_help = r"Examples:
  marginalia /path/to/My\ Clippings.txt --parent-page-id YOUR_PAGE_ID
  NOTION_API_TOKEN=your_token marginalia clippings.txt --parent-page-id YOUR_PAGE_ID")]
pub struct Cli {
    /// Path to the My Clippings.txt file
    pub clippings_file: PathBuf,

    /// Notion page under which book pages are created
    #[arg(long = "parent-page-id")]
    pub parent_page_id: String,

    /// Notion API token
    #[arg(long = "api-token", env = "NOTION_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    #[arg(short = 'c', long = "config")]
    pub config_path: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long = "json-logs")]
    pub json_logs: bool,
}

pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".marginalia")
}

pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.yaml")
}

#[derive(Debug, Deserialize, Clone)]
pub struct Notion {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_max_block_chars")]
    pub max_block_chars: usize,
}

fn default_api_url() -> String {
    "https://api.notion.com/v1".to_string()
}

fn default_api_version() -> String {
    "2022-06-28".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_max_block_chars() -> usize {
    2000
}

impl Default for Notion {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_version: default_api_version(),
            token: None,
            timeout_seconds: default_timeout(),
            max_block_chars: default_max_block_chars(),
        }
    }
}

impl Notion {
    /// Picks the first non-empty token: explicit value, then the config file.
    pub fn resolve_token(&self, explicit: Option<&str>) -> Option<String> {
        explicit
            .or(self.token.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub notion: Notion,
}

impl Config {
    pub fn new(path: &str) -> Result<Self> {
        let cfg = Config::load_config(path)?;
        Ok(cfg)
    }

    /// Loads `path` when given. Without one, the default location is used if
    /// it exists and built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Config::new(&path.to_string_lossy()),
            None => {
                let default_path = default_config_path();
                if default_path.exists() {
                    Config::new(&default_path.to_string_lossy())
                } else {
                    tracing::debug!(path = ?default_path, "no config file, using defaults");
                    Ok(Config::default())
                }
            }
        }
    }

    fn load_config(path: &str) -> Result<Config> {
        let yaml_str = fs::read_to_string(path)?;
        Config::from_yaml(&yaml_str)
    }

    pub fn from_yaml(yaml_str: &str) -> Result<Config> {
        let yaml_with_env = Config::substitute_env_vars(yaml_str)?;
        let config: Config = serde_yaml::from_str(&yaml_with_env)?;
        Ok(config)
    }

    /// Replaces `${VAR}` and `${VAR:-default}` with values from the environment.
    /// An unset variable without a default becomes an empty string.
    fn substitute_env_vars(yaml_str: &str) -> Result<String> {
        let substituted = ENV_PLACEHOLDER.replace_all(yaml_str, |caps: &regex::Captures| {
            let name = &caps[1];
            match (env::var(name), caps.get(2)) {
                (Ok(value), _) => value,
                (Err(_), Some(default)) => default.as_str().to_string(),
                (Err(_), None) => {
                    tracing::warn!("environment variable '{}' not found", name);
                    String::new()
                }
            }
        });

        Ok(substituted.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_section_missing() {
        let cfg = Config::from_yaml("{}").unwrap();

        assert_eq!(cfg.notion.api_url, "https://api.notion.com/v1");
        assert_eq!(cfg.notion.api_version, "2022-06-28");
        assert_eq!(cfg.notion.max_block_chars, 2000);
        assert_eq!(cfg.notion.token, None);
    }

    #[test]
    fn test_substitute_env_vars_with_default() {
        let yaml = "notion:\n  token: ${MARGINALIA_TEST_UNSET_VAR:-fallback}\n  timeout_seconds: 5\n";
        let cfg = Config::from_yaml(yaml).unwrap();

        assert_eq!(cfg.notion.token.as_deref(), Some("fallback"));
        assert_eq!(cfg.notion.timeout_seconds, 5);
    }

    #[test]
    fn test_substitute_env_vars_from_environment() {
        let substituted = Config::substitute_env_vars("home: ${PATH}").unwrap();
        assert_eq!(substituted, format!("home: {}", env::var("PATH").unwrap_or_default()));
    }

    #[test]
    fn test_substitute_env_vars_unset_without_default() {
        let substituted =
            Config::substitute_env_vars("a: ${MARGINALIA_TEST_UNSET_VAR}\nb: ${MARGINALIA_TEST_UNSET_VAR:-}\nc: $HOME").unwrap();
        assert_eq!(substituted, "a: \nb: \nc: $HOME");
    }

    #[test]
    fn test_resolve_token_prefers_explicit() {
        let notion = Notion {
            token: Some("from-config".to_string()),
            ..Default::default()
        };

        assert_eq!(notion.resolve_token(Some("from-flag")).as_deref(), Some("from-flag"));
        assert_eq!(notion.resolve_token(None).as_deref(), Some("from-config"));
        assert_eq!(Notion::default().resolve_token(Some("  ")), None);
    }

    #[test]
    fn test_cli_parses_arguments() {
        let cli = Cli::parse_from([
            "marginalia",
            "My Clippings.txt",
            "--parent-page-id",
            "abc-123",
            "--api-token",
            "secret",
        ]);

        assert_eq!(cli.clippings_file, PathBuf::from("My Clippings.txt"));
        assert_eq!(cli.parent_page_id, "abc-123");
        assert_eq!(cli.api_token.as_deref(), Some("secret"));
        assert!(!cli.json_logs);
    }
}
