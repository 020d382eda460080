use std::time::Duration;

use clap::Parser;
use labelcheck_core::domain::common::{LLMConfig, LabelCheckConfig};

#[derive(Debug, Clone, Parser)]
#[command(name = "labelcheck-api", version, about = "Food label allergen scanning API")]
pub struct Args {
    #[command(flatten)]
    pub server: ServerArgs,

    #[command(flatten)]
    pub llm: LLMArgs,

    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(Debug, Clone, clap::Args)]
pub struct ServerArgs {
    #[arg(long = "server-host", env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long = "server-port", env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Prefix for every route, e.g. `/labelcheck`.
    #[arg(long = "server-root-path", env = "SERVER_ROOT_PATH", default_value = "")]
    pub root_path: String,

    #[arg(
        long = "allowed-origins",
        env = "ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:5173"
    )]
    pub allowed_origins: Vec<String>,

    #[arg(long = "disable-metrics", env = "DISABLE_METRICS")]
    pub disable_metrics: bool,
}

#[derive(Debug, Clone, clap::Args)]
pub struct LLMArgs {
    #[arg(long = "llm-api-key", env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: String,

    #[arg(long = "llm-model", env = "OPENAI_MODEL", default_value = LLMConfig::DEFAULT_MODEL)]
    pub model: String,

    #[arg(long = "llm-base-url", env = "OPENAI_BASE_URL", default_value = LLMConfig::DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long = "llm-timeout-secs", env = "LLM_TIMEOUT_SECS", default_value_t = 60)]
    pub timeout_secs: u64,

    #[arg(long = "llm-max-tokens", env = "LLM_MAX_TOKENS", default_value_t = LLMConfig::DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,
}

#[derive(Debug, Clone, clap::Args)]
pub struct LogArgs {
    /// Used when `RUST_LOG` is not set.
    #[arg(long = "log-filter", env = "LOG_FILTER", default_value = "info")]
    pub filter: String,

    #[arg(long = "log-json", env = "LOG_JSON")]
    pub json: bool,
}

impl From<Args> for LabelCheckConfig {
    fn from(args: Args) -> Self {
        LabelCheckConfig {
            llm: LLMConfig {
                api_key: args.llm.api_key,
                model: args.llm.model,
                base_url: args.llm.base_url,
                max_tokens: args.llm.max_tokens,
                timeout: Duration::from_secs(args.llm.timeout_secs),
            },
        }
    }
}
