//! 运行配置
//!
//! 加载顺序：`.env`（可选）-> `config/trivia.toml`（可选）-> `TRIVIA__*` 环境变量，
//! 后者覆盖前者。非法值回退默认并告警；只有 `bind_addr` 无法解析时报错。

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use config::builder::DefaultState;
use config::ConfigBuilder;
use serde_json::Value;
use tracing::warn;

use crate::store::database::DEFAULT_POOL_MAX_SIZE;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_DATABASE_PATH: &str = "trivia.db";

const CONFIG_FILE_STEM: &str = "config/trivia";
const CONFIG_FILE_PATH: &str = "config/trivia.toml";
const ENV_PREFIX: &str = "TRIVIA";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_path: PathBuf,
    /// 分类表为空时写入默认题库
    pub seed_on_empty: bool,
    pub pool_max_size: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            seed_on_empty: true,
            pool_max_size: DEFAULT_POOL_MAX_SIZE,
        }
    }
}

impl AppConfig {
    pub fn from_env_and_file() -> Result<Self> {
        dotenvy::dotenv().ok();
        let mut builder = config::Config::builder();
        if Path::new(CONFIG_FILE_PATH).exists() {
            builder = builder.add_source(config::File::with_name(CONFIG_FILE_STEM));
        }
        builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"));
        Self::from_builder(builder)
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let loaded = builder.build().context("failed to load trivia configuration")?;
        let value = loaded
            .try_deserialize::<Value>()
            .context("failed to read trivia configuration")?;
        Self::from_value(&value)
    }

    /// 从已合并的键值表构建；未知键忽略
    pub fn from_value(value: &Value) -> Result<Self> {
        let mut cfg = Self::default();

        if let Some(raw) = non_null(value.get("bind_addr")) {
            let text = scalar_text(raw);
            cfg.bind_addr = text
                .trim()
                .parse()
                .map_err(|_| anyhow!("invalid bind_addr: {}", text))?;
        }

        if let Some(raw) = non_null(value.get("database_path")) {
            match raw.as_str().map(str::trim).filter(|s| !s.is_empty()) {
                Some(path) => cfg.database_path = PathBuf::from(path),
                None => warn!(
                    "[Config] Invalid database_path {}, using default {}",
                    raw, DEFAULT_DATABASE_PATH
                ),
            }
        }

        if let Some(raw) = non_null(value.get("seed_on_empty")) {
            match parse_bool(raw) {
                Some(flag) => cfg.seed_on_empty = flag,
                None => warn!("[Config] Invalid seed_on_empty {}, using default true", raw),
            }
        }

        if let Some(raw) = non_null(value.get("pool_max_size")) {
            match parse_u32(raw).filter(|size| *size > 0) {
                Some(size) => cfg.pool_max_size = size,
                None => warn!(
                    "[Config] Invalid pool_max_size {}, using default {}",
                    raw, DEFAULT_POOL_MAX_SIZE
                ),
            }
        }

        Ok(cfg)
    }
}

fn non_null(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn parse_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_u64().and_then(|n| match n {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        }),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn parse_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
