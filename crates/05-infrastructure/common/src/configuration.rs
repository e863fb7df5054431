//! 容器配置
//!
//! 配置按 默认值 → TOML 文件 → 环境变量 的顺序叠加，环境变量形如
//! `CONTAINER__LOGGING__LEVEL=debug`。

use crate::errors::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// 环境变量前缀
pub const ENV_PREFIX: &str = "CONTAINER";

/// 容器配置根节点
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// 类型安全解析配置
    pub resolution: ResolutionConfig,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// 类型安全解析配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    /// 是否剔除被特化（specialize）覆盖的 Bean
    pub specialization: bool,
    /// 参数化类型查询时是否同时按原始类型查询
    pub raw_type_fallback: bool,
    /// 类型别名，例如基本类型与其包装类型
    pub type_aliases: BTreeMap<String, String>,
    /// 类型层次结构：类型名 → 直接超类型名
    pub supertypes: BTreeMap<String, Vec<String>>,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            specialization: true,
            raw_type_fallback: false,
            type_aliases: BTreeMap::new(),
            supertypes: BTreeMap::new(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 过滤指令，格式同 `RUST_LOG`
    pub level: String,
    /// 是否输出 JSON 格式
    pub json_format: bool,
    /// 是否显示 target
    pub show_target: bool,
    /// 是否显示线程 ID
    pub show_thread_ids: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            show_target: true,
            show_thread_ids: false,
        }
    }
}

impl ContainerConfig {
    /// 加载配置
    ///
    /// `path` 为 `None` 时只使用默认值和环境变量；指定的文件不存在时返回
    /// [`ConfigError::FileNotFound`]。
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                });
            }
            debug!("加载容器配置文件: {}", path.display());
            builder = builder.add_source(config::File::from(path).format(config::FileFormat::Toml));
        }

        let loaded: Self = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        EnvFilter::try_new(&self.logging.level).map_err(|e| ConfigError::ValidationError {
            message: format!("无效的日志过滤指令 '{}': {}", self.logging.level, e),
        })?;

        for (from, to) in &self.resolution.type_aliases {
            if from.trim().is_empty() || to.trim().is_empty() {
                return Err(ConfigError::ValidationError {
                    message: format!("类型别名不能为空: '{from}' -> '{to}'"),
                });
            }
        }

        for (subtype, supertypes) in &self.resolution.supertypes {
            if subtype.trim().is_empty() || supertypes.iter().any(|s| s.trim().is_empty()) {
                return Err(ConfigError::ValidationError {
                    message: format!("类型层次结构不能包含空类型名: '{subtype}' -> {supertypes:?}"),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = ContainerConfig::default();
        assert!(config.resolution.specialization);
        assert!(!config.resolution.raw_type_fallback);
        assert!(config.resolution.type_aliases.is_empty());
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[resolution]
specialization = false
raw_type_fallback = true

[resolution.type_aliases]
int = "Integer"

[resolution.supertypes]
int = ["Number", "Comparable"]

[logging]
level = "debug"
json_format = true
"#
        )
        .unwrap();

        let config = ContainerConfig::load(Some(file.path())).unwrap();
        assert!(!config.resolution.specialization);
        assert!(config.resolution.raw_type_fallback);
        assert_eq!(
            config.resolution.type_aliases.get("int").map(String::as_str),
            Some("Integer")
        );
        assert_eq!(
            config.resolution.supertypes.get("int"),
            Some(&vec!["Number".to_string(), "Comparable".to_string()])
        );
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json_format);
        // 文件里没写的字段保留默认值
        assert!(config.logging.show_target);
    }

    #[test]
    fn test_missing_file() {
        let result = ContainerConfig::load(Some(Path::new("/nonexistent/container.toml")));
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = ContainerConfig::default();
        config.logging.level = "my_crate=verbose".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_blank_alias_rejected() {
        let mut config = ContainerConfig::default();
        config
            .resolution
            .type_aliases
            .insert("int".to_string(), " ".to_string());
        assert!(config.validate().is_err());

        let mut config = ContainerConfig::default();
        config
            .resolution
            .supertypes
            .insert("Integer".to_string(), vec![String::new()]);
        assert!(config.validate().is_err());
    }
}
