//! 日志系统初始化

use crate::configuration::LoggingConfig;
use crate::errors::{InfrastructureError, InfrastructureResult};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化全局日志订阅者
///
/// 全局订阅者只能设置一次，重复调用返回 [`InfrastructureError::BootstrapFailed`]。
pub fn init_logging(config: &LoggingConfig) -> InfrastructureResult<()> {
    let filter = EnvFilter::try_new(&config.level).map_err(|e| InfrastructureError::BootstrapFailed {
        message: format!("日志过滤指令无效: {}", e),
    })?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.show_target)
        .with_thread_ids(config.show_thread_ids);

    let installed = if config.json_format {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    };
    installed.map_err(|e| InfrastructureError::BootstrapFailed {
        message: format!("日志初始化失败: {}", e),
    })?;

    info!("日志系统初始化完成");
    Ok(())
}
