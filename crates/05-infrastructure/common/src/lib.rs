//! # Infrastructure Common
//!
//! 类型安全解析运行时的公共基础设施。
//!
//! ## 核心内容
//!
//! - [`errors`] - 配置、生命周期、定义错误
//! - [`TypeInfo`] - 受管类型的元数据
//! - [`LifecycleMarker`] - 生命周期回调标记
//! - [`ContainerConfig`] - 容器配置加载与验证
//! - [`init_logging`] - 基于 `tracing-subscriber` 的日志初始化

pub mod configuration;
pub mod errors;
pub mod lifecycle;
pub mod logging;
pub mod metadata;

pub use configuration::*;
pub use errors::*;
pub use lifecycle::*;
pub use logging::*;
pub use metadata::*;
