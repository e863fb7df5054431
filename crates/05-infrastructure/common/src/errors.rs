//! 错误类型定义

use crate::lifecycle::LifecycleMarker;
use thiserror::Error;

/// 用户回调返回的装箱错误
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置解析失败: {source}")]
    ParseError {
        #[from]
        source: config::ConfigError,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

/// 生命周期回调错误类型
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// 生命周期方法本身执行失败
    #[error("生命周期方法调用失败: {method}, 实例: {instance}, 原因: {source}")]
    InvocationFailed {
        method: String,
        instance: String,
        #[source]
        source: BoxError,
    },

    /// 实例化器声明支持拦截，但调用器没有可用的拦截代理
    #[error("类型 {type_name} 声明支持拦截，但未配置拦截代理")]
    InterceptionUnavailable { type_name: String },

    /// 拦截代理执行回调失败
    #[error("拦截代理执行 {marker} 失败: {type_name}, 原因: {source}")]
    InterceptionFailed {
        type_name: String,
        marker: LifecycleMarker,
        #[source]
        source: BoxError,
    },
}

/// Bean 定义错误
///
/// 由容器在检查解析结果时产生，解析器本身从不返回这些错误。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("生产者 {producer} 匹配到多个销毁方法: {disposers:?}")]
    MultipleDisposalMethods {
        producer: String,
        disposers: Vec<String>,
    },

    #[error("销毁方法 {disposer} 没有匹配的生产者")]
    UnresolvedDisposalMethod { disposer: String },

    #[error("销毁方法 {disposer} 声明在未注册的 Bean 上: {declaring_bean}")]
    UnknownDeclaringBean {
        disposer: String,
        declaring_bean: String,
    },
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("生命周期错误: {source}")]
    LifecycleError {
        #[from]
        source: LifecycleError,
    },

    #[error("定义错误: {source}")]
    DefinitionError {
        #[from]
        source: DefinitionError,
    },

    #[error("基础设施启动失败: {message}")]
    BootstrapFailed { message: String },
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type LifecycleResult<T> = Result<T, LifecycleError>;
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;
