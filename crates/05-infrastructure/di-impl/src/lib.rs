//! # 依赖注入具体实现
//!
//! 提供类型安全解析器、Bean 与销毁方法的匹配策略、查询转换器和生命周期回调调用器。
//!
//! ## 组成
//!
//! - [`TypeSafeResolver`] - 带并发缓存的通用解析引擎
//! - [`BeanResolutionStrategy`] / [`DisposerResolutionStrategy`] - 两种候选项的匹配规则
//! - [`TypeAliasTransformer`] / [`RawTypeTransformer`] - 查询转换器
//! - [`NonBindingQualifierComparator`] - 默认限定符比较器
//! - [`DefaultLifecycleCallbackInvoker`] - 生命周期回调调用器
//! - [`BeanManager`] - 组合以上组件并检查 Bean 定义

pub mod bean_resolver;
pub mod disposer_resolver;
pub mod lifecycle_invoker;
pub mod manager;
pub mod qualifiers;
pub mod transformers;
pub mod typesafe_resolver;

pub use bean_resolver::*;
pub use disposer_resolver::*;
pub use lifecycle_invoker::*;
pub use manager::*;
pub use qualifiers::*;
pub use transformers::*;
pub use typesafe_resolver::*;
