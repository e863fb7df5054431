//! # Dependency Injection Abstractions
//!
//! 类型安全解析与生命周期回调的抽象层。
//!
//! ## 核心接口
//!
//! - [`TypeDescriptor`] - 类型描述与可赋值性规则
//! - [`Qualifier`] / [`QualifierComparator`] - 限定符及其比较工具
//! - [`Bean`] / [`DisposalMethod`] - 参与解析的候选项
//! - [`Resolvable`] - 解析查询，同时是结果缓存的键
//! - [`ResolutionStrategy`] / [`ResolvableTransformer`] - 种类相关的匹配策略与查询转换
//! - [`LifecycleCallbackInvoker`] / [`Instantiator`] / [`InterceptionProxy`] - 生命周期回调

pub mod candidate;
pub mod lifecycle;
pub mod qualifier;
pub mod resolvable;
pub mod resolver;
pub mod types;

pub use candidate::*;
pub use lifecycle::*;
pub use qualifier::*;
pub use resolvable::*;
pub use resolver::*;
pub use types::*;
