//! 组件生命周期标记

use serde::{Deserialize, Serialize};
use std::fmt;

/// 生命周期回调标记
///
/// 元数据提取层把注解解析为这组固定的标记，运行时只消费标记，不再检查注解本身。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LifecycleMarker {
    /// 实例创建并完成注入之后调用
    PostConstruct,
    /// 实例销毁之前调用
    PreDestroy,
}

impl LifecycleMarker {
    /// 标记名称
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PostConstruct => "post-construct",
            Self::PreDestroy => "pre-destroy",
        }
    }
}

impl fmt::Display for LifecycleMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
