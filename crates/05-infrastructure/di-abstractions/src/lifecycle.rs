//! 生命周期回调抽象
//!
//! 元数据提取层把类型上的方法整理成 [`AnnotatedType`]，
//! 运行时只按 [`LifecycleMarker`] 挑选方法，从不检查注解本身。

use infrastructure_common::{BoxError, LifecycleMarker, LifecycleResult, TypeInfo};
use std::fmt;
use std::sync::Arc;

/// 无参回调，对应一个生命周期方法
pub type LifecycleCallback<T> = Arc<dyn Fn(&T) -> Result<(), BoxError> + Send + Sync>;

/// 带标记的方法描述
pub struct AnnotatedMethod<T> {
    name: Arc<str>,
    markers: Vec<LifecycleMarker>,
    callback: LifecycleCallback<T>,
}

impl<T> AnnotatedMethod<T> {
    pub fn new<F>(name: impl Into<Arc<str>>, callback: F) -> Self
    where
        F: Fn(&T) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            markers: Vec::new(),
            callback: Arc::new(callback),
        }
    }

    pub fn with_marker(mut self, marker: LifecycleMarker) -> Self {
        if !self.markers.contains(&marker) {
            self.markers.push(marker);
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_marked(&self, marker: LifecycleMarker) -> bool {
        self.markers.contains(&marker)
    }

    /// 生成可直接调用的副本
    pub fn accessible_copy(&self) -> LifecycleMethod<T> {
        LifecycleMethod {
            name: Arc::clone(&self.name),
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<T> fmt::Debug for AnnotatedMethod<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotatedMethod")
            .field("name", &self.name)
            .field("markers", &self.markers)
            .field("callback", &"<function>")
            .finish()
    }
}

/// 受管类型的元数据，方法按声明顺序排列
pub struct AnnotatedType<T> {
    type_info: TypeInfo,
    methods: Vec<AnnotatedMethod<T>>,
}

impl<T: 'static> AnnotatedType<T> {
    pub fn new() -> Self {
        Self {
            type_info: TypeInfo::of::<T>(),
            methods: Vec::new(),
        }
    }
}

impl<T: 'static> Default for AnnotatedType<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> AnnotatedType<T> {
    pub fn with_method(mut self, method: AnnotatedMethod<T>) -> Self {
        self.methods.push(method);
        self
    }

    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    pub fn methods(&self) -> &[AnnotatedMethod<T>] {
        &self.methods
    }

    /// 带指定标记的方法，保持声明顺序
    pub fn methods_marked(&self, marker: LifecycleMarker) -> impl Iterator<Item = &AnnotatedMethod<T>> {
        self.methods.iter().filter(move |m| m.is_marked(marker))
    }
}

impl<T> fmt::Debug for AnnotatedType<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotatedType")
            .field("type_info", &self.type_info)
            .field("methods", &self.methods)
            .finish()
    }
}

/// 可调用的生命周期方法
pub struct LifecycleMethod<T> {
    name: Arc<str>,
    callback: LifecycleCallback<T>,
}

impl<T> LifecycleMethod<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn invoke(&self, instance: &T) -> Result<(), BoxError> {
        (self.callback)(instance)
    }
}

impl<T> Clone for LifecycleMethod<T> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<T> fmt::Debug for LifecycleMethod<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleMethod").field("name", &self.name).finish()
    }
}

/// 实例化器能力：只回答该类型是否启用了拦截
pub trait Instantiator<T>: Send + Sync {
    fn has_interceptor_support(&self) -> bool;
}

/// 拦截代理的回调入口，拦截器的执行顺序由代理链决定
pub trait InterceptionProxy<T>: Send + Sync {
    fn execute_post_construct(&self, instance: &T) -> Result<(), BoxError>;

    fn execute_pre_destroy(&self, instance: &T) -> Result<(), BoxError>;
}

/// 生命周期回调调用器
pub trait LifecycleCallbackInvoker<T>: Send + Sync {
    /// 调用 post-construct 回调；`instantiator` 为 `None` 等同于不支持拦截
    fn post_construct(&self, instance: &T, instantiator: Option<&dyn Instantiator<T>>) -> LifecycleResult<()>;

    /// 调用 pre-destroy 回调
    fn pre_destroy(&self, instance: &T, instantiator: Option<&dyn Instantiator<T>>) -> LifecycleResult<()>;

    fn has_post_construct_methods(&self) -> bool;

    fn has_pre_destroy_methods(&self) -> bool;

    fn has_post_construct_callback(&self) -> bool {
        self.has_post_construct_methods()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Service;

    #[test]
    fn test_methods_marked_keeps_declaration_order() {
        let annotated = AnnotatedType::<Service>::new()
            .with_method(AnnotatedMethod::new("a", |_| Ok(())).with_marker(LifecycleMarker::PostConstruct))
            .with_method(AnnotatedMethod::new("helper", |_| Ok(())))
            .with_method(
                AnnotatedMethod::new("b", |_| Ok(()))
                    .with_marker(LifecycleMarker::PostConstruct)
                    .with_marker(LifecycleMarker::PreDestroy),
            );

        let post_construct: Vec<_> = annotated
            .methods_marked(LifecycleMarker::PostConstruct)
            .map(AnnotatedMethod::name)
            .collect();
        assert_eq!(post_construct, vec!["a", "b"]);

        let pre_destroy: Vec<_> = annotated
            .methods_marked(LifecycleMarker::PreDestroy)
            .map(AnnotatedMethod::name)
            .collect();
        assert_eq!(pre_destroy, vec!["b"]);
        assert_eq!(annotated.type_info().name, "Service");
    }

    #[test]
    fn test_accessible_copy_invokes_callback() {
        let method = AnnotatedMethod::<Service>::new("fail", |_| Err("boom".into()));
        let copy = method.accessible_copy();
        assert_eq!(copy.name(), "fail");
        assert!(copy.invoke(&Service).is_err());
    }
}
