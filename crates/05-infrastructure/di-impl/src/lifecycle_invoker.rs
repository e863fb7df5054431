//! 默认生命周期回调调用器

use di_abstractions::{
    AnnotatedType, Instantiator, InterceptionProxy, LifecycleCallbackInvoker, LifecycleMethod,
};
use infrastructure_common::{LifecycleError, LifecycleMarker, LifecycleResult, TypeInfo};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error};

/// 默认生命周期回调调用器
///
/// 每个受管类型构建一次，之后只读，可在多个线程间共享。
pub struct DefaultLifecycleCallbackInvoker<T> {
    type_info: TypeInfo,
    post_construct: Vec<LifecycleMethod<T>>,
    pre_destroy: Vec<LifecycleMethod<T>>,
    interception: Option<Arc<dyn InterceptionProxy<T>>>,
}

impl<T> DefaultLifecycleCallbackInvoker<T>
where
    T: fmt::Debug + Send + Sync + 'static,
{
    /// 从类型元数据收集生命周期方法，保持声明顺序
    pub fn of(annotated_type: &AnnotatedType<T>) -> Self {
        let collect = |marker| -> Vec<LifecycleMethod<T>> {
            annotated_type
                .methods_marked(marker)
                .map(|method| method.accessible_copy())
                .collect()
        };

        let invoker = Self {
            type_info: annotated_type.type_info().clone(),
            post_construct: collect(LifecycleMarker::PostConstruct),
            pre_destroy: collect(LifecycleMarker::PreDestroy),
            interception: None,
        };
        debug!(
            "创建生命周期调用器: {}, post-construct: {}, pre-destroy: {}",
            invoker.type_info.name,
            invoker.post_construct.len(),
            invoker.pre_destroy.len()
        );
        invoker
    }

    /// 配置拦截代理，实例化器声明支持拦截时使用
    pub fn with_interception(mut self, proxy: Arc<dyn InterceptionProxy<T>>) -> Self {
        self.interception = Some(proxy);
        self
    }

    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    pub fn post_construct_methods(&self) -> &[LifecycleMethod<T>] {
        &self.post_construct
    }

    pub fn pre_destroy_methods(&self) -> &[LifecycleMethod<T>] {
        &self.pre_destroy
    }

    fn dispatch(
        &self,
        marker: LifecycleMarker,
        instance: &T,
        instantiator: Option<&dyn Instantiator<T>>,
    ) -> LifecycleResult<()> {
        let intercepted = instantiator.map_or(false, |i| i.has_interceptor_support());
        if intercepted {
            return self.delegate(marker, instance);
        }

        let methods = match marker {
            LifecycleMarker::PostConstruct => &self.post_construct,
            LifecycleMarker::PreDestroy => &self.pre_destroy,
        };
        self.invoke_methods(marker, methods, instance)
    }

    fn delegate(&self, marker: LifecycleMarker, instance: &T) -> LifecycleResult<()> {
        let proxy = self
            .interception
            .as_ref()
            .ok_or_else(|| LifecycleError::InterceptionUnavailable {
                type_name: self.type_info.name.clone(),
            })?;

        debug!("{} 回调交给拦截代理: {}", marker, self.type_info.name);
        let outcome = match marker {
            LifecycleMarker::PostConstruct => proxy.execute_post_construct(instance),
            LifecycleMarker::PreDestroy => proxy.execute_pre_destroy(instance),
        };

        outcome.map_err(|source| {
            error!("拦截代理执行 {} 失败: {}, 原因: {}", marker, self.type_info.name, source);
            LifecycleError::InterceptionFailed {
                type_name: self.type_info.name.clone(),
                marker,
                source,
            }
        })
    }

    // 第一个失败的方法终止调用，后续方法不再执行
    fn invoke_methods(
        &self,
        marker: LifecycleMarker,
        methods: &[LifecycleMethod<T>],
        instance: &T,
    ) -> LifecycleResult<()> {
        for method in methods {
            debug!("调用 {} 方法: {}::{}", marker, self.type_info.name, method.name());
            method.invoke(instance).map_err(|source| {
                let method = format!("{}::{}", self.type_info.name, method.name());
                error!("生命周期方法 {} 调用失败: {}", method, source);
                LifecycleError::InvocationFailed {
                    method,
                    instance: format!("{instance:?}"),
                    source,
                }
            })?;
        }
        Ok(())
    }
}

impl<T> LifecycleCallbackInvoker<T> for DefaultLifecycleCallbackInvoker<T>
where
    T: fmt::Debug + Send + Sync + 'static,
{
    fn post_construct(&self, instance: &T, instantiator: Option<&dyn Instantiator<T>>) -> LifecycleResult<()> {
        self.dispatch(LifecycleMarker::PostConstruct, instance, instantiator)
    }

    fn pre_destroy(&self, instance: &T, instantiator: Option<&dyn Instantiator<T>>) -> LifecycleResult<()> {
        self.dispatch(LifecycleMarker::PreDestroy, instance, instantiator)
    }

    fn has_post_construct_methods(&self) -> bool {
        !self.post_construct.is_empty()
    }

    fn has_pre_destroy_methods(&self) -> bool {
        !self.pre_destroy.is_empty()
    }
}

impl<T> fmt::Debug for DefaultLifecycleCallbackInvoker<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultLifecycleCallbackInvoker")
            .field("type_info", &self.type_info)
            .field("post_construct", &self.post_construct)
            .field("pre_destroy", &self.pre_destroy)
            .field("interception", &self.interception.is_some())
            .finish()
    }
}
