//! Bean 管理器
//!
//! 把 Bean 解析器、销毁方法解析器和按类型缓存的生命周期调用器组合在一起，
//! 并负责检查 Bean 定义是否一致。

use crate::bean_resolver::{hierarchy_from_config, BeanResolutionStrategy, TypeSafeBeanResolver};
use crate::disposer_resolver::{DisposerResolutionStrategy, TypeSafeDisposerResolver};
use crate::lifecycle_invoker::DefaultLifecycleCallbackInvoker;
use crate::qualifiers::NonBindingQualifierComparator;
use crate::typesafe_resolver::TypeSafeResolver;
use dashmap::DashMap;
use di_abstractions::{
    AnnotatedType, Bean, BeanId, DisposalMethod, InterceptionProxy, QualifierComparator, Resolution,
    Resolvable, ResolvableTransformer, TypeHierarchy,
};
use infrastructure_common::{DefinitionError, ResolutionConfig};
use std::any::{Any, TypeId};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Bean 管理器
pub struct BeanManager {
    beans: TypeSafeBeanResolver,
    disposers: TypeSafeDisposerResolver,
    invokers: DashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl BeanManager {
    pub fn builder() -> BeanManagerBuilder {
        BeanManagerBuilder::new()
    }

    /// 解析注入点
    pub fn resolve(&self, resolvable: &Resolvable) -> Arc<Resolution<Bean>> {
        self.beans.resolve(resolvable)
    }

    /// 查找生产者 Bean 的销毁方法；非生产者 Bean 总是得到空结果
    pub fn resolve_disposal_methods(&self, producer: &Bean) -> Arc<Resolution<DisposalMethod>> {
        self.disposers.resolve(&Resolvable::for_disposal(producer))
    }

    pub fn beans(&self) -> &[Arc<Bean>] {
        self.beans.candidates()
    }

    pub fn disposal_methods(&self) -> &[Arc<DisposalMethod>] {
        self.disposers.candidates()
    }

    /// 检查 Bean 定义，返回发现的全部错误
    pub fn validate(&self) -> Result<(), Vec<DefinitionError>> {
        let known: HashSet<&BeanId> = self.beans().iter().map(|bean| bean.id()).collect();
        let mut errors = Vec::new();

        for disposer in self.disposal_methods() {
            if !known.contains(disposer.declaring_bean()) {
                errors.push(DefinitionError::UnknownDeclaringBean {
                    disposer: disposer.id().to_string(),
                    declaring_bean: disposer.declaring_bean().to_string(),
                });
            }
        }

        let mut used: HashSet<String> = HashSet::new();
        for producer in self.beans().iter().filter(|bean| bean.is_producer()) {
            let disposers = self.resolve_disposal_methods(producer);
            if disposers.is_ambiguous() {
                errors.push(DefinitionError::MultipleDisposalMethods {
                    producer: producer.id().to_string(),
                    disposers: disposers.ids().into_iter().map(str::to_string).collect(),
                });
            }
            used.extend(disposers.iter().map(|disposer| disposer.id().to_string()));
        }

        for disposer in self.disposal_methods() {
            if known.contains(disposer.declaring_bean()) && !used.contains(disposer.id()) {
                errors.push(DefinitionError::UnresolvedDisposalMethod {
                    disposer: disposer.id().to_string(),
                });
            }
        }

        if errors.is_empty() {
            debug!("Bean 定义检查通过");
            Ok(())
        } else {
            for error in &errors {
                warn!("Bean 定义错误: {}", error);
            }
            Err(errors)
        }
    }

    /// 获取类型 `T` 的生命周期调用器
    ///
    /// 每个类型只创建一次，之后的调用忽略参数并返回同一个调用器。
    pub fn lifecycle_invoker<T>(
        &self,
        annotated_type: &AnnotatedType<T>,
        interception: Option<Arc<dyn InterceptionProxy<T>>>,
    ) -> Arc<DefaultLifecycleCallbackInvoker<T>>
    where
        T: fmt::Debug + Send + Sync + 'static,
    {
        let type_id = TypeId::of::<T>();
        if let Some(existing) = self
            .invokers
            .get(&type_id)
            .and_then(|entry| {
                Arc::clone(entry.value())
                    .downcast::<DefaultLifecycleCallbackInvoker<T>>()
                    .ok()
            })
        {
            if interception.is_some() {
                warn!(
                    "类型 {} 的生命周期调用器已存在，忽略新传入的拦截代理",
                    existing.type_info().name
                );
            }
            return existing;
        }

        let mut invoker = DefaultLifecycleCallbackInvoker::of(annotated_type);
        if let Some(proxy) = interception {
            invoker = invoker.with_interception(proxy);
        }
        let created = Arc::new(invoker);

        let entry = self
            .invokers
            .entry(type_id)
            .or_insert_with(|| Arc::clone(&created) as Arc<dyn Any + Send + Sync>);
        Arc::clone(entry.value()).downcast().unwrap_or(created)
    }

    /// 已创建的生命周期调用器数量
    pub fn lifecycle_invoker_count(&self) -> usize {
        self.invokers.len()
    }
}

impl fmt::Debug for BeanManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanManager")
            .field("beans", &self.beans)
            .field("disposers", &self.disposers)
            .field("invokers", &self.invokers.len())
            .finish()
    }
}

/// Bean 管理器构建器
pub struct BeanManagerBuilder {
    beans: Vec<Bean>,
    disposal_methods: Vec<DisposalMethod>,
    comparator: Option<Arc<dyn QualifierComparator>>,
    hierarchy: TypeHierarchy,
    transformers: Vec<Box<dyn ResolvableTransformer>>,
    config: ResolutionConfig,
}

impl BeanManagerBuilder {
    pub fn new() -> Self {
        Self {
            beans: Vec::new(),
            disposal_methods: Vec::new(),
            comparator: None,
            hierarchy: TypeHierarchy::new(),
            transformers: Vec::new(),
            config: ResolutionConfig::default(),
        }
    }

    pub fn with_bean(mut self, bean: Bean) -> Self {
        self.beans.push(bean);
        self
    }

    pub fn with_beans(mut self, beans: impl IntoIterator<Item = Bean>) -> Self {
        self.beans.extend(beans);
        self
    }

    pub fn with_disposal_method(mut self, disposal_method: DisposalMethod) -> Self {
        self.disposal_methods.push(disposal_method);
        self
    }

    /// 替换默认的限定符比较器
    pub fn with_comparator(mut self, comparator: Arc<dyn QualifierComparator>) -> Self {
        self.comparator = Some(comparator);
        self
    }

    /// 类型层次结构，与配置中的超类型合并后供两个解析器使用
    pub fn with_type_hierarchy(mut self, hierarchy: TypeHierarchy) -> Self {
        self.hierarchy = hierarchy;
        self
    }

    /// 追加 Bean 查询转换器，在配置生成的转换器之后执行
    pub fn with_transformer(mut self, transformer: Box<dyn ResolvableTransformer>) -> Self {
        self.transformers.push(transformer);
        self
    }

    pub fn with_config(mut self, config: ResolutionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> BeanManager {
        let comparator = self
            .comparator
            .unwrap_or_else(|| Arc::new(NonBindingQualifierComparator::new()));

        let mut hierarchy = self.hierarchy;
        hierarchy.merge(&hierarchy_from_config(&self.config));
        let hierarchy = Arc::new(hierarchy);

        let bean_strategy = self
            .transformers
            .into_iter()
            .fold(
                BeanResolutionStrategy::from_config(Arc::clone(&comparator), &self.config)
                    .with_type_hierarchy(Arc::clone(&hierarchy)),
                BeanResolutionStrategy::with_transformer,
            );

        info!(
            "构建 Bean 管理器完成，Bean: {} 个，销毁方法: {} 个",
            self.beans.len(),
            self.disposal_methods.len()
        );

        BeanManager {
            beans: TypeSafeResolver::new(self.beans.into_iter().map(Arc::new), bean_strategy),
            disposers: TypeSafeResolver::new(
                self.disposal_methods.into_iter().map(Arc::new),
                DisposerResolutionStrategy::new(comparator).with_type_hierarchy(hierarchy),
            ),
            invokers: DashMap::new(),
        }
    }
}

impl Default for BeanManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
