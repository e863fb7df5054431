//! 注入点解析策略

use crate::qualifiers::NonBindingQualifierComparator;
use crate::transformers::{RawTypeTransformer, TypeAliasTransformer};
use crate::typesafe_resolver::TypeSafeResolver;
use di_abstractions::{
    Bean, BeanId, QualifierComparator, Resolvable, ResolvableTransformer, ResolutionStrategy,
    TypeDescriptor, TypeHierarchy,
};
use infrastructure_common::ResolutionConfig;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Bean 解析器
pub type TypeSafeBeanResolver = TypeSafeResolver<Bean, BeanResolutionStrategy>;

/// 注入点解析策略
///
/// Bean 的某个类型可以赋值给查询的某个类型，且 Bean 的限定符包含查询的全部限定符时匹配。
pub struct BeanResolutionStrategy {
    comparator: Arc<dyn QualifierComparator>,
    hierarchy: Arc<TypeHierarchy>,
    transformers: Vec<Box<dyn ResolvableTransformer>>,
    specialization: bool,
}

impl BeanResolutionStrategy {
    pub fn new(comparator: Arc<dyn QualifierComparator>) -> Self {
        Self {
            comparator,
            hierarchy: Arc::new(TypeHierarchy::new()),
            transformers: Vec::new(),
            specialization: true,
        }
    }

    /// 按配置创建：别名和原始类型转换器只在配置开启时加入
    pub fn from_config(comparator: Arc<dyn QualifierComparator>, config: &ResolutionConfig) -> Self {
        let mut strategy = Self::new(comparator)
            .with_specialization(config.specialization)
            .with_type_hierarchy(Arc::new(hierarchy_from_config(config)));
        if !config.type_aliases.is_empty() {
            strategy = strategy.with_transformer(Box::new(TypeAliasTransformer::new(
                config.type_aliases.clone(),
            )));
        }
        if config.raw_type_fallback {
            strategy = strategy.with_transformer(Box::new(RawTypeTransformer));
        }
        strategy
    }

    /// 追加转换器，按追加顺序执行
    pub fn with_transformer(mut self, transformer: Box<dyn ResolvableTransformer>) -> Self {
        self.transformers.push(transformer);
        self
    }

    pub fn with_specialization(mut self, enabled: bool) -> Self {
        self.specialization = enabled;
        self
    }

    /// 类型参数和边界上的子类型判断使用的层次结构
    pub fn with_type_hierarchy(mut self, hierarchy: Arc<TypeHierarchy>) -> Self {
        self.hierarchy = hierarchy;
        self
    }
}

impl Default for BeanResolutionStrategy {
    fn default() -> Self {
        Self::new(Arc::new(NonBindingQualifierComparator::new()))
    }
}

impl fmt::Debug for BeanResolutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanResolutionStrategy")
            .field("comparator", &self.comparator)
            .field("hierarchy", &self.hierarchy)
            .field("transformers", &self.transformers)
            .field("specialization", &self.specialization)
            .finish()
    }
}

impl ResolutionStrategy<Bean> for BeanResolutionStrategy {
    fn matches(&self, resolvable: &Resolvable, bean: &Bean) -> bool {
        let type_matches = resolvable
            .types()
            .iter()
            .any(|required| {
                bean.types()
                    .iter()
                    .any(|ty| required.is_assignable_in(ty, &self.hierarchy))
            });

        type_matches && self.comparator.contains_all(bean.qualifiers(), resolvable.qualifiers())
    }

    fn transformers(&self) -> &[Box<dyn ResolvableTransformer>] {
        &self.transformers
    }

    /// 剔除被结果中其他 Bean 特化的 Bean
    fn filter_result(&self, matched: Vec<Arc<Bean>>) -> Vec<Arc<Bean>> {
        if !self.specialization {
            return matched;
        }

        let specialized: HashSet<&BeanId> = matched.iter().filter_map(|bean| bean.specializes()).collect();
        if specialized.is_empty() {
            return matched;
        }

        let retained: Vec<Arc<Bean>> = matched
            .iter()
            .filter(|bean| !specialized.contains(bean.id()))
            .cloned()
            .collect();
        trace!(
            "特化过滤: {} -> {} 个 Bean",
            matched.len(),
            retained.len()
        );
        retained
    }

    /// 按 Bean 标识排序，保证结果顺序确定
    fn sort_result(&self, mut matched: Vec<Arc<Bean>>) -> Vec<Arc<Bean>> {
        matched.sort_by(|a, b| a.id().cmp(b.id()));
        matched
    }
}

/// 由配置中的超类型名构建类型层次结构
pub fn hierarchy_from_config(config: &ResolutionConfig) -> TypeHierarchy {
    config
        .supertypes
        .iter()
        .flat_map(|(subtype, supertypes)| supertypes.iter().map(move |supertype| (subtype, supertype)))
        .fold(TypeHierarchy::new(), |hierarchy, (subtype, supertype)| {
            hierarchy.with_supertype(subtype.as_str(), TypeDescriptor::class(supertype.as_str()))
        })
}

/// 用默认限定符比较器创建 Bean 解析器
pub fn default_bean_resolver(beans: impl IntoIterator<Item = Bean>) -> TypeSafeBeanResolver {
    TypeSafeResolver::new(beans.into_iter().map(Arc::new), BeanResolutionStrategy::default())
}
