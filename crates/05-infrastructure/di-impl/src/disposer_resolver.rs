//! 销毁方法解析策略

use crate::qualifiers::NonBindingQualifierComparator;
use crate::typesafe_resolver::TypeSafeResolver;
use di_abstractions::{
    DisposalMethod, QualifierComparator, Resolvable, ResolutionStrategy, TypeHierarchy,
};
use std::sync::Arc;

/// 销毁方法解析器
pub type TypeSafeDisposerResolver = TypeSafeResolver<DisposalMethod, DisposerResolutionStrategy>;

/// 销毁方法解析策略
///
/// 销毁方法只处理同一个声明 Bean 上的生产者。参数类型必须能接收查询中的每一个类型，
/// 且参数限定符是查询限定符的超集时匹配。不使用转换器，结果保持注册顺序。
#[derive(Debug, Clone)]
pub struct DisposerResolutionStrategy {
    comparator: Arc<dyn QualifierComparator>,
    hierarchy: Arc<TypeHierarchy>,
}

impl DisposerResolutionStrategy {
    pub fn new(comparator: Arc<dyn QualifierComparator>) -> Self {
        Self {
            comparator,
            hierarchy: Arc::new(TypeHierarchy::new()),
        }
    }

    pub fn with_type_hierarchy(mut self, hierarchy: Arc<TypeHierarchy>) -> Self {
        self.hierarchy = hierarchy;
        self
    }

    fn same_declaring_bean(resolvable: &Resolvable, disposer: &DisposalMethod) -> bool {
        resolvable
            .declaring_bean()
            .map_or(false, |declaring_bean| declaring_bean == disposer.declaring_bean())
    }
}

impl Default for DisposerResolutionStrategy {
    fn default() -> Self {
        Self::new(Arc::new(NonBindingQualifierComparator::new()))
    }
}

impl ResolutionStrategy<DisposalMethod> for DisposerResolutionStrategy {
    fn matches(&self, resolvable: &Resolvable, disposer: &DisposalMethod) -> bool {
        if !Self::same_declaring_bean(resolvable, disposer) {
            return false;
        }

        // 空类型闭包不匹配任何销毁方法
        let types = resolvable.types();
        let type_matches = !types.is_empty()
            && types
                .iter()
                .all(|ty| disposer.parameter_type().is_assignable_in(ty, &self.hierarchy));

        type_matches && self.comparator.contains_all(disposer.qualifiers(), resolvable.qualifiers())
    }
}

/// 用默认限定符比较器创建销毁方法解析器
pub fn default_disposer_resolver(disposers: impl IntoIterator<Item = DisposalMethod>) -> TypeSafeDisposerResolver {
    TypeSafeResolver::new(disposers.into_iter().map(Arc::new), DisposerResolutionStrategy::default())
}
