//! 参与解析的候选项：Bean 与销毁方法
//!
//! 候选项注册后不可变，解析器以 `Arc` 共享它们。

use crate::qualifier::{normalize_bean_qualifiers, Qualifier, QualifierSet};
use crate::types::TypeDescriptor;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Bean 标识
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BeanId(Arc<str>);

impl BeanId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BeanId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for BeanId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for BeanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 候选项
pub trait Candidate: fmt::Debug + Send + Sync + 'static {
    /// 候选项标识，用于日志和排序
    fn candidate_id(&self) -> &str;
}

/// Bean 种类
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BeanKind {
    /// 由容器直接实例化的类 Bean
    Managed,
    /// 生产者方法或字段，`declaring_bean` 为声明它的类 Bean
    Producer { declaring_bean: BeanId },
}

/// Bean
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bean {
    id: BeanId,
    bean_type: TypeDescriptor,
    types: BTreeSet<TypeDescriptor>,
    qualifiers: QualifierSet,
    kind: BeanKind,
    specializes: Option<BeanId>,
}

impl Bean {
    /// 创建 Bean 构建器，`bean_type` 为声明类型（生产者为返回类型）
    pub fn builder(id: impl Into<BeanId>, bean_type: TypeDescriptor) -> BeanBuilder {
        BeanBuilder {
            id: id.into(),
            bean_type,
            types: BTreeSet::new(),
            qualifiers: Vec::new(),
            kind: BeanKind::Managed,
            specializes: None,
        }
    }

    pub fn id(&self) -> &BeanId {
        &self.id
    }

    /// 声明类型
    pub fn bean_type(&self) -> &TypeDescriptor {
        &self.bean_type
    }

    /// 类型闭包
    pub fn types(&self) -> &BTreeSet<TypeDescriptor> {
        &self.types
    }

    pub fn qualifiers(&self) -> &QualifierSet {
        &self.qualifiers
    }

    pub fn kind(&self) -> &BeanKind {
        &self.kind
    }

    /// 生产者 Bean 的声明 Bean
    pub fn declaring_bean(&self) -> Option<&BeanId> {
        match &self.kind {
            BeanKind::Producer { declaring_bean } => Some(declaring_bean),
            BeanKind::Managed => None,
        }
    }

    pub fn is_producer(&self) -> bool {
        matches!(self.kind, BeanKind::Producer { .. })
    }

    /// 被当前 Bean 特化（覆盖）的 Bean
    pub fn specializes(&self) -> Option<&BeanId> {
        self.specializes.as_ref()
    }
}

impl Candidate for Bean {
    fn candidate_id(&self) -> &str {
        self.id.as_str()
    }
}

/// Bean 构建器
#[derive(Debug)]
pub struct BeanBuilder {
    id: BeanId,
    bean_type: TypeDescriptor,
    types: BTreeSet<TypeDescriptor>,
    qualifiers: Vec<Qualifier>,
    kind: BeanKind,
    specializes: Option<BeanId>,
}

impl BeanBuilder {
    /// 向类型闭包添加类型
    pub fn with_type(mut self, ty: TypeDescriptor) -> Self {
        self.types.insert(ty);
        self
    }

    pub fn with_types(mut self, types: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        self.types.extend(types);
        self
    }

    pub fn with_qualifier(mut self, qualifier: Qualifier) -> Self {
        self.qualifiers.push(qualifier);
        self
    }

    /// 标记为 `declaring_bean` 上声明的生产者
    pub fn produced_by(mut self, declaring_bean: impl Into<BeanId>) -> Self {
        self.kind = BeanKind::Producer {
            declaring_bean: declaring_bean.into(),
        };
        self
    }

    pub fn specializes(mut self, target: impl Into<BeanId>) -> Self {
        self.specializes = Some(target.into());
        self
    }

    /// 构建 Bean；类型闭包总是包含声明类型和 `Object`
    pub fn build(self) -> Bean {
        let mut types = self.types;
        types.insert(self.bean_type.clone());
        types.insert(TypeDescriptor::object());

        Bean {
            id: self.id,
            bean_type: self.bean_type,
            types,
            qualifiers: normalize_bean_qualifiers(self.qualifiers),
            kind: self.kind,
            specializes: self.specializes,
        }
    }
}

/// 销毁方法
///
/// 只能销毁同一个声明 Bean 上的生产者所产生的实例。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisposalMethod {
    id: Arc<str>,
    declaring_bean: BeanId,
    parameter_type: TypeDescriptor,
    qualifiers: QualifierSet,
}

impl DisposalMethod {
    pub fn builder(
        id: impl Into<Arc<str>>,
        declaring_bean: impl Into<BeanId>,
        parameter_type: TypeDescriptor,
    ) -> DisposalMethodBuilder {
        DisposalMethodBuilder {
            id: id.into(),
            declaring_bean: declaring_bean.into(),
            parameter_type,
            qualifiers: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn declaring_bean(&self) -> &BeanId {
        &self.declaring_bean
    }

    /// 被销毁参数的类型
    pub fn parameter_type(&self) -> &TypeDescriptor {
        &self.parameter_type
    }

    pub fn qualifiers(&self) -> &QualifierSet {
        &self.qualifiers
    }
}

impl Candidate for DisposalMethod {
    fn candidate_id(&self) -> &str {
        &self.id
    }
}

/// 销毁方法构建器
#[derive(Debug)]
pub struct DisposalMethodBuilder {
    id: Arc<str>,
    declaring_bean: BeanId,
    parameter_type: TypeDescriptor,
    qualifiers: Vec<Qualifier>,
}

impl DisposalMethodBuilder {
    /// 被销毁参数上的限定符
    pub fn with_qualifier(mut self, qualifier: Qualifier) -> Self {
        self.qualifiers.push(qualifier);
        self
    }

    pub fn build(self) -> DisposalMethod {
        DisposalMethod {
            id: self.id,
            declaring_bean: self.declaring_bean,
            parameter_type: self.parameter_type,
            qualifiers: normalize_bean_qualifiers(self.qualifiers),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bean_type_closure_contains_declared_type_and_object() {
        let logger = TypeDescriptor::class("Logger");
        let bean = Bean::builder("logger", logger.clone())
            .with_type(TypeDescriptor::class("Sink"))
            .build();

        assert!(bean.types().contains(&logger));
        assert!(bean.types().contains(&TypeDescriptor::object()));
        assert!(bean.types().contains(&TypeDescriptor::class("Sink")));
        assert_eq!(bean.types().len(), 3);
        assert!(!bean.is_producer());
        assert_eq!(bean.declaring_bean(), None);
    }

    #[test]
    fn test_producer_bean() {
        let bean = Bean::builder("pools#connection", TypeDescriptor::class("Connection"))
            .produced_by("pools")
            .with_qualifier(Qualifier::new("Primary"))
            .build();

        assert!(bean.is_producer());
        assert_eq!(bean.declaring_bean(), Some(&BeanId::from("pools")));
        assert!(!bean.qualifiers().contains(&Qualifier::default_qualifier()));
        assert!(bean.qualifiers().contains(&Qualifier::any()));
    }

    #[test]
    fn test_disposal_method_defaults() {
        let disposer = DisposalMethod::builder("pools#close", "pools", TypeDescriptor::class("Connection")).build();
        assert_eq!(disposer.candidate_id(), "pools#close");
        assert!(disposer.qualifiers().contains(&Qualifier::default_qualifier()));
        assert!(disposer.qualifiers().contains(&Qualifier::any()));
    }
}
