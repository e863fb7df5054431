//! 解析查询
//!
//! [`Resolvable`] 按字段的值比较和哈希，作为解析结果缓存的键。

use crate::candidate::{Bean, BeanId};
use crate::qualifier::{Qualifier, QualifierSet};
use crate::types::TypeDescriptor;
use std::collections::BTreeSet;
use std::fmt;

/// 解析查询：类型闭包 + 必需限定符 + 可选的声明 Bean
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Resolvable {
    types: BTreeSet<TypeDescriptor>,
    qualifiers: QualifierSet,
    declaring_bean: Option<BeanId>,
}

impl Resolvable {
    pub fn builder() -> ResolvableBuilder {
        ResolvableBuilder::default()
    }

    /// 单一类型、`@Default` 限定的查询
    pub fn of_type(ty: TypeDescriptor) -> Self {
        Self::builder().add_type(ty).build()
    }

    /// 为生产者 Bean 查找销毁方法的查询
    ///
    /// 类型取生产者的声明类型，限定符取生产者的限定符，声明 Bean 取生产者所在的类 Bean。
    pub fn for_disposal(producer: &Bean) -> Self {
        let mut builder = Self::builder()
            .add_type(producer.bean_type().clone())
            .add_qualifiers(producer.qualifiers().iter().cloned());
        if let Some(declaring_bean) = producer.declaring_bean() {
            builder = builder.declaring_bean(declaring_bean.clone());
        }
        builder.build()
    }

    pub fn types(&self) -> &BTreeSet<TypeDescriptor> {
        &self.types
    }

    pub fn qualifiers(&self) -> &QualifierSet {
        &self.qualifiers
    }

    pub fn declaring_bean(&self) -> Option<&BeanId> {
        self.declaring_bean.as_ref()
    }

    /// 复制当前查询并替换类型闭包，供转换器使用
    pub fn with_types(&self, types: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        Self {
            types: types.into_iter().collect(),
            qualifiers: self.qualifiers.clone(),
            declaring_bean: self.declaring_bean.clone(),
        }
    }
}

impl fmt::Display for Resolvable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (index, ty) in self.types.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{ty}")?;
        }
        f.write_str("}")?;
        for qualifier in &self.qualifiers {
            write!(f, " {qualifier}")?;
        }
        if let Some(declaring_bean) = &self.declaring_bean {
            write!(f, " declared-by {declaring_bean}")?;
        }
        Ok(())
    }
}

/// 查询构建器
#[derive(Debug, Default)]
pub struct ResolvableBuilder {
    types: BTreeSet<TypeDescriptor>,
    qualifiers: QualifierSet,
    declaring_bean: Option<BeanId>,
}

impl ResolvableBuilder {
    pub fn add_type(mut self, ty: TypeDescriptor) -> Self {
        self.types.insert(ty);
        self
    }

    pub fn add_types(mut self, types: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        self.types.extend(types);
        self
    }

    pub fn add_qualifier(mut self, qualifier: Qualifier) -> Self {
        self.qualifiers.insert(qualifier);
        self
    }

    pub fn add_qualifiers(mut self, qualifiers: impl IntoIterator<Item = Qualifier>) -> Self {
        self.qualifiers.extend(qualifiers);
        self
    }

    pub fn declaring_bean(mut self, declaring_bean: impl Into<BeanId>) -> Self {
        self.declaring_bean = Some(declaring_bean.into());
        self
    }

    /// 构建查询；未指定限定符时使用 `@Default`
    pub fn build(self) -> Resolvable {
        let mut qualifiers = self.qualifiers;
        if qualifiers.is_empty() {
            qualifiers.insert(Qualifier::default_qualifier());
        }

        Resolvable {
            types: self.types,
            qualifiers,
            declaring_bean: self.declaring_bean,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of(resolvable: &Resolvable) -> u64 {
        let mut hasher = DefaultHasher::new();
        resolvable.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_default_qualifier_is_implicit() {
        let resolvable = Resolvable::of_type(TypeDescriptor::class("Logger"));
        assert_eq!(resolvable.qualifiers().len(), 1);
        assert!(resolvable.qualifiers().contains(&Qualifier::default_qualifier()));
        assert_eq!(resolvable.declaring_bean(), None);
    }

    #[test]
    fn test_explicit_qualifier_replaces_default() {
        let resolvable = Resolvable::builder()
            .add_type(TypeDescriptor::class("Logger"))
            .add_qualifier(Qualifier::named("audit"))
            .build();
        assert!(!resolvable.qualifiers().contains(&Qualifier::default_qualifier()));
    }

    #[test]
    fn test_value_equality_independent_of_insertion_order() {
        let a = Resolvable::builder()
            .add_type(TypeDescriptor::class("Logger"))
            .add_qualifier(Qualifier::named("audit"))
            .add_qualifier(Qualifier::default_qualifier())
            .build();
        let b = Resolvable::builder()
            .add_qualifier(Qualifier::default_qualifier())
            .add_qualifier(Qualifier::named("audit"))
            .add_type(TypeDescriptor::class("Logger"))
            .build();

        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_for_disposal_uses_producer_context() {
        let producer = Bean::builder("pools#connection", TypeDescriptor::class("Connection"))
            .with_type(TypeDescriptor::class("AutoCloseable"))
            .produced_by("pools")
            .build();

        let resolvable = Resolvable::for_disposal(&producer);
        assert_eq!(resolvable.types().len(), 1);
        assert!(resolvable.types().contains(&TypeDescriptor::class("Connection")));
        assert_eq!(resolvable.qualifiers(), producer.qualifiers());
        assert_eq!(resolvable.declaring_bean(), Some(&BeanId::from("pools")));
    }

    #[test]
    fn test_display() {
        let resolvable = Resolvable::builder()
            .add_type(TypeDescriptor::class("Logger"))
            .add_qualifier(Qualifier::named("audit"))
            .declaring_bean("loggers")
            .build();
        assert_eq!(
            resolvable.to_string(),
            "{Logger} @Named(value=audit) declared-by loggers"
        );
    }
}
