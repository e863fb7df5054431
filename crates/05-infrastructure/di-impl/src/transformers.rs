//! 查询转换器实现

use di_abstractions::{Resolvable, ResolvableTransformer, TypeDescriptor};
use std::collections::BTreeMap;

/// 类型别名转换器
///
/// 对查询中带别名的类型，额外生成一个按别名查询的 [`Resolvable`]，
/// 例如基本类型 `int` 同时按包装类型 `Integer` 查询。原查询保留。
#[derive(Debug, Clone, Default)]
pub struct TypeAliasTransformer {
    aliases: BTreeMap<String, String>,
}

impl TypeAliasTransformer {
    pub fn new(aliases: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            aliases: aliases.into_iter().collect(),
        }
    }

    /// 追加一个别名
    pub fn with_alias(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.aliases.insert(from.into(), to.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    fn alias_of(&self, ty: &TypeDescriptor) -> Option<TypeDescriptor> {
        match ty {
            TypeDescriptor::Class { name, arguments } => self
                .aliases
                .get(&**name)
                .map(|alias| TypeDescriptor::parameterized(alias.as_str(), arguments.iter().cloned())),
            TypeDescriptor::Array(component) => self.alias_of(component).map(TypeDescriptor::array_of),
            TypeDescriptor::Variable { .. } | TypeDescriptor::Wildcard { .. } => None,
        }
    }
}

impl ResolvableTransformer for TypeAliasTransformer {
    fn transform(&self, resolvable: Resolvable) -> Vec<Resolvable> {
        let aliased: Vec<TypeDescriptor> = resolvable
            .types()
            .iter()
            .filter_map(|ty| self.alias_of(ty))
            .collect();

        if aliased.is_empty() {
            vec![resolvable]
        } else {
            let alias = resolvable.with_types(aliased);
            vec![resolvable, alias]
        }
    }
}

/// 原始类型转换器
///
/// 查询参数化类型时额外按原始类型查询，用于兼容只声明了原始类型的 Bean。
#[derive(Debug, Clone, Copy, Default)]
pub struct RawTypeTransformer;

impl ResolvableTransformer for RawTypeTransformer {
    fn transform(&self, resolvable: Resolvable) -> Vec<Resolvable> {
        if !resolvable.types().iter().any(TypeDescriptor::is_parameterized) {
            return vec![resolvable];
        }

        let raw = resolvable.with_types(resolvable.types().iter().map(TypeDescriptor::raw));
        vec![resolvable, raw]
    }
}
