//! 限定符模型
//!
//! 限定符用于区分同一类型的多个 Bean。成员是否参与比较（binding / non-binding）
//! 由 [`QualifierComparator`] 的实现决定，这里的 `Eq`/`Hash` 是按全部字段的值比较，
//! 只用于缓存键和集合去重。

use once_cell::sync::Lazy;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

/// `@Default` 限定符名称
pub const DEFAULT: &str = "Default";
/// `@Any` 限定符名称
pub const ANY: &str = "Any";
/// `@Named` 限定符名称
pub const NAMED: &str = "Named";
/// `@Named` 的值成员
pub const NAMED_VALUE: &str = "value";

static DEFAULT_QUALIFIER: Lazy<Qualifier> = Lazy::new(|| Qualifier::new(DEFAULT));
static ANY_QUALIFIER: Lazy<Qualifier> = Lazy::new(|| Qualifier::new(ANY));

/// 限定符集合
pub type QualifierSet = BTreeSet<Qualifier>;

/// 限定符
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Qualifier {
    name: Arc<str>,
    members: BTreeMap<Arc<str>, Arc<str>>,
}

impl Qualifier {
    /// 创建不带成员的限定符
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            members: BTreeMap::new(),
        }
    }

    /// 添加成员
    pub fn with_member(mut self, name: impl Into<Arc<str>>, value: impl Into<Arc<str>>) -> Self {
        self.members.insert(name.into(), value.into());
        self
    }

    /// `@Default`
    pub fn default_qualifier() -> Self {
        DEFAULT_QUALIFIER.clone()
    }

    /// `@Any`
    pub fn any() -> Self {
        ANY_QUALIFIER.clone()
    }

    /// `@Named(value)`
    pub fn named(value: impl Into<Arc<str>>) -> Self {
        Self::new(NAMED).with_member(NAMED_VALUE, value)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn member(&self, name: &str) -> Option<&str> {
        self.members.get(name).map(|value| &**value)
    }

    pub fn members(&self) -> impl Iterator<Item = (&str, &str)> {
        self.members.iter().map(|(k, v)| (&**k, &**v))
    }

    pub fn is_named(&self) -> bool {
        &*self.name == NAMED
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)?;
        if !self.members.is_empty() {
            f.write_str("(")?;
            for (index, (name, value)) in self.members.iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{name}={value}")?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// 按 Bean 规则补全限定符
///
/// 除 `@Named` 外没有声明任何限定符时补上 `@Default`，并且总是带上 `@Any`。
pub fn normalize_bean_qualifiers(declared: impl IntoIterator<Item = Qualifier>) -> QualifierSet {
    let mut qualifiers: QualifierSet = declared.into_iter().collect();
    let has_no_explicit = qualifiers
        .iter()
        .all(|q| q.is_named() || q.name() == ANY);
    if has_no_explicit {
        qualifiers.insert(Qualifier::default_qualifier());
    }
    qualifiers.insert(Qualifier::any());
    qualifiers
}

/// 限定符比较工具
///
/// 决定两个限定符在忽略 non-binding 成员后是否相等。
pub trait QualifierComparator: Send + Sync + fmt::Debug {
    /// 两个限定符是否等价
    fn qualifier_equals(&self, a: &Qualifier, b: &Qualifier) -> bool;

    /// `candidate` 是否包含 `required` 中的每一个限定符
    fn contains_all(&self, candidate: &QualifierSet, required: &QualifierSet) -> bool {
        required
            .iter()
            .all(|r| candidate.iter().any(|c| self.qualifier_equals(c, r)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_adds_default_and_any() {
        let qualifiers = normalize_bean_qualifiers(Vec::new());
        assert!(qualifiers.contains(&Qualifier::default_qualifier()));
        assert!(qualifiers.contains(&Qualifier::any()));
        assert_eq!(qualifiers.len(), 2);
    }

    #[test]
    fn test_named_only_still_gets_default() {
        let qualifiers = normalize_bean_qualifiers([Qualifier::named("audit")]);
        assert!(qualifiers.contains(&Qualifier::default_qualifier()));
        assert!(qualifiers.contains(&Qualifier::named("audit")));
    }

    #[test]
    fn test_custom_qualifier_suppresses_default() {
        let qualifiers = normalize_bean_qualifiers([Qualifier::new("Secure")]);
        assert!(!qualifiers.contains(&Qualifier::default_qualifier()));
        assert!(qualifiers.contains(&Qualifier::any()));
    }

    #[test]
    fn test_display() {
        assert_eq!(Qualifier::named("audit").to_string(), "@Named(value=audit)");
        assert_eq!(Qualifier::default_qualifier().to_string(), "@Default");
    }
}
