//! 默认限定符比较工具

use di_abstractions::{Qualifier, QualifierComparator};
use std::collections::{HashMap, HashSet};

/// 忽略 non-binding 成员的限定符比较器
///
/// 两个限定符名称相同，且除 non-binding 成员外的全部成员值相同时视为相等。
#[derive(Debug, Clone, Default)]
pub struct NonBindingQualifierComparator {
    non_binding: HashMap<String, HashSet<String>>,
}

impl NonBindingQualifierComparator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 声明 `qualifier` 的 `member` 成员为 non-binding
    pub fn with_non_binding_member(mut self, qualifier: impl Into<String>, member: impl Into<String>) -> Self {
        self.non_binding
            .entry(qualifier.into())
            .or_default()
            .insert(member.into());
        self
    }

    fn is_binding(&self, qualifier: &str, member: &str) -> bool {
        self.non_binding
            .get(qualifier)
            .map_or(true, |members| !members.contains(member))
    }
}

impl QualifierComparator for NonBindingQualifierComparator {
    fn qualifier_equals(&self, a: &Qualifier, b: &Qualifier) -> bool {
        if a.name() != b.name() {
            return false;
        }

        let binding_members = |q: &Qualifier| -> Vec<(String, String)> {
            q.members()
                .filter(|(member, _)| self.is_binding(q.name(), member))
                .map(|(member, value)| (member.to_string(), value.to_string()))
                .collect()
        };

        // 成员在 BTreeMap 中有序，可以直接比较
        binding_members(a) == binding_members(b)
    }
}
