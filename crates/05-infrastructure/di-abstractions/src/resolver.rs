//! 类型安全解析抽象接口
//!
//! 解析引擎本身是通用的，候选项种类相关的策略通过 [`ResolutionStrategy`] 注入。

use crate::candidate::Candidate;
use crate::resolvable::Resolvable;
use std::fmt;
use std::sync::Arc;

/// 解析结果
///
/// 没有匹配和多个匹配都不是错误，由调用方根据数量决定如何处理。
#[derive(Debug)]
pub struct Resolution<C> {
    candidates: Vec<Arc<C>>,
}

impl<C> Resolution<C> {
    pub fn new(candidates: Vec<Arc<C>>) -> Self {
        Self { candidates }
    }

    /// 空结果
    pub fn empty() -> Self {
        Self {
            candidates: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// 唯一匹配；空或多个匹配时返回 `None`
    pub fn single(&self) -> Option<&Arc<C>> {
        match self.candidates.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// 是否存在歧义
    pub fn is_ambiguous(&self) -> bool {
        self.candidates.len() > 1
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<C>> {
        self.candidates.iter()
    }

    pub fn as_slice(&self) -> &[Arc<C>] {
        &self.candidates
    }
}

impl<C: Candidate> Resolution<C> {
    /// 结果中是否包含指定标识的候选项
    pub fn contains_id(&self, id: &str) -> bool {
        self.candidates.iter().any(|c| c.candidate_id() == id)
    }

    /// 结果中所有候选项的标识
    pub fn ids(&self) -> Vec<&str> {
        self.candidates.iter().map(|c| c.candidate_id()).collect()
    }
}

impl<'a, C> IntoIterator for &'a Resolution<C> {
    type Item = &'a Arc<C>;
    type IntoIter = std::slice::Iter<'a, Arc<C>>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}

/// 查询转换器
///
/// 在匹配之前改写查询，一个查询可以展开成多个。需要保留原查询的转换器必须把它一并返回。
pub trait ResolvableTransformer: Send + Sync + fmt::Debug {
    fn transform(&self, resolvable: Resolvable) -> Vec<Resolvable>;
}

/// 候选项种类相关的解析策略
pub trait ResolutionStrategy<C: Candidate>: Send + Sync {
    /// 候选项是否满足查询
    fn matches(&self, resolvable: &Resolvable, candidate: &C) -> bool;

    /// 匹配前依次应用的转换器
    fn transformers(&self) -> &[Box<dyn ResolvableTransformer>] {
        &[]
    }

    /// 对匹配结果进一步收窄
    fn filter_result(&self, matched: Vec<Arc<C>>) -> Vec<Arc<C>> {
        matched
    }

    /// 对最终结果排序
    fn sort_result(&self, matched: Vec<Arc<C>>) -> Vec<Arc<C>> {
        matched
    }
}
