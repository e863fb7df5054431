//! 通用类型安全解析引擎

use dashmap::DashMap;
use di_abstractions::{Candidate, Resolution, Resolvable, ResolutionStrategy};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// 类型安全解析器
///
/// 候选集在构造时固定。每个不同的 [`Resolvable`] 只缓存一个结果：
/// 并发计算同一个键时，先写入的结果胜出，其余线程丢弃自己的计算并返回已缓存的结果，
/// 因此同一个查询总是得到同一个 `Arc`。
pub struct TypeSafeResolver<C, S> {
    candidates: Vec<Arc<C>>,
    strategy: S,
    resolved: DashMap<Resolvable, Arc<Resolution<C>>>,
}

impl<C, S> TypeSafeResolver<C, S>
where
    C: Candidate,
    S: ResolutionStrategy<C>,
{
    /// 创建解析器
    pub fn new(candidates: impl IntoIterator<Item = Arc<C>>, strategy: S) -> Self {
        let candidates: Vec<Arc<C>> = candidates.into_iter().collect();
        debug!("创建类型安全解析器，候选项数量: {}", candidates.len());
        Self {
            candidates,
            strategy,
            resolved: DashMap::new(),
        }
    }

    /// 解析查询，结果按查询缓存
    pub fn resolve(&self, resolvable: &Resolvable) -> Arc<Resolution<C>> {
        if let Some(cached) = self.resolved.get(resolvable).map(|entry| Arc::clone(entry.value())) {
            trace!("解析缓存命中: {}", resolvable);
            return cached;
        }

        let computed = Arc::new(self.find_matching(resolvable));
        debug!("解析 {} -> {:?}", resolvable, computed.ids());

        let entry = self
            .resolved
            .entry(resolvable.clone())
            .or_insert(computed);
        Arc::clone(entry.value())
    }

    fn find_matching(&self, resolvable: &Resolvable) -> Resolution<C> {
        let transformed = self.transform(resolvable);

        // 按候选集中的位置去重，保持注册顺序
        let mut matched_positions = BTreeSet::new();
        for query in &transformed {
            for (position, candidate) in self.candidates.iter().enumerate() {
                if self.strategy.matches(query, candidate) {
                    matched_positions.insert(position);
                }
            }
        }

        let matched = matched_positions
            .into_iter()
            .map(|position| Arc::clone(&self.candidates[position]))
            .collect();
        let filtered = self.strategy.filter_result(matched);
        Resolution::new(self.strategy.sort_result(filtered))
    }

    fn transform(&self, resolvable: &Resolvable) -> Vec<Resolvable> {
        let mut queries = vec![resolvable.clone()];
        for transformer in self.strategy.transformers() {
            queries = queries
                .into_iter()
                .flat_map(|query| transformer.transform(query))
                .collect();
        }
        queries
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn candidates(&self) -> &[Arc<C>] {
        &self.candidates
    }

    /// 已缓存的查询数量
    pub fn cached_resolutions(&self) -> usize {
        self.resolved.len()
    }
}

impl<C, S> fmt::Debug for TypeSafeResolver<C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeSafeResolver")
            .field("candidates", &self.candidates.len())
            .field("cached_resolutions", &self.resolved.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use di_abstractions::{ResolvableTransformer, TypeDescriptor};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct Tagged {
        id: &'static str,
        ty: TypeDescriptor,
    }

    impl Candidate for Tagged {
        fn candidate_id(&self) -> &str {
            self.id
        }
    }

    #[derive(Debug, Default)]
    struct CountingStrategy {
        calls: AtomicUsize,
        transformers: Vec<Box<dyn ResolvableTransformer>>,
    }

    impl ResolutionStrategy<Tagged> for CountingStrategy {
        fn matches(&self, resolvable: &Resolvable, candidate: &Tagged) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            resolvable.types().contains(&candidate.ty)
        }

        fn transformers(&self) -> &[Box<dyn ResolvableTransformer>] {
            &self.transformers
        }

        fn sort_result(&self, mut matched: Vec<Arc<Tagged>>) -> Vec<Arc<Tagged>> {
            matched.reverse();
            matched
        }
    }

    /// 额外查询 `Alias` 类型
    #[derive(Debug)]
    struct AliasTransformer;

    impl ResolvableTransformer for AliasTransformer {
        fn transform(&self, resolvable: Resolvable) -> Vec<Resolvable> {
            let alias = resolvable.with_types([TypeDescriptor::class("Alias")]);
            vec![resolvable, alias]
        }
    }

    fn tagged(id: &'static str, name: &str) -> Arc<Tagged> {
        Arc::new(Tagged {
            id,
            ty: TypeDescriptor::class(name),
        })
    }

    #[test]
    fn test_empty_candidate_set_yields_empty_result() {
        let resolver = TypeSafeResolver::new(Vec::<Arc<Tagged>>::new(), CountingStrategy::default());
        let result = resolver.resolve(&Resolvable::of_type(TypeDescriptor::class("Missing")));
        assert!(result.is_empty());
    }

    #[test]
    fn test_result_is_cached_by_value() {
        let resolver = TypeSafeResolver::new(
            vec![tagged("a", "A"), tagged("b", "B")],
            CountingStrategy::default(),
        );

        let first = resolver.resolve(&Resolvable::of_type(TypeDescriptor::class("A")));
        let calls_after_first = resolver.strategy().calls.load(Ordering::SeqCst);
        let second = resolver.resolve(&Resolvable::of_type(TypeDescriptor::class("A")));

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(resolver.strategy().calls.load(Ordering::SeqCst), calls_after_first);
        assert_eq!(resolver.cached_resolutions(), 1);
        assert_eq!(first.ids(), vec!["a"]);
    }

    #[test]
    fn test_transformed_queries_are_unioned_and_sorted() {
        let strategy = CountingStrategy {
            transformers: vec![Box::new(AliasTransformer)],
            ..CountingStrategy::default()
        };
        let resolver = TypeSafeResolver::new(
            vec![tagged("alias", "Alias"), tagged("a", "A"), tagged("other", "Other")],
            strategy,
        );

        let result = resolver.resolve(&Resolvable::of_type(TypeDescriptor::class("A")));
        // 注册顺序为 alias, a，sort_result 反转
        assert_eq!(result.ids(), vec!["a", "alias"]);

        // 缓存键是原始查询，而不是转换后的查询
        assert_eq!(resolver.cached_resolutions(), 1);
        let alias_only = resolver.resolve(&Resolvable::of_type(TypeDescriptor::class("Alias")));
        assert_eq!(alias_only.ids(), vec!["alias"]);
    }

    #[test]
    fn test_concurrent_resolution_publishes_one_result() {
        let resolver = Arc::new(TypeSafeResolver::new(
            vec![tagged("a", "A")],
            CountingStrategy::default(),
        ));
        let query = Resolvable::of_type(TypeDescriptor::class("A"));

        let results: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let resolver = Arc::clone(&resolver);
                    let query = query.clone();
                    scope.spawn(move || resolver.resolve(&query))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let first = &results[0];
        assert!(results.iter().all(|r| Arc::ptr_eq(r, first)));
        assert_eq!(resolver.cached_resolutions(), 1);
    }
}
