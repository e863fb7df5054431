//! Centralized integration tests for di-impl crate
use di_abstractions::{
    AnnotatedMethod, AnnotatedType, Bean, DisposalMethod, LifecycleCallbackInvoker, Qualifier,
    Resolvable, TypeDescriptor,
};
use di_impl::BeanManager;
use infrastructure_common::{init_logging, ContainerConfig, DefinitionError, LifecycleMarker};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::NamedTempFile;

fn repository() -> TypeDescriptor {
    TypeDescriptor::class("Repository")
}

fn repository_manager() -> BeanManager {
    BeanManager::builder()
        .with_beans((0..16).map(|index| {
            Bean::builder(format!("repository-{index:02}"), repository())
                .with_qualifier(Qualifier::named(format!("shard-{}", index % 4)))
                .build()
        }))
        .build()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_resolution_shares_one_result() {
    let manager = Arc::new(repository_manager());
    let query = Resolvable::builder()
        .add_type(repository())
        .add_qualifier(Qualifier::named("shard-1"))
        .build();

    let handles: Vec<_> = (0..32)
        .map(|_| {
            let manager = Arc::clone(&manager);
            let query = query.clone();
            tokio::task::spawn_blocking(move || manager.resolve(&query))
        })
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }

    let first = &results[0];
    assert_eq!(
        first.ids(),
        vec!["repository-01", "repository-05", "repository-09", "repository-13"]
    );
    assert!(results.iter().all(|result| Arc::ptr_eq(result, first)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_lifecycle_invoker_registry() {
    #[derive(Debug)]
    struct Cache;

    let manager = Arc::new(BeanManager::builder().build());
    let created = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let manager = Arc::clone(&manager);
            let created = Arc::clone(&created);
            tokio::task::spawn_blocking(move || {
                let annotated = AnnotatedType::<Cache>::new().with_method(
                    AnnotatedMethod::new("warm", move |_: &Cache| {
                        created.fetch_add(1, Ordering::SeqCst);
                        Ok(())
                    })
                    .with_marker(LifecycleMarker::PostConstruct),
                );
                manager.lifecycle_invoker(&annotated, None)
            })
        })
        .collect();

    let mut invokers = Vec::new();
    for handle in handles {
        invokers.push(handle.await.unwrap());
    }

    assert!(invokers.iter().all(|invoker| Arc::ptr_eq(invoker, &invokers[0])));
    assert_eq!(manager.lifecycle_invoker_count(), 1);

    invokers[0].post_construct(&Cache, None).unwrap();
    assert_eq!(created.load(Ordering::SeqCst), 1);
}

#[test]
fn test_manager_reports_definition_errors() {
    let connection = TypeDescriptor::class("Connection");
    let manager = BeanManager::builder()
        .with_bean(Bean::builder("pools", TypeDescriptor::class("Pools")).build())
        .with_bean(Bean::builder("Pools#connection", connection.clone()).produced_by("pools").build())
        .with_disposal_method(DisposalMethod::builder("Pools#close", "pools", connection.clone()).build())
        .with_disposal_method(DisposalMethod::builder("Pools#release", "pools", connection).build())
        .build();

    let errors = manager.validate().unwrap_err();
    assert_eq!(
        errors,
        vec![DefinitionError::MultipleDisposalMethods {
            producer: "Pools#connection".to_string(),
            disposers: vec!["Pools#close".to_string(), "Pools#release".to_string()],
        }]
    );
}

#[test]
fn test_configuration_drives_resolution_and_logging() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[resolution]
raw_type_fallback = true

[resolution.type_aliases]
long = "Long"

[logging]
level = "debug"
show_thread_ids = true
"#
    )
    .unwrap();

    let config = ContainerConfig::load(Some(file.path())).unwrap();
    assert!(config.resolution.raw_type_fallback);
    assert!(config.logging.show_thread_ids);
    init_logging(&config.logging).unwrap();

    let manager = BeanManager::builder()
        .with_bean(Bean::builder("ids", TypeDescriptor::class("List")).build())
        .with_bean(Bean::builder("timeout", TypeDescriptor::class("Long")).build())
        .with_config(config.resolution)
        .build();

    let parameterized = TypeDescriptor::parameterized("List", [TypeDescriptor::class("Long")]);
    assert_eq!(manager.resolve(&Resolvable::of_type(parameterized)).ids(), vec!["ids"]);
    assert_eq!(
        manager.resolve(&Resolvable::of_type(TypeDescriptor::class("long"))).ids(),
        vec!["timeout"]
    );
}
