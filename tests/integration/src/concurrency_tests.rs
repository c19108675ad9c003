//! Many uncoordinated writers provisioning overlapping paths.

use resource_helper::{PropertySnapshot, Provisioner, RetryPolicy, ensure_folder_path, join_filtered};
use resource_store::{MemoryStore, ResourcePath, ResourceStore, ResourceType};
use resource_test_utils::{ConflictingStore, RacingStore};
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn test_writers_on_shared_topics_all_succeed() {
    let writers = 12;
    let topics = ["org/apache/a", "org/apache/b", "org/apache/c"];
    let store = Arc::new(MemoryStore::new());
    let barrier = Arc::new(Barrier::new(writers));
    let base = ResourcePath::parse("/var/eventing/jobs");

    let handles: Vec<_> = (0..writers)
        .map(|i| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            let topic_path = join_filtered(&base, topics[i % topics.len()]);
            thread::spawn(move || {
                barrier.wait();
                ensure_folder_path(&*store, &topic_path)?;
                let job_path = topic_path.join(format!("job-{i}"));
                Provisioner::default().ensure_resource(&*store, &job_path, &PropertySnapshot::default())
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread should not panic").unwrap();
    }

    for topic in topics {
        let node = store.resolve(&join_filtered(&base, topic)).unwrap().unwrap();
        assert_eq!(node.resource_type(), ResourceType::Folder.as_str());
    }
    // /var, /var/eventing, /var/eventing/jobs, three topics, twelve jobs
    assert_eq!(store.len(), 3 + topics.len() + writers);
}

#[test]
fn test_racing_store_with_four_writers() {
    let writers = 4;
    let store = Arc::new(RacingStore::new(writers));
    let path = ResourcePath::parse("/var/eventing/locks");

    let handles: Vec<_> = (0..writers)
        .map(|_| {
            let store = Arc::clone(&store);
            let path = path.clone();
            thread::spawn(move || ensure_folder_path(&*store, &path))
        })
        .collect();

    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    // Three creates lost, each absorbed by a single retry
    assert_eq!(store.conflicts(), (writers - 1) as u32);
    assert_eq!(store.calls(), (2 * writers - 1) as u32);
}

#[test]
fn test_shared_conflicting_store_counts_every_attempt() {
    let store = Arc::new(ConflictingStore::new());
    let provisioner = Arc::new(Provisioner::new(RetryPolicy::new(5)));

    let handles: Vec<_> = (0..3)
        .map(|i| {
            let store = Arc::clone(&store);
            let provisioner = Arc::clone(&provisioner);
            thread::spawn(move || {
                provisioner.ensure_folder_path(&*store, &ResourcePath::parse(&format!("/p{i}")))
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap().is_err());
    }
    assert_eq!(store.attempts(), 15);
}
