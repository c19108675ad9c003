//! End-to-end integration test for the job persistence flow
//!
//! This test exercises the complete path a job takes before it is written:
//! name filtering -> snapshot -> property filtering -> provisioning.

use chrono::{TimeZone, Utc};
use resource_helper::{
    HelperConfig, PropertyFilter, Provisioner, clone_value_map, ensure_folder_path,
    join_filtered,
};
use resource_store::{
    BUNDLE_EVENT_STARTED, BUNDLE_EVENT_UPDATED, BinaryStream, MemoryStore, MemoryValueMap,
    PropertyValue, RESOURCE_TYPE_PROPERTY, ResourcePath, ResourceStore, ResourceType,
};
use std::fs;
use tempfile::TempDir;

const JOBS_ROOT: &str = "/var/eventing/jobs";
const EVENTS_ROOT: &str = "/var/eventing/events";

/// Properties of an incoming job event, transport keys included
fn incoming_job(payload: BinaryStream) -> MemoryValueMap {
    MemoryValueMap::new()
        .with("event.topics", "org/apache/sling/jobs/export")
        .with("event.distribute", "true")
        .with("slingevent:eventId", "2024/1/1/export_1")
        .with(RESOURCE_TYPE_PROPERTY, ResourceType::Job.as_str())
        .with("title", "nightly export")
        .with("created", Utc.with_ymd_and_hms(2024, 1, 1, 3, 0, 0).unwrap())
        .with("payload", payload)
}

#[test]
fn test_job_is_persisted_under_filtered_topic() {
    let store = MemoryStore::new();
    let topic = "org/apache/sling/jobs/export";
    let view = incoming_job(BinaryStream::from_bytes(b"rows".to_vec()));

    let topic_path = join_filtered(&ResourcePath::parse(JOBS_ROOT), topic);
    ensure_folder_path(&store, &topic_path).unwrap();

    let job_name = "2024/1/1/export_1";
    let job_path = join_filtered(&topic_path, job_name);
    let props = clone_value_map(&view).persistable(&PropertyFilter::default());
    assert!(!props.has_read_error());

    let provisioner = Provisioner::default();
    let job = provisioner.ensure_resource(&store, &job_path, &props).unwrap();

    assert_eq!(
        job.path().to_string(),
        "/var/eventing/jobs/org_apache_sling_jobs_export/_2024_1_1_export_1"
    );
    assert_eq!(job.resource_type(), ResourceType::Job.as_str());
    assert_eq!(job.property("payload"), Some(&PropertyValue::Binary(b"rows".to_vec())));
    assert!(job.property("event.topics").is_none());
    assert!(job.property("slingevent:eventId").is_none());

    let topic_node = store.resolve(&topic_path).unwrap().unwrap();
    assert_eq!(topic_node.resource_type(), ResourceType::Folder.as_str());
}

#[test]
fn test_bundle_events_are_stored_per_topic() {
    let store = MemoryStore::new();
    let events_root = ResourcePath::parse(EVENTS_ROOT);

    for (topic, bundle) in [
        (BUNDLE_EVENT_UPDATED, "org.example.core"),
        (BUNDLE_EVENT_STARTED, "org.example.core"),
        (BUNDLE_EVENT_STARTED, "org.example.web"),
    ] {
        let view = MemoryValueMap::new()
            .with("event.topics", topic)
            .with(RESOURCE_TYPE_PROPERTY, ResourceType::Event.as_str())
            .with("bundle.symbolicName", bundle);
        let props = clone_value_map(&view).persistable(&PropertyFilter::default());
        let path = join_filtered(&join_filtered(&events_root, topic), bundle);
        resource_helper::ensure_resource(&store, &path, &props).unwrap();
    }

    let updated = join_filtered(&events_root, BUNDLE_EVENT_UPDATED);
    let started = join_filtered(&events_root, BUNDLE_EVENT_STARTED);
    assert_eq!(
        updated.to_string(),
        "/var/eventing/events/org_osgi_framework_BundleEvent_UPDATED"
    );
    assert_eq!(
        started.to_string(),
        "/var/eventing/events/org_osgi_framework_BundleEvent_STARTED"
    );

    let event = store
        .resolve(&started.join("org.example.web"))
        .unwrap()
        .unwrap();
    assert_eq!(event.resource_type(), ResourceType::Event.as_str());
    assert!(event.property("event.topics").is_none());
    assert_eq!(
        event.property("bundle.symbolicName"),
        Some(&PropertyValue::from("org.example.web"))
    );
    assert!(store.contains(&updated.join("org.example.core")));
    assert!(!store.contains(&updated.join("org.example.web")));
}

#[test]
fn test_unreadable_payload_is_visible_to_caller() {
    let store = MemoryStore::new();
    let view = incoming_job(BinaryStream::consumed());

    let props = clone_value_map(&view).persistable(&PropertyFilter::default());

    // The caller decides: here it drops the broken property and persists the rest
    assert!(props.has_read_error());
    assert_eq!(props.unreadable_keys(), vec!["payload"]);
    let cleaned: resource_helper::PropertySnapshot = props
        .iter()
        .filter(|(k, v)| !v.contains_stream() && k.as_str() != resource_helper::READ_ERROR_MARKER)
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect::<std::collections::BTreeMap<_, _>>()
        .into();

    let job_path = ResourcePath::parse(JOBS_ROOT).join("job-2");
    let job = resource_helper::ensure_resource(&store, &job_path, &cleaned).unwrap();

    assert!(job.property("payload").is_none());
    assert_eq!(job.property("title"), Some(&PropertyValue::from("nightly export")));
}

#[test]
fn test_snapshot_of_stored_resource_round_trips_to_json() {
    let store = MemoryStore::new();
    let path = ResourcePath::parse("/var/eventing/jobs/job-3");
    let props = clone_value_map(&incoming_job(BinaryStream::from_bytes(vec![1, 2])))
        .persistable(&PropertyFilter::default());
    let job = resource_helper::ensure_resource(&store, &path, &props).unwrap();

    let again = clone_value_map(&job.value_map());
    let json = serde_json::to_value(&again).unwrap();

    assert_eq!(json["title"], "nightly export");
    assert_eq!(json["payload"], serde_json::json!([1, 2]));
    assert_eq!(json["created"], "2024-01-01T03:00:00Z");
    assert!(json.get(resource_helper::READ_ERROR_MARKER).is_none());
}

#[test]
fn test_config_file_drives_filter_and_provisioner() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("helper.toml");
    fs::write(
        &config_path,
        r#"
[retry]
max_attempts = 7

[ignored_properties]
"title" = "derived from the topic"
"#,
    )
    .unwrap();

    let config = HelperConfig::load(&config_path).unwrap();
    let filter = PropertyFilter::from_config(&config);
    let provisioner = Provisioner::from_config(&config);
    assert_eq!(provisioner.policy().max_attempts(), 7);

    let store = MemoryStore::new();
    let props = clone_value_map(&incoming_job(BinaryStream::from_bytes(vec![0]))).persistable(&filter);
    let job = provisioner
        .ensure_resource(&store, &ResourcePath::parse("/jobs/job-4"), &props)
        .unwrap();

    assert!(job.property("title").is_none());
    assert!(job.property("created").is_some());
}
