use std::time::Duration;

use toasthub::{ManagerConfig, Severity, ToastId, ToastManager, ToastOptions, load_config};

fn manager_with_capacity(capacity: usize) -> ToastManager {
    ToastManager::new(&ManagerConfig {
        capacity,
        ..ManagerConfig::default()
    })
}

fn active_ids(manager: &ToastManager) -> Vec<ToastId> {
    manager.snapshot().iter().map(|t| t.id).collect()
}

async fn advance_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

#[tokio::test(start_paused = true)]
async fn capacity_bound_holds_across_inserts() {
    let manager = manager_with_capacity(3);
    for i in 0..8 {
        manager.info(format!("msg {i}"), ToastOptions::default());
        assert!(manager.len() <= 3, "collection exceeded capacity at insert {i}");
    }
    assert_eq!(manager.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn eviction_drops_oldest_first() {
    let manager = manager_with_capacity(2);
    let a = manager.info("a", ToastOptions::default());
    let b = manager.success("b", ToastOptions::default());
    let c = manager.warning("c", ToastOptions::default());
    assert_eq!(active_ids(&manager), vec![b, c]);
    assert!(manager.get(a).is_none());
}

#[tokio::test(start_paused = true)]
async fn default_capacity_keeps_last_five_in_order() {
    let manager = ToastManager::default();
    let ids: Vec<ToastId> = (0..6)
        .map(|i| manager.notify(Severity::Info, format!("msg {i}"), ToastOptions::default()))
        .collect();
    assert_eq!(active_ids(&manager), ids[1..].to_vec());
}

#[tokio::test(start_paused = true)]
async fn remove_is_idempotent() {
    let manager = ToastManager::default();
    let id = manager.error("boom", ToastOptions::default().unbounded());
    manager.remove(id);
    assert!(manager.is_empty());
    // Second removal and a never-issued id are both no-ops.
    manager.remove(id);
    manager.remove(ToastId(9999));
    assert!(manager.is_empty());
}

#[tokio::test(start_paused = true)]
async fn toast_expires_after_its_lifetime() {
    let manager = ToastManager::default();
    let id = manager.info("short lived", ToastOptions::default().duration_ms(100));
    advance_ms(50).await;
    assert!(manager.get(id).is_some(), "toast gone before its lifetime elapsed");
    advance_ms(60).await;
    assert!(manager.get(id).is_none(), "toast survived past its lifetime");
}

#[tokio::test(start_paused = true)]
async fn zero_duration_expires_on_next_tick() {
    let manager = ToastManager::default();
    let id = manager.info("blink", ToastOptions::default().duration_ms(0));
    advance_ms(1).await;
    assert!(manager.get(id).is_none());
}

#[tokio::test(start_paused = true)]
async fn unbounded_toast_stays_until_removed() {
    let manager = ToastManager::default();
    let id = manager.warning("sticky", ToastOptions::default().unbounded());
    advance_ms(60_000).await;
    assert!(manager.get(id).is_some());
    manager.remove(id);
    assert!(manager.get(id).is_none());
}

#[tokio::test(start_paused = true)]
async fn progress_decreases_monotonically_until_expiry() {
    let manager = ToastManager::default();
    let id = manager.info(
        "tracked",
        ToastOptions::default().duration_ms(200).show_progress(true),
    );

    let mut samples = vec![manager.get(id).map(|t| t.remaining_pct).unwrap()];
    for _ in 0..4 {
        advance_ms(45).await;
        let Some(toast) = manager.get(id) else {
            break;
        };
        samples.push(toast.remaining_pct);
    }

    for pair in samples.windows(2) {
        assert!(pair[1] <= pair[0], "progress increased: {samples:?}");
    }
    for pct in &samples {
        assert!((0.0..=100.0).contains(pct), "progress out of range: {samples:?}");
    }
    // Still alive just before the deadline, with some lifetime left.
    assert!(*samples.last().unwrap() > 0.0);

    advance_ms(30).await;
    assert!(manager.get(id).is_none());
}

#[tokio::test(start_paused = true)]
async fn removal_cancels_expiry_and_progress() {
    let manager = ToastManager::default();
    let id = manager.info(
        "cancelled early",
        ToastOptions::default().duration_ms(100).show_progress(true),
    );
    advance_ms(30).await;
    manager.remove(id);
    assert!(manager.is_empty());

    // Nothing left over fires after the natural deadline either.
    advance_ms(200).await;
    assert!(manager.is_empty());
    let later = manager.info("fresh", ToastOptions::default());
    assert_ne!(later, id, "removed id was reissued");
    assert_eq!(active_ids(&manager), vec![later]);
}

#[tokio::test(start_paused = true)]
async fn lowering_capacity_does_not_evict_retroactively() {
    let manager = ToastManager::default();
    let a = manager.info("a", ToastOptions::default());
    let b = manager.info("b", ToastOptions::default());
    let c = manager.info("c", ToastOptions::default());

    manager.set_capacity(2);
    assert_eq!(active_ids(&manager), vec![a, b, c]);

    // Each insertion evicts exactly one oldest record.
    let d = manager.info("d", ToastOptions::default());
    assert_eq!(active_ids(&manager), vec![b, c, d]);
}

#[tokio::test(start_paused = true)]
async fn zero_capacity_is_rejected() {
    let manager = manager_with_capacity(2);
    manager.set_capacity(0);
    assert_eq!(manager.capacity(), 2);

    manager.info("a", ToastOptions::default());
    manager.info("b", ToastOptions::default());
    manager.info("c", ToastOptions::default());
    assert_eq!(manager.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn shutdown_clears_everything() {
    let manager = ToastManager::default();
    manager.info("a", ToastOptions::default());
    manager.warning("b", ToastOptions::default().unbounded());
    manager.shutdown();
    assert!(manager.is_empty());
    advance_ms(10_000).await;
    assert!(manager.is_empty());
}

#[test]
fn config_defaults_match_contract() {
    let cfg = ManagerConfig::default();
    assert_eq!(cfg.capacity, 5);
    assert_eq!(cfg.default_duration_ms, 5000);
    assert!(cfg.show_progress);
    assert!(cfg.validate().is_ok());
}

#[test]
fn config_loads_partial_yaml_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("toasthub.yaml");
    std::fs::write(&path, "capacity: 3\n").unwrap();
    let cfg = load_config(&path).unwrap();
    assert_eq!(cfg.capacity, 3);
    assert_eq!(cfg.default_duration_ms, 5000);
    assert!(cfg.show_progress);
}

#[test]
fn config_rejects_zero_capacity() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("toasthub.yaml");
    std::fs::write(&path, "capacity: 0\n").unwrap();
    let err = load_config(&path).unwrap_err();
    assert!(err.to_string().contains("capacity"));
}

#[test]
fn config_missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yaml");
    let (resolved, cfg) = ManagerConfig::find_and_load(Some(path.clone())).unwrap();
    assert_eq!(resolved, path);
    assert_eq!(cfg.capacity, ManagerConfig::default().capacity);
}
