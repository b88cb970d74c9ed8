// ==========================================
// 实体存储持久化集成测试
// ==========================================
// 职责: JSON 快照往返 / 持久化失败时不产生部分写入
// ==========================================

mod helpers;

use bunker_planning::analysis::ImmediateAnalysisCollaborator;
use bunker_planning::config::{config_keys, ConfigManager};
use bunker_planning::domain::{ActionType, CargoStatus, UserRole};
use bunker_planning::store::{
    EntitySnapshot, EntityStore, InMemorySnapshotProvider, JsonFileSnapshotProvider, SnapshotProvider,
    StoreError, StoreResult,
};
use bunker_planning::{ApiError, AppState};
use helpers::fixture_builder::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// 可切换失败的快照提供者
struct FlakyProvider {
    initial: EntitySnapshot,
    fail: AtomicBool,
}

impl SnapshotProvider for FlakyProvider {
    fn load(&self) -> StoreResult<EntitySnapshot> {
        Ok(self.initial.clone())
    }

    fn persist(&self, _snapshot: &EntitySnapshot) -> StoreResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            Err(StoreError::Persistence("disk full".to_string()))
        } else {
            Ok(())
        }
    }
}

/// 前 N 次持久化成功, 之后全部失败
struct QuotaProvider {
    initial: EntitySnapshot,
    remaining: AtomicUsize,
}

impl SnapshotProvider for QuotaProvider {
    fn load(&self) -> StoreResult<EntitySnapshot> {
        Ok(self.initial.clone())
    }

    fn persist(&self, _snapshot: &EntitySnapshot) -> StoreResult<()> {
        let left = self.remaining.load(Ordering::SeqCst);
        if left == 0 {
            return Err(StoreError::Persistence("quota exhausted".to_string()));
        }
        self.remaining.store(left - 1, Ordering::SeqCst);
        Ok(())
    }
}

#[test]
fn test_json_snapshot_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.json");

    let seed = JsonFileSnapshotProvider::new(&path);
    seed.persist(&fleet_snapshot()).unwrap();

    {
        let app = AppState::new(
            ConfigManager::new(),
            Arc::new(JsonFileSnapshotProvider::new(&path)),
            Arc::new(ImmediateAnalysisCollaborator),
        )
        .unwrap();
        app.cargo_api.fix_cargo("C-350", Some(UserRole::Chartering)).unwrap();
        app.task_api.complete_pending_task("T-3").unwrap();
    }

    let reloaded = EntityStore::with_provider(Arc::new(JsonFileSnapshotProvider::new(&path))).unwrap();
    let snapshot = reloaded.snapshot().unwrap();
    assert_eq!(snapshot.cargo("C-350").unwrap().status, CargoStatus::Fixed);
    assert!(snapshot.pending_tasks.iter().all(|t| t.id != "T-3"));

    let actions: Vec<ActionType> = snapshot.action_log.iter().map(|a| a.action_type).collect();
    assert_eq!(actions, vec![ActionType::FixCargo, ActionType::CompleteTask]);
}

#[test]
fn test_persist_failure_leaves_store_unchanged() {
    let provider = Arc::new(FlakyProvider {
        initial: fleet_snapshot(),
        fail: AtomicBool::new(true),
    });
    let app = AppState::new(
        ConfigManager::new(),
        provider.clone(),
        Arc::new(ImmediateAnalysisCollaborator),
    )
    .unwrap();
    let before = app.store.snapshot().unwrap();

    let err = app.cargo_api.fix_cargo("C-350", None).unwrap_err();
    assert!(matches!(err, ApiError::InternalError(_)));
    assert!(err.user_message().contains("disk full"));
    assert_eq!(app.store.snapshot().unwrap(), before);

    provider.fail.store(false, Ordering::SeqCst);
    assert!(app.cargo_api.fix_cargo("C-350", None).unwrap().is_applied());
}

#[test]
fn test_failed_alert_sync_leaves_no_partial_writes() {
    let provider = Arc::new(QuotaProvider {
        initial: fleet_snapshot(),
        remaining: AtomicUsize::new(1),
    });
    let app = AppState::new(
        ConfigManager::new(),
        provider,
        Arc::new(ImmediateAnalysisCollaborator),
    )
    .unwrap();

    // 用掉唯一一次成功的持久化
    assert!(app.notification_api.mark_as_read("N-2").unwrap().is_applied());
    let before = app.store.snapshot().unwrap();

    let err = app.fleet_api.sync_alerts(base_time()).unwrap_err();
    assert!(matches!(err, ApiError::InternalError(_)));

    let after = app.store.snapshot().unwrap();
    assert_eq!(after.notifications.len(), before.notifications.len());
    assert_eq!(after.pending_tasks.len(), before.pending_tasks.len());
    assert_eq!(after, before);
}

#[test]
fn test_action_log_retention_is_configurable() {
    let provider = Arc::new(InMemorySnapshotProvider::new(fleet_snapshot()));
    let config = ConfigManager::from_pairs([(config_keys::ACTION_LOG_LIMIT, "2")]);
    let app = AppState::new(config, provider.clone(), Arc::new(ImmediateAnalysisCollaborator)).unwrap();
    assert_eq!(app.store.action_log_limit(), 2);

    app.notification_api.mark_as_read("N-1").unwrap();
    app.notification_api.mark_as_read("N-2").unwrap();
    app.task_api.complete_pending_task("T-3").unwrap();

    let persisted = provider.current().unwrap();
    let actions: Vec<ActionType> = persisted.action_log.iter().map(|a| a.action_type).collect();
    assert_eq!(actions, vec![ActionType::MarkRead, ActionType::CompleteTask]);
    assert_eq!(persisted.action_log[0].target_id, "N-2");
}
