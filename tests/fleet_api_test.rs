// ==========================================
// 船队分级 API 集成测试
// ==========================================
// 职责: 验证分级规则、船队排序、存油更新与告警同步
// ==========================================

mod helpers;

use bunker_planning::api::MutationStatus;
use bunker_planning::config::ConfigManager;
use bunker_planning::domain::{BunkerPlanStatus, FuelType, NotificationType, PriorityTier, TaskPriority, UserRole};
use bunker_planning::engine::{ClassificationRule, VesselIssue};
use bunker_planning::{ApiError, AppState};
use helpers::fixture_builder::*;
use std::collections::BTreeMap;

fn app() -> AppState {
    AppState::in_memory(fleet_snapshot(), ConfigManager::new())
}

#[test]
fn test_fleet_overview_orders_by_tier() {
    let app = app();
    let overview = app.fleet_api.fleet_overview(base_time()).unwrap();

    let order: Vec<&str> = overview.assessments.iter().map(|a| a.imo.as_str()).collect();
    // 同层保持输入顺序
    assert_eq!(order, vec!["9000001", "9000002", "9000003", "9000004"]);

    assert_eq!(overview.summary.total, 4);
    assert_eq!(overview.summary.critical, 1);
    assert_eq!(overview.summary.attention, 2);
    assert_eq!(overview.summary.on_track, 1);
}

#[test]
fn test_low_rob_without_plan_is_critical() {
    let app = app();
    let assessment = app
        .fleet_api
        .classify_vessel("9000001", base_time())
        .unwrap()
        .unwrap();

    assert_eq!(assessment.tier(), PriorityTier::Critical);
    assert_eq!(assessment.classification.issue_kinds(), vec!["low_rob", "no_bunker_plan"]);
    // 按船名兼容关联到货盘
    assert_eq!(assessment.related_cargo_id.as_deref(), Some("C-PA"));
}

#[test]
fn test_over_consumption_extra_cost() {
    let app = app();
    let assessment = app
        .fleet_api
        .classify_vessel("9000002", base_time())
        .unwrap()
        .unwrap();

    assert_eq!(assessment.classification.rule, ClassificationRule::OverConsumption);
    match &assessment.classification.issues[0] {
        VesselIssue::OverConsumption { extra_daily_cost_usd, .. } => {
            assert!((extra_daily_cost_usd - 780.0).abs() < 1e-6);
        }
        other => panic!("unexpected issue: {:?}", other),
    }
}

#[test]
fn test_bunker_soon_uses_plan_by_id() {
    let app = app();
    let assessment = app
        .fleet_api
        .classify_vessel("9000003", base_time())
        .unwrap()
        .unwrap();

    assert_eq!(assessment.classification.rule, ClassificationRule::BunkerSoon);
    assert_eq!(assessment.bunker_plan_id.as_deref(), Some("BP-3"));
    match &assessment.classification.issues[0] {
        VesselIssue::BunkerSoon { plan_status, next_port, .. } => {
            assert_eq!(*plan_status, BunkerPlanStatus::PendingApproval);
            assert_eq!(next_port.as_deref(), Some("Fujairah"));
        }
        other => panic!("unexpected issue: {:?}", other),
    }
}

#[test]
fn test_unknown_vessel_classifies_to_none() {
    let app = app();
    assert!(app.fleet_api.classify_vessel("0000000", base_time()).unwrap().is_none());
}

#[test]
fn test_update_rob_reclassifies() {
    let app = app();
    let rob = BTreeMap::from([(FuelType::Vlsfo, 900.0)]);
    let outcome = app
        .fleet_api
        .update_vessel_rob("9000001", &rob, Some(UserRole::Operations))
        .unwrap();
    assert_eq!(outcome.status, MutationStatus::Applied);

    let vessel = app.store.find_vessel("9000001").unwrap().unwrap();
    assert_eq!(vessel.rob(FuelType::Vlsfo), 900.0);
    // 部分更新不影响其他油品
    assert_eq!(vessel.rob(FuelType::Lsmgo), 60.0);

    let needing = app.fleet_api.vessels_needing_intervention(base_time()).unwrap();
    assert!(needing.iter().all(|a| a.imo != "9000001"));
}

#[test]
fn test_negative_rob_is_rejected_without_change() {
    let app = app();
    let before = app.store.snapshot().unwrap();

    let rob = BTreeMap::from([(FuelType::Vlsfo, -5.0)]);
    let err = app.fleet_api.update_vessel_rob("9000001", &rob, None).unwrap_err();
    assert!(matches!(err, ApiError::ValidationError(_)));
    assert_eq!(app.store.snapshot().unwrap(), before);
}

#[test]
fn test_update_rob_unknown_vessel_is_noop() {
    let app = app();
    let rob = BTreeMap::from([(FuelType::Vlsfo, 100.0)]);
    let outcome = app.fleet_api.update_vessel_rob("0000000", &rob, None).unwrap();
    assert_eq!(outcome.status, MutationStatus::NotFound);
    assert!(app.store.recent_actions(10).unwrap().is_empty());
}

#[test]
fn test_approve_plan_lifecycle() {
    let app = app();
    let outcome = app
        .fleet_api
        .approve_bunker_plan("BP-3", Some(UserRole::BunkerDesk))
        .unwrap();
    assert!(outcome.is_applied());

    // 再次审批: 幂等
    let again = app.fleet_api.approve_bunker_plan("BP-3", None).unwrap();
    assert_eq!(again.status, MutationStatus::NoOp);

    let missing = app.fleet_api.approve_bunker_plan("BP-404", None).unwrap();
    assert_eq!(missing.status, MutationStatus::NotFound);
}

#[test]
fn test_approving_draft_plan_is_invalid_transition() {
    let app = app();
    app.fleet_api
        .upsert_bunker_plan(bunker_plan("BP-1", "9000001", BunkerPlanStatus::None), None)
        .unwrap();

    let err = app.fleet_api.approve_bunker_plan("BP-1", None).unwrap_err();
    assert!(matches!(err, ApiError::InvalidStateTransition { .. }));

    // 计划已存在 (未审批) → 仍为 CRITICAL, 建议里带计划 id
    let assessment = app
        .fleet_api
        .classify_vessel("9000001", base_time())
        .unwrap()
        .unwrap();
    assert_eq!(assessment.tier(), PriorityTier::Critical);
    assert!(assessment.classification.recommendation.contains("BP-1"));
}

#[test]
fn test_approved_plan_clears_critical() {
    let app = app();
    app.fleet_api
        .upsert_bunker_plan(
            bunker_plan("BP-1", "9000001", BunkerPlanStatus::PendingApproval),
            Some(UserRole::BunkerDesk),
        )
        .unwrap();
    app.fleet_api.approve_bunker_plan("BP-1", Some(UserRole::Management)).unwrap();

    let assessment = app
        .fleet_api
        .classify_vessel("9000001", base_time())
        .unwrap()
        .unwrap();
    assert_ne!(assessment.tier(), PriorityTier::Critical);
}

#[test]
fn test_sync_alerts_is_deduplicated() {
    let app = app();
    let first = app.fleet_api.sync_alerts(base_time()).unwrap();
    assert_eq!(first.notifications_added, 3);
    assert_eq!(first.tasks_added, 1);

    let notifications = app.store.read(|s| s.notifications.clone()).unwrap();
    let low_rob = notifications
        .iter()
        .find(|n| n.dedupe_key.as_deref() == Some("low_rob:9000001"))
        .unwrap();
    assert_eq!(low_rob.notification_type, NotificationType::Urgent);
    assert_eq!(low_rob.title, "Low ROB: PACIFIC DAWN");

    let tasks = app.store.read(|s| s.pending_tasks.clone()).unwrap();
    let plan_task = tasks
        .iter()
        .find(|t| t.dedupe_key.as_deref() == Some("no_bunker_plan:9000001"))
        .unwrap();
    assert_eq!(plan_task.role, UserRole::BunkerDesk);
    assert_eq!(plan_task.priority, TaskPriority::Urgent);

    // 未读期间重复同步: 全部跳过
    let second = app.fleet_api.sync_alerts(base_time()).unwrap();
    assert_eq!(second.notifications_added, 0);
    assert_eq!(second.tasks_added, 0);
    assert_eq!(second.skipped_duplicates, 4);

    // 运营已读后, 仍在持续的两条告警重新提醒; BUNKER_DESK 通知与待办仍在, 继续跳过
    app.notification_api.mark_all_as_read(UserRole::Operations).unwrap();
    let third = app.fleet_api.sync_alerts(base_time()).unwrap();
    assert_eq!(third.notifications_added, 2);
    assert_eq!(third.tasks_added, 0);
    assert_eq!(third.skipped_duplicates, 2);
}

#[test]
fn test_low_rob_relapse_notifies_again() {
    let app = app();
    app.fleet_api.sync_alerts(base_time()).unwrap();
    app.notification_api.mark_all_as_read(UserRole::Operations).unwrap();

    // 补油后恢复正常
    let refuelled = BTreeMap::from([(FuelType::Vlsfo, 900.0)]);
    app.fleet_api.update_vessel_rob("9000001", &refuelled, None).unwrap();
    app.fleet_api.sync_alerts(base_time()).unwrap();
    app.notification_api.mark_all_as_read(UserRole::Operations).unwrap();

    // 再次跌破安全线
    let depleted = BTreeMap::from([(FuelType::Vlsfo, 100.0)]);
    app.fleet_api.update_vessel_rob("9000001", &depleted, None).unwrap();
    let report = app.fleet_api.sync_alerts(base_time()).unwrap();
    assert_eq!(report.notifications_added, 2);

    let unread = app.notification_api.unread_for(UserRole::Operations).unwrap();
    let low_rob = unread
        .iter()
        .find(|v| v.notification.dedupe_key.as_deref() == Some("low_rob:9000001"))
        .unwrap();
    assert_eq!(low_rob.notification.notification_type, NotificationType::Urgent);
}
