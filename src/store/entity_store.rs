// ==========================================
// 船舶燃油补给规划 - 实体存储
// ==========================================
// 职责: 持有 Vessel/Cargo/BunkerPlan/Notification/PendingTask 的权威集合
// 并发: 单个 RwLock; 读者拿到一致快照, 写操作串行
// 红线: 所有写入经由本模块定义的操作, 失败时存储保持不变
// ==========================================

use crate::domain::{
    ActionLog, ActionType, BunkerPlan, BunkerPlanStatus, Cargo, CargoStatus, FuelQuantities,
    Notification, PendingTask, UserRole, Vessel,
};
use crate::store::error::{StoreError, StoreResult};
use crate::store::snapshot::{EntitySnapshot, SnapshotProvider};
use chrono::Utc;
use std::sync::{Arc, RwLock};
use tracing::instrument;

/// 操作日志默认保留条数
pub const DEFAULT_ACTION_LOG_LIMIT: usize = 1000;

/// 状态迁移结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange<S> {
    pub from: S,
    pub to: S,
    pub changed: bool,
}

// ==========================================
// EntityStore - 实体存储
// ==========================================
pub struct EntityStore {
    state: RwLock<EntitySnapshot>,
    provider: Option<Arc<dyn SnapshotProvider>>,
    action_log_limit: usize,
}

impl EntityStore {
    /// 由初始快照创建 (不持久化)
    pub fn new(initial: EntitySnapshot) -> Self {
        Self {
            state: RwLock::new(initial),
            provider: None,
            action_log_limit: DEFAULT_ACTION_LOG_LIMIT,
        }
    }

    /// 由快照提供者加载, 之后每次写操作都会回写
    pub fn with_provider(provider: Arc<dyn SnapshotProvider>) -> StoreResult<Self> {
        let initial = provider.load()?;
        tracing::info!(
            vessels = initial.vessels.len(),
            cargoes = initial.cargoes.len(),
            bunker_plans = initial.bunker_plans.len(),
            notifications = initial.notifications.len(),
            pending_tasks = initial.pending_tasks.len(),
            "实体快照已加载"
        );
        Ok(Self {
            state: RwLock::new(initial),
            provider: Some(provider),
            action_log_limit: DEFAULT_ACTION_LOG_LIMIT,
        })
    }

    /// 操作日志保留条数 (超出时丢弃最旧的记录, 至少保留 1 条)
    pub fn with_action_log_limit(mut self, limit: usize) -> Self {
        self.action_log_limit = limit.max(1);
        self
    }

    pub fn action_log_limit(&self) -> usize {
        self.action_log_limit
    }

    // ==========================================
    // 读操作
    // ==========================================

    /// 在读锁内访问当前状态
    pub fn read<R>(&self, f: impl FnOnce(&EntitySnapshot) -> R) -> StoreResult<R> {
        let guard = self
            .state
            .read()
            .map_err(|e| StoreError::LockError(e.to_string()))?;
        Ok(f(&guard))
    }

    /// 当前状态的完整拷贝
    pub fn snapshot(&self) -> StoreResult<EntitySnapshot> {
        self.read(|s| s.clone())
    }

    pub fn vessels(&self) -> StoreResult<Vec<Vessel>> {
        self.read(|s| s.vessels.clone())
    }

    pub fn cargoes(&self) -> StoreResult<Vec<Cargo>> {
        self.read(|s| s.cargoes.clone())
    }

    pub fn find_vessel(&self, imo: &str) -> StoreResult<Option<Vessel>> {
        self.read(|s| s.vessel(imo).cloned())
    }

    pub fn find_cargo(&self, id: &str) -> StoreResult<Option<Cargo>> {
        self.read(|s| s.cargo(id).cloned())
    }

    pub fn find_bunker_plan(&self, id: &str) -> StoreResult<Option<BunkerPlan>> {
        self.read(|s| s.bunker_plan(id).cloned())
    }

    /// 最近的操作日志 (新 → 旧)
    pub fn recent_actions(&self, limit: usize) -> StoreResult<Vec<ActionLog>> {
        self.read(|s| s.action_log.iter().rev().take(limit).cloned().collect())
    }

    // ==========================================
    // 写操作骨架
    // ==========================================

    /// 在工作副本上执行写操作; 有变更时先持久化再替换
    ///
    /// 闭包返回 (结果, 是否有变更)。闭包报错或持久化失败时, 存储保持不变。
    fn mutate<R, F>(&self, f: F) -> StoreResult<R>
    where
        F: FnOnce(&mut EntitySnapshot) -> StoreResult<(R, bool)>,
    {
        let mut guard = self
            .state
            .write()
            .map_err(|e| StoreError::LockError(e.to_string()))?;

        let mut working = guard.clone();
        let (result, changed) = f(&mut working)?;

        if changed {
            let overflow = working.action_log.len().saturating_sub(self.action_log_limit);
            if overflow > 0 {
                working.action_log.drain(..overflow);
            }
            if let Some(provider) = &self.provider {
                provider.persist(&working)?;
            }
            *guard = working;
        }

        Ok(result)
    }

    // ==========================================
    // 货盘
    // ==========================================

    /// 变更货盘状态
    ///
    /// - 同状态: 幂等, 不记录
    /// - 当前为 FIXED: 不变量违反
    /// - 其他非法迁移: 无效状态转换
    #[instrument(skip(self))]
    pub fn set_cargo_status(
        &self,
        cargo_id: &str,
        next: CargoStatus,
        actor: Option<UserRole>,
    ) -> StoreResult<StatusChange<CargoStatus>> {
        self.mutate(|state| {
            let cargo = state
                .cargoes
                .iter_mut()
                .find(|c| c.id == cargo_id)
                .ok_or_else(|| StoreError::not_found("Cargo", cargo_id))?;

            let from = cargo.status;
            if from == next {
                return Ok((StatusChange { from, to: next, changed: false }, false));
            }
            if from.is_terminal() {
                return Err(StoreError::InvariantViolation(format!(
                    "cargo {} is FIXED and cannot move to {}",
                    cargo_id, next
                )));
            }
            if !from.can_transition_to(next) {
                return Err(StoreError::InvalidStateTransition {
                    from: from.to_string(),
                    to: next.to_string(),
                });
            }

            cargo.status = next;
            let action_type = match next {
                CargoStatus::Fixed => ActionType::FixCargo,
                CargoStatus::Rejected => ActionType::RejectCargo,
                _ => ActionType::CompleteAnalysis,
            };
            state.action_log.push(ActionLog::new(
                action_type,
                actor,
                cargo_id,
                Some(format!("{} -> {}", from, next)),
            ));

            tracing::info!(cargo_id, from = %from, to = %next, "货盘状态已变更");
            Ok((StatusChange { from, to: next, changed: true }, true))
        })
    }

    pub fn fix_cargo(&self, cargo_id: &str, actor: Option<UserRole>) -> StoreResult<StatusChange<CargoStatus>> {
        self.set_cargo_status(cargo_id, CargoStatus::Fixed, actor)
    }

    pub fn reject_cargo(&self, cargo_id: &str, actor: Option<UserRole>) -> StoreResult<StatusChange<CargoStatus>> {
        self.set_cargo_status(cargo_id, CargoStatus::Rejected, actor)
    }

    /// 分析完成: 仍处于 PENDING_ANALYSIS 的货盘进入 READY_FOR_DECISION
    ///
    /// 未知 id 与已离开待分析状态的货盘被忽略。返回实际迁移的 id。
    #[instrument(skip(self, cargo_ids), fields(count = cargo_ids.len()))]
    pub fn complete_analysis(&self, cargo_ids: &[String]) -> StoreResult<Vec<String>> {
        self.mutate(|state| {
            let mut promoted = Vec::new();
            for cargo in state.cargoes.iter_mut() {
                if cargo.status == CargoStatus::PendingAnalysis && cargo_ids.contains(&cargo.id) {
                    cargo.status = CargoStatus::ReadyForDecision;
                    promoted.push(cargo.id.clone());
                }
            }
            for id in &promoted {
                state.action_log.push(ActionLog::new(ActionType::CompleteAnalysis, None, id, None));
            }
            let changed = !promoted.is_empty();
            Ok((promoted, changed))
        })
    }

    // ==========================================
    // 船舶
    // ==========================================

    /// 更新存油 (部分更新: 只覆盖传入的油品)
    #[instrument(skip(self, partial_rob))]
    pub fn update_vessel_rob(
        &self,
        imo: &str,
        partial_rob: &FuelQuantities,
        actor: Option<UserRole>,
    ) -> StoreResult<Vessel> {
        if let Some((fuel, qty)) = partial_rob.iter().find(|(_, q)| !q.is_finite() || **q < 0.0) {
            return Err(StoreError::ValidationError(format!(
                "ROB for {} must be a non-negative number, got {}",
                fuel, qty
            )));
        }

        self.mutate(|state| {
            let vessel = state
                .vessels
                .iter_mut()
                .find(|v| v.imo == imo)
                .ok_or_else(|| StoreError::not_found("Vessel", imo))?;

            for (fuel, qty) in partial_rob {
                vessel.current_rob.insert(*fuel, *qty);
            }
            vessel.last_report_time = Some(Utc::now());
            let updated = vessel.clone();

            let detail = partial_rob
                .iter()
                .map(|(f, q)| format!("{}={}", f, q))
                .collect::<Vec<_>>()
                .join(",");
            state
                .action_log
                .push(ActionLog::new(ActionType::UpdateVesselRob, actor, imo, Some(detail)));

            tracing::info!(imo, "船舶存油已更新");
            Ok((updated, true))
        })
    }

    // ==========================================
    // 加油计划
    // ==========================================

    /// 新建或替换加油计划, 并回填船舶的 bunker_plan_id
    #[instrument(skip(self, plan), fields(plan_id = %plan.id, vessel_id = %plan.vessel_id))]
    pub fn upsert_bunker_plan(&self, plan: BunkerPlan, actor: Option<UserRole>) -> StoreResult<()> {
        if !plan.quantity.is_finite() || plan.quantity < 0.0 {
            return Err(StoreError::ValidationError(format!(
                "bunker plan quantity must be non-negative, got {}",
                plan.quantity
            )));
        }

        self.mutate(|state| {
            if let Some(vessel) = state.vessels.iter_mut().find(|v| v.imo == plan.vessel_id) {
                vessel.bunker_plan_id = Some(plan.id.clone());
            }

            let plan_id = plan.id.clone();
            match state.bunker_plans.iter_mut().find(|p| p.id == plan.id) {
                Some(existing) => *existing = plan,
                None => state.bunker_plans.push(plan),
            }
            state
                .action_log
                .push(ActionLog::new(ActionType::UpsertBunkerPlan, actor, &plan_id, None));
            Ok(((), true))
        })
    }

    /// 审批加油计划 PENDING_APPROVAL → APPROVED
    #[instrument(skip(self))]
    pub fn approve_bunker_plan(
        &self,
        plan_id: &str,
        actor: Option<UserRole>,
    ) -> StoreResult<StatusChange<BunkerPlanStatus>> {
        self.mutate(|state| {
            let plan = state
                .bunker_plans
                .iter_mut()
                .find(|p| p.id == plan_id)
                .ok_or_else(|| StoreError::not_found("BunkerPlan", plan_id))?;

            let from = plan.status;
            match from {
                BunkerPlanStatus::Approved => Ok((
                    StatusChange { from, to: from, changed: false },
                    false,
                )),
                BunkerPlanStatus::None => Err(StoreError::InvalidStateTransition {
                    from: from.to_string(),
                    to: BunkerPlanStatus::Approved.to_string(),
                }),
                BunkerPlanStatus::PendingApproval => {
                    plan.status = BunkerPlanStatus::Approved;
                    state.action_log.push(ActionLog::new(
                        ActionType::ApproveBunkerPlan,
                        actor,
                        plan_id,
                        None,
                    ));
                    tracing::info!(plan_id, "加油计划已审批");
                    Ok((
                        StatusChange { from, to: BunkerPlanStatus::Approved, changed: true },
                        true,
                    ))
                }
            }
        })
    }

    // ==========================================
    // 通知
    // ==========================================

    /// 新增通知; 同 dedupe_key 的未读通知已存在时跳过, 返回 false
    pub fn add_notification(&self, notification: Notification) -> StoreResult<bool> {
        self.mutate(|state| {
            let inserted = insert_notification(state, notification)?;
            Ok((inserted, inserted))
        })
    }

    /// 标记已读 (幂等); 返回是否发生了 false → true
    pub fn mark_notification_read(&self, notification_id: &str) -> StoreResult<bool> {
        self.mutate(|state| {
            let notification = state
                .notifications
                .iter_mut()
                .find(|n| n.id == notification_id)
                .ok_or_else(|| StoreError::not_found("Notification", notification_id))?;

            if notification.read {
                return Ok((false, false));
            }
            notification.read = true;
            let role = notification.role;
            state.action_log.push(ActionLog::new(
                ActionType::MarkRead,
                Some(role),
                notification_id,
                None,
            ));
            Ok((true, true))
        })
    }

    /// 角色范围内全部标记已读; 返回翻转数量
    pub fn mark_all_read(&self, role: UserRole) -> StoreResult<usize> {
        self.mutate(|state| {
            let mut flipped = 0;
            for notification in state.notifications.iter_mut() {
                if notification.is_unread_for(role) {
                    notification.read = true;
                    flipped += 1;
                }
            }
            if flipped > 0 {
                state.action_log.push(ActionLog::new(
                    ActionType::MarkAllRead,
                    Some(role),
                    role.as_str(),
                    Some(format!("{} notifications", flipped)),
                ));
            }
            Ok((flipped, flipped > 0))
        })
    }

    // ==========================================
    // 待办
    // ==========================================

    /// 新增待办; 同 dedupe_key 的待办仍存在时跳过, 返回 false
    pub fn add_task(&self, task: PendingTask) -> StoreResult<bool> {
        self.mutate(|state| {
            let inserted = insert_task(state, task)?;
            Ok((inserted, inserted))
        })
    }

    /// 批量写入告警草稿 (一次持久化, 全部成功或全部不生效)
    ///
    /// 返回 (新增通知数, 新增待办数, 去重跳过数)
    #[instrument(skip(self, notifications, tasks), fields(notifications = notifications.len(), tasks = tasks.len()))]
    pub fn apply_alert_drafts(
        &self,
        notifications: Vec<Notification>,
        tasks: Vec<PendingTask>,
    ) -> StoreResult<(usize, usize, usize)> {
        self.mutate(|state| {
            let mut added_notifications = 0;
            let mut added_tasks = 0;
            let mut skipped = 0;

            for notification in notifications {
                if insert_notification(state, notification)? {
                    added_notifications += 1;
                } else {
                    skipped += 1;
                }
            }
            for task in tasks {
                if insert_task(state, task)? {
                    added_tasks += 1;
                } else {
                    skipped += 1;
                }
            }

            let changed = added_notifications + added_tasks > 0;
            Ok(((added_notifications, added_tasks, skipped), changed))
        })
    }

    /// 完成待办: 从集合中删除并返回被删除的待办
    pub fn complete_task(&self, task_id: &str) -> StoreResult<PendingTask> {
        self.mutate(|state| {
            let index = state
                .pending_tasks
                .iter()
                .position(|t| t.id == task_id)
                .ok_or_else(|| StoreError::not_found("PendingTask", task_id))?;

            let removed = state.pending_tasks.remove(index);
            state.action_log.push(ActionLog::new(
                ActionType::CompleteTask,
                Some(removed.role),
                task_id,
                None,
            ));
            tracing::info!(task_id, role = %removed.role, "待办已完成");
            Ok((removed, true))
        })
    }
}

// ==========================================
// 工作副本上的插入 (供单条/批量写操作共用)
// ==========================================

/// 同 dedupe_key 只拦截未读通知: 已读后同一告警再次出现会重新提醒
fn insert_notification(state: &mut EntitySnapshot, notification: Notification) -> StoreResult<bool> {
    if state.notifications.iter().any(|n| n.id == notification.id) {
        return Err(StoreError::ValidationError(format!(
            "duplicate notification id {}",
            notification.id
        )));
    }
    if let Some(key) = notification.dedupe_key.as_deref() {
        if state
            .notifications
            .iter()
            .any(|n| !n.read && n.dedupe_key.as_deref() == Some(key))
        {
            tracing::debug!(dedupe_key = key, "未读通知已存在，跳过");
            return Ok(false);
        }
    }

    state.action_log.push(ActionLog::new(
        ActionType::AddNotification,
        Some(notification.role),
        &notification.id,
        Some(notification.title.clone()),
    ));
    state.notifications.push(notification);
    Ok(true)
}

/// 同 dedupe_key 的待办仍在列表中时跳过
fn insert_task(state: &mut EntitySnapshot, task: PendingTask) -> StoreResult<bool> {
    if state.pending_tasks.iter().any(|t| t.id == task.id) {
        return Err(StoreError::ValidationError(format!("duplicate task id {}", task.id)));
    }
    if let Some(key) = task.dedupe_key.as_deref() {
        if state
            .pending_tasks
            .iter()
            .any(|t| t.dedupe_key.as_deref() == Some(key))
        {
            return Ok(false);
        }
    }

    state.action_log.push(ActionLog::new(
        ActionType::AddTask,
        Some(task.role),
        &task.id,
        Some(task.title.clone()),
    ));
    state.pending_tasks.push(task);
    Ok(true)
}
