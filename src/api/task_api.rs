// ==========================================
// 船舶燃油补给规划 - 待办 API
// ==========================================
// 职责: 角色待办列表 / 角标 / 完成待办
// ==========================================

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::api::error::{found, ApiResult, MutationOutcome};
use crate::domain::{PendingTask, UserRole};
use crate::engine::tasks::{badge_total, is_overdue, pending_tasks_for};
use crate::i18n::t_with_args;
use crate::store::EntityStore;

/// 待办展示项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskView {
    pub task: PendingTask,
    pub overdue: bool,
}

pub struct TaskApi {
    store: Arc<EntityStore>,
}

impl TaskApi {
    pub fn new(store: Arc<EntityStore>) -> Self {
        Self { store }
    }

    pub fn pending_tasks_for(&self, role: UserRole, now: DateTime<Utc>) -> ApiResult<Vec<TaskView>> {
        Ok(self.store.read(|s| {
            pending_tasks_for(&s.pending_tasks, role)
                .into_iter()
                .map(|t| TaskView {
                    overdue: is_overdue(t, now),
                    task: t.clone(),
                })
                .collect()
        })?)
    }

    pub fn badge_total(&self, role: UserRole) -> ApiResult<u32> {
        Ok(self.store.read(|s| badge_total(&s.pending_tasks, role))?)
    }

    #[instrument(skip(self, task), fields(id = %task.id))]
    pub fn add_task(&self, task: PendingTask) -> ApiResult<MutationOutcome> {
        let id = task.id.clone();
        Ok(if self.store.add_task(task)? {
            MutationOutcome::applied(&id, t_with_args("mutation.task_added", &[("id", &id)]))
        } else {
            MutationOutcome::no_op(&id)
        })
    }

    /// 完成待办 (删除); 未知 id 为无操作
    #[instrument(skip(self))]
    pub fn complete_pending_task(&self, task_id: &str) -> ApiResult<MutationOutcome> {
        Ok(match found(self.store.complete_task(task_id))? {
            Some(_) => MutationOutcome::applied(
                task_id,
                t_with_args("mutation.task_completed", &[("id", task_id)]),
            ),
            None => MutationOutcome::not_found("PendingTask", task_id),
        })
    }
}
