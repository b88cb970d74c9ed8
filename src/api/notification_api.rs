// ==========================================
// 船舶燃油补给规划 - 通知 API
// ==========================================
// 职责: 角色未读视图 / 已读变更 / 升级提醒
// 红线: 角色字符串无法识别时报验证错误, 不回退为全部通知
// ==========================================

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::api::error::{found, ApiError, ApiResult, MutationOutcome};
use crate::config::EscalationConfig;
use crate::domain::{Notification, NotificationCategory, UserRole};
use crate::engine::notification::{category_counts, scoped_unread};
use crate::engine::{categorize, CategoryCounts, EscalationPoller, EscalationPollerGuard, EscalationSink, EscalationTracker};
use crate::i18n::t_with_args;
use crate::store::EntityStore;

/// 通知展示项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationView {
    pub notification: Notification,
    pub category: NotificationCategory,
}

/// 解析角色字符串
pub fn parse_role(role: &str) -> ApiResult<UserRole> {
    role.parse::<UserRole>().map_err(ApiError::from)
}

// ==========================================
// NotificationApi - 通知 API
// ==========================================
pub struct NotificationApi {
    store: Arc<EntityStore>,
    escalation_config: EscalationConfig,
}

impl NotificationApi {
    pub fn new(store: Arc<EntityStore>, escalation_config: EscalationConfig) -> Self {
        Self {
            store,
            escalation_config,
        }
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 角色范围未读 (新 → 旧)
    pub fn unread_for(&self, role: UserRole) -> ApiResult<Vec<NotificationView>> {
        Ok(self.store.read(|s| {
            scoped_unread(&s.notifications, role)
                .into_iter()
                .map(|n| NotificationView {
                    category: categorize(n),
                    notification: n.clone(),
                })
                .collect()
        })?)
    }

    pub fn unread_count(&self, role: UserRole) -> ApiResult<usize> {
        Ok(self
            .store
            .read(|s| s.notifications.iter().filter(|n| n.is_unread_for(role)).count())?)
    }

    pub fn category_counts(&self, role: UserRole) -> ApiResult<CategoryCounts> {
        Ok(self.store.read(|s| category_counts(&s.notifications, role))?)
    }

    // ==========================================
    // 写操作
    // ==========================================

    #[instrument(skip(self, notification), fields(id = %notification.id))]
    pub fn add_notification(&self, notification: Notification) -> ApiResult<MutationOutcome> {
        let id = notification.id.clone();
        Ok(if self.store.add_notification(notification)? {
            MutationOutcome::applied(&id, t_with_args("mutation.notification_added", &[("id", &id)]))
        } else {
            MutationOutcome::no_op(&id)
        })
    }

    /// 标记已读 (幂等)
    #[instrument(skip(self))]
    pub fn mark_as_read(&self, notification_id: &str) -> ApiResult<MutationOutcome> {
        Ok(match found(self.store.mark_notification_read(notification_id))? {
            Some(true) => MutationOutcome::applied(
                notification_id,
                t_with_args("mutation.marked_read", &[("id", notification_id)]),
            ),
            Some(false) => MutationOutcome::no_op(notification_id),
            None => MutationOutcome::not_found("Notification", notification_id),
        })
    }

    /// 角色范围全部已读
    #[instrument(skip(self))]
    pub fn mark_all_as_read(&self, role: UserRole) -> ApiResult<MutationOutcome> {
        let flipped = self.store.mark_all_read(role)?;
        Ok(if flipped > 0 {
            MutationOutcome::applied(
                role.as_str(),
                t_with_args(
                    "mutation.marked_all_read",
                    &[("count", &flipped.to_string()), ("role", role.as_str())],
                ),
            )
        } else {
            MutationOutcome::no_op(role.as_str())
        })
    }

    // ==========================================
    // 升级提醒
    // ==========================================

    /// 打开通知面板: 启动轮询, guard 释放时停止
    pub fn open_escalation(&self, role: UserRole, sink: Arc<dyn EscalationSink>) -> EscalationPollerGuard {
        EscalationPoller::spawn(
            Arc::clone(&self.store),
            role,
            self.escalation_config.clone(),
            sink,
        )
    }

    /// 状态变更后立即评估一次 (与轮询共享判定器)
    pub fn evaluate_escalation(
        &self,
        tracker: &Mutex<EscalationTracker>,
        sink: &dyn EscalationSink,
    ) -> ApiResult<usize> {
        let notifications = self.store.read(|s| s.notifications.clone())?;
        let mut tracker = tracker
            .lock()
            .map_err(|e| ApiError::InternalError(format!("升级判定器锁获取失败: {}", e)))?;
        Ok(tracker.evaluate_into(&notifications, sink))
    }
}
