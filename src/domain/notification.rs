// ==========================================
// 船舶燃油补给规划 - 通知与待办领域模型
// ==========================================
// 红线: Notification.read 只允许 false → true
// 红线: PendingTask 完成即删除,不做标记
// ==========================================

use crate::domain::types::{NotificationType, TaskPriority, UserRole};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Notification - 通知
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub role: UserRole,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub action_url: Option<String>,
    // 告警合成器去重键 (例如 "low_rob:9000001")
    #[serde(default)]
    pub dedupe_key: Option<String>,
}

impl Notification {
    pub fn is_unread_for(&self, role: UserRole) -> bool {
        !self.read && self.role == role
    }
}

/// 通知分类 (展示用)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationCategory {
    Approval,
    Alert,
    Reminder,
    Update,
}

impl fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationCategory::Approval => write!(f, "Approval"),
            NotificationCategory::Alert => write!(f, "Alert"),
            NotificationCategory::Reminder => write!(f, "Reminder"),
            NotificationCategory::Update => write!(f, "Update"),
        }
    }
}

// ==========================================
// PendingTask - 待办
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingTask {
    pub id: String,
    pub role: UserRole,
    pub priority: TaskPriority,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default = "default_task_count")]
    pub count: u32,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub dedupe_key: Option<String>,
}

fn default_task_count() -> u32 {
    1
}
