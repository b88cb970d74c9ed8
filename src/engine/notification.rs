// ==========================================
// 船舶燃油补给规划 - 通知视图引擎
// ==========================================
// 职责: 角色范围未读集合 / 通知分类 / 分类计数
// 红线: 角色范围 = 未读 ∩ 当前角色, 不得回退为全部通知
// ==========================================

use crate::domain::{Notification, NotificationCategory, NotificationType, UserRole};
use serde::{Deserialize, Serialize};

const APPROVAL_KEYWORDS: [&str; 3] = ["approved", "confirmed", "fixed"];
const ALERT_KEYWORDS: [&str; 2] = ["alert", "low rob"];
const REMINDER_KEYWORDS: [&str; 2] = ["reminder", "pending"];

fn title_contains_any(title: &str, keywords: &[&str]) -> bool {
    let lower = title.to_lowercase();
    keywords.iter().any(|k| lower.contains(k))
}

/// 通知分类 (固定优先级)
///
/// 1) 标题含 approved/confirmed/fixed 且类型 INFO → Approval
/// 2) 类型 URGENT/ALERT 或标题含 alert/low rob → Alert
/// 3) 类型 WARNING 或标题含 reminder/pending → Reminder
/// 4) 其他 → Update
pub fn categorize(notification: &Notification) -> NotificationCategory {
    let title = notification.title.as_str();
    let kind = notification.notification_type;

    if kind == NotificationType::Info && title_contains_any(title, &APPROVAL_KEYWORDS) {
        NotificationCategory::Approval
    } else if kind.is_escalating() || title_contains_any(title, &ALERT_KEYWORDS) {
        NotificationCategory::Alert
    } else if kind == NotificationType::Warning || title_contains_any(title, &REMINDER_KEYWORDS) {
        NotificationCategory::Reminder
    } else {
        NotificationCategory::Update
    }
}

/// 分类计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub approval: usize,
    pub alert: usize,
    pub reminder: usize,
    pub update: usize,
}

impl CategoryCounts {
    pub fn total(&self) -> usize {
        self.approval + self.alert + self.reminder + self.update
    }

    fn bump(&mut self, category: NotificationCategory) {
        match category {
            NotificationCategory::Approval => self.approval += 1,
            NotificationCategory::Alert => self.alert += 1,
            NotificationCategory::Reminder => self.reminder += 1,
            NotificationCategory::Update => self.update += 1,
        }
    }
}

// ==========================================
// 未读集合
// ==========================================

/// 全部未读 (不分角色)
pub fn unread(notifications: &[Notification]) -> Vec<&Notification> {
    notifications.iter().filter(|n| !n.read).collect()
}

/// 角色范围未读, 新 → 旧
pub fn scoped_unread(notifications: &[Notification], role: UserRole) -> Vec<&Notification> {
    let mut scoped: Vec<&Notification> = notifications
        .iter()
        .filter(|n| n.is_unread_for(role))
        .collect();
    scoped.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    scoped
}

pub fn scoped_unread_count(notifications: &[Notification], role: UserRole) -> usize {
    notifications.iter().filter(|n| n.is_unread_for(role)).count()
}

/// 角色范围未读中的 URGENT/ALERT
pub fn escalating_unread(notifications: &[Notification], role: UserRole) -> Vec<&Notification> {
    scoped_unread(notifications, role)
        .into_iter()
        .filter(|n| n.notification_type.is_escalating())
        .collect()
}

/// 角色范围未读的分类计数
pub fn category_counts(notifications: &[Notification], role: UserRole) -> CategoryCounts {
    notifications
        .iter()
        .filter(|n| n.is_unread_for(role))
        .fold(CategoryCounts::default(), |mut acc, n| {
            acc.bump(categorize(n));
            acc
        })
}
