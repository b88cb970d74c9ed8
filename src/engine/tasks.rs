// ==========================================
// 船舶燃油补给规划 - 待办视图引擎
// ==========================================
// 职责: 角色待办列表 / 角标总数 / 逾期标记
// 红线: 逾期只是展示标记, 不改变待办状态
// ==========================================

use crate::domain::{PendingTask, UserRole};
use chrono::{DateTime, Utc};

/// 角色待办, 按优先级 URGENT → LOW 稳定排序
pub fn pending_tasks_for(tasks: &[PendingTask], role: UserRole) -> Vec<&PendingTask> {
    let mut scoped: Vec<&PendingTask> = tasks.iter().filter(|t| t.role == role).collect();
    scoped.sort_by(|a, b| b.priority.cmp(&a.priority));
    scoped
}

/// 角标总数 = 各待办 count 之和
pub fn badge_total(tasks: &[PendingTask], role: UserRole) -> u32 {
    tasks
        .iter()
        .filter(|t| t.role == role)
        .map(|t| t.count)
        .sum()
}

pub fn is_overdue(task: &PendingTask, now: DateTime<Utc>) -> bool {
    task.due_date.map_or(false, |due| due < now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskPriority;
    use chrono::Duration;

    fn task(id: &str, role: UserRole, priority: TaskPriority, count: u32) -> PendingTask {
        PendingTask {
            id: id.to_string(),
            role,
            priority,
            title: id.to_string(),
            description: String::new(),
            due_date: None,
            count,
            url: None,
            dedupe_key: None,
        }
    }

    #[test]
    fn test_priority_order_is_stable() {
        let tasks = vec![
            task("L", UserRole::Chartering, TaskPriority::Low, 1),
            task("H1", UserRole::Chartering, TaskPriority::High, 2),
            task("X", UserRole::Operations, TaskPriority::Urgent, 1),
            task("U", UserRole::Chartering, TaskPriority::Urgent, 1),
            task("H2", UserRole::Chartering, TaskPriority::High, 1),
        ];
        let ids: Vec<&str> = pending_tasks_for(&tasks, UserRole::Chartering)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["U", "H1", "H2", "L"]);
        assert_eq!(badge_total(&tasks, UserRole::Chartering), 5);
        assert_eq!(badge_total(&tasks, UserRole::Management), 0);
    }

    #[test]
    fn test_overdue_flag() {
        let now = Utc::now();
        let mut t = task("T", UserRole::BunkerDesk, TaskPriority::Medium, 1);
        assert!(!is_overdue(&t, now));

        t.due_date = Some(now - Duration::hours(1));
        assert!(is_overdue(&t, now));

        t.due_date = Some(now + Duration::hours(1));
        assert!(!is_overdue(&t, now));
    }
}
