// ==========================================
// 船舶燃油补给规划 - 告警合成器
// ==========================================
// 职责: 船队分级结果 → 通知/待办草稿 (带去重键)
// 输入: Vec<VesselAssessment>
// 输出: AlertDrafts (由 API 层写入存储, 引擎不写)
// 红线: 去重键 = <问题代码>:<IMO>, 同键已存在(含已读)时不再写入
// ==========================================

use crate::domain::{
    Notification, NotificationType, PendingTask, PriorityTier, TaskPriority, UserRole,
};
use crate::engine::classification::{ClassificationRule, VesselAssessment, VesselIssue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 合成结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertDrafts {
    pub notifications: Vec<Notification>,
    pub tasks: Vec<PendingTask>,
}

impl AlertDrafts {
    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty() && self.tasks.is_empty()
    }
}

pub fn dedupe_key(kind: &str, imo: &str) -> String {
    format!("{}:{}", kind, imo)
}

fn vessel_url(imo: &str) -> Option<String> {
    Some(format!("/vessels/{}", imo))
}

// ==========================================
// AlertSynthesizer
// ==========================================
pub struct AlertSynthesizer {
    // 无状态引擎
}

impl AlertSynthesizer {
    pub fn new() -> Self {
        Self {}
    }

    /// 由船队评估生成草稿; ON_TRACK 不产生任何草稿
    pub fn synthesize(&self, assessments: &[VesselAssessment], now: DateTime<Utc>) -> AlertDrafts {
        let mut drafts = AlertDrafts::default();

        for assessment in assessments {
            match assessment.classification.rule {
                ClassificationRule::LowRobWithoutApprovedPlan => {
                    self.critical_drafts(assessment, now, &mut drafts)
                }
                ClassificationRule::OverConsumption => {
                    drafts.notifications.push(self.notification(
                        assessment,
                        UserRole::Operations,
                        NotificationType::Warning,
                        format!("Over-consumption: {}", assessment.name),
                        "over_consumption",
                        now,
                    ));
                }
                ClassificationRule::BunkerSoon => {
                    let port = assessment
                        .classification
                        .issues
                        .iter()
                        .find_map(|i| match i {
                            VesselIssue::BunkerSoon { next_port, .. } => next_port.clone(),
                            _ => None,
                        })
                        .unwrap_or_else(|| "next port".to_string());
                    drafts.notifications.push(self.notification(
                        assessment,
                        UserRole::BunkerDesk,
                        NotificationType::Info,
                        format!("Bunkering pending at {}", port),
                        "bunker_soon",
                        now,
                    ));
                }
                ClassificationRule::Default => {}
            }
        }

        tracing::debug!(
            notifications = drafts.notifications.len(),
            tasks = drafts.tasks.len(),
            "告警草稿已生成"
        );
        drafts
    }

    fn critical_drafts(&self, assessment: &VesselAssessment, now: DateTime<Utc>, drafts: &mut AlertDrafts) {
        debug_assert_eq!(assessment.tier(), PriorityTier::Critical);

        drafts.notifications.push(self.notification(
            assessment,
            UserRole::Operations,
            NotificationType::Urgent,
            format!("Low ROB: {}", assessment.name),
            "low_rob",
            now,
        ));

        let pending_plan = assessment.classification.issues.iter().find_map(|i| match i {
            VesselIssue::PlanPendingApproval { plan_id } => Some(plan_id.clone()),
            _ => None,
        });
        let (kind, title, priority) = match pending_plan {
            Some(plan_id) => (
                "plan_pending_approval",
                format!("Approve bunker plan {}", plan_id),
                TaskPriority::High,
            ),
            None => (
                "no_bunker_plan",
                format!("Create bunker plan for {}", assessment.name),
                TaskPriority::Urgent,
            ),
        };

        drafts.tasks.push(PendingTask {
            id: Uuid::new_v4().to_string(),
            role: UserRole::BunkerDesk,
            priority,
            title,
            description: assessment.classification.recommendation.clone(),
            due_date: None,
            count: 1,
            url: vessel_url(&assessment.imo),
            dedupe_key: Some(dedupe_key(kind, &assessment.imo)),
        });
    }

    fn notification(
        &self,
        assessment: &VesselAssessment,
        role: UserRole,
        notification_type: NotificationType,
        title: String,
        kind: &str,
        now: DateTime<Utc>,
    ) -> Notification {
        Notification {
            id: Uuid::new_v4().to_string(),
            role,
            notification_type,
            title,
            message: assessment.classification.recommendation.clone(),
            read: false,
            created_at: now,
            action_url: vessel_url(&assessment.imo),
            dedupe_key: Some(dedupe_key(kind, &assessment.imo)),
        }
    }
}

impl Default for AlertSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}
