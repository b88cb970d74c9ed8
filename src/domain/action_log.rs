// ==========================================
// 船舶燃油补给规划 - 操作日志领域模型
// ==========================================
// 红线: 所有成功的写操作必须记录
// 用途: 审计追踪
// ==========================================

use crate::domain::types::UserRole;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ==========================================
// ActionLog - 操作日志
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionLog {
    pub action_id: String,
    pub action_type: ActionType,
    pub actor: Option<UserRole>, // 系统操作为 None
    pub target_id: String,
    pub action_ts: DateTime<Utc>,
    pub detail: Option<String>,
}

impl ActionLog {
    pub fn new(
        action_type: ActionType,
        actor: Option<UserRole>,
        target_id: &str,
        detail: Option<String>,
    ) -> Self {
        Self {
            action_id: Uuid::new_v4().to_string(),
            action_type,
            actor,
            target_id: target_id.to_string(),
            action_ts: Utc::now(),
            detail,
        }
    }
}

// ==========================================
// ActionType - 操作类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    FixCargo,           // 定载
    RejectCargo,        // 拒绝货盘
    CompleteAnalysis,   // 分析完成
    UpdateVesselRob,    // 更新存油
    ApproveBunkerPlan,  // 审批加油计划
    UpsertBunkerPlan,   // 新建/更新加油计划
    MarkRead,           // 通知已读
    MarkAllRead,        // 全部已读
    AddNotification,    // 新增通知
    AddTask,            // 新增待办
    CompleteTask,       // 完成待办
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActionType::FixCargo => "FIX_CARGO",
            ActionType::RejectCargo => "REJECT_CARGO",
            ActionType::CompleteAnalysis => "COMPLETE_ANALYSIS",
            ActionType::UpdateVesselRob => "UPDATE_VESSEL_ROB",
            ActionType::ApproveBunkerPlan => "APPROVE_BUNKER_PLAN",
            ActionType::UpsertBunkerPlan => "UPSERT_BUNKER_PLAN",
            ActionType::MarkRead => "MARK_READ",
            ActionType::MarkAllRead => "MARK_ALL_READ",
            ActionType::AddNotification => "ADD_NOTIFICATION",
            ActionType::AddTask => "ADD_TASK",
            ActionType::CompleteTask => "COMPLETE_TASK",
        };
        f.write_str(s)
    }
}
