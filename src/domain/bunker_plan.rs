// ==========================================
// 船舶燃油补给规划 - 加油计划领域模型
// ==========================================

use crate::domain::types::BunkerPlanStatus;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 供油窗口
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl fmt::Display for DeliveryWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ~ {}", self.start, self.end)
    }
}

// ==========================================
// BunkerPlan - 加油计划
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BunkerPlan {
    pub id: String,
    pub vessel_id: String, // 对应 Vessel.imo
    pub status: BunkerPlanStatus,
    pub quantity: f64, // MT
    pub supplier: Option<String>,
    pub delivery_window: Option<DeliveryWindow>,
    #[serde(default)]
    pub port: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl BunkerPlan {
    pub fn is_approved(&self) -> bool {
        self.status == BunkerPlanStatus::Approved
    }
}
