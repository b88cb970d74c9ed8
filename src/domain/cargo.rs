// ==========================================
// 船舶燃油补给规划 - 货盘领域模型
// ==========================================
// 红线: FIXED 为终态,状态变更只能经由 EntityStore
// ==========================================

use crate::domain::types::{CargoStatus, RiskLevel};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// Cargo - 货盘
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cargo {
    pub id: String,

    // ===== 航线 =====
    pub load_port: String,
    pub discharge_port: String,
    pub distance: f64, // 海里
    pub duration: f64, // 天
    pub laycan_start: NaiveDate,
    pub laycan_end: NaiveDate,

    // ===== 经济性 (USD) =====
    pub profit: f64,
    pub bunker_cost: f64,
    pub port_costs: f64,
    pub other_costs: f64,

    // ===== 评估 =====
    pub risk: RiskLevel,
    pub confidence: f64, // 0-100
    pub status: CargoStatus,
    pub viable: bool,
    #[serde(default)]
    pub bunker_ports: Vec<String>,

    // ===== 船舶关联 =====
    // vessel_imo 为推荐外键; vessel_name 为历史按船名关联的兼容字段
    #[serde(default)]
    pub vessel_imo: Option<String>,
    #[serde(default)]
    pub vessel_name: Option<String>,
}

impl Cargo {
    /// 航线上是否有可加油港
    pub fn has_bunker_ports(&self) -> bool {
        !self.bunker_ports.is_empty()
    }

    /// 可进入"推荐货盘"候选池
    pub fn is_decision_candidate(&self) -> bool {
        self.viable && self.status == CargoStatus::ReadyForDecision
    }

    /// 总成本 (燃油 + 港口 + 其他)
    pub fn total_cost(&self) -> f64 {
        self.bunker_cost + self.port_costs + self.other_costs
    }
}
