// ==========================================
// 船舶燃油补给规划 - 船舶领域模型
// ==========================================
// 主键: imo (稳定键)
// ==========================================

use crate::domain::types::FuelType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 燃油品种 → 数量 (ROB 为 MT, 油耗为 MT/天)
pub type FuelQuantities = BTreeMap<FuelType, f64>;

// ==========================================
// Vessel - 船舶
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vessel {
    pub imo: String,
    pub name: String,

    // ===== 燃油 =====
    pub current_rob: FuelQuantities,          // 船上存油 (MT)
    pub estimated_consumption: FuelQuantities, // 计划日耗 (MT/天)
    pub actual_consumption: FuelQuantities,    // 实际日耗 (MT/天)

    // ===== 航次 =====
    pub next_port: Option<String>,
    pub eta: Option<DateTime<Utc>>,
    pub last_report_time: Option<DateTime<Utc>>,

    pub bunker_plan_id: Option<String>,
}

impl Vessel {
    /// 指定油品存油,缺失视为 0
    pub fn rob(&self, fuel: FuelType) -> f64 {
        self.current_rob.get(&fuel).copied().unwrap_or(0.0)
    }

    pub fn planned_consumption(&self, fuel: FuelType) -> Option<f64> {
        self.estimated_consumption.get(&fuel).copied()
    }

    pub fn reported_consumption(&self, fuel: FuelType) -> Option<f64> {
        self.actual_consumption.get(&fuel).copied()
    }

    /// 距下一港小时数 (ETA 缺失返回 None)
    pub fn hours_to_next_port(&self, now: DateTime<Utc>) -> Option<f64> {
        self.eta
            .map(|eta| (eta - now).num_seconds() as f64 / 3600.0)
    }
}
