// ==========================================
// 船舶燃油补给规划 - 引擎参数
// ==========================================
// 职责: 分级阈值 / 排序规则 / 升级提醒参数的强类型视图
// 来源: ConfigManager::get_engine_config()
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

// ==========================================
// 分级阈值
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationThresholds {
    /// VLSFO 存油低于此值 (MT) 且无已审批计划 → CRITICAL
    pub critical_rob_threshold_mt: f64,
    /// 超耗比例阈值 (0.10 = 10%)
    pub over_consumption_threshold: f64,
    /// 超耗成本估算参考油价 (USD/MT)
    pub reference_fuel_price_usd_per_mt: f64,
    /// 距港小时数低于此值视为"即将加油"
    pub bunker_soon_window_hours: f64,
    /// "即将加油"规则的最低存油 (MT)
    pub bunker_soon_min_rob_mt: f64,
}

impl Default for ClassificationThresholds {
    fn default() -> Self {
        Self {
            critical_rob_threshold_mt: 180.0,
            over_consumption_threshold: 0.10,
            reference_fuel_price_usd_per_mt: 650.0,
            bunker_soon_window_hours: 48.0,
            bunker_soon_min_rob_mt: 500.0,
        }
    }
}

// ==========================================
// 推荐货盘平局规则
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeaturedTieBreak {
    /// 利润相同时取 id 字典序最小者
    LowestId,
    /// 利润相同时取输入顺序第一个 (历史行为)
    FirstInInput,
}

impl fmt::Display for FeaturedTieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeaturedTieBreak::LowestId => write!(f, "LOWEST_ID"),
            FeaturedTieBreak::FirstInInput => write!(f, "FIRST_IN_INPUT"),
        }
    }
}

impl FromStr for FeaturedTieBreak {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "LOWEST_ID" => Ok(FeaturedTieBreak::LowestId),
            "FIRST_IN_INPUT" => Ok(FeaturedTieBreak::FirstInInput),
            other => Err(format!("unknown tie-break rule: {}", other)),
        }
    }
}

// ==========================================
// 货盘筛选/推荐参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    /// 高利润档下限 (USD)
    pub profit_high_threshold: f64,
    /// 中利润档下限 (USD),低于此值为低利润档
    pub profit_low_threshold: f64,
    pub featured_tie_break: FeaturedTieBreak,
    /// "其他货盘"列表条数
    pub other_cargo_limit: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            profit_high_threshold: 500_000.0,
            profit_low_threshold: 200_000.0,
            featured_tie_break: FeaturedTieBreak::LowestId,
            other_cargo_limit: 3,
        }
    }
}

// ==========================================
// 升级提醒参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationConfig {
    pub poll_interval_secs: u64,
    pub toast_enabled: bool,
    pub sound_enabled: bool,
}

impl EscalationConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 30,
            toast_enabled: true,
            sound_enabled: true,
        }
    }
}

// ==========================================
// 存储参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// 操作日志保留条数 (超出丢弃最旧)
    pub action_log_limit: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            action_log_limit: crate::store::DEFAULT_ACTION_LOG_LIMIT,
        }
    }
}

/// 引擎参数全集
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub classification: ClassificationThresholds,
    pub ranking: RankingConfig,
    pub escalation: EscalationConfig,
}
