// ==========================================
// 船舶燃油补给规划 - 货盘对比引擎
// ==========================================
// 职责: 2~3 个货盘逐项对比, 给出每项指标的胜出者
// 红线: 平局时报告全部并列者, 胜出者取输入顺序第一个
// 红线: "定载最佳"只看利润, 与各项胜出次数无关
// ==========================================

use crate::domain::{Cargo, RiskLevel};
use crate::engine::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::instrument;

pub const MIN_COMPARISON: usize = 2;
pub const MAX_COMPARISON: usize = 3;

/// 对比指标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComparisonMetric {
    Profit,      // 越高越好
    BunkerCost,  // 越低越好
    Risk,        // LOW 胜出
    Confidence,  // 越高越好
    Duration,    // 越短越好
    BunkerPorts, // 可加油港越多越好
}

impl ComparisonMetric {
    pub const ALL: [ComparisonMetric; 6] = [
        ComparisonMetric::Profit,
        ComparisonMetric::BunkerCost,
        ComparisonMetric::Risk,
        ComparisonMetric::Confidence,
        ComparisonMetric::Duration,
        ComparisonMetric::BunkerPorts,
    ];

    /// 统一为"越大越好"的得分
    fn score(&self, cargo: &Cargo) -> f64 {
        match self {
            ComparisonMetric::Profit => cargo.profit,
            ComparisonMetric::BunkerCost => -cargo.bunker_cost,
            ComparisonMetric::Risk => -(risk_ordinal(cargo.risk) as f64),
            ComparisonMetric::Confidence => cargo.confidence,
            ComparisonMetric::Duration => -cargo.duration,
            ComparisonMetric::BunkerPorts => cargo.bunker_ports.len() as f64,
        }
    }
}

impl fmt::Display for ComparisonMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ComparisonMetric::Profit => "PROFIT",
            ComparisonMetric::BunkerCost => "BUNKER_COST",
            ComparisonMetric::Risk => "RISK",
            ComparisonMetric::Confidence => "CONFIDENCE",
            ComparisonMetric::Duration => "DURATION",
            ComparisonMetric::BunkerPorts => "BUNKER_PORTS",
        };
        f.write_str(s)
    }
}

fn risk_ordinal(risk: RiskLevel) -> u8 {
    match risk {
        RiskLevel::Low => 0,
        RiskLevel::Medium => 1,
        RiskLevel::High => 2,
    }
}

/// 单项指标对比结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    pub metric: ComparisonMetric,
    pub winner_id: String,
    /// 达到最优值的全部货盘 (含 winner, 按输入顺序)
    pub tied_ids: Vec<String>,
}

impl MetricResult {
    pub fn is_tie(&self) -> bool {
        self.tied_ids.len() > 1
    }
}

/// 对比结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CargoComparison {
    pub cargo_ids: Vec<String>,
    pub metrics: Vec<MetricResult>,
    /// "定载最佳"目标: 利润最高 (首个出现者)
    pub fix_best_id: String,
}

impl CargoComparison {
    pub fn result_for(&self, metric: ComparisonMetric) -> Option<&MetricResult> {
        self.metrics.iter().find(|m| m.metric == metric)
    }

    pub fn winner(&self, metric: ComparisonMetric) -> Option<&str> {
        self.result_for(metric).map(|m| m.winner_id.as_str())
    }

    /// 某货盘胜出(含并列)的指标数
    pub fn wins_for(&self, cargo_id: &str) -> usize {
        self.metrics
            .iter()
            .filter(|m| m.tied_ids.iter().any(|id| id == cargo_id))
            .count()
    }
}

// ==========================================
// CargoComparator - 货盘对比引擎
// ==========================================
pub struct CargoComparator {
    // 无状态引擎
}

impl CargoComparator {
    pub fn new() -> Self {
        Self {}
    }

    /// 对比 2~3 个货盘
    ///
    /// # 错误
    /// - 数量不在 [2, 3]: InvalidComparisonArity
    /// - id 重复: DuplicateComparisonCargo
    #[instrument(skip(self, cargoes), fields(count = cargoes.len()))]
    pub fn compare(&self, cargoes: &[Cargo]) -> EngineResult<CargoComparison> {
        if !(MIN_COMPARISON..=MAX_COMPARISON).contains(&cargoes.len()) {
            return Err(EngineError::InvalidComparisonArity {
                count: cargoes.len(),
            });
        }
        let mut seen = HashSet::new();
        if let Some(dup) = cargoes.iter().find(|c| !seen.insert(c.id.as_str())) {
            return Err(EngineError::DuplicateComparisonCargo(dup.id.clone()));
        }

        let metrics: Vec<MetricResult> = ComparisonMetric::ALL
            .iter()
            .map(|metric| Self::evaluate(*metric, cargoes))
            .collect();

        // 上面已校验非空, winner_id 必然存在
        let fix_best_id = metrics[0].winner_id.clone();

        Ok(CargoComparison {
            cargo_ids: cargoes.iter().map(|c| c.id.clone()).collect(),
            metrics,
            fix_best_id,
        })
    }

    fn evaluate(metric: ComparisonMetric, cargoes: &[Cargo]) -> MetricResult {
        let best = cargoes
            .iter()
            .map(|c| metric.score(c))
            .fold(f64::NEG_INFINITY, f64::max);
        let tied_ids: Vec<String> = cargoes
            .iter()
            .filter(|c| metric.score(c) == best)
            .map(|c| c.id.clone())
            .collect();
        let winner_id = tied_ids.first().cloned().unwrap_or_default();

        MetricResult {
            metric,
            winner_id,
            tied_ids,
        }
    }
}

impl Default for CargoComparator {
    fn default() -> Self {
        Self::new()
    }
}
