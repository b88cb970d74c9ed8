// ==========================================
// 船舶燃油补给规划 - 船舶分级规则引擎
// ==========================================
// 红线: 分级是"首条命中",规则之间互斥,不是评分制
// ==========================================
// 职责: 船舶 + 关联货盘/加油计划 → 分层 + 问题列表 + 建议
// 输入: Vessel, Option<Cargo>, Option<BunkerPlan>, now
// 输出: VesselClassification
// ==========================================

use crate::config::ClassificationThresholds;
use crate::domain::{
    BunkerPlan, BunkerPlanStatus, Cargo, DeliveryWindow, FuelType, PriorityTier, Vessel,
};
use crate::i18n::t_with_args;
use crate::store::EntitySnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// 分级规则读取的油品
pub const CLASSIFICATION_FUEL: FuelType = FuelType::Vlsfo;

// ==========================================
// 问题项 (Issue)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VesselIssue {
    /// 存油低于安全线
    LowRob { rob_mt: f64, threshold_mt: f64 },
    /// 无加油计划
    NoBunkerPlan,
    /// 加油计划待审批
    PlanPendingApproval { plan_id: String },
    /// 实际油耗超出计划
    OverConsumption {
        planned_mt_per_day: f64,
        actual_mt_per_day: f64,
        diff_pct: f64,
        extra_daily_cost_usd: f64,
    },
    /// 即将抵港加油
    BunkerSoon {
        hours_to_next_port: f64,
        next_port: Option<String>,
        plan_status: BunkerPlanStatus,
        supplier: Option<String>,
        delivery_window: Option<DeliveryWindow>,
    },
}

impl VesselIssue {
    /// 稳定的问题代码
    pub fn kind(&self) -> &'static str {
        match self {
            VesselIssue::LowRob { .. } => "low_rob",
            VesselIssue::NoBunkerPlan => "no_bunker_plan",
            VesselIssue::PlanPendingApproval { .. } => "plan_pending_approval",
            VesselIssue::OverConsumption { .. } => "over_consumption",
            VesselIssue::BunkerSoon { .. } => "bunker_soon",
        }
    }
}

/// 命中的规则
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClassificationRule {
    LowRobWithoutApprovedPlan,
    OverConsumption,
    BunkerSoon,
    Default,
}

impl ClassificationRule {
    pub fn tier(&self) -> PriorityTier {
        match self {
            ClassificationRule::LowRobWithoutApprovedPlan => PriorityTier::Critical,
            ClassificationRule::OverConsumption | ClassificationRule::BunkerSoon => {
                PriorityTier::Attention
            }
            ClassificationRule::Default => PriorityTier::OnTrack,
        }
    }
}

/// 单船分级结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselClassification {
    pub tier: PriorityTier,
    pub rule: ClassificationRule,
    pub issues: Vec<VesselIssue>,
    pub recommendation: String,
}

impl VesselClassification {
    pub fn issue_kinds(&self) -> Vec<&'static str> {
        self.issues.iter().map(|i| i.kind()).collect()
    }
}

/// 船队视图中的单船评估
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselAssessment {
    pub imo: String,
    pub name: String,
    pub bunker_plan_id: Option<String>,
    pub related_cargo_id: Option<String>,
    pub hours_to_next_port: Option<f64>,
    pub classification: VesselClassification,
}

impl VesselAssessment {
    pub fn tier(&self) -> PriorityTier {
        self.classification.tier
    }
}

/// 船队分层统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetSummary {
    pub total: usize,
    pub critical: usize,
    pub attention: usize,
    pub on_track: usize,
}

// ==========================================
// VesselClassifier - 船舶分级引擎
// ==========================================
pub struct VesselClassifier {
    thresholds: ClassificationThresholds,
}

impl VesselClassifier {
    pub fn new(thresholds: ClassificationThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ClassificationThresholds {
        &self.thresholds
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 单船分级
    ///
    /// 顺序（首条命中即返回）:
    /// 1) ROB(VLSFO) < 安全线 且 (无计划 或 计划未审批) → CRITICAL
    /// 2) (实际-计划)/计划 > 超耗阈值 → ATTENTION
    /// 3) 距港 < 窗口小时 且 ROB ≥ 最低存油 → ATTENTION
    /// 4) 默认 → ON_TRACK
    pub fn classify(
        &self,
        vessel: &Vessel,
        related_cargo: Option<&Cargo>,
        related_plan: Option<&BunkerPlan>,
        now: DateTime<Utc>,
    ) -> VesselClassification {
        let result = self
            .check_low_rob(vessel, related_plan)
            .or_else(|| self.check_over_consumption(vessel))
            .or_else(|| self.check_bunker_soon(vessel, related_plan, now))
            .unwrap_or_else(|| VesselClassification {
                tier: PriorityTier::OnTrack,
                rule: ClassificationRule::Default,
                issues: Vec::new(),
                recommendation: t_with_args("recommendation.on_track", &[]),
            });

        tracing::debug!(
            imo = %vessel.imo,
            cargo_id = related_cargo.map(|c| c.id.as_str()).unwrap_or("-"),
            tier = %result.tier,
            issues = ?result.issue_kinds(),
            "船舶分级完成"
        );
        result
    }

    /// 船队分级: 解析关联计划/货盘, 按 CRITICAL < ATTENTION < ON_TRACK 稳定排序
    #[instrument(skip(self, state), fields(vessels = state.vessels.len()))]
    pub fn classify_fleet(&self, state: &EntitySnapshot, now: DateTime<Utc>) -> Vec<VesselAssessment> {
        let mut assessments: Vec<VesselAssessment> = state
            .vessels
            .iter()
            .map(|vessel| {
                let plan = state.plan_for_vessel(vessel);
                let cargo = state.cargo_for_vessel(vessel);
                VesselAssessment {
                    imo: vessel.imo.clone(),
                    name: vessel.name.clone(),
                    bunker_plan_id: plan.map(|p| p.id.clone()),
                    related_cargo_id: cargo.map(|c| c.id.clone()),
                    hours_to_next_port: vessel.hours_to_next_port(now),
                    classification: self.classify(vessel, cargo, plan, now),
                }
            })
            .collect();

        // sort_by_key 为稳定排序, 同层保持输入顺序
        assessments.sort_by_key(|a| a.tier());
        assessments
    }

    /// 需要干预的船舶 (非 ON_TRACK), 顺序同 classify_fleet
    pub fn vessels_needing_intervention(
        &self,
        state: &EntitySnapshot,
        now: DateTime<Utc>,
    ) -> Vec<VesselAssessment> {
        self.classify_fleet(state, now)
            .into_iter()
            .filter(|a| a.tier() != PriorityTier::OnTrack)
            .collect()
    }

    pub fn summarize(assessments: &[VesselAssessment]) -> FleetSummary {
        assessments.iter().fold(
            FleetSummary {
                total: assessments.len(),
                ..Default::default()
            },
            |mut acc, a| {
                match a.tier() {
                    PriorityTier::Critical => acc.critical += 1,
                    PriorityTier::Attention => acc.attention += 1,
                    PriorityTier::OnTrack => acc.on_track += 1,
                }
                acc
            },
        )
    }

    // ==========================================
    // 规则 1: 低存油
    // ==========================================
    fn check_low_rob(
        &self,
        vessel: &Vessel,
        plan: Option<&BunkerPlan>,
    ) -> Option<VesselClassification> {
        let rob = vessel.rob(CLASSIFICATION_FUEL);
        let threshold = self.thresholds.critical_rob_threshold_mt;
        if rob >= threshold || plan.map_or(false, |p| p.is_approved()) {
            return None;
        }

        let mut issues = vec![VesselIssue::LowRob {
            rob_mt: rob,
            threshold_mt: threshold,
        }];
        let recommendation = match plan {
            None => {
                issues.push(VesselIssue::NoBunkerPlan);
                t_with_args("recommendation.create_plan", &[("vessel", &vessel.name)])
            }
            Some(plan) => {
                if plan.status == BunkerPlanStatus::PendingApproval {
                    issues.push(VesselIssue::PlanPendingApproval {
                        plan_id: plan.id.clone(),
                    });
                }
                t_with_args(
                    "recommendation.approve_plan",
                    &[("plan_id", &plan.id), ("vessel", &vessel.name)],
                )
            }
        };

        Some(VesselClassification {
            tier: PriorityTier::Critical,
            rule: ClassificationRule::LowRobWithoutApprovedPlan,
            issues,
            recommendation,
        })
    }

    // ==========================================
    // 规则 2: 超耗
    // ==========================================
    fn check_over_consumption(&self, vessel: &Vessel) -> Option<VesselClassification> {
        let planned = vessel.planned_consumption(CLASSIFICATION_FUEL)?;
        let actual = vessel.reported_consumption(CLASSIFICATION_FUEL)?;
        if !(planned > 0.0) || !actual.is_finite() {
            return None;
        }

        let diff = (actual - planned) / planned;
        if diff <= self.thresholds.over_consumption_threshold {
            return None;
        }

        let extra_cost = (actual - planned) * self.thresholds.reference_fuel_price_usd_per_mt;
        let diff_pct = diff * 100.0;
        let recommendation = t_with_args(
            "recommendation.over_consumption",
            &[
                ("vessel", &vessel.name),
                ("diff_pct", &format!("{:.1}", diff_pct)),
                ("extra_cost", &format!("{:.0}", extra_cost)),
            ],
        );

        Some(VesselClassification {
            tier: PriorityTier::Attention,
            rule: ClassificationRule::OverConsumption,
            issues: vec![VesselIssue::OverConsumption {
                planned_mt_per_day: planned,
                actual_mt_per_day: actual,
                diff_pct,
                extra_daily_cost_usd: extra_cost,
            }],
            recommendation,
        })
    }

    // ==========================================
    // 规则 3: 即将加油
    // ==========================================
    fn check_bunker_soon(
        &self,
        vessel: &Vessel,
        plan: Option<&BunkerPlan>,
        now: DateTime<Utc>,
    ) -> Option<VesselClassification> {
        let hours = vessel.hours_to_next_port(now)?;
        if hours >= self.thresholds.bunker_soon_window_hours
            || vessel.rob(CLASSIFICATION_FUEL) < self.thresholds.bunker_soon_min_rob_mt
        {
            return None;
        }

        let plan_status = plan.map_or(BunkerPlanStatus::None, |p| p.status);
        let supplier = plan.and_then(|p| p.supplier.clone());
        let port = vessel.next_port.clone().unwrap_or_else(|| "-".to_string());
        let recommendation = t_with_args(
            "recommendation.bunker_soon",
            &[
                ("port", &port),
                ("hours", &format!("{:.0}", hours)),
                ("status", &plan_status.to_string()),
                ("supplier", supplier.as_deref().unwrap_or("-")),
            ],
        );

        Some(VesselClassification {
            tier: PriorityTier::Attention,
            rule: ClassificationRule::BunkerSoon,
            issues: vec![VesselIssue::BunkerSoon {
                hours_to_next_port: hours,
                next_port: vessel.next_port.clone(),
                plan_status,
                supplier,
                delivery_window: plan.and_then(|p| p.delivery_window),
            }],
            recommendation,
        })
    }
}

impl Default for VesselClassifier {
    fn default() -> Self {
        Self::new(ClassificationThresholds::default())
    }
}
