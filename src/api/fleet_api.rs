// ==========================================
// 船舶燃油补给规划 - 船队 API
// ==========================================
// 职责: 船队分级视图 / 存油更新 / 加油计划维护 / 告警同步
// ==========================================

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::api::error::{found, ApiResult, MutationOutcome};
use crate::domain::{BunkerPlan, FuelQuantities, UserRole};
use crate::engine::{AlertSynthesizer, FleetSummary, VesselAssessment, VesselClassifier};
use crate::i18n::t_with_args;
use crate::store::EntityStore;

/// 船队总览
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetOverview {
    pub summary: FleetSummary,
    pub assessments: Vec<VesselAssessment>,
}

/// 告警同步结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertSyncReport {
    pub notifications_added: usize,
    pub tasks_added: usize,
    pub skipped_duplicates: usize,
}

// ==========================================
// FleetApi - 船队 API
// ==========================================
pub struct FleetApi {
    store: Arc<EntityStore>,
    classifier: Arc<VesselClassifier>,
    synthesizer: Arc<AlertSynthesizer>,
}

impl FleetApi {
    pub fn new(
        store: Arc<EntityStore>,
        classifier: Arc<VesselClassifier>,
        synthesizer: Arc<AlertSynthesizer>,
    ) -> Self {
        Self {
            store,
            classifier,
            synthesizer,
        }
    }

    // ==========================================
    // 查询
    // ==========================================

    pub fn fleet_overview(&self, now: DateTime<Utc>) -> ApiResult<FleetOverview> {
        let assessments = self.store.read(|s| self.classifier.classify_fleet(s, now))?;
        Ok(FleetOverview {
            summary: VesselClassifier::summarize(&assessments),
            assessments,
        })
    }

    pub fn vessels_needing_intervention(&self, now: DateTime<Utc>) -> ApiResult<Vec<VesselAssessment>> {
        Ok(self
            .store
            .read(|s| self.classifier.vessels_needing_intervention(s, now))?)
    }

    /// 单船分级; 未知 IMO 返回 None
    pub fn classify_vessel(&self, imo: &str, now: DateTime<Utc>) -> ApiResult<Option<VesselAssessment>> {
        Ok(self.store.read(|s| {
            s.vessel(imo).map(|vessel| {
                let plan = s.plan_for_vessel(vessel);
                let cargo = s.cargo_for_vessel(vessel);
                VesselAssessment {
                    imo: vessel.imo.clone(),
                    name: vessel.name.clone(),
                    bunker_plan_id: plan.map(|p| p.id.clone()),
                    related_cargo_id: cargo.map(|c| c.id.clone()),
                    hours_to_next_port: vessel.hours_to_next_port(now),
                    classification: self.classifier.classify(vessel, cargo, plan, now),
                }
            })
        })?)
    }

    // ==========================================
    // 写操作
    // ==========================================

    /// 更新存油 (部分更新); 负值为验证错误
    #[instrument(skip(self, partial_rob))]
    pub fn update_vessel_rob(
        &self,
        imo: &str,
        partial_rob: &FuelQuantities,
        actor: Option<UserRole>,
    ) -> ApiResult<MutationOutcome> {
        Ok(match found(self.store.update_vessel_rob(imo, partial_rob, actor))? {
            Some(_) => MutationOutcome::applied(imo, t_with_args("mutation.rob_updated", &[("id", imo)])),
            None => MutationOutcome::not_found("Vessel", imo),
        })
    }

    #[instrument(skip(self, plan), fields(plan_id = %plan.id))]
    pub fn upsert_bunker_plan(&self, plan: BunkerPlan, actor: Option<UserRole>) -> ApiResult<MutationOutcome> {
        let plan_id = plan.id.clone();
        found(self.store.upsert_bunker_plan(plan, actor))?;
        Ok(MutationOutcome::applied(
            &plan_id,
            t_with_args("mutation.plan_saved", &[("id", &plan_id)]),
        ))
    }

    #[instrument(skip(self))]
    pub fn approve_bunker_plan(&self, plan_id: &str, actor: Option<UserRole>) -> ApiResult<MutationOutcome> {
        Ok(match found(self.store.approve_bunker_plan(plan_id, actor))? {
            Some(change) if change.changed => MutationOutcome::applied(
                plan_id,
                t_with_args("mutation.plan_approved", &[("id", plan_id)]),
            ),
            Some(_) => MutationOutcome::no_op(plan_id),
            None => MutationOutcome::not_found("BunkerPlan", plan_id),
        })
    }

    // ==========================================
    // 告警同步
    // ==========================================

    /// 按当前分级生成告警草稿并整批写入存储
    ///
    /// 未读通知/未完成待办中已有同 dedupe_key 的草稿被跳过; 写入失败时存储不变
    #[instrument(skip(self))]
    pub fn sync_alerts(&self, now: DateTime<Utc>) -> ApiResult<AlertSyncReport> {
        let assessments = self.store.read(|s| self.classifier.classify_fleet(s, now))?;
        let drafts = self.synthesizer.synthesize(&assessments, now);

        let (notifications_added, tasks_added, skipped_duplicates) = self
            .store
            .apply_alert_drafts(drafts.notifications, drafts.tasks)
            .map_err(|e| {
                tracing::warn!(error = %e, "告警同步失败，存储保持不变");
                e
            })?;
        let report = AlertSyncReport {
            notifications_added,
            tasks_added,
            skipped_duplicates,
        };

        tracing::info!(
            notifications = report.notifications_added,
            tasks = report.tasks_added,
            skipped = report.skipped_duplicates,
            "告警同步完成"
        );
        Ok(report)
    }
}
