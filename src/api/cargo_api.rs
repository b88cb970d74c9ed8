// ==========================================
// 船舶燃油补给规划 - 货盘 API
// ==========================================
// 职责: 货盘筛选 / 推荐 / 对比 / 定载与拒绝 / 分析刷新
// 红线: FIXED 为终态, 对 FIXED 货盘的变更必须报错
// ==========================================

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::instrument;

use crate::analysis::{AnalysisError, AnalysisRefresher};
use crate::api::error::{found, ApiError, ApiResult, MutationOutcome};
use crate::domain::{Cargo, UserRole};
use crate::engine::{CargoComparator, CargoComparison, CargoFilter, CargoRanker, DecisionBoard, RankKey};
use crate::i18n::t_with_args;
use crate::store::EntityStore;

// ==========================================
// CargoApi - 货盘 API
// ==========================================
pub struct CargoApi {
    store: Arc<EntityStore>,
    ranker: Arc<CargoRanker>,
    comparator: Arc<CargoComparator>,
    refresher: AnalysisRefresher,
}

impl CargoApi {
    pub fn new(
        store: Arc<EntityStore>,
        ranker: Arc<CargoRanker>,
        comparator: Arc<CargoComparator>,
        refresher: AnalysisRefresher,
    ) -> Self {
        Self {
            store,
            ranker,
            comparator,
            refresher,
        }
    }

    // ==========================================
    // 筛选与推荐
    // ==========================================

    pub fn filter_cargoes(&self, filter: &CargoFilter) -> ApiResult<Vec<Cargo>> {
        Ok(self.store.read(|s| self.ranker.filter(&s.cargoes, filter))?)
    }

    pub fn ranked_cargoes(&self, filter: &CargoFilter, key: RankKey) -> ApiResult<Vec<Cargo>> {
        let filtered = self.filter_cargoes(filter)?;
        Ok(self.ranker.rank(filtered, key))
    }

    pub fn decision_board(&self, filter: &CargoFilter) -> ApiResult<DecisionBoard> {
        Ok(self.store.read(|s| self.ranker.decision_board(&s.cargoes, filter))?)
    }

    // ==========================================
    // 对比
    // ==========================================

    /// 对比给定货盘
    pub fn compare(&self, cargoes: &[Cargo]) -> ApiResult<CargoComparison> {
        Ok(self.comparator.compare(cargoes)?)
    }

    /// 按 id 对比; 任一 id 不存在即报 NotFound
    pub fn compare_by_ids(&self, cargo_ids: &[String]) -> ApiResult<CargoComparison> {
        let cargoes = self.store.read(|s| {
            cargo_ids
                .iter()
                .map(|id| {
                    s.cargo(id)
                        .cloned()
                        .ok_or_else(|| ApiError::NotFound(format!("Cargo(id={})不存在", id)))
                })
                .collect::<ApiResult<Vec<Cargo>>>()
        })??;
        self.compare(&cargoes)
    }

    /// 对比后对利润最高者执行定载
    #[instrument(skip(self, cargo_ids))]
    pub fn fix_best(&self, cargo_ids: &[String], actor: Option<UserRole>) -> ApiResult<MutationOutcome> {
        let comparison = self.compare_by_ids(cargo_ids)?;
        self.fix_cargo(&comparison.fix_best_id, actor)
    }

    // ==========================================
    // 状态变更
    // ==========================================

    #[instrument(skip(self))]
    pub fn fix_cargo(&self, cargo_id: &str, actor: Option<UserRole>) -> ApiResult<MutationOutcome> {
        Ok(match found(self.store.fix_cargo(cargo_id, actor))? {
            Some(change) if change.changed => MutationOutcome::applied(
                cargo_id,
                t_with_args("mutation.cargo_fixed", &[("id", cargo_id)]),
            ),
            Some(_) => MutationOutcome::no_op(cargo_id),
            None => MutationOutcome::not_found("Cargo", cargo_id),
        })
    }

    #[instrument(skip(self))]
    pub fn reject_cargo(&self, cargo_id: &str, actor: Option<UserRole>) -> ApiResult<MutationOutcome> {
        Ok(match found(self.store.reject_cargo(cargo_id, actor))? {
            Some(change) if change.changed => MutationOutcome::applied(
                cargo_id,
                t_with_args("mutation.cargo_rejected", &[("id", cargo_id)]),
            ),
            Some(_) => MutationOutcome::no_op(cargo_id),
            None => MutationOutcome::not_found("Cargo", cargo_id),
        })
    }

    // ==========================================
    // 分析刷新
    // ==========================================

    /// 等待分析完成, 返回进入待决策的货盘 id
    pub async fn refresh_analysis(&self, cargo_ids: Vec<String>) -> ApiResult<Vec<String>> {
        Ok(self.refresher.refresh(cargo_ids).await?)
    }

    /// 后台分析 (发出即不管)
    pub fn request_analysis(&self, cargo_ids: Vec<String>) -> JoinHandle<Result<Vec<String>, AnalysisError>> {
        self.refresher.spawn(cargo_ids)
    }
}
