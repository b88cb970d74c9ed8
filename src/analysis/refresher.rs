// ==========================================
// 船舶燃油补给规划 - 分析刷新器
// ==========================================
// 流程: analyze(ids) → Ok 则 PENDING_ANALYSIS → READY_FOR_DECISION
// 并发: 与读操作之间不保证先后
// ==========================================

use crate::analysis::collaborator::AnalysisCollaborator;
use crate::store::{EntityStore, StoreError};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::instrument;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Collaborator(#[from] anyhow::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone)]
pub struct AnalysisRefresher {
    store: Arc<EntityStore>,
    collaborator: Arc<dyn AnalysisCollaborator>,
}

impl AnalysisRefresher {
    pub fn new(store: Arc<EntityStore>, collaborator: Arc<dyn AnalysisCollaborator>) -> Self {
        Self {
            store,
            collaborator,
        }
    }

    /// 调用分析服务并推进状态, 返回实际推进的货盘 id
    #[instrument(skip(self, cargo_ids), fields(count = cargo_ids.len()))]
    pub async fn refresh(&self, cargo_ids: Vec<String>) -> Result<Vec<String>, AnalysisError> {
        if cargo_ids.is_empty() {
            return Ok(Vec::new());
        }

        if let Err(e) = self.collaborator.analyze(&cargo_ids).await {
            tracing::warn!(error = %e, "货盘分析失败，状态保持不变");
            return Err(AnalysisError::Collaborator(e));
        }

        let promoted = self.store.complete_analysis(&cargo_ids)?;
        tracing::info!(promoted = promoted.len(), "货盘分析完成");
        Ok(promoted)
    }

    /// 后台执行 refresh (发出即不管); 需在 tokio 运行时内调用
    pub fn spawn(&self, cargo_ids: Vec<String>) -> JoinHandle<Result<Vec<String>, AnalysisError>> {
        let refresher = self.clone();
        tokio::spawn(async move { refresher.refresh(cargo_ids).await })
    }
}
