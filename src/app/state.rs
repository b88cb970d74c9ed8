// ==========================================
// 船舶燃油补给规划 - 应用状态
// ==========================================
// 职责: 装配存储 / 引擎 / API 实例, 供展示层持有
// ==========================================

use std::path::PathBuf;
use std::sync::Arc;

use crate::analysis::{AnalysisCollaborator, AnalysisRefresher, ImmediateAnalysisCollaborator};
use crate::api::{ApiError, ApiResult, CargoApi, FleetApi, NotificationApi, TaskApi};
use crate::config::{ConfigManager, EngineConfig};
use crate::engine::{AlertSynthesizer, CargoComparator, CargoRanker, VesselClassifier};
use crate::store::{
    get_default_snapshot_path, EntitySnapshot, EntityStore, JsonFileSnapshotProvider,
    SnapshotProvider,
};

/// 配置文件路径环境变量
pub const CONFIG_PATH_ENV: &str = "BUNKER_PLANNING_CONFIG_PATH";

/// 应用状态
///
/// 所有 API 共享同一个 EntityStore 句柄
pub struct AppState {
    pub config: Arc<ConfigManager>,
    pub engine_config: EngineConfig,
    pub store: Arc<EntityStore>,

    /// 船队 API
    pub fleet_api: Arc<FleetApi>,

    /// 货盘 API
    pub cargo_api: Arc<CargoApi>,

    /// 通知 API
    pub notification_api: Arc<NotificationApi>,

    /// 待办 API
    pub task_api: Arc<TaskApi>,
}

impl AppState {
    /// 由配置 + 快照提供者 + 分析服务装配
    pub fn new(
        config: ConfigManager,
        provider: Arc<dyn SnapshotProvider>,
        collaborator: Arc<dyn AnalysisCollaborator>,
    ) -> ApiResult<Self> {
        let store = EntityStore::with_provider(provider)?
            .with_action_log_limit(config.get_store_config().action_log_limit);
        Ok(Self::assemble(config, Arc::new(store), collaborator))
    }

    /// 内存存储 (不持久化), 分析服务立即成功
    pub fn in_memory(snapshot: EntitySnapshot, config: ConfigManager) -> Self {
        let store = EntityStore::new(snapshot)
            .with_action_log_limit(config.get_store_config().action_log_limit);
        Self::assemble(config, Arc::new(store), Arc::new(ImmediateAnalysisCollaborator))
    }

    /// 默认路径装配
    ///
    /// - 配置: BUNKER_PLANNING_CONFIG_PATH 指向的 JSON 文件(可选) + BUNKER_PLANNING_* 环境变量
    /// - 快照: get_default_snapshot_path()
    pub fn from_environment(collaborator: Arc<dyn AnalysisCollaborator>) -> ApiResult<Self> {
        let config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => ConfigManager::from_json_file(PathBuf::from(path.trim()))
                .map_err(|e| ApiError::ValidationError(e.to_string()))?,
            _ => ConfigManager::new(),
        };
        let overridden = config
            .apply_env_overrides()
            .map_err(|e| ApiError::InternalError(e.to_string()))?;
        if overridden > 0 {
            tracing::info!(count = overridden, "已应用环境变量配置覆写");
        }

        let snapshot_path = get_default_snapshot_path();
        tracing::info!(path = %snapshot_path.display(), "初始化AppState");
        Self::new(
            config,
            Arc::new(JsonFileSnapshotProvider::new(snapshot_path)),
            collaborator,
        )
    }

    fn assemble(
        config: ConfigManager,
        store: Arc<EntityStore>,
        collaborator: Arc<dyn AnalysisCollaborator>,
    ) -> Self {
        let engine_config = config.get_engine_config();

        // ==========================================
        // 引擎
        // ==========================================
        let classifier = Arc::new(VesselClassifier::new(engine_config.classification.clone()));
        let ranker = Arc::new(CargoRanker::new(engine_config.ranking.clone()));
        let comparator = Arc::new(CargoComparator::new());
        let synthesizer = Arc::new(AlertSynthesizer::new());
        let refresher = AnalysisRefresher::new(Arc::clone(&store), collaborator);

        // ==========================================
        // API
        // ==========================================
        let fleet_api = Arc::new(FleetApi::new(Arc::clone(&store), classifier, synthesizer));
        let cargo_api = Arc::new(CargoApi::new(Arc::clone(&store), ranker, comparator, refresher));
        let notification_api = Arc::new(NotificationApi::new(
            Arc::clone(&store),
            engine_config.escalation.clone(),
        ));
        let task_api = Arc::new(TaskApi::new(Arc::clone(&store)));

        tracing::info!("AppState 初始化完成");
        Self {
            config: Arc::new(config),
            engine_config,
            store,
            fleet_api,
            cargo_api,
            notification_api,
            task_api,
        }
    }
}
