// ==========================================
// 船舶燃油补给规划 - 实体快照与快照提供者
// ==========================================
// 职责: 初始数据加载 + 写操作后的持久化 (核心只需要 get/set 语义)
// ==========================================

use crate::domain::{ActionLog, BunkerPlan, Cargo, Notification, PendingTask, Vessel};
use crate::store::error::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

// ==========================================
// EntitySnapshot - 实体全集
// ==========================================
// 集合保持输入顺序 (分级展示/推荐平局规则依赖此顺序)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    #[serde(default)]
    pub vessels: Vec<Vessel>,
    #[serde(default)]
    pub cargoes: Vec<Cargo>,
    #[serde(default)]
    pub bunker_plans: Vec<BunkerPlan>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub pending_tasks: Vec<PendingTask>,
    #[serde(default)]
    pub action_log: Vec<ActionLog>,
}

impl EntitySnapshot {
    pub fn vessel(&self, imo: &str) -> Option<&Vessel> {
        self.vessels.iter().find(|v| v.imo == imo)
    }

    pub fn cargo(&self, id: &str) -> Option<&Cargo> {
        self.cargoes.iter().find(|c| c.id == id)
    }

    pub fn bunker_plan(&self, id: &str) -> Option<&BunkerPlan> {
        self.bunker_plans.iter().find(|p| p.id == id)
    }

    /// 船舶对应的加油计划: 优先 bunker_plan_id, 其次按 vessel_id 反查
    pub fn plan_for_vessel(&self, vessel: &Vessel) -> Option<&BunkerPlan> {
        vessel
            .bunker_plan_id
            .as_deref()
            .and_then(|id| self.bunker_plan(id))
            .or_else(|| self.bunker_plans.iter().find(|p| p.vessel_id == vessel.imo))
    }

    /// 船舶对应的货盘: 优先 vessel_imo 外键, 其次按船名精确匹配 (历史兼容)
    pub fn cargo_for_vessel(&self, vessel: &Vessel) -> Option<&Cargo> {
        self.cargoes
            .iter()
            .find(|c| c.vessel_imo.as_deref() == Some(vessel.imo.as_str()))
            .or_else(|| {
                self.cargoes
                    .iter()
                    .find(|c| c.vessel_imo.is_none() && c.vessel_name.as_deref() == Some(vessel.name.as_str()))
            })
    }
}

// ==========================================
// SnapshotProvider - 快照提供者
// ==========================================
pub trait SnapshotProvider: Send + Sync {
    /// 加载初始快照
    fn load(&self) -> StoreResult<EntitySnapshot>;

    /// 持久化最新快照
    fn persist(&self, snapshot: &EntitySnapshot) -> StoreResult<()>;
}

/// 内存快照提供者 (测试/演示用)
#[derive(Debug, Default)]
pub struct InMemorySnapshotProvider {
    inner: Mutex<EntitySnapshot>,
}

impl InMemorySnapshotProvider {
    pub fn new(snapshot: EntitySnapshot) -> Self {
        Self {
            inner: Mutex::new(snapshot),
        }
    }

    /// 最近一次持久化的内容
    pub fn current(&self) -> StoreResult<EntitySnapshot> {
        self.inner
            .lock()
            .map(|s| s.clone())
            .map_err(|e| StoreError::LockError(e.to_string()))
    }
}

impl SnapshotProvider for InMemorySnapshotProvider {
    fn load(&self) -> StoreResult<EntitySnapshot> {
        self.current()
    }

    fn persist(&self, snapshot: &EntitySnapshot) -> StoreResult<()> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|e| StoreError::LockError(e.to_string()))?;
        *inner = snapshot.clone();
        Ok(())
    }
}

/// JSON 文件快照提供者
///
/// 写入时先写临时文件再 rename, 避免半截文件
#[derive(Debug, Clone)]
pub struct JsonFileSnapshotProvider {
    path: PathBuf,
}

impl JsonFileSnapshotProvider {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotProvider for JsonFileSnapshotProvider {
    fn load(&self) -> StoreResult<EntitySnapshot> {
        if !self.path.exists() {
            tracing::info!(path = %self.path.display(), "快照文件不存在，使用空快照");
            return Ok(EntitySnapshot::default());
        }

        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| StoreError::Persistence(format!("{}: {}", self.path.display(), e)))?;
        serde_json::from_str(&raw)
            .map_err(|e| StoreError::Persistence(format!("{}: {}", self.path.display(), e)))
    }

    fn persist(&self, snapshot: &EntitySnapshot) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|e| StoreError::Persistence(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .and_then(|_| std::fs::rename(&tmp, &self.path))
            .map_err(|e| StoreError::Persistence(format!("{}: {}", self.path.display(), e)))
    }
}

/// 默认快照路径
///
/// - 环境变量 BUNKER_PLANNING_SNAPSHOT_PATH 优先
/// - 否则: 用户数据目录/bunker-planning/snapshot.json
pub fn get_default_snapshot_path() -> PathBuf {
    if let Ok(path) = std::env::var("BUNKER_PLANNING_SNAPSHOT_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    let mut path = PathBuf::from("./bunker_planning_snapshot.json");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("bunker-planning");
        // best-effort: 目录创建失败时仍返回路径, 由 persist 报错
        std::fs::create_dir_all(&dir).ok();
        path = dir.join("snapshot.json");
    }
    path
}
