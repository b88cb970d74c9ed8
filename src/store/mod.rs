// ==========================================
// 船舶燃油补给规划 - 实体存储层
// ==========================================
// 职责: 权威可变集合 + 受控写操作 + 快照持久化
// 红线: 引擎只读, 写入只经由 EntityStore
// ==========================================

pub mod entity_store;
pub mod error;
pub mod snapshot;

pub use entity_store::{EntityStore, StatusChange, DEFAULT_ACTION_LOG_LIMIT};
pub use error::{StoreError, StoreResult};
pub use snapshot::{
    get_default_snapshot_path, EntitySnapshot, InMemorySnapshotProvider, JsonFileSnapshotProvider,
    SnapshotProvider,
};
