// ==========================================
// 船舶燃油补给规划 - 核心库
// ==========================================
// 系统定位: 决策支持核心 (人工最终控制权)
// 职责: 船舶分级 / 货盘推荐与对比 / 通知与待办生命周期
// 展示层、外部分析服务均为协作方, 不属于本库
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 存储层 - 权威集合与快照
pub mod store;

// 引擎层 - 业务规则
pub mod engine;

// 分析刷新 - 外部分析服务边界
pub mod analysis;

// 配置层 - 系统配置
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    ActionLog, ActionType, BunkerPlan, BunkerPlanStatus, Cargo, CargoStatus, DeliveryWindow,
    FuelType, Notification, NotificationCategory, NotificationType, PendingTask, PriorityTier,
    RiskLevel, TaskPriority, UserRole, Vessel,
};

// 存储
pub use store::{EntitySnapshot, EntityStore, SnapshotProvider};

// 引擎
pub use engine::{
    AlertSynthesizer, CargoComparator, CargoFilter, CargoRanker, EscalationPoller,
    EscalationTracker, VesselClassifier,
};

// API
pub use api::{ApiError, ApiResult, CargoApi, FleetApi, MutationOutcome, NotificationApi, TaskApi};
pub use app::AppState;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "船舶燃油补给规划";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
