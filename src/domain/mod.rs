// ==========================================
// 船舶燃油补给规划 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod action_log;
pub mod bunker_plan;
pub mod cargo;
pub mod notification;
pub mod types;
pub mod vessel;

// 重导出核心类型
pub use action_log::{ActionLog, ActionType};
pub use bunker_plan::{BunkerPlan, DeliveryWindow};
pub use cargo::Cargo;
pub use notification::{Notification, NotificationCategory, PendingTask};
pub use types::{
    BunkerPlanStatus, CargoStatus, FuelType, NotificationType, ParseEnumError, PriorityTier,
    RiskLevel, TaskPriority, UserRole,
};
pub use vessel::{FuelQuantities, Vessel};
