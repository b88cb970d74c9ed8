// ==========================================
// 船舶燃油补给规划 - API 层
// ==========================================
// 职责: 按角色提供业务接口, 供展示层调用
// ==========================================

pub mod cargo_api;
pub mod error;
pub mod fleet_api;
pub mod notification_api;
pub mod task_api;

// 重导出核心类型
pub use cargo_api::CargoApi;
pub use error::{ApiError, ApiResult, MutationOutcome, MutationStatus};
pub use fleet_api::{AlertSyncReport, FleetApi, FleetOverview};
pub use notification_api::{parse_role, NotificationApi, NotificationView};
pub use task_api::{TaskApi, TaskView};
