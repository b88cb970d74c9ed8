// ==========================================
// 船舶燃油补给规划 - 应用层
// ==========================================
// 职责: 装配共享状态, 连接展示层与核心
// ==========================================

pub mod state;

// 重导出
pub use state::{AppState, CONFIG_PATH_ENV};
