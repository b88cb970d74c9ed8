// ==========================================
// 船舶燃油补给规划 - 配置层
// ==========================================
// 职责: 系统配置管理,支持文件/环境变量覆写
// ==========================================

pub mod config_manager;
pub mod engine_config;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigError, ConfigManager};
pub use engine_config::{
    ClassificationThresholds, EngineConfig, EscalationConfig, FeaturedTieBreak, RankingConfig,
    StoreConfig,
};
