// ==========================================
// 船舶燃油补给规划 - 实体存储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 实体存储层错误类型
#[derive(Error, Debug)]
pub enum StoreError {
    // ===== 实体定位 =====
    #[error("记录未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    // ===== 业务规则错误 =====
    #[error("不变量违反: {0}")]
    InvariantViolation(String),

    #[error("无效的状态转换: from={from} to={to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("数据验证失败: {0}")]
    ValidationError(String),

    // ===== 基础设施错误 =====
    #[error("存储锁获取失败: {0}")]
    LockError(String),

    #[error("快照持久化失败: {0}")]
    Persistence(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StoreError {
    pub fn not_found(entity: &str, id: &str) -> Self {
        StoreError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }
}

/// Result 类型别名
pub type StoreResult<T> = Result<T, StoreError>;
