// ==========================================
// 船舶燃油补给规划 - API层错误类型
// ==========================================
// 职责: 统一错误分类, 转换存储/引擎错误, 生成本地化提示
// 红线: 写操作的未知 id 不是错误, 以 MutationOutcome::not_found 返回
// ==========================================

use crate::analysis::AnalysisError;
use crate::domain::ParseEnumError;
use crate::engine::EngineError;
use crate::i18n::t_with_args;
use crate::store::StoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入与业务规则
    // ==========================================
    #[error("数据验证失败: {0}")]
    ValidationError(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("不变量违反: {0}")]
    InvariantViolation(String),

    #[error("无效的状态转换: from={from} to={to}")]
    InvalidStateTransition { from: String, to: String },

    // ==========================================
    // 外部协作
    // ==========================================
    #[error("分析服务失败: {0}")]
    AnalysisFailed(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 展示层的临时提示 (按当前语言)
    pub fn user_message(&self) -> String {
        match self {
            ApiError::ValidationError(msg) => t_with_args("error.validation", &[("detail", msg)]),
            ApiError::NotFound(msg) => t_with_args("error.not_found", &[("detail", msg)]),
            ApiError::InvariantViolation(msg) => t_with_args("error.invariant", &[("detail", msg)]),
            ApiError::InvalidStateTransition { from, to } => {
                t_with_args("error.invalid_transition", &[("from", from), ("to", to)])
            }
            ApiError::AnalysisFailed(msg) => t_with_args("error.analysis", &[("detail", msg)]),
            ApiError::InternalError(msg) => t_with_args("error.internal", &[("detail", msg)]),
            ApiError::Other(err) => t_with_args("error.internal", &[("detail", &err.to_string())]),
        }
    }
}

// ==========================================
// 从 StoreError 转换
// ==========================================
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            StoreError::InvariantViolation(msg) => ApiError::InvariantViolation(msg),
            StoreError::InvalidStateTransition { from, to } => {
                ApiError::InvalidStateTransition { from, to }
            }
            StoreError::ValidationError(msg) => ApiError::ValidationError(msg),
            StoreError::LockError(msg) => ApiError::InternalError(format!("存储锁获取失败: {}", msg)),
            StoreError::Persistence(msg) => ApiError::InternalError(format!("快照持久化失败: {}", msg)),
            StoreError::Other(err) => ApiError::Other(err),
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        ApiError::ValidationError(err.to_string())
    }
}

impl From<ParseEnumError> for ApiError {
    fn from(err: ParseEnumError) -> Self {
        ApiError::ValidationError(err.to_string())
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::Collaborator(e) => ApiError::AnalysisFailed(e.to_string()),
            AnalysisError::Store(e) => e.into(),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

// ==========================================
// MutationOutcome - 写操作结果
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MutationStatus {
    /// 状态已变更
    Applied,
    /// 目标已处于期望状态
    NoOp,
    /// 目标不存在, 未做任何修改
    NotFound,
}

/// 写操作结果 + 本地化临时提示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationOutcome {
    pub status: MutationStatus,
    pub target_id: String,
    pub message: String,
}

impl MutationOutcome {
    pub fn applied(target_id: &str, message: String) -> Self {
        Self {
            status: MutationStatus::Applied,
            target_id: target_id.to_string(),
            message,
        }
    }

    pub fn no_op(target_id: &str) -> Self {
        Self {
            status: MutationStatus::NoOp,
            target_id: target_id.to_string(),
            message: t_with_args("mutation.no_change", &[("id", target_id)]),
        }
    }

    pub fn not_found(entity: &str, target_id: &str) -> Self {
        Self {
            status: MutationStatus::NotFound,
            target_id: target_id.to_string(),
            message: t_with_args("mutation.not_found", &[("entity", entity), ("id", target_id)]),
        }
    }

    pub fn is_applied(&self) -> bool {
        self.status == MutationStatus::Applied
    }
}

/// 将存储层 NotFound 折叠为 Ok(None), 其余错误照常上抛
pub(crate) fn found<T>(result: Result<T, StoreError>) -> ApiResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(StoreError::NotFound { entity, id }) => {
            tracing::warn!(entity = %entity, id = %id, "写操作目标不存在，按无操作处理");
            Ok(None)
        }
        Err(err) => {
            tracing::warn!(error = %err, "写操作被拒绝");
            Err(err.into())
        }
    }
}
