// ==========================================
// 船舶燃油补给规划 - 引擎层错误类型
// ==========================================
// 红线: 关联数据缺失(无计划/无货盘)不是错误, 只有调用形态非法才报错
// ==========================================

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("对比货盘数量必须为 2~3 个, 实际 {count} 个")]
    InvalidComparisonArity { count: usize },

    #[error("对比货盘重复: {0}")]
    DuplicateComparisonCargo(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
