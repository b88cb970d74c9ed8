// ==========================================
// 船舶燃油补给规划 - 货盘分析刷新
// ==========================================
// 职责: 异步调用外部分析服务, 成功后推进货盘状态
// 红线: 分析失败时存储保持不变, 只记录告警
// ==========================================

pub mod collaborator;
pub mod refresher;

pub use collaborator::{AnalysisCollaborator, ImmediateAnalysisCollaborator};
pub use refresher::{AnalysisError, AnalysisRefresher};
