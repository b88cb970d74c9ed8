// ==========================================
// 船舶燃油补给规划 - 引擎层
// ==========================================
// 职责: 基于当前实体状态按需计算派生视图 (拉取式, 无增量缓存)
// 红线: 引擎不写存储, 所有规则输出可解释的问题项/理由
// ==========================================

pub mod alerts;
pub mod classification;
pub mod comparison;
pub mod error;
pub mod escalation;
pub mod notification;
pub mod ranking;
pub mod tasks;

// 重导出核心引擎
pub use alerts::{AlertDrafts, AlertSynthesizer};
pub use classification::{
    ClassificationRule, FleetSummary, VesselAssessment, VesselClassification, VesselClassifier,
    VesselIssue,
};
pub use comparison::{CargoComparator, CargoComparison, ComparisonMetric, MetricResult};
pub use error::{EngineError, EngineResult};
pub use escalation::{
    CollectingEscalationSink, Escalation, EscalationPoller, EscalationPollerGuard, EscalationSink,
    EscalationTracker,
};
pub use notification::{categorize, CategoryCounts};
pub use ranking::{BunkerAvailability, CargoFilter, CargoRanker, DecisionBoard, ProfitBucket, RankKey};
