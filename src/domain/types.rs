// ==========================================
// 船舶燃油补给规划 - 领域类型定义
// ==========================================
// 红线: 角色/状态均为封闭枚举,未知字符串必须报错,不得静默默认
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 枚举解析失败
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("无法识别的{kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

// ==========================================
// 燃油品种 (Fuel Type)
// ==========================================
// 分级规则只读取 VLSFO
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FuelType {
    Vlsfo, // 低硫燃料油
    Lsmgo, // 低硫船用轻油
    Hsfo,  // 高硫燃料油
    Mgo,   // 船用轻油
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FuelType::Vlsfo => write!(f, "VLSFO"),
            FuelType::Lsmgo => write!(f, "LSMGO"),
            FuelType::Hsfo => write!(f, "HSFO"),
            FuelType::Mgo => write!(f, "MGO"),
        }
    }
}

// ==========================================
// 优先级分层 (Priority Tier)
// ==========================================
// 顺序: Critical < Attention < OnTrack (展示排序即按此顺序)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriorityTier {
    Critical,  // 紧急干预
    Attention, // 需要关注
    OnTrack,   // 正常
}

impl fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorityTier::Critical => write!(f, "CRITICAL"),
            PriorityTier::Attention => write!(f, "ATTENTION"),
            PriorityTier::OnTrack => write!(f, "ON_TRACK"),
        }
    }
}

// ==========================================
// 货盘风险等级 (Risk Level)
// ==========================================
// 顺序: Low < Medium < High (对比时 Low 胜出)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
        }
    }
}

impl FromStr for RiskLevel {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "LOW" => Ok(RiskLevel::Low),
            "MEDIUM" => Ok(RiskLevel::Medium),
            "HIGH" => Ok(RiskLevel::High),
            _ => Err(ParseEnumError::new("风险等级", s)),
        }
    }
}

// ==========================================
// 货盘状态 (Cargo Status)
// ==========================================
// 生命周期: PENDING_ANALYSIS → READY_FOR_DECISION → FIXED / REJECTED
// 红线: FIXED 为终态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CargoStatus {
    PendingAnalysis,  // 待分析
    ReadyForDecision, // 待决策
    Fixed,            // 已定载
    Rejected,         // 已拒绝
}

impl fmt::Display for CargoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

impl CargoStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            CargoStatus::PendingAnalysis => "PENDING_ANALYSIS",
            CargoStatus::ReadyForDecision => "READY_FOR_DECISION",
            CargoStatus::Fixed => "FIXED",
            CargoStatus::Rejected => "REJECTED",
        }
    }

    /// 是否为终态
    pub fn is_terminal(&self) -> bool {
        matches!(self, CargoStatus::Fixed)
    }

    /// 状态迁移是否合法（同状态视为幂等,由调用方单独处理）
    pub fn can_transition_to(&self, next: CargoStatus) -> bool {
        use CargoStatus::*;
        matches!(
            (self, next),
            (PendingAnalysis, ReadyForDecision)
                | (PendingAnalysis, Rejected)
                | (ReadyForDecision, Fixed)
                | (ReadyForDecision, Rejected)
        )
    }
}

impl FromStr for CargoStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PENDING_ANALYSIS" => Ok(CargoStatus::PendingAnalysis),
            "READY_FOR_DECISION" => Ok(CargoStatus::ReadyForDecision),
            "FIXED" => Ok(CargoStatus::Fixed),
            "REJECTED" => Ok(CargoStatus::Rejected),
            _ => Err(ParseEnumError::new("货盘状态", s)),
        }
    }
}

// ==========================================
// 加油计划状态 (Bunker Plan Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BunkerPlanStatus {
    None,            // 未建立
    PendingApproval, // 待审批
    Approved,        // 已审批
}

impl fmt::Display for BunkerPlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BunkerPlanStatus::None => write!(f, "NONE"),
            BunkerPlanStatus::PendingApproval => write!(f, "PENDING_APPROVAL"),
            BunkerPlanStatus::Approved => write!(f, "APPROVED"),
        }
    }
}

// ==========================================
// 通知类型 (Notification Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    Info,
    Warning,
    Urgent,
    Alert,
}

impl NotificationType {
    /// URGENT / ALERT 触发升级提醒
    pub fn is_escalating(&self) -> bool {
        matches!(self, NotificationType::Urgent | NotificationType::Alert)
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationType::Info => write!(f, "INFO"),
            NotificationType::Warning => write!(f, "WARNING"),
            NotificationType::Urgent => write!(f, "URGENT"),
            NotificationType::Alert => write!(f, "ALERT"),
        }
    }
}

// ==========================================
// 待办优先级 (Task Priority)
// ==========================================
// 顺序: Low < Medium < High < Urgent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskPriority::Low => write!(f, "LOW"),
            TaskPriority::Medium => write!(f, "MEDIUM"),
            TaskPriority::High => write!(f, "HIGH"),
            TaskPriority::Urgent => write!(f, "URGENT"),
        }
    }
}

// ==========================================
// 用户角色 (User Role)
// ==========================================
// 红线: 封闭角色集,未知角色解析失败,不得回退为"全部通知"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Operations, // 船舶运营
    Chartering, // 租船/商务
    BunkerDesk, // 燃油采购
    Management, // 管理层
}

impl UserRole {
    pub const ALL: [UserRole; 4] = [
        UserRole::Operations,
        UserRole::Chartering,
        UserRole::BunkerDesk,
        UserRole::Management,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Operations => "OPERATIONS",
            UserRole::Chartering => "CHARTERING",
            UserRole::BunkerDesk => "BUNKER_DESK",
            UserRole::Management => "MANAGEMENT",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "OPERATIONS" => Ok(UserRole::Operations),
            "CHARTERING" => Ok(UserRole::Chartering),
            "BUNKER_DESK" => Ok(UserRole::BunkerDesk),
            "MANAGEMENT" => Ok(UserRole::Management),
            _ => Err(ParseEnumError::new("用户角色", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_parse_rejects_unknown() {
        assert_eq!("operations".parse::<UserRole>(), Ok(UserRole::Operations));
        assert_eq!("bunker-desk".parse::<UserRole>(), Ok(UserRole::BunkerDesk));

        let err = "captain".parse::<UserRole>().unwrap_err();
        assert_eq!(err.value, "captain");
    }

    #[test]
    fn test_cargo_status_transitions() {
        use CargoStatus::*;
        assert!(PendingAnalysis.can_transition_to(ReadyForDecision));
        assert!(ReadyForDecision.can_transition_to(Fixed));
        assert!(ReadyForDecision.can_transition_to(Rejected));
        assert!(!PendingAnalysis.can_transition_to(Fixed));
        assert!(!Fixed.can_transition_to(Rejected));
        assert!(!Rejected.can_transition_to(ReadyForDecision));
        assert!(Fixed.is_terminal());
    }

    #[test]
    fn test_tier_ordering() {
        assert!(PriorityTier::Critical < PriorityTier::Attention);
        assert!(PriorityTier::Attention < PriorityTier::OnTrack);
    }

    #[test]
    fn test_serde_screaming_case() {
        let json = serde_json::to_string(&CargoStatus::ReadyForDecision).unwrap();
        assert_eq!(json, "\"READY_FOR_DECISION\"");
        let role: UserRole = serde_json::from_str("\"BUNKER_DESK\"").unwrap();
        assert_eq!(role, UserRole::BunkerDesk);
    }
}
