// ==========================================
// 船舶燃油补给规划 - 货盘筛选与推荐引擎
// ==========================================
// 职责: 货盘筛选 / 推荐货盘选择 / 排序
// 输入: 货盘集合 + CargoFilter
// 输出: 过滤后的货盘 (保持输入顺序) / 推荐货盘 / DecisionBoard
// ==========================================
// 红线: 筛选只过滤不重排; 推荐只在 viable 且 READY_FOR_DECISION 中产生
// ==========================================

use crate::config::{FeaturedTieBreak, RankingConfig};
use crate::domain::{Cargo, CargoStatus, ParseEnumError, RiskLevel};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
use tracing::instrument;

// ==========================================
// 筛选条件
// ==========================================

/// 利润档位
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProfitBucket {
    #[default]
    All,
    High,   // ≥ profit_high_threshold
    Medium, // [profit_low_threshold, profit_high_threshold)
    Low,    // < profit_low_threshold
}

impl FromStr for ProfitBucket {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ALL" => Ok(ProfitBucket::All),
            "HIGH" => Ok(ProfitBucket::High),
            "MEDIUM" => Ok(ProfitBucket::Medium),
            "LOW" => Ok(ProfitBucket::Low),
            _ => Err(ParseEnumError {
                kind: "利润档位",
                value: s.to_string(),
            }),
        }
    }
}

/// 航线加油港可用性
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BunkerAvailability {
    #[default]
    All,
    Available,
    Unavailable,
}

impl FromStr for BunkerAvailability {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ALL" => Ok(BunkerAvailability::All),
            "AVAILABLE" => Ok(BunkerAvailability::Available),
            "UNAVAILABLE" => Ok(BunkerAvailability::Unavailable),
            _ => Err(ParseEnumError {
                kind: "加油港可用性",
                value: s.to_string(),
            }),
        }
    }
}

/// 货盘筛选条件 (各项 AND 组合, None/All 表示不限)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CargoFilter {
    #[serde(default)]
    pub profit: ProfitBucket,
    #[serde(default)]
    pub risk: Option<RiskLevel>,
    #[serde(default)]
    pub bunker: BunkerAvailability,
    #[serde(default)]
    pub status: Option<CargoStatus>,
}

impl CargoFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_profit(mut self, bucket: ProfitBucket) -> Self {
        self.profit = bucket;
        self
    }

    pub fn with_risk(mut self, risk: RiskLevel) -> Self {
        self.risk = Some(risk);
        self
    }

    pub fn with_bunker(mut self, availability: BunkerAvailability) -> Self {
        self.bunker = availability;
        self
    }

    pub fn with_status(mut self, status: CargoStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// 排序键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RankKey {
    Profit,      // 利润降序
    Confidence,  // 置信度降序
    BunkerCost,  // 燃油成本升序
    LaycanStart, // 受载期升序
    TotalCost,   // 总成本升序
}

/// 决策看板: 推荐货盘 + 其他货盘
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionBoard {
    pub featured: Option<Cargo>,
    pub others: Vec<Cargo>,
    pub total_filtered: usize,
}

// ==========================================
// CargoRanker - 货盘筛选与推荐引擎
// ==========================================
pub struct CargoRanker {
    config: RankingConfig,
}

impl CargoRanker {
    pub fn new(config: RankingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    // ==========================================
    // 筛选
    // ==========================================

    /// 单个货盘是否满足筛选条件
    pub fn matches(&self, cargo: &Cargo, filter: &CargoFilter) -> bool {
        self.matches_profit(cargo, filter.profit)
            && filter.risk.map_or(true, |risk| cargo.risk == risk)
            && Self::matches_bunker(cargo, filter.bunker)
            && filter.status.map_or(true, |status| cargo.status == status)
    }

    fn matches_profit(&self, cargo: &Cargo, bucket: ProfitBucket) -> bool {
        let high = self.config.profit_high_threshold;
        let low = self.config.profit_low_threshold;
        match bucket {
            ProfitBucket::All => true,
            ProfitBucket::High => cargo.profit >= high,
            ProfitBucket::Medium => cargo.profit >= low && cargo.profit < high,
            ProfitBucket::Low => cargo.profit < low,
        }
    }

    fn matches_bunker(cargo: &Cargo, availability: BunkerAvailability) -> bool {
        match availability {
            BunkerAvailability::All => true,
            BunkerAvailability::Available => cargo.has_bunker_ports(),
            BunkerAvailability::Unavailable => !cargo.has_bunker_ports(),
        }
    }

    /// 筛选货盘, 保持输入顺序
    #[instrument(skip(self, cargoes), fields(input = cargoes.len()))]
    pub fn filter(&self, cargoes: &[Cargo], filter: &CargoFilter) -> Vec<Cargo> {
        let filtered: Vec<Cargo> = cargoes
            .iter()
            .filter(|c| self.matches(c, filter))
            .cloned()
            .collect();
        tracing::debug!(output = filtered.len(), "货盘筛选完成");
        filtered
    }

    // ==========================================
    // 推荐
    // ==========================================

    /// 选择推荐货盘: 候选池内利润最高者
    ///
    /// 利润相同时按配置的平局规则取舍
    pub fn select_featured<'a>(&self, filtered: &'a [Cargo]) -> Option<&'a Cargo> {
        let tie_break = self.config.featured_tie_break;
        filtered
            .iter()
            .filter(|c| c.is_decision_candidate())
            .fold(None, |best: Option<&'a Cargo>, candidate| match best {
                None => Some(candidate),
                Some(current) => match candidate.profit.total_cmp(&current.profit) {
                    Ordering::Greater => Some(candidate),
                    Ordering::Less => Some(current),
                    Ordering::Equal => match tie_break {
                        FeaturedTieBreak::LowestId if candidate.id < current.id => Some(candidate),
                        _ => Some(current),
                    },
                },
            })
    }

    /// 其他货盘: 排除推荐货盘后, 取前 other_cargo_limit 个 (保持顺序)
    pub fn other_cargoes(&self, filtered: &[Cargo], featured_id: Option<&str>) -> Vec<Cargo> {
        filtered
            .iter()
            .filter(|c| Some(c.id.as_str()) != featured_id)
            .take(self.config.other_cargo_limit)
            .cloned()
            .collect()
    }

    /// 组装决策看板
    #[instrument(skip(self, cargoes, filter))]
    pub fn decision_board(&self, cargoes: &[Cargo], filter: &CargoFilter) -> DecisionBoard {
        let filtered = self.filter(cargoes, filter);
        let featured = self.select_featured(&filtered).cloned();
        let others = self.other_cargoes(&filtered, featured.as_ref().map(|c| c.id.as_str()));

        tracing::debug!(
            featured = featured.as_ref().map(|c| c.id.as_str()).unwrap_or("-"),
            others = others.len(),
            "决策看板已生成"
        );
        DecisionBoard {
            featured,
            others,
            total_filtered: filtered.len(),
        }
    }

    // ==========================================
    // 排序
    // ==========================================

    /// 按指定键稳定排序
    pub fn rank(&self, mut cargoes: Vec<Cargo>, key: RankKey) -> Vec<Cargo> {
        cargoes.sort_by(|a, b| Self::compare(a, b, key));
        cargoes
    }

    fn compare(a: &Cargo, b: &Cargo, key: RankKey) -> Ordering {
        match key {
            RankKey::Profit => b.profit.total_cmp(&a.profit),
            RankKey::Confidence => b.confidence.total_cmp(&a.confidence),
            RankKey::BunkerCost => a.bunker_cost.total_cmp(&b.bunker_cost),
            RankKey::LaycanStart => a.laycan_start.cmp(&b.laycan_start),
            RankKey::TotalCost => a.total_cost().total_cmp(&b.total_cost()),
        }
    }
}

impl Default for CargoRanker {
    fn default() -> Self {
        Self::new(RankingConfig::default())
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn cargo(id: &str, profit: f64, viable: bool, status: CargoStatus) -> Cargo {
        Cargo {
            id: id.to_string(),
            load_port: "Santos".to_string(),
            discharge_port: "Qingdao".to_string(),
            distance: 11_000.0,
            duration: 38.0,
            laycan_start: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            laycan_end: NaiveDate::from_ymd_opt(2026, 4, 5).unwrap(),
            profit,
            bunker_cost: 100_000.0,
            port_costs: 40_000.0,
            other_costs: 10_000.0,
            risk: RiskLevel::Medium,
            confidence: 80.0,
            status,
            viable,
            bunker_ports: vec!["Singapore".to_string()],
            vessel_imo: None,
            vessel_name: None,
        }
    }

    fn ready(id: &str, profit: f64) -> Cargo {
        cargo(id, profit, true, CargoStatus::ReadyForDecision)
    }

    #[test]
    fn test_featured_skips_non_viable() {
        let cargoes = vec![
            ready("C1", 200_000.0),
            ready("C2", 350_000.0),
            cargo("C3", 500_000.0, false, CargoStatus::ReadyForDecision),
        ];
        let ranker = CargoRanker::default();
        let featured = ranker.select_featured(&cargoes).unwrap();
        assert_eq!(featured.id, "C2");
    }

    #[test]
    fn test_featured_requires_ready_status() {
        let cargoes = vec![
            cargo("C1", 900_000.0, true, CargoStatus::PendingAnalysis),
            cargo("C2", 800_000.0, true, CargoStatus::Fixed),
        ];
        assert!(CargoRanker::default().select_featured(&cargoes).is_none());
        assert!(CargoRanker::default().select_featured(&[]).is_none());
    }

    #[test]
    fn test_featured_tie_break_rules() {
        let cargoes = vec![ready("C9", 300_000.0), ready("C2", 300_000.0)];

        let lowest = CargoRanker::default();
        assert_eq!(lowest.select_featured(&cargoes).unwrap().id, "C2");

        let mut config = RankingConfig::default();
        config.featured_tie_break = FeaturedTieBreak::FirstInInput;
        let first = CargoRanker::new(config);
        assert_eq!(first.select_featured(&cargoes).unwrap().id, "C9");
    }

    #[test]
    fn test_profit_buckets() {
        let cargoes = vec![
            ready("H", 500_000.0),
            ready("M", 200_000.0),
            ready("M2", 499_999.0),
            ready("L", 199_999.0),
        ];
        let ranker = CargoRanker::default();
        let ids = |bucket| -> Vec<String> {
            ranker
                .filter(&cargoes, &CargoFilter::all().with_profit(bucket))
                .into_iter()
                .map(|c| c.id)
                .collect()
        };
        assert_eq!(ids(ProfitBucket::High), vec!["H"]);
        assert_eq!(ids(ProfitBucket::Medium), vec!["M", "M2"]);
        assert_eq!(ids(ProfitBucket::Low), vec!["L"]);
        assert_eq!(ids(ProfitBucket::All).len(), 4);
    }

    #[test]
    fn test_filters_compose_and_are_idempotent() {
        let mut no_ports = ready("NP", 250_000.0);
        no_ports.bunker_ports.clear();
        let mut low_risk = ready("LR", 260_000.0);
        low_risk.risk = RiskLevel::Low;
        let cargoes = vec![ready("A", 100_000.0), no_ports, low_risk];

        let ranker = CargoRanker::default();
        let filter = CargoFilter::all()
            .with_profit(ProfitBucket::Medium)
            .with_bunker(BunkerAvailability::Available);
        let once = ranker.filter(&cargoes, &filter);
        assert_eq!(once.len(), 1);
        assert_eq!(once[0].id, "LR");

        let twice = ranker.filter(&once, &filter);
        assert_eq!(once, twice);

        let unavailable = ranker.filter(
            &cargoes,
            &CargoFilter::all().with_bunker(BunkerAvailability::Unavailable),
        );
        assert_eq!(unavailable.len(), 1);
        assert_eq!(unavailable[0].id, "NP");

        let by_risk = ranker.filter(&cargoes, &CargoFilter::all().with_risk(RiskLevel::Low));
        assert_eq!(by_risk[0].id, "LR");
    }

    #[test]
    fn test_other_cargoes_excludes_featured_and_limits() {
        let cargoes: Vec<Cargo> = (1..=6)
            .map(|i| ready(&format!("C{}", i), 100_000.0 * i as f64))
            .collect();
        let board = CargoRanker::default().decision_board(&cargoes, &CargoFilter::all());

        assert_eq!(board.featured.as_ref().unwrap().id, "C6");
        let others: Vec<&str> = board.others.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(others, vec!["C1", "C2", "C3"]);
        assert_eq!(board.total_filtered, 6);
    }

    #[test]
    fn test_rank_is_stable() {
        let mut a = ready("A", 300_000.0);
        a.confidence = 70.0;
        let mut b = ready("B", 400_000.0);
        b.confidence = 90.0;
        let mut c = ready("C", 300_000.0);
        c.confidence = 90.0;

        let ranker = CargoRanker::default();
        let by_profit: Vec<String> = ranker
            .rank(vec![a.clone(), b.clone(), c.clone()], RankKey::Profit)
            .into_iter()
            .map(|x| x.id)
            .collect();
        assert_eq!(by_profit, vec!["B", "A", "C"]);

        let by_conf: Vec<String> = ranker
            .rank(vec![a, b, c], RankKey::Confidence)
            .into_iter()
            .map(|x| x.id)
            .collect();
        assert_eq!(by_conf, vec!["B", "C", "A"]);
    }

    #[test]
    fn test_rank_by_total_cost() {
        // 燃油成本最低但港口费最高
        let mut a = ready("A", 300_000.0);
        a.bunker_cost = 60_000.0;
        a.port_costs = 120_000.0;
        let mut b = ready("B", 300_000.0);
        b.bunker_cost = 90_000.0;
        let c = ready("C", 300_000.0);

        let ranker = CargoRanker::default();
        let by_bunker: Vec<String> = ranker
            .rank(vec![a.clone(), b.clone(), c.clone()], RankKey::BunkerCost)
            .into_iter()
            .map(|x| x.id)
            .collect();
        assert_eq!(by_bunker, vec!["A", "B", "C"]);

        let by_total: Vec<String> = ranker
            .rank(vec![a, b, c], RankKey::TotalCost)
            .into_iter()
            .map(|x| x.id)
            .collect();
        assert_eq!(by_total, vec!["B", "C", "A"]);
        assert_eq!(RankKey::TotalCost, serde_json::from_str("\"TOTAL_COST\"").unwrap());
    }

    #[test]
    fn test_bucket_parse() {
        assert_eq!("high".parse::<ProfitBucket>(), Ok(ProfitBucket::High));
        assert!("huge".parse::<ProfitBucket>().is_err());
        assert_eq!(
            "available".parse::<BunkerAvailability>(),
            Ok(BunkerAvailability::Available)
        );
    }
}
