// ==========================================
// 船舶燃油补给规划 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: 内存 key-value (默认值 < JSON 文件 < 环境变量)
// ==========================================

use crate::config::engine_config::{
    ClassificationThresholds, EngineConfig, EscalationConfig, RankingConfig, StoreConfig,
};
use serde_json::Value as JsonValue;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::str::FromStr;
use std::sync::RwLock;
use thiserror::Error;

/// 环境变量前缀: BUNKER_PLANNING_<KEY 大写>
pub const ENV_PREFIX: &str = "BUNKER_PLANNING_";

/// 配置层错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("配置文件格式错误: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("配置文件顶层必须是 JSON 对象")]
    NotAnObject,

    #[error("配置锁获取失败: {0}")]
    LockError(String),
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    values: RwLock<HashMap<String, String>>,
}

impl ConfigManager {
    /// 创建空配置 (全部使用默认值)
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
        }
    }

    /// 从键值对创建
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values: RwLock::new(values),
        }
    }

    /// 从 JSON 文件加载
    ///
    /// 文件格式: 顶层对象, 值可以是数字/布尔/字符串
    /// ```json
    /// { "critical_rob_threshold_mt": 200, "featured_tie_break": "FIRST_IN_INPUT" }
    /// ```
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let manager = Self::from_json_str(&raw)?;
        tracing::info!(path = %path.as_ref().display(), "配置文件已加载");
        Ok(manager)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let value: JsonValue = serde_json::from_str(raw)?;
        let object = value.as_object().ok_or(ConfigError::NotAnObject)?;

        let pairs = object.iter().map(|(k, v)| {
            let text = match v {
                JsonValue::String(s) => s.clone(),
                other => other.to_string(),
            };
            (k.clone(), text)
        });
        Ok(Self::from_pairs(pairs))
    }

    /// 应用环境变量覆写 (仅识别 config_keys::ALL 中的键)
    pub fn apply_env_overrides(&self) -> Result<usize, ConfigError> {
        let overrides = config_keys::ALL.iter().filter_map(|key| {
            let env_key = format!("{}{}", ENV_PREFIX, key.to_uppercase());
            std::env::var(&env_key).ok().map(|v| (key.to_string(), v))
        });
        self.apply_overrides(overrides)
    }

    /// 批量覆写
    pub fn apply_overrides<I>(&self, overrides: I) -> Result<usize, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut values = self
            .values
            .write()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;

        let mut count = 0;
        for (key, value) in overrides {
            tracing::debug!(key = %key, value = %value, "配置覆写");
            values.insert(key, value);
            count += 1;
        }
        Ok(count)
    }

    /// 读取配置值
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let values = self
            .values
            .read()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;
        Ok(values.get(key).cloned())
    }

    /// 写入配置值
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply_overrides([(key.to_string(), value.to_string())])
            .map(|_| ())
    }

    /// 所有配置的快照（JSON格式, 键有序）
    pub fn get_config_snapshot(&self) -> Result<String, ConfigError> {
        let values = self
            .values
            .read()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;
        let ordered: BTreeMap<&String, &String> = values.iter().collect();
        Ok(serde_json::to_string(&ordered)?)
    }

    /// 读取并解析,缺失或格式错误时回落到默认值
    fn get_or_default<T>(&self, key: &str, default: T) -> T
    where
        T: FromStr + Copy,
    {
        let raw = match self.get_global_config_value(key) {
            Ok(Some(v)) => v,
            Ok(None) => return default,
            Err(e) => {
                tracing::warn!(config_key = key, error = %e, "配置读取失败，使用默认值");
                return default;
            }
        };

        match raw.trim().parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(config_key = key, raw_value = %raw, "配置格式错误，使用默认值");
                default
            }
        }
    }

    /// 阈值类配置: 必须为有限非负数, 否则回落到默认值
    fn get_threshold(&self, key: &str, default: f64) -> f64 {
        let value = self.get_or_default(key, default);
        if value.is_finite() && value >= 0.0 {
            value
        } else {
            tracing::warn!(config_key = key, value, "阈值必须为有限非负数，使用默认值");
            default
        }
    }

    // ===== 强类型视图 =====

    pub fn get_classification_thresholds(&self) -> ClassificationThresholds {
        let d = ClassificationThresholds::default();
        ClassificationThresholds {
            critical_rob_threshold_mt: self
                .get_threshold(config_keys::CRITICAL_ROB_THRESHOLD_MT, d.critical_rob_threshold_mt),
            over_consumption_threshold: self.get_threshold(
                config_keys::OVER_CONSUMPTION_THRESHOLD,
                d.over_consumption_threshold,
            ),
            reference_fuel_price_usd_per_mt: self.get_threshold(
                config_keys::REFERENCE_FUEL_PRICE_USD_PER_MT,
                d.reference_fuel_price_usd_per_mt,
            ),
            bunker_soon_window_hours: self
                .get_threshold(config_keys::BUNKER_SOON_WINDOW_HOURS, d.bunker_soon_window_hours),
            bunker_soon_min_rob_mt: self
                .get_threshold(config_keys::BUNKER_SOON_MIN_ROB_MT, d.bunker_soon_min_rob_mt),
        }
    }

    pub fn get_ranking_config(&self) -> RankingConfig {
        let d = RankingConfig::default();
        let mut high = self.get_threshold(config_keys::PROFIT_HIGH_THRESHOLD, d.profit_high_threshold);
        let mut low = self.get_threshold(config_keys::PROFIT_LOW_THRESHOLD, d.profit_low_threshold);
        if low > high {
            tracing::warn!(low, high, "利润分档阈值倒置，使用默认分档");
            high = d.profit_high_threshold;
            low = d.profit_low_threshold;
        }

        RankingConfig {
            profit_high_threshold: high,
            profit_low_threshold: low,
            featured_tie_break: self
                .get_or_default(config_keys::FEATURED_TIE_BREAK, d.featured_tie_break),
            other_cargo_limit: self.get_or_default(config_keys::OTHER_CARGO_LIMIT, d.other_cargo_limit),
        }
    }

    pub fn get_escalation_config(&self) -> EscalationConfig {
        let d = EscalationConfig::default();
        EscalationConfig {
            poll_interval_secs: self
                .get_or_default(config_keys::ESCALATION_POLL_SECS, d.poll_interval_secs),
            toast_enabled: self.get_or_default(config_keys::ESCALATION_TOAST_ENABLED, d.toast_enabled),
            sound_enabled: self.get_or_default(config_keys::ESCALATION_SOUND_ENABLED, d.sound_enabled),
        }
    }

    pub fn get_store_config(&self) -> StoreConfig {
        let d = StoreConfig::default();
        let limit = self.get_or_default(config_keys::ACTION_LOG_LIMIT, d.action_log_limit);
        if limit == 0 {
            tracing::warn!(config_key = config_keys::ACTION_LOG_LIMIT, "操作日志保留条数必须大于 0，使用默认值");
            return d;
        }
        StoreConfig {
            action_log_limit: limit,
        }
    }

    pub fn get_engine_config(&self) -> EngineConfig {
        EngineConfig {
            classification: self.get_classification_thresholds(),
            ranking: self.get_ranking_config(),
            escalation: self.get_escalation_config(),
        }
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 分级规则
    pub const CRITICAL_ROB_THRESHOLD_MT: &str = "critical_rob_threshold_mt";
    pub const OVER_CONSUMPTION_THRESHOLD: &str = "over_consumption_threshold";
    pub const REFERENCE_FUEL_PRICE_USD_PER_MT: &str = "reference_fuel_price_usd_per_mt";
    pub const BUNKER_SOON_WINDOW_HOURS: &str = "bunker_soon_window_hours";
    pub const BUNKER_SOON_MIN_ROB_MT: &str = "bunker_soon_min_rob_mt";

    // 货盘筛选/推荐
    pub const PROFIT_HIGH_THRESHOLD: &str = "profit_high_threshold";
    pub const PROFIT_LOW_THRESHOLD: &str = "profit_low_threshold";
    pub const FEATURED_TIE_BREAK: &str = "featured_tie_break";
    pub const OTHER_CARGO_LIMIT: &str = "other_cargo_limit";

    // 升级提醒
    pub const ESCALATION_POLL_SECS: &str = "escalation_poll_secs";
    pub const ESCALATION_TOAST_ENABLED: &str = "escalation_toast_enabled";
    pub const ESCALATION_SOUND_ENABLED: &str = "escalation_sound_enabled";

    // 存储
    pub const ACTION_LOG_LIMIT: &str = "action_log_limit";

    pub const ALL: [&str; 13] = [
        CRITICAL_ROB_THRESHOLD_MT,
        OVER_CONSUMPTION_THRESHOLD,
        REFERENCE_FUEL_PRICE_USD_PER_MT,
        BUNKER_SOON_WINDOW_HOURS,
        BUNKER_SOON_MIN_ROB_MT,
        PROFIT_HIGH_THRESHOLD,
        PROFIT_LOW_THRESHOLD,
        FEATURED_TIE_BREAK,
        OTHER_CARGO_LIMIT,
        ESCALATION_POLL_SECS,
        ESCALATION_TOAST_ENABLED,
        ESCALATION_SOUND_ENABLED,
        ACTION_LOG_LIMIT,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::engine_config::FeaturedTieBreak;
    use std::io::Write;

    #[test]
    fn test_defaults_when_empty() {
        let manager = ConfigManager::new();
        assert_eq!(manager.get_engine_config(), EngineConfig::default());
    }

    #[test]
    fn test_reference_price_is_configurable() {
        let manager = ConfigManager::from_pairs([(config_keys::REFERENCE_FUEL_PRICE_USD_PER_MT, "720")]);
        let thresholds = manager.get_classification_thresholds();
        assert_eq!(thresholds.reference_fuel_price_usd_per_mt, 720.0);
        assert_eq!(thresholds.critical_rob_threshold_mt, 180.0);
    }

    #[test]
    fn test_malformed_value_falls_back_to_default() {
        let manager = ConfigManager::from_pairs([
            (config_keys::CRITICAL_ROB_THRESHOLD_MT, "abc"),
            (config_keys::FEATURED_TIE_BREAK, "random"),
        ]);
        let config = manager.get_engine_config();
        assert_eq!(config.classification.critical_rob_threshold_mt, 180.0);
        assert_eq!(config.ranking.featured_tie_break, FeaturedTieBreak::LowestId);
    }

    #[test]
    fn test_non_finite_or_negative_thresholds_fall_back() {
        let manager = ConfigManager::from_pairs([
            (config_keys::CRITICAL_ROB_THRESHOLD_MT, "NaN"),
            (config_keys::OVER_CONSUMPTION_THRESHOLD, "inf"),
            (config_keys::BUNKER_SOON_WINDOW_HOURS, "-5"),
            (config_keys::PROFIT_HIGH_THRESHOLD, "-infinity"),
        ]);
        let thresholds = manager.get_classification_thresholds();
        assert_eq!(thresholds, ClassificationThresholds::default());
        assert_eq!(manager.get_ranking_config().profit_high_threshold, 500_000.0);
    }

    #[test]
    fn test_action_log_limit() {
        assert_eq!(ConfigManager::new().get_store_config(), StoreConfig::default());

        let manager = ConfigManager::from_pairs([(config_keys::ACTION_LOG_LIMIT, "50")]);
        assert_eq!(manager.get_store_config().action_log_limit, 50);

        let manager = ConfigManager::from_pairs([(config_keys::ACTION_LOG_LIMIT, "0")]);
        assert_eq!(manager.get_store_config(), StoreConfig::default());
    }

    #[test]
    fn test_inverted_profit_bands_fall_back() {
        let manager = ConfigManager::from_pairs([
            (config_keys::PROFIT_HIGH_THRESHOLD, "100000"),
            (config_keys::PROFIT_LOW_THRESHOLD, "300000"),
        ]);
        let ranking = manager.get_ranking_config();
        assert_eq!(ranking.profit_high_threshold, 500_000.0);
        assert_eq!(ranking.profit_low_threshold, 200_000.0);
    }

    #[test]
    fn test_json_file_and_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"escalation_poll_secs": 10, "escalation_sound_enabled": false, "featured_tie_break": "FIRST_IN_INPUT"}}"#
        )
        .unwrap();

        let manager = ConfigManager::from_json_file(file.path()).unwrap();
        let config = manager.get_engine_config();
        assert_eq!(config.escalation.poll_interval_secs, 10);
        assert!(!config.escalation.sound_enabled);
        assert!(config.escalation.toast_enabled);
        assert_eq!(config.ranking.featured_tie_break, FeaturedTieBreak::FirstInInput);

        let applied = manager
            .apply_overrides([(config_keys::ESCALATION_POLL_SECS.to_string(), "5".to_string())])
            .unwrap();
        assert_eq!(applied, 1);
        assert_eq!(manager.get_escalation_config().poll_interval_secs, 5);
    }

    #[test]
    fn test_json_must_be_object() {
        assert!(matches!(
            ConfigManager::from_json_str("[1,2]"),
            Err(ConfigError::NotAnObject)
        ));
    }

    #[test]
    fn test_config_snapshot_is_sorted_json() {
        let manager = ConfigManager::from_pairs([("b", "2"), ("a", "1")]);
        assert_eq!(manager.get_config_snapshot().unwrap(), r#"{"a":"1","b":"2"}"#);
    }
}
