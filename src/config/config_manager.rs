// ==========================================
// 服装生产排产系统 - 配置管理器
// ==========================================
// 职责: 排产配置的加载与覆写
// 存储: config_kv 表 (key-value, global scope)
// ==========================================

use crate::domain::rampup::RampUpPlan;
use crate::engine::allocator::DEFAULT_MAX_HORIZON_DAYS;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    /// 分配引擎时间视野 (日历日)
    pub const MAX_HORIZON_DAYS: &str = "scheduling/max_horizon_days";
    /// 缺省稳定期效率 (百分比)
    pub const DEFAULT_FINAL_EFFICIENCY: &str = "scheduling/default_final_efficiency";
    /// 缺省爬坡计划 (JSON 序列化的 RampUpPlan)
    pub const DEFAULT_RAMP_UP_PLAN: &str = "scheduling/default_ramp_up_plan";
}

/// 缺省稳定期效率
pub const FALLBACK_FINAL_EFFICIENCY: f64 = 100.0;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 从 config_kv 表读取配置值 (scope_id='global')
    fn get_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入配置值 (upsert, scope_id='global')
    pub fn set_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        conn.execute(
            "INSERT OR REPLACE INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    // ==========================================
    // 类型化读取
    // ==========================================

    /// 分配引擎时间视野 (缺省 3650 天)
    pub fn get_max_horizon_days(&self) -> RepositoryResult<u32> {
        let value = self.get_config_value(config_keys::MAX_HORIZON_DAYS)?;
        Ok(value
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_MAX_HORIZON_DAYS))
    }

    /// 缺省稳定期效率
    pub fn get_default_final_efficiency(&self) -> RepositoryResult<f64> {
        let value = self.get_config_value(config_keys::DEFAULT_FINAL_EFFICIENCY)?;
        Ok(value
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| *v > 0.0 && *v <= 100.0)
            .unwrap_or(FALLBACK_FINAL_EFFICIENCY))
    }

    /// 缺省爬坡计划; 未配置或配置损坏时回退到恒定效率计划
    pub fn get_default_ramp_up_plan(&self) -> RepositoryResult<RampUpPlan> {
        if let Some(raw) = self.get_config_value(config_keys::DEFAULT_RAMP_UP_PLAN)? {
            if let Ok(plan) = serde_json::from_str::<RampUpPlan>(&raw) {
                return Ok(plan);
            }
            // 配置损坏: 不中断启动, 回退缺省
            tracing::warn!(key = config_keys::DEFAULT_RAMP_UP_PLAN, "爬坡计划配置损坏, 回退缺省");
        }

        let final_efficiency = self.get_default_final_efficiency()?;
        RampUpPlan::constant(final_efficiency)
            .map_err(|e| RepositoryError::InternalError(e.to_string()))
    }

    /// 保存缺省爬坡计划
    pub fn set_default_ramp_up_plan(&self, plan: &RampUpPlan) -> RepositoryResult<()> {
        let raw = serde_json::to_string(plan)
            .map_err(|e| RepositoryError::InternalError(e.to_string()))?;
        self.set_config_value(config_keys::DEFAULT_RAMP_UP_PLAN, &raw)
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::domain::rampup::EfficiencyPoint;

    fn manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        db::init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn test_defaults_when_unset() {
        let mgr = manager();
        assert_eq!(mgr.get_max_horizon_days().unwrap(), DEFAULT_MAX_HORIZON_DAYS);
        assert_eq!(
            mgr.get_default_final_efficiency().unwrap(),
            FALLBACK_FINAL_EFFICIENCY
        );
        let plan = mgr.get_default_ramp_up_plan().unwrap();
        assert_eq!(plan.final_efficiency, 100.0);
    }

    #[test]
    fn test_set_and_get_horizon() {
        let mgr = manager();
        mgr.set_config_value(config_keys::MAX_HORIZON_DAYS, "365").unwrap();
        assert_eq!(mgr.get_max_horizon_days().unwrap(), 365);
    }

    #[test]
    fn test_invalid_horizon_falls_back() {
        let mgr = manager();
        mgr.set_config_value(config_keys::MAX_HORIZON_DAYS, "not-a-number").unwrap();
        assert_eq!(mgr.get_max_horizon_days().unwrap(), DEFAULT_MAX_HORIZON_DAYS);

        mgr.set_config_value(config_keys::MAX_HORIZON_DAYS, "0").unwrap();
        assert_eq!(mgr.get_max_horizon_days().unwrap(), DEFAULT_MAX_HORIZON_DAYS);
    }

    #[test]
    fn test_ramp_up_plan_roundtrip() {
        let mgr = manager();
        let plan = RampUpPlan::new(
            vec![
                EfficiencyPoint { day: 1, efficiency: 50.0 },
                EfficiencyPoint { day: 2, efficiency: 70.0 },
            ],
            90.0,
        )
        .unwrap();

        mgr.set_default_ramp_up_plan(&plan).unwrap();
        let loaded = mgr.get_default_ramp_up_plan().unwrap();
        assert_eq!(loaded, plan);
    }

    #[test]
    fn test_corrupt_ramp_up_plan_falls_back() {
        let mgr = manager();
        mgr.set_config_value(config_keys::DEFAULT_RAMP_UP_PLAN, "{broken json").unwrap();
        let plan = mgr.get_default_ramp_up_plan().unwrap();
        assert_eq!(plan.final_efficiency, FALLBACK_FINAL_EFFICIENCY);
    }
}
