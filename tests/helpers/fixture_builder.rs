// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use bunker_planning::domain::{
    BunkerPlan, BunkerPlanStatus, Cargo, CargoStatus, DeliveryWindow, FuelType, Notification,
    NotificationType, PendingTask, RiskLevel, TaskPriority, UserRole, Vessel,
};
use bunker_planning::store::EntitySnapshot;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use std::collections::BTreeMap;

/// 固定基准时间: 2026-03-01 00:00 UTC
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()
}

// ==========================================
// Vessel 构建器
// ==========================================

pub struct VesselBuilder {
    vessel: Vessel,
}

impl VesselBuilder {
    pub fn new(imo: &str, name: &str) -> Self {
        Self {
            vessel: Vessel {
                imo: imo.to_string(),
                name: name.to_string(),
                current_rob: BTreeMap::from([(FuelType::Vlsfo, 800.0), (FuelType::Lsmgo, 60.0)]),
                estimated_consumption: BTreeMap::from([(FuelType::Vlsfo, 8.0)]),
                actual_consumption: BTreeMap::from([(FuelType::Vlsfo, 8.0)]),
                next_port: Some("Singapore".to_string()),
                eta: Some(base_time() + Duration::days(6)),
                last_report_time: Some(base_time() - Duration::hours(12)),
                bunker_plan_id: None,
            },
        }
    }

    pub fn rob(mut self, mt: f64) -> Self {
        self.vessel.current_rob.insert(FuelType::Vlsfo, mt);
        self
    }

    pub fn consumption(mut self, planned: f64, actual: f64) -> Self {
        self.vessel.estimated_consumption.insert(FuelType::Vlsfo, planned);
        self.vessel.actual_consumption.insert(FuelType::Vlsfo, actual);
        self
    }

    pub fn eta_in_hours(mut self, hours: i64) -> Self {
        self.vessel.eta = Some(base_time() + Duration::hours(hours));
        self
    }

    pub fn no_eta(mut self) -> Self {
        self.vessel.eta = None;
        self
    }

    pub fn next_port(mut self, port: &str) -> Self {
        self.vessel.next_port = Some(port.to_string());
        self
    }

    pub fn plan(mut self, plan_id: &str) -> Self {
        self.vessel.bunker_plan_id = Some(plan_id.to_string());
        self
    }

    pub fn build(self) -> Vessel {
        self.vessel
    }
}

// ==========================================
// Cargo 构建器
// ==========================================

pub struct CargoBuilder {
    cargo: Cargo,
}

impl CargoBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            cargo: Cargo {
                id: id.to_string(),
                load_port: "Ponta da Madeira".to_string(),
                discharge_port: "Qingdao".to_string(),
                distance: 11_800.0,
                duration: 42.0,
                laycan_start: NaiveDate::from_ymd_opt(2026, 3, 20).unwrap(),
                laycan_end: NaiveDate::from_ymd_opt(2026, 3, 25).unwrap(),
                profit: 300_000.0,
                bunker_cost: 100_000.0,
                port_costs: 45_000.0,
                other_costs: 12_000.0,
                risk: RiskLevel::Medium,
                confidence: 80.0,
                status: CargoStatus::ReadyForDecision,
                viable: true,
                bunker_ports: vec!["Singapore".to_string()],
                vessel_imo: None,
                vessel_name: None,
            },
        }
    }

    pub fn profit(mut self, profit: f64) -> Self {
        self.cargo.profit = profit;
        self
    }

    pub fn bunker_cost(mut self, cost: f64) -> Self {
        self.cargo.bunker_cost = cost;
        self
    }

    pub fn risk(mut self, risk: RiskLevel) -> Self {
        self.cargo.risk = risk;
        self
    }

    pub fn status(mut self, status: CargoStatus) -> Self {
        self.cargo.status = status;
        self
    }

    pub fn viable(mut self, viable: bool) -> Self {
        self.cargo.viable = viable;
        self
    }

    pub fn no_bunker_ports(mut self) -> Self {
        self.cargo.bunker_ports.clear();
        self
    }

    pub fn vessel_imo(mut self, imo: &str) -> Self {
        self.cargo.vessel_imo = Some(imo.to_string());
        self
    }

    pub fn vessel_name(mut self, name: &str) -> Self {
        self.cargo.vessel_name = Some(name.to_string());
        self
    }

    pub fn build(self) -> Cargo {
        self.cargo
    }
}

// ==========================================
// BunkerPlan / Notification / PendingTask
// ==========================================

pub fn bunker_plan(id: &str, vessel_imo: &str, status: BunkerPlanStatus) -> BunkerPlan {
    BunkerPlan {
        id: id.to_string(),
        vessel_id: vessel_imo.to_string(),
        status,
        quantity: 650.0,
        supplier: Some("Global Marine Fuels".to_string()),
        delivery_window: Some(DeliveryWindow {
            start: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            end: NaiveDate::from_ymd_opt(2026, 3, 3).unwrap(),
        }),
        port: Some("Singapore".to_string()),
        created_at: base_time() - Duration::days(1),
    }
}

pub fn notification(id: &str, role: UserRole, kind: NotificationType, title: &str) -> Notification {
    Notification {
        id: id.to_string(),
        role,
        notification_type: kind,
        title: title.to_string(),
        message: format!("{} message", title),
        read: false,
        created_at: base_time(),
        action_url: None,
        dedupe_key: None,
    }
}

pub fn task(id: &str, role: UserRole, priority: TaskPriority, count: u32) -> PendingTask {
    PendingTask {
        id: id.to_string(),
        role,
        priority,
        title: format!("Task {}", id),
        description: String::new(),
        due_date: None,
        count,
        url: None,
        dedupe_key: None,
    }
}

// ==========================================
// 场景快照
// ==========================================

/// 标准船队:
/// - 9000001 PACIFIC DAWN: ROB 150, 无计划 → CRITICAL
/// - 9000002 ATLANTIC STAR: 计划 8 / 实际 9.2 → ATTENTION (超耗)
/// - 9000003 INDIAN PEARL: 30h 后抵港, 计划待审批 → ATTENTION (即将加油)
/// - 9000004 NORDIC WIND: 正常
pub fn fleet_snapshot() -> EntitySnapshot {
    EntitySnapshot {
        vessels: vec![
            VesselBuilder::new("9000004", "NORDIC WIND").build(),
            VesselBuilder::new("9000001", "PACIFIC DAWN").rob(150.0).build(),
            VesselBuilder::new("9000002", "ATLANTIC STAR").consumption(8.0, 9.2).build(),
            VesselBuilder::new("9000003", "INDIAN PEARL")
                .eta_in_hours(30)
                .next_port("Fujairah")
                .plan("BP-3")
                .build(),
        ],
        cargoes: vec![
            CargoBuilder::new("C-200").profit(200_000.0).vessel_imo("9000004").build(),
            CargoBuilder::new("C-350").profit(350_000.0).build(),
            CargoBuilder::new("C-500").profit(500_000.0).viable(false).build(),
            CargoBuilder::new("C-PA")
                .profit(420_000.0)
                .status(CargoStatus::PendingAnalysis)
                .vessel_name("PACIFIC DAWN")
                .build(),
        ],
        bunker_plans: vec![bunker_plan("BP-3", "9000003", BunkerPlanStatus::PendingApproval)],
        notifications: vec![
            notification("N-1", UserRole::Operations, NotificationType::Info, "Noon report received"),
            notification("N-2", UserRole::Chartering, NotificationType::Warning, "Laycan reminder"),
            notification("N-3", UserRole::Operations, NotificationType::Alert, "Weather alert"),
        ],
        pending_tasks: vec![
            task("T-1", UserRole::Chartering, TaskPriority::High, 2),
            task("T-2", UserRole::Chartering, TaskPriority::Low, 1),
            task("T-3", UserRole::BunkerDesk, TaskPriority::Urgent, 3),
        ],
        action_log: vec![],
    }
}
