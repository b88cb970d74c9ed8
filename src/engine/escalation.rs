// ==========================================
// 船舶燃油补给规划 - 紧急通知升级提醒
// ==========================================
// 职责: 角色范围未读数严格上升时, 对每条 URGENT/ALERT 未读触发提醒
// 红线: 每次评估后都更新记录值; 未读数持平/下降不重复提醒
// ==========================================
// 轮询: EscalationPoller 为 tokio 后台任务, guard 释放即停止
// ==========================================

use crate::config::EscalationConfig;
use crate::domain::{Notification, NotificationType, UserRole};
use crate::engine::notification::{escalating_unread, scoped_unread_count};
use crate::store::EntityStore;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// 单条升级提醒
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Escalation {
    pub notification_id: String,
    pub role: UserRole,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    /// 应用内临时提示
    pub toast: bool,
    /// 提示音
    pub sound: bool,
}

/// 升级提醒接收方 (展示层实现: toast / 提示音)
pub trait EscalationSink: Send + Sync {
    fn escalate(&self, escalation: &Escalation);
}

/// 收集型接收方, 供测试与无界面场景使用
#[derive(Debug, Default)]
pub struct CollectingEscalationSink {
    received: Mutex<Vec<Escalation>>,
}

impl CollectingEscalationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn received(&self) -> Vec<Escalation> {
        self.received.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.received.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EscalationSink for CollectingEscalationSink {
    fn escalate(&self, escalation: &Escalation) {
        if let Ok(mut received) = self.received.lock() {
            received.push(escalation.clone());
        }
    }
}

// ==========================================
// EscalationTracker - 升级判定
// ==========================================
#[derive(Debug, Clone)]
pub struct EscalationTracker {
    role: UserRole,
    config: EscalationConfig,
    recorded_unread: usize,
}

impl EscalationTracker {
    /// 初始记录值为 0: 打开时已有的紧急未读会提醒一次
    pub fn new(role: UserRole, config: EscalationConfig) -> Self {
        Self {
            role,
            config,
            recorded_unread: 0,
        }
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    pub fn recorded_unread(&self) -> usize {
        self.recorded_unread
    }

    /// 评估一次, 返回需要发出的提醒
    pub fn evaluate(&mut self, notifications: &[Notification]) -> Vec<Escalation> {
        let current = scoped_unread_count(notifications, self.role);
        let increased = current > self.recorded_unread;
        self.recorded_unread = current;

        if !increased || !(self.config.toast_enabled || self.config.sound_enabled) {
            return Vec::new();
        }

        let escalations: Vec<Escalation> = escalating_unread(notifications, self.role)
            .into_iter()
            .map(|n| Escalation {
                notification_id: n.id.clone(),
                role: n.role,
                notification_type: n.notification_type,
                title: n.title.clone(),
                message: n.message.clone(),
                toast: self.config.toast_enabled,
                sound: self.config.sound_enabled,
            })
            .collect();

        if !escalations.is_empty() {
            tracing::info!(
                role = %self.role,
                unread = current,
                escalations = escalations.len(),
                "紧急通知升级提醒"
            );
        }
        escalations
    }

    /// 评估并投递给接收方
    pub fn evaluate_into(&mut self, notifications: &[Notification], sink: &dyn EscalationSink) -> usize {
        let escalations = self.evaluate(notifications);
        for escalation in &escalations {
            sink.escalate(escalation);
        }
        escalations.len()
    }
}

// ==========================================
// EscalationPoller - 定时轮询任务
// ==========================================

/// 轮询任务句柄; drop 即取消
pub struct EscalationPollerGuard {
    shutdown: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
    tracker: Arc<Mutex<EscalationTracker>>,
}

impl EscalationPollerGuard {
    /// 与轮询共享的判定器 (状态变更后可立即评估一次)
    pub fn tracker(&self) -> Arc<Mutex<EscalationTracker>> {
        Arc::clone(&self.tracker)
    }

    /// 通知任务退出并等待其结束
    pub async fn stop(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for EscalationPollerGuard {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

pub struct EscalationPoller;

impl EscalationPoller {
    /// 启动轮询; 第一次 tick 立即执行
    ///
    /// 必须在 tokio 运行时内调用
    pub fn spawn(
        store: Arc<EntityStore>,
        role: UserRole,
        config: EscalationConfig,
        sink: Arc<dyn EscalationSink>,
    ) -> EscalationPollerGuard {
        let period = config.poll_interval();
        let tracker = Arc::new(Mutex::new(EscalationTracker::new(role, config)));
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let task_tracker = Arc::clone(&tracker);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        Self::poll_once(&store, &task_tracker, sink.as_ref());
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            tracing::debug!(role = %role, "升级提醒轮询已停止");
        });

        tracing::info!(role = %role, period_secs = period.as_secs(), "升级提醒轮询已启动");
        EscalationPollerGuard {
            shutdown: shutdown_tx,
            handle: Some(handle),
            tracker,
        }
    }

    fn poll_once(store: &EntityStore, tracker: &Mutex<EscalationTracker>, sink: &dyn EscalationSink) {
        let notifications = match store.read(|s| s.notifications.clone()) {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(error = %e, "读取通知失败，跳过本次轮询");
                return;
            }
        };
        match tracker.lock() {
            Ok(mut tracker) => {
                tracker.evaluate_into(&notifications, sink);
            }
            Err(e) => tracing::warn!(error = %e, "升级判定器锁获取失败"),
        }
    }
}
