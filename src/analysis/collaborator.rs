// ==========================================
// 船舶燃油补给规划 - 分析服务接口
// ==========================================
// 用途: 货盘经济性/风险分析的外部协作方
// 实现者: 展示层注入 (远程服务 / 模拟实现)
// ==========================================

use async_trait::async_trait;

#[async_trait]
pub trait AnalysisCollaborator: Send + Sync {
    /// 分析指定货盘
    ///
    /// # 返回
    /// - Ok(()): 分析完成, 货盘可进入待决策
    /// - Err: 分析失败, 货盘状态不变
    async fn analyze(&self, cargo_ids: &[String]) -> anyhow::Result<()>;
}

/// 立即成功的分析服务 (本地演示/测试)
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateAnalysisCollaborator;

#[async_trait]
impl AnalysisCollaborator for ImmediateAnalysisCollaborator {
    async fn analyze(&self, cargo_ids: &[String]) -> anyhow::Result<()> {
        tracing::debug!(count = cargo_ids.len(), "分析完成(本地)");
        Ok(())
    }
}
