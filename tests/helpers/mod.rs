// ==========================================
// 集成测试辅助模块
// ==========================================
#![allow(dead_code)]

pub mod fixture_builder;
