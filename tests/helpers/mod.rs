// ==========================================
// 集成测试共享辅助
// ==========================================

#![allow(dead_code)]

pub mod log_capture;
pub mod mock_sink;
