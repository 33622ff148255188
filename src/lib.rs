//! # QAWINDOW-RS
//!
//! 高性能时间分桶滑动窗口统计 - 限流/熔断/自适应降载的统计核心
//!
//! @yutiansut @quantaxis
//!
//! ## 核心能力
//!
//! - **滚动窗口**: 固定桶数 + 固定时间间隔，写入时懒惰旋转，无后台定时器
//! - **在线统计**: Sum / Avg / Min / Max 增量维护，O(1) 读取
//! - **单调双端队列**: 环形队列实现的滑动窗口极值，均摊 O(1)
//! - **离线折叠**: O(size) 全量遍历重算，作为在线统计的正确性基准
//! - **可注入时钟**: Timec 抽象，确定性测试无需真实睡眠
//!
//! ## 架构设计
//!
//! ```text
//! add(v)    ──► 旋转过期桶 (stat.reset) ──► 写入当前桶 (stat.add)
//! value()   ──► 强制旋转 (写锁) ──► 读取在线聚合 (读锁)
//! traverse  ──► 只读遍历有效桶 (读锁，不旋转)
//! ```
//!
//! ## 并发模型
//!
//! 单把 `parking_lot::RwLock` 保护全部可变状态：写路径（旋转 + 写入）
//! 持写锁作为原子单元；读路径只持读锁，允许读到至多滞后一个
//! interval 的状态。

#![allow(dead_code)]
#![allow(unused_imports)]

// ============================================================================
// 外部依赖
// ============================================================================

// 并发工具
pub use parking_lot;

// 序列化
pub use serde;

// 日志
pub use log;

// 错误处理
pub use thiserror;

// ============================================================================
// 内部模块
// ============================================================================

/// 时钟抽象 - 可注入时间源
pub mod timec;

/// 滑动窗口核心 (桶 / 环形队列 / 在线统计 / 折叠函数)
pub mod window;

pub use timec::{DefaultTimec, ManualTimec, Timec};
pub use window::{
    window_avg, window_max, window_min, window_sum, Bucket, CircularQueue, RollingWindow,
    StatKind, WindowFoldFn,
};

// ============================================================================
// 全局错误类型
// ============================================================================

/// 窗口错误类型
#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, WindowError>;
