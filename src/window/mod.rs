//! 滑动窗口模块
//!
//! @yutiansut @quantaxis
//!
//! 时间分桶滑动窗口及其统计组件：
//! - 时间桶 (Bucket): 单时间片的累加器
//! - 环形队列 (CircularQueue): 单调双端队列的底层存储
//! - 在线统计 (StatKind/WindowStat): Sum/Avg/Min/Max 增量聚合
//! - 滚动窗口 (RollingWindow): 时间分桶旋转引擎
//! - 折叠函数 (window_*): O(size) 全量重算，正确性基准

pub mod bucket;
pub mod ring;
pub mod stat;
pub mod rolling;
pub mod fold;

pub use bucket::Bucket;
pub use ring::CircularQueue;
pub use stat::StatKind;
pub use rolling::RollingWindow;
pub use fold::{window_avg, window_max, window_min, window_sum, WindowFoldFn};
