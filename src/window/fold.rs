//! 折叠函数 - O(size) 全量重算
//!
//! @yutiansut @quantaxis
//!
//! 每个折叠对应一种在线统计策略的读取口径：不维护任何增量状态，
//! 直接 traverse 有效桶重算。作为在线聚合的正确性基准，
//! 也可在未安装策略的窗口上做一次性读取。

use super::rolling::RollingWindow;

/// 折叠函数签名：窗口 -> (聚合值, 事件计数)
pub type WindowFoldFn = fn(&RollingWindow) -> (f64, usize);

/// 有效桶求和
pub fn window_sum(win: &RollingWindow) -> (f64, usize) {
    let mut sum = 0.0;
    let mut total = 0;
    win.traverse(|b| {
        sum += b.value;
        total += b.count;
    });
    (sum, total)
}

/// 有效桶均值：分母固定为静态桶数，与实际填充无关
pub fn window_avg(win: &RollingWindow) -> (f64, usize) {
    let (sum, total) = window_sum(win);
    (sum / win.static_item_num() as f64, total)
}

/// 有效桶最大值
///
/// 访问不足静态桶数时存在隐式零值桶，负极值向 0 托底；
/// 无可访问桶时返回 (0.0, 0)。
pub fn window_max(win: &RollingWindow) -> (f64, usize) {
    let mut max = f64::NEG_INFINITY;
    let mut total = 0;
    let mut visited = 0;
    win.traverse(|b| {
        if b.value > max {
            max = b.value;
        }
        total += b.count;
        visited += 1;
    });
    if visited == 0 {
        return (0.0, 0);
    }
    if visited < win.static_item_num() && max < 0.0 {
        max = 0.0;
    }
    (max, total)
}

/// 有效桶最小值
///
/// 访问不足静态桶数时正极值向 0 托底；无可访问桶时返回 (0.0, 0)。
pub fn window_min(win: &RollingWindow) -> (f64, usize) {
    let mut min = f64::INFINITY;
    let mut total = 0;
    let mut visited = 0;
    win.traverse(|b| {
        if b.value < min {
            min = b.value;
        }
        total += b.count;
        visited += 1;
    });
    if visited == 0 {
        return (0.0, 0);
    }
    if visited < win.static_item_num() && min > 0.0 {
        min = 0.0;
    }
    (min, total)
}
