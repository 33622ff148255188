//! 在线统计策略 - Sum / Avg / Min / Max
//!
//! @yutiansut @quantaxis
//!
//! 每种策略挂在窗口的 add/reset 钩子上增量维护聚合值：
//! - Sum / Avg: 运行和增减，O(1) 空间
//! - Min / Max: 单调双端队列维护滑动极值，均摊 O(1)，O(k) 空间 (k ≤ size)
//!
//! 统计口径必须与折叠函数 (fold) 的全量重算在任意写入与时间推进的
//! 交错下完全一致。

use serde::{Deserialize, Serialize};

use super::bucket::Bucket;
use super::ring::CircularQueue;

/// 统计策略类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatKind {
    /// 不安装策略，聚合读取恒为 0
    None,
    /// 窗口内值的和
    Sum,
    /// 窗口均值（按静态口径桶数平摊）
    Avg,
    /// 窗口内桶和的最小值
    Min,
    /// 窗口内桶和的最大值
    Max,
}

/// 统计策略（标签联合，统一操作集）
///
/// `StatKind::None` 不产生实例：未安装策略的窗口读取为定义良好的零，
/// 而不是错误。
#[derive(Debug, Clone)]
pub(crate) enum WindowStat {
    Sum(SumStat),
    Avg(AvgStat),
    Min(MinStat),
    Max(MaxStat),
}

impl WindowStat {
    /// 按类型创建与窗口同尺寸的策略
    pub(crate) fn new(kind: StatKind, size: usize) -> Option<WindowStat> {
        match kind {
            StatKind::None => None,
            StatKind::Sum => Some(WindowStat::Sum(SumStat::default())),
            StatKind::Avg => Some(WindowStat::Avg(AvgStat::new(size))),
            StatKind::Min => Some(WindowStat::Min(MinStat::new(size))),
            StatKind::Max => Some(WindowStat::Max(MaxStat::new(size))),
        }
    }

    /// 窗口每次写入前调用一次，index 为当前桶槽位
    pub(crate) fn add(&mut self, v: f64, index: usize) {
        match self {
            WindowStat::Sum(s) => s.add(v),
            WindowStat::Avg(s) => s.add(v),
            WindowStat::Min(s) => s.add(v, index),
            WindowStat::Max(s) => s.add(v, index),
        }
    }

    /// 桶被旋转出窗口时调用一次，传入清零前的桶内容
    pub(crate) fn reset(&mut self, bucket: &Bucket, index: usize) {
        match self {
            WindowStat::Sum(s) => s.reset(bucket),
            WindowStat::Avg(s) => s.reset(bucket),
            WindowStat::Min(s) => s.reset(bucket, index),
            WindowStat::Max(s) => s.reset(bucket, index),
        }
    }

    /// 当前聚合值，current 为 pos 处仍在填充的桶
    pub(crate) fn value(&self, current: &Bucket) -> f64 {
        match self {
            WindowStat::Sum(s) => s.value(current),
            WindowStat::Avg(s) => s.value(current),
            WindowStat::Min(s) => s.value(current),
            WindowStat::Max(s) => s.value(current),
        }
    }

    /// 当前事件计数
    pub(crate) fn total(&self, current: &Bucket) -> usize {
        match self {
            WindowStat::Sum(s) => s.base.total(current),
            WindowStat::Avg(s) => s.base.total(current),
            WindowStat::Min(s) => s.base.total(current),
            WindowStat::Max(s) => s.base.total(current),
        }
    }

    /// 聚合值与计数
    pub(crate) fn value_and_total(&self, current: &Bucket) -> (f64, usize) {
        (self.value(current), self.total(current))
    }

    /// 按窗口内既有桶数据初始化聚合状态（热装载时调用一次）
    ///
    /// 从最旧到最新回放已完成桶，`pos` 处的桶作为当前累加桶。
    /// 装载完成后 `total_sum` 等于窗口内事件计数之和，该不变量
    /// 此后由 add/reset 逐桶维护。
    pub(crate) fn seed(&mut self, buckets: &[Bucket], pos: usize) {
        match self {
            WindowStat::Sum(s) => s.seed(buckets),
            WindowStat::Avg(s) => s.seed(buckets),
            WindowStat::Min(s) => s.seed(buckets, pos),
            WindowStat::Max(s) => s.seed(buckets, pos),
        }
    }

    /// 切换 ignore_current：只影响读取口径，内部记账始终包含当前桶
    pub(crate) fn set_ignore_current(&mut self, ignore: bool) {
        match self {
            WindowStat::Sum(s) => s.base.ignore_current = ignore,
            WindowStat::Avg(s) => s.base.ignore_current = ignore,
            WindowStat::Min(s) => s.base.ignore_current = ignore,
            WindowStat::Max(s) => s.base.ignore_current = ignore,
        }
    }
}

/// 公共计数口径：事件总数 + 是否忽略当前桶
#[derive(Debug, Clone, Copy, Default)]
struct StatBase {
    total_sum: usize,
    ignore_current: bool,
}

impl StatBase {
    fn total(&self, current: &Bucket) -> usize {
        if self.ignore_current {
            self.total_sum - current.count
        } else {
            self.total_sum
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Sum - 运行和
// ═══════════════════════════════════════════════════════════════════════════

/// 窗口求和：add 累加，reset 减去被逐出桶的贡献
#[derive(Debug, Clone, Default)]
pub(crate) struct SumStat {
    base: StatBase,
    val_sum: f64,
}

impl SumStat {
    fn add(&mut self, v: f64) {
        self.val_sum += v;
        self.base.total_sum += 1;
    }

    fn reset(&mut self, bucket: &Bucket) {
        self.val_sum -= bucket.value;
        self.base.total_sum -= bucket.count;
    }

    fn seed(&mut self, buckets: &[Bucket]) {
        for b in buckets {
            self.val_sum += b.value;
            self.base.total_sum += b.count;
        }
    }

    fn value(&self, current: &Bucket) -> f64 {
        if self.base.ignore_current {
            self.val_sum - current.value
        } else {
            self.val_sum
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Avg - 静态口径均值
// ═══════════════════════════════════════════════════════════════════════════

/// 窗口均值：与 Sum 同口径记账，读取时除以静态桶数
/// (size，ignore_current 时为 size - 1)，与实际填充的桶数无关
#[derive(Debug, Clone)]
pub(crate) struct AvgStat {
    base: StatBase,
    size: usize,
    val_sum: f64,
}

impl AvgStat {
    fn new(size: usize) -> Self {
        Self {
            base: StatBase::default(),
            size,
            val_sum: 0.0,
        }
    }

    fn add(&mut self, v: f64) {
        self.val_sum += v;
        self.base.total_sum += 1;
    }

    fn reset(&mut self, bucket: &Bucket) {
        self.val_sum -= bucket.value;
        self.base.total_sum -= bucket.count;
    }

    fn seed(&mut self, buckets: &[Bucket]) {
        for b in buckets {
            self.val_sum += b.value;
            self.base.total_sum += b.count;
        }
    }

    fn value(&self, current: &Bucket) -> f64 {
        if self.base.ignore_current {
            (self.val_sum - current.value) / (self.size - 1) as f64
        } else {
            self.val_sum / self.size as f64
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Max - 单调双端队列滑动极值
// ═══════════════════════════════════════════════════════════════════════════

/// 窗口最大值
///
/// `cur_val` 累加 `cur_pos` 处正在写入的桶；已完成桶的桶和按
/// 队首恒为最大的单调序存入环形队列。每个值最多入队/出队一次，
/// add/reset 均摊 O(1)。
#[derive(Debug, Clone)]
pub(crate) struct MaxStat {
    base: StatBase,
    size: usize,
    cur_pos: usize,
    cur_val: f64,
    /// 已折叠进队列且仍在窗口内的非零桶数量，
    /// 不足 size - 1 说明窗口尚未完成一整圈旋转
    completed: usize,
    queue: CircularQueue,
}

impl MaxStat {
    fn new(size: usize) -> Self {
        Self {
            base: StatBase::default(),
            size,
            cur_pos: 0,
            cur_val: 0.0,
            completed: 0,
            queue: CircularQueue::new(size),
        }
    }

    fn add(&mut self, v: f64, index: usize) {
        if index != self.cur_pos {
            // 中间被跳过的桶是隐式零值，只前移队列游标，不产生条目
            let gap = (index + self.size - self.cur_pos) % self.size;
            self.queue.push_empty(gap);
            self.cur_pos = index;
        }
        self.cur_val += v;
        self.base.total_sum += 1;
    }

    /// 旋转按时间序逐桶调用
    fn reset(&mut self, bucket: &Bucket, index: usize) {
        if bucket.value == self.queue.first() {
            // 被逐出的桶正是队首极值，其时效已过
            self.queue.shift();
        }
        if self.cur_val != 0.0 {
            self.completed += 1;
        }
        if index == (self.cur_pos + 1) % self.size && self.cur_val != 0.0 {
            // 当前累加桶的下一槽位被逐出，说明上一段累加已经结束：
            // 队尾严格小于 cur_val 的条目此后不可能再成为窗口最大值。
            // 严格比较保证等值桶各占一个条目，随各自到期一一弹出。
            while !self.queue.is_empty() && self.queue.last() < self.cur_val {
                self.queue.pop();
            }
            self.queue.push(self.cur_val);
            self.cur_val = 0.0;
            self.cur_pos = (self.cur_pos + 1) % self.size;
        }
        self.base.total_sum -= bucket.count;
        if bucket.value != 0.0 && self.completed > 0 {
            self.completed -= 1;
        }
    }

    /// 按时间序回放既有桶：已完成的非零桶依单调序入队
    fn seed(&mut self, buckets: &[Bucket], pos: usize) {
        for i in 1..self.size {
            let b = &buckets[(pos + i) % self.size];
            if b.value != 0.0 {
                while !self.queue.is_empty() && self.queue.last() < b.value {
                    self.queue.pop();
                }
                self.queue.push(b.value);
                self.completed += 1;
            }
            self.base.total_sum += b.count;
        }
        self.cur_pos = pos;
        self.cur_val = buckets[pos].value;
        self.base.total_sum += buckets[pos].count;
    }

    fn value(&self, current: &Bucket) -> f64 {
        // 未完成一整圈旋转时，从未写入的桶是隐式零值，参与取极值
        let mut max = self.queue.first();
        if max < 0.0 && self.completed < self.size - 1 {
            max = 0.0;
        }
        if self.base.ignore_current {
            return max;
        }
        max.max(current.value)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Min - 与 Max 镜像，所有比较取反
// ═══════════════════════════════════════════════════════════════════════════

/// 窗口最小值，队首恒为最小
#[derive(Debug, Clone)]
pub(crate) struct MinStat {
    base: StatBase,
    size: usize,
    cur_pos: usize,
    cur_val: f64,
    completed: usize,
    queue: CircularQueue,
}

impl MinStat {
    fn new(size: usize) -> Self {
        Self {
            base: StatBase::default(),
            size,
            cur_pos: 0,
            cur_val: 0.0,
            completed: 0,
            queue: CircularQueue::new(size),
        }
    }

    fn add(&mut self, v: f64, index: usize) {
        if index != self.cur_pos {
            let gap = (index + self.size - self.cur_pos) % self.size;
            self.queue.push_empty(gap);
            self.cur_pos = index;
        }
        self.cur_val += v;
        self.base.total_sum += 1;
    }

    fn reset(&mut self, bucket: &Bucket, index: usize) {
        if bucket.value == self.queue.first() {
            self.queue.shift();
        }
        if self.cur_val != 0.0 {
            self.completed += 1;
        }
        if index == (self.cur_pos + 1) % self.size && self.cur_val != 0.0 {
            while !self.queue.is_empty() && self.queue.last() > self.cur_val {
                self.queue.pop();
            }
            self.queue.push(self.cur_val);
            self.cur_val = 0.0;
            self.cur_pos = (self.cur_pos + 1) % self.size;
        }
        self.base.total_sum -= bucket.count;
        if bucket.value != 0.0 && self.completed > 0 {
            self.completed -= 1;
        }
    }

    fn seed(&mut self, buckets: &[Bucket], pos: usize) {
        for i in 1..self.size {
            let b = &buckets[(pos + i) % self.size];
            if b.value != 0.0 {
                while !self.queue.is_empty() && self.queue.last() > b.value {
                    self.queue.pop();
                }
                self.queue.push(b.value);
                self.completed += 1;
            }
            self.base.total_sum += b.count;
        }
        self.cur_pos = pos;
        self.cur_val = buckets[pos].value;
        self.base.total_sum += buckets[pos].count;
    }

    fn value(&self, current: &Bucket) -> f64 {
        let mut min = self.queue.first();
        if min > 0.0 && self.completed < self.size - 1 {
            min = 0.0;
        }
        if self.base.ignore_current {
            return min;
        }
        min.min(current.value)
    }
}
