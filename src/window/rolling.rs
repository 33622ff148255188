//! 滚动窗口 - 时间分桶旋转引擎
//!
//! @yutiansut @quantaxis
//!
//! 固定 size 个桶按逝去时间环形索引；写入时懒惰旋转过期桶，
//! 完全跳过的时间片各被清理恰好一次，无后台定时器。
//!
//! 并发模型（单把读写锁）：
//! - `add`: 写锁内完成 旋转 + 写入，构成原子单元
//! - `traverse`: 只持读锁，不旋转，读取可能滞后至多一个 interval
//! - `value`/`total`: 先写锁强制旋转，释放后再取读锁读取在线聚合；
//!   两次加锁不构成原子区间，依赖旋转的幂等性与单调性保证安全

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::timec::{DefaultTimec, Timec};
use crate::{Result, WindowError};

use super::bucket::Bucket;
use super::stat::{StatKind, WindowStat};

/// 锁内可变状态
#[derive(Debug)]
struct WindowInner {
    buckets: Vec<Bucket>,
    pos: usize,
    last_time: Instant,
    ignore_current: bool,
    stat: Option<WindowStat>,
}

impl WindowInner {
    /// 相对 last_time 逝去的完整 interval 数，夹逼到 [0, size]
    fn offset(&self, size: usize, interval: Duration, now: Instant) -> usize {
        let elapsed = now.saturating_duration_since(self.last_time);
        let offset = (elapsed.as_nanos() / interval.as_nanos()) as usize;
        if offset < size {
            offset
        } else {
            size
        }
    }

    /// 旋转：从 pos + 1 起清理 offset 个过期桶
    ///
    /// 环形遍历拆成跨越回绕点的两段线性遍历；每个被访问的桶先经
    /// 策略的 reset 钩子（移除其既有贡献），再原地清零。
    fn update_pos(&mut self, size: usize, interval: Duration, now: Instant) {
        let offset = self.offset(size, interval, now);
        if offset == 0 {
            return;
        }
        log::trace!("rolling window rotate: pos = {}, offset = {}", self.pos, offset);
        if offset == size {
            log::debug!("rolling window fully stale, resetting all {} buckets", size);
        }

        let mut pos = self.pos;
        let start = pos + 1;
        let mut steps = start + offset;
        let mut remainder = 0;
        if steps > size {
            remainder = steps - size;
            steps = size;
        }
        for i in start..steps {
            self.reset_slot(i);
            pos = i;
        }
        for i in 0..remainder {
            self.reset_slot(i);
            pos = i;
        }
        self.pos = pos;
        self.last_time = now;
    }

    fn reset_slot(&mut self, i: usize) {
        if let Some(stat) = self.stat.as_mut() {
            stat.reset(&self.buckets[i], i);
        }
        self.buckets[i].reset();
    }
}

/// 滚动窗口
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use qawindow::{ManualTimec, RollingWindow, StatKind, Timec};
///
/// let timec = Arc::new(ManualTimec::new());
/// let win = RollingWindow::new(3, Duration::from_millis(50))
///     .unwrap()
///     .with_stat(StatKind::Sum)
///     .with_timec(timec.clone());
///
/// win.add(1.0);
/// timec.advance(Duration::from_millis(50));
/// win.add(2.0);
///
/// assert_eq!(win.value(), 3.0);
/// assert_eq!(win.total(), 2);
/// ```
pub struct RollingWindow {
    size: usize,
    interval: Duration,
    timec: Arc<dyn Timec>,
    inner: RwLock<WindowInner>,
}

impl RollingWindow {
    /// 创建滚动窗口：size 个桶，每桶跨度 interval
    ///
    /// size 为 0 或 interval 为 0 会破坏旋转算术，构造期直接拒绝。
    pub fn new(size: usize, interval: Duration) -> Result<Self> {
        if size == 0 {
            return Err(WindowError::InvalidParameter(
                "rolling window size must be positive".to_string(),
            ));
        }
        if interval.is_zero() {
            return Err(WindowError::InvalidParameter(
                "rolling window interval must be positive".to_string(),
            ));
        }

        let timec: Arc<dyn Timec> = Arc::new(DefaultTimec);
        let now = timec.now();
        Ok(Self {
            size,
            interval,
            timec,
            inner: RwLock::new(WindowInner {
                buckets: vec![Bucket::default(); size],
                pos: 0,
                last_time: now,
                ignore_current: false,
                stat: None,
            }),
        })
    }

    // ------------------------------------------------------------------
    // 构造期选项（链式）
    // ------------------------------------------------------------------

    /// 读取聚合时忽略仍在填充中的当前桶
    ///
    /// `size == 1` 时该口径下没有已完成桶，Avg 的静态分母为 0，
    /// 读取结果未定义。
    pub fn ignore_current_bucket(self, ignore: bool) -> Self {
        self.set_ignore_current(ignore);
        self
    }

    /// 安装在线统计策略
    pub fn with_stat(self, kind: StatKind) -> Self {
        self.set_stat(kind);
        self
    }

    /// 替换时间源，并以新时钟重置窗口起点
    ///
    /// 仅建议在构造期使用（测试注入手动时钟）。
    pub fn with_timec(mut self, timec: Arc<dyn Timec>) -> Self {
        let now = timec.now();
        self.timec = timec;
        self.inner.write().last_time = now;
        self
    }

    // ------------------------------------------------------------------
    // 运行期设置
    // ------------------------------------------------------------------

    /// 切换 ignore_current，同步到已安装的策略
    ///
    /// `size == 1` 时开启该口径会使 Avg 的静态分母为 0，读取结果未定义。
    pub fn set_ignore_current(&self, ignore: bool) {
        let mut inner = self.inner.write();
        inner.ignore_current = ignore;
        if let Some(stat) = inner.stat.as_mut() {
            stat.set_ignore_current(ignore);
        }
    }

    /// 安装/卸载策略（`StatKind::None` 为卸载）
    ///
    /// 先旋转到当前时刻，再按窗口内既有桶数据初始化聚合状态，
    /// 热装载后的读取与折叠重算保持一致。
    pub fn set_stat(&self, kind: StatKind) {
        let mut guard = self.inner.write();
        let now = self.timec.now();
        let inner = &mut *guard;
        inner.update_pos(self.size, self.interval, now);
        let mut stat = WindowStat::new(kind, self.size);
        if let Some(s) = stat.as_mut() {
            s.set_ignore_current(inner.ignore_current);
            s.seed(&inner.buckets, inner.pos);
        }
        inner.stat = stat;
    }

    // ------------------------------------------------------------------
    // 写路径
    // ------------------------------------------------------------------

    /// 向当前桶写入一个值
    ///
    /// 写锁内先旋转再写入，保证新值落在当前时间片对应的桶里。
    /// 任何值都不会被拒绝。
    pub fn add(&self, v: f64) {
        let mut guard = self.inner.write();
        let now = self.timec.now();
        let inner = &mut *guard;
        inner.update_pos(self.size, self.interval, now);
        if let Some(stat) = inner.stat.as_mut() {
            stat.add(v, inner.pos);
        }
        let pos = inner.pos;
        inner.buckets[pos].add(v);
    }

    // ------------------------------------------------------------------
    // 读路径
    // ------------------------------------------------------------------

    /// 只读遍历当前有效桶（从最旧到最新）
    ///
    /// 只持读锁，从不旋转：读到的状态可能滞后至多一个 interval，
    /// 直到下一次 add 或强制旋转。并发 traverse 之间互不竞争。
    pub fn traverse<F>(&self, mut visitor: F)
    where
        F: FnMut(&Bucket),
    {
        let inner = self.inner.read();
        let span = inner.offset(self.size, self.interval, self.timec.now());
        // 当前桶数据不完整，ignore_current 口径下跳过
        let count = if span == 0 && inner.ignore_current {
            self.size - 1
        } else {
            self.size - span
        };
        if count > 0 {
            let start = (inner.pos + span + 1) % self.size;
            for i in 0..count {
                visitor(&inner.buckets[(start + i) % self.size]);
            }
        }
    }

    /// 在线聚合值（未安装策略时恒为 0.0）
    pub fn value(&self) -> f64 {
        self.force_rotate();
        let inner = self.inner.read();
        match inner.stat.as_ref() {
            Some(stat) => stat.value(&inner.buckets[inner.pos]),
            None => 0.0,
        }
    }

    /// 在线事件计数（未安装策略时恒为 0）
    pub fn total(&self) -> usize {
        self.force_rotate();
        let inner = self.inner.read();
        match inner.stat.as_ref() {
            Some(stat) => stat.total(&inner.buckets[inner.pos]),
            None => 0,
        }
    }

    /// 聚合值与计数（未安装策略时为 (0.0, 0)）
    pub fn value_and_total(&self) -> (f64, usize) {
        self.force_rotate();
        let inner = self.inner.read();
        match inner.stat.as_ref() {
            Some(stat) => stat.value_and_total(&inner.buckets[inner.pos]),
            None => (0.0, 0),
        }
    }

    /// 写锁内强制旋转一次
    ///
    /// 与随后的读锁不构成原子区间：并发 add 可能在间隙再次旋转，
    /// 旋转幂等且单调，零逝时重复执行等价于空操作。
    fn force_rotate(&self) {
        let mut guard = self.inner.write();
        let now = self.timec.now();
        guard.update_pos(self.size, self.interval, now);
    }

    // ------------------------------------------------------------------
    // 元信息
    // ------------------------------------------------------------------

    /// 窗口桶数
    pub fn size(&self) -> usize {
        self.size
    }

    /// 单桶时间跨度
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// 最近一次旋转落位的时刻
    pub fn last_visit(&self) -> Instant {
        self.inner.read().last_time
    }

    /// 静态口径的桶数：ignore_current 时为 size - 1
    ///
    /// Avg 的分母与折叠函数的极值托底都以它为准，与实际填充无关。
    pub fn static_item_num(&self) -> usize {
        if self.inner.read().ignore_current {
            self.size - 1
        } else {
            self.size
        }
    }
}
