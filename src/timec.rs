//! 时钟抽象 - 可注入时间源
//!
//! @yutiansut @quantaxis
//!
//! 窗口从不直接读取系统时钟，所有时间都经由 `Timec` 获取：
//! - `DefaultTimec`: 真实时钟，`advance` 为真实睡眠
//! - `ManualTimec`: 手动时钟，`advance` 仅推进内部时刻，测试无需睡眠

use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// 时间源能力集
pub trait Timec: Send + Sync {
    /// 当前时刻
    fn now(&self) -> Instant;

    /// 推进时间（真实时钟为睡眠；手动时钟仅移动内部时刻）
    fn advance(&self, d: Duration);
}

/// 默认时间源 - 真实系统时钟
#[derive(Debug, Default)]
pub struct DefaultTimec;

impl Timec for DefaultTimec {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn advance(&self, d: Duration) {
        std::thread::sleep(d);
    }
}

/// 手动时间源 - 确定性测试专用
///
/// 与原生时钟共享同一能力集，依赖方可以在不真实睡眠的前提下
/// 精确控制时间推进。
#[derive(Debug)]
pub struct ManualTimec {
    now: Mutex<Instant>,
}

impl ManualTimec {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }
}

impl Default for ManualTimec {
    fn default() -> Self {
        Self::new()
    }
}

impl Timec for ManualTimec {
    fn now(&self) -> Instant {
        *self.now.lock()
    }

    fn advance(&self, d: Duration) {
        *self.now.lock() += d;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_timec_advance() {
        let tc = ManualTimec::new();
        let t0 = tc.now();

        tc.advance(Duration::from_millis(50));
        assert_eq!(tc.now() - t0, Duration::from_millis(50));

        // now 不推进则保持不变
        assert_eq!(tc.now(), tc.now());

        tc.advance(Duration::from_millis(25));
        assert_eq!(tc.now() - t0, Duration::from_millis(75));
    }

    #[test]
    fn test_default_timec_monotonic() {
        let tc = DefaultTimec;
        let t0 = tc.now();
        let t1 = tc.now();
        assert!(t1 >= t0);
    }
}
