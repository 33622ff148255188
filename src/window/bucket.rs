//! 时间桶 - 单时间片累加器

use serde::{Deserialize, Serialize};

/// 单个时间片的累加器：值的和 + 事件计数
///
/// 由 RollingWindow 在固定槽位独占持有，构造时一次性分配，
/// 之后只会被原地累加或清零，不会单独销毁。
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    /// 本时间片内所有 add 值的和
    pub value: f64,
    /// 本时间片内 add 的次数
    pub count: usize,
}

impl Bucket {
    /// 累加一个值
    #[inline]
    pub fn add(&mut self, v: f64) {
        self.value += v;
        self.count += 1;
    }

    /// 清零（桶被旋转出窗口时调用）
    #[inline]
    pub fn reset(&mut self) {
        self.value = 0.0;
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_add_reset() {
        let mut b = Bucket::default();
        assert_eq!(b.value, 0.0);
        assert_eq!(b.count, 0);

        b.add(1.5);
        b.add(-0.5);
        assert_eq!(b.value, 1.0);
        assert_eq!(b.count, 2);

        b.reset();
        assert_eq!(b, Bucket::default());
    }

    #[test]
    fn test_bucket_serde() {
        let mut b = Bucket::default();
        b.add(3.0);

        let json = serde_json::to_string(&b).unwrap();
        let back: Bucket = serde_json::from_str(&json).unwrap();
        assert_eq!(back, b);
    }
}
