//! 环形队列 - 单调双端队列的底层存储
//!
//! @yutiansut @quantaxis
//!
//! 固定容量，预留一个哨兵槽位：`first == end` 表示空，
//! `first == (end + 1) % capacity` 表示满，无需独立的占用计数器。
//! 逻辑容量为 size，物理槽位为 size + 1，所有操作 O(1)。

/// 固定容量环形队列 (f64 特化)
///
/// 空队列的取值操作统一返回 0.0 —— 队列中只存放有意义的桶和，
/// 0.0 即"无值"哨兵。
#[derive(Debug, Clone)]
pub struct CircularQueue {
    capacity: usize,
    elements: Vec<f64>,
    first: usize,
    end: usize,
}

impl CircularQueue {
    /// 创建逻辑容量为 size 的环形队列
    pub fn new(size: usize) -> Self {
        let capacity = size + 1;
        Self {
            capacity,
            elements: vec![0.0; capacity],
            first: 0,
            end: 0,
        }
    }

    /// 是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.first == self.end
    }

    /// 是否已满
    #[inline]
    pub fn is_full(&self) -> bool {
        self.first == (self.end + 1) % self.capacity
    }

    /// 当前元素数量
    #[inline]
    pub fn len(&self) -> usize {
        (self.end + self.capacity - self.first) % self.capacity
    }

    /// 逻辑容量
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity - 1
    }

    /// 尾部压入
    ///
    /// 队列满时 panic：容量由调用方按窗口大小预留，压满意味着
    /// 跳桶计算与窗口桶数脱钩，属于内部不变量被破坏，不可恢复。
    pub fn push(&mut self, e: f64) {
        if self.is_full() {
            panic!(
                "CircularQueue overflow: push into a full queue (len = {})",
                self.len()
            );
        }
        self.elements[self.end] = e;
        self.end = (self.end + 1) % self.capacity;
    }

    /// 尾指针前移 n 个槽位，不写入任何值
    ///
    /// 表示 n 个被跳过的隐式零值桶。
    pub fn push_empty(&mut self, n: usize) {
        if self.len() + n + 1 > self.capacity {
            panic!(
                "CircularQueue overflow: push_empty({}) with len = {}",
                n,
                self.len()
            );
        }
        self.end = (self.end + n) % self.capacity;
    }

    /// 弹出队首（最早压入），空队列返回 0.0
    pub fn shift(&mut self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let e = self.elements[self.first];
        self.first = (self.first + 1) % self.capacity;
        e
    }

    /// 弹出队尾（最晚压入），空队列返回 0.0
    pub fn pop(&mut self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.end = (self.end + self.capacity - 1) % self.capacity;
        self.elements[self.end]
    }

    /// 队首值（不弹出），空队列返回 0.0
    pub fn first(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.elements[self.first]
    }

    /// 队尾值（不弹出），空队列返回 0.0
    pub fn last(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.elements[(self.end + self.capacity - 1) % self.capacity]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_shift() {
        let mut q = CircularQueue::new(4);
        for v in [1.0, 2.0, 3.0, 4.0] {
            q.push(v);
        }
        assert!(q.is_full());

        assert_eq!(q.shift(), 1.0);
        assert_eq!(q.shift(), 2.0);
        assert_eq!(q.shift(), 3.0);
        assert_eq!(q.shift(), 4.0);
        assert!(q.is_empty());
    }

    #[test]
    fn test_lifo_pop() {
        let mut q = CircularQueue::new(4);
        for v in [1.0, 2.0, 3.0, 4.0] {
            q.push(v);
        }

        assert_eq!(q.pop(), 4.0);
        assert_eq!(q.pop(), 3.0);
        assert_eq!(q.pop(), 2.0);
        assert_eq!(q.pop(), 1.0);
        assert!(q.is_empty());
    }

    #[test]
    fn test_capacity_exact() {
        let mut q = CircularQueue::new(3);
        assert_eq!(q.capacity(), 3);

        for i in 0..3 {
            assert!(!q.is_full());
            q.push(i as f64);
        }
        assert!(q.is_full());
        assert_eq!(q.len(), 3);
    }

    #[test]
    #[should_panic(expected = "CircularQueue overflow")]
    fn test_push_overflow_panics() {
        let mut q = CircularQueue::new(2);
        q.push(1.0);
        q.push(2.0);
        q.push(3.0);
    }

    #[test]
    fn test_empty_sentinels() {
        let mut q = CircularQueue::new(2);
        assert!(q.is_empty());
        assert_eq!(q.len(), 0);
        assert_eq!(q.shift(), 0.0);
        assert_eq!(q.pop(), 0.0);
        assert_eq!(q.first(), 0.0);
        assert_eq!(q.last(), 0.0);
    }

    #[test]
    fn test_peek_first_last() {
        let mut q = CircularQueue::new(3);
        q.push(7.0);
        q.push(8.0);

        assert_eq!(q.first(), 7.0);
        assert_eq!(q.last(), 8.0);
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn test_push_empty_advances_tail() {
        let mut q = CircularQueue::new(5);
        q.push(7.0);
        q.push_empty(2);
        assert_eq!(q.len(), 3);
        assert_eq!(q.first(), 7.0);

        // 新建队列上被跳过的槽位读到初始 0.0
        assert_eq!(q.shift(), 7.0);
        assert_eq!(q.shift(), 0.0);
        assert_eq!(q.shift(), 0.0);
        assert!(q.is_empty());
    }

    #[test]
    #[should_panic(expected = "CircularQueue overflow")]
    fn test_push_empty_overflow_panics() {
        let mut q = CircularQueue::new(3);
        q.push(1.0);
        q.push_empty(3);
    }

    #[test]
    fn test_wrap_around() {
        let mut q = CircularQueue::new(2);
        // 反复压入/弹出跨越哨兵槽位边界
        for round in 0..5 {
            q.push(round as f64);
            q.push(round as f64 + 0.5);
            assert!(q.is_full());
            assert_eq!(q.shift(), round as f64);
            assert_eq!(q.shift(), round as f64 + 0.5);
            assert!(q.is_empty());
        }
    }
}
