//! 滚动窗口场景集成测试
//!
//! 测试流程：
//! 1. 手动时钟与真实时钟各跑一遍同一场景
//! 2. 验证桶旋转、ignore_current 口径、全窗口归约
//! 3. 并发读写冒烟测试

use qawindow::{DefaultTimec, ManualTimec, RollingWindow, Timec};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const INTERVAL: Duration = Duration::from_millis(50);

fn clock_list() -> Vec<Arc<dyn Timec>> {
    let _ = env_logger::builder().is_test(true).try_init();
    vec![Arc::new(ManualTimec::new()), Arc::new(DefaultTimec)]
}

fn list_buckets(win: &RollingWindow) -> Vec<f64> {
    let mut buckets = Vec::new();
    win.traverse(|b| buckets.push(b.value));
    buckets
}

#[test]
fn test_rolling_window_add() {
    const SIZE: usize = 3;
    for timec in clock_list() {
        let win = RollingWindow::new(SIZE, INTERVAL)
            .unwrap()
            .with_timec(timec.clone());

        assert_eq!(list_buckets(&win), vec![0.0, 0.0, 0.0]);
        win.add(1.0);
        assert_eq!(list_buckets(&win), vec![0.0, 0.0, 1.0]);

        timec.advance(INTERVAL);
        win.add(2.0);
        win.add(3.0);
        assert_eq!(list_buckets(&win), vec![0.0, 1.0, 5.0]);

        timec.advance(INTERVAL);
        win.add(4.0);
        win.add(5.0);
        win.add(6.0);
        assert_eq!(list_buckets(&win), vec![1.0, 5.0, 15.0]);

        timec.advance(INTERVAL);
        win.add(7.0);
        assert_eq!(list_buckets(&win), vec![5.0, 15.0, 7.0]);
    }
}

#[test]
fn test_rolling_window_reset() {
    const SIZE: usize = 3;
    for timec in clock_list() {
        let win = RollingWindow::new(SIZE, INTERVAL)
            .unwrap()
            .ignore_current_bucket(true)
            .with_timec(timec.clone());

        win.add(1.0);
        timec.advance(INTERVAL);
        assert_eq!(list_buckets(&win), vec![0.0, 1.0]);
        timec.advance(INTERVAL);
        assert_eq!(list_buckets(&win), vec![1.0]);
        timec.advance(INTERVAL);
        assert!(list_buckets(&win).is_empty());

        // 跨越整个窗口
        win.add(1.0);
        for _ in 0..=SIZE {
            timec.advance(INTERVAL);
        }
        assert!(list_buckets(&win).is_empty());
    }
}

#[test]
fn test_rolling_window_reduce() {
    const SIZE: usize = 4;
    for timec in clock_list() {
        // (是否忽略当前桶, 期望归约值)
        let tests = [(false, 10.0), (true, 4.0)];

        for (ignore, expect) in tests {
            let win = RollingWindow::new(SIZE, INTERVAL)
                .unwrap()
                .ignore_current_bucket(ignore)
                .with_timec(timec.clone());

            for x in 0..SIZE {
                for i in 0..=x {
                    win.add(i as f64);
                }
                if x < SIZE - 1 {
                    timec.advance(INTERVAL);
                }
            }

            let mut result = 0.0;
            win.traverse(|b| result += b.value);
            assert_eq!(result, expect, "ignore_current = {}", ignore);
        }
    }
}

#[test]
fn test_rolling_window_data_race() {
    const SIZE: usize = 3;
    for timec in clock_list() {
        let win = Arc::new(
            RollingWindow::new(SIZE, INTERVAL)
                .unwrap()
                .with_timec(timec.clone()),
        );
        let stop = Arc::new(AtomicBool::new(false));

        let writer = {
            let win = win.clone();
            let stop = stop.clone();
            thread::spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    win.add(rand::random::<i64>() as f64);
                    thread::sleep(INTERVAL / 2);
                }
            })
        };
        let reader = {
            let win = win.clone();
            let stop = stop.clone();
            thread::spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    win.traverse(|_b| {});
                }
            })
        };

        thread::sleep(INTERVAL * 5);
        stop.store(true, Ordering::Relaxed);
        writer.join().unwrap();
        reader.join().unwrap();
    }
}
