//! 自动执行调度模块
//!
//! # 设计思路
//!
//! 输入或配置每变化一次就立刻执行转换会在快速输入时造成抖动，
//! 因此变化先进入防抖窗口：窗口内的后续变化覆盖前一次，窗口
//! 到期只执行**最新**状态的一次转换。`autoRun` 关闭时变化只
//! 取消在途任务、不再调度，手动触发则绕过窗口立即执行。
//!
//! # 实现思路
//!
//! 用代数计数器实现取消：每次调度/取消都递增代数，到期的工作
//! 线程只在自己的代数仍是最新时才执行。过期线程自然退出，
//! 不需要句柄管理或显式 join。

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

/// 默认防抖窗口
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

/// 变化到来时的调度决策
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceAction {
    /// 调度一次延迟执行（覆盖在途任务）
    Schedule,
    /// 仅取消在途任务
    CancelOnly,
}

/// 纯决策函数，便于独立测试调度策略
pub fn decide_on_change(auto_run: bool) -> DebounceAction {
    if auto_run {
        DebounceAction::Schedule
    } else {
        DebounceAction::CancelOnly
    }
}

/// 防抖调度器
///
/// `runner` 由宿主提供，负责读取最新状态并执行转换；
/// 调度器本身不持有任何转换状态。
pub struct AutoRunScheduler {
    window: Duration,
    runner: Arc<dyn Fn() + Send + Sync>,
    generation: Arc<AtomicU64>,
}

impl AutoRunScheduler {
    pub fn new(window: Duration, runner: Arc<dyn Fn() + Send + Sync>) -> Self {
        Self {
            window,
            runner,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn with_default_window(runner: Arc<dyn Fn() + Send + Sync>) -> Self {
        Self::new(DEFAULT_DEBOUNCE_WINDOW, runner)
    }

    /// 输入或配置发生变化
    ///
    /// `auto_run` 关闭时只取消在途任务；开启时重置防抖窗口。
    pub fn notify_change(&self, auto_run: bool) {
        match decide_on_change(auto_run) {
            DebounceAction::CancelOnly => {
                log::debug!("自动执行已关闭，仅作废在途任务");
                self.cancel_pending();
            }
            DebounceAction::Schedule => {
                let scheduled = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
                let generation = Arc::clone(&self.generation);
                let runner = Arc::clone(&self.runner);
                let window = self.window;

                thread::spawn(move || {
                    thread::sleep(window);
                    // 代数已被后续变化或取消推进 → 本次任务作废。
                    // 校验与 runner() 之间存在窗口：恰在此刻到来的取消
                    // 不会拦下本次执行。取消只是尽力而为，runner 重跑
                    // 是幂等的，最多多执行一次无害。
                    if generation.load(Ordering::SeqCst) == scheduled {
                        runner();
                    }
                });
            }
        }
    }

    /// 手动触发：取消在途任务并立即执行
    pub fn trigger_manual(&self) {
        self.cancel_pending();
        (self.runner)();
    }

    /// 作废所有在途任务
    pub fn cancel_pending(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    fn counting_scheduler(window_ms: u64) -> (AutoRunScheduler, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let count_in_runner = Arc::clone(&count);
        let scheduler = AutoRunScheduler::new(
            Duration::from_millis(window_ms),
            Arc::new(move || {
                count_in_runner.fetch_add(1, Ordering::SeqCst);
            }),
        );
        (scheduler, count)
    }

    #[test]
    fn decision_follows_auto_run_flag() {
        assert_eq!(decide_on_change(true), DebounceAction::Schedule);
        assert_eq!(decide_on_change(false), DebounceAction::CancelOnly);
    }

    #[test]
    fn rapid_changes_coalesce_into_one_run() {
        let (scheduler, count) = counting_scheduler(50);
        for _ in 0..5 {
            scheduler.notify_change(true);
            thread::sleep(Duration::from_millis(5));
        }
        thread::sleep(Duration::from_millis(400));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn disabled_auto_run_never_fires() {
        let (scheduler, count) = counting_scheduler(50);
        scheduler.notify_change(false);
        scheduler.notify_change(false);
        thread::sleep(Duration::from_millis(300));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn disabling_cancels_pending_run() {
        let (scheduler, count) = counting_scheduler(80);
        scheduler.notify_change(true);
        scheduler.notify_change(false);
        thread::sleep(Duration::from_millis(400));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn manual_trigger_runs_immediately() {
        let (scheduler, count) = counting_scheduler(10_000);
        scheduler.notify_change(true);
        scheduler.trigger_manual();
        assert_eq!(count.load(Ordering::SeqCst), 1);

        // 手动触发同时作废了在途任务
        thread::sleep(Duration::from_millis(100));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn delayed_run_sees_latest_state() {
        let state = Arc::new(Mutex::new(String::new()));
        let observed = Arc::new(Mutex::new(String::new()));

        let state_in_runner = Arc::clone(&state);
        let observed_in_runner = Arc::clone(&observed);
        let scheduler = AutoRunScheduler::new(
            Duration::from_millis(50),
            Arc::new(move || {
                let current = state_in_runner.lock().expect("lock state").clone();
                *observed_in_runner.lock().expect("lock observed") = current;
            }),
        );

        for input in ["h", "he", "hel", "hello"] {
            *state.lock().expect("lock state") = input.to_string();
            scheduler.notify_change(true);
            thread::sleep(Duration::from_millis(5));
        }
        thread::sleep(Duration::from_millis(400));

        assert_eq!(observed.lock().expect("lock observed").as_str(), "hello");
    }
}
