//! 有界并发执行器。
//!
//! 对一组输入并发执行同一个异步任务，同一时刻最多 `min(limit, items.len())`
//! 个任务在运行。第 i 个结果总是写入第 i 个槽位，与完成顺序无关。
//! 单个任务返回错误或panic时（包括构造future时的panic），对应槽位为 `None`，
//! 其余任务不受影响。

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use log::debug;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// 按并发上限执行任务，返回与输入等长、同序的结果
pub async fn run<T, R, E, F, Fut>(items: Vec<T>, limit: usize, task: F) -> Vec<Option<R>>
where
    T: Send + 'static,
    R: Send + 'static,
    E: Display + Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
{
    let total = items.len();
    if total == 0 {
        return Vec::new();
    }

    let pool = limit.clamp(1, total);
    let semaphore = Arc::new(Semaphore::new(pool));
    let task = Arc::new(task);
    let mut handles: Vec<Option<JoinHandle<Result<R, E>>>> = Vec::with_capacity(total);

    for item in items {
        // 先拿许可再spawn，保证运行中的任务数不超过pool
        let permit = match Arc::clone(&semaphore).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => {
                handles.push(None);
                continue;
            }
        };
        let task = Arc::clone(&task);
        handles.push(Some(tokio::spawn(async move {
            let _permit = permit;
            task(item).await
        })));
    }

    let mut slots = Vec::with_capacity(total);
    for (index, handle) in handles.into_iter().enumerate() {
        let slot = match handle {
            Some(handle) => match handle.await {
                Ok(Ok(result)) => Some(result),
                Ok(Err(e)) => {
                    debug!("任务 #{} 失败: {}", index, e);
                    None
                }
                Err(e) => {
                    debug!("任务 #{} 异常退出: {}", index, e);
                    None
                }
            },
            None => None,
        };
        slots.push(slot);
    }

    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn preserves_input_order() {
        let items: Vec<u64> = (0..20).collect();
        // 越靠前的任务睡得越久，完成顺序与输入相反
        let results = run(items.clone(), 8, |n| async move {
            tokio::time::sleep(Duration::from_millis((20 - n) * 3)).await;
            Ok::<_, Infallible>(n * 10)
        })
        .await;

        assert_eq!(results.len(), items.len());
        for (i, slot) in results.iter().enumerate() {
            assert_eq!(*slot, Some(i as u64 * 10));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn never_exceeds_limit() {
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let items: Vec<usize> = (0..50).collect();

        let (task_active, task_peak) = (Arc::clone(&active), Arc::clone(&peak));
        let results = run(items, 5, move |n| {
            let active = Arc::clone(&task_active);
            let peak = Arc::clone(&task_peak);
            async move {
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                active.fetch_sub(1, Ordering::SeqCst);
                Ok::<_, Infallible>(n)
            }
        })
        .await;

        assert_eq!(results.iter().filter(|r| r.is_some()).count(), 50);
        assert!(peak.load(Ordering::SeqCst) <= 5);
        assert!(peak.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn limit_is_capped_by_item_count_and_floored_at_one() {
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let (task_active, task_peak) = (Arc::clone(&active), Arc::clone(&peak));
        let results = run(vec![1, 2, 3], 0, move |n| {
            let active = Arc::clone(&task_active);
            let peak = Arc::clone(&task_peak);
            async move {
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(2)).await;
                active.fetch_sub(1, Ordering::SeqCst);
                Ok::<_, Infallible>(n)
            }
        })
        .await;

        assert_eq!(results, vec![Some(1), Some(2), Some(3)]);
        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failures_are_isolated_to_their_slot() {
        let results = run((0..6).collect::<Vec<i32>>(), 3, |n| async move {
            if n % 2 == 1 {
                Err(format!("odd {}", n))
            } else {
                Ok(n)
            }
        })
        .await;

        assert_eq!(results, vec![Some(0), None, Some(2), None, Some(4), None]);
    }

    #[tokio::test]
    async fn panics_are_isolated_to_their_slot() {
        let results = run(vec![1, 2, 3], 2, |n| async move {
            if n == 2 {
                panic!("boom");
            }
            Ok::<_, Infallible>(n)
        })
        .await;

        assert_eq!(results, vec![Some(1), None, Some(3)]);
    }

    #[tokio::test]
    async fn panic_while_building_task_is_isolated() {
        let results = run(vec![1, 2, 3], 2, |n| {
            if n == 2 {
                panic!("build failed");
            }
            async move { Ok::<_, Infallible>(n) }
        })
        .await;

        assert_eq!(results, vec![Some(1), None, Some(3)]);
    }

    #[tokio::test]
    async fn empty_input_yields_empty_output() {
        let results = run(Vec::<u8>::new(), 4, |n| async move { Ok::<_, Infallible>(n) }).await;
        assert!(results.is_empty());
    }
}
