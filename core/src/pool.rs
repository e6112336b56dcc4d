//! Bounded fan-out over an [`AddressSet`].
//!
//! One task is spawned per address, but only after a semaphore permit is
//! available, so at most `limit` units run at any instant and nothing queues
//! up unbounded. Each task publishes its output into a slot indexed by the
//! address's position and decrements the outstanding counter exactly once,
//! even when the unit panics.

use std::future::Future;
use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use srvsearch_common::network::range::AddressSet;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::warn;

struct Ledger<T> {
    slots: Vec<Option<T>>,
    remaining: usize,
}

fn lock<T>(ledger: &Mutex<Ledger<T>>) -> MutexGuard<'_, Ledger<T>> {
    ledger.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owned by a single task; accounts for that task's completion on drop.
struct SlotGuard<T> {
    idx: usize,
    ledger: Arc<Mutex<Ledger<T>>>,
    published: bool,
}

impl<T> SlotGuard<T> {
    fn publish(mut self, value: T) {
        let mut ledger = lock(&self.ledger);
        ledger.slots[self.idx] = Some(value);
        ledger.remaining -= 1;
        drop(ledger);
        self.published = true;
    }
}

impl<T> Drop for SlotGuard<T> {
    fn drop(&mut self) {
        if !self.published {
            lock(&self.ledger).remaining -= 1;
        }
    }
}

/// Runs `unit` for every address with at most `limit` in flight and waits
/// for all of them.
///
/// The returned vector lines up with `addrs`; a `None` slot means that unit
/// never produced a value (its task panicked). A `limit` of zero is treated
/// as one.
pub async fn run_bounded<T, F, Fut>(addrs: &AddressSet, limit: usize, unit: F) -> Vec<Option<T>>
where
    F: Fn(Ipv4Addr) -> Fut,
    Fut: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    if addrs.is_empty() {
        return Vec::new();
    }

    let ledger: Arc<Mutex<Ledger<T>>> = Arc::new(Mutex::new(Ledger {
        slots: (0..addrs.len()).map(|_| None).collect(),
        remaining: addrs.len(),
    }));
    let permits: Arc<Semaphore> = Arc::new(Semaphore::new(limit.max(1)));
    let mut tasks: JoinSet<()> = JoinSet::new();

    for (idx, addr) in addrs.iter().enumerate() {
        // The semaphore is never closed, so acquiring cannot fail.
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };
        let guard = SlotGuard {
            idx,
            ledger: ledger.clone(),
            published: false,
        };
        let work = unit(addr);

        tasks.spawn(async move {
            let _permit = permit;
            guard.publish(work.await);
        });

        while let Some(joined) = tasks.try_join_next() {
            log_join_error(joined);
        }
    }

    while let Some(joined) = tasks.join_next().await {
        log_join_error(joined);
    }

    let mut ledger = lock(&ledger);
    debug_assert_eq!(ledger.remaining, 0, "units still outstanding after join");
    std::mem::take(&mut ledger.slots)
}

fn log_join_error(joined: Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        warn!("Worker task failed: {e}");
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use srvsearch_common::network::target;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn addrs(spec: &str) -> AddressSet {
        target::parse_and_expand(&[spec]).unwrap()
    }

    #[tokio::test]
    async fn empty_set_returns_immediately() {
        let out: Vec<Option<u8>> = run_bounded(&AddressSet::new(), 4, |_| async { 1u8 }).await;
        assert!(out.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn never_exceeds_limit() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let targets = addrs("10.0.0.0/26");

        let out = run_bounded(&targets, 5, |_| {
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(2)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }
        })
        .await;

        assert_eq!(out.len(), targets.len());
        assert!(out.iter().all(Option::is_some));
        assert!(peak.load(Ordering::SeqCst) <= 5);
        assert!(peak.load(Ordering::SeqCst) >= 1);
        assert_eq!(in_flight.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn slots_follow_input_order() {
        let targets = addrs("10.0.0.1-10.0.0.6");
        let out = run_bounded(&targets, 3, |addr| async move {
            // Later addresses finish first.
            let delay = 7 - u64::from(addr.octets()[3]);
            tokio::time::sleep(Duration::from_millis(delay)).await;
            addr
        })
        .await;

        let got: Vec<Ipv4Addr> = out.into_iter().flatten().collect();
        let want: Vec<Ipv4Addr> = targets.iter().collect();
        assert_eq!(got, want);
    }

    #[tokio::test]
    async fn panicking_unit_leaves_empty_slot() {
        let targets = addrs("10.0.0.1-10.0.0.3");
        let out = run_bounded(&targets, 1, |addr| async move {
            if addr == Ipv4Addr::new(10, 0, 0, 2) {
                panic!("boom");
            }
            addr
        })
        .await;

        assert_eq!(
            out,
            vec![
                Some(Ipv4Addr::new(10, 0, 0, 1)),
                None,
                Some(Ipv4Addr::new(10, 0, 0, 3)),
            ]
        );
    }

    #[tokio::test]
    async fn zero_limit_still_makes_progress() {
        let targets = addrs("10.0.0.1+3");
        let out = run_bounded(&targets, 0, |_| async {}).await;
        assert_eq!(out.len(), 4);
    }
}
