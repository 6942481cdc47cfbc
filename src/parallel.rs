use crossbeam_channel::{Sender, bounded};
use std::sync::{Mutex, PoisonError};
use std::thread;

pub struct WorkPool<T: Send> {
    tx: Sender<T>,
}

/// Run `body_fn` with a pool of `thread_count` scoped worker threads, each of
/// which calls `work_fn` on the values sent to the pool. Returns once the body
/// is done and every queued value has been processed.
pub fn run_pool<T, W, B>(thread_count: usize, chan_size: usize, work_fn: W, body_fn: B)
where
    T: Send,
    W: Fn(T) + Send + Clone,
    B: FnOnce(WorkPool<T>),
{
    thread::scope(|s| {
        let (tx, rx) = bounded(chan_size);

        for _ in 0..thread_count.max(1) {
            let thread_rx = rx.clone();
            let thread_work = work_fn.clone();
            s.spawn(move || {
                while let Ok(val) = thread_rx.recv() {
                    thread_work(val);
                }
            });
        }

        // Dropping the pool closes the channel, which lets the workers finish.
        body_fn(WorkPool { tx });
    });
}

impl<T: Send> WorkPool<T> {
    pub fn send(&self, value: T) {
        self.tx.send(value).expect("worker threads hung up");
    }
}

/// Apply `f` to every item on a pool of worker threads, returning the results
/// in the same order as the items.
pub fn map_pool<T, R, F>(thread_count: usize, items: Vec<T>, f: F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Sync,
{
    let results = Mutex::new(Vec::with_capacity(items.len()));
    run_pool(
        thread_count,
        thread_count.max(1) * 2,
        |(i, item): (usize, T)| {
            let out = f(item);
            results
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push((i, out));
        },
        |pool| {
            for job in items.into_iter().enumerate() {
                pool.send(job);
            }
        },
    );

    let mut results = results.into_inner().unwrap_or_else(PoisonError::into_inner);
    results.sort_unstable_by_key(|(i, _)| *i);
    results.into_iter().map(|(_, out)| out).collect()
}
