//! Sources played by a dedicated worker thread.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use tracing::warn;

use super::SourceHandle;

/// A [`SourceHandle`] backed by a worker thread.
///
/// The worker body receives a stop flag and must poll it between blocks.
/// [`stop`](SourceHandle::stop) raises the flag and joins the worker, so the
/// device is silent by the time it returns.
pub struct ThreadSource {
    stop: Arc<AtomicBool>,
    playing: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

/// Clears the playing flag when the worker exits, including by panic.
struct Finished(Arc<AtomicBool>);

impl Drop for Finished {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl ThreadSource {
    pub fn spawn<F>(name: &str, body: F) -> io::Result<Self>
    where
        F: FnOnce(&AtomicBool) + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let playing = Arc::new(AtomicBool::new(true));
        let worker = {
            let stop = stop.clone();
            let finished = Finished(playing.clone());
            thread::Builder::new().name(name.to_string()).spawn(move || {
                let _finished = finished;
                body(&stop);
            })?
        };
        Ok(Self {
            stop,
            playing,
            worker: Some(worker),
        })
    }
}

impl SourceHandle for ThreadSource {
    fn stop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("source worker panicked");
            }
        }
    }

    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }
}

impl Drop for ThreadSource {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[test]
    fn test_stop_waits_for_worker() {
        let blocks = Arc::new(AtomicUsize::new(0));
        let exited = Arc::new(AtomicBool::new(false));
        let mut source = {
            let blocks = blocks.clone();
            let exited = exited.clone();
            ThreadSource::spawn("test-source", move |stop| {
                while !stop.load(Ordering::SeqCst) {
                    // Stands in for one blocking device write.
                    thread::sleep(Duration::from_millis(20));
                    blocks.fetch_add(1, Ordering::SeqCst);
                }
                exited.store(true, Ordering::SeqCst);
            })
            .unwrap()
        };
        assert!(source.is_playing());

        source.stop();
        assert!(exited.load(Ordering::SeqCst));
        assert!(!source.is_playing());

        let written = blocks.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(50));
        assert_eq!(blocks.load(Ordering::SeqCst), written);

        source.stop();
        assert!(!source.is_playing());
    }

    #[test]
    fn test_finished_worker() {
        let mut source = ThreadSource::spawn("test-source", |_| {}).unwrap();
        while source.is_playing() {
            thread::sleep(Duration::from_millis(1));
        }
        source.stop();
        assert!(!source.is_playing());
    }

    #[test]
    fn test_panicking_worker_stops_playing() {
        let mut source = ThreadSource::spawn("test-source", |_| panic!("device lost")).unwrap();
        source.stop();
        assert!(!source.is_playing());
    }
}
