//! Shutdown signalling and connection accounting.
//!
//! Shutdown runs in two phases, each driven by its own [`ShutdownSignal`]:
//!
//! - **drain**: stop accepting, let each connection finish the request it
//!   is serving, then close it
//! - **force**: close whatever is still open once the deadline passes
//!
//! [`ConnectionTracker`] counts open connections so the coordinator can wait
//! for the drain phase to finish.

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::sync::{broadcast, Notify};

/// A one-shot, cloneable trigger that many tasks can await.
///
/// # Example
///
/// ```rust
/// use restpack_server::ShutdownSignal;
///
/// let shutdown = ShutdownSignal::new();
/// let observer = shutdown.clone();
///
/// shutdown.trigger();
/// assert!(observer.is_triggered());
/// ```
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    triggered: Arc<AtomicBool>,
    sender: broadcast::Sender<()>,
}

impl ShutdownSignal {
    /// Creates an untriggered signal.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1);
        Self {
            triggered: Arc::new(AtomicBool::new(false)),
            sender,
        }
    }

    /// Triggers the signal. Later calls do nothing.
    pub fn trigger(&self) {
        if self
            .triggered
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            // No receivers is fine.
            let _ = self.sender.send(());
        }
    }

    /// Returns `true` once triggered.
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    /// A future that completes when the signal is triggered, or at once if
    /// it already was.
    pub fn recv(&self) -> ShutdownReceiver {
        let triggered = Arc::clone(&self.triggered);
        let mut receiver = self.sender.subscribe();
        ShutdownReceiver {
            inner: Box::pin(async move {
                if triggered.load(Ordering::SeqCst) {
                    return;
                }
                // A closed or lagged channel also means the sender side moved on.
                let _ = receiver.recv().await;
            }),
        }
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Created by [`ShutdownSignal::recv()`].
///
/// Subscribes before checking the flag, so a trigger racing with the first
/// poll is never missed.
pub struct ShutdownReceiver {
    inner: Pin<Box<dyn Future<Output = ()> + Send>>,
}

impl std::fmt::Debug for ShutdownReceiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShutdownReceiver").finish_non_exhaustive()
    }
}

impl Future for ShutdownReceiver {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.as_mut().poll(cx)
    }
}

/// Installs the OS interrupt handlers and returns a future that completes
/// on the first interrupt.
///
/// Handlers are registered before this returns, so a signal arriving
/// between registration and the first poll is still observed. On unix both
/// SIGINT and SIGTERM count; elsewhere only Ctrl+C.
pub fn interrupt() -> io::Result<impl Future<Output = ()> + Send + 'static> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        Ok(async move {
            tokio::select! {
                _ = sigint.recv() => tracing::info!(signal = "SIGINT", "interrupt received"),
                _ = sigterm.recv() => tracing::info!(signal = "SIGTERM", "interrupt received"),
            }
        })
    }

    #[cfg(not(unix))]
    {
        Ok(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => tracing::info!(signal = "ctrl_c", "interrupt received"),
                Err(e) => {
                    tracing::error!(error = %e, "ctrl_c handler failed");
                    std::future::pending::<()>().await;
                }
            }
        })
    }
}

/// Counts open connections.
///
/// # Example
///
/// ```rust
/// use restpack_server::ConnectionTracker;
///
/// let tracker = ConnectionTracker::new();
///
/// let token = tracker.acquire();
/// assert_eq!(tracker.active_connections(), 1);
///
/// drop(token);
/// assert_eq!(tracker.active_connections(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConnectionTracker {
    active: Arc<AtomicUsize>,
    notify: Arc<Notify>,
}

impl ConnectionTracker {
    /// Creates a tracker with no connections.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connection for as long as the token lives.
    #[must_use]
    pub fn acquire(&self) -> ConnectionToken {
        self.active.fetch_add(1, Ordering::SeqCst);
        ConnectionToken {
            active: Arc::clone(&self.active),
            notify: Arc::clone(&self.notify),
        }
    }

    /// Number of live tokens.
    #[must_use]
    pub fn active_connections(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Waits until every token has been dropped.
    pub async fn wait_idle(&self) {
        loop {
            // Register interest before reading the count; a token dropped in
            // between still wakes us.
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.active.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Live-connection marker handed out by [`ConnectionTracker::acquire`].
#[derive(Debug)]
pub struct ConnectionToken {
    active: Arc<AtomicUsize>,
    notify: Arc<Notify>,
}

impl Drop for ConnectionToken {
    fn drop(&mut self) {
        if self.active.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.notify.notify_waiters();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_trigger_idempotent() {
        let signal = ShutdownSignal::new();
        assert!(!signal.is_triggered());
        signal.trigger();
        signal.trigger();
        assert!(signal.is_triggered());
    }

    #[test]
    fn test_clones_share_state() {
        let a = ShutdownSignal::new();
        let b = a.clone();
        a.trigger();
        assert!(b.is_triggered());
    }

    #[tokio::test]
    async fn test_recv_completes_when_triggered() {
        let signal = ShutdownSignal::new();
        let trigger = signal.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.trigger();
        });

        tokio::time::timeout(Duration::from_secs(1), signal.recv())
            .await
            .expect("recv should complete");
    }

    #[tokio::test]
    async fn test_recv_after_trigger_is_immediate() {
        let signal = ShutdownSignal::new();
        signal.trigger();

        tokio::time::timeout(Duration::from_millis(10), signal.recv())
            .await
            .expect("recv should complete immediately");
    }

    #[tokio::test]
    async fn test_receiver_created_before_trigger() {
        let signal = ShutdownSignal::new();
        let receiver = signal.recv();
        signal.trigger();

        tokio::time::timeout(Duration::from_millis(10), receiver)
            .await
            .expect("pending receiver should observe trigger");
    }

    #[tokio::test]
    async fn test_wait_idle_immediate_when_empty() {
        let tracker = ConnectionTracker::new();
        tokio::time::timeout(Duration::from_millis(10), tracker.wait_idle())
            .await
            .expect("no connections to wait for");
    }

    #[tokio::test]
    async fn test_wait_idle_after_last_token() {
        let tracker = ConnectionTracker::new();
        let first = tracker.acquire();
        let second = tracker.acquire();
        assert_eq!(tracker.active_connections(), 2);

        let waiter = {
            let tracker = tracker.clone();
            tokio::spawn(async move { tracker.wait_idle().await })
        };

        drop(first);
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        drop(second);
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should finish")
            .unwrap();
    }

    #[tokio::test]
    async fn test_wait_idle_times_out_with_open_connection() {
        let tracker = ConnectionTracker::new();
        let _token = tracker.acquire();

        let result = tokio::time::timeout(Duration::from_millis(20), tracker.wait_idle()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_interrupt_registers_handlers() {
        assert!(interrupt().is_ok());
    }
}
