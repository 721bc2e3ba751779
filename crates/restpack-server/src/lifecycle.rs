//! Observable server run state.
//!
//! ```text
//! Idle ──start──▶ Serving ──interrupt──▶ ShuttingDown ──▶ Terminated { clean }
//!   │                │
//!   └──bind error────┴──────────────────────────────────▶ Terminated { clean: false }
//! ```

use std::net::SocketAddr;

use tokio::sync::watch;

/// Where a server is in its single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Constructed, not started.
    Idle,
    /// Accepting connections on `local_addr`.
    Serving {
        /// Address the listener actually bound.
        local_addr: SocketAddr,
    },
    /// Draining in-flight requests.
    ShuttingDown,
    /// `start` has returned.
    Terminated {
        /// True if every connection finished before the deadline.
        clean: bool,
    },
}

/// Read side of the server's state channel.
///
/// # Example
///
/// ```rust,ignore
/// let mut state = server.state();
/// let run = tokio::spawn(server.start(None));
///
/// let addr = state.serving().await.expect("server failed to bind");
/// println!("listening on {addr}");
/// ```
#[derive(Debug, Clone)]
pub struct StateWatcher {
    rx: watch::Receiver<ServerState>,
}

impl StateWatcher {
    pub(crate) fn new(rx: watch::Receiver<ServerState>) -> Self {
        Self { rx }
    }

    /// Latest state.
    #[must_use]
    pub fn current(&self) -> ServerState {
        *self.rx.borrow()
    }

    /// Waits until the server is listening and returns the bound address.
    ///
    /// Returns `None` if the server terminated (or shut down) first.
    pub async fn serving(&mut self) -> Option<SocketAddr> {
        let state = self
            .rx
            .wait_for(|s| !matches!(s, ServerState::Idle))
            .await
            .ok()?;
        match *state {
            ServerState::Serving { local_addr } => Some(local_addr),
            _ => None,
        }
    }

    /// Waits for termination and returns whether it was clean.
    pub async fn terminated(&mut self) -> Option<bool> {
        let state = self
            .rx
            .wait_for(|s| matches!(s, ServerState::Terminated { .. }))
            .await
            .ok()?;
        match *state {
            ServerState::Terminated { clean } => Some(clean),
            _ => None,
        }
    }
}
