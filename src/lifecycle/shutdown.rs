//! Stop signal for the artifact server.
//!
//! Prepared artifacts need no teardown: a compression task still running at
//! shutdown simply finishes or is dropped with the runtime. Only the HTTP
//! listener has to be told to stop accepting and drain.

use tokio::sync::broadcast;

/// Broadcast handle that stops `HttpServer::run`.
///
/// Tests keep the handle and call `trigger` once their requests are done;
/// the binary keeps it alive for the life of the process.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// A receiver to hand to `HttpServer::run`.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Ask every running server to drain and stop. A no-op if none are running.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Servers still waiting on this handle.
    pub fn listeners(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_reaches_every_server() {
        let shutdown = Shutdown::new();
        let mut first = shutdown.subscribe();
        let mut second = shutdown.subscribe();
        assert_eq!(shutdown.listeners(), 2);

        shutdown.trigger();
        assert!(first.recv().await.is_ok());
        assert!(second.recv().await.is_ok());
    }

    #[test]
    fn test_trigger_with_no_server_running() {
        Shutdown::default().trigger();
    }
}
