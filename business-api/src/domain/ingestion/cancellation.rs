use tokio::sync::watch;

/// Cancels every linked [`CancellationSignal`] when dropped.
///
/// Request handlers hold the guard for the lifetime of the request, so a client
/// disconnect (which drops the handler future) stops in-flight ingestion workers.
#[derive(Debug)]
pub struct CancellationGuard(watch::Sender<bool>);

impl CancellationGuard {
    pub fn new() -> (Self, CancellationSignal) {
        let (tx, rx) = watch::channel(false);
        (Self(tx), CancellationSignal(rx))
    }

    #[cfg(test)]
    pub fn cancel(&self) {
        self.0.send_replace(true);
    }
}

impl Drop for CancellationGuard {
    fn drop(&mut self) {
        self.0.send_replace(true);
    }
}

#[derive(Debug, Clone)]
pub struct CancellationSignal(watch::Receiver<bool>);

impl CancellationSignal {
    /// A signal that never fires.
    #[cfg(test)]
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self(rx)
    }

    pub fn is_cancelled(&self) -> bool {
        *self.0.borrow()
    }

    /// Resolves once cancellation was requested. Pends forever if it never will be.
    pub async fn cancelled(&mut self) {
        loop {
            if *self.0.borrow_and_update() {
                return;
            }
            if self.0.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}
