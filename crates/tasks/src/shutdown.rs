//! One-shot shutdown signal shared by any number of tasks.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::future::{FusedFuture, FutureExt, Shared};
use tokio::sync::oneshot;

/// Create a linked [`Signal`] and [`Shutdown`] pair.
pub fn signal() -> (Signal, Shutdown) {
    let (tx, rx) = oneshot::channel();
    (Signal(tx), Shutdown(rx.shared()))
}

/// Fires the shutdown. Dropping it without firing has the same effect.
#[derive(Debug)]
pub struct Signal(oneshot::Sender<()>);

impl Signal {
    pub fn fire(self) {
        let _ = self.0.send(());
    }
}

/// Resolves once the paired [`Signal`] is fired or dropped.
#[derive(Clone)]
#[must_use = "futures do nothing unless polled"]
pub struct Shutdown(Shared<oneshot::Receiver<()>>);

impl fmt::Debug for Shutdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shutdown")
            .field("fired", &self.0.is_terminated())
            .finish()
    }
}

impl Future for Shutdown {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if this.0.is_terminated() || this.0.poll_unpin(cx).is_ready() {
            Poll::Ready(())
        } else {
            Poll::Pending
        }
    }
}
