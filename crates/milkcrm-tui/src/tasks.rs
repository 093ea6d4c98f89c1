//! Remote calls run as local tasks; their results come back to the UI loop
//! as completions applied to the [`App`].

use crate::app::App;
use milkcrm_core::RestClient;
use std::future::Future;
use std::rc::Rc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// A state change to apply once a remote call has resolved.
pub type Completion = Box<dyn FnOnce(&mut App)>;

#[derive(Clone)]
pub struct Remote {
    client: Rc<RestClient>,
    tx: UnboundedSender<Completion>,
}

impl Remote {
    pub fn new(client: RestClient) -> (Self, UnboundedReceiver<Completion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let remote = Self {
            client: Rc::new(client),
            tx,
        };
        (remote, rx)
    }

    /// Run `call` on the current `LocalSet` and queue `apply` with its output.
    ///
    /// Must be called from within a `LocalSet`.
    pub fn spawn<C, Fut, T, A>(&self, call: C, apply: A)
    where
        C: FnOnce(Rc<RestClient>) -> Fut,
        Fut: Future<Output = T> + 'static,
        T: 'static,
        A: FnOnce(&mut App, T) + 'static,
    {
        let future = call(Rc::clone(&self.client));
        let tx = self.tx.clone();
        tokio::task::spawn_local(async move {
            let output = future.await;
            if tx.send(Box::new(move |app: &mut App| apply(app, output))).is_err() {
                tracing::debug!("UI loop gone; dropping remote result");
            }
        });
    }
}
