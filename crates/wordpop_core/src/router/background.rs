//! Worker thread that owns the router and answers messages asynchronously.

use super::{MessageChannel, MessageRouter, RouterRequest, RouterResponse};
use log::{info, warn};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

const HOST_STOPPED: &str = "background host is not running";

struct Envelope {
    request: RouterRequest,
    reply: Sender<RouterResponse>,
}

/// Reply handle returned by [`BackgroundHost::send`].
pub struct PendingReply {
    receiver: Receiver<RouterResponse>,
}

impl PendingReply {
    /// Blocks until the worker answers.
    pub fn wait(self) -> RouterResponse {
        self.receiver
            .recv()
            .unwrap_or_else(|_| RouterResponse::failure(HOST_STOPPED))
    }

    /// Waits at most `timeout`; `None` when no answer arrived in time.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<RouterResponse> {
        match self.receiver.recv_timeout(timeout) {
            Ok(response) => Some(response),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(RouterResponse::failure(HOST_STOPPED)),
        }
    }
}

/// Single worker processing messages in arrival order.
pub struct BackgroundHost {
    sender: Option<Sender<Envelope>>,
    worker: Option<JoinHandle<()>>,
}

impl BackgroundHost {
    pub fn spawn(router: MessageRouter) -> Self {
        let (sender, receiver) = mpsc::channel::<Envelope>();
        let worker = std::thread::Builder::new()
            .name("wordpop-router".to_string())
            .spawn(move || {
                info!("event=router_worker module=router status=start");
                for envelope in receiver {
                    let response = router.dispatch(envelope.request);
                    // The requester may have stopped waiting.
                    let _ = envelope.reply.send(response);
                }
                info!("event=router_worker module=router status=stop");
            });

        let worker = match worker {
            Ok(handle) => Some(handle),
            Err(err) => {
                warn!("event=router_worker module=router status=error error={err}");
                None
            }
        };
        Self {
            sender: worker.as_ref().map(|_| sender),
            worker,
        }
    }

    /// Queues `request` and returns immediately.
    pub fn send(&self, request: RouterRequest) -> PendingReply {
        let (reply, receiver) = mpsc::channel();
        if let Some(sender) = &self.sender {
            // A failed send drops `reply`, which the waiter sees as a stopped host.
            let _ = sender.send(Envelope { request, reply });
        }
        PendingReply { receiver }
    }

    /// Stops accepting messages and waits for queued ones to finish.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("event=router_worker module=router status=error error=worker_panicked");
            }
        }
    }
}

impl MessageChannel for BackgroundHost {
    fn request(&self, request: RouterRequest) -> RouterResponse {
        self.send(request).wait()
    }
}

impl Drop for BackgroundHost {
    fn drop(&mut self) {
        self.stop();
    }
}
