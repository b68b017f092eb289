//! Background sender
//!
//! Sends and window-size updates are queued here and delivered on a
//! dedicated thread, so a slow or blocking transport never stalls input or
//! rendering. Messages queued while the transport reports disconnected are
//! dropped; failures are only logged.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, trace};

use super::{Transport, WindowSize};
use crate::error::Result;

#[derive(Debug)]
enum Outbound {
    Data(Vec<u8>),
    WindowSize(WindowSize),
}

/// One per connection
///
/// Dropping it closes the queue and detaches the thread. The thread finishes
/// the messages already queued (discarding them once the transport reports
/// disconnected) and exits on its own; nothing waits for it.
pub struct Outbox {
    tx: Option<mpsc::Sender<Outbound>>,
    handle: Option<JoinHandle<()>>,
}

impl Outbox {
    pub fn spawn(transport: Arc<dyn Transport>) -> Result<Self> {
        let (tx, rx) = mpsc::channel::<Outbound>();
        let handle = thread::Builder::new()
            .name("termview-outbox".into())
            .spawn(move || deliver(transport.as_ref(), rx))?;
        Ok(Self {
            tx: Some(tx),
            handle: Some(handle),
        })
    }

    pub fn send(&self, data: Vec<u8>) {
        if data.is_empty() {
            return;
        }
        self.queue(Outbound::Data(data));
    }

    pub fn set_window_size(&self, size: WindowSize) {
        self.queue(Outbound::WindowSize(size));
    }

    /// A handle other threads can queue data through
    pub fn sender(&self) -> Option<OutboxSender> {
        self.tx.as_ref().map(|tx| OutboxSender { tx: tx.clone() })
    }

    fn queue(&self, message: Outbound) {
        if let Some(tx) = &self.tx {
            if tx.send(message).is_err() {
                debug!("outbox thread gone, dropping message");
            }
        }
    }
}

impl Drop for Outbox {
    fn drop(&mut self) {
        self.tx.take();
        if self.handle.take().is_some() {
            trace!("outbox detached");
        }
    }
}

#[cfg(test)]
impl Outbox {
    /// Close the queue and wait until everything queued was handled
    fn shutdown(mut self) {
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Cloneable data-only handle into an `Outbox`
#[derive(Debug, Clone)]
pub struct OutboxSender {
    tx: mpsc::Sender<Outbound>,
}

impl OutboxSender {
    /// False once the outbox is gone
    pub fn send(&self, data: Vec<u8>) -> bool {
        self.tx.send(Outbound::Data(data)).is_ok()
    }
}

fn deliver(transport: &dyn Transport, rx: mpsc::Receiver<Outbound>) {
    for message in rx {
        if !transport.is_connected() {
            trace!(?message, "transport disconnected, dropping");
            continue;
        }
        let result = match &message {
            Outbound::Data(data) => transport.send_data(data),
            Outbound::WindowSize(size) => transport.set_terminal_window_size(*size),
        };
        if let Err(err) = result {
            debug!(error = %err, "transport send failed");
        }
    }
    trace!("outbox drained");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::transport::EventSender;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::{Duration, Instant};

    #[derive(Default)]
    struct Recording {
        connected: AtomicBool,
        fail: AtomicBool,
        sent: Mutex<Vec<Vec<u8>>>,
        sizes: Mutex<Vec<WindowSize>>,
    }

    impl Transport for Recording {
        fn is_connected(&self) -> bool {
            self.connected.load(Ordering::SeqCst)
        }

        fn connect(&self, _events: EventSender) -> bool {
            self.connected.store(true, Ordering::SeqCst);
            true
        }

        fn disconnect(&self) {
            self.connected.store(false, Ordering::SeqCst);
        }

        fn send_data(&self, data: &[u8]) -> Result<()> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(Error::Send("broken pipe".into()));
            }
            self.sent.lock().push(data.to_vec());
            Ok(())
        }

        fn set_terminal_window_size(&self, size: WindowSize) -> Result<()> {
            self.sizes.lock().push(size);
            Ok(())
        }
    }

    #[test]
    fn test_delivers_in_order() {
        let transport = Arc::new(Recording::default());
        transport.connected.store(true, Ordering::SeqCst);
        let outbox = Outbox::spawn(transport.clone()).unwrap();

        outbox.send(b"a".to_vec());
        outbox.set_window_size(WindowSize::new(80, 24, 640.0, 384.0));
        outbox.send(Vec::new());
        if let Some(sender) = outbox.sender() {
            assert!(sender.send(b"b".to_vec()));
        }
        outbox.shutdown();

        assert_eq!(*transport.sent.lock(), vec![b"a".to_vec(), b"b".to_vec()]);
        assert_eq!(transport.sizes.lock().len(), 1);
    }

    #[test]
    fn test_drops_when_disconnected() {
        let transport = Arc::new(Recording::default());
        let outbox = Outbox::spawn(transport.clone()).unwrap();
        outbox.send(b"lost".to_vec());
        outbox.shutdown();
        assert!(transport.sent.lock().is_empty());
    }

    #[test]
    fn test_failures_do_not_stop_delivery() {
        let transport = Arc::new(Recording::default());
        transport.connected.store(true, Ordering::SeqCst);
        transport.fail.store(true, Ordering::SeqCst);
        let outbox = Outbox::spawn(transport.clone()).unwrap();
        outbox.send(b"x".to_vec());
        outbox.set_window_size(WindowSize::new(1, 1, 0.0, 0.0));
        outbox.shutdown();
        assert_eq!(transport.sizes.lock().len(), 1);
    }

    struct Stalled {
        delay: Duration,
    }

    impl Transport for Stalled {
        fn is_connected(&self) -> bool {
            true
        }

        fn connect(&self, _events: EventSender) -> bool {
            true
        }

        fn disconnect(&self) {}

        fn send_data(&self, _data: &[u8]) -> Result<()> {
            std::thread::sleep(self.delay);
            Ok(())
        }

        fn set_terminal_window_size(&self, _size: WindowSize) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_drop_does_not_wait_for_stalled_send() {
        let transport = Arc::new(Stalled {
            delay: Duration::from_secs(2),
        });
        let outbox = Outbox::spawn(transport).unwrap();
        outbox.send(b"\r".to_vec());
        outbox.send(b"x".to_vec());
        std::thread::sleep(Duration::from_millis(50));

        let started = Instant::now();
        drop(outbox);
        assert!(started.elapsed() < Duration::from_millis(500));
    }
}
