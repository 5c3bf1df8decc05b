//! Thread-safe one-to-many byte sink
//!
//! A [`Multilogger`] fans one `write` call out to every registered
//! [`OutputTarget`]. The registry is non-owning: targets are registered from
//! an `Arc` and stored as weak handles, so the caller keeps ownership and
//! must keep each target alive for as long as it stays registered.

use crate::core::error::{Result, SchedulerError};
use parking_lot::Mutex;
use std::io;
use std::sync::{Arc, Weak};

/// Capability required of a multilogger output target
pub trait OutputTarget {
    /// Whether the target is currently able to accept bytes
    fn healthy(&self) -> bool;

    /// Append bytes to the target
    ///
    /// # Errors
    ///
    /// IO failures are reported to the multilogger, which swallows them and
    /// moves on to the next target.
    fn write(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Push buffered bytes through
    ///
    /// # Errors
    ///
    /// Same policy as [`write`](OutputTarget::write).
    fn flush(&mut self) -> io::Result<()>;
}

/// In-memory target; handy as a capture buffer
impl OutputTarget for Vec<u8> {
    fn healthy(&self) -> bool {
        true
    }

    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Adapter turning any [`io::Write`] value into an [`OutputTarget`]
///
/// Health is sticky: the first write or flush failure marks the target
/// unhealthy and the multilogger skips it from then on, the way a stream
/// with error flags set is skipped.
#[derive(Debug)]
pub struct WriteTarget<W: io::Write> {
    inner: W,
    healthy: bool,
}

impl<W: io::Write> WriteTarget<W> {
    /// Wrap a writer
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            healthy: true,
        }
    }

    /// Unwrap, discarding the health flag
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: io::Write> OutputTarget for WriteTarget<W> {
    fn healthy(&self) -> bool {
        self.healthy
    }

    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        let result = self.inner.write_all(bytes);
        if result.is_err() {
            self.healthy = false;
        }
        result
    }

    fn flush(&mut self) -> io::Result<()> {
        let result = self.inner.flush();
        if result.is_err() {
            self.healthy = false;
        }
        result
    }
}

type SharedTarget = Arc<Mutex<dyn OutputTarget + Send>>;
type WeakTarget = Weak<Mutex<dyn OutputTarget + Send>>;

/// Fan-out sink over a dynamic set of output targets
///
/// One mutex serialises `write` calls, so concurrent writers never
/// interleave bytes within a single call; across calls the order is
/// whatever the lock yields.
#[derive(Default)]
pub struct Multilogger {
    targets: Mutex<Vec<WeakTarget>>,
}

impl Multilogger {
    /// Create a sink with no targets
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a target
    ///
    /// The registry keeps only a weak handle; the caller's `Arc` stays the
    /// owner and must outlive the registration.
    pub fn add<T>(&self, target: &Arc<Mutex<T>>)
    where
        T: OutputTarget + Send + 'static,
    {
        let owned: Arc<Mutex<T>> = Arc::clone(target);
        let shared: SharedTarget = owned;
        self.targets.lock().push(Arc::downgrade(&shared));
    }

    /// Drop all registrations
    pub fn clear(&self) {
        self.targets.lock().clear();
    }

    /// Whether no targets are registered
    pub fn empty(&self) -> bool {
        self.targets.lock().is_empty()
    }

    /// Number of registered targets
    pub fn len(&self) -> usize {
        self.targets.lock().len()
    }

    /// Whether no targets are registered
    pub fn is_empty(&self) -> bool {
        self.empty()
    }

    /// Write bytes to every healthy target, flushing each one
    ///
    /// Unhealthy targets are skipped; per-target IO failures are swallowed
    /// and the remaining targets still receive the bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::BadOutputTarget`] if a registered target
    /// has been dropped, violating the outlives contract. The error is
    /// reported only after the fan-out: every remaining target still
    /// receives the bytes.
    pub fn write(&self, bytes: &[u8]) -> Result<()> {
        let targets = self.targets.lock();
        let mut dead_target = false;

        for weak in targets.iter() {
            let target = match weak.upgrade() {
                Some(target) => target,
                None => {
                    dead_target = true;
                    continue;
                }
            };
            let mut target = target.lock();

            if !target.healthy() {
                continue;
            }
            if target.write(bytes).is_ok() {
                let _ = target.flush();
            }
        }

        if dead_target {
            return Err(SchedulerError::BadOutputTarget);
        }
        Ok(())
    }
}
