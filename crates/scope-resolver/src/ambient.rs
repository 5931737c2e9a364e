//! # Ambient Execution Frame
//!
//! While a factory runs, the engine keeps a thread-local *frame*: the context
//! performing the resolution plus the log of keys that factory has read so
//! far. Nested factory executions stack — each one saves the frame it found
//! and restores it on every exit path, so dependency logging always belongs
//! to the innermost active factory.
//!
//! Only lookups made against the frame's own context are logged; explicit
//! cross-context reads (smart-sharing validation reads against the origin
//! context, for example) are not dependencies of the running factory.

use std::cell::RefCell;

use crate::context::Context;
use crate::key::Key;

struct Frame {
    context: Context,
    log: Vec<Key>,
}

thread_local! {
    static FRAME: RefCell<Option<Frame>> = const { RefCell::new(None) };
}

/// The context currently resolving, if any.
pub(crate) fn current() -> Option<Context> {
    FRAME.with(|slot| slot.borrow().as_ref().map(|frame| frame.context.clone()))
}

/// Appends `key` to the active log — but only when the active frame belongs
/// to `ctx`, the context that performed the read.
pub(crate) fn record_read(ctx: &Context, key: &Key) {
    FRAME.with(|slot| {
        if let Some(frame) = slot.borrow_mut().as_mut() {
            if frame.context == *ctx {
                frame.log.push(key.clone());
            }
        }
    });
}

/// Restores the saved frame even if `body` unwinds.
struct FrameGuard {
    saved: Option<Option<Frame>>,
}

impl Drop for FrameGuard {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            FRAME.with(|slot| {
                *slot.borrow_mut() = saved;
            });
        }
    }
}

/// Runs `body` with a fresh frame for `ctx` installed, restoring whatever
/// frame was active before on every exit path. Returns the closure result
/// together with the keys read under the fresh frame, in read order.
pub(crate) fn with_frame<R>(ctx: &Context, body: impl FnOnce() -> R) -> (R, Vec<Key>) {
    let saved = FRAME.with(|slot| {
        slot.replace(Some(Frame {
            context: ctx.clone(),
            log: Vec::new(),
        }))
    });
    let mut guard = FrameGuard { saved: Some(saved) };
    let out = body();
    // Normal exit: swap the saved frame back in ourselves so we can keep the
    // finished frame's log. The guard has nothing left to restore after this.
    let finished = FRAME.with(|slot| slot.replace(guard.saved.take().flatten()));
    let reads = finished.map(|frame| frame.log).unwrap_or_default();
    (out, reads)
}
