//! # Resolution State Machine
//!
//! The algorithm behind every lookup. Each pass of the loop inspects the
//! key's entry under a short registry borrow, decides on a step, releases the
//! borrow, and only then performs work that may re-enter the registry
//! (running a factory, or re-resolving dependency keys during smart-sharing
//! validation). Factories recurse back into `resolve` for their own reads, so
//! no borrow may ever be held across a step.
//!
//! State transitions, per lookup:
//!
//! - **Resolved** — record the read in the ambient frame (when it belongs to
//!   this context) and return the cached value.
//! - **Failed** — re-raise the cached error.
//! - **PendingFactory** — flip to Resolving (the cycle guard), run the
//!   factory under a fresh ambient frame, then cache success (with the
//!   dependency record, if the factory read anything) or failure.
//! - **PendingValue, no record** — a plainly set or inherited value; always
//!   shareable, flips straight to Resolved.
//! - **PendingValue, with record** — smart sharing: every key the origin
//!   factory read is re-resolved in *this* context and compared by identity
//!   with its value in the origin context, in recorded order, stopping at the
//!   first mismatch. All identical ⇒ share the inherited value. Any drift ⇒
//!   drop it and re-run the origin factory locally.
//! - **Resolving** — the key's own factory read the key back: a permanent,
//!   cached cycle failure.

use std::rc::Rc;

use tracing::{debug, warn};

use crate::ambient;
use crate::context::Context;
use crate::entry::{DepRecord, Entry, State};
use crate::error::{BoxError, ResolveError};
use crate::factory::Factory;
use crate::key::Key;
use crate::value::{self, Value};

/// Work decided under the entry borrow, executed after releasing it.
enum Step {
    Done(Value),
    Fail(ResolveError),
    Run(Factory),
    Check(DepRecord),
    Again,
}

pub(crate) fn resolve(ctx: &Context, key: &Key) -> Result<Value, ResolveError> {
    loop {
        let step = ctx.registry().with_entry(key, |entry| advance(key, entry));
        match step {
            Step::Done(found) => {
                ambient::record_read(ctx, key);
                return Ok(found);
            }
            Step::Fail(error) => return Err(error),
            Step::Again => continue,
            Step::Run(factory) => run_factory(ctx, key, factory),
            Step::Check(record) => check_record(ctx, key, record)?,
        }
    }
}

/// One state transition for `entry`, under the registry borrow.
fn advance(key: &Key, entry: &mut Entry) -> Step {
    let state = std::mem::take(&mut entry.state);
    match state {
        State::Resolved(found) => {
            entry.state = State::Resolved(found.clone());
            Step::Done(found)
        }
        State::Failed(error) => {
            entry.state = State::Failed(error.clone());
            Step::Fail(error)
        }
        State::PendingFactory(factory) => {
            // Cycle guard: the factory sees Resolving if it reads this key back.
            entry.state = State::Resolving(factory.clone());
            Step::Run(factory)
        }
        State::PendingValue(found) => match entry.deps.clone() {
            None => {
                entry.state = State::Resolved(found);
                Step::Again
            }
            Some(record) => {
                entry.state = State::PendingValue(found);
                Step::Check(record)
            }
        },
        State::Resolving(factory) => {
            let error = ResolveError::Cycle {
                key: key.name().into(),
                factory: factory.label().into(),
            };
            warn!(key = %key, factory = %factory, "cycle detected");
            entry.deps = None;
            entry.state = State::Failed(error);
            Step::Again
        }
        State::Empty => {
            entry.state = State::Failed(ResolveError::NoConfiguration {
                key: key.name().into(),
            });
            Step::Again
        }
    }
}

/// Executes `factory` under a fresh ambient frame and caches the outcome.
fn run_factory(ctx: &Context, key: &Key, factory: Factory) {
    debug!(key = %key, factory = %factory, "running factory");
    let (result, reads) = ambient::with_frame(ctx, || factory.call(ctx, key));
    ctx.registry().with_entry(key, |entry| match result {
        Ok(found) => {
            debug!(key = %key, reads = reads.len(), "resolved");
            entry.deps = if reads.is_empty() {
                None
            } else {
                Some(DepRecord {
                    origin: ctx.clone(),
                    factory,
                    reads,
                })
            };
            entry.state = State::Resolved(found);
        }
        Err(cause) => {
            let error = coerce(key, cause);
            warn!(key = %key, error = %error, "factory failed");
            entry.deps = None;
            entry.state = State::Failed(error);
        }
    });
}

/// Smart-sharing validation for an inherited value.
///
/// Runs under its own ambient frame so validation reads are tracked away from
/// any caller's dependency log (the throwaway log is discarded). Errors from
/// validation lookups propagate without touching the entry, which stays
/// `PendingValue`.
fn check_record(ctx: &Context, key: &Key, record: DepRecord) -> Result<(), ResolveError> {
    let (verdict, _validation_reads) = ambient::with_frame(ctx, || still_valid(ctx, &record));
    let verdict = verdict?;
    debug!(key = %key, shared = verdict, "dependency check");
    ctx.registry().with_entry(key, |entry| {
        let state = std::mem::take(&mut entry.state);
        entry.state = match state {
            State::PendingValue(found) if verdict => State::Resolved(found),
            State::PendingValue(_) => {
                entry.deps = None;
                State::PendingFactory(record.factory.clone())
            }
            // A reentrant lookup moved the entry on; keep whatever it decided.
            other => other,
        };
    });
    Ok(())
}

fn still_valid(ctx: &Context, record: &DepRecord) -> Result<bool, ResolveError> {
    for read in &record.reads {
        let here = ctx.invoke(read)?;
        let there = record.origin.invoke(read)?;
        if !value::same(&here, &there) {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Folds a factory's boxed error into the resolver taxonomy. Errors that are
/// already `ResolveError` (a failed dependency propagated with `?`) pass
/// through unchanged.
fn coerce(key: &Key, cause: BoxError) -> ResolveError {
    match cause.downcast::<ResolveError>() {
        Ok(resolver_error) => *resolver_error,
        Err(foreign) => ResolveError::Factory {
            key: key.name().into(),
            cause: Rc::new(foreign),
        },
    }
}
