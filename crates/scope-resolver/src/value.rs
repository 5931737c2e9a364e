//! # Dynamically Typed Values
//!
//! The engine stores every resolved service as a [`Value`], a reference
//! counted `dyn Any`. Two values are "the same" only when they are the same
//! allocation: identity comparison, not structural equality. This
//! is what smart sharing compares when deciding whether a parent-resolved
//! service may be reused in a child scope.

use std::any::Any;
use std::rc::Rc;

/// A resolved value: shared, dynamically typed, compared by identity.
pub type Value = Rc<dyn Any>;

/// Wraps a concrete service instance into a [`Value`].
pub fn pack<T: 'static>(value: T) -> Value {
    Rc::new(value)
}

/// Attempts to view a [`Value`] as a concrete type.
pub fn unpack<T: 'static>(value: &Value) -> Option<Rc<T>> {
    value.clone().downcast::<T>().ok()
}

/// Identity comparison: same allocation, not merely equal contents.
pub fn same(a: &Value, b: &Value) -> bool {
    Rc::ptr_eq(a, b)
}
