//! # Key Bundle Macro
//!
//! Applications usually hold their typed keys together in one struct built
//! once at startup and passed to whatever wires the scopes. The
//! [`service_keys!`](crate::service_keys) macro generates that struct: one
//! [`TypedKey`](crate::TypedKey) field per declared service, a `new()`
//! constructor giving each key a fresh identity named after its field, and a
//! `with_<field>_recipe` builder that swaps in a key carrying its own
//! construction recipe.
//!
//! ```
//! use scope_resolver::{service_keys, Context};
//!
//! #[derive(Default)]
//! struct Cache;
//!
//! service_keys! {
//!     /// Keys for the demo services.
//!     pub struct DemoKeys {
//!         greeting: String,
//!         cache: Cache,
//!     }
//! }
//!
//! let keys = DemoKeys::new().with_greeting_recipe(|_ctx| Ok("hello".to_string()));
//! let ctx = Context::root();
//! assert_eq!(*ctx.get(&keys.greeting).unwrap(), "hello");
//! ```

/// Generates a typed key bundle struct: one [`TypedKey`](crate::TypedKey)
/// field per declared service, a `new()` constructor, and per-field
/// `with_<field>_recipe` builders.
#[macro_export]
macro_rules! service_keys {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $crate::__paste::paste! {
            $(#[$meta])*
            $vis struct $name {
                $(
                    $(#[$field_meta])*
                    pub $field: $crate::TypedKey<$ty>,
                )*
            }

            impl $name {
                /// Builds the bundle, giving every key a fresh identity
                /// named after its field.
                $vis fn new() -> Self {
                    Self {
                        $( $field: $crate::TypedKey::new(stringify!($field)), )*
                    }
                }

                $(
                    /// Replaces this field's key with one carrying its own
                    /// construction recipe, used when no scope configures
                    /// the key explicitly.
                    $vis fn [<with_ $field _recipe>](
                        mut self,
                        build: impl Fn(&$crate::Context) -> Result<$ty, $crate::BoxError> + 'static,
                    ) -> Self {
                        self.$field = $crate::TypedKey::recipe(stringify!($field), build);
                        self
                    }
                )*
            }

            impl Default for $name {
                fn default() -> Self {
                    Self::new()
                }
            }
        }
    };
}
