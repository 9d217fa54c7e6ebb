//! Newtype global IDs for type-safe platform references.
//!
//! The platform identifies every resource with a global ID string of the
//! form `gid://shopify/<Resource>/<number>`. Use the `define_gid!` macro to
//! create wrappers that prevent accidentally mixing IDs from different
//! resource types.

/// Prefix shared by every platform global ID.
pub const GID_PREFIX: &str = "gid://shopify/";

/// Macro to define a type-safe global ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `PartialOrd`, `Ord`, `Hash`
/// - Conversion methods: `new()`, `from_numeric()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `AsRef<str>` implementations
///
/// IDs are accepted as-is: the host is the source of truth for their
/// format, so no validation happens on construction.
///
/// # Example
///
/// ```rust
/// # use cart_rules_core::define_gid;
/// define_gid!(CollectionId, "Collection");
/// ///
/// let collection = CollectionId::from_numeric(42);
/// assert_eq!(collection.as_str(), "gid://shopify/Collection/42");
///
/// // These are different types, so this won't compile:
/// // let _: ProductId = collection;
/// ```
#[macro_export]
macro_rules! define_gid {
    ($name:ident, $resource:literal) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Resource name used in the global ID path.
            pub const RESOURCE: &'static str = $resource;

            /// Create an ID from its string form.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Build the global ID for a numeric resource ID.
            #[must_use]
            pub fn from_numeric(id: u64) -> Self {
                Self(format!("{}{}/{}", $crate::types::id::GID_PREFIX, $resource, id))
            }

            /// Get the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }

            /// Numeric tail of the global ID, if it has the expected shape.
            #[must_use]
            pub fn numeric_id(&self) -> Option<u64> {
                self.0
                    .strip_prefix($crate::types::id::GID_PREFIX)?
                    .strip_prefix($resource)?
                    .strip_prefix('/')?
                    .parse()
                    .ok()
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Platform resources referenced by checkout functions
define_gid!(CollectionId, "Collection");
define_gid!(ProductVariantId, "ProductVariant");
define_gid!(CartLineId, "CartLine");
define_gid!(PaymentMethodId, "PaymentCustomizationPaymentMethod");
