//! # Resolution
//!
//! Turns request-level names into schema objects:
//!
//! 1. [`FamilyResolver`]: resource type → [`Family`](crate::schema::Family),
//!    honouring a filter's explicit family code.
//! 2. [`AttributePathResolver`]: `(family, property)` →
//!    [`Attribute`](crate::schema::Attribute), following dotted paths such as
//!    `brand.country` across relations that allow exactly one family.
//!
//! Both are read-only views over a [`FamilyRegistry`](crate::schema::FamilyRegistry).

mod family;
mod path;

pub use family::FamilyResolver;
pub use path::{is_nested_property, AttributePath, AttributePathResolver};
