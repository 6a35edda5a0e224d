//! Builtin-facing consumers of the value API.
//!
//! These modules sit outside the value core proper: they are what builtin
//! modules of the language call to turn their arguments into values.

pub mod color;
