//! Index IO.

pub mod index;
