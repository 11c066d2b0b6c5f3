//! Shelf Application Library
//!
//! Book catalog modules mounted on the shelf module framework.

pub mod modules;
