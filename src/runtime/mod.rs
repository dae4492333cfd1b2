//! Runtime-specific modules. Only the native terminal runtime exists today.

pub mod native;
