//! Runtime-agnostic application core: state, input types, and the reducer.

pub mod input;
pub mod reducer;
pub mod state;
