//! Conversion pass modules.
//!
//! Each pass is a self-contained transformation over the document tree.
//! Passes are executed in order (0-3) and each assumes the output of
//! previous passes.

pub mod p0_names;
pub mod p1_imports;
pub mod p2_refs;
pub mod p3_simplify;
