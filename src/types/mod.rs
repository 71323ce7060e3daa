//! The descriptor, signature and internal-name grammars, plus the
//! push-down signature checker.

pub mod descriptor;
pub mod internal_name;
pub mod signature;
