mod expr;
mod formula;
mod program;

pub use expr::*;
pub use formula::*;
pub use program::*;
