pub mod coverage;
pub mod highlight;
pub mod registers;
pub mod resolve;
pub mod util;

pub use coverage::*;
pub use highlight::*;
pub use registers::*;
pub use resolve::*;
pub use util::*;
