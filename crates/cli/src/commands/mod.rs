pub mod favorites;
pub mod heroes;
pub mod util;
pub mod workspace;

pub use favorites::*;
pub use heroes::*;
pub use util::*;
pub use workspace::*;
