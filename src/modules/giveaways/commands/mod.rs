pub mod cancel;
pub mod participants;
pub mod reroll;
pub mod start;

pub use cancel::*;
pub use participants::*;
pub use reroll::*;
pub use start::*;
