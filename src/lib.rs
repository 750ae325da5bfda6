pub mod board;
pub mod game;
pub mod rules;
pub mod session;
pub mod source;

pub use board::*;
pub use game::*;
pub use rules::*;
pub use session::*;
pub use source::*;
