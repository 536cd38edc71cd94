pub mod medicine;
pub mod message;
pub mod place;

pub use medicine::*;
pub use message::*;
pub use place::*;
