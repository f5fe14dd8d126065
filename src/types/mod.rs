//! Data model shared by the classifier, sources and presentation helpers.

mod activity;
mod position;
mod prices;
mod token;

pub use activity::*;
pub use position::*;
pub use prices::*;
pub use token::*;
