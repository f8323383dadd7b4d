pub mod detect;
pub mod types;

pub use detect::{classify, takes_value};
pub use types::{Action, Severity};
