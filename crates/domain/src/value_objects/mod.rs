pub mod amount;
pub mod percentage;

pub use amount::{AmountError, raw_to_decimal, scale_down};
pub use percentage::Percentage;
