pub mod clean;
pub mod converter;
pub mod flatten;
pub mod select;
pub mod tabular;
pub mod xml;

pub use crate::domain::model::{FlatRow, GenericValue};
pub use crate::domain::ports::{ConfigProvider, Storage};
pub use crate::utils::error::Result;
