pub mod category;
pub mod common;
pub mod note;

pub use category::{CategoryIcon, CategoryLabel, CustomCategory};
pub use common::{Displayable, Identifiable};
pub use note::{MoneyNote, MoneyNoteDraft};
