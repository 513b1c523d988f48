pub mod history;
pub mod palette;
