pub mod format;
pub mod join;
