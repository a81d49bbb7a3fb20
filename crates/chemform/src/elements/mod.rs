mod count;
pub mod element_table;
pub mod errors;
mod mass;
