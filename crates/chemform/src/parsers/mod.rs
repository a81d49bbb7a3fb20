pub mod errors;
pub(crate) mod formula;
pub mod primitives;
