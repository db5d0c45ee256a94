pub mod projector;
pub mod row_index;
