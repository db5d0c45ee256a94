pub mod mongo;
pub mod sheets;
