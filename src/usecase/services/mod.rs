pub mod retry;
pub mod sync_service;
