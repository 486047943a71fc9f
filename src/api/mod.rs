pub mod error;
pub mod response_cache;
pub mod retry;
pub mod session;
