pub mod cors;
pub mod rate_limit;
pub mod request_tracing;
