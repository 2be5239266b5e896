pub mod config;

pub use config::allocator::AllocatorConfig;
