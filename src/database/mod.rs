pub mod pool;
pub mod refs;
