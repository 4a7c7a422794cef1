pub mod buffer2;
pub mod log_setup;
pub mod parallel;
pub mod shared_fn;

pub use buffer2::Buffer2;
pub use shared_fn::SharedFn;
