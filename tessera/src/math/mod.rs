pub mod statistics;

pub use statistics::{column_means, mean_projection, median_f32_mut, min_max_finite};
