//! Fairness audit math utilities.

pub mod math;

pub use math::chi_square::*;
pub use math::gamma::{gamma_p, gamma_q};
pub use math::normalize::min_max_normalize;
pub use math::quantile::percentile;
pub use math::stable::log_gamma;
pub use math::summary::{mean, proportion};
