//! Core math modules.

pub mod chi_square;
pub mod gamma;
pub mod normalize;
pub mod quantile;
pub mod stable;
pub mod summary;
