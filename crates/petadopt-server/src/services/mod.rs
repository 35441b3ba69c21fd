pub mod catalog;
pub mod fallback;
pub mod listings;
pub mod normalize;
