pub mod anime;
pub mod episode;
pub mod franchise;
pub mod relation;
