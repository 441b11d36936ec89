pub mod collections;
pub mod videos;
