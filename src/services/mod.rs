pub mod classifier;
pub mod import_service;
pub mod youtube;
