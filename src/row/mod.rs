pub mod composite;
pub mod extractor;
