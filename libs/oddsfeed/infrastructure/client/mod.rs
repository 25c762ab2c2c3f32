pub mod catalog;

pub use catalog::HttpCatalogClient;
