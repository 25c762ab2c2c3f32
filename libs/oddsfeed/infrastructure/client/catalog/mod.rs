//! HTTP catalog of market and variant descriptions

pub mod client;

pub use client::HttpCatalogClient;
