//! Adapters implementing domain ports

pub mod manifest;

pub use manifest::ManifestSource;
