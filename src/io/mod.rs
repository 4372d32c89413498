//! File input/output: CSV ingest, artifact export, and the persisted
//! column mapping.

pub mod export;
pub mod ingest;
pub mod mapping;
