#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod citation;
pub mod index;
pub mod topics;

pub use index::{
    DocumentIndex, IndexConfig, IngestFailure, IngestReport, IngestSource, SearchOptions,
};
