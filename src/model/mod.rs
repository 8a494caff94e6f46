//! Document model types shared by the host adapters and the pipeline.
//!
//! Pages are detached values: the host adapter reads each page's position
//! and name once, and everything downstream (selection, naming, export)
//! works on those values instead of live automation objects.

mod page;

pub use page::Page;
