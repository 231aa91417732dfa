//! Core library for the assay-tools command line application.
//!
//! The library consolidates per-plate assay workbooks into one workbook with a
//! sheet per assay, flagging the high-control wells along the way. IO adapters
//! live under [`assay::tools::io`], the shared table and column definitions in
//! [`assay::tools::model`], the folder scan in [`assay::tools::aggregate`],
//! and the end-to-end run in [`assay::tools::pipeline`].

pub mod assay;

pub use assay::tools::{
    Result, ToolError, aggregate, annotate, error, io, model, pipeline, plate, split, well,
};
