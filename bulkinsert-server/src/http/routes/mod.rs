//! Route handlers

pub mod bulk_insert;
