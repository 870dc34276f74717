//! Common utilities and helpers

pub mod concat_list;
pub mod media;
pub mod path;
