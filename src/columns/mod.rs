// src/columns/mod.rs
//! Board columns: metadata, value encoding, and title resolution.

mod codec;
mod model;
mod resolver;

pub use codec::{decode, encode, ColumnValue};
pub use model::{Column, ColumnType, StatusOption};
pub use resolver::{
    select_by_id, select_by_title, ColumnCodec, ItemBoard, ItemStatuses, StatusColumn,
};
