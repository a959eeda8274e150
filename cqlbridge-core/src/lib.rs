//! CQLBridge Core
//!
//! Value codecs and schema descriptions for a gateway fronting a
//! Cassandra-compatible store. Two halves:
//!
//! - [`codec`] and [`convert`]: bidirectional, range-checked conversion
//!   between [`TaggedValue`]s and the store's native column bytes.
//! - [`schema`] and [`service`]: rendering a catalog snapshot into keyspace
//!   and table descriptions.
//!
//! Every call is a synchronous in-memory transformation. The codec registry
//! is built once and shared freely between threads.
//!
//! ```rust
//! use cqlbridge_core::{ColumnType, PrimitiveType, TaggedValue, ValueConverter, ValueSource};
//!
//! let converter = ValueConverter::default();
//! let ty = ColumnType::list(PrimitiveType::Int);
//! let value = TaggedValue::List(vec![TaggedValue::Int(1), TaggedValue::Int(2)]);
//!
//! let bound = converter.to_wire(&value, &ty).unwrap();
//! let decoded = converter
//!     .from_wire(bound.as_bytes().unwrap(), &ty, ValueSource::Store)
//!     .unwrap();
//! assert_eq!(decoded, value);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod codec;
pub mod config;
pub mod convert;
pub mod error;
pub mod schema;
pub mod service;
pub mod translator;
pub mod types;

// Re-export main types for convenience
pub use crate::{
    codec::{CodecRef, CodecRegistry, ValueCodec},
    config::{CodecConfig, Config, ProtocolVersion, SchemaConfig, SimpleStrategyFactor},
    convert::{from_wire, to_wire, ValueConverter},
    error::{Error, ErrorCategory, Result, Status, StatusCode, ValueSource},
    schema::{
        describe_keyspace, describe_table, parse_column_type, Catalog, KeyspaceDescription,
        SchemaSnapshot, TableDescription,
    },
    service::{Persistence, RequestHeaders, SchemaService, StaticPersistence},
    translator::{translate, TypeSpec},
    types::*,
};
