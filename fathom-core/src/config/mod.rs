//! Configuration store
//!
//! Typed rangefinder parameters with fixed defaults, a schema for
//! by-name access, a TOML loader and the persisted block layout.

pub mod params;
pub mod schema;
pub mod store;
pub mod toml;

pub use params::*;
pub use schema::{
    find_param, param_name, split_param_name, ParamError, ParamInfo, ParamKind, ParamValue,
    PARAM_SCHEMA,
};
pub use store::{ParamStore, StoreError, MAX_PARAM_STORE_SIZE, PARAM_STORE_VERSION};
pub use toml::{parse_params, ParseError};
