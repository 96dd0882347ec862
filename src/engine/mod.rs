pub mod client;
pub mod error;
pub mod generic;
pub mod models;
pub mod resources;
pub mod worker;

pub use client::{EngineClient, Filter, PageWindow, COUNT_TIMEOUT, REQUEST_TIMEOUT};
pub use error::EngineError;
pub use generic::{fetch, inferred_column_names, FetchOutcome, FetchPayload, FetchRequest, FetchTarget};
pub use models::{
    decode_variables, display_value, lookup_field, record_cell, ProcessDefinition,
    ProcessInstance, Record, Variable,
};
pub use resources::{
    TypedResource, BUILTIN_ROOTS, RESOURCE_DEFINITIONS, RESOURCE_INSTANCES, RESOURCE_VARIABLES,
};
pub use worker::{run_job, spawn_job, DeleteRequest, EngineJob, EngineReply, SetVariableRequest};
