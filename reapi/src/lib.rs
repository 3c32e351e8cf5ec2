//! Protobuf bindings for the client surface of the Bazel Remote Execution
//! API v2, together with the `google.bytestream`, `google.longrunning` and
//! `google.rpc` packages it depends on.
//!
//! The modules below are kept in the tree in generated form (prost message
//! structs and tonic client stubs) and are trimmed to the messages and
//! methods this client actually sends. Wire tags match the upstream proto
//! definitions, so digests computed over canonical serializations and all
//! RPCs interoperate with any conformant server.

pub mod google;
pub mod remote_execution;
