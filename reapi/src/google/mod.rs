pub mod bytestream;
pub mod longrunning;
pub mod rpc;
