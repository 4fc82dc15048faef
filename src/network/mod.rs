//! Network layer - JSON-RPC transport and the actor that runs remote work
//!
//! The Network actor receives controller commands and sends back responses.

pub mod actor;
pub mod rpc;

pub use actor::NetworkActor;
pub use rpc::JsonRpcClient;
