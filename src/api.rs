pub mod digest;
pub mod envoy;
pub mod heartbeat;
pub mod receiver;
