pub mod codec;
pub mod transport;

pub use codec::{AgentResponse, AgentStatus, QueryParam};
pub use transport::AgentTransport;
