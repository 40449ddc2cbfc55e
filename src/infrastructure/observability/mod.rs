mod init_tracing;
mod invocation_id;
mod tracing_config;

pub use init_tracing::init_tracing;
pub use invocation_id::{invocation_id_middleware, InvocationId, INVOCATION_ID_HEADER};
pub use tracing_config::TracingConfig;
