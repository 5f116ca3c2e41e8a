use std::sync::Arc;

use dbctl_core::agent::AgentTransport;
use dbctl_core::conf::EnvConfigSettings;
use dbctl_core::job_monitor::JobMonitor;

use diesel_async::pooled_connection::bb8::Pool;
use diesel_async::AsyncPgConnection;

pub struct AppState {
    pub pool: Pool<AsyncPgConnection>,
    pub transport: AgentTransport,
    pub job_monitor: Arc<JobMonitor>,
    pub conf: EnvConfigSettings,
}
