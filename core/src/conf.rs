use std::env;

/// Initializes and holds environment variable settings which control system
/// behavior. Panics with a descriptive message if any required setting is
/// not set.
#[derive(Debug, Clone)]
pub struct EnvConfigSettings {
    pub port: u16,
    pub database_url: String,
    pub agent_binary_path_linux: String,
    pub agent_binary_path_windows: String,
    pub agent_execution_timeout_secs: u64,
    pub agent_max_retries: u32,
    pub job_poll_interval_secs: u64,
    pub query_temp_dir: String,
    pub results_dir: String,
    pub notification_dir: String,
    pub mysql_system_users: Vec<String>,
    pub oracle_system_users: Vec<String>,
    pub oracle_include_maintained_users: bool,
}

fn parse_csv_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl EnvConfigSettings {
    pub fn init() -> Self {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8081".to_string())
            .parse::<u16>()
            .expect("Unable to parse PORT as a u16");

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let agent_binary_path_linux = env::var("AGENT_BINARY_PATH_LINUX")
            .expect("AGENT_BINARY_PATH_LINUX must be set");
        let agent_binary_path_windows = env::var("AGENT_BINARY_PATH_WINDOWS")
            .expect("AGENT_BINARY_PATH_WINDOWS must be set");

        let agent_execution_timeout_secs = env::var("AGENT_EXECUTION_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".to_string())
            .parse::<u64>()
            .expect("Unable to parse AGENT_EXECUTION_TIMEOUT_SECS as u64");

        let agent_max_retries = env::var("AGENT_MAX_RETRIES")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .expect("Unable to parse AGENT_MAX_RETRIES as u32");

        let job_poll_interval_secs = env::var("JOB_POLL_INTERVAL_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u64>()
            .expect("Unable to parse JOB_POLL_INTERVAL_SECS as u64");

        let query_temp_dir = env::var("QUERY_TEMP_DIR").expect("QUERY_TEMP_DIR must be set");
        let results_dir = env::var("RESULTS_DIR").expect("RESULTS_DIR must be set");
        let notification_dir =
            env::var("NOTIFICATION_DIR").expect("NOTIFICATION_DIR must be set");

        let mysql_system_users = parse_csv_list(
            &env::var("MYSQL_SYSTEM_USERS")
                .unwrap_or_else(|_| "mysql.sys,mysql.session,mysql.infoschema,root".to_string()),
        );
        let oracle_system_users = parse_csv_list(
            &env::var("ORACLE_SYSTEM_USERS").unwrap_or_else(|_| {
                "SYS,SYSTEM,OUTLN,DBSNMP,APPQOSSYS,GSMADMIN_INTERNAL".to_string()
            }),
        );

        let oracle_include_maintained_users = env::var("ORACLE_INCLUDE_MAINTAINED_USERS")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .expect("Unable to parse ORACLE_INCLUDE_MAINTAINED_USERS as bool");

        Self {
            port,
            database_url,
            agent_binary_path_linux,
            agent_binary_path_windows,
            agent_execution_timeout_secs,
            agent_max_retries,
            job_poll_interval_secs,
            query_temp_dir,
            results_dir,
            notification_dir,
            mysql_system_users,
            oracle_system_users,
            oracle_include_maintained_users,
        }
    }

    /// Creates the query-temp, results, and notification directories with
    /// mode 0755 if they do not already exist.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        for dir in [&self.query_temp_dir, &self.results_dir, &self.notification_dir] {
            std::fs::create_dir_all(dir)?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o755))?;
            }
        }
        Ok(())
    }
}
