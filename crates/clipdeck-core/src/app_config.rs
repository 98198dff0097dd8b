use std::net::SocketAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub apify_token: Option<String>,
    pub apify_actor: String,
    pub apify_base_url: String,
    pub upstash_redis_rest_url: Option<String>,
    pub upstash_redis_rest_token: Option<String>,
    pub tiktok_access_token: Option<String>,
    pub tiktok_client_key: Option<String>,
    pub tiktok_client_secret: Option<String>,
    pub tiktok_publisher_id: Option<String>,
    pub tiktok_api_base_url: String,
    pub daily_trigger_secret: Option<String>,
    pub daily_cron: String,
    pub scheduler_enabled: bool,
    pub http_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[redacted]");
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("apify_token", &redact(&self.apify_token))
            .field("apify_actor", &self.apify_actor)
            .field("apify_base_url", &self.apify_base_url)
            .field("upstash_redis_rest_url", &self.upstash_redis_rest_url)
            .field(
                "upstash_redis_rest_token",
                &redact(&self.upstash_redis_rest_token),
            )
            .field("tiktok_access_token", &redact(&self.tiktok_access_token))
            .field("tiktok_client_key", &redact(&self.tiktok_client_key))
            .field("tiktok_client_secret", &redact(&self.tiktok_client_secret))
            .field("tiktok_publisher_id", &self.tiktok_publisher_id)
            .field("tiktok_api_base_url", &self.tiktok_api_base_url)
            .field("daily_trigger_secret", &redact(&self.daily_trigger_secret))
            .field("daily_cron", &self.daily_cron)
            .field("scheduler_enabled", &self.scheduler_enabled)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .finish()
    }
}
