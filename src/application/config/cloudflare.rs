use std::env;

/// Configuration for the Cloudflare API gateway
///
/// Passed explicitly to `CloudflareGateway::new` so the gateway never reads
/// process-wide state. Tests construct their own instances pointing at a
/// local stub server.
#[derive(Debug, Clone)]
pub struct CloudflareConfig {
    /// Cloudflare API base URL (env: `EDGARR_CLOUDFLARE_API_BASE`)
    pub api_base: String,
    /// Per-request timeout in seconds (env: `EDGARR_CLOUDFLARE_TIMEOUT_SECS`)
    pub timeout_secs: u64,
}

impl CloudflareConfig {
    pub fn from_env() -> Self {
        Self {
            api_base: env::var("EDGARR_CLOUDFLARE_API_BASE")
                .unwrap_or_else(|_| "https://api.cloudflare.com/client/v4".to_string()),
            timeout_secs: env::var("EDGARR_CLOUDFLARE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8),
        }
    }
}

impl Default for CloudflareConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.cloudflare.com/client/v4".to_string(),
            timeout_secs: 8,
        }
    }
}
