use std::str::FromStr;
use std::time;

use envconfig::Envconfig;

/// Transport-level configuration for the connector. Per-destination settings
/// (the customer id) arrive with each invocation instead; credentials are
/// injected by the deployment, not managed here.
#[derive(Envconfig, Clone)]
pub struct Config {
    /// Overridable so tests (and staging) can point at another host.
    #[envconfig(from = "GOOGLE_ADS_BASE_URL", default = "https://googleads.googleapis.com")]
    pub base_url: String,

    #[envconfig(from = "GOOGLE_ADS_REQUEST_TIMEOUT_MS", default = "5000")]
    pub request_timeout: EnvMsDuration,

    #[envconfig(from = "GOOGLE_ADS_DEVELOPER_TOKEN")]
    pub developer_token: Option<String>,

    #[envconfig(from = "GOOGLE_ADS_ACCESS_TOKEN")]
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct EnvMsDuration(pub time::Duration);

#[derive(Debug, PartialEq, Eq)]
pub struct ParseEnvMsDurationError;

impl FromStr for EnvMsDuration {
    type Err = ParseEnvMsDurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ms = s.parse::<u64>().map_err(|_| ParseEnvMsDurationError)?;

        Ok(EnvMsDuration(time::Duration::from_millis(ms)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_millisecond_durations() {
        let parsed: EnvMsDuration = "1500".parse().unwrap();
        assert_eq!(parsed.0, time::Duration::from_millis(1500));
        assert!("not-a-number".parse::<EnvMsDuration>().is_err());
    }
}
