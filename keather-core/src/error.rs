use thiserror::Error;

/// Failures from a weather provider request.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The request never produced a response (DNS, TLS, timeout, reset).
    #[error("Failed to send request to OpenWeather ({endpoint}): {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered but reported a non-success code.
    #[error("OpenWeather {endpoint} request failed with code {code}: {message}")]
    Provider {
        endpoint: &'static str,
        code: String,
        message: String,
    },

    /// The body could not be deserialized into the expected shape.
    #[error("Failed to parse OpenWeather {endpoint} JSON: {source}")]
    Parse {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl WeatherError {
    /// Provider-reported code, when the failure came from the provider itself.
    pub fn provider_code(&self) -> Option<&str> {
        match self {
            WeatherError::Provider { code, .. } => Some(code),
            _ => None,
        }
    }
}
