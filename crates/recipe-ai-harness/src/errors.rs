use crate::model::ProviderId;

/// Errors returned by a provider adapter, either while starting a stream or
/// while reading from it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// Provider answered with an application-level failure (HTTP status, auth, etc.).
    #[error("provider error ({provider}): {message}")]
    Provider {
        provider: ProviderId,
        message: String,
        status_code: Option<u16>,
    },
    /// Transport or stream I/O failed.
    #[error("transport error ({provider}): {message}")]
    Transport {
        provider: ProviderId,
        message: String,
    },
    /// Request could not be encoded or the response shape was invalid.
    #[error("protocol error ({provider}): {message}")]
    Protocol {
        provider: ProviderId,
        message: String,
    },
}

impl ProviderError {
    pub fn provider(
        provider: impl Into<ProviderId>,
        message: impl Into<String>,
        status_code: Option<u16>,
    ) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
            status_code,
        }
    }

    pub fn transport(provider: impl Into<ProviderId>, message: impl Into<String>) -> Self {
        Self::Transport {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn protocol(provider: impl Into<ProviderId>, message: impl Into<String>) -> Self {
        Self::Protocol {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn provider_id(&self) -> &ProviderId {
        match self {
            Self::Provider { provider, .. }
            | Self::Transport { provider, .. }
            | Self::Protocol { provider, .. } => provider,
        }
    }

    /// HTTP status reported by the provider, if the failure carried one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Provider { status_code, .. } => *status_code,
            Self::Transport { .. } | Self::Protocol { .. } => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Provider { message, .. }
            | Self::Transport { message, .. }
            | Self::Protocol { message, .. } => message,
        }
    }
}

/// Errors raised while building a provider, before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HarnessError {
    /// Invalid provider configuration (missing key, bad client settings).
    #[error("config error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_cover_every_variant() {
        let err = ProviderError::provider("openai", "quota exceeded", Some(429));
        assert_eq!(err.status_code(), Some(429));
        assert_eq!(err.provider_id().as_str(), "openai");
        assert_eq!(err.to_string(), "provider error (openai): quota exceeded");

        let err = ProviderError::transport("openai", "reset");
        assert_eq!(err.status_code(), None);
        assert_eq!(err.message(), "reset");
    }

    #[test]
    fn harness_errors_name_the_config_problem() {
        let err = HarnessError::Config("missing OPENAI_API_KEY".into());
        assert_eq!(err.to_string(), "config error: missing OPENAI_API_KEY");
    }
}
