//! Conversions from external infrastructure errors into domain errors.

use keyring::Error as KeyringError;
use reqwest::Error as HttpError;
use synvia_domain::SynviaError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub SynviaError);

impl From<InfraError> for SynviaError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<SynviaError> for InfraError {
    fn from(value: SynviaError) -> Self {
        Self(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoSynviaError {
    fn into_synvia(self) -> SynviaError;
}

/* -------------------------------------------------------------------------- */
/* keyring::Error → SynviaError */
/* -------------------------------------------------------------------------- */

impl IntoSynviaError for KeyringError {
    fn into_synvia(self) -> SynviaError {
        use KeyringError::{Ambiguous, BadEncoding, NoEntry, NoStorageAccess, PlatformFailure};

        match self {
            NoEntry => SynviaError::Storage("keychain entry not found".into()),
            BadEncoding(_) => {
                SynviaError::Storage("credential in keychain is not valid UTF-8".into())
            }
            Ambiguous(entries) => SynviaError::Storage(format!(
                "multiple keychain entries matched request ({} results)",
                entries.len()
            )),
            PlatformFailure(err) => SynviaError::Storage(format!("keychain platform error: {err}")),
            NoStorageAccess(err) => {
                SynviaError::Storage(format!("unable to access secure storage: {err}"))
            }
            other => SynviaError::Storage(other.to_string()),
        }
    }
}

impl From<KeyringError> for InfraError {
    fn from(value: KeyringError) -> Self {
        Self(value.into_synvia())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → SynviaError */
/* -------------------------------------------------------------------------- */

impl IntoSynviaError for HttpError {
    fn into_synvia(self) -> SynviaError {
        if self.is_timeout() {
            return SynviaError::Timeout("HTTP request timed out".into());
        }

        if self.is_connect() {
            return SynviaError::Network(format!("HTTP connection failure: {self}"));
        }

        if self.is_builder() {
            return SynviaError::InvalidInput(format!("invalid HTTP request: {self}"));
        }

        if self.is_decode() {
            return SynviaError::Serialization(format!("invalid response body: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => SynviaError::Auth(message),
                400..=499 => SynviaError::InvalidInput(message),
                _ => SynviaError::Network(message),
            };
        }

        SynviaError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        Self(value.into_synvia())
    }
}

/* -------------------------------------------------------------------------- */
/* serde / io → SynviaError */
/* -------------------------------------------------------------------------- */

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        Self(SynviaError::Serialization(format!("invalid JSON: {value}")))
    }
}

impl From<toml::de::Error> for InfraError {
    fn from(value: toml::de::Error) -> Self {
        Self(SynviaError::Config(format!("invalid TOML: {}", value.message())))
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        Self(SynviaError::Storage(format!("I/O error: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use reqwest::{Client, StatusCode};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn keyring_no_entry_maps_to_storage() {
        let mapped: SynviaError = InfraError::from(KeyringError::NoEntry).into();
        match mapped {
            SynviaError::Storage(msg) => assert!(msg.contains("keychain")),
            other => panic!("expected storage error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_json_maps_to_serialization() {
        let err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let mapped: SynviaError = InfraError::from(err).into();
        assert!(matches!(mapped, SynviaError::Serialization(_)));
    }

    #[tokio::test]
    async fn http_status_401_maps_to_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::UNAUTHORIZED))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        let mapped: SynviaError = InfraError::from(error).into();
        match mapped {
            SynviaError::Auth(msg) => assert!(msg.contains("401")),
            other => panic!("expected auth error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn refused_connection_maps_to_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(format!("http://{addr}")).send().await.unwrap_err();

        let mapped: SynviaError = InfraError::from(error).into();
        assert!(matches!(mapped, SynviaError::Network(_)), "got {mapped:?}");
    }
}
