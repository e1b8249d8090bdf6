use super::{ProviderKind, ScanError};
use crate::config::ScannerConfig;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::{Client, RequestBuilder, Response};
use tracing::debug;

/// Characters left alone by JavaScript's `encodeURIComponent`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a whole string as a single URL component (`/` included)
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Percent-encode each `/`-separated segment, keeping the separators
pub(crate) fn encode_path(path: &str) -> String {
    path.split('/')
        .map(encode_component)
        .collect::<Vec<_>>()
        .join("/")
}

pub(crate) fn build_client(config: &ScannerConfig) -> Result<Client, ScanError> {
    let mut builder = Client::builder();
    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Send a request and turn any non-2xx status into `ScanError::Api`
pub(crate) async fn send_checked(
    provider: ProviderKind,
    request: RequestBuilder,
) -> Result<Response, ScanError> {
    let response = request.send().await?;
    let status = response.status();
    debug!(provider = %provider, url = %response.url(), status = status.as_u16(), "provider response");

    if !status.is_success() {
        return Err(ScanError::Api {
            provider,
            status: status.as_u16(),
        });
    }

    Ok(response)
}
