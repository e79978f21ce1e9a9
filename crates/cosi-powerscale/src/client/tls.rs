//! HTTP client construction, including TLS material loading.

use std::path::Path;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Certificate, Client, Identity};

use crate::{Error, PowerscaleConfig, Result, TRACING_TARGET_CLIENT};

/// Builds the HTTP client used for every platform call.
///
/// The basic-auth header is installed once as a sensitive default header.
pub(crate) fn build_http_client(config: &PowerscaleConfig) -> Result<Client> {
    let mut authorization = HeaderValue::from_str(&config.authorization())
        .map_err(|err| Error::Config(format!("invalid API credentials: {err}")))?;
    authorization.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, authorization);

    let mut builder = Client::builder()
        .use_rustls_tls()
        .default_headers(headers)
        .timeout(config.effective_timeout())
        .user_agent(user_agent())
        .danger_accept_invalid_certs(config.tls_insecure_skip_verify);

    if config.tls_insecure_skip_verify {
        tracing::warn!(
            target: TRACING_TARGET_CLIENT,
            endpoint = %config.api_endpoint,
            "TLS certificate verification is disabled"
        );
    }

    if let Some(path) = &config.tls_cacert {
        for certificate in load_ca_bundle(path)? {
            builder = builder.add_root_certificate(certificate);
        }
    }

    if let (Some(cert), Some(key)) = (&config.tls_client_cert, &config.tls_client_key) {
        builder = builder.identity(load_identity(cert, key)?);
    }

    builder.build().map_err(Error::Transport)
}

fn user_agent() -> String {
    format!("cosi-powerscale/{}", env!("CARGO_PKG_VERSION"))
}

fn read_pem(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_CLIENT,
            path = %path.display(),
            error = %err,
            "Failed to read TLS material"
        );
        Error::Io(err)
    })
}

fn load_ca_bundle(path: &Path) -> Result<Vec<Certificate>> {
    let pem = read_pem(path)?;
    let certificates = Certificate::from_pem_bundle(&pem).map_err(|err| {
        Error::Config(format!("invalid CA bundle {}: {err}", path.display()))
    })?;

    if certificates.is_empty() {
        return Err(Error::Config(format!(
            "no certificate found in {}",
            path.display()
        )));
    }

    tracing::debug!(
        target: TRACING_TARGET_CLIENT,
        path = %path.display(),
        certificates = certificates.len(),
        "Loaded CA bundle"
    );

    Ok(certificates)
}

fn load_identity(cert: &Path, key: &Path) -> Result<Identity> {
    let mut pem = read_pem(key)?;
    pem.push(b'\n');
    pem.extend(read_pem(cert)?);

    Identity::from_pem(&pem).map_err(|err| {
        Error::Config(format!(
            "invalid client identity {} / {}: {err}",
            cert.display(),
            key.display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use url::Url;

    use super::*;

    fn config() -> anyhow::Result<PowerscaleConfig> {
        Ok(
            PowerscaleConfig::new("isilon", Url::parse("https://isilon.example.com:8080")?)
                .with_credentials("admin", "secret")
                .with_s3_endpoint("https://data.example.com:9021")
                .with_base_path("/ifs/data/cosi"),
        )
    }

    #[test]
    fn builds_without_tls_material() -> anyhow::Result<()> {
        build_http_client(&config()?)?;
        build_http_client(&config()?.with_insecure_skip_verify(true))?;
        Ok(())
    }

    #[test]
    fn missing_ca_bundle_is_io_error() -> anyhow::Result<()> {
        let config = config()?.with_cacert("/nonexistent/ca.pem");
        let error = build_http_client(&config).err();
        assert!(matches!(error, Some(Error::Io(_))));
        Ok(())
    }

    #[test]
    fn ca_bundle_without_certificates_is_rejected() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "this is not a certificate")?;

        let config = config()?.with_cacert(file.path());
        let error = build_http_client(&config).err();
        assert!(matches!(error, Some(Error::Config(_))));
        Ok(())
    }

    #[test]
    fn unparsable_client_identity_is_config_error() -> anyhow::Result<()> {
        let mut cert = tempfile::NamedTempFile::new()?;
        writeln!(cert, "not a certificate")?;
        let mut key = tempfile::NamedTempFile::new()?;
        writeln!(key, "not a private key")?;

        let config = config()?.with_client_identity(cert.path(), key.path());
        assert_eq!(config.tls_client_cert.as_deref(), Some(cert.path()));
        assert_eq!(config.tls_client_key.as_deref(), Some(key.path()));

        let error = build_http_client(&config).err();
        assert!(matches!(error, Some(Error::Config(_))));
        Ok(())
    }

    #[test]
    fn missing_client_key_is_io_error() -> anyhow::Result<()> {
        let mut cert = tempfile::NamedTempFile::new()?;
        writeln!(cert, "not a certificate")?;
        let key = Path::new("/nonexistent/key.pem");

        let config = config()?.with_client_identity(cert.path(), key);
        let error = build_http_client(&config).err();
        assert!(matches!(error, Some(Error::Io(_))));
        Ok(())
    }

    #[test]
    fn user_agent_names_crate() {
        assert!(user_agent().starts_with("cosi-powerscale/"));
    }
}
