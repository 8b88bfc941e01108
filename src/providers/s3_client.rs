use aws_config::Region;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Builder as S3ConfigBuilder;
use aws_sdk_s3::Client;

pub struct S3ClientConfig<'a> {
    pub access_key_id: &'a str,
    pub secret_access_key: &'a str,
    pub region: &'a str,
    pub endpoint_url: Option<&'a str>,
    pub force_path_style: bool,
}

/// Accepts either a bare host (`oss-cn-shenzhen.aliyuncs.com`) or a full URL.
pub fn build_endpoint_url(endpoint: Option<&str>) -> Option<String> {
    let host = endpoint?.trim().trim_end_matches('/');
    if host.is_empty() {
        return None;
    }
    if host.starts_with("http://") || host.starts_with("https://") {
        return Some(host.to_string());
    }
    Some(format!("https://{}", host))
}

pub fn create_s3_client(config: &S3ClientConfig<'_>) -> Client {
    let credentials = Credentials::new(
        config.access_key_id,
        config.secret_access_key,
        None,
        None,
        "bucket-browser",
    );

    let mut builder = S3ConfigBuilder::new()
        .credentials_provider(credentials)
        .region(Region::new(config.region.to_string()));

    if let Some(endpoint_url) = config.endpoint_url {
        builder = builder.endpoint_url(endpoint_url);
    }

    if config.force_path_style {
        builder = builder.force_path_style(true);
    }

    Client::from_conf(builder.build())
}

#[cfg(test)]
mod tests {
    use super::build_endpoint_url;

    #[test]
    fn endpoint_host_gets_https_scheme() {
        assert_eq!(
            build_endpoint_url(Some("oss-cn-shenzhen.aliyuncs.com")).as_deref(),
            Some("https://oss-cn-shenzhen.aliyuncs.com")
        );
    }

    #[test]
    fn endpoint_url_is_kept_as_is() {
        assert_eq!(
            build_endpoint_url(Some("http://localhost:9000/")).as_deref(),
            Some("http://localhost:9000")
        );
    }

    #[test]
    fn blank_endpoint_is_ignored() {
        assert_eq!(build_endpoint_url(Some("  ")), None);
        assert_eq!(build_endpoint_url(None), None);
    }
}
