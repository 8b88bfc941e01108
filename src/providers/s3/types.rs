//! S3 store configuration and public URL synthesis

use crate::providers::{build_endpoint_url, encode_key_path};

#[derive(Debug, Clone)]
pub struct S3StoreConfig {
    pub bucket: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Host or URL of an S3-compatible endpoint; `None` means the region's
    /// OSS host.
    pub endpoint: Option<String>,
    pub force_path_style: bool,
}

impl S3StoreConfig {
    /// Falls back to the region's Aliyun OSS host when no endpoint is set.
    pub fn endpoint_url(&self) -> String {
        build_endpoint_url(self.endpoint.as_deref())
            .unwrap_or_else(|| format!("https://{}.aliyuncs.com", self.region))
    }

    /// Base URL objects are publicly addressed under, without a trailing `/`.
    pub fn public_base_url(&self) -> String {
        let url = self.endpoint_url();
        let (scheme, host) = url.split_once("://").unwrap_or(("https", url.as_str()));
        if self.force_path_style {
            format!("{}://{}/{}", scheme, host, self.bucket)
        } else {
            format!("{}://{}.{}", scheme, self.bucket, host)
        }
    }

    pub fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url(), encode_key_path(key))
    }
}
