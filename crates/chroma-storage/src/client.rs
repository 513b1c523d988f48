use aws_sdk_s3::Client;

/// Build an S3 client from a loaded SDK config.
///
/// `endpoint_url` points the client at an S3-compatible endpoint (LocalStack,
/// MinIO); such endpoints need path-style addressing.
pub fn build_client(config: &aws_config::SdkConfig, endpoint_url: Option<&str>) -> Client {
    let mut builder = aws_sdk_s3::config::Builder::from(config);
    if let Some(url) = endpoint_url {
        builder = builder.endpoint_url(url).force_path_style(true);
    }
    Client::from_conf(builder.build())
}
