//! MinIO/S3-compatible media client
//!
//! Stores blog images in a bucket and hands back durable public URLs.
//! Uses rust-s3 crate for lightweight S3 operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::{Client, Url};
use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::core::config::MediaConfig;
use crate::core::error::AppError;
use crate::modules::storage::media_store::{MediaStore, StoredObject};

type HmacSha256 = Hmac<Sha256>;

/// MinIO/S3-compatible storage client
pub struct MinIOClient {
    bucket: Box<Bucket>,
    endpoint: String,
    public_endpoint: String,
    public_prefix: String,
    upload_folder: String,
    signer: PolicySigner,
    /// HTTP client for bucket policy operations
    http_client: Client,
}

/// Headers of a signed bucket-policy request
#[derive(Debug)]
struct SignedPolicyRequest {
    host: String,
    amz_date: String,
    payload_hash: String,
    authorization: String,
}

const SIGNED_HEADERS: &str = "host;x-amz-content-sha256;x-amz-date";

/// SigV4 signer for the one raw S3 call rust-s3 does not cover
struct PolicySigner {
    access_key: String,
    secret_key: String,
    region: String,
}

impl PolicySigner {
    fn sign_policy_put(
        &self,
        endpoint: &str,
        bucket_name: &str,
        policy: &str,
        now: DateTime<Utc>,
    ) -> Result<SignedPolicyRequest, AppError> {
        let endpoint_url = Url::parse(endpoint)
            .map_err(|e| AppError::Storage(format!("Invalid endpoint URL: {}", e)))?;
        let host = match (endpoint_url.host_str(), endpoint_url.port()) {
            (Some(h), Some(p)) => format!("{}:{}", h, p),
            (Some(h), None) => h.to_string(),
            (None, _) => return Err(AppError::Storage("Endpoint URL has no host".to_string())),
        };

        let date = now.format("%Y%m%d").to_string();
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let payload_hash = hex::encode(Sha256::digest(policy.as_bytes()));
        let scope = format!("{}/{}/s3/aws4_request", date, self.region);

        let canonical_headers =
            format!("host:{host}\nx-amz-content-sha256:{payload_hash}\nx-amz-date:{amz_date}\n");
        let canonical_request = [
            "PUT",
            &format!("/{}", bucket_name),
            "policy=",
            &canonical_headers,
            SIGNED_HEADERS,
            &payload_hash,
        ]
        .join("\n");
        let string_to_sign = format!(
            "AWS4-HMAC-SHA256\n{}\n{}\n{}",
            amz_date,
            scope,
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );

        let parts: [&[u8]; 4] = [
            date.as_bytes(),
            self.region.as_bytes(),
            b"s3",
            b"aws4_request",
        ];
        let signing_key = parts.iter().try_fold(
            format!("AWS4{}", self.secret_key).into_bytes(),
            |key, part| hmac_sha256(&key, part),
        )?;
        let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes())?);

        Ok(SignedPolicyRequest {
            host,
            amz_date,
            payload_hash,
            authorization: format!(
                "AWS4-HMAC-SHA256 Credential={}/{}, SignedHeaders={}, Signature={}",
                self.access_key, scope, SIGNED_HEADERS, signature
            ),
        })
    }
}

/// An existing bucket shows up as a create error and is fine
async fn create_bucket_if_missing(name: &str, region: &Region, credentials: &Credentials) {
    match Bucket::create_with_path_style(
        name,
        region.clone(),
        credentials.clone(),
        BucketConfiguration::default(),
    )
    .await
    {
        Ok(_) => info!("Created media bucket '{}'", name),
        Err(e) => {
            let message = e.to_string();
            if ["BucketAlreadyOwnedByYou", "BucketAlreadyExists", "already own it"]
                .iter()
                .any(|marker| message.contains(marker))
            {
                debug!("Media bucket '{}' already exists", name);
            } else {
                warn!("Could not create media bucket '{}': {}", name, e);
            }
        }
    }
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, AppError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| AppError::Storage(format!("HMAC key error: {}", e)))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

impl MinIOClient {
    /// Connect to the media store, creating the bucket and opening
    /// `{public_prefix}/*` for anonymous reads
    pub async fn new(config: MediaConfig) -> Result<Self, AppError> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Storage(format!("Invalid media credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        create_bucket_if_missing(&config.bucket, &region, &credentials).await;

        let mut bucket = Bucket::new(&config.bucket, region, credentials)
            .map_err(|e| AppError::Storage(format!("Invalid media bucket: {}", e)))?;
        // MinIO wants http://endpoint/bucket rather than http://bucket.endpoint
        bucket.set_path_style();

        let http_client = Client::builder()
            .build()
            .map_err(|e| AppError::Storage(format!("Failed to create HTTP client: {}", e)))?;

        let client = Self {
            bucket,
            endpoint: config.endpoint,
            public_endpoint: config.public_endpoint,
            public_prefix: config.public_prefix,
            upload_folder: config.upload_folder,
            signer: PolicySigner {
                access_key: config.access_key,
                secret_key: config.secret_key,
                region: config.region,
            },
            http_client,
        };

        // Images stay uploadable without the policy; only their URLs need it
        if let Err(e) = client.open_public_prefix().await {
            warn!(
                "Public read policy not applied to {}/{}: {}",
                client.bucket.name(),
                client.public_prefix,
                e
            );
        }

        info!(
            "Media store ready: endpoint={}, bucket={}, folder={}/{}",
            client.endpoint,
            client.bucket.name(),
            client.public_prefix,
            client.upload_folder
        );

        Ok(client)
    }

    /// Grant anonymous `s3:GetObject` on the public prefix
    async fn open_public_prefix(&self) -> Result<(), AppError> {
        let bucket_name = self.bucket.name();
        let resource = format!("arn:aws:s3:::{}/{}/*", bucket_name, self.public_prefix);
        let policy = json!({
            "Version": "2012-10-17",
            "Statement": [{
                "Effect": "Allow",
                "Principal": {"AWS": "*"},
                "Action": ["s3:GetObject"],
                "Resource": [resource],
            }]
        })
        .to_string();

        let signed = self
            .signer
            .sign_policy_put(&self.endpoint, &bucket_name, &policy, Utc::now())?;

        let response = self
            .http_client
            .put(format!("{}/{}?policy", self.endpoint, bucket_name))
            .header("Host", &signed.host)
            .header("x-amz-date", &signed.amz_date)
            .header("x-amz-content-sha256", &signed.payload_hash)
            .header("Authorization", &signed.authorization)
            .header("Content-Type", "application/json")
            .body(policy)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Policy request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Storage(format!(
                "Policy request rejected: {} {}",
                status, body
            )));
        }

        info!("Public read enabled for {}/{}/*", bucket_name, self.public_prefix);
        Ok(())
    }

    /// Get the bucket name
    pub fn bucket_name(&self) -> String {
        self.bucket.name()
    }

    /// Direct URL for an object under the public endpoint
    pub fn get_public_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.public_endpoint, self.bucket.name(), key)
    }
}

#[async_trait]
impl MediaStore for MinIOClient {
    fn object_key(&self, file_name: &str) -> String {
        format!("{}/{}/{}", self.public_prefix, self.upload_folder, file_name)
    }

    async fn upload(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, AppError> {
        let response = self
            .bucket
            .put_object_with_content_type(key, &data, content_type)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to upload file '{}': {}", key, e)))?;

        let status = response.status_code();
        if !(200..300).contains(&status) {
            return Err(AppError::Storage(format!(
                "Upload of '{}' rejected with status {}",
                key, status
            )));
        }

        debug!("Uploaded file '{}' to bucket '{}'", key, self.bucket.name());

        Ok(StoredObject {
            key: key.to_string(),
            url: self.get_public_url(key),
        })
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        let response = self
            .bucket
            .delete_object(key)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to delete file '{}': {}", key, e)))?;

        let status = response.status_code();
        if !(200..300).contains(&status) {
            return Err(AppError::Storage(format!(
                "Delete of '{}' rejected with status {}",
                key, status
            )));
        }

        debug!(
            "Deleted file '{}' from bucket '{}'",
            key,
            self.bucket.name()
        );
        Ok(())
    }
}
