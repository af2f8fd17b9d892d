//! Resume storage on S3-compatible object storage (MinIO locally, AWS in production).

use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::errors::AppError;

/// A resume file as received from the applicant.
#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Stores resume files and hands back a URL the application record can reference.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn upload(&self, job_id: i32, file: &ResumeFile) -> Result<String, AppError>;
}

pub struct S3ResumeStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    region: String,
    public_url: String,
}

impl S3ResumeStore {
    pub fn new(client: aws_sdk_s3::Client, config: &Config) -> Self {
        Self {
            client,
            bucket: config.s3_bucket.clone(),
            region: config.s3_region.clone(),
            public_url: config.s3_public_url.clone(),
        }
    }

    /// Creates the bucket if it is missing. An existing bucket is fine.
    pub async fn ensure_bucket(&self) -> anyhow::Result<()> {
        let mut request = self.client.create_bucket().bucket(&self.bucket);
        // us-east-1 is the one region that rejects an explicit location constraint.
        if self.region != "us-east-1" {
            let constraint = BucketLocationConstraint::from(self.region.as_str());
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(constraint)
                    .build(),
            );
        }
        match request.send().await {
            Ok(_) => {
                info!("Created bucket {}", self.bucket);
                Ok(())
            }
            Err(err) => {
                let exists = err
                    .as_service_error()
                    .map(|se| se.is_bucket_already_exists() || se.is_bucket_already_owned_by_you())
                    .unwrap_or(false);
                if exists {
                    Ok(())
                } else {
                    Err(anyhow::anyhow!("Failed to create bucket {}: {err}", self.bucket))
                }
            }
        }
    }
}

#[async_trait]
impl ResumeStore for S3ResumeStore {
    async fn upload(&self, job_id: i32, file: &ResumeFile) -> Result<String, AppError> {
        let key = object_key(job_id, Uuid::new_v4(), &file.file_name);
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(file.bytes.clone()))
            .content_type(&file.content_type)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

        info!("Uploaded resume to s3://{}/{}", self.bucket, key);
        Ok(public_url(&self.public_url, &self.bucket, &key))
    }
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
pub async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "jobboard-static",
    );

    let shared = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(config.s3_region.clone()))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    // MinIO only understands path-style addressing.
    let s3_config = aws_sdk_s3::config::Builder::from(&shared)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}

fn object_key(job_id: i32, id: Uuid, file_name: &str) -> String {
    format!("resumes/job-{job_id}/{id}-{}", sanitize_file_name(file_name))
}

fn public_url(base: &str, bucket: &str, key: &str) -> String {
    format!("{}/{}/{}", base.trim_end_matches('/'), bucket, key)
}

/// Keeps the file name readable in the key while dropping path separators and oddities.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('.');
    if cleaned.is_empty() {
        "resume".to_string()
    } else {
        cleaned.to_string()
    }
}
