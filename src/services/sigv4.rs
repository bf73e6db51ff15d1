//! AWS Signature Version 4 for single-shot S3 requests.
//!
//! Only what the uploader sends is covered: query-less URLs with a fixed set
//! of signed headers (`content-type`, `host`, `x-amz-content-sha256`,
//! `x-amz-date`).

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::Url;
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const SERVICE: &str = "s3";
const SIGNED_HEADERS: &str = "content-type;host;x-amz-content-sha256;x-amz-date";

pub struct Credentials<'a> {
    pub access_key_id: &'a str,
    pub secret_access_key: &'a str,
    pub region: &'a str,
}

/// Header values to attach to the outgoing request.
#[derive(Debug, Clone)]
pub struct SignedHeaders {
    pub authorization: String,
    pub amz_date: String,
    pub content_sha256: String,
}

pub fn sign(
    creds: &Credentials<'_>,
    method: &str,
    url: &Url,
    content_type: &str,
    payload: &[u8],
    now: DateTime<Utc>,
) -> Result<SignedHeaders> {
    let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
    let date = now.format("%Y%m%d").to_string();
    let content_sha256 = hex_sha256(payload);

    let request = canonical_request(method, url, content_type, &content_sha256, &amz_date)?;
    let scope = format!("{}/{}/{}/aws4_request", date, creds.region, SERVICE);
    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        amz_date,
        scope,
        hex_sha256(request.as_bytes())
    );

    let key = signing_key(creds.secret_access_key, &date, creds.region, SERVICE)?;
    let signature = hex::encode(hmac_sha256(&key, string_to_sign.as_bytes())?);

    Ok(SignedHeaders {
        authorization: format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            ALGORITHM, creds.access_key_id, scope, SIGNED_HEADERS, signature
        ),
        amz_date,
        content_sha256,
    })
}

fn canonical_request(
    method: &str,
    url: &Url,
    content_type: &str,
    content_sha256: &str,
    amz_date: &str,
) -> Result<String> {
    // S3 signs the path exactly as sent; Url has already percent-encoded it.
    Ok(format!(
        "{}\n{}\n\ncontent-type:{}\nhost:{}\nx-amz-content-sha256:{}\nx-amz-date:{}\n\n{}\n{}",
        method,
        url.path(),
        content_type,
        host_header(url)?,
        content_sha256,
        amz_date,
        SIGNED_HEADERS,
        content_sha256
    ))
}

/// The `Host` value reqwest sends: the port is only present when non-default.
pub fn host_header(url: &Url) -> Result<String> {
    let host = url
        .host_str()
        .ok_or_else(|| anyhow!("URL has no host: {}", url))?;
    Ok(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

fn signing_key(secret: &str, date: &str, region: &str, service: &str) -> Result<Vec<u8>> {
    let k_date = hmac_sha256(format!("AWS4{}", secret).as_bytes(), date.as_bytes())?;
    let k_region = hmac_sha256(&k_date, region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, service.as_bytes())?;
    hmac_sha256(&k_service, b"aws4_request")
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|e| anyhow!("invalid HMAC key: {}", e))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

pub fn hex_sha256(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_signing_key_reference_vector() {
        let key = signing_key(
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            "20150830",
            "us-east-1",
            "iam",
        )
        .unwrap();

        assert_eq!(
            hex::encode(key),
            "c4afb1cc5771d871763a393e44b703571b55cc28424d1a5e86da6ed3c154a4b9"
        );
    }

    #[test]
    fn test_canonical_request_layout() {
        let url = Url::parse("http://localhost:9000/food-images/dish.jpg").unwrap();
        let hash = hex_sha256(b"fake jpeg bytes");
        let request = canonical_request("PUT", &url, "image/jpeg", &hash, "20240115T093000Z").unwrap();

        let expected = format!(
            "PUT\n/food-images/dish.jpg\n\ncontent-type:image/jpeg\nhost:localhost:9000\n\
             x-amz-content-sha256:{h}\nx-amz-date:20240115T093000Z\n\n\
             content-type;host;x-amz-content-sha256;x-amz-date\n{h}",
            h = hash
        );
        assert_eq!(request, expected);
    }

    #[test]
    fn test_put_signature() {
        let creds = Credentials {
            access_key_id: "AKIDEXAMPLE",
            secret_access_key: "secret-key",
            region: "eu-central-1",
        };
        let url = Url::parse("http://localhost:9000/food-images/dish.jpg").unwrap();
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap();

        let signed = sign(&creds, "PUT", &url, "image/jpeg", b"fake jpeg bytes", now).unwrap();

        assert_eq!(signed.amz_date, "20240115T093000Z");
        assert_eq!(
            signed.content_sha256,
            "3bbde2a70beb5c088de0373e9dc3fb9915b90779f9bec8966e1f643510214217"
        );
        assert_eq!(
            signed.authorization,
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20240115/eu-central-1/s3/aws4_request, \
             SignedHeaders=content-type;host;x-amz-content-sha256;x-amz-date, \
             Signature=250cdb206f4a1455147ae49f0fb764f57641e47c8619f7b60690ca2a16b0a89b"
        );
    }

    #[test]
    fn test_host_header_drops_default_port() {
        let https = Url::parse("https://s3.example.com:443/bucket/key").unwrap();
        assert_eq!(host_header(&https).unwrap(), "s3.example.com");

        let custom = Url::parse("https://s3.example.com:8443/bucket/key").unwrap();
        assert_eq!(host_header(&custom).unwrap(), "s3.example.com:8443");
    }
}
