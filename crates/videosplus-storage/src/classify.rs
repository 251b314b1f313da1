//! Maps `object_store` failures onto [`StorageErrorKind`].
//!
//! S3-compatible providers report the failure reason as an error code in the
//! response body (`NoSuchBucket`, `SignatureDoesNotMatch`, ...). Those codes are
//! matched here and nowhere else.

use object_store::Error as ObjectStoreError;
use std::error::Error as StdError;

use crate::traits::StorageErrorKind;

const BUCKET_MISSING_CODES: &[&str] = &["NoSuchBucket"];
const SIGNATURE_CODES: &[&str] = &["SignatureDoesNotMatch"];
const AUTH_CODES: &[&str] = &[
    "InvalidAccessKeyId",
    "AccessDenied",
    "InvalidToken",
    "ExpiredToken",
    "403 Forbidden",
    "401 Unauthorized",
];
const NOT_FOUND_CODES: &[&str] = &["NoSuchKey"];

/// Full error text including every source in the chain.
pub(crate) fn error_chain_text(err: &(dyn StdError + 'static)) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        text.push_str(": ");
        text.push_str(&inner.to_string());
        source = inner.source();
    }
    text
}

fn mentions(text: &str, codes: &[&str]) -> bool {
    codes.iter().any(|code| text.contains(code))
}

pub(crate) fn classify(err: &ObjectStoreError) -> StorageErrorKind {
    let text = error_chain_text(err);

    // Provider codes take precedence: a missing bucket also surfaces as a 404.
    if mentions(&text, BUCKET_MISSING_CODES) {
        return StorageErrorKind::BucketMissing;
    }
    if mentions(&text, SIGNATURE_CODES) {
        return StorageErrorKind::SignatureMismatch;
    }

    match err {
        ObjectStoreError::NotFound { .. } => StorageErrorKind::NotFound,
        ObjectStoreError::PermissionDenied { .. } | ObjectStoreError::Unauthenticated { .. } => {
            StorageErrorKind::AuthError
        }
        _ if mentions(&text, AUTH_CODES) => StorageErrorKind::AuthError,
        _ if mentions(&text, NOT_FOUND_CODES) => StorageErrorKind::NotFound,
        _ => StorageErrorKind::TransportError,
    }
}
