//! Bounded request body reading.
//!
//! The body is collected into memory up to the configured limit. Failures
//! are split by who caused them: the client (truncation, disconnect,
//! oversize) or the server (any other I/O fault).

use axum::body::Body;
use bytes::Bytes;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use std::error::Error as StdError;
use std::io::ErrorKind;

use crate::error::ReadFailure;

/// Read the whole body, refusing more than `limit` bytes.
pub async fn read_body(body: Body, limit: usize) -> Result<Bytes, ReadFailure> {
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(err) => Err(classify(&*err, limit)),
    }
}

/// Decide which side a body error belongs to by walking its source chain.
pub fn classify(err: &(dyn StdError + 'static), limit: usize) -> ReadFailure {
    let mut current = Some(err);
    while let Some(cause) = current {
        if cause.is::<LengthLimitError>() {
            return ReadFailure::TooLarge { limit };
        }
        if let Some(hyper_err) = cause.downcast_ref::<hyper::Error>() {
            if hyper_err.is_incomplete_message()
                || hyper_err.is_canceled()
                || hyper_err.is_closed()
                || hyper_err.is_body_write_aborted()
            {
                return ReadFailure::Truncated(err.to_string());
            }
        }
        if let Some(io_err) = cause.downcast_ref::<std::io::Error>() {
            if matches!(
                io_err.kind(),
                ErrorKind::UnexpectedEof
                    | ErrorKind::ConnectionReset
                    | ErrorKind::ConnectionAborted
                    | ErrorKind::BrokenPipe
            ) {
                return ReadFailure::Truncated(io_err.to_string());
            }
        }
        current = cause.source();
    }
    ReadFailure::Io(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_whole_body() {
        let bytes = read_body(Body::from(vec![1u8, 2, 3]), 3).await.unwrap();
        assert_eq!(bytes.as_ref(), &[1, 2, 3]);
    }

    #[tokio::test]
    async fn empty_body_is_fine() {
        let bytes = read_body(Body::empty(), 16).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn oversize_body_is_too_large() {
        let err = read_body(Body::from(vec![0u8; 11]), 10).await.unwrap_err();
        assert!(matches!(err, ReadFailure::TooLarge { limit: 10 }));
    }

    #[test]
    fn client_side_io_is_truncation() {
        let wrapped = axum::Error::new(std::io::Error::new(
            ErrorKind::ConnectionReset,
            "peer reset",
        ));
        assert!(matches!(classify(&wrapped, 1), ReadFailure::Truncated(_)));
    }

    #[test]
    fn other_io_is_server_side() {
        let err = std::io::Error::new(ErrorKind::PermissionDenied, "nope");
        assert!(matches!(classify(&err, 1), ReadFailure::Io(_)));
    }
}
