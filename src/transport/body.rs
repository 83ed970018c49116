//! Response bodies read under a size limit.

use super::HttpError;

/// Collects a response body, failing as soon as it grows past the limit.
#[derive(Debug)]
pub(crate) struct LimitedBody {
    bytes: Vec<u8>,
    limit: Option<usize>,
}

impl LimitedBody {
    /// Starts a body, rejecting an announced length over the limit
    /// before anything is read.
    pub(crate) fn start(limit: Option<usize>, announced: Option<u64>) -> Result<Self, HttpError> {
        let mut capacity = 0;
        if let (Some(limit), Some(announced)) = (limit, announced) {
            if announced > as_u64(limit) {
                return Err(HttpError::BodyTooLarge {
                    size: announced,
                    limit,
                });
            }
            capacity = usize::try_from(announced).unwrap_or(0);
        }

        Ok(Self {
            bytes: Vec::with_capacity(capacity),
            limit,
        })
    }

    /// Appends a chunk.
    pub(crate) fn push(&mut self, chunk: &[u8]) -> Result<(), HttpError> {
        let size = self.bytes.len().saturating_add(chunk.len());
        if let Some(limit) = self.limit {
            if size > limit {
                return Err(HttpError::BodyTooLarge {
                    size: as_u64(size),
                    limit,
                });
            }
        }
        self.bytes.extend_from_slice(chunk);
        Ok(())
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        self.bytes
    }
}

fn as_u64(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}
