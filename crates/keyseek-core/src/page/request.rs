use crate::{config::EngineConfig, error::ValidationError};

///
/// PageRequest
///
/// A normalized page window: `page` is zero-based, `size` is positive.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
}

impl PageRequest {
    /// Normalize caller-supplied numbers: a non-positive size takes the
    /// configured default, a negative page becomes the first page, and a
    /// size beyond the configured maximum is rejected.
    pub fn normalize(page: i64, size: i64, config: &EngineConfig) -> Result<Self, ValidationError> {
        let size = if size <= 0 {
            u64::from(config.default_page_size)
        } else {
            size.unsigned_abs()
        };

        if let Some(max) = config.max_page_size
            && size > u64::from(max)
        {
            return Err(ValidationError::PageSizeTooLarge {
                size: i64::try_from(size).unwrap_or(i64::MAX),
                max,
            });
        }

        Ok(Self {
            page: page.max(0).unsigned_abs(),
            size,
        })
    }

    /// Offset of the last row of the previous page, if this is not page 0.
    #[must_use]
    pub fn boundary_offset(&self) -> Option<u64> {
        self.page
            .checked_mul(self.size)
            .and_then(|first| first.checked_sub(1))
    }
}

///
/// TESTS
///
