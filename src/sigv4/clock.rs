use crate::sigv4::error::SigningError;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

const AMZ_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[year][month][day]T[hour][minute][second]Z");
const DATE_STAMP_FORMAT: &[FormatItem<'static>] = format_description!("[year][month][day]");

/// The single instant a signing operation is stamped with.
///
/// Both the `x-amz-date` timestamp and the scope's date stamp are rendered from the same
/// captured value, always in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeContext(OffsetDateTime);

impl TimeContext {
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    pub fn at(instant: OffsetDateTime) -> Self {
        Self(instant.to_offset(UtcOffset::UTC))
    }

    /// `YYYYMMDDTHHMMSSZ`
    pub fn amz_date(&self) -> Result<String, SigningError> {
        Ok(self.0.format(AMZ_DATE_FORMAT)?)
    }

    /// `YYYYMMDD`
    pub fn date_stamp(&self) -> Result<String, SigningError> {
        Ok(self.0.format(DATE_STAMP_FORMAT)?)
    }
}
