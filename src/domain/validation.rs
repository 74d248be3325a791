use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Category, Cents, TransactionType};

pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// The user-editable fields of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    pub amount_cents: Cents,
    pub transaction_type: TransactionType,
    pub category: Category,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Amount must be greater than 0")]
    NonPositiveAmount,

    #[error("Date cannot be in the future ({date} is after {today})")]
    FutureDate { date: NaiveDate, today: NaiveDate },

    #[error("Description must be {max} characters or less (got {len})")]
    DescriptionTooLong { len: usize, max: usize },
}

impl TransactionInput {
    /// Check the input against the rules applied on create and edit.
    /// `today` is passed in so callers control the clock.
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationError> {
        if self.amount_cents <= 0 {
            return Err(ValidationError::NonPositiveAmount);
        }
        if self.date > today {
            return Err(ValidationError::FutureDate {
                date: self.date,
                today,
            });
        }
        let len = self.description.chars().count();
        if len > MAX_DESCRIPTION_LENGTH {
            return Err(ValidationError::DescriptionTooLong {
                len,
                max: MAX_DESCRIPTION_LENGTH,
            });
        }
        Ok(())
    }
}
