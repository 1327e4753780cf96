//! Input checks shared by the services. Every check runs before any write.

use chrono::NaiveDate;

use crate::config::CampaignConfig;
use crate::error::ServiceError;

/// Trims `value` and rejects it when nothing is left
pub(crate) fn required_name(field: &str, value: &str) -> Result<String, ServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn non_negative(field: &str, value: i64) -> Result<(), ServiceError> {
    if value < 0 {
        return Err(ServiceError::validation(format!("{field} must be >= 0")));
    }
    Ok(())
}

/// Rejects an end date earlier than the start date; open ranges always pass
pub(crate) fn date_order(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), ServiceError> {
    if let (Some(start), Some(end)) = (start, end)
        && end < start
    {
        return Err(ServiceError::validation(format!(
            "end_date {end} cannot be before start_date {start}"
        )));
    }
    Ok(())
}

/// Which campaign status labels are accepted.
///
/// `Open` takes any non-blank label; `Closed` only the listed ones.
/// Labels are compared after trimming and lowercasing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusPolicy {
    #[default]
    Open,
    Closed(Vec<String>),
}

impl StatusPolicy {
    /// Builds the policy from `campaign.allowed_statuses`
    pub fn from_config(config: &CampaignConfig) -> Self {
        match &config.allowed_statuses {
            Some(allowed) if !allowed.is_empty() => Self::Closed(
                allowed
                    .iter()
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect(),
            ),
            _ => Self::Open,
        }
    }

    /// Returns the normalized label or a validation error
    pub fn normalize(&self, raw: &str) -> Result<String, ServiceError> {
        let status = raw.trim().to_lowercase();
        if status.is_empty() {
            return Err(ServiceError::validation("status is required"));
        }

        match self {
            Self::Open => Ok(status),
            Self::Closed(allowed) if allowed.contains(&status) => Ok(status),
            Self::Closed(allowed) => Err(ServiceError::validation(format!(
                "status '{status}' is not one of: {}",
                allowed.join(", ")
            ))),
        }
    }
}
