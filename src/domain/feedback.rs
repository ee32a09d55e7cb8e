use super::contact::digit_count;
use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: String,
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct RatingInput {
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
}

impl RatingInput {
    pub fn validate(&self) -> Result<()> {
        if !(1..=5).contains(&self.rating) {
            return Err(AppError::ValidationError("Invalid rating data.".to_string()));
        }
        Ok(())
    }
}

/// A message left through the contact form.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub location: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct MessageInput {
    pub name: String,
    pub phone: String,
    pub location: String,
    pub message: String,
}

impl MessageInput {
    pub fn validate(&self) -> Result<()> {
        let problem = if self.name.trim().chars().count() < 2 {
            Some("Name must be at least 2 characters.")
        } else if digit_count(&self.phone) < 10 {
            Some("Please enter a valid phone number.")
        } else if self.location.trim().chars().count() < 2 {
            Some("Location is required.")
        } else if self.message.trim().chars().count() < 10 {
            Some("Message must be at least 10 characters.")
        } else {
            None
        };

        match problem {
            Some(reason) => Err(AppError::ValidationError(reason.to_string())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        let ok = RatingInput {
            rating: 5,
            comment: None,
        };
        assert!(ok.validate().is_ok());
        for rating in [0, 6] {
            let bad = RatingInput {
                rating,
                comment: None,
            };
            assert!(bad.validate().is_err(), "rating {rating} should be rejected");
        }
    }

    #[test]
    fn test_message_requires_ten_characters() {
        let mut input = MessageInput {
            name: "Efua".to_string(),
            phone: "0201234567".to_string(),
            location: "Osu".to_string(),
            message: "Great food, thanks!".to_string(),
        };
        assert!(input.validate().is_ok());

        input.message = "Too short".to_string();
        assert!(matches!(
            input.validate(),
            Err(AppError::ValidationError(reason)) if reason.contains("10 characters")
        ));
    }
}
