use super::activity::ActivityRecorder;
use crate::domain::customer::Visitor;
use crate::domain::feedback::{Message, MessageInput, Rating, RatingInput};
use crate::domain::new_id;
use crate::domain::ports::{SharedFeedbackStore, SharedVisitorStore};
use crate::error::{AppError, Result};
use chrono::Utc;
use serde_json::json;
use tracing::info;

/// Contact messages, ratings and the visitor list.
#[derive(Clone)]
pub struct EngagementService {
    feedback: SharedFeedbackStore,
    visitors: SharedVisitorStore,
    activity: ActivityRecorder,
}

impl EngagementService {
    pub fn new(feedback: SharedFeedbackStore, visitors: SharedVisitorStore, activity: ActivityRecorder) -> Self {
        Self {
            feedback,
            visitors,
            activity,
        }
    }

    pub async fn submit_message(&self, input: MessageInput) -> Result<Message> {
        input.validate()?;
        let message = Message {
            id: new_id(),
            name: input.name.trim().to_string(),
            phone: input.phone.trim().to_string(),
            location: input.location.trim().to_string(),
            message: input.message.trim().to_string(),
            is_read: false,
            created_at: Utc::now(),
        };
        self.feedback.add_message(message.clone()).await?;
        info!(message_id = %message.id, "Contact message received");
        Ok(message)
    }

    pub async fn messages(&self) -> Result<Vec<Message>> {
        self.feedback.messages().await
    }

    pub async fn set_message_read(&self, id: &str, is_read: bool, actor: Option<&str>) -> Result<Message> {
        let Some(mut message) = self.feedback.message(id).await? else {
            return Err(AppError::NotFound(format!("Message {id}")));
        };
        message.is_read = is_read;
        self.feedback.save_message(message.clone()).await?;
        let state = if is_read { "read" } else { "unread" };
        self.activity
            .admin_action(actor, format!("Marked a message as {state}"), json!({ "messageId": id }))
            .await;
        Ok(message)
    }

    pub async fn delete_message(&self, id: &str, actor: Option<&str>) -> Result<()> {
        if !self.feedback.delete_message(id).await? {
            return Err(AppError::NotFound(format!("Message {id}")));
        }
        self.activity
            .admin_action(actor, "Deleted a message", json!({ "messageId": id }))
            .await;
        Ok(())
    }

    pub async fn submit_rating(&self, input: RatingInput) -> Result<Rating> {
        input.validate()?;
        let rating = Rating {
            id: new_id(),
            rating: input.rating,
            comment: input.comment.filter(|c| !c.trim().is_empty()),
            created_at: Utc::now(),
        };
        self.feedback.add_rating(rating.clone()).await?;
        info!(rating = rating.rating, "Rating received");
        Ok(rating)
    }

    pub async fn ratings(&self) -> Result<Vec<Rating>> {
        self.feedback.ratings().await
    }

    pub async fn delete_rating(&self, id: &str, actor: Option<&str>) -> Result<()> {
        if !self.feedback.delete_rating(id).await? {
            return Err(AppError::NotFound(format!("Rating {id}")));
        }
        self.activity
            .admin_action(actor, "Deleted a rating", json!({ "ratingId": id }))
            .await;
        Ok(())
    }

    pub async fn visitors(&self) -> Result<Vec<Visitor>> {
        self.visitors.all_visitors().await
    }

    pub async fn delete_visitor(&self, id: &str, actor: Option<&str>) -> Result<()> {
        if !self.visitors.delete_visitor(id).await? {
            return Err(AppError::NotFound(format!("Visitor {id}")));
        }
        self.activity
            .admin_action(actor, "Deleted a visitor", json!({ "visitorId": id }))
            .await;
        Ok(())
    }
}
