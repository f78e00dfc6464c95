use serde::Deserialize;

use crate::api::models::MessageStatus;
use crate::api::{ApiClient, ApiError};
use crate::render::{self, MessageCard};
use crate::views::page::{load_page, run_action, NavTarget, PageOutcome, Settled};
use crate::views::region::Region;

/// Which message list a page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageFilter {
    All,
    New,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageList {
    pub title: String,
    pub filter: MessageFilter,
    pub messages: Region<Vec<MessageCard>>,
}

impl Settled for MessageList {
    fn session_expired(&self) -> bool {
        self.messages.is_expired()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageDetail {
    pub message: Region<MessageCard>,
}

impl Settled for MessageDetail {
    fn session_expired(&self) -> bool {
        self.message.is_expired()
    }
}

/// Page a message action sends the user back to, so it re-fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnTo {
    #[default]
    Dashboard,
    All,
    New,
    Detail,
}

impl ReturnTo {
    fn target(self, id: &str) -> NavTarget {
        match self {
            ReturnTo::Dashboard => NavTarget::AdminDashboard,
            ReturnTo::All => NavTarget::Messages,
            ReturnTo::New => NavTarget::NewMessages,
            ReturnTo::Detail => NavTarget::Message(id.to_string()),
        }
    }
}

pub async fn list(api: &ApiClient, filter: MessageFilter) -> PageOutcome<MessageList> {
    load_page(api.session(), |_| async move {
        let (title, result) = match filter {
            MessageFilter::All => ("All Messages", api.contacts().await),
            MessageFilter::New => ("New Messages", api.new_contacts(None).await),
        };
        MessageList {
            title: title.to_string(),
            filter,
            messages: Region::from(result).map(|l| render::message_cards(&l.data)),
        }
    })
    .await
}

pub async fn detail(api: &ApiClient, id: &str) -> PageOutcome<MessageDetail> {
    load_page(api.session(), |_| async move {
        MessageDetail {
            message: Region::from(api.contact(id).await).map(|m| MessageCard::from(&m)),
        }
    })
    .await
}

pub async fn set_status(
    api: &ApiClient,
    id: &str,
    status: MessageStatus,
    back: ReturnTo,
) -> Result<NavTarget, ApiError> {
    run_action(api.session(), || async move {
        if status == MessageStatus::Unknown {
            return Err(ApiError::ValidationFailed(
                "Unknown message status".to_string(),
            ));
        }
        api.update_contact_status(id, status).await?;
        tracing::info!("Message {} marked {}", id, status);
        Ok(back.target(id))
    })
    .await
}

/// Delete a message once the user has confirmed. An unconfirmed request
/// changes nothing and goes back where it came from.
pub async fn delete(
    api: &ApiClient,
    id: &str,
    confirmed: bool,
    back: ReturnTo,
) -> Result<NavTarget, ApiError> {
    run_action(api.session(), || async move {
        if !confirmed {
            return Ok(back.target(id));
        }

        api.delete_contact(id).await?;
        tracing::info!("Message {} deleted", id);

        // The detail page of a deleted message no longer exists
        Ok(match back {
            ReturnTo::Detail => NavTarget::Messages,
            other => other.target(id),
        })
    })
    .await
}
