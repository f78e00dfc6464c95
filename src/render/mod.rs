//! Display models built from API records.
//!
//! Pages never format records inline: every table row, card and feed item is
//! first turned into one of these plain structs, then handed to an askama
//! template, which escapes every value on output.

use chrono::{DateTime, Utc};

use crate::api::models::{
    Blog, ChartData, ContactMessage, DashboardStats, MessageStatus, Project, UserRecord,
};
use crate::views::page::{path_segment, NavTarget};

const PREVIEW_CHARS: usize = 50;
const MISSING: &str = "N/A";

pub fn display_time(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn display_date(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// First 50 characters, with an ellipsis when anything was cut.
pub fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

pub fn phone_or_missing(phone: Option<&str>) -> String {
    phone
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(MISSING)
        .to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserRow {
    pub id: String,
    pub path: String,
    pub name: String,
    pub email: String,
    pub joined: String,
    pub role: String,
}

impl From<&UserRecord> for UserRow {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id.clone(),
            path: format!("/admin/users/{}", path_segment(&user.id)),
            name: user.name.clone(),
            email: user.email.clone(),
            joined: display_date(user.created_at),
            role: user.role.to_string(),
        }
    }
}

pub fn user_rows(users: &[UserRecord]) -> Vec<UserRow> {
    users.iter().map(UserRow::from).collect()
}

/// A status transition offered next to a message.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusAction {
    pub status: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageCard {
    pub id: String,
    pub path: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub preview: String,
    pub status: String,
    pub received: String,
    pub is_new: bool,
    pub action: StatusAction,
}

impl From<&ContactMessage> for MessageCard {
    fn from(msg: &ContactMessage) -> Self {
        let is_new = msg.status == MessageStatus::New;
        let action = if is_new {
            StatusAction {
                status: MessageStatus::Read.to_string(),
                label: "Mark as Read".to_string(),
            }
        } else {
            StatusAction {
                status: MessageStatus::Replied.to_string(),
                label: "Mark as Replied".to_string(),
            }
        };

        Self {
            id: msg.id.clone(),
            path: NavTarget::Message(msg.id.clone()).path(),
            name: msg.name.clone(),
            email: msg.email.clone(),
            phone: phone_or_missing(msg.phone.as_deref()),
            message: msg.message.clone(),
            preview: preview(&msg.message),
            status: msg.status.to_string(),
            received: display_time(msg.created_at),
            is_new,
            action,
        }
    }
}

pub fn message_cards(messages: &[ContactMessage]) -> Vec<MessageCard> {
    messages.iter().map(MessageCard::from).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityItem {
    pub link: Option<String>,
    pub headline: String,
    pub detail: String,
    pub when: String,
}

pub fn message_activity(msg: &ContactMessage) -> ActivityItem {
    ActivityItem {
        link: Some(NavTarget::Message(msg.id.clone()).path()),
        headline: msg.name.clone(),
        detail: preview(&msg.message),
        when: display_time(msg.created_at),
    }
}

pub fn project_activity(project: &Project) -> ActivityItem {
    ActivityItem {
        link: None,
        headline: format!("New project \"{}\" added", project.title),
        detail: String::new(),
        when: display_time(project.created_at),
    }
}

pub fn blog_activity(blog: &Blog) -> ActivityItem {
    let status = blog.status.as_deref().unwrap_or("draft");
    ActivityItem {
        link: None,
        headline: format!("Blog post \"{}\" {}", blog.title, status),
        detail: String::new(),
        when: display_time(blog.created_at),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatCard {
    pub label: String,
    pub value: u64,
}

pub fn stat_cards(stats: &DashboardStats) -> Vec<StatCard> {
    vec![
        StatCard {
            label: "Users".to_string(),
            value: stats.total_users,
        },
        StatCard {
            label: "Messages".to_string(),
            value: stats.total_contacts,
        },
        StatCard {
            label: "Projects".to_string(),
            value: stats.total_projects,
        },
        StatCard {
            label: "Blogs".to_string(),
            value: stats.total_blogs,
        },
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub title: String,
    pub points: Vec<ChartPoint>,
}

/// Pair chart labels with each series; a series shorter than the labels
/// reads as zero for the missing months.
pub fn chart_series(data: &ChartData) -> Vec<ChartSeries> {
    let series = |title: &str, values: &[f64]| ChartSeries {
        title: title.to_string(),
        points: data
            .labels
            .iter()
            .enumerate()
            .map(|(i, label)| ChartPoint {
                label: label.clone(),
                value: values.get(i).copied().unwrap_or(0.0),
            })
            .collect(),
    };

    vec![
        series("Monthly Visitors", &data.visitors),
        series("New Users per Month", &data.users),
    ]
}
