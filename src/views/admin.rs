use crate::api::ApiClient;
use crate::render::{
    self, ActivityItem, ChartSeries, MessageCard, StatCard, UserRow,
};
use crate::views::page::{load_page, PageOutcome, Settled};
use crate::views::region::Region;

const FEED_LIMIT: u32 = 3;

/// New-message counter on the dashboard, with the badge shown when non-zero.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessageCount {
    pub count: u64,
    pub badge: Option<u64>,
}

/// Recent activity feed. Each section loads on its own; a section that fails
/// simply stays empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityFeed {
    pub messages: Vec<ActivityItem>,
    pub projects: Vec<ActivityItem>,
    pub blogs: Vec<ActivityItem>,
    expired: bool,
}

impl ActivityFeed {
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.projects.is_empty() && self.blogs.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdminDashboard {
    pub admin_name: String,
    pub project_count: Region<u64>,
    pub blog_count: Region<u64>,
    pub new_messages: Region<NewMessageCount>,
    pub stats: Region<Vec<StatCard>>,
    pub users: Region<Vec<UserRow>>,
    pub contacts: Region<Vec<MessageCard>>,
    pub charts: Region<Vec<ChartSeries>>,
    pub activity: ActivityFeed,
}

impl Settled for AdminDashboard {
    fn session_expired(&self) -> bool {
        self.project_count.is_expired()
            || self.blog_count.is_expired()
            || self.new_messages.is_expired()
            || self.stats.is_expired()
            || self.users.is_expired()
            || self.contacts.is_expired()
            || self.charts.is_expired()
            || self.activity.expired
    }
}

/// Load every dashboard region concurrently. Regions settle independently:
/// one failing load leaves the others rendered.
pub async fn dashboard(api: &ApiClient) -> PageOutcome<AdminDashboard> {
    load_page(api.session(), |session| async move {
        let (project_count, blog_count, new_messages, stats, users, contacts, charts, activity) = tokio::join!(
            async { Region::from(api.projects(None).await).map(|l| l.total()) },
            async { Region::from(api.blogs(None).await).map(|l| l.total()) },
            async {
                Region::from(api.new_contacts(None).await).map(|l| {
                    let count = l.total();
                    NewMessageCount {
                        count,
                        badge: (count > 0).then_some(count),
                    }
                })
            },
            async { Region::from(api.dashboard_stats().await).map(|s| render::stat_cards(&s)) },
            users_region(api),
            async { Region::from(api.contacts().await).map(|l| render::message_cards(&l.data)) },
            async { Region::from(api.chart_data().await).map(|c| render::chart_series(&c)) },
            activity_feed(api),
        );

        let admin_name = api
            .session()
            .display_name()
            .or(session.user_name)
            .unwrap_or_else(|| "Admin".to_string());

        AdminDashboard {
            admin_name,
            project_count,
            blog_count,
            new_messages,
            stats,
            users,
            contacts,
            charts,
            activity,
        }
    })
    .await
}

/// Users table, also re-run on its own after each user edit or delete.
pub async fn users_region(api: &ApiClient) -> Region<Vec<UserRow>> {
    Region::from(api.users().await).map(|l| render::user_rows(&l.data))
}

pub async fn activity_feed(api: &ApiClient) -> ActivityFeed {
    let (messages, projects, blogs) = tokio::join!(
        api.new_contacts(Some(FEED_LIMIT)),
        api.projects(Some(FEED_LIMIT)),
        api.blogs(Some(FEED_LIMIT)),
    );

    let mut feed = ActivityFeed::default();
    match messages {
        Ok(l) => feed.messages = l.data.iter().map(render::message_activity).collect(),
        Err(e) => {
            feed.expired |= e.is_unauthorized();
            tracing::debug!("Activity feed messages unavailable: {}", e);
        }
    }
    match projects {
        Ok(l) => feed.projects = l.data.iter().map(render::project_activity).collect(),
        Err(e) => {
            feed.expired |= e.is_unauthorized();
            tracing::debug!("Activity feed projects unavailable: {}", e);
        }
    }
    match blogs {
        Ok(l) => feed.blogs = l.data.iter().map(render::blog_activity).collect(),
        Err(e) => {
            feed.expired |= e.is_unauthorized();
            tracing::debug!("Activity feed blogs unavailable: {}", e);
        }
    }
    feed
}
