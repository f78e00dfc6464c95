//! Page controllers. Each one reads the session, issues its API loads and
//! settles into a view or a redirect. Rendering happens in `routes`.

pub mod admin;
pub mod auth;
pub mod home;
pub mod messages;
pub mod page;
pub mod region;
pub mod users;

pub use page::{load_page, NavTarget, PageOutcome, PageState};
pub use region::Region;
