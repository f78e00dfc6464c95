use crate::session::SessionStore;
use crate::views::page::NavTarget;

/// Public landing page state.
#[derive(Debug, Clone, PartialEq)]
pub struct HomeView {
    pub signed_in: bool,
    pub user_name: Option<String>,
    pub is_admin: bool,
}

pub fn home(store: &SessionStore) -> HomeView {
    let session = store.get();
    HomeView {
        signed_in: session.is_authenticated(),
        is_admin: session.is_authenticated() && session.is_admin(),
        user_name: session.user_name.filter(|_| session.token.is_some()),
    }
}

/// Follow a link that requires a login: go to `target` when signed in,
/// otherwise to the login page.
pub fn guarded(store: &SessionStore, target: NavTarget) -> NavTarget {
    if store.get().is_authenticated() {
        target
    } else {
        NavTarget::Login
    }
}
