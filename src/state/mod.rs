use crate::api::{ApiClient, ApiError, ApiErrorKind};
use crate::models::{AccountInfo, ContentBlock, NavigationMenu};
use crate::nav::MenuPathStack;
use crate::storage::{load_user_from_storage, SIDEBAR_COLLAPSED_KEY};
use leptos::prelude::*;

#[derive(Clone, Copy)]
pub(crate) struct AppState {
    pub api_client: RwSignal<ApiClient>,
    pub current_user: RwSignal<Option<AccountInfo>>,

    /// Named menus loaded from backend.
    pub menus: RwSignal<Vec<NavigationMenu>>,
    pub menus_loading: RwSignal<bool>,
    pub menus_error: RwSignal<Option<String>>,

    /// Menu load guard (ignore responses arriving after a newer request).
    pub menus_request_id: RwSignal<u64>,

    /// Drill-down trail through nested menus, shared by breadcrumb UI and
    /// the menu manager. Mutated only via the MenuPathStack operations;
    /// reset when the manager mounts at the top level.
    pub menu_path: RwSignal<MenuPathStack>,

    /// Home-page content blocks plus the snapshot captured on first load.
    pub home_blocks: RwSignal<Vec<ContentBlock>>,
    pub home_loading: RwSignal<bool>,
    pub home_error: RwSignal<Option<String>>,
    pub home_request_id: RwSignal<u64>,

    /// Global UI state.
    pub sidebar_collapsed: RwSignal<bool>,
}

impl AppState {
    pub fn new() -> Self {
        let stored_client = ApiClient::load_from_storage();
        let stored_user = load_user_from_storage();

        let sidebar_collapsed = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .and_then(|s| s.get_item(SIDEBAR_COLLAPSED_KEY).ok().flatten())
            .map(|v| v == "1" || v == "true")
            .unwrap_or(false);

        Self {
            api_client: RwSignal::new(stored_client),
            current_user: RwSignal::new(stored_user),
            menus: RwSignal::new(vec![]),
            menus_loading: RwSignal::new(false),
            menus_error: RwSignal::new(None),
            menus_request_id: RwSignal::new(0),
            menu_path: RwSignal::new(MenuPathStack::new()),
            home_blocks: RwSignal::new(vec![]),
            home_loading: RwSignal::new(false),
            home_error: RwSignal::new(None),
            home_request_id: RwSignal::new(0),
            sidebar_collapsed: RwSignal::new(sidebar_collapsed),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppContext(pub AppState);

/// Process-wide session teardown. Any 401 lands here: the token and stored
/// user are discarded (along with in-progress edits) and the app navigates
/// to the login screen.
pub(crate) fn force_sign_out(app_state: &AppContext) {
    let mut client = app_state.0.api_client.get_untracked();
    client.logout();
    app_state.0.api_client.set(client);
    app_state.0.current_user.set(None);
    if let Some(win) = web_sys::window() {
        let _ = win.location().set_href("/login");
    }
}

/// Convert a repository error into a user-visible message, routing
/// `Unauthorized` to global sign-out instead of a local alert.
pub(crate) fn surface_api_error(
    app_state: &AppContext,
    error_slot: RwSignal<Option<String>>,
    e: ApiError,
) {
    if e.kind == ApiErrorKind::Unauthorized {
        force_sign_out(app_state);
    } else {
        error_slot.set(Some(e.to_string()));
    }
}
