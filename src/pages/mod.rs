use crate::api::{CreateMenuRequest, UpdateMenuRequest, UpdateSectionData, UpdateSectionRequest};
use crate::components::hooks::use_random::{random_seed, use_random_id_for};
use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonSize, ButtonVariant, Card, CardContent,
    CardDescription, CardHeader, CardTitle, Input, Label, Spinner,
};
use crate::content::{reconcile_section, SectionForm};
use crate::models::{MenuLocation, MenuRecord, NavigationMenu};
use crate::nav::{
    navigation_tree, tree::default_navigation_tree, DragReorder, MenuArena, MenuNode, NavItem,
    NavItemKind,
};
use crate::nav::reorder::assign_display_order;
use crate::state::{force_sign_out, surface_api_error, AppContext};
use crate::storage::{save_user_to_storage, SIDEBAR_COLLAPSED_KEY};
use crate::util::{is_tmp_menu_id, make_tmp_menu_id, now_ms};
use icons::{Check, ChevronRight};
use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dom::helpers::window_event_listener;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

/// Sibling rows shown for the current drill-down position: children of the
/// deepest visited node, or the roots when the trail is empty.
pub(crate) fn rows_for_path(arena: &MenuArena, path_ids: &[i64]) -> Vec<MenuNode> {
    match path_ids.last() {
        Some(id) => arena.children_of(*id).into_iter().cloned().collect(),
        None => arena
            .roots()
            .iter()
            .filter_map(|id| arena.get(*id))
            .cloned()
            .collect(),
    }
}

/// Filter-based local removal; removing an id that is already gone is a
/// no-op (the server may have been faster, or the row was never loaded).
pub(crate) fn remove_row_by_id(rows: &mut Vec<MenuNode>, id: i64) {
    rows.retain(|r| r.id != id);
}

/// Drop a record (and with it the whole nested subtree) from the raw menu
/// data, wherever it sits in the forest.
pub(crate) fn remove_record_by_id(items: &mut Vec<MenuRecord>, id: i64) {
    items.retain(|r| r.id != id);
    for item in items.iter_mut() {
        remove_record_by_id(&mut item.children, id);
    }
}

/// Swap a freshly fetched record (with its subtree) into the raw menu data.
/// Returns false when no record with that id exists anywhere.
pub(crate) fn replace_record(items: &mut [MenuRecord], rec: &MenuRecord) -> bool {
    for item in items.iter_mut() {
        if item.id == rec.id {
            *item = rec.clone();
            return true;
        }
        if replace_record(&mut item.children, rec) {
            return true;
        }
    }
    false
}

fn find_record(items: &mut [MenuRecord], id: i64) -> Option<&mut MenuRecord> {
    for item in items.iter_mut() {
        if item.id == id {
            return Some(item);
        }
        if let Some(found) = find_record(&mut item.children, id) {
            return Some(found);
        }
    }
    None
}

/// Attach a newly created record under its parent (or at the top level).
/// Returns false when the named parent is not in the forest.
pub(crate) fn append_record(
    items: &mut Vec<MenuRecord>,
    parent_id: Option<i64>,
    rec: MenuRecord,
) -> bool {
    match parent_id {
        None => {
            items.push(rec);
            true
        }
        Some(pid) => match find_record(items, pid) {
            Some(parent) => {
                parent.children.push(rec);
                true
            }
            None => false,
        },
    }
}

/// In-place field edit that leaves the nested subtree untouched (update
/// responses do not echo children).
pub(crate) fn update_record_fields(
    items: &mut [MenuRecord],
    id: i64,
    title: &str,
    url: &str,
) -> bool {
    match find_record(items, id) {
        Some(rec) => {
            rec.title = title.to_string();
            rec.url = url.to_string();
            true
        }
        None => false,
    }
}

fn items_for_location(menus: &[NavigationMenu], location: MenuLocation) -> Vec<MenuRecord> {
    menus
        .iter()
        .find(|m| m.location == location)
        .map(|m| m.items.clone())
        .unwrap_or_default()
}

fn menu_id_for_location(menus: &[NavigationMenu], location: MenuLocation) -> Option<i64> {
    menus.iter().find(|m| m.location == location).map(|m| m.id)
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let email: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let app_state = expect_context::<AppContext>();

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let email_val = email.get();
        let password_val = password.get();
        let mut api_client = app_state.0.api_client.get_untracked();

        if email_val.trim().is_empty() || password_val.is_empty() {
            error.set(Some("Email and password are required".to_string()));
            return;
        }

        loading.set(true);
        error.set(None);

        spawn_local(async move {
            match api_client.login(&email_val, &password_val).await {
                Ok(response) => {
                    api_client.set_token(response.token);
                    api_client.save_to_storage();
                    save_user_to_storage(&response.user);
                    app_state.0.api_client.set(api_client);
                    app_state.0.current_user.set(Some(response.user));
                    let _ = window().location().set_href("/");
                }
                Err(e) => {
                    error.set(Some(e.to_string()));
                }
            }
            loading.set(false);
        });
    };

    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto flex min-h-screen w-full max-w-sm flex-col justify-center px-4 py-10">
                <div class="mb-6 flex items-center justify-center">
                    <a href="/" class="text-sm font-medium text-foreground">"Site Admin"</a>
                </div>

                <Card>
                    <CardHeader>
                        <CardTitle class="text-lg">"Sign in"</CardTitle>
                        <CardDescription class="text-xs">"Use your admin account to continue."</CardDescription>
                    </CardHeader>

                    <CardContent>
                        <form class="flex flex-col gap-3" on:submit=on_submit>
                            <div class="flex flex-col gap-1.5">
                                <Label html_for="email" class="text-xs">"Email"</Label>
                                <Input
                                    id="email"
                                    r#type="email"
                                    placeholder="you@hospital.example"
                                    bind_value=email
                                    required=true
                                />
                            </div>

                            <div class="flex flex-col gap-1.5">
                                <Label html_for="password" class="text-xs">"Password"</Label>
                                <Input
                                    id="password"
                                    r#type="password"
                                    placeholder="••••••••"
                                    bind_value=password
                                    required=true
                                />
                            </div>

                            <Show when=move || error.get().is_some() fallback=|| ().into_view()>
                                {move || {
                                    error.get().map(|e| view! {
                                        <Alert class="border-destructive/30">
                                            <AlertDescription class="text-destructive">{e}</AlertDescription>
                                        </Alert>
                                    })
                                }}
                            </Show>

                            <Button class="w-full" attr:disabled=move || loading.get()>
                                <span class="inline-flex items-center gap-2">
                                    <Show when=move || loading.get() fallback=|| ().into_view()>
                                        <Spinner />
                                    </Show>
                                    {move || if loading.get() { "Signing in..." } else { "Sign in" }}
                                </span>
                            </Button>
                        </form>
                    </CardContent>
                </Card>
            </div>
        </div>
    }
}

#[component]
pub fn RootAuthed(children: ChildrenFn) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let is_authenticated = move || app_state.0.api_client.get().is_authenticated();

    // Store children so the view macro sees an `Fn` (not an `FnOnce`).
    let children = StoredValue::new(children);

    view! {
        <Show when=is_authenticated fallback=move || view! { <LoginPage /> }>
            {move || children.with_value(|c| c())}
        </Show>
    }
}

#[component]
pub fn RootPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let is_authenticated = move || app_state.0.api_client.get().is_authenticated();

    view! {
        <Show when=is_authenticated fallback=move || view! { <LoginPage /> }>
            <DashboardPage />
        </Show>
    }
}

#[component]
fn AdminHeader() -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    let on_sign_out = move |_| {
        force_sign_out(&app_state);
    };

    let sidebar_collapsed = app_state.0.sidebar_collapsed;
    let on_toggle_sidebar = move |_| {
        let next = !sidebar_collapsed.get_untracked();
        sidebar_collapsed.set(next);
        if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            let _ = storage.set_item(SIDEBAR_COLLAPSED_KEY, if next { "1" } else { "0" });
        }
    };

    view! {
        <div class="mb-6 flex items-center justify-between">
            <div class="flex items-center gap-3">
                <Button variant=ButtonVariant::Ghost size=ButtonSize::Sm on:click=on_toggle_sidebar>
                    "☰"
                </Button>
                <nav class=move || {
                    if sidebar_collapsed.get() { "hidden" } else { "flex items-center gap-3 text-sm" }
                }>
                    <a class="text-foreground hover:underline" href="/">"Dashboard"</a>
                    <a class="text-foreground hover:underline" href="/menus">"Navigation"</a>
                    <a class="text-foreground hover:underline" href="/home-content">"Home page"</a>
                </nav>
            </div>

            <Button variant=ButtonVariant::Outline size=ButtonSize::Sm on:click=on_sign_out>
                "Sign out"
            </Button>
        </div>
    }
}

#[component]
fn DashboardPage() -> impl IntoView {
    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto w-full max-w-[1080px] px-4 py-8">
                <AdminHeader />

                <div class="grid gap-4 sm:grid-cols-2">
                    <Card>
                        <CardHeader>
                            <CardTitle>"Navigation menus"</CardTitle>
                            <CardDescription>
                                "Header and sidebar menu trees: add, edit, reorder."
                            </CardDescription>
                        </CardHeader>
                        <CardContent>
                            <Button href="/menus">"Open menu manager"</Button>
                        </CardContent>
                    </Card>

                    <Card>
                        <CardHeader>
                            <CardTitle>"Home page content"</CardTitle>
                            <CardDescription>
                                "Heading, intro text and the virtual-tour video."
                            </CardDescription>
                        </CardHeader>
                        <CardContent>
                            <Button href="/home-content">"Edit home sections"</Button>
                        </CardContent>
                    </Card>
                </div>
            </div>
        </div>
    }
}

#[component]
fn NavTreePreview(items: Signal<Vec<NavItem>>) -> impl IntoView {
    // Recursive render needs a concrete view type.
    fn render_items(items: &[NavItem]) -> Vec<AnyView> {
        items
            .iter()
            .map(|item| {
                let badge = item.icon.to_string();
                let label = item.label.clone();
                let path = item.path.clone();
                let is_group = item.kind == NavItemKind::Group;
                let children = render_items(&item.sub_menu);
                view! {
                    <li class="flex flex-col gap-1">
                        <div class="flex items-center gap-2 text-sm">
                            <span class="rounded bg-accent px-1.5 py-0.5 text-[10px] text-accent-foreground">
                                {badge}
                            </span>
                            <span class="font-medium">{label}</span>
                            <span class="text-xs text-muted-foreground">{path}</span>
                            <Show when=move || is_group fallback=|| ().into_view()>
                                <ChevronRight class="size-3 text-muted-foreground" />
                            </Show>
                        </div>
                        <ul class="ml-5 flex flex-col gap-1">{children}</ul>
                    </li>
                }
                .into_any()
            })
            .collect()
    }

    view! {
        <ul class="flex flex-col gap-1">
            {move || {
                let current = items.get();
                // An empty transform result falls back to the static default tree.
                if current.is_empty() {
                    render_items(&default_navigation_tree()).into_any()
                } else {
                    render_items(&current).into_any()
                }
            }}
        </ul>
    }
}

#[component]
pub fn MenuManagerPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    let location: RwSignal<MenuLocation> = RwSignal::new(MenuLocation::Header);

    // Draft state for drag-reorder. Rows mirror the children of the current
    // drill-down position; a dirty draft survives until Save or Discard.
    let rows: RwSignal<Vec<MenuNode>> = RwSignal::new(vec![]);
    let reorder_dirty: RwSignal<bool> = RwSignal::new(false);
    let drag: RwSignal<DragReorder> = RwSignal::new(DragReorder::new());

    // Row editing state.
    let editing_id: RwSignal<Option<i64>> = RwSignal::new(None);
    let edit_title: RwSignal<String> = RwSignal::new(String::new());
    let edit_url: RwSignal<String> = RwSignal::new(String::new());

    // Add-node form.
    let new_title: RwSignal<String> = RwSignal::new(String::new());
    let new_url: RwSignal<String> = RwSignal::new(String::new());
    let new_title_id = use_random_id_for("menu_title");
    let new_url_id = use_random_id_for("menu_url");
    let form_error: RwSignal<Option<String>> = RwSignal::new(None);

    let saving: RwSignal<bool> = RwSignal::new(false);

    // Escape cancels an in-flight edit or drag.
    let esc_handle = window_event_listener(ev::keydown, move |ev: web_sys::KeyboardEvent| {
        if ev.key() == "Escape" {
            editing_id.set(None);
            let mut ctrl = drag.get_untracked();
            ctrl.drag_end();
            drag.set(ctrl);
        }
    });
    on_cleanup(move || esc_handle.remove());

    let load_menus = move || {
        let req_id = app_state
            .0
            .menus_request_id
            .get_untracked()
            .saturating_add(1);
        app_state.0.menus_request_id.set(req_id);

        app_state.0.menus_loading.set(true);
        app_state.0.menus_error.set(None);

        let loc = location.get_untracked();
        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let result = match loc {
                MenuLocation::Header => api_client.list_menus().await,
                MenuLocation::Sidebar => api_client.list_sidebar_menus().await,
            };

            // Ignore stale responses (user may have switched location or
            // navigated away; the request itself is not cancelled).
            if app_state.0.menus_request_id.get_untracked() != req_id {
                return;
            }

            match result {
                Ok(menus) => {
                    app_state.0.menus.set(menus);
                }
                Err(e) => {
                    surface_api_error(&app_state, app_state.0.menus_error, e);
                }
            }
            app_state.0.menus_loading.set(false);
        });
    };

    // Initial load + reload when the location toggles.
    Effect::new(move |_| {
        let _ = location.get();
        app_state.0.menu_path.update(|p| p.reset());
        reorder_dirty.set(false);
        load_menus();
    });

    let arena = Memo::new(move |_| {
        let menus = app_state.0.menus.get();
        MenuArena::from_records(&items_for_location(&menus, location.get()))
    });

    // Sync rows from server state unless a reorder draft is pending.
    Effect::new(move |_| {
        let arena_now = arena.get();
        let path = app_state.0.menu_path.get();
        if reorder_dirty.get_untracked() {
            return;
        }
        rows.set(rows_for_path(&arena_now, path.ids()));
    });

    let preview = Signal::derive(move || {
        navigation_tree(&app_state.0.menus.get(), location.get())
    });

    let on_drill_down = move |id: i64| {
        if reorder_dirty.get_untracked() {
            form_error.set(Some("Save or discard the new order first".to_string()));
            return;
        }
        let Some(node) = arena.get_untracked().get(id).cloned() else {
            return;
        };
        if node.children.is_empty() {
            return;
        }
        app_state
            .0
            .menu_path
            .update(|p| p.push(node.id, &node.title, node.level));

        // Refresh the visited branch; the backend returns the node with its
        // full subtree in one round trip.
        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.get_menu_by_id(id).await {
                Ok(rec) => {
                    // Stale if the user navigated away or started a reorder.
                    let still_here = app_state
                        .0
                        .menu_path
                        .get_untracked()
                        .current()
                        .is_some_and(|c| c.id == id);
                    if !still_here || reorder_dirty.get_untracked() {
                        return;
                    }
                    app_state.0.menus.update(|menus| {
                        for menu in menus.iter_mut() {
                            if replace_record(&mut menu.items, &rec) {
                                break;
                            }
                        }
                    });
                }
                Err(e) => {
                    surface_api_error(&app_state, app_state.0.menus_error, e);
                }
            }
        });
    };

    let on_back = move |_| {
        if reorder_dirty.get_untracked() {
            form_error.set(Some("Save or discard the new order first".to_string()));
            return;
        }
        app_state.0.menu_path.update(|p| {
            p.pop();
        });
    };

    let on_crumb = move |id: i64| {
        if reorder_dirty.get_untracked() {
            return;
        }
        app_state.0.menu_path.update(|p| p.truncate_to(id));
    };

    let on_add = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let title = new_title.get_untracked().trim().to_string();
        let url = new_url.get_untracked().trim().to_string();

        // Validation failures never reach the network.
        if title.is_empty() {
            form_error.set(Some("Title is required".to_string()));
            return;
        }

        let menus = app_state.0.menus.get_untracked();
        let Some(menu_id) = menu_id_for_location(&menus, location.get_untracked()) else {
            form_error.set(Some("Menu is not loaded yet".to_string()));
            return;
        };
        let parent_id = app_state.0.menu_path.get_untracked().current().map(|c| c.id);

        // Optimistic row with a temporary client id; swapped for the
        // server-assigned id when the create resolves.
        let tmp_id = make_tmp_menu_id(now_ms(), random_seed());
        let level = app_state.0.menu_path.get_untracked().depth() as u32;
        rows.update(|xs| {
            xs.push(MenuNode {
                id: tmp_id,
                title: title.clone(),
                url: url.clone(),
                level,
                parent_id,
                display_order: xs.len() as i64,
                is_active: true,
                children: vec![],
            })
        });

        form_error.set(None);
        new_title.set(String::new());
        new_url.set(String::new());

        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let result = api_client
                .create_menu(CreateMenuRequest {
                    menu_id,
                    parent_id,
                    title,
                    url,
                })
                .await;

            match result {
                Ok(rec) => {
                    rows.update(|xs| {
                        if let Some(row) = xs.iter_mut().find(|r| r.id == tmp_id) {
                            row.id = rec.id;
                            row.display_order = rec.display_order;
                        }
                    });
                    app_state.0.menus.update(|menus| {
                        if let Some(menu) = menus.iter_mut().find(|m| m.id == menu_id) {
                            append_record(&mut menu.items, parent_id, rec);
                        }
                    });
                }
                Err(e) => {
                    // Failed write: roll the optimistic row back.
                    rows.update(|xs| remove_row_by_id(xs, tmp_id));
                    surface_api_error(&app_state, form_error, e);
                }
            }
        });
    };

    let on_edit_start = move |id: i64| {
        let Some(node) = rows.get_untracked().into_iter().find(|r| r.id == id) else {
            return;
        };
        editing_id.set(Some(id));
        edit_title.set(node.title);
        edit_url.set(node.url);
    };

    let on_edit_save = move |id: i64| {
        let title = edit_title.get_untracked().trim().to_string();
        let url = edit_url.get_untracked().trim().to_string();
        if title.is_empty() {
            form_error.set(Some("Title is required".to_string()));
            return;
        }
        if is_tmp_menu_id(id) {
            // Still being created; let the create resolve first.
            return;
        }

        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let result = api_client
                .update_menu(
                    id,
                    UpdateMenuRequest {
                        title: Some(title.clone()),
                        url: Some(url.clone()),
                        ..Default::default()
                    },
                )
                .await;

            match result {
                Ok(_) => {
                    // Reconcile local state only after the server accepted.
                    rows.update(|xs| {
                        if let Some(row) = xs.iter_mut().find(|r| r.id == id) {
                            row.title = title.clone();
                            row.url = url.clone();
                        }
                    });
                    app_state.0.menus.update(|menus| {
                        for menu in menus.iter_mut() {
                            if update_record_fields(&mut menu.items, id, &title, &url) {
                                break;
                            }
                        }
                    });
                    editing_id.set(None);
                }
                Err(e) => {
                    surface_api_error(&app_state, form_error, e);
                }
            }
        });
    };

    let on_delete = move |id: i64| {
        if is_tmp_menu_id(id) {
            rows.update(|xs| remove_row_by_id(xs, id));
            return;
        }

        // The server cascades to children, so spell out what goes with it.
        let subtree_len = arena.get_untracked().subtree_ids(id).len();
        let prompt = if subtree_len > 1 {
            format!("Delete this item and its {} sub-items?", subtree_len - 1)
        } else {
            "Delete this item?".to_string()
        };
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message(&prompt).ok())
            .unwrap_or(false);
        if !confirmed {
            return;
        }

        let loc = location.get_untracked();
        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let result = match loc {
                MenuLocation::Header => api_client.delete_menu(id).await,
                MenuLocation::Sidebar => api_client.delete_admin_menu(id).await,
            };
            match result {
                Ok(_) => {
                    // Remove locally only after the server acknowledged;
                    // the subtree goes with the record.
                    rows.update(|xs| remove_row_by_id(xs, id));
                    app_state.0.menus.update(|menus| {
                        for menu in menus.iter_mut() {
                            remove_record_by_id(&mut menu.items, id);
                        }
                    });
                }
                Err(e) => {
                    surface_api_error(&app_state, form_error, e);
                }
            }
        });
    };

    // Commit the draft order: index-based display_order, one update per
    // moved row. Not transactional; a mid-loop failure leaves earlier
    // updates committed and surfaces a single error.
    let on_save_order = move |_| {
        let mut draft = rows.get_untracked();
        assign_display_order(&mut draft);

        saving.set(true);
        form_error.set(None);

        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let mut failed = false;
            for row in &draft {
                if is_tmp_menu_id(row.id) {
                    continue;
                }
                let result = api_client
                    .update_menu(
                        row.id,
                        UpdateMenuRequest {
                            display_order: Some(row.display_order),
                            ..Default::default()
                        },
                    )
                    .await;
                if let Err(e) = result {
                    failed = true;
                    surface_api_error(&app_state, form_error, e);
                    break;
                }
            }

            saving.set(false);
            if !failed {
                reorder_dirty.set(false);
                load_menus();
            }
        });
    };

    let on_discard_order = move |_| {
        reorder_dirty.set(false);
        let arena_now = arena.get_untracked();
        let path = app_state.0.menu_path.get_untracked();
        rows.set(rows_for_path(&arena_now, path.ids()));
    };

    let loading = app_state.0.menus_loading;
    let menus_error = app_state.0.menus_error;
    let menu_path = app_state.0.menu_path;

    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto w-full max-w-[1080px] px-4 py-8">
                <AdminHeader />

                <div class="mb-4 flex items-center justify-between">
                    <div class="space-y-1">
                        <h1 class="text-xl font-semibold">"Navigation"</h1>
                        <p class="text-xs text-muted-foreground">
                            "Drag rows to reorder; order is saved only when you press Save."
                        </p>
                    </div>

                    <div class="flex items-center gap-2">
                        <Button
                            variant=ButtonVariant::Outline
                            size=ButtonSize::Sm
                            on:click=move |_| location.set(MenuLocation::Header)
                            attr:disabled=move || location.get() == MenuLocation::Header
                        >
                            "Header"
                        </Button>
                        <Button
                            variant=ButtonVariant::Outline
                            size=ButtonSize::Sm
                            on:click=move |_| location.set(MenuLocation::Sidebar)
                            attr:disabled=move || location.get() == MenuLocation::Sidebar
                        >
                            "Sidebar"
                        </Button>
                        <Button
                            size=ButtonSize::Sm
                            attr:disabled=move || loading.get()
                            on:click=move |_| load_menus()
                        >
                            <span class="inline-flex items-center gap-2">
                                <Show when=move || loading.get() fallback=|| ().into_view()>
                                    <Spinner />
                                </Show>
                                {move || if loading.get() { "Refreshing" } else { "Refresh" }}
                            </span>
                        </Button>
                    </div>
                </div>

                <Show when=move || menus_error.get().is_some() fallback=|| ().into_view()>
                    {move || {
                        menus_error.get().map(|e| view! {
                            <Alert class="mb-4 border-destructive/30">
                                <AlertDescription class="text-destructive">{e}</AlertDescription>
                            </Alert>
                        })
                    }}
                </Show>

                // Breadcrumb trail: the exact push sequence, in call order.
                <div class="mb-3 flex items-center gap-1 text-sm">
                    <button
                        class="text-primary hover:underline"
                        on:click=move |_| {
                            if !reorder_dirty.get_untracked() {
                                menu_path.update(|p| p.reset());
                            }
                        }
                    >
                        {move || location.get().to_string()}
                    </button>
                    {move || {
                        menu_path
                            .get()
                            .trail()
                            .iter()
                            .map(|crumb| {
                                let id = crumb.id;
                                let title = crumb.title.clone();
                                view! {
                                    <span class="flex items-center gap-1">
                                        <ChevronRight class="size-3 text-muted-foreground" />
                                        <button
                                            class="text-primary hover:underline"
                                            on:click=move |_| on_crumb(id)
                                        >
                                            {title}
                                        </button>
                                    </span>
                                }
                            })
                            .collect_view()
                    }}
                    <Show when=move || !menu_path.get().is_empty() fallback=|| ().into_view()>
                        <Button variant=ButtonVariant::Ghost size=ButtonSize::Sm on:click=on_back>
                            "Back"
                        </Button>
                    </Show>
                </div>

                <div class="grid gap-4 lg:grid-cols-[2fr_1fr]">
                    <Card>
                        <CardHeader>
                            <CardTitle>
                                {move || match menu_path.get().current() {
                                    Some(crumb) => format!("Items under \"{}\"", crumb.title),
                                    None => "Top-level items".to_string(),
                                }}
                            </CardTitle>
                            <CardDescription>
                                {move || format!("{} items", rows.get().len())}
                            </CardDescription>
                        </CardHeader>

                        <CardContent>
                            <ul class=move || {
                                if drag.get().is_dragging() {
                                    "flex flex-col gap-1 opacity-80"
                                } else {
                                    "flex flex-col gap-1"
                                }
                            }>
                                {move || {
                                    rows.get()
                                        .into_iter()
                                        .map(|row| {
                                            let id = row.id;
                                            let has_children = !row.children.is_empty();
                                            let child_count = row.children.len();
                                            let is_editing = move || editing_id.get() == Some(id);
                                            let title = row.title.clone();
                                            let url = row.url.clone();

                                            view! {
                                                <li
                                                    class="flex items-center gap-2 rounded-md border px-3 py-2"
                                                    draggable="true"
                                                    on:dragstart=move |ev: web_sys::DragEvent| {
                                                        if let Some(dt) = ev.data_transfer() {
                                                            let _ = dt.set_data("text/plain", &id.to_string());
                                                            dt.set_drop_effect("move");
                                                        }
                                                        let mut ctrl = drag.get_untracked();
                                                        ctrl.drag_start(id);
                                                        drag.set(ctrl);
                                                    }
                                                    on:dragover=move |ev: web_sys::DragEvent| {
                                                        // Hover only; no mutation.
                                                        ev.prevent_default();
                                                        if let Some(dt) = ev.data_transfer() {
                                                            dt.set_drop_effect("move");
                                                        }
                                                        drag.get_untracked().drag_over(id);
                                                    }
                                                    on:drop=move |ev: web_sys::DragEvent| {
                                                        ev.prevent_default();
                                                        let mut ctrl = drag.get_untracked();
                                                        let mut moved = false;
                                                        rows.update(|xs| {
                                                            moved = ctrl.drop_on(id, xs);
                                                        });
                                                        drag.set(ctrl);
                                                        if moved {
                                                            reorder_dirty.set(true);
                                                        }
                                                    }
                                                    on:dragend=move |_ev: web_sys::DragEvent| {
                                                        let mut ctrl = drag.get_untracked();
                                                        ctrl.drag_end();
                                                        drag.set(ctrl);
                                                    }
                                                >
                                                    <span class="cursor-grab text-muted-foreground">"⋮⋮"</span>

                                                    <Show
                                                        when=is_editing
                                                        fallback=move || {
                                                            let title = title.clone();
                                                            let url = url.clone();
                                                            view! {
                                                                <div class="flex min-w-0 flex-1 items-center gap-2">
                                                                    <button
                                                                        class="truncate text-sm font-medium hover:underline"
                                                                        on:click=move |_| on_drill_down(id)
                                                                    >
                                                                        {title.clone()}
                                                                    </button>
                                                                    <span class="truncate text-xs text-muted-foreground">{url.clone()}</span>
                                                                    <Show when=move || has_children fallback=|| ().into_view()>
                                                                        <span class="rounded bg-accent px-1.5 text-[10px]">
                                                                            {child_count} " sub"
                                                                        </span>
                                                                    </Show>
                                                                </div>
                                                            }
                                                        }
                                                    >
                                                        <div class="flex min-w-0 flex-1 items-center gap-2">
                                                            <Input id="edit_title" bind_value=edit_title class="h-8" />
                                                            <Input id="edit_url" bind_value=edit_url class="h-8" />
                                                        </div>
                                                    </Show>

                                                    <div class="flex items-center gap-1">
                                                        <Show
                                                            when=is_editing
                                                            fallback=move || view! {
                                                                <Button
                                                                    variant=ButtonVariant::Ghost
                                                                    size=ButtonSize::Sm
                                                                    on:click=move |_| on_edit_start(id)
                                                                >
                                                                    "Edit"
                                                                </Button>
                                                                <Button
                                                                    variant=ButtonVariant::Destructive
                                                                    size=ButtonSize::Sm
                                                                    on:click=move |_| on_delete(id)
                                                                >
                                                                    "Delete"
                                                                </Button>
                                                            }
                                                        >
                                                            <Button
                                                                size=ButtonSize::Sm
                                                                on:click=move |_| on_edit_save(id)
                                                            >
                                                                <Check class="size-3" />
                                                                "Save"
                                                            </Button>
                                                            <Button
                                                                variant=ButtonVariant::Ghost
                                                                size=ButtonSize::Sm
                                                                on:click=move |_| editing_id.set(None)
                                                            >
                                                                "Cancel"
                                                            </Button>
                                                        </Show>
                                                    </div>
                                                </li>
                                            }
                                        })
                                        .collect_view()
                                }}
                            </ul>

                            <Show when=move || reorder_dirty.get() fallback=|| ().into_view()>
                                <div class="mt-3 flex items-center gap-2">
                                    <Button size=ButtonSize::Sm attr:disabled=move || saving.get() on:click=on_save_order>
                                        <span class="inline-flex items-center gap-2">
                                            <Show when=move || saving.get() fallback=|| ().into_view()>
                                                <Spinner />
                                            </Show>
                                            "Save order"
                                        </span>
                                    </Button>
                                    <Button variant=ButtonVariant::Ghost size=ButtonSize::Sm on:click=on_discard_order>
                                        "Discard"
                                    </Button>
                                </div>
                            </Show>

                            <form class="mt-4 flex items-end gap-2" on:submit=on_add>
                                <div class="flex flex-1 flex-col gap-1.5">
                                    <Label html_for=new_title_id.clone() class="text-xs">"Title"</Label>
                                    <Input id=new_title_id.clone() bind_value=new_title placeholder="New item title" />
                                </div>
                                <div class="flex flex-1 flex-col gap-1.5">
                                    <Label html_for=new_url_id.clone() class="text-xs">"URL"</Label>
                                    <Input id=new_url_id.clone() bind_value=new_url placeholder="/path" />
                                </div>
                                <Button size=ButtonSize::Sm>"Add"</Button>
                            </form>

                            <Show when=move || form_error.get().is_some() fallback=|| ().into_view()>
                                {move || {
                                    form_error.get().map(|e| view! {
                                        <Alert class="mt-3 border-destructive/30">
                                            <AlertDescription class="text-destructive">{e}</AlertDescription>
                                        </Alert>
                                    })
                                }}
                            </Show>
                        </CardContent>
                    </Card>

                    <Card>
                        <CardHeader>
                            <CardTitle>"Preview"</CardTitle>
                            <CardDescription>"How the public site renders this menu."</CardDescription>
                        </CardHeader>
                        <CardContent>
                            <NavTreePreview items=preview />
                        </CardContent>
                    </Card>
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn HomeContentPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    let heading: RwSignal<String> = RwSignal::new(String::new());
    let body: RwSignal<String> = RwSignal::new(String::new());
    let video_url: RwSignal<String> = RwSignal::new(String::new());

    // Field values captured the first time section data loaded. Submission
    // is refused while this is None.
    let snapshot: RwSignal<Option<SectionForm>> = RwSignal::new(None);

    let saving: RwSignal<bool> = RwSignal::new(false);
    let save_error: RwSignal<Option<String>> = RwSignal::new(None);
    let save_ok: RwSignal<Option<String>> = RwSignal::new(None);
    let uploading: RwSignal<bool> = RwSignal::new(false);

    let load_blocks = move || {
        let req_id = app_state
            .0
            .home_request_id
            .get_untracked()
            .saturating_add(1);
        app_state.0.home_request_id.set(req_id);

        app_state.0.home_loading.set(true);
        app_state.0.home_error.set(None);

        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let result = api_client.get_home_content().await;

            if app_state.0.home_request_id.get_untracked() != req_id {
                return;
            }

            match result {
                Ok(blocks) => {
                    let form = SectionForm::from_blocks(&blocks);
                    heading.set(form.heading.clone());
                    body.set(form.body.clone());
                    video_url.set(form.video_url.clone());
                    snapshot.set(Some(form));
                    app_state.0.home_blocks.set(blocks);
                }
                Err(e) => {
                    surface_api_error(&app_state, app_state.0.home_error, e);
                }
            }
            app_state.0.home_loading.set(false);
        });
    };

    Effect::new(move |_| {
        load_blocks();
    });

    let on_save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        save_error.set(None);
        save_ok.set(None);

        let current = SectionForm {
            heading: heading.get_untracked(),
            body: body.get_untracked(),
            video_url: video_url.get_untracked(),
        };
        let snap = snapshot.get_untracked();
        let blocks = app_state.0.home_blocks.get_untracked();

        let writes = match reconcile_section(snap.as_ref(), &current, &blocks) {
            Ok(writes) => writes,
            Err(e) => {
                save_error.set(Some(e.to_string()));
                return;
            }
        };

        if writes.is_empty() {
            save_ok.set(Some("Nothing changed.".to_string()));
            return;
        }

        let section_id = blocks.first().and_then(|b| b.section_id).unwrap_or(1);
        saving.set(true);

        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let result = api_client
                .update_home_section(
                    section_id,
                    UpdateSectionRequest {
                        update_data: UpdateSectionData {
                            id: section_id,
                            name: "home".to_string(),
                            title: "Home page".to_string(),
                            content_blocks: writes,
                        },
                    },
                )
                .await;

            match result {
                Ok(ack) => {
                    // Advance the snapshot so the next diff starts clean.
                    snapshot.set(Some(current));
                    save_ok.set(Some(if ack.message.is_empty() {
                        "Saved.".to_string()
                    } else {
                        ack.message
                    }));
                }
                Err(e) => {
                    surface_api_error(&app_state, save_error, e);
                }
            }
            saving.set(false);
        });
    };

    // Upload the selected file and point the video field at the stored copy.
    let on_video_file = move |ev: web_sys::Event| {
        let file = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
            .and_then(|input| input.files())
            .and_then(|files| files.get(0));
        let Some(file) = file else {
            return;
        };

        let filename = file.name();
        let mime = {
            let t = file.type_();
            if t.is_empty() {
                "application/octet-stream".to_string()
            } else {
                t
            }
        };

        uploading.set(true);
        save_error.set(None);

        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match JsFuture::from(file.array_buffer()).await {
                Ok(buf) => {
                    let bytes = js_sys::Uint8Array::new(&buf).to_vec();
                    match api_client.upload_site_media(&filename, bytes, &mime).await {
                        Ok(saved) => {
                            video_url.set(saved.public_url());
                        }
                        Err(e) => {
                            surface_api_error(&app_state, save_error, e);
                        }
                    }
                }
                Err(_) => {
                    save_error.set(Some("Could not read the selected file".to_string()));
                }
            }
            uploading.set(false);
        });
    };

    let loading = app_state.0.home_loading;
    let load_error = app_state.0.home_error;

    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto w-full max-w-[720px] px-4 py-8">
                <AdminHeader />

                <Card>
                    <CardHeader>
                        <CardTitle>"Home page content"</CardTitle>
                        <CardDescription>
                            "Only changed fields are sent; unchanged blocks stay untouched."
                        </CardDescription>
                    </CardHeader>

                    <CardContent>
                        <Show when=move || load_error.get().is_some() fallback=|| ().into_view()>
                            {move || {
                                load_error.get().map(|e| view! {
                                    <Alert class="mb-4 border-destructive/30">
                                        <AlertDescription class="text-destructive">{e}</AlertDescription>
                                    </Alert>
                                })
                            }}
                        </Show>

                        <Show when=move || loading.get() fallback=|| ().into_view()>
                            <div class="mb-4 flex items-center gap-2 text-xs text-muted-foreground">
                                <Spinner />
                                "Loading section data..."
                            </div>
                        </Show>

                        <form class="flex flex-col gap-4" on:submit=on_save>
                            <div class="flex flex-col gap-1.5">
                                <Label html_for="heading" class="text-xs">"Heading"</Label>
                                <Input id="heading" bind_value=heading placeholder="Section heading" />
                            </div>

                            <div class="flex flex-col gap-1.5">
                                <Label html_for="body" class="text-xs">"Intro text"</Label>
                                <Input id="body" bind_value=body placeholder="Intro paragraph" />
                            </div>

                            <div class="flex flex-col gap-1.5">
                                <Label html_for="video_url" class="text-xs">"Virtual-tour video URL"</Label>
                                <Input id="video_url" bind_value=video_url placeholder="/media/tour.mp4" />
                            </div>

                            <div class="flex flex-col gap-1.5">
                                <Label html_for="video_file" class="text-xs">"Or upload a video file"</Label>
                                <input
                                    id="video_file"
                                    type="file"
                                    accept="video/*"
                                    class="text-sm"
                                    disabled=move || uploading.get()
                                    on:change=on_video_file
                                />
                                <Show when=move || uploading.get() fallback=|| ().into_view()>
                                    <div class="flex items-center gap-2 text-xs text-muted-foreground">
                                        <Spinner />
                                        "Uploading..."
                                    </div>
                                </Show>
                            </div>

                            <Show when=move || save_error.get().is_some() fallback=|| ().into_view()>
                                {move || {
                                    save_error.get().map(|e| view! {
                                        <Alert class="border-destructive/30">
                                            <AlertDescription class="text-destructive">{e}</AlertDescription>
                                        </Alert>
                                    })
                                }}
                            </Show>

                            <Show when=move || save_ok.get().is_some() fallback=|| ().into_view()>
                                {move || {
                                    save_ok.get().map(|m| view! {
                                        <Alert>
                                            <AlertDescription>{m}</AlertDescription>
                                        </Alert>
                                    })
                                }}
                            </Show>

                            <Button class="w-fit" attr:disabled=move || saving.get() || snapshot.get().is_none()>
                                <span class="inline-flex items-center gap-2">
                                    <Show when=move || saving.get() fallback=|| ().into_view()>
                                        <Spinner />
                                    </Show>
                                    {move || if saving.get() { "Saving..." } else { "Save changes" }}
                                </span>
                            </Button>
                        </form>
                    </CardContent>
                </Card>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, title: &str, children: Vec<MenuRecord>) -> MenuRecord {
        MenuRecord {
            id,
            parent_id: None,
            title: title.to_string(),
            url: String::new(),
            display_order: 0,
            is_active: true,
            children,
        }
    }

    #[test]
    fn test_rows_for_path_roots_and_children() {
        let arena = MenuArena::from_records(&[
            record(1, "Home", vec![]),
            record(2, "Specialties", vec![record(21, "Oncology", vec![])]),
        ]);

        let roots = rows_for_path(&arena, &[]);
        assert_eq!(roots.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2]);

        let kids = rows_for_path(&arena, &[2]);
        assert_eq!(kids.iter().map(|r| r.id).collect::<Vec<_>>(), vec![21]);

        // Unknown drill-down target shows nothing rather than panicking.
        assert!(rows_for_path(&arena, &[99]).is_empty());
    }

    #[test]
    fn test_remove_row_by_id_absent_is_noop() {
        let arena = MenuArena::from_records(&[record(1, "Home", vec![])]);
        let mut rows = rows_for_path(&arena, &[]);
        remove_row_by_id(&mut rows, 42);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_append_record_at_root_and_under_parent() {
        let mut items = vec![record(1, "Home", vec![])];

        assert!(append_record(&mut items, None, record(2, "About", vec![])));
        assert_eq!(items.len(), 2);

        assert!(append_record(&mut items, Some(2), record(21, "Team", vec![])));
        assert_eq!(items[1].children[0].id, 21);

        // Unknown parent leaves the forest untouched.
        assert!(!append_record(&mut items, Some(99), record(3, "X", vec![])));
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_update_record_fields_deep() {
        let mut items = vec![record(
            2,
            "Specialties",
            vec![record(21, "Oncology", vec![])],
        )];
        assert!(update_record_fields(&mut items, 21, "Onco", "/onco"));
        assert_eq!(items[0].children[0].title, "Onco");
        assert_eq!(items[0].children[0].url, "/onco");
        // Subtree untouched and unknown ids report false.
        assert!(!update_record_fields(&mut items, 99, "X", "/x"));
    }

    #[test]
    fn test_replace_and_remove_record() {
        let mut items = vec![record(
            2,
            "Specialties",
            vec![record(21, "Oncology", vec![record(211, "Team", vec![])])],
        )];

        let fresh = record(21, "Oncology", vec![record(212, "Doctors", vec![])]);
        assert!(replace_record(&mut items, &fresh));
        assert_eq!(items[0].children[0].children[0].id, 212);

        remove_record_by_id(&mut items, 21);
        assert!(items[0].children.is_empty());

        // Removing an absent id is a no-op.
        remove_record_by_id(&mut items, 42);
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_items_for_location_missing_menu_is_empty() {
        let menus = vec![NavigationMenu {
            id: 1,
            location: MenuLocation::Header,
            items: vec![record(1, "Home", vec![])],
        }];
        assert!(items_for_location(&menus, MenuLocation::Sidebar).is_empty());
        assert_eq!(items_for_location(&menus, MenuLocation::Header).len(), 1);
        assert_eq!(menu_id_for_location(&menus, MenuLocation::Header), Some(1));
        assert_eq!(menu_id_for_location(&menus, MenuLocation::Sidebar), None);
    }
}
