//! Application state management.

use crate::tasks::Remote;
use milkcrm_core::dashboard::format_inr;
use milkcrm_core::palette::{self, Candidate, Hit, Target};
use milkcrm_core::search::paginate;
use milkcrm_core::{
    AccountSource, Admin, AdminKind, Client, ClientKind, DashboardPanel, DashboardQuery,
    DashboardSource, EntityId, EntityKind, FieldKind, FieldSpec, ListManager, PasswordChange,
    PasswordChangeForm, RemoteSource, RestClient, Shift, Staff, StaffKind, Submission, Write,
};

/// Top-level screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Clients,
    Staff,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Dashboard, Tab::Clients, Tab::Staff, Tab::Settings];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Clients => "Clients",
            Tab::Staff => "Staff",
            Tab::Settings => "Settings",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Dashboard => 0,
            Tab::Clients => 1,
            Tab::Staff => 2,
            Tab::Settings => 3,
        }
    }

    pub fn next(self) -> Self {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }
}

/// Input mode for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode.
    Normal,
    /// Editing the current list's search term.
    Search,
    /// Create/edit form overlay.
    Form,
    /// Waiting for y/n on a delete.
    ConfirmDelete,
    /// Password change overlay.
    PasswordForm,
    /// Quick-find palette.
    Palette,
}

/// Page and row selected on one list screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListCursor {
    pub page: usize,
    /// Row within the page.
    pub row: usize,
}

/// A delete waiting for the user's answer.
#[derive(Debug, Clone)]
pub struct PendingDelete {
    pub id: EntityId,
    pub prompt: String,
}

/// Quick-find state.
#[derive(Debug, Default)]
pub struct Palette {
    pub query: String,
    pub hits: Vec<Hit>,
    pub selected: usize,
}

/// An entity collection shown on one of the list screens.
pub trait Managed: EntityKind + Sized {
    const TAB: Tab;
    const TITLE: &'static str;
    const COLUMNS: &'static [&'static str];

    fn manager(app: &App) -> &ListManager<Self>;
    fn manager_mut(app: &mut App) -> &mut ListManager<Self>;
    fn cursor(app: &App) -> ListCursor;
    fn cursor_mut(app: &mut App) -> &mut ListCursor;

    /// Table cells for one record, in `COLUMNS` order.
    fn row(record: &Self::Record) -> Vec<String>;
}

impl Managed for ClientKind {
    const TAB: Tab = Tab::Clients;
    const TITLE: &'static str = "Clients";
    const COLUMNS: &'static [&'static str] =
        &["Name", "Number", "Location", "Shift", "Price/L", "Qty (L)", "Priority"];

    fn manager(app: &App) -> &ListManager<Self> {
        &app.clients
    }

    fn manager_mut(app: &mut App) -> &mut ListManager<Self> {
        &mut app.clients
    }

    fn cursor(app: &App) -> ListCursor {
        app.client_cursor
    }

    fn cursor_mut(app: &mut App) -> &mut ListCursor {
        &mut app.client_cursor
    }

    fn row(client: &Client) -> Vec<String> {
        vec![
            client.name.clone(),
            client.number.clone(),
            client.location.clone(),
            client.time_shift.to_string(),
            format_inr(client.price_per_litre),
            format!("{}", client.quantity),
            if client.priority_status { "★".into() } else { String::new() },
        ]
    }
}

impl Managed for StaffKind {
    const TAB: Tab = Tab::Staff;
    const TITLE: &'static str = "Staff";
    const COLUMNS: &'static [&'static str] = &["Name", "Email", "Phone", "Location", "Shift"];

    fn manager(app: &App) -> &ListManager<Self> {
        &app.staff
    }

    fn manager_mut(app: &mut App) -> &mut ListManager<Self> {
        &mut app.staff
    }

    fn cursor(app: &App) -> ListCursor {
        app.staff_cursor
    }

    fn cursor_mut(app: &mut App) -> &mut ListCursor {
        &mut app.staff_cursor
    }

    fn row(staff: &Staff) -> Vec<String> {
        let text = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".into());
        vec![
            staff.name.clone(),
            text(&staff.username),
            text(&staff.contact_number),
            text(&staff.location),
            staff.shift.to_string(),
        ]
    }
}

impl Managed for AdminKind {
    const TAB: Tab = Tab::Settings;
    const TITLE: &'static str = "Admins";
    const COLUMNS: &'static [&'static str] = &["Name", "Email"];

    fn manager(app: &App) -> &ListManager<Self> {
        &app.admins
    }

    fn manager_mut(app: &mut App) -> &mut ListManager<Self> {
        &mut app.admins
    }

    fn cursor(app: &App) -> ListCursor {
        app.admin_cursor
    }

    fn cursor_mut(app: &mut App) -> &mut ListCursor {
        &mut app.admin_cursor
    }

    fn row(admin: &Admin) -> Vec<String> {
        vec![admin.name.clone(), admin.email.clone()]
    }
}

/// Main application model.
pub struct App {
    pub tab: Tab,
    pub input_mode: InputMode,
    pub should_quit: bool,
    pub page_size: usize,

    pub clients: ListManager<ClientKind>,
    pub staff: ListManager<StaffKind>,
    pub admins: ListManager<AdminKind>,
    pub client_cursor: ListCursor,
    pub staff_cursor: ListCursor,
    pub admin_cursor: ListCursor,

    /// Focused field of the open entity form.
    pub form_field: usize,
    /// A create/update is in flight.
    pub saving: bool,
    pub pending_delete: Option<PendingDelete>,

    pub dashboard: DashboardPanel,
    pub password: PasswordChange,
    /// Focused field of the password form.
    pub password_field: usize,

    pub palette: Palette,

    remote: Remote,
}

impl App {
    /// Create a new application instance.
    pub fn new(remote: Remote, page_size: usize) -> Self {
        Self {
            tab: Tab::Dashboard,
            input_mode: InputMode::Normal,
            should_quit: false,
            page_size: page_size.max(1),
            clients: ListManager::new(),
            staff: ListManager::new(),
            admins: ListManager::new(),
            client_cursor: ListCursor::default(),
            staff_cursor: ListCursor::default(),
            admin_cursor: ListCursor::default(),
            form_field: 0,
            saving: false,
            pending_delete: None,
            dashboard: DashboardPanel::new(DashboardQuery::today()),
            password: PasswordChange::new(),
            password_field: 0,
            palette: Palette::default(),
            remote,
        }
    }

    /// Issue the initial fetch of every screen.
    pub fn bootstrap(&mut self) {
        self.load::<ClientKind>();
        self.load::<StaffKind>();
        self.load::<AdminKind>();
        self.fetch_dashboard();
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    // --- lists -------------------------------------------------------------

    pub fn load<K: Managed>(&mut self) {
        let ticket = K::manager_mut(self).begin_load();
        self.remote.spawn(
            |client| async move { <RestClient as RemoteSource<K>>::list(&*client).await },
            move |app, result| {
                K::manager_mut(app).finish_load(ticket, result);
                app.clamp_cursor::<K>();
            },
        );
    }

    /// The record under the cursor.
    pub fn selected<K: Managed>(&self) -> Option<&K::Record> {
        let cursor = K::cursor(self);
        let view = K::manager(self).visible();
        let page = paginate(&view, cursor.page, self.page_size);
        page.rows.get(cursor.row).copied()
    }

    pub fn move_selection<K: Managed>(&mut self, delta: isize) {
        let cursor = K::cursor_mut(self);
        cursor.row = cursor.row.saturating_add_signed(delta);
        self.clamp_cursor::<K>();
    }

    pub fn change_page<K: Managed>(&mut self, delta: isize) {
        let cursor = K::cursor_mut(self);
        cursor.page = cursor.page.saturating_add_signed(delta);
        cursor.row = 0;
        self.clamp_cursor::<K>();
    }

    /// Keep the cursor inside the current filtered view.
    fn clamp_cursor<K: Managed>(&mut self) {
        let len = K::manager(self).visible().len();
        let size = self.page_size;
        let pages = len.div_ceil(size).max(1);
        let cursor = K::cursor_mut(self);
        cursor.page = cursor.page.min(pages - 1);
        let rows = len.saturating_sub(cursor.page * size).min(size);
        cursor.row = cursor.row.min(rows.saturating_sub(1));
    }

    pub fn start_search(&mut self) {
        self.input_mode = InputMode::Search;
    }

    /// Edit the search term; the view is recomputed on the next draw.
    pub fn edit_search<K: Managed>(&mut self, edit: impl FnOnce(&mut String)) {
        let mut term = K::manager(self).search_term().to_string();
        edit(&mut term);
        K::manager_mut(self).set_search_term(term);
        *K::cursor_mut(self) = ListCursor::default();
    }

    pub fn dismiss_messages<K: Managed>(&mut self) {
        K::manager_mut(self).dismiss_messages();
    }

    // --- form --------------------------------------------------------------

    pub fn start_create<K: Managed>(&mut self) {
        K::manager_mut(self).start_create();
        self.form_field = 0;
        self.input_mode = InputMode::Form;
    }

    pub fn start_edit<K: Managed>(&mut self) {
        let Some(record) = self.selected::<K>().cloned() else {
            return;
        };
        K::manager_mut(self).start_edit(&record);
        self.form_field = 0;
        self.input_mode = InputMode::Form;
    }

    pub fn cancel_form<K: Managed>(&mut self) {
        K::manager_mut(self).cancel_edit();
        self.input_mode = InputMode::Normal;
    }

    pub fn current_field<K: Managed>(&self) -> FieldSpec {
        K::FIELDS[self.form_field.min(K::FIELDS.len() - 1)]
    }

    pub fn focus_field<K: Managed>(&mut self, delta: isize) {
        let len = K::FIELDS.len() as isize;
        self.form_field = (self.form_field as isize + delta).rem_euclid(len) as usize;
    }

    fn set_form_value<K: Managed>(&mut self, name: &str, value: &str) {
        if let Err(e) = K::manager_mut(self).update_field(name, value) {
            tracing::warn!("Rejected {} input: {}", K::NOUN, e);
        }
    }

    fn form_value<K: Managed>(&self, name: &str) -> String {
        K::field(K::manager(self).form(), name).unwrap_or_default()
    }

    pub fn form_input<K: Managed>(&mut self, c: char) {
        let spec = self.current_field::<K>();
        let mut value = self.form_value::<K>(spec.name);
        match spec.kind {
            FieldKind::Text | FieldKind::Secret => value.push(c),
            FieldKind::Number => {
                if !(c.is_ascii_digit() || c == '.') {
                    return;
                }
                if value == "0" && c != '.' {
                    value.clear();
                }
                value.push(c);
            }
            FieldKind::Shift | FieldKind::Flag => {
                if c == ' ' {
                    self.toggle_field::<K>();
                }
                return;
            }
        }
        self.set_form_value::<K>(spec.name, &value);
    }

    pub fn form_backspace<K: Managed>(&mut self) {
        let spec = self.current_field::<K>();
        if matches!(spec.kind, FieldKind::Shift | FieldKind::Flag) {
            return;
        }
        let mut value = self.form_value::<K>(spec.name);
        value.pop();
        self.set_form_value::<K>(spec.name, &value);
    }

    /// Flip a shift or flag field. Returns `false` for other field kinds.
    pub fn toggle_field<K: Managed>(&mut self) -> bool {
        let spec = self.current_field::<K>();
        let current = self.form_value::<K>(spec.name);
        let next = match spec.kind {
            FieldKind::Shift => current
                .parse::<Shift>()
                .unwrap_or_default()
                .toggled()
                .to_string(),
            FieldKind::Flag => (current != "true").to_string(),
            _ => return false,
        };
        self.set_form_value::<K>(spec.name, &next);
        true
    }

    pub fn submit<K: Managed>(&mut self) {
        if self.saving {
            return;
        }
        let Some(Submission { form, write }) = K::manager_mut(self).prepare_submit() else {
            // Jump to the offending field.
            let failed = K::manager(self)
                .field_error()
                .and_then(|err| K::FIELDS.iter().position(|f| f.name == err.field));
            if let Some(index) = failed {
                self.form_field = index;
            }
            return;
        };

        self.saving = true;
        self.remote.spawn(
            |client| async move {
                match write {
                    Write::Create(payload) => {
                        <RestClient as RemoteSource<K>>::create(&*client, &payload).await
                    }
                    Write::Update(id, payload) => {
                        <RestClient as RemoteSource<K>>::update(&*client, &id, &payload).await
                    }
                }
            },
            move |app, result| {
                app.saving = false;
                if K::manager_mut(app).finish_submit(form, result) {
                    // Only close the overlay if it still shows this form
                    let closed = !K::manager(app).is_form_open();
                    if app.input_mode == InputMode::Form && app.tab == K::TAB && closed {
                        app.input_mode = InputMode::Normal;
                    }
                    app.load::<K>();
                }
            },
        );
    }

    // --- delete ------------------------------------------------------------

    pub fn request_delete<K: Managed>(&mut self) {
        let Some((id, prompt)) = self
            .selected::<K>()
            .map(|record| (K::id(record).clone(), K::delete_prompt(Some(record))))
        else {
            return;
        };
        self.pending_delete = Some(PendingDelete { id, prompt });
        self.input_mode = InputMode::ConfirmDelete;
    }

    pub fn answer_delete<K: Managed>(&mut self, confirmed: bool) {
        self.input_mode = InputMode::Normal;
        let Some(pending) = self.pending_delete.take() else {
            return;
        };
        let Some(id) = K::manager_mut(self).prepare_remove(&pending.id, &mut |_: &str| confirmed)
        else {
            return;
        };

        let target = id.clone();
        self.remote.spawn(
            |client| async move { <RestClient as RemoteSource<K>>::delete(&*client, &target).await },
            move |app, result| {
                if K::manager_mut(app).finish_remove(&id, result) {
                    app.load::<K>();
                }
            },
        );
    }

    // --- dashboard ---------------------------------------------------------

    pub fn fetch_dashboard(&mut self) {
        let ticket = self.dashboard.begin_fetch();
        let query = self.dashboard.query;
        self.remote.spawn(
            move |client| async move { client.dashboard(&query).await },
            move |app, result| {
                app.dashboard.finish_fetch(ticket, result);
            },
        );
    }

    pub fn step_dashboard_date(&mut self, days: i64) {
        self.dashboard.query.step(days);
        self.fetch_dashboard();
    }

    pub fn cycle_dashboard_shift(&mut self) {
        self.dashboard.query.cycle_shift();
        self.fetch_dashboard();
    }

    // --- account settings --------------------------------------------------

    pub fn open_password_form(&mut self) {
        self.password.open();
        self.password_field = 0;
        self.input_mode = InputMode::PasswordForm;
    }

    pub fn cancel_password_form(&mut self) {
        self.password.cancel();
        self.input_mode = InputMode::Normal;
    }

    pub fn focus_password_field(&mut self, delta: isize) {
        let len = PasswordChangeForm::FIELDS.len() as isize;
        self.password_field = (self.password_field as isize + delta).rem_euclid(len) as usize;
    }

    pub fn edit_password_field(&mut self, edit: impl FnOnce(&mut String)) {
        let (name, _) = PasswordChangeForm::FIELDS[self.password_field];
        let mut value = self
            .password
            .form()
            .field(name)
            .unwrap_or_default()
            .to_string();
        edit(&mut value);
        if let Err(e) = self.password.update_field(name, &value) {
            tracing::warn!("Rejected password input: {}", e);
        }
    }

    pub fn submit_password(&mut self) {
        if self.saving {
            return;
        }
        let Some(request) = self.password.prepare() else {
            return;
        };

        self.saving = true;
        self.remote.spawn(
            |client| async move { client.change_password(&request.current, &request.new).await },
            |app, result| {
                app.saving = false;
                if app.password.finish(result) && app.input_mode == InputMode::PasswordForm {
                    app.input_mode = InputMode::Normal;
                }
            },
        );
    }

    // --- quick find --------------------------------------------------------

    pub fn open_palette(&mut self) {
        self.palette = Palette::default();
        self.input_mode = InputMode::Palette;
    }

    pub fn close_palette(&mut self) {
        self.palette = Palette::default();
        self.input_mode = InputMode::Normal;
    }

    pub fn edit_palette(&mut self, edit: impl FnOnce(&mut String)) {
        edit(&mut self.palette.query);
        let candidates = self
            .clients
            .records()
            .iter()
            .map(Candidate::client)
            .chain(self.staff.records().iter().map(Candidate::staff));
        self.palette.hits = palette::rank(candidates, &self.palette.query);
        self.palette.selected = 0;
    }

    pub fn move_palette(&mut self, delta: isize) {
        let last = self.palette.hits.len().saturating_sub(1);
        self.palette.selected = self.palette.selected.saturating_add_signed(delta).min(last);
    }

    pub fn select_palette(&mut self) {
        let Some(hit) = self.palette.hits.get(self.palette.selected).cloned() else {
            return;
        };
        self.close_palette();
        match &hit.candidate.target {
            Target::Client(id) => self.focus_record::<ClientKind>(id),
            Target::Staff(id) => self.focus_record::<StaffKind>(id),
        }
    }

    /// Switch to `K`'s screen and put the cursor on `id`, clearing a search
    /// term that hides it.
    pub fn focus_record<K: Managed>(&mut self, id: &EntityId) {
        self.tab = K::TAB;
        if K::manager(self).find(id).is_none() {
            return;
        }

        let position = |app: &App| {
            K::manager(app)
                .visible()
                .iter()
                .position(|record| K::id(record) == id)
        };
        let index = match position(self) {
            Some(index) => index,
            None => {
                K::manager_mut(self).set_search_term("");
                match position(self) {
                    Some(index) => index,
                    None => return,
                }
            }
        };

        let size = self.page_size;
        *K::cursor_mut(self) = ListCursor {
            page: index / size,
            row: index % size,
        };
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::tasks::Completion;
    use milkcrm_core::Session;
    use std::io::{Read as _, Write as _};
    use std::net::TcpListener;
    use std::time::Duration;
    use tokio::sync::mpsc::UnboundedReceiver;

    pub(crate) fn test_app(page_size: usize) -> App {
        let client = RestClient::new("localhost:5000", Session::anonymous(), None).unwrap();
        let (remote, _rx) = Remote::new(client);
        App::new(remote, page_size)
    }

    pub(crate) fn client(id: &str, name: &str, location: &str) -> Client {
        Client {
            id: EntityId::new(id),
            name: name.into(),
            number: format!("98{id}"),
            location: location.into(),
            time_shift: Shift::Am,
            price_per_litre: 55.0,
            quantity: 2.0,
            priority_status: false,
        }
    }

    pub(crate) fn seed_clients(app: &mut App, clients: Vec<Client>) {
        let ticket = app.clients.begin_load();
        app.clients.finish_load(ticket, Ok(clients));
    }

    const SAVED_CLIENT: &str = r#"{"_id":"c1","name":"Asha","number":"9811","location":"Sector 4","timeShift":"AM","pricePerLitre":55.0,"quantity":2.0,"priorityStatus":false}"#;

    /// Answer a single HTTP request on a loopback port with `body`.
    fn serve_once(body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request_complete(&request) {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 201 Created\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
        });
        format!("http://{addr}")
    }

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some(end) = text.find("\r\n\r\n") else {
            return false;
        };
        let length = text[..end]
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        request.len() >= end + 4 + length
    }

    /// Run `test` on a `LocalSet` with an app talking to `base`.
    fn with_remote_app<F, Fut>(base: &str, test: F)
    where
        F: FnOnce(App, UnboundedReceiver<Completion>) -> Fut,
        Fut: std::future::Future<Output = ()>,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let client = RestClient::new(base, Session::anonymous(), Some(Duration::from_secs(5))).unwrap();
        let (remote, completions) = Remote::new(client);
        let app = App::new(remote, 10);
        tokio::task::LocalSet::new().block_on(&runtime, test(app, completions));
    }

    fn submit_client(app: &mut App) {
        app.select_tab(Tab::Clients);
        app.start_create::<ClientKind>();
        for (name, value) in [("name", "Asha"), ("number", "9811"), ("location", "Sector 4")] {
            app.clients.update_field(name, value).unwrap();
        }
        app.submit::<ClientKind>();
        assert!(app.saving);
    }

    fn many_clients(n: usize) -> Vec<Client> {
        (0..n)
            .map(|i| client(&i.to_string(), &format!("Client {i}"), "Sector 9"))
            .collect()
    }

    #[test]
    fn test_selection_stays_on_page() {
        let mut app = test_app(5);
        seed_clients(&mut app, many_clients(7));

        app.move_selection::<ClientKind>(10);
        assert_eq!(app.client_cursor, ListCursor { page: 0, row: 4 });

        app.change_page::<ClientKind>(1);
        assert_eq!(app.client_cursor, ListCursor { page: 1, row: 0 });
        app.move_selection::<ClientKind>(5);
        assert_eq!(app.client_cursor.row, 1);
        assert_eq!(app.selected::<ClientKind>().unwrap().name, "Client 6");

        app.change_page::<ClientKind>(3);
        assert_eq!(app.client_cursor.page, 1);
    }

    #[test]
    fn test_search_resets_cursor_and_filters() {
        let mut app = test_app(5);
        let mut clients = many_clients(7);
        clients.push(client("x", "Asha Dairy", "MG Road"));
        seed_clients(&mut app, clients);
        app.change_page::<ClientKind>(1);

        app.edit_search::<ClientKind>(|term| term.push_str("mg r"));
        assert_eq!(app.client_cursor, ListCursor::default());
        assert_eq!(app.selected::<ClientKind>().unwrap().name, "Asha Dairy");
    }

    #[test]
    fn test_palette_clears_hiding_search_term() {
        let mut app = test_app(5);
        seed_clients(&mut app, many_clients(8));
        app.edit_search::<ClientKind>(|term| term.push_str("Client 1"));

        app.open_palette();
        app.edit_palette(|query| query.push_str("client 7"));
        assert!(!app.palette.hits.is_empty());
        app.select_palette();

        assert_eq!(app.tab, Tab::Clients);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.clients.search_term(), "");
        assert_eq!(app.client_cursor, ListCursor { page: 1, row: 2 });
        assert_eq!(app.selected::<ClientKind>().unwrap().name, "Client 7");
    }

    #[test]
    fn test_palette_keeps_matching_search_term() {
        let mut app = test_app(10);
        seed_clients(&mut app, many_clients(3));
        app.edit_search::<ClientKind>(|term| term.push_str("sector"));

        app.focus_record::<ClientKind>(&EntityId::new("2"));
        assert_eq!(app.clients.search_term(), "sector");
        assert_eq!(app.client_cursor.row, 2);
    }

    #[test]
    fn test_form_typing_and_toggles() {
        let mut app = test_app(10);
        app.start_create::<ClientKind>();
        assert_eq!(app.input_mode, InputMode::Form);

        for c in "Asha".chars() {
            app.form_input::<ClientKind>(c);
        }
        app.form_backspace::<ClientKind>();
        assert_eq!(app.clients.form().name, "Ash");

        // timeShift
        app.focus_field::<ClientKind>(3);
        app.form_input::<ClientKind>(' ');
        assert_eq!(app.clients.form().time_shift, Shift::Pm);

        // pricePerLitre starts at "0"
        app.focus_field::<ClientKind>(1);
        app.form_input::<ClientKind>('x');
        app.form_input::<ClientKind>('6');
        app.form_input::<ClientKind>('2');
        assert_eq!(app.clients.form().price_per_litre, "62");

        // priorityStatus, wrapping backwards from the first field
        app.focus_field::<ClientKind>(-3);
        assert_eq!(app.current_field::<ClientKind>().name, "number");
        app.focus_field::<ClientKind>(-2);
        assert_eq!(app.current_field::<ClientKind>().name, "priorityStatus");
        assert!(app.toggle_field::<ClientKind>());
        assert!(app.clients.form().priority_status);
    }

    #[test]
    fn test_invalid_submit_focuses_error_field() {
        let mut app = test_app(10);
        app.start_create::<ClientKind>();
        for c in "Asha".chars() {
            app.form_input::<ClientKind>(c);
        }

        app.submit::<ClientKind>();
        assert!(!app.saving);
        assert_eq!(app.input_mode, InputMode::Form);
        assert_eq!(app.clients.field_error().unwrap().field, "number");
        assert_eq!(app.current_field::<ClientKind>().name, "number");
    }

    #[test]
    fn test_save_completion_closes_its_form() {
        let base = serve_once(SAVED_CLIENT);
        with_remote_app(&base, |mut app, mut completions| async move {
            submit_client(&mut app);

            let apply = completions.recv().await.unwrap();
            apply(&mut app);

            assert!(!app.saving);
            assert_eq!(app.input_mode, InputMode::Normal);
            assert!(!app.clients.is_form_open());
            assert_eq!(app.clients.notice(), Some("Client saved"));
        });
    }

    #[test]
    fn test_late_save_leaves_staff_form_open() {
        let base = serve_once(SAVED_CLIENT);
        with_remote_app(&base, |mut app, mut completions| async move {
            submit_client(&mut app);

            app.cancel_form::<ClientKind>();
            app.select_tab(Tab::Staff);
            app.start_create::<StaffKind>();
            for c in "Draft".chars() {
                app.form_input::<StaffKind>(c);
            }

            let apply = completions.recv().await.unwrap();
            apply(&mut app);

            assert_eq!(app.clients.notice(), Some("Client saved"));
            assert_eq!(app.input_mode, InputMode::Form);
            assert!(app.staff.is_form_open());
            assert_eq!(app.staff.form().name, "Draft");
        });
    }

    #[test]
    fn test_declined_delete_sends_nothing() {
        let mut app = test_app(10);
        seed_clients(&mut app, many_clients(2));

        app.request_delete::<ClientKind>();
        assert_eq!(app.input_mode, InputMode::ConfirmDelete);
        let prompt = app.pending_delete.as_ref().unwrap().prompt.clone();
        assert!(prompt.contains("client"));

        app.answer_delete::<ClientKind>(false);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.pending_delete.is_none());
        assert_eq!(app.clients.records().len(), 2);
    }

    #[test]
    fn test_cursor_clamped_after_reload_shrinks() {
        let mut app = test_app(5);
        seed_clients(&mut app, many_clients(12));
        app.change_page::<ClientKind>(2);
        app.move_selection::<ClientKind>(1);
        assert_eq!(app.client_cursor, ListCursor { page: 2, row: 1 });

        seed_clients(&mut app, many_clients(6));
        app.clamp_cursor::<ClientKind>();
        assert_eq!(app.client_cursor, ListCursor { page: 1, row: 0 });
    }

    #[test]
    fn test_password_form_mismatch_stays_open() {
        let mut app = test_app(10);
        app.open_password_form();
        app.edit_password_field(|v| v.push_str("old"));
        app.focus_password_field(1);
        app.edit_password_field(|v| v.push_str("fresh-1"));
        app.focus_password_field(1);
        app.edit_password_field(|v| v.push_str("fresh-2"));

        app.submit_password();
        assert!(!app.saving);
        assert_eq!(app.input_mode, InputMode::PasswordForm);
        assert_eq!(app.password.error(), Some("New passwords do not match"));
    }
}
