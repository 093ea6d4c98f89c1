//! Generic list manager: keeps a local copy of a remote collection in sync
//! with create/update/delete actions and filters it locally.
//!
//! Every remote-backed operation comes in two halves so a frontend can run the
//! remote call on its own executor:
//!
//! | convenience | before the call     | after the call    |
//! |-------------|---------------------|-------------------|
//! | `load`      | `begin_load`        | `finish_load`     |
//! | `submit`    | `prepare_submit`    | `finish_submit`   |
//! | `remove`    | `prepare_remove`    | `finish_remove`   |
//!
//! Load results carry a [`LoadTicket`]; only the latest issued ticket is
//! applied, so overlapping loads cannot overwrite newer data with older.
//! A [`Submission`] remembers which form it came from, and a save that
//! resolves after that form was closed leaves the current form alone.

use crate::entity::{EntityKind, FormMode};
use crate::error::{FieldError, FormError, RemoteError};
use crate::models::EntityId;
use crate::search;
use crate::source::RemoteSource;

/// Which form, if any, is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
    Hidden,
    Creating,
    /// Editing the entity with this identifier (the editing target).
    Editing(EntityId),
}

/// Sequence token of one issued load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub(crate) fn new(seq: u64) -> Self {
        Self(seq)
    }

    pub fn seq(self) -> u64 {
        self.0
    }
}

/// Identifies one opening of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer load was issued; the result was discarded.
    Stale,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent.
    Invalid,
    Failed,
    Saved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The user did not confirm; nothing was sent.
    Declined,
    Failed,
    Removed,
}

/// The remote write a validated form turns into.
#[derive(Debug, Clone, PartialEq)]
pub enum Write<K: EntityKind> {
    Create(K::Payload),
    Update(EntityId, K::Payload),
}

/// A validated write and the form it was built from.
#[derive(Clone, PartialEq)]
pub struct Submission<K: EntityKind> {
    pub form: FormTicket,
    pub write: Write<K>,
}

/// Synchronous user acknowledgment before a destructive action.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

pub struct ListManager<K: EntityKind> {
    records: Vec<K::Record>,
    loaded: bool,
    loading: bool,
    issued: u64,
    form: K::Form,
    form_state: FormState,
    form_seq: u64,
    field_error: Option<FieldError>,
    error: Option<String>,
    notice: Option<String>,
    search_term: String,
}

impl<K: EntityKind> Default for ListManager<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: EntityKind> ListManager<K> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            loaded: false,
            loading: false,
            issued: 0,
            form: K::Form::default(),
            form_state: FormState::Hidden,
            form_seq: 0,
            field_error: None,
            error: None,
            notice: None,
            search_term: String::new(),
        }
    }

    /// The collection as of the last successful load.
    pub fn records(&self) -> &[K::Record] {
        &self.records
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn find(&self, id: &EntityId) -> Option<&K::Record> {
        self.records.iter().find(|record| K::id(record) == id)
    }

    pub fn form(&self) -> &K::Form {
        &self.form
    }

    pub fn form_state(&self) -> &FormState {
        &self.form_state
    }

    pub fn is_form_open(&self) -> bool {
        self.form_state != FormState::Hidden
    }

    pub fn editing_target(&self) -> Option<&EntityId> {
        match &self.form_state {
            FormState::Editing(id) => Some(id),
            _ => None,
        }
    }

    /// Create or edit mode of the open form.
    pub fn mode(&self) -> Option<FormMode> {
        match self.form_state {
            FormState::Hidden => None,
            FormState::Creating => Some(FormMode::Create),
            FormState::Editing(_) => Some(FormMode::Edit),
        }
    }

    pub fn field_error(&self) -> Option<&FieldError> {
        self.field_error.as_ref()
    }

    /// The error surfaced by the last failed action.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Confirmation of the last successful write.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_messages(&mut self) {
        self.error = None;
        self.notice = None;
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Records matching `term` on the designated searchable fields.
    pub fn filtered_view(&self, term: &str) -> Vec<&K::Record> {
        search::filter::<K>(&self.records, term)
    }

    /// Records matching the current search term.
    pub fn visible(&self) -> Vec<&K::Record> {
        self.filtered_view(&self.search_term)
    }

    // --- loading -----------------------------------------------------------

    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        self.loading = true;
        LoadTicket::new(self.issued)
    }

    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<K::Record>, RemoteError>,
    ) -> LoadOutcome {
        if ticket.0 != self.issued {
            tracing::debug!(
                "Discarding stale {} load #{} (latest #{})",
                K::COLLECTION,
                ticket.0,
                self.issued
            );
            return LoadOutcome::Stale;
        }
        self.loading = false;

        match result {
            Ok(records) => {
                tracing::info!("Loaded {} {}", records.len(), K::COLLECTION);
                self.records = records;
                self.loaded = true;
                self.error = None;
                LoadOutcome::Applied
            }
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}", K::COLLECTION, e);
                self.error = Some(format!(
                    "Failed to fetch {}. Please try again.",
                    K::COLLECTION
                ));
                LoadOutcome::Failed
            }
        }
    }

    /// Fetch the whole collection. A failure keeps the previous collection.
    pub async fn load<S: RemoteSource<K>>(&mut self, source: &S) -> LoadOutcome {
        let ticket = self.begin_load();
        let result = source.list().await;
        self.finish_load(ticket, result)
    }

    // --- form --------------------------------------------------------------

    pub fn start_create(&mut self) {
        self.open_form(K::Form::default(), FormState::Creating);
    }

    pub fn start_edit(&mut self, record: &K::Record) {
        self.open_form(K::form_from(record), FormState::Editing(K::id(record).clone()));
    }

    fn open_form(&mut self, form: K::Form, state: FormState) {
        self.form = form;
        self.form_state = state;
        self.form_seq += 1;
        self.field_error = None;
        self.error = None;
        self.notice = None;
    }

    /// The currently open form; changes whenever a form is opened or closed.
    pub fn form_ticket(&self) -> FormTicket {
        FormTicket(self.form_seq)
    }

    pub fn update_field(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        K::set_field(&mut self.form, name, value)?;

        let clears = match &self.field_error {
            Some(err) => {
                err.field == name || (K::clears_field_error(name) && K::clears_field_error(err.field))
            }
            None => false,
        };
        if clears {
            self.field_error = None;
        }
        Ok(())
    }

    /// Run the entity's rules against the open form, recording the first
    /// failure as the field error.
    pub fn validate(&mut self) -> bool {
        let Some(mode) = self.mode() else {
            return false;
        };
        match K::validate(&self.form, mode) {
            Ok(()) => {
                self.field_error = None;
                true
            }
            Err(err) => {
                tracing::debug!("{} form invalid: {} ({})", K::NOUN, err, err.field);
                self.field_error = Some(err);
                false
            }
        }
    }

    pub fn cancel_edit(&mut self) {
        self.close_form();
    }

    fn close_form(&mut self) {
        self.form = K::Form::default();
        self.form_state = FormState::Hidden;
        self.form_seq += 1;
        self.field_error = None;
    }

    // --- writes ------------------------------------------------------------

    /// Validate and build the remote write, or `None` if nothing may be sent.
    pub fn prepare_submit(&mut self) -> Option<Submission<K>> {
        let mode = self.mode()?;
        if !self.validate() {
            return None;
        }
        let payload = match K::payload(&self.form, mode) {
            Ok(payload) => payload,
            Err(err) => {
                self.field_error = Some(err);
                return None;
            }
        };

        self.error = None;
        self.notice = None;
        let write = match &self.form_state {
            FormState::Editing(id) => Write::Update(id.clone(), payload),
            _ => Write::Create(payload),
        };
        Some(Submission {
            form: self.form_ticket(),
            write,
        })
    }

    /// Apply the result of a create/update. The form is only reset if it is
    /// still the one `form` was issued for. Returns `true` when the
    /// collection must be reloaded.
    pub fn finish_submit(&mut self, form: FormTicket, result: Result<K::Record, RemoteError>) -> bool {
        match result {
            Ok(record) => {
                tracing::info!("Saved {} {}", K::NOUN, K::id(&record));
                if form == self.form_ticket() {
                    self.close_form();
                } else {
                    tracing::debug!("{} form changed while saving; keeping it", K::NOUN);
                }
                self.notice = Some(format!("{} saved", capitalize(K::NOUN)));
                true
            }
            Err(e) => {
                tracing::warn!("Failed to save {}: {}", K::NOUN, e);
                self.error = Some(format!(
                    "Failed to save {}. Please check your input and try again.",
                    K::NOUN
                ));
                false
            }
        }
    }

    pub async fn submit<S: RemoteSource<K>>(&mut self, source: &S) -> SubmitOutcome {
        let Some(submission) = self.prepare_submit() else {
            return SubmitOutcome::Invalid;
        };
        let result = match &submission.write {
            Write::Create(payload) => source.create(payload).await,
            Write::Update(id, payload) => source.update(id, payload).await,
        };
        if self.finish_submit(submission.form, result) {
            self.load(source).await;
            SubmitOutcome::Saved
        } else {
            SubmitOutcome::Failed
        }
    }

    /// Ask for confirmation; returns the identifier to delete if given.
    pub fn prepare_remove(&mut self, id: &EntityId, confirm: &mut impl Confirm) -> Option<EntityId> {
        let prompt = K::delete_prompt(self.find(id));
        if !confirm.confirm(&prompt) {
            tracing::debug!("Delete of {} {} declined", K::NOUN, id);
            return None;
        }
        self.error = None;
        self.notice = None;
        Some(id.clone())
    }

    /// Apply the result of a delete. Returns `true` when the collection must
    /// be reloaded.
    pub fn finish_remove(&mut self, id: &EntityId, result: Result<(), RemoteError>) -> bool {
        match result {
            Ok(()) => {
                tracing::info!("Deleted {} {}", K::NOUN, id);
                self.notice = Some(format!("{} deleted", capitalize(K::NOUN)));
                true
            }
            Err(e) => {
                tracing::warn!("Failed to delete {} {}: {}", K::NOUN, id, e);
                self.error = Some(format!("Failed to delete {}. Please try again.", K::NOUN));
                false
            }
        }
    }

    pub async fn remove<S: RemoteSource<K>>(
        &mut self,
        source: &S,
        id: &EntityId,
        mut confirm: impl Confirm,
    ) -> RemoveOutcome {
        let Some(id) = self.prepare_remove(id, &mut confirm) else {
            return RemoveOutcome::Declined;
        };
        let result = source.delete(&id).await;
        if self.finish_remove(&id, result) {
            self.load(source).await;
            RemoveOutcome::Removed
        } else {
            RemoveOutcome::Failed
        }
    }
}

fn capitalize(noun: &str) -> String {
    let mut chars = noun.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::{ClientForm, ClientKind, ClientPayload, StaffForm, StaffKind, StaffPayload};
    use crate::models::{Client, Shift, Staff};
    use crate::source::memory::{Call, MemorySource};

    fn client(id: &str, name: &str, location: &str) -> Client {
        Client {
            id: EntityId::new(id),
            name: name.into(),
            number: "9810000000".into(),
            location: location.into(),
            time_shift: Shift::Am,
            price_per_litre: 54.0,
            quantity: 1.5,
            priority_status: false,
        }
    }

    fn staff(id: &str, name: &str) -> Staff {
        Staff {
            id: EntityId::new(id),
            name: name.into(),
            username: Some(format!("{}@dairy.in", name.to_lowercase())),
            contact_number: Some("9000000000".into()),
            location: Some("East".into()),
            shift: Shift::Pm,
        }
    }

    fn client_source(records: Vec<Client>) -> MemorySource<ClientKind> {
        MemorySource::new(records, |id, p: &ClientPayload| Client {
            id,
            name: p.name.clone(),
            number: p.number.clone(),
            location: p.location.clone(),
            time_shift: p.time_shift,
            price_per_litre: p.price_per_litre,
            quantity: p.quantity,
            priority_status: p.priority_status,
        })
    }

    fn staff_source(records: Vec<Staff>) -> MemorySource<StaffKind> {
        MemorySource::new(records, |id, p: &StaffPayload| Staff {
            id,
            name: p.name.clone(),
            username: Some(p.email.clone()),
            contact_number: Some(p.phone.clone()),
            location: Some(p.address.clone()),
            shift: p.shift,
        })
    }

    fn fill(manager: &mut ListManager<StaffKind>, fields: &[(&str, &str)]) {
        for (name, value) in fields {
            manager.update_field(name, value).unwrap();
        }
    }

    #[tokio::test]
    async fn test_load_populates_collection_in_order() {
        let source = client_source(vec![
            client("1", "Asha", "Sector 4"),
            client("2", "Bala", "MG Road"),
        ]);
        let mut manager = ListManager::<ClientKind>::new();

        assert_eq!(manager.load(&source).await, LoadOutcome::Applied);
        assert!(manager.is_loaded());
        assert!(!manager.is_loading());

        let ids: Vec<_> = manager.filtered_view("").iter().map(|c| c.id.to_string()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_collection() {
        let source = client_source(vec![
            client("1", "Asha", "Sector 4"),
            client("2", "Bala", "MG Road"),
        ]);
        let mut manager = ListManager::<ClientKind>::new();
        manager.load(&source).await;
        manager.set_search_term("sector");
        let before: Vec<Client> = manager.visible().into_iter().cloned().collect();

        source.fail_list.set(true);
        assert_eq!(manager.load(&source).await, LoadOutcome::Failed);

        assert_eq!(manager.records().len(), 2);
        let after: Vec<Client> = manager.visible().into_iter().cloned().collect();
        assert_eq!(before, after);
        assert!(!manager.error().unwrap_or_default().is_empty());
    }

    #[test]
    fn test_stale_load_is_discarded() {
        let mut manager = ListManager::<ClientKind>::new();
        let first = manager.begin_load();
        let second = manager.begin_load();

        let newer = vec![client("2", "Newer", "B")];
        let older = vec![client("1", "Older", "A")];

        assert_eq!(manager.finish_load(second, Ok(newer)), LoadOutcome::Applied);
        assert_eq!(manager.finish_load(first, Ok(older)), LoadOutcome::Stale);
        assert_eq!(manager.records()[0].name, "Newer");
    }

    #[test]
    fn test_stale_failure_does_not_surface_error() {
        let mut manager = ListManager::<ClientKind>::new();
        let first = manager.begin_load();
        let second = manager.begin_load();

        let outcome = manager.finish_load(first, Err(RemoteError::Other("boom".into())));
        assert_eq!(outcome, LoadOutcome::Stale);
        assert!(manager.error().is_none());
        assert!(manager.is_loading());

        manager.finish_load(second, Ok(Vec::new()));
        assert!(!manager.is_loading());
    }

    #[tokio::test]
    async fn test_staff_short_password_issues_no_call() {
        let source = staff_source(Vec::new());
        let mut manager = ListManager::<StaffKind>::new();
        manager.start_create();
        fill(
            &mut manager,
            &[("name", "Meena"), ("email", "meena@dairy.in"), ("password", "abc"), ("confirmPassword", "abc")],
        );

        assert_eq!(manager.submit(&source).await, SubmitOutcome::Invalid);
        assert!(source.calls().is_empty());
        let err = manager.field_error().unwrap();
        assert_eq!(err.field, "password");
        assert!(err.message.contains("at least 6"));
        assert!(manager.is_form_open());
    }

    #[tokio::test]
    async fn test_staff_password_mismatch_issues_no_call() {
        let source = staff_source(Vec::new());
        let mut manager = ListManager::<StaffKind>::new();
        manager.start_create();
        fill(
            &mut manager,
            &[("name", "Meena"), ("email", "meena@dairy.in"), ("password", "secret1"), ("confirmPassword", "secret2")],
        );

        assert_eq!(manager.submit(&source).await, SubmitOutcome::Invalid);
        assert!(source.calls().is_empty());
        assert_eq!(manager.field_error().unwrap().message, "Passwords don't match");
    }

    #[test]
    fn test_editing_a_password_field_clears_mismatch() {
        let mut manager = ListManager::<StaffKind>::new();
        manager.start_create();
        fill(&mut manager, &[("password", "secret1"), ("confirmPassword", "secret2")]);
        assert!(!manager.validate());
        assert!(manager.field_error().is_some());

        manager.update_field("name", "Meena").unwrap();
        assert!(manager.field_error().is_some());

        manager.update_field("password", "secret2").unwrap();
        assert!(manager.field_error().is_none());
    }

    #[tokio::test]
    async fn test_staff_update_with_blank_passwords_omits_them() {
        let source = staff_source(vec![staff("s1", "Ravi")]);
        let mut manager = ListManager::<StaffKind>::new();
        manager.load(&source).await;

        let record = manager.records()[0].clone();
        manager.start_edit(&record);
        assert_eq!(manager.editing_target(), Some(&EntityId::new("s1")));

        assert_eq!(manager.submit(&source).await, SubmitOutcome::Saved);

        let calls = source.calls();
        let Call::Update(id, body) = &calls[1] else {
            panic!("expected update, got {:?}", calls[1]);
        };
        assert_eq!(id.as_str(), "s1");
        assert!(body.get("password").is_none());
        assert!(body.get("confirmPassword").is_none());
        assert_eq!(body["email"], "ravi@dairy.in");
        assert_eq!(calls[2], Call::List);

        assert!(!manager.is_form_open());
        assert!(manager.editing_target().is_none());
        assert_eq!(manager.notice(), Some("Staff member saved"));
    }

    #[tokio::test]
    async fn test_unchanged_edit_sends_record_fields() {
        let record = client("c9", "Chandra", "Sector 9");
        let source = client_source(vec![record.clone()]);
        let mut manager = ListManager::<ClientKind>::new();
        manager.load(&source).await;

        manager.start_edit(&record);
        manager.submit(&source).await;

        let expected = serde_json::json!({
            "name": "Chandra",
            "number": "9810000000",
            "location": "Sector 9",
            "timeShift": "AM",
            "pricePerLitre": 54.0,
            "quantity": 1.5,
            "priorityStatus": false,
        });
        assert_eq!(source.calls()[1], Call::Update(EntityId::new("c9"), expected));
    }

    #[tokio::test]
    async fn test_create_reloads_and_resets_form() {
        let source = client_source(Vec::new());
        let mut manager = ListManager::<ClientKind>::new();
        manager.load(&source).await;

        manager.start_create();
        for (name, value) in [("name", "Devi"), ("number", "9999"), ("location", "Old Town"), ("quantity", "3")] {
            manager.update_field(name, value).unwrap();
        }
        assert_eq!(manager.submit(&source).await, SubmitOutcome::Saved);

        assert_eq!(manager.records().len(), 1);
        assert_eq!(manager.records()[0].name, "Devi");
        assert_eq!(manager.form(), &ClientForm::default());
        assert_eq!(manager.form_state(), &FormState::Hidden);
        assert!(matches!(source.calls()[1], Call::Create(_)));
        assert_eq!(source.calls()[2], Call::List);
    }

    #[tokio::test]
    async fn test_failed_submit_preserves_form() {
        let source = client_source(Vec::new());
        source.fail_writes.set(true);
        let mut manager = ListManager::<ClientKind>::new();

        manager.start_create();
        for (name, value) in [("name", "Devi"), ("number", "9999"), ("location", "Old Town")] {
            manager.update_field(name, value).unwrap();
        }
        let draft = manager.form().clone();

        assert_eq!(manager.submit(&source).await, SubmitOutcome::Failed);
        assert_eq!(manager.form(), &draft);
        assert_eq!(manager.form_state(), &FormState::Creating);
        assert_eq!(
            manager.error(),
            Some("Failed to save client. Please check your input and try again.")
        );
        // No reload after a failed write.
        assert_eq!(source.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_requires_confirmation() {
        let source = client_source(vec![client("1", "Asha", "A"), client("2", "Bala", "B")]);
        let mut manager = ListManager::<ClientKind>::new();
        manager.load(&source).await;
        let id = EntityId::new("1");

        let mut asked = None;
        let outcome = manager
            .remove(&source, &id, |prompt: &str| {
                asked = Some(prompt.to_string());
                false
            })
            .await;
        assert_eq!(outcome, RemoveOutcome::Declined);
        assert_eq!(asked.as_deref(), Some("Are you sure you want to delete this client?"));
        assert_eq!(source.calls(), vec![Call::List]);

        let outcome = manager.remove(&source, &id, |_: &str| true).await;
        assert_eq!(outcome, RemoveOutcome::Removed);
        assert_eq!(
            source.calls(),
            vec![Call::List, Call::Delete(id.clone()), Call::List]
        );
        assert_eq!(manager.records().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_remove_keeps_collection() {
        let source = client_source(vec![client("1", "Asha", "A")]);
        let mut manager = ListManager::<ClientKind>::new();
        manager.load(&source).await;
        source.fail_writes.set(true);

        let outcome = manager.remove(&source, &EntityId::new("1"), |_: &str| true).await;
        assert_eq!(outcome, RemoveOutcome::Failed);
        assert_eq!(manager.records().len(), 1);
        assert_eq!(manager.error(), Some("Failed to delete client. Please try again."));
    }

    #[test]
    fn test_cancel_edit_clears_state() {
        let mut manager = ListManager::<StaffKind>::new();
        manager.start_edit(&staff("s1", "Ravi"));
        manager.update_field("password", "x").unwrap();
        manager.validate();
        assert!(manager.field_error().is_some());

        manager.cancel_edit();
        assert!(!manager.is_form_open());
        assert!(manager.editing_target().is_none());
        assert!(manager.field_error().is_none());
        assert_eq!(manager.form(), &StaffForm::default());
    }

    #[test]
    fn test_late_save_keeps_newer_draft() {
        let mut manager = ListManager::<ClientKind>::new();
        manager.start_create();
        for (name, value) in [("name", "Devi"), ("number", "9999"), ("location", "Old Town")] {
            manager.update_field(name, value).unwrap();
        }
        let submission = manager.prepare_submit().unwrap();

        manager.cancel_edit();
        manager.start_create();
        manager.update_field("name", "Draft").unwrap();

        let saved = client("c1", "Devi", "Old Town");
        assert!(manager.finish_submit(submission.form, Ok(saved)));
        assert_eq!(manager.form_state(), &FormState::Creating);
        assert_eq!(manager.form().name, "Draft");
        assert_eq!(manager.notice(), Some("Client saved"));
    }

    #[tokio::test]
    async fn test_opening_a_form_clears_previous_error() {
        let source = client_source(vec![client("1", "Asha", "A")]);
        source.fail_list.set(true);
        let mut manager = ListManager::<ClientKind>::new();
        manager.load(&source).await;
        assert!(manager.error().is_some());

        manager.start_create();
        assert!(manager.error().is_none());

        manager.load(&source).await;
        manager.start_edit(&client("1", "Asha", "A"));
        assert!(manager.error().is_none());
    }

    #[test]
    fn test_submit_without_open_form_does_nothing() {
        let mut manager = ListManager::<ClientKind>::new();
        assert!(manager.prepare_submit().is_none());
        assert!(manager.field_error().is_none());
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("staff member"), "Staff member");
        assert_eq!(capitalize(""), "");
    }
}
