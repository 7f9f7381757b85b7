//! Create/update form for a single pet record.
//!
//! # Design
//! `PetForm` is a sans-IO state machine. User intents (`initialize`,
//! `on_field_change`, `submit`, `delete`) return `Outgoing` requests tagged
//! with the `Operation` they serve; the host executes them and feeds each
//! answer back through `handle_response` (or `handle_transport_failure` when
//! no answer arrived). The two mount-time loads are independent, so their
//! responses may come back in either order.
//!
//! ```text
//! Loading ──► Ready ──► Submitting ──┬──► Redirected
//!               ▲                    │
//!               └──── errors ────────┘
//! ```

use crate::client::PetsClient;
use crate::directory::{OwnerOption, UserDirectory};
use crate::draft::{Field, PetDraft};
use crate::error::{ApiError, FormError};
use crate::http::{HttpRequest, HttpResponse};
use crate::validation::FieldErrors;

/// Whether the form creates a new pet or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update { pet_id: String },
}

impl FormMode {
    pub fn pet_id(&self) -> Option<&str> {
        match self {
            FormMode::Create => None,
            FormMode::Update { pet_id } => Some(pet_id),
        }
    }
}

/// Lifecycle of a form instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    /// Waiting for the record being edited.
    Loading,
    Ready,
    /// A create, update or delete request is in flight.
    Submitting,
    /// Navigated away; terminal.
    Redirected,
}

/// What an outgoing request is for. The host returns it alongside the
/// response so the form can route it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    LoadPet,
    LoadUsers,
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outgoing {
    pub operation: Operation,
    pub request: HttpRequest,
}

/// Route the host should switch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The landing page, `/`.
    Home,
}

impl Navigation {
    pub fn path(self) -> &'static str {
        match self {
            Navigation::Home => "/",
        }
    }
}

/// Outcome of feeding a response into the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    PetLoaded,
    DirectoryLoaded,
    /// A load failed. The form stays usable with whatever it already had.
    LoadFailed(Operation),
    Navigate(Navigation),
    /// The server refused the submission; see `PetForm::errors`.
    Rejected,
    DeleteFailed,
    /// A submission answer arrived while none was in flight.
    Ignored,
}

/// Render snapshot of the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub name: String,
    pub kind: String,
    pub owner: String,
    pub owner_options: Vec<OwnerOption>,
    pub errors: FieldErrors,
    pub submit_label: &'static str,
    pub show_delete: bool,
}

impl FormView {
    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(field)
    }
}

#[derive(Debug, Clone)]
pub struct PetForm {
    client: PetsClient,
    mode: FormMode,
    state: FormState,
    draft: PetDraft,
    directory: UserDirectory,
    errors: FieldErrors,
    /// Tag of the submission awaiting its response.
    in_flight: Option<Operation>,
}

impl PetForm {
    pub fn new(client: PetsClient, mode: FormMode) -> Self {
        let state = match mode {
            FormMode::Create => FormState::Ready,
            FormMode::Update { .. } => FormState::Loading,
        };
        Self {
            client,
            mode,
            state,
            draft: PetDraft::default(),
            directory: UserDirectory::default(),
            errors: FieldErrors::new(),
            in_flight: None,
        }
    }

    /// Requests issued on mount: the record under edit (update mode only)
    /// and the owner directory.
    pub fn initialize(&self) -> Vec<Outgoing> {
        let load_pet = self.mode.pet_id().map(|id| Outgoing {
            operation: Operation::LoadPet,
            request: self.client.build_get_pet(id),
        });
        let load_users = Outgoing {
            operation: Operation::LoadUsers,
            request: self.client.build_list_users(),
        };
        load_pet.into_iter().chain(Some(load_users)).collect()
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn draft(&self) -> &PetDraft {
        &self.draft
    }

    pub fn directory(&self) -> &UserDirectory {
        &self.directory
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn on_field_change(&mut self, field: Field, value: impl Into<String>) {
        self.draft = self.draft.with_field(field, value);
    }

    /// Input binding keyed by the element's `name` attribute.
    pub fn on_input(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        let field = name.parse::<Field>().map_err(FormError::UnknownField)?;
        self.on_field_change(field, value);
        Ok(())
    }

    /// Sends the draft: `PUT` in update mode, `POST` otherwise.
    pub fn submit(&mut self) -> Result<Outgoing, FormError> {
        self.ensure_ready()?;
        let outgoing = match &self.mode {
            FormMode::Create => Outgoing {
                operation: Operation::Create,
                request: self.client.build_create_pet(&self.draft)?,
            },
            FormMode::Update { pet_id } => Outgoing {
                operation: Operation::Update,
                request: self.client.build_update_pet(pet_id, &self.draft)?,
            },
        };
        self.start_submission(outgoing.operation);
        Ok(outgoing)
    }

    pub fn delete(&mut self) -> Result<Outgoing, FormError> {
        let Some(pet_id) = self.mode.pet_id() else {
            return Err(FormError::DeleteUnavailable);
        };
        self.ensure_ready()?;
        let request = self.client.build_delete_pet(pet_id);
        self.start_submission(Operation::Delete);
        Ok(Outgoing {
            operation: Operation::Delete,
            request,
        })
    }

    pub fn handle_response(&mut self, operation: Operation, response: HttpResponse) -> FormEvent {
        match operation {
            Operation::LoadPet => match self.client.parse_get_pet(response) {
                Ok(pet) => {
                    self.draft = PetDraft::from_pet(&pet);
                    self.finish_loading();
                    FormEvent::PetLoaded
                }
                Err(err) => self.load_failed(operation, &err.to_string()),
            },
            Operation::LoadUsers => match self.client.parse_list_users(response) {
                Ok(users) => {
                    self.directory = UserDirectory::from_users(users);
                    FormEvent::DirectoryLoaded
                }
                Err(err) => self.load_failed(operation, &err.to_string()),
            },
            Operation::Create | Operation::Update | Operation::Delete => {
                if !self.expecting_submission(operation) {
                    return FormEvent::Ignored;
                }
                // Any 2xx counts as saved; the body is not needed to leave the form.
                match self.client.parse_acknowledgement(response) {
                    Ok(()) => self.redirect_home(),
                    Err(err) if operation == Operation::Delete => {
                        self.delete_failed(&err.to_string())
                    }
                    Err(err) => self.reject(&err),
                }
            }
        }
    }

    /// Reports that the request for `operation` never produced a response.
    pub fn handle_transport_failure(&mut self, operation: Operation, message: &str) -> FormEvent {
        match operation {
            Operation::LoadPet | Operation::LoadUsers => self.load_failed(operation, message),
            Operation::Create | Operation::Update => {
                if !self.expecting_submission(operation) {
                    return FormEvent::Ignored;
                }
                tracing::warn!(?operation, error = message, "pet submission failed");
                self.errors = FieldErrors::new();
                self.transition(FormState::Ready);
                FormEvent::Rejected
            }
            Operation::Delete => {
                if !self.expecting_submission(operation) {
                    return FormEvent::Ignored;
                }
                self.delete_failed(message)
            }
        }
    }

    pub fn view(&self) -> FormView {
        let updating = matches!(self.mode, FormMode::Update { .. });
        FormView {
            name: self.draft.name.clone(),
            kind: self.draft.kind.clone(),
            owner: self.draft.owner.clone(),
            owner_options: self.directory.options(&self.draft.owner),
            errors: self.errors.clone(),
            submit_label: if updating { "Edit" } else { "Add" },
            show_delete: updating,
        }
    }

    fn ensure_ready(&self) -> Result<(), FormError> {
        match self.state {
            FormState::Ready => Ok(()),
            FormState::Loading => Err(FormError::NotReady),
            FormState::Submitting => Err(FormError::SubmissionInFlight),
            FormState::Redirected => Err(FormError::Redirected),
        }
    }

    fn expecting_submission(&self, operation: Operation) -> bool {
        if self.state == FormState::Submitting && self.in_flight == Some(operation) {
            return true;
        }
        tracing::warn!(
            ?operation,
            in_flight = ?self.in_flight,
            state = ?self.state,
            "dropping unexpected submission response"
        );
        false
    }

    fn start_submission(&mut self, operation: Operation) {
        self.transition(FormState::Submitting);
        self.in_flight = Some(operation);
    }

    fn transition(&mut self, next: FormState) {
        tracing::debug!(from = ?self.state, to = ?next, "pet form transition");
        self.state = next;
        if next != FormState::Submitting {
            self.in_flight = None;
        }
    }

    fn finish_loading(&mut self) {
        if self.state == FormState::Loading {
            self.transition(FormState::Ready);
        }
    }

    fn load_failed(&mut self, operation: Operation, message: &str) -> FormEvent {
        tracing::warn!(?operation, error = message, "pet form load failed");
        if operation == Operation::LoadPet {
            self.finish_loading();
        }
        FormEvent::LoadFailed(operation)
    }

    fn redirect_home(&mut self) -> FormEvent {
        self.transition(FormState::Redirected);
        FormEvent::Navigate(Navigation::Home)
    }

    fn reject(&mut self, err: &ApiError) -> FormEvent {
        tracing::warn!(error = %err, "pet submission rejected");
        self.errors = err
            .body()
            .map(FieldErrors::from_failure_body)
            .unwrap_or_default();
        self.transition(FormState::Ready);
        FormEvent::Rejected
    }

    fn delete_failed(&mut self, message: &str) -> FormEvent {
        tracing::warn!(error = message, "pet delete failed");
        self.transition(FormState::Ready);
        FormEvent::DeleteFailed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::OWNER_PLACEHOLDER;
    use crate::http::HttpMethod;
    use crate::validation::OWNER_REQUIRED_MESSAGE;

    const PET: &str =
        r#"{"_id":"p1","name":"Rex","type":"dog","owner":{"_id":"u2","first_name":"Will","last_name":"Smith"}}"#;
    const USERS: &str =
        r#"[{"_id":"u2","first_name":"Will","last_name":"Smith"},{"_id":"u1","first_name":"Amy","last_name":"Adams"}]"#;

    fn create_form() -> PetForm {
        PetForm::new(PetsClient::new("http://api"), FormMode::Create)
    }

    fn update_form() -> PetForm {
        PetForm::new(
            PetsClient::new("http://api"),
            FormMode::Update {
                pet_id: "p1".to_string(),
            },
        )
    }

    fn loaded_update_form() -> PetForm {
        let mut form = update_form();
        form.handle_response(Operation::LoadPet, HttpResponse::new(200, PET));
        form
    }

    #[test]
    fn create_mode_only_loads_directory() {
        let form = create_form();
        assert_eq!(form.state(), FormState::Ready);
        let outgoing = form.initialize();
        assert_eq!(outgoing.len(), 1);
        assert_eq!(outgoing[0].operation, Operation::LoadUsers);
        assert_eq!(outgoing[0].request.path, "http://api/api/users");
    }

    #[test]
    fn update_mode_loads_record_and_directory() {
        let form = update_form();
        assert_eq!(form.state(), FormState::Loading);
        let ops: Vec<_> = form.initialize().into_iter().map(|o| o.operation).collect();
        assert_eq!(ops, [Operation::LoadPet, Operation::LoadUsers]);
    }

    #[test]
    fn loaded_record_owner_is_the_embedded_id() {
        let form = loaded_update_form();
        assert_eq!(form.state(), FormState::Ready);
        assert_eq!(form.draft(), &PetDraft::new("Rex", "dog", "u2"));
    }

    #[test]
    fn loads_tolerate_either_order() {
        let mut users_first = update_form();
        users_first.handle_response(Operation::LoadUsers, HttpResponse::new(200, USERS));
        users_first.handle_response(Operation::LoadPet, HttpResponse::new(200, PET));

        let mut pet_first = update_form();
        pet_first.handle_response(Operation::LoadPet, HttpResponse::new(200, PET));
        pet_first.handle_response(Operation::LoadUsers, HttpResponse::new(200, USERS));

        assert_eq!(users_first.view(), pet_first.view());
        assert_eq!(users_first.state(), FormState::Ready);
    }

    #[test]
    fn failed_record_load_leaves_form_interactive() {
        let mut form = update_form();
        let event = form.handle_response(Operation::LoadPet, HttpResponse::new(404, ""));
        assert_eq!(event, FormEvent::LoadFailed(Operation::LoadPet));
        assert_eq!(form.state(), FormState::Ready);
        assert_eq!(form.draft(), &PetDraft::default());

        form.on_field_change(Field::Name, "Rex");
        assert!(form.submit().is_ok());
    }

    #[test]
    fn failed_directory_load_offers_only_placeholder() {
        let mut form = create_form();
        let event = form.handle_transport_failure(Operation::LoadUsers, "connection refused");
        assert_eq!(event, FormEvent::LoadFailed(Operation::LoadUsers));
        let options = form.view().owner_options;
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].label, OWNER_PLACEHOLDER);
    }

    #[test]
    fn directory_options_are_sorted_by_surname() {
        let mut form = create_form();
        assert_eq!(
            form.handle_response(Operation::LoadUsers, HttpResponse::new(200, USERS)),
            FormEvent::DirectoryLoaded
        );
        let labels: Vec<_> = form.view().owner_options.into_iter().map(|o| o.label).collect();
        assert_eq!(labels, [OWNER_PLACEHOLDER, "Amy Adams", "Will Smith"]);
    }

    #[test]
    fn field_changes_keep_other_fields() {
        let mut form = loaded_update_form();
        form.on_field_change(Field::Name, "Max");
        form.on_input("owner", "u1").unwrap();
        assert_eq!(form.draft(), &PetDraft::new("Max", "dog", "u1"));
    }

    #[test]
    fn unknown_input_name_is_rejected() {
        let mut form = create_form();
        assert_eq!(
            form.on_input("age", "3"),
            Err(FormError::UnknownField("age".to_string()))
        );
        assert_eq!(form.draft(), &PetDraft::default());
    }

    #[test]
    fn create_submit_posts_draft() {
        let mut form = create_form();
        form.on_field_change(Field::Name, "Rex");
        let outgoing = form.submit().unwrap();
        assert_eq!(outgoing.operation, Operation::Create);
        assert_eq!(outgoing.request.method, HttpMethod::Post);
        assert_eq!(outgoing.request.path, "http://api/api/pets");
        assert_eq!(form.state(), FormState::Submitting);
    }

    #[test]
    fn update_submit_puts_to_record() {
        let mut form = loaded_update_form();
        let outgoing = form.submit().unwrap();
        assert_eq!(outgoing.operation, Operation::Update);
        assert_eq!(outgoing.request.method, HttpMethod::Put);
        assert_eq!(outgoing.request.path, "http://api/api/pets/p1");
    }

    #[test]
    fn submit_rejected_while_loading_or_in_flight() {
        let mut form = update_form();
        assert_eq!(form.submit(), Err(FormError::NotReady));

        let mut form = create_form();
        form.submit().unwrap();
        assert_eq!(form.submit(), Err(FormError::SubmissionInFlight));
    }

    #[test]
    fn successful_submit_navigates_home_without_touching_errors() {
        let mut form = create_form();
        form.submit().unwrap();
        form.handle_response(
            Operation::Create,
            HttpResponse::new(
                422,
                r#"{"errors":{"errors":{"name":{"message":"Name is required"}}}}"#,
            ),
        );
        let before = form.errors().clone();
        assert_eq!(before.get(Field::Name), Some("Name is required"));

        form.on_field_change(Field::Name, "Rex");
        form.submit().unwrap();
        let event = form.handle_response(
            Operation::Create,
            HttpResponse::new(201, r#"{"_id":"p9","name":"Rex","type":"dog","owner":"u1"}"#),
        );
        assert_eq!(event, FormEvent::Navigate(Navigation::Home));
        assert_eq!(form.state(), FormState::Redirected);
        assert_eq!(form.errors(), &before);
        assert_eq!(form.submit(), Err(FormError::Redirected));
    }

    #[test]
    fn rejection_replaces_error_map() {
        let mut form = create_form();
        form.submit().unwrap();
        form.handle_response(
            Operation::Create,
            HttpResponse::new(
                422,
                r#"{"errors":{"errors":{"name":{"message":"Name is required"},"owner":{"message":"Required"}}}}"#,
            ),
        );
        assert_eq!(form.errors().get(Field::Owner), Some(OWNER_REQUIRED_MESSAGE));
        assert_eq!(form.state(), FormState::Ready);

        form.submit().unwrap();
        let event = form.handle_response(
            Operation::Create,
            HttpResponse::new(
                422,
                r#"{"errors":{"errors":{"type":{"message":"Type is required"}}}}"#,
            ),
        );
        assert_eq!(event, FormEvent::Rejected);
        let expected: FieldErrors = [(Field::Type, "Type is required".to_string())]
            .into_iter()
            .collect();
        assert_eq!(form.errors(), &expected);
    }

    #[test]
    fn unexpected_failures_clear_errors() {
        let mut form = create_form();
        form.submit().unwrap();
        form.handle_response(
            Operation::Create,
            HttpResponse::new(422, r#"{"errors":{"errors":{"name":{"message":"x"}}}}"#),
        );
        form.submit().unwrap();
        assert_eq!(
            form.handle_response(Operation::Create, HttpResponse::new(500, "oops")),
            FormEvent::Rejected
        );
        assert!(form.errors().is_empty());

        form.submit().unwrap();
        assert_eq!(
            form.handle_transport_failure(Operation::Create, "timed out"),
            FormEvent::Rejected
        );
        assert_eq!(form.state(), FormState::Ready);
    }

    #[test]
    fn stray_submission_response_is_ignored() {
        let mut form = create_form();
        let event = form.handle_response(Operation::Create, HttpResponse::new(201, "{}"));
        assert_eq!(event, FormEvent::Ignored);
        assert_eq!(form.state(), FormState::Ready);
    }

    #[test]
    fn any_2xx_submission_navigates_home() {
        let mut form = loaded_update_form();
        form.submit().unwrap();
        assert_eq!(
            form.handle_response(Operation::Update, HttpResponse::new(204, "")),
            FormEvent::Navigate(Navigation::Home)
        );
        assert_eq!(form.state(), FormState::Redirected);

        let mut form = create_form();
        form.submit().unwrap();
        assert_eq!(
            form.handle_response(Operation::Create, HttpResponse::new(201, "{}")),
            FormEvent::Navigate(Navigation::Home)
        );

        let mut form = create_form();
        form.submit().unwrap();
        assert_eq!(
            form.handle_response(
                Operation::Create,
                HttpResponse::new(200, r#"{"acknowledged":true}"#)
            ),
            FormEvent::Navigate(Navigation::Home)
        );
    }

    #[test]
    fn response_for_another_operation_is_ignored() {
        let mut form = loaded_update_form();
        form.submit().unwrap();
        assert_eq!(
            form.handle_response(Operation::Delete, HttpResponse::new(204, "")),
            FormEvent::Ignored
        );
        assert_eq!(
            form.handle_response(Operation::Create, HttpResponse::new(201, "{}")),
            FormEvent::Ignored
        );
        assert_eq!(form.handle_transport_failure(Operation::Delete, "reset"), FormEvent::Ignored);
        assert_eq!(form.state(), FormState::Submitting);

        assert_eq!(
            form.handle_response(Operation::Update, HttpResponse::new(200, "{}")),
            FormEvent::Navigate(Navigation::Home)
        );
    }

    #[test]
    fn settled_submission_does_not_accept_a_second_answer() {
        let mut form = create_form();
        form.submit().unwrap();
        form.handle_response(Operation::Create, HttpResponse::new(422, "{}"));
        assert_eq!(
            form.handle_response(Operation::Create, HttpResponse::new(201, "{}")),
            FormEvent::Ignored
        );
        assert_eq!(form.state(), FormState::Ready);
    }

    #[test]
    fn delete_only_in_update_mode() {
        let mut form = create_form();
        assert_eq!(form.delete(), Err(FormError::DeleteUnavailable));
        assert!(!form.view().show_delete);
        assert_eq!(form.view().submit_label, "Add");
    }

    #[test]
    fn delete_navigates_home() {
        let mut form = loaded_update_form();
        let view = form.view();
        assert!(view.show_delete);
        assert_eq!(view.submit_label, "Edit");

        let outgoing = form.delete().unwrap();
        assert_eq!(outgoing.request.method, HttpMethod::Delete);
        assert_eq!(outgoing.request.path, "http://api/api/pets/p1");
        assert_eq!(
            form.handle_response(Operation::Delete, HttpResponse::new(204, "")),
            FormEvent::Navigate(Navigation::Home)
        );
        assert_eq!(Navigation::Home.path(), "/");
    }

    #[test]
    fn failed_delete_returns_to_ready() {
        let mut form = loaded_update_form();
        form.delete().unwrap();
        assert_eq!(
            form.handle_response(Operation::Delete, HttpResponse::new(404, "")),
            FormEvent::DeleteFailed
        );
        assert_eq!(form.state(), FormState::Ready);
        assert_eq!(form.draft().name, "Rex");
    }

    #[test]
    fn view_hides_placeholder_once_owner_selected() {
        let mut form = create_form();
        form.handle_response(Operation::LoadUsers, HttpResponse::new(200, USERS));
        form.on_field_change(Field::Owner, "u1");
        let view = form.view();
        assert_eq!(view.owner, "u1");
        assert!(view.owner_options.iter().all(|o| !o.value.is_empty()));
        assert_eq!(view.error(Field::Owner), None);
    }
}
