//! Posting workflow controller.
//!
//! Every [`Action`] has a display path, which never mutates, and a submit
//! path, which may. [`WorkflowController::handle`] maps each request to
//! exactly one [`Transition`]: render a [`View`] now, or redirect to the
//! display path of another action after a successful mutation.
//!
//! Validation failures and unknown ids are always recovered here. Only
//! [`StoreError::Backend`] escapes to the caller.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::form::{BoundForm, PostingForm, Submission};
use crate::posting::{Posting, PostingId};
use crate::store::{RecordStore, StoreError};

/// Message shown when there is no posting to display.
pub const EMPTY_STATE: &str = "Nenhuma vaga cadastrada";

/// External actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Landing page.
    Index,
    /// All postings; submit with an id shows one posting in detail.
    List,
    Create,
    /// First step of an edit: pick the posting to change.
    SelectForUpdate,
    /// Second step of an edit: submit the replacement fields.
    ConfirmUpdate,
    Delete,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Index,
        Action::List,
        Action::Create,
        Action::SelectForUpdate,
        Action::ConfirmUpdate,
        Action::Delete,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::List => "list",
            Self::Create => "create",
            Self::SelectForUpdate => "select_for_update",
            Self::ConfirmUpdate => "confirm_update",
            Self::Delete => "delete",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether a request only shows state or attempts a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Display,
    Submit,
}

/// An incoming action with its optional id and field input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub action: Action,
    pub mode: Mode,
    pub id: Option<PostingId>,
    pub submission: Submission,
}

impl Request {
    pub fn display(action: Action) -> Self {
        Self {
            action,
            mode: Mode::Display,
            id: None,
            submission: Submission::new(),
        }
    }

    pub fn submit(action: Action) -> Self {
        Self {
            mode: Mode::Submit,
            ..Self::display(action)
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: PostingId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn with_submission(mut self, submission: Submission) -> Self {
        self.submission = submission;
        self
    }
}

/// What the presentation layer should show, with the data it needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    Index,

    List {
        postings: Vec<Posting>,
    },

    /// One posting, or the empty state when none applies.
    Detail {
        posting: Option<Posting>,
    },

    Create {
        form: BoundForm,
    },

    SelectUpdate {
        postings: Vec<Posting>,
    },

    /// Edit form. On a rejected edit `posting` holds the stored, unmodified
    /// record while `form` holds what was submitted and why it failed.
    ConfirmUpdate {
        posting: Option<Posting>,
        form: BoundForm,
    },

    /// Delete confirmation prompt.
    Delete {
        postings: Vec<Posting>,
    },
}

impl View {
    /// Stable view identifier.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::List { .. } => "list",
            Self::Detail { .. } => "detail",
            Self::Create { .. } => "create",
            Self::SelectUpdate { .. } => "select_update",
            Self::ConfirmUpdate { .. } => "confirm_update",
            Self::Delete { .. } => "delete",
        }
    }

    /// True when the view has no posting to show.
    pub fn is_empty_state(&self) -> bool {
        match self {
            Self::Index | Self::Create { .. } => false,
            Self::List { postings } | Self::SelectUpdate { postings } | Self::Delete { postings } => {
                postings.is_empty()
            }
            Self::Detail { posting } | Self::ConfirmUpdate { posting, .. } => posting.is_none(),
        }
    }

    /// The view's form, if it has one.
    pub fn form(&self) -> Option<&BoundForm> {
        match self {
            Self::Create { form } | Self::ConfirmUpdate { form, .. } => Some(form),
            _ => None,
        }
    }

    fn empty_confirm_update() -> Self {
        Self::ConfirmUpdate {
            posting: None,
            form: BoundForm::unbound(),
        }
    }
}

/// Next state after handling a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Render(View),

    /// A mutation succeeded; show the display path of this action.
    Redirect(Action),
}

/// Routes requests to validation and the record store.
pub struct WorkflowController<S> {
    store: S,
}

impl<S: RecordStore> WorkflowController<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Handle one request and follow any redirect to its final view.
    pub fn dispatch(&mut self, request: Request) -> Result<View, StoreError> {
        let mut request = request;
        loop {
            match self.handle(request)? {
                Transition::Render(view) => return Ok(view),
                Transition::Redirect(target) => request = Request::display(target),
            }
        }
    }

    /// Handle one request.
    pub fn handle(&mut self, request: Request) -> Result<Transition, StoreError> {
        let Request {
            action,
            mode,
            id,
            submission,
        } = request;
        debug!(action = %action, ?mode, posting_id = ?id, "Handling request");

        match (action, mode) {
            (Action::Index, Mode::Display) => Ok(Transition::Render(View::Index)),
            (Action::Index, Mode::Submit) => Ok(Transition::Redirect(Action::Index)),

            (Action::List, Mode::Display) => Ok(Transition::Render(View::List {
                postings: self.store.fetch_all()?,
            })),
            (Action::List, Mode::Submit) => Ok(Transition::Render(View::Detail {
                posting: self.find(id)?,
            })),

            (Action::Create, Mode::Display) => Ok(Transition::Render(View::Create {
                form: BoundForm::unbound(),
            })),
            (Action::Create, Mode::Submit) => self.create(submission),

            (Action::SelectForUpdate, Mode::Display) => Ok(Transition::Render(View::SelectUpdate {
                postings: self.store.fetch_all()?,
            })),
            (Action::SelectForUpdate, Mode::Submit) => self.select_for_update(id),

            (Action::ConfirmUpdate, Mode::Display) => Ok(Transition::Redirect(Action::Index)),
            (Action::ConfirmUpdate, Mode::Submit) => self.confirm_update(id, submission),

            (Action::Delete, Mode::Display) => Ok(Transition::Render(View::Delete {
                postings: self.store.fetch_all()?,
            })),
            (Action::Delete, Mode::Submit) => self.delete(id),
        }
    }

    fn create(&mut self, submission: Submission) -> Result<Transition, StoreError> {
        match PostingForm::validate(&submission) {
            Ok(fields) => {
                let id = self.store.create(&fields)?;
                info!(posting_id = %id, titulo = %fields.titulo, "Posting created");
                Ok(Transition::Redirect(Action::List))
            }
            Err(errors) => {
                info!(failing_fields = errors.len(), "Posting rejected");
                Ok(Transition::Render(View::Create {
                    form: BoundForm::bound(submission, errors),
                }))
            }
        }
    }

    fn select_for_update(&mut self, id: Option<PostingId>) -> Result<Transition, StoreError> {
        let view = match self.find(id)? {
            Some(posting) => View::ConfirmUpdate {
                form: BoundForm::prefilled(&posting.fields),
                posting: Some(posting),
            },
            None => View::empty_confirm_update(),
        };
        Ok(Transition::Render(view))
    }

    fn confirm_update(
        &mut self,
        id: Option<PostingId>,
        submission: Submission,
    ) -> Result<Transition, StoreError> {
        let Some(original) = self.find(id)? else {
            return Ok(Transition::Render(View::empty_confirm_update()));
        };

        let fields = match PostingForm::validate(&submission) {
            Ok(fields) => fields,
            Err(errors) => {
                info!(
                    posting_id = %original.id,
                    failing_fields = errors.len(),
                    "Posting update rejected"
                );
                return Ok(Transition::Render(View::ConfirmUpdate {
                    posting: Some(original),
                    form: BoundForm::bound(submission, errors),
                }));
            }
        };

        match self.store.update_by_id(original.id, &fields) {
            Ok(()) => {
                info!(posting_id = %original.id, "Posting updated");
                Ok(Transition::Redirect(Action::SelectForUpdate))
            }
            Err(StoreError::NotFound(id)) => {
                warn!(posting_id = %id, "Posting disappeared before update");
                Ok(Transition::Render(View::empty_confirm_update()))
            }
            Err(e) => Err(e),
        }
    }

    fn delete(&mut self, id: Option<PostingId>) -> Result<Transition, StoreError> {
        match id {
            Some(id) => match self.store.delete_by_id(id) {
                Ok(()) => info!(posting_id = %id, "Posting deleted"),
                Err(StoreError::NotFound(_)) => {
                    warn!(posting_id = %id, "Delete of unknown posting ignored")
                }
                Err(e) => return Err(e),
            },
            None => debug!("Delete submitted without a posting id"),
        }
        Ok(Transition::Redirect(Action::List))
    }

    fn find(&self, id: Option<PostingId>) -> Result<Option<Posting>, StoreError> {
        let Some(id) = id else {
            debug!("No posting id submitted");
            return Ok(None);
        };

        let posting = self.store.fetch_by_id(id)?;
        if posting.is_none() {
            warn!(posting_id = %id, "Posting not found");
        }
        Ok(posting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;
    use crate::store::MemoryStore;

    fn submission() -> Submission {
        Submission::new()
            .with("titulo", "Suporte Júnior")
            .with("empresa", "Google")
            .with("telefone", "19-98888-7777")
            .with("email", "suporte@junior.com")
            .with("descricao", "vaga para desenvolvedor")
    }

    fn seeded() -> (WorkflowController<MemoryStore>, PostingId) {
        let mut controller = WorkflowController::new(MemoryStore::new());
        controller
            .handle(Request::submit(Action::Create).with_submission(submission()))
            .unwrap();
        let id = controller.store().fetch_all().unwrap()[0].id;
        (controller, id)
    }

    #[test]
    fn test_create_display_is_unbound() {
        let mut controller = WorkflowController::new(MemoryStore::new());
        let view = controller.dispatch(Request::display(Action::Create)).unwrap();
        let form = view.form().unwrap();
        assert!(form.data.is_empty());
        assert!(form.is_valid());
        assert_eq!(form.fields.len(), 5);
    }

    #[test]
    fn test_create_success_redirects_to_list() {
        let mut controller = WorkflowController::new(MemoryStore::new());
        let transition = controller
            .handle(Request::submit(Action::Create).with_submission(submission()))
            .unwrap();
        assert_eq!(transition, Transition::Redirect(Action::List));
        assert_eq!(controller.store().len(), 1);
    }

    #[test]
    fn test_create_failure_keeps_values_and_errors() {
        let mut controller = WorkflowController::new(MemoryStore::new());
        let bad = submission().with("empresa", "X");
        let view = controller
            .dispatch(Request::submit(Action::Create).with_submission(bad.clone()))
            .unwrap();

        assert_eq!(view.name(), "create");
        let form = view.form().unwrap();
        assert_eq!(form.data, bad);
        assert!(form.errors.contains(Field::Empresa));
        assert!(controller.store().is_empty());
    }

    #[test]
    fn test_list_empty_state() {
        let mut controller = WorkflowController::new(MemoryStore::new());
        let view = controller.dispatch(Request::display(Action::List)).unwrap();
        assert_eq!(view, View::List { postings: vec![] });
        assert!(view.is_empty_state());
    }

    #[test]
    fn test_detail_by_id() {
        let (mut controller, id) = seeded();
        let view = controller
            .dispatch(Request::submit(Action::List).with_id(id))
            .unwrap();
        match view {
            View::Detail { posting: Some(posting) } => assert_eq!(posting.fields.empresa, "Google"),
            other => panic!("unexpected view: {other:?}"),
        }
    }

    #[test]
    fn test_detail_without_id_is_empty_state() {
        let (mut controller, _) = seeded();
        let view = controller.dispatch(Request::submit(Action::List)).unwrap();
        assert_eq!(view, View::Detail { posting: None });
        assert!(view.is_empty_state());
    }

    #[test]
    fn test_select_for_update_prefills_form() {
        let (mut controller, id) = seeded();
        let view = controller
            .dispatch(Request::submit(Action::SelectForUpdate).with_id(id))
            .unwrap();
        assert!(!view.is_empty_state());
        assert_eq!(view.form().unwrap().data.get("titulo"), Some("SUPORTE JÚNIOR"));
    }

    #[test]
    fn test_select_for_update_unknown_id_is_empty_state() {
        let (mut controller, _) = seeded();
        let view = controller
            .dispatch(Request::submit(Action::SelectForUpdate).with_id(PostingId::new(404)))
            .unwrap();
        assert_eq!(view.name(), "confirm_update");
        assert!(view.is_empty_state());
    }

    #[test]
    fn test_confirm_update_success_redirects_to_select() {
        let (mut controller, id) = seeded();
        let edit = submission()
            .with("titulo", "Suporte Sênior")
            .with("telefone", "19-98888-9999");
        let transition = controller
            .handle(Request::submit(Action::ConfirmUpdate).with_id(id).with_submission(edit))
            .unwrap();
        assert_eq!(transition, Transition::Redirect(Action::SelectForUpdate));

        let stored = controller.store().fetch_by_id(id).unwrap().unwrap();
        assert_eq!(stored.fields.titulo, "SUPORTE SÊNIOR");
        assert_eq!(stored.fields.telefone, "19-98888-9999");
    }

    #[test]
    fn test_confirm_update_unknown_id_is_empty_state() {
        let (mut controller, _) = seeded();
        let view = controller
            .dispatch(
                Request::submit(Action::ConfirmUpdate)
                    .with_id(PostingId::new(2))
                    .with_submission(submission()),
            )
            .unwrap();
        assert!(view.is_empty_state());
        assert_eq!(controller.store().fetch_all().unwrap()[0].fields.titulo, "SUPORTE JÚNIOR");
    }

    #[test]
    fn test_confirm_update_display_redirects_to_index() {
        let mut controller = WorkflowController::new(MemoryStore::new());
        assert_eq!(
            controller.handle(Request::display(Action::ConfirmUpdate)).unwrap(),
            Transition::Redirect(Action::Index)
        );
        assert_eq!(
            controller.dispatch(Request::display(Action::ConfirmUpdate)).unwrap(),
            View::Index
        );
    }

    #[test]
    fn test_index_submit_redirects_to_itself() {
        let mut controller = WorkflowController::new(MemoryStore::new());
        assert_eq!(
            controller.handle(Request::submit(Action::Index)).unwrap(),
            Transition::Redirect(Action::Index)
        );
    }

    #[test]
    fn test_delete_without_id_is_noop() {
        let (mut controller, _) = seeded();
        let view = controller.dispatch(Request::submit(Action::Delete)).unwrap();
        assert_eq!(view.name(), "list");
        assert_eq!(controller.store().len(), 1);
    }

    #[test]
    fn test_view_serializes_with_tag() {
        let json = serde_json::to_value(View::Detail { posting: None }).unwrap();
        assert_eq!(json["view"], "detail");
        assert!(json["posting"].is_null());
    }
}
