//! End-to-end workflow behaviour against the in-memory store.

use estagios_vagas::{
    Action, Field, MemoryStore, Posting, PostingFields, PostingId, RecordStore, Request,
    StoreError, Submission, Transition, View, WorkflowController,
};

fn vaga(descricao: &str) -> Submission {
    Submission::new()
        .with("titulo", "Suporte Júnior")
        .with("empresa", "Google")
        .with("telefone", "19-98888-7777")
        .with("email", "suporte@google.com")
        .with("descricao", descricao)
}

fn controller_with(submissions: &[Submission]) -> WorkflowController<MemoryStore> {
    let mut controller = WorkflowController::new(MemoryStore::new());
    for submission in submissions {
        let transition = controller
            .handle(Request::submit(Action::Create).with_submission(submission.clone()))
            .unwrap();
        assert_eq!(transition, Transition::Redirect(Action::List));
    }
    controller
}

fn first(controller: &WorkflowController<MemoryStore>) -> Posting {
    controller.store().fetch_all().unwrap().remove(0)
}

#[test]
fn create_persists_normalized_posting_and_lists_it() {
    let mut controller = WorkflowController::new(MemoryStore::new());
    let submission = Submission::new()
        .with("titulo", "Suporte Júnior")
        .with("empresa", "Google")
        .with("telefone", "1999998888")
        .with("email", "suporte@junior.com")
        .with("descricao", "vaga para desenvolvedor");

    let view = controller
        .dispatch(Request::submit(Action::Create).with_submission(submission))
        .unwrap();

    let View::List { postings } = view else {
        panic!("expected list view");
    };
    assert_eq!(postings.len(), 1);
    assert_eq!(postings[0].fields.titulo, "SUPORTE JÚNIOR");
    assert_eq!(postings[0].fields.empresa, "Google");
    assert_eq!(postings[0].to_string(), "SUPORTE JÚNIOR");
}

#[test]
fn create_rejection_writes_nothing() {
    let mut controller = WorkflowController::new(MemoryStore::new());
    let submission = Submission::new()
        .with("titulo", "Suporte Júnior")
        .with("empresa", "XP")
        .with("telefone", "9988887777")
        .with("email", "suporte@xpinvestimento.com")
        .with("descricao", "vaga para CEO Araras");

    let view = controller
        .dispatch(Request::submit(Action::Create).with_submission(submission))
        .unwrap();

    assert_eq!(view.name(), "create");
    let errors = &view.form().unwrap().errors;
    assert_eq!(errors.fields().collect::<Vec<_>>(), [Field::Telefone]);
    assert!(controller.store().is_empty());
}

#[test]
fn create_rejects_titles_that_grow_past_the_limit() {
    let mut controller = WorkflowController::new(MemoryStore::new());
    let submission = vaga("vaga da empresa google").with("titulo", "ß".repeat(150));

    let view = controller
        .dispatch(Request::submit(Action::Create).with_submission(submission))
        .unwrap();

    assert_eq!(view.name(), "create");
    let errors = &view.form().unwrap().errors;
    assert_eq!(
        errors.get(Field::Titulo).unwrap(),
        ["Ensure this value has at most 150 characters (it has 300).".to_string()]
    );
    assert!(controller.store().is_empty());
}

#[test]
fn stored_posting_resubmits_unchanged() {
    let submission = vaga("vaga da empresa google").with("titulo", "ß".repeat(75));
    let mut controller = controller_with(&[submission]);
    let stored = first(&controller);
    assert_eq!(stored.fields.titulo.chars().count(), 150);

    let transition = controller
        .handle(
            Request::submit(Action::ConfirmUpdate)
                .with_id(stored.id)
                .with_submission(Submission::from(&stored.fields)),
        )
        .unwrap();
    assert_eq!(transition, Transition::Redirect(Action::SelectForUpdate));
    assert_eq!(first(&controller), stored);
}

#[test]
fn update_flow_list_select_confirm() {
    let mut controller = controller_with(&[vaga("vaga da empresa google")]);
    let id = first(&controller).id;

    let view = controller
        .dispatch(Request::display(Action::SelectForUpdate))
        .unwrap();
    assert_eq!(view.name(), "select_update");
    assert!(!view.is_empty_state());

    let view = controller
        .dispatch(Request::submit(Action::SelectForUpdate).with_id(id))
        .unwrap();
    let View::ConfirmUpdate { posting, form } = view else {
        panic!("expected confirm view");
    };
    assert_eq!(posting.unwrap().id, id);
    assert_eq!(form.data.get("empresa"), Some("Google"));

    let edit = Submission::new()
        .with("titulo", "Suporte Sênior")
        .with("empresa", "Google Inc")
        .with("telefone", "19-98888-9999")
        .with("email", "suporte@teste.com")
        .with("descricao", "atualizando a vaga da Google");
    let view = controller
        .dispatch(
            Request::submit(Action::ConfirmUpdate)
                .with_id(id)
                .with_submission(edit),
        )
        .unwrap();
    assert_eq!(view.name(), "select_update");

    let stored = first(&controller);
    assert_eq!(stored.id, id);
    assert_eq!(stored.fields.titulo, "SUPORTE SÊNIOR");
    assert_eq!(stored.fields.empresa, "Google inc");
    assert_eq!(stored.fields.telefone, "19-98888-9999");
}

#[test]
fn rejected_update_leaves_record_untouched() {
    let mut controller = controller_with(&[vaga("vaga aberta para todos")]);
    let before = first(&controller);

    let partial = Submission::new()
        .with("telefone", "19-98888-9999")
        .with("descricao", "error");
    let view = controller
        .dispatch(
            Request::submit(Action::ConfirmUpdate)
                .with_id(before.id)
                .with_submission(partial.clone()),
        )
        .unwrap();

    let View::ConfirmUpdate { posting, form } = view else {
        panic!("expected confirm view");
    };
    assert_eq!(posting.as_ref(), Some(&before));
    assert_eq!(form.data, partial);
    for field in [Field::Titulo, Field::Empresa, Field::Email] {
        assert_eq!(form.errors.get(field).unwrap(), ["required".to_string()]);
    }
    assert!(form.errors.contains(Field::Descricao));
    assert!(!form.errors.contains(Field::Telefone));

    let after = first(&controller);
    assert_eq!(after.fields.titulo, "SUPORTE JÚNIOR");
    assert_eq!(after.fields.telefone, "19-98888-7777");
    assert_eq!(after, before);
}

#[test]
fn delete_existing_posting() {
    let mut controller = controller_with(&[vaga("vaga para todos da FATEC")]);
    let id = first(&controller).id;

    let view = controller
        .dispatch(Request::submit(Action::Delete).with_id(id))
        .unwrap();

    assert_eq!(view, View::List { postings: vec![] });
    assert!(controller.store().is_empty());
}

#[test]
fn delete_unknown_id_is_noop() {
    let mut controller = controller_with(&[vaga("vaga para todos da FATEC")]);
    let id = first(&controller).id;

    let view = controller
        .dispatch(Request::submit(Action::Delete).with_id(PostingId::new(id.value() + 1)))
        .unwrap();

    assert_eq!(view.name(), "list");
    assert_eq!(controller.store().len(), 1);
}

#[test]
fn deleted_id_is_not_resurrected() {
    let mut controller = controller_with(&[vaga("primeira vaga cadastrada")]);
    let id = first(&controller).id;
    controller
        .handle(Request::submit(Action::Delete).with_id(id))
        .unwrap();

    controller
        .handle(Request::submit(Action::Create).with_submission(vaga("segunda vaga cadastrada")))
        .unwrap();

    assert_ne!(first(&controller).id, id);
    let view = controller
        .dispatch(Request::submit(Action::List).with_id(id))
        .unwrap();
    assert!(view.is_empty_state());
}

#[test]
fn select_for_update_on_empty_store_is_empty_state() {
    let mut controller = WorkflowController::new(MemoryStore::new());

    let view = controller
        .dispatch(Request::display(Action::SelectForUpdate))
        .unwrap();
    assert!(view.is_empty_state());

    let view = controller
        .dispatch(Request::submit(Action::SelectForUpdate))
        .unwrap();
    assert_eq!(view.name(), "confirm_update");
    assert!(view.is_empty_state());
}

#[test]
fn every_action_has_a_next_state() {
    let mut controller = controller_with(&[vaga("vaga para todos da FATEC")]);
    for action in Action::ALL {
        controller.dispatch(Request::display(action)).unwrap();
        controller.dispatch(Request::submit(action)).unwrap();
    }
}

/// A store whose backend is always down.
struct UnavailableStore;

fn unavailable() -> StoreError {
    StoreError::backend(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "store unavailable",
    ))
}

impl RecordStore for UnavailableStore {
    fn create(&mut self, _fields: &PostingFields) -> Result<PostingId, StoreError> {
        Err(unavailable())
    }

    fn fetch_all(&self) -> Result<Vec<Posting>, StoreError> {
        Err(unavailable())
    }

    fn fetch_by_id(&self, _id: PostingId) -> Result<Option<Posting>, StoreError> {
        Err(unavailable())
    }

    fn update_by_id(&mut self, _id: PostingId, _fields: &PostingFields) -> Result<(), StoreError> {
        Err(unavailable())
    }

    fn delete_by_id(&mut self, _id: PostingId) -> Result<(), StoreError> {
        Err(unavailable())
    }
}

#[test]
fn backend_failures_propagate() {
    let mut controller = WorkflowController::new(UnavailableStore);

    let err = controller
        .handle(Request::submit(Action::Create).with_submission(vaga("vaga para todos da FATEC")))
        .unwrap_err();
    assert!(matches!(err, StoreError::Backend(_)));

    let err = controller
        .handle(Request::submit(Action::Delete).with_id(PostingId::new(1)))
        .unwrap_err();
    assert!(!err.is_not_found());

    // Display paths that never touch the store still work.
    assert_eq!(
        controller.dispatch(Request::display(Action::Index)).unwrap(),
        View::Index
    );
}

#[test]
fn invalid_submission_never_reaches_a_broken_store() {
    let mut controller = WorkflowController::new(UnavailableStore);
    let view = controller
        .dispatch(Request::submit(Action::Create).with_submission(Submission::new()))
        .unwrap();
    assert_eq!(view.form().unwrap().errors.len(), 5);
}
