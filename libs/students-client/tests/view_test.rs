//! The form/list view driven end to end against a real students schema on a
//! fresh in-memory database.

mod common;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use api_ingress::{ApiIngress, ApiIngressConfig};
use common::{create_test_module, create_test_view, SchemaTransport};
use students::{config::StudentsConfig, Students};
use students_client::{
    EditBuffer, Field, FormMode, HttpTransport, ListState, StudentsStore, StudentsView, Submission,
};

fn fill(view: &mut StudentsView, user: &str, first: &str, last: &str, email: &str) {
    view.set_field(Field::UserName, user);
    view.set_field(Field::FirstName, first);
    view.set_field(Field::LastName, last);
    view.set_field(Field::Email, email);
}

#[tokio::test]
async fn render_reflects_list_state() {
    let (view, _) = create_test_view().await;
    assert_eq!(view.render(), "Loading...");

    view.refresh().await.unwrap();
    let text = view.render();
    assert!(text.starts_with("Students"));
    assert!(text.contains("  Username: \n"));
    assert!(!text.contains("1. Name:"));
}

#[tokio::test]
async fn create_edit_delete_scenario() {
    let (mut view, transport) = create_test_view().await;
    view.refresh().await.unwrap();

    fill(&mut view, "asmith", "Ann", "Smith", "a@x.io");
    let created = match view.submit().await.unwrap() {
        Submission::Created(s) => s,
        other => panic!("expected a create, got {other:?}"),
    };
    assert_eq!(view.buffer().mode, FormMode::Create);
    assert_eq!(view.buffer().user_name, "");

    let list = view.store().state();
    assert_eq!(list.students().unwrap(), &[created.clone()]);
    let text = view.render();
    assert!(text.contains("1. Name: Ann Smith"), "{text}");
    assert!(text.contains("Username: asmith"));
    assert!(text.contains("Email: a@x.io"));

    let first = view.student_at(1).unwrap();
    view.edit(&first);
    assert_eq!(view.buffer().mode, FormMode::Update { id: created.id.clone() });
    assert!(view.render().contains(&format!("Editing {}", created.id)));

    view.set_field(Field::UserName, "asmith2");
    let updated = match view.submit().await.unwrap() {
        Submission::Updated(Some(s)) => s,
        other => panic!("expected an update, got {other:?}"),
    };
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.user_name, "asmith2");
    assert_eq!(updated.first_name, "Ann");
    assert_eq!(view.buffer().mode, FormMode::Create);
    assert_eq!(view.student_at(1).unwrap().user_name, "asmith2");

    let calls_before = transport.calls();
    let deleted = view.delete(&view.student_at(1).unwrap()).await.unwrap();
    assert_eq!(deleted.map(|s| s.id), Some(created.id));
    // One mutation plus the refetch that follows it.
    assert_eq!(transport.calls(), calls_before + 2);
    assert_eq!(view.store().state(), ListState::Loaded(vec![]));
}

#[tokio::test]
async fn incomplete_form_sends_nothing() {
    let (mut view, transport) = create_test_view().await;

    fill(&mut view, "asmith", "Ann", "Smith", "");
    assert_eq!(view.submit().await.unwrap(), Submission::Rejected);

    view.set_field(Field::Email, "   ");
    assert_eq!(view.submit().await.unwrap(), Submission::Rejected);

    assert_eq!(transport.calls(), 0);
    // A rejected submit keeps what was typed.
    assert_eq!(view.buffer().user_name, "asmith");
}

#[tokio::test]
async fn each_successful_mutation_refetches_once() {
    let (mut view, transport) = create_test_view().await;

    fill(&mut view, "a", "A", "One", "a@x.io");
    view.submit().await.unwrap();
    assert_eq!(transport.calls(), 2);

    fill(&mut view, "b", "B", "Two", "b@x.io");
    view.submit().await.unwrap();
    assert_eq!(transport.calls(), 4);

    let names: Vec<_> = view
        .store()
        .state()
        .students()
        .unwrap()
        .iter()
        .map(|s| s.user_name.clone())
        .collect();
    assert_eq!(names, ["a", "b"]);
}

#[tokio::test]
async fn submitted_values_are_stored_as_typed() {
    let (mut view, _) = create_test_view().await;
    fill(&mut view, "asmith", "  Ann Marie ", "Smith", "a@x.io ");
    let created = match view.submit().await.unwrap() {
        Submission::Created(s) => s,
        other => panic!("expected a create, got {other:?}"),
    };
    assert_eq!(created.first_name, "  Ann Marie ");
    assert_eq!(created.email, "a@x.io ");

    let listed = view.student_at(1).unwrap();
    assert_eq!(listed.first_name, "  Ann Marie ");
    assert_eq!(listed.email, "a@x.io ");
}

#[tokio::test]
async fn list_after_adds_and_deletes_holds_the_survivors() {
    let (mut view, _) = create_test_view().await;
    let mut created = Vec::new();
    for n in 1..=5 {
        fill(&mut view, &format!("user{n}"), "First", "Last", "e@x.io");
        match view.submit().await.unwrap() {
            Submission::Created(s) => created.push(s),
            other => panic!("expected a create, got {other:?}"),
        }
    }

    // Positions shift after each delete, so remove #4 before #2.
    for n in [4, 2] {
        let s = view.student_at(n).unwrap();
        view.delete(&s).await.unwrap();
    }

    let state = view.store().state();
    let ids: Vec<_> = state.students().unwrap().iter().map(|s| s.id.clone()).collect();
    let expected: Vec<_> = [0, 2, 4].iter().map(|&i| created[i].id.clone()).collect();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn cancel_edit_returns_to_create_mode() {
    let (mut view, _) = create_test_view().await;
    fill(&mut view, "asmith", "Ann", "Smith", "a@x.io");
    view.submit().await.unwrap();

    let s = view.student_at(1).unwrap();
    view.edit(&s);
    view.cancel_edit();
    assert_eq!(view.buffer(), &EditBuffer::default());
    assert!(view.student_at(0).is_none());
    assert!(view.student_at(2).is_none());
}

#[tokio::test]
async fn failed_submit_still_clears_buffer_and_records_error() {
    let module = Students::unavailable(StudentsConfig::default());
    let transport = SchemaTransport::new(module.schema());
    let store = Arc::new(StudentsStore::new(transport.clone()));
    let mut view = StudentsView::new(store);

    fill(&mut view, "asmith", "Ann", "Smith", "a@x.io");
    let err = view.submit().await.unwrap_err();
    assert_eq!(err.code(), Some("STORE_UNAVAILABLE"));
    assert_eq!(view.buffer().user_name, "");
    // No refetch after a failed mutation.
    assert_eq!(transport.calls(), 1);
    assert!(view.store().last_mutation_error().is_some());

    assert!(view.refresh().await.is_err());
    assert!(view.render().starts_with("Error: "));
}

#[tokio::test]
async fn update_of_vanished_record_yields_none() {
    let (mut view, _) = create_test_view().await;
    fill(&mut view, "asmith", "Ann", "Smith", "a@x.io");
    view.submit().await.unwrap();

    let s = view.student_at(1).unwrap();
    view.edit(&s);
    view.delete(&s).await.unwrap();

    assert_eq!(view.submit().await.unwrap(), Submission::Updated(None));
}

#[tokio::test]
async fn http_transport_against_live_server() {
    let module = create_test_module().await;
    let router = ApiIngress::new(ApiIngressConfig::default()).build_router(module.router());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let cancel = CancellationToken::new();
    let server = tokio::spawn(api_ingress::serve_listener(listener, router, cancel.clone()));

    let transport = Arc::new(HttpTransport::new(format!("http://{addr}/students")));
    let store = Arc::new(StudentsStore::new(transport));
    let mut view = StudentsView::new(store.clone());

    fill(&mut view, "asmith", "Ann", "Smith", "a@x.io");
    let created = match view.submit().await.unwrap() {
        Submission::Created(s) => s,
        other => panic!("expected a create, got {other:?}"),
    };
    assert_eq!(store.find(&created.id).await.unwrap(), Some(created.clone()));

    let err = store.find("not-a-uuid").await.unwrap_err();
    assert_eq!(err.code(), Some("INVALID_ID"));

    view.delete(&created).await.unwrap();
    assert_eq!(store.state(), ListState::Loaded(vec![]));

    cancel.cancel();
    server.await.unwrap().unwrap();
}
