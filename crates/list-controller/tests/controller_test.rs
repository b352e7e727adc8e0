use list_controller::{
    ControllerError, FieldError, FieldValue, FormFields, FormMode, FormRules, ListConfig,
    ListPageEvents, ListQuery, MockService, MutationKind, Notification, RecordingNotifier,
    Resource, ResourceListController, ResourceService, ResourceStore, ServiceError, SourceMode,
    StoredResource,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

// --- Test Entity ---

#[derive(Debug, Clone, PartialEq)]
struct Listing {
    id: u32,
    title: String,
    city: String,
    status: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct ListingDraft {
    title: String,
    city: String,
    status: String,
}

impl FormFields for ListingDraft {
    const FIELDS: &'static [&'static str] = &["title", "city", "status"];

    fn get(&self, field: &str) -> Option<FieldValue> {
        match field {
            "title" => Some(self.title.clone().into()),
            "city" => Some(self.city.clone().into()),
            "status" => Some(self.status.clone().into()),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: FieldValue) -> Result<(), FieldError> {
        match field {
            "title" => self.title = value.to_string(),
            "city" => self.city = value.to_string(),
            "status" => self.status = value.to_string(),
            _ => return Err(FieldError::UnknownField(field.to_string())),
        }
        Ok(())
    }
}

impl Resource for Listing {
    type Id = u32;
    type Draft = ListingDraft;

    fn id(&self) -> &u32 {
        &self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.into()),
            other => self.to_draft().get(other),
        }
    }

    fn to_draft(&self) -> ListingDraft {
        ListingDraft {
            title: self.title.clone(),
            city: self.city.clone(),
            status: self.status.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Listing rejected")]
struct ListingError;

impl StoredResource for Listing {
    type Error = ListingError;

    fn from_draft(id: u32, draft: ListingDraft) -> Result<Self, ListingError> {
        Ok(Self {
            id,
            title: draft.title,
            city: draft.city,
            status: draft.status,
        })
    }

    fn apply_draft(&mut self, draft: ListingDraft) -> Result<(), ListingError> {
        self.title = draft.title;
        self.city = draft.city;
        self.status = draft.status;
        Ok(())
    }
}

// --- Helpers ---

fn listing(id: u32, title: &str, status: &str) -> Listing {
    Listing {
        id,
        title: title.to_string(),
        city: "Dubai".to_string(),
        status: status.to_string(),
    }
}

fn draft(title: &str, status: &str) -> ListingDraft {
    ListingDraft {
        title: title.to_string(),
        city: "Dubai".to_string(),
        status: status.to_string(),
    }
}

fn listings(count: u32) -> Vec<Listing> {
    (1..=count)
        .map(|id| listing(id, &format!("Unit {id}"), "ACTIVE"))
        .collect()
}

fn controller(
    service: Arc<dyn ResourceService<Listing>>,
    notifier: Arc<RecordingNotifier>,
) -> ResourceListController<Listing> {
    ResourceListController::new(
        "listings",
        service,
        ListConfig::searching(["title", "city"]).with_remote_filter("status"),
        FormRules::new().required("title").length("title", 3, 40),
    )
    .with_notifier(notifier)
}

async fn seeded_store(items: &[ListingDraft]) -> list_controller::StoreClient<Listing> {
    let (store, client) = ResourceStore::<Listing>::new(32);
    tokio::spawn(store.run());
    for item in items {
        client.create(item.clone()).await.unwrap();
    }
    client
}

/// A service whose replies are released by the test, one call at a time, so the
/// order in which overlapping calls finish is under the test's control.
#[derive(Default)]
struct HeldReplies {
    lists: Mutex<VecDeque<oneshot::Receiver<Vec<Listing>>>>,
    saves: Mutex<VecDeque<oneshot::Receiver<Listing>>>,
    removed: Mutex<Vec<u32>>,
}

impl HeldReplies {
    fn hold_list(&self) -> oneshot::Sender<Vec<Listing>> {
        let (tx, rx) = oneshot::channel();
        self.lists.lock().unwrap().push_back(rx);
        tx
    }

    fn hold_save(&self) -> oneshot::Sender<Listing> {
        let (tx, rx) = oneshot::channel();
        self.saves.lock().unwrap().push_back(rx);
        tx
    }

    fn removed(&self) -> Vec<u32> {
        self.removed.lock().unwrap().clone()
    }
}

async fn next_reply<T>(queue: &Mutex<VecDeque<oneshot::Receiver<T>>>) -> Result<T, ServiceError> {
    let reply = queue
        .lock()
        .unwrap()
        .pop_front()
        .ok_or_else(|| ServiceError::Rejected("no reply held".into()))?;
    reply.await.map_err(|_| ServiceError::ServiceDropped)
}

#[async_trait]
impl ResourceService<Listing> for HeldReplies {
    async fn list(&self, _query: Option<&ListQuery>) -> Result<Vec<Listing>, ServiceError> {
        next_reply(&self.lists).await
    }

    async fn create(&self, _payload: ListingDraft) -> Result<Listing, ServiceError> {
        next_reply(&self.saves).await
    }

    async fn update(&self, _id: u32, _payload: ListingDraft) -> Result<Listing, ServiceError> {
        next_reply(&self.saves).await
    }

    async fn remove(&self, id: u32) -> Result<(), ServiceError> {
        self.removed.lock().unwrap().push(id);
        Ok(())
    }
}

// --- Tests ---

#[tokio::test]
async fn test_page_resets_after_deleting_from_last_page() {
    let drafts: Vec<_> = (1..=23).map(|n| draft(&format!("Unit {n}"), "ACTIVE")).collect();
    let client = seeded_store(&drafts).await;
    let notifier = Arc::new(RecordingNotifier::new());
    let c = controller(Arc::new(client), notifier.clone());

    c.refresh().await.unwrap();
    assert_eq!(c.view().total_pages, 3);
    assert!(c.set_page(3));
    let view = c.view();
    assert_eq!(view.items.len(), 3);
    assert_eq!((view.start_item, view.end_item), (21, 23));

    for _ in 0..4 {
        let target = c.view().items[0].clone();
        c.on_delete(&target).unwrap();
        assert!(c.on_confirm_delete().await.unwrap());
    }

    let view = c.view();
    assert_eq!(view.total_items, 19);
    assert_eq!(view.total_pages, 2);
    assert_eq!(view.page, 1);
    assert!(view.pending_delete.is_none());
    assert_eq!(
        notifier
            .snapshot()
            .iter()
            .filter(|n| matches!(n, Notification::Deleted { .. }))
            .count(),
        4
    );
}

#[tokio::test]
async fn test_search_and_field_filter_combine() {
    let client = seeded_store(&[
        draft("Sunset Villa", "ACTIVE"),
        draft("Ocean View", "ACTIVE"),
        draft("Villa Marina", "SOLD"),
    ])
    .await;
    // Without server-side scoping every filter runs locally.
    let c = controller(
        Arc::new(client.without_remote_filter()),
        Arc::new(RecordingNotifier::new()),
    );
    c.refresh().await.unwrap();

    c.on_search_change("  VILLA ");
    let titles: Vec<_> = c.view().items.into_iter().map(|l| l.title).collect();
    assert_eq!(titles, vec!["Sunset Villa", "Villa Marina"]);

    c.on_field_filter_change("status", Some("ACTIVE".into()))
        .await
        .unwrap();
    let titles: Vec<_> = c.view().items.into_iter().map(|l| l.title).collect();
    assert_eq!(titles, vec!["Sunset Villa"]);
    assert_eq!(c.source_mode(), SourceMode::Local);

    c.on_search_change("");
    assert_eq!(c.view().total_items, 2);
}

#[tokio::test]
async fn test_double_confirm_delete_calls_remove_once() {
    let mut mock = MockService::<Listing>::new();
    mock.expect_list().return_ok(listings(2));
    mock.expect_remove().return_ok(());
    mock.expect_list().return_ok(vec![listing(2, "Unit 2", "ACTIVE")]);

    let c = controller(Arc::new(mock.client()), Arc::new(RecordingNotifier::new()));
    c.refresh().await.unwrap();
    c.remove(&listing(1, "Unit 1", "ACTIVE")).unwrap();

    let (first, second) = tokio::join!(c.on_confirm_delete(), c.on_confirm_delete());
    assert!(first.unwrap());
    assert!(!second.unwrap());

    assert_eq!(mock.calls().mutations(MutationKind::Delete), 1);
    assert_eq!(c.view().total_items, 1);
    mock.verify();
}

#[tokio::test]
async fn test_double_submit_creates_once() {
    let mut mock = MockService::<Listing>::new();
    mock.expect_list().return_ok(Vec::new());
    mock.expect_create().return_ok(listing(1, "Palm Residence", "ACTIVE"));
    mock.expect_list().return_ok(vec![listing(1, "Palm Residence", "ACTIVE")]);

    let c = controller(Arc::new(mock.client()), Arc::new(RecordingNotifier::new()));
    c.refresh().await.unwrap();
    c.on_add_new();
    c.on_field_input("title", "Palm Residence".into()).unwrap();

    let (first, second) = tokio::join!(c.on_submit(), c.on_submit());
    assert_eq!(first.unwrap().map(|l| l.id), Some(1));
    assert!(second.unwrap().is_none());
    assert_eq!(mock.calls().create, 1);
    assert_eq!(c.form_mode(), FormMode::Closed);
    mock.verify();
}

#[tokio::test]
async fn test_update_failure_keeps_form_and_collection() {
    let mut mock = MockService::<Listing>::new();
    mock.expect_list().return_ok(listings(3));
    mock.expect_update()
        .return_err(ServiceError::Transport("connection reset".into()));

    let notifier = Arc::new(RecordingNotifier::new());
    let c = controller(Arc::new(mock.client()), notifier.clone());
    c.refresh().await.unwrap();
    let before = c.view().items;

    c.on_edit(&listing(2, "Unit 2", "ACTIVE")).unwrap();
    c.on_field_input("title", "U2".into()).unwrap();
    assert!(matches!(c.on_submit().await, Err(ControllerError::Validation(_))));
    assert_eq!(
        c.form_errors().get("title").map(String::as_str),
        Some("title must be at least 3 characters")
    );

    c.on_field_input("title", "Unit 2 (renovated)".into()).unwrap();
    c.on_field_input("city", "Abu Dhabi".into()).unwrap();
    let result = c.on_submit().await;
    assert!(matches!(
        result,
        Err(ControllerError::Mutation {
            kind: MutationKind::Update,
            source: ServiceError::Transport(_)
        })
    ));

    // The form is exactly as the user left it: input kept, no new messages.
    assert_eq!(c.form_mode(), FormMode::Editing);
    let kept = c.draft().unwrap();
    assert_eq!(kept.title, "Unit 2 (renovated)");
    assert_eq!(kept.city, "Abu Dhabi");
    assert!(c.form_errors().is_empty());
    assert!(c.is_dirty());
    assert!(c.can_save());
    assert_eq!(c.view().items, before);
    // No refetch after a failed mutation.
    assert_eq!(mock.calls().list, 1);
    assert!(matches!(
        notifier.snapshot().as_slice(),
        [Notification::MutationFailed {
            kind: MutationKind::Update,
            ..
        }]
    ));
    mock.verify();
}

#[tokio::test]
async fn test_clean_edit_is_not_saved() {
    let mut mock = MockService::<Listing>::new();
    mock.expect_list().return_ok(listings(1));

    let c = controller(Arc::new(mock.client()), Arc::new(RecordingNotifier::new()));
    c.refresh().await.unwrap();
    c.open_edit(&listing(1, "Unit 1", "ACTIVE")).unwrap();

    assert!(!c.is_dirty());
    assert!(!c.can_save());
    assert!(matches!(c.submit().await, Err(ControllerError::NotDirty)));

    // Typing the same value back is still clean.
    c.set_field("title", "Unit 1".into()).unwrap();
    assert!(!c.is_dirty());
    c.set_field("city", "Abu Dhabi".into()).unwrap();
    assert!(c.is_dirty());

    assert_eq!(mock.calls().update, 0);
    mock.verify();
}

#[tokio::test]
async fn test_validation_blocks_submit_until_fixed() {
    let mut mock = MockService::<Listing>::new();
    mock.expect_list().return_ok(Vec::new());

    let c = controller(Arc::new(mock.client()), Arc::new(RecordingNotifier::new()));
    c.refresh().await.unwrap();
    c.open_create();

    match c.submit().await {
        Err(ControllerError::Validation(errors)) => {
            assert_eq!(errors.get("title").map(String::as_str), Some("title is required"));
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
    assert!(c.form_errors().contains_key("title"));

    c.set_field("title", "Ab".into()).unwrap();
    assert!(c.form_errors().is_empty());
    assert!(matches!(c.submit().await, Err(ControllerError::Validation(_))));
    assert_eq!(
        c.form_errors().get("title").map(String::as_str),
        Some("title must be at least 3 characters")
    );
    assert_eq!(mock.calls().create, 0);
}

#[tokio::test]
async fn test_unknown_field_is_reported() {
    let mut mock = MockService::<Listing>::new();
    mock.expect_list().return_ok(Vec::new());
    let c = controller(Arc::new(mock.client()), Arc::new(RecordingNotifier::new()));
    c.refresh().await.unwrap();
    c.open_create();

    let result = c.set_field("bedrooms", 3u32.into());
    assert!(matches!(
        result,
        Err(ControllerError::Field(FieldError::UnknownField(_)))
    ));
}

#[tokio::test]
async fn test_remote_filter_requeries_service() {
    let mut mock = MockService::<Listing>::new();
    mock.expect_list().return_ok(listings(4));
    // The service scoped on status; a stray record must not be filtered out again.
    mock.expect_list().return_ok(vec![
        listing(1, "Unit 1", "ACTIVE"),
        listing(9, "Unit 9", "PENDING"),
    ]);
    mock.expect_list().return_ok(listings(4));

    let c = controller(Arc::new(mock.client()), Arc::new(RecordingNotifier::new()));
    c.refresh().await.unwrap();
    assert_eq!(c.source_mode(), SourceMode::Local);

    c.set_field_filter("status", Some("ACTIVE".into()))
        .await
        .unwrap();
    assert_eq!(
        c.source_mode(),
        SourceMode::RemoteFiltered {
            applied: vec!["status".to_string()]
        }
    );
    assert_eq!(c.view().total_items, 2);

    // Local search still applies on top of the scoped collection.
    c.set_search("unit 9");
    assert_eq!(c.view().total_items, 1);

    c.set_field_filter("status", None).await.unwrap();
    assert_eq!(c.source_mode(), SourceMode::Local);

    assert_eq!(
        mock.calls().queries,
        vec![
            None,
            Some(ListQuery::new().with_field("status", "ACTIVE")),
            None
        ]
    );
    mock.verify();
}

#[tokio::test]
async fn test_local_field_filter_does_not_requery() {
    let mut mock = MockService::<Listing>::new();
    let mut items = listings(3);
    items[1].city = "Sharjah".into();
    mock.expect_list().return_ok(items);

    let c = controller(Arc::new(mock.client()), Arc::new(RecordingNotifier::new()));
    c.refresh().await.unwrap();
    c.set_field_filter("city", Some("Sharjah".into()))
        .await
        .unwrap();

    assert_eq!(c.view().items.len(), 1);
    assert_eq!(mock.calls().list, 1);
    mock.verify();
}

#[tokio::test]
async fn test_fetch_failure_keeps_last_known_state() {
    let mut mock = MockService::<Listing>::new();
    mock.expect_list().return_ok(listings(2));
    mock.expect_list()
        .return_err(ServiceError::Transport("503".into()));

    let notifier = Arc::new(RecordingNotifier::new());
    let c = controller(Arc::new(mock.client()), notifier.clone());
    c.refresh().await.unwrap();

    let result = c.refresh().await;
    assert!(matches!(result, Err(ControllerError::Fetch(_))));
    let view = c.view();
    assert_eq!(view.total_items, 2);
    assert!(!view.is_loading);
    assert!(notifier.snapshot().iter().all(Notification::is_error));
}

#[tokio::test]
async fn test_refresh_closes_form_for_vanished_record() {
    let mut mock = MockService::<Listing>::new();
    mock.expect_list().return_ok(listings(2));
    mock.expect_list().return_ok(vec![listing(1, "Unit 1", "ACTIVE")]);

    let c = controller(Arc::new(mock.client()), Arc::new(RecordingNotifier::new()));
    c.refresh().await.unwrap();
    c.open_edit(&listing(2, "Unit 2", "ACTIVE")).unwrap();
    assert_eq!(c.form_mode(), FormMode::Editing);

    c.refresh().await.unwrap();
    assert_eq!(c.form_mode(), FormMode::Closed);

    let stale = c.open_edit(&listing(2, "Unit 2", "ACTIVE"));
    assert!(matches!(stale, Err(ControllerError::StaleRecord(id)) if id == "2"));
}

#[tokio::test]
async fn test_delete_dialog_and_form_are_exclusive() {
    let mut mock = MockService::<Listing>::new();
    mock.expect_list().return_ok(listings(2));

    let c = controller(Arc::new(mock.client()), Arc::new(RecordingNotifier::new()));
    c.refresh().await.unwrap();

    c.on_edit(&listing(1, "Unit 1", "ACTIVE")).unwrap();
    c.on_delete(&listing(2, "Unit 2", "ACTIVE")).unwrap();
    assert_eq!(c.form_mode(), FormMode::Closed);
    assert_eq!(c.pending_delete().map(|l| l.id), Some(2));

    c.on_add_new();
    assert!(c.pending_delete().is_none());
    assert_eq!(c.form_mode(), FormMode::Creating);

    c.on_cancel_form();
    assert!(matches!(
        c.confirm_delete().await,
        Err(ControllerError::NothingToDelete)
    ));
}

#[tokio::test]
async fn test_create_and_update_through_store() {
    let client = seeded_store(&[draft("Marina Loft", "ACTIVE")]).await;
    let notifier = Arc::new(RecordingNotifier::new());
    let c = controller(Arc::new(client), notifier.clone());
    c.refresh().await.unwrap();

    c.on_add_new();
    c.on_field_input("title", "Creek Townhouse".into()).unwrap();
    c.on_field_input("status", "ACTIVE".into()).unwrap();
    let created = c.on_submit().await.unwrap().unwrap();
    assert_eq!(created.id, 2);
    assert_eq!(c.view().total_items, 2);

    c.on_edit(&created).unwrap();
    c.on_field_input("status", "SOLD".into()).unwrap();
    let updated = c.on_submit().await.unwrap().unwrap();
    assert_eq!(updated.status, "SOLD");
    assert_eq!(c.form_mode(), FormMode::Closed);

    let statuses: Vec<_> = c.view().items.into_iter().map(|l| l.status).collect();
    assert_eq!(statuses, vec!["ACTIVE", "SOLD"]);
    assert_eq!(
        notifier.snapshot(),
        vec![
            Notification::Saved {
                resource: "listings".into(),
                kind: MutationKind::Create
            },
            Notification::Saved {
                resource: "listings".into(),
                kind: MutationKind::Update
            },
        ]
    );
}

#[tokio::test]
async fn test_page_size_change_resets_page() {
    let mut mock = MockService::<Listing>::new();
    mock.expect_list().return_ok(listings(25));

    let c = controller(Arc::new(mock.client()), Arc::new(RecordingNotifier::new()));
    c.refresh().await.unwrap();
    assert!(c.set_page(2));
    assert!(!c.set_page(4));
    assert_eq!(c.page(), 2);

    c.on_page_size_change(5);
    let view = c.view();
    assert_eq!(view.page, 1);
    assert_eq!(view.total_pages, 5);
    assert_eq!(view.items.len(), 5);
}

#[tokio::test]
async fn test_delete_of_record_being_updated_is_refused() {
    let held = Arc::new(HeldReplies::default());
    held.hold_list().send(listings(2)).unwrap();
    let save = held.hold_save();
    held.hold_list().send(listings(2)).unwrap();

    let c = controller(held.clone(), Arc::new(RecordingNotifier::new()));
    c.refresh().await.unwrap();
    let first = listing(1, "Unit 1", "ACTIVE");
    let second = listing(2, "Unit 2", "ACTIVE");
    c.on_edit(&first).unwrap();
    c.on_field_input("title", "Unit 1 (sold)".into()).unwrap();

    let (submitted, ()) = tokio::join!(c.on_submit(), async {
        while c.can_save() {
            tokio::task::yield_now().await;
        }
        // Same record: refused while its update runs.
        assert!(matches!(
            c.on_delete(&first),
            Err(ControllerError::Busy(MutationKind::Update))
        ));
        assert!(c.pending_delete().is_none());

        // A different record may still be deleted.
        c.on_delete(&second).unwrap();
        assert_eq!(c.pending_delete().map(|l| l.id), Some(2));
        c.on_cancel_delete();

        save.send(listing(1, "Unit 1 (sold)", "ACTIVE")).unwrap();
    });

    assert_eq!(submitted.unwrap().map(|l| l.title), Some("Unit 1 (sold)".to_string()));
    assert!(held.removed().is_empty());

    // Once the update is done the delete goes through.
    held.hold_list().send(vec![second.clone()]).unwrap();
    c.on_delete(&first).unwrap();
    assert!(c.on_confirm_delete().await.unwrap());
    assert_eq!(held.removed(), vec![1]);
}

#[tokio::test]
async fn test_superseded_fetch_is_discarded() {
    let held = Arc::new(HeldReplies::default());
    let older = held.hold_list();
    let newer = held.hold_list();
    let c = controller(held.clone(), Arc::new(RecordingNotifier::new()));

    let (first, second, ()) = tokio::join!(c.refresh(), c.refresh(), async {
        newer.send(listings(3)).unwrap();
        while c.is_loading() {
            tokio::task::yield_now().await;
        }
        // The older request answers last, with a different collection.
        older.send(listings(1)).unwrap();
    });

    first.unwrap();
    second.unwrap();
    let view = c.view();
    assert_eq!(view.total_items, 3);
    assert!(!view.is_loading);
}

#[tokio::test]
async fn test_late_save_keeps_newer_form_open() {
    let held = Arc::new(HeldReplies::default());
    held.hold_list().send(Vec::new()).unwrap();
    let save = held.hold_save();
    held.hold_list()
        .send(vec![listing(1, "Palm Residence", "ACTIVE")])
        .unwrap();

    let c = controller(held.clone(), Arc::new(RecordingNotifier::new()));
    c.refresh().await.unwrap();
    c.on_add_new();
    c.on_field_input("title", "Palm Residence".into()).unwrap();

    let (submitted, ()) = tokio::join!(c.on_submit(), async {
        while c.can_save() {
            tokio::task::yield_now().await;
        }
        c.on_add_new();
        c.on_field_input("title", "Creek Townhouse".into()).unwrap();
        save.send(listing(1, "Palm Residence", "ACTIVE")).unwrap();
    });

    assert_eq!(submitted.unwrap().map(|l| l.id), Some(1));
    assert_eq!(c.form_mode(), FormMode::Creating);
    assert_eq!(c.draft().unwrap().title, "Creek Townhouse");
    assert_eq!(c.view().total_items, 1);
}

#[tokio::test]
async fn test_text_filter_matches_integer_field() {
    let drafts: Vec<_> = (1..=3).map(|n| draft(&format!("Unit {n}"), "ACTIVE")).collect();
    let client = seeded_store(&drafts).await;

    // Scoped by the store.
    let remote = ResourceListController::new(
        "listings",
        Arc::new(client.clone()),
        ListConfig::searching(["title"]).with_remote_filter("id"),
        FormRules::new(),
    );
    remote.refresh().await.unwrap();
    remote
        .set_field_filter("id", Some("2".into()))
        .await
        .unwrap();
    assert!(matches!(remote.source_mode(), SourceMode::RemoteFiltered { .. }));
    let ids: Vec<_> = remote.view().items.into_iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![2]);

    // Filtered locally.
    let local = controller(
        Arc::new(client.without_remote_filter()),
        Arc::new(RecordingNotifier::new()),
    );
    local.refresh().await.unwrap();
    local
        .set_field_filter("id", Some(" 3 ".into()))
        .await
        .unwrap();
    let ids: Vec<_> = local.view().items.into_iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![3]);
}

#[tokio::test]
async fn test_failed_requery_restores_filter() {
    let mut mock = MockService::<Listing>::new();
    mock.expect_list().return_ok(listings(3));
    mock.expect_list()
        .return_ok(vec![listing(1, "Unit 1", "ACTIVE")]);
    mock.expect_list()
        .return_err(ServiceError::Transport("timeout".into()));

    let c = controller(Arc::new(mock.client()), Arc::new(RecordingNotifier::new()));
    c.refresh().await.unwrap();
    c.set_field_filter("status", Some("ACTIVE".into()))
        .await
        .unwrap();

    let result = c.set_field_filter("status", Some("SOLD".into())).await;
    assert!(matches!(result, Err(ControllerError::Fetch(_))));

    // The rows on screen were scoped by ACTIVE, and so are the criteria.
    assert_eq!(
        c.criteria().field_equals.get("status"),
        Some(&FieldValue::from("ACTIVE"))
    );
    assert_eq!(c.view().items, vec![listing(1, "Unit 1", "ACTIVE")]);
    mock.verify();
}
