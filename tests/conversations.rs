use hostelhub_messaging::conversation;
use hostelhub_messaging::conversation::model::{Conversation, Participant};
use hostelhub_messaging::conversation::repository::ConversationRepository;
use hostelhub_messaging::conversation::service::ConversationService;
use hostelhub_messaging::event::service::EventService;
use hostelhub_messaging::message::model::LastMessage;
use hostelhub_messaging::message::repository::MessageRepository;
use hostelhub_messaging::message::service::MessageService;
use hostelhub_messaging::message::{self, Kind};
use hostelhub_messaging::user::model::UserInfo;
use hostelhub_messaging::user::{Role, Sub};
use testcontainers_modules::mongo::Mongo;
use testcontainers_modules::testcontainers::runners::AsyncRunner;
use testcontainers_modules::testcontainers::ContainerAsync;

async fn database() -> (ContainerAsync<Mongo>, mongodb::Database) {
    let node = Mongo::default().start().await.unwrap();
    let port = node.get_host_port_ipv4(27017).await.unwrap();
    let db = mongodb::Client::with_uri_str(format!("mongodb://127.0.0.1:{port}"))
        .await
        .unwrap()
        .database("hostelhub");
    (node, db)
}

fn services(db: &mongodb::Database) -> (ConversationService, MessageService) {
    let conversation_service = ConversationService::new(
        ConversationRepository::new(db),
        MessageRepository::new(db),
        EventService::new(None),
    );
    let message_service = MessageService::new(
        MessageRepository::new(db),
        conversation_service.clone(),
    );
    (conversation_service, message_service)
}

fn ali() -> Participant {
    Participant::new(Sub("a1".into()), "Ali", Role::Student)
}

fn bilal() -> Participant {
    Participant::new(Sub("b2".into()), "Bilal", Role::Owner)
}

#[tokio::test]
async fn sub_with_path_metacharacters_is_rejected_before_any_write() {
    // The client is lazy: no connection is made before the first
    // operation, and validation fails before any operation.
    let db = mongodb::Client::with_uri_str("mongodb://127.0.0.1:27017")
        .await
        .unwrap()
        .database("hostelhub");
    let (conversation_service, _) = services(&db);
    let u1 = UserInfo::new(Sub("a1".into()), "Ali", Role::Student);

    for sub in ["b.2", "$b2", ""] {
        let other = Participant::new(Sub(sub.into()), "Bilal", Role::Owner);
        let result = conversation_service.get_or_create(&u1, other).await;

        assert!(matches!(
            result,
            Err(conversation::Error::MalformedSub(_))
        ));
    }
}

#[tokio::test]
#[ignore = "requires docker"]
async fn get_or_create_resolves_both_directions_to_one_record() {
    let (_node, db) = database().await;
    let repo = ConversationRepository::new(&db);

    let first = repo
        .get_or_create(&Conversation::new(ali(), bilal()))
        .await
        .unwrap();
    let second = repo
        .get_or_create(&Conversation::new(bilal(), ali()))
        .await
        .unwrap();

    assert_eq!(first.id(), second.id());
    assert_eq!(first.id().0, "a1_b2");
    assert_eq!(second.unread_for(&Sub("a1".into())), 0);
    assert_eq!(second.unread_for(&Sub("b2".into())), 0);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn record_new_message_increments_recipient_and_resets_sender() {
    let (_node, db) = database().await;
    let repo = ConversationRepository::new(&db);
    let a1 = Sub("a1".into());
    let b2 = Sub("b2".into());

    let conversation = repo
        .get_or_create(&Conversation::new(ali(), bilal()))
        .await
        .unwrap();
    let id = conversation.id();

    let preview = |text: &str, owner: &Sub| {
        LastMessage::new(message::Id::random(), text, owner.clone(), 100)
    };

    repo.record_new_message(id, &preview("salam", &a1), &a1, &b2)
        .await
        .unwrap();
    repo.record_new_message(id, &preview("anyone there?", &a1), &a1, &b2)
        .await
        .unwrap();

    let conversation = repo.find_by_id(id).await.unwrap();
    assert_eq!(conversation.unread_for(&b2), 2);
    assert_eq!(conversation.unread_for(&a1), 0);
    assert_eq!(conversation.last_message().unwrap().text(), "anyone there?");

    // The reply resets the replier's own counter.
    repo.record_new_message(id, &preview("walaikum", &b2), &b2, &a1)
        .await
        .unwrap();

    let conversation = repo.find_by_id(id).await.unwrap();
    assert_eq!(conversation.unread_for(&b2), 0);
    assert_eq!(conversation.unread_for(&a1), 1);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn record_new_message_on_missing_conversation_is_not_found() {
    let (_node, db) = database().await;
    let repo = ConversationRepository::new(&db);
    let a1 = Sub("a1".into());
    let b2 = Sub("b2".into());

    let preview = LastMessage::new(message::Id::random(), "hello", a1.clone(), 100);
    let result = repo
        .record_new_message(&conversation::Id("a1_b2".into()), &preview, &a1, &b2)
        .await;

    assert!(matches!(result, Err(conversation::Error::NotFound(_))));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn mark_read_is_idempotent() {
    let (_node, db) = database().await;
    let repo = ConversationRepository::new(&db);
    let a1 = Sub("a1".into());
    let b2 = Sub("b2".into());

    let conversation = repo
        .get_or_create(&Conversation::new(ali(), bilal()))
        .await
        .unwrap();
    let id = conversation.id();

    let preview = LastMessage::new(message::Id::random(), "salam", a1.clone(), 100);
    repo.record_new_message(id, &preview, &a1, &b2).await.unwrap();

    repo.mark_read(id, &b2).await.unwrap();
    assert_eq!(repo.find_by_id(id).await.unwrap().unread_for(&b2), 0);

    // Second call is a no-op, not an error.
    repo.mark_read(id, &b2).await.unwrap();
    assert_eq!(repo.find_by_id(id).await.unwrap().unread_for(&b2), 0);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn first_contact_scenario() {
    let (_node, db) = database().await;
    let (conversation_service, message_service) = services(&db);
    let u1 = UserInfo::new(Sub("a1".into()), "Ali", Role::Student);
    let u2 = UserInfo::new(Sub("b2".into()), "Bilal", Role::Owner);

    let conversation = conversation_service
        .get_or_create(&u1, bilal())
        .await
        .unwrap();
    let id = conversation.id().clone();
    assert_eq!(id.0, "a1_b2");

    message_service
        .create(&u1, &id, &u2.sub, "Hi", Kind::Text)
        .await
        .unwrap();

    let conversation = conversation_service.find_by_id(&id).await.unwrap();
    assert_eq!(conversation.unread_for(&u1.sub), 0);
    assert_eq!(conversation.unread_for(&u2.sub), 1);
    assert_eq!(conversation.last_message().unwrap().text(), "Hi");

    message_service
        .mark_conversation_read(&u2, &id)
        .await
        .unwrap();

    let conversation = conversation_service.find_by_id(&id).await.unwrap();
    assert_eq!(conversation.unread_for(&u2.sub), 0);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn unread_summary_covers_only_own_conversations() {
    let (_node, db) = database().await;
    let (conversation_service, message_service) = services(&db);
    let u1 = UserInfo::new(Sub("a1".into()), "Ali", Role::Student);
    let u2 = UserInfo::new(Sub("b2".into()), "Bilal", Role::Owner);
    let u3 = UserInfo::new(Sub("c3".into()), "Chaudhry", Role::Owner);

    let ab = conversation_service.get_or_create(&u1, bilal()).await.unwrap();
    let cb = conversation_service
        .get_or_create(&u3, bilal())
        .await
        .unwrap();

    message_service
        .create(&u1, ab.id(), &u2.sub, "room available?", Kind::Text)
        .await
        .unwrap();
    message_service
        .create(&u3, cb.id(), &u2.sub, "rent due", Kind::Text)
        .await
        .unwrap();

    let summary = conversation_service.unread_summary(&u2.sub).await.unwrap();
    assert_eq!(summary.len(), 2);
    assert!(summary.iter().all(|e| e.unread_count == 1));

    let summary = conversation_service.unread_summary(&u1.sub).await.unwrap();
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].conversation_id, *ab.id());
    assert_eq!(summary[0].unread_count, 0);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn concurrent_appends_all_land_in_the_counter() {
    let (_node, db) = database().await;
    let (conversation_service, message_service) = services(&db);
    let u1 = UserInfo::new(Sub("a1".into()), "Ali", Role::Student);
    let b2 = Sub("b2".into());

    let conversation = conversation_service
        .get_or_create(&u1, bilal())
        .await
        .unwrap();
    let id = conversation.id().clone();

    let sends = (0..10).map(|i| {
        let message_service = message_service.clone();
        let u1 = u1.clone();
        let id = id.clone();
        let b2 = b2.clone();
        tokio::spawn(async move {
            message_service
                .create(&u1, &id, &b2, &format!("msg {i}"), Kind::Text)
                .await
                .unwrap();
        })
    });
    for handle in sends.collect::<Vec<_>>() {
        handle.await.unwrap();
    }

    let conversation = conversation_service.find_by_id(&id).await.unwrap();
    assert_eq!(conversation.unread_for(&b2), 10);
    assert_eq!(conversation.unread_for(&u1.sub), 0);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn reconcile_matches_incrementally_maintained_counters() {
    let (_node, db) = database().await;
    let (conversation_service, message_service) = services(&db);
    let u1 = UserInfo::new(Sub("a1".into()), "Ali", Role::Student);
    let u2 = UserInfo::new(Sub("b2".into()), "Bilal", Role::Owner);

    let conversation = conversation_service
        .get_or_create(&u1, bilal())
        .await
        .unwrap();
    let id = conversation.id().clone();

    // 3 messages, 2 addressed to b2, 1 of them already read.
    message_service
        .create(&u1, &id, &u2.sub, "salam", Kind::Text)
        .await
        .unwrap();
    message_service.mark_conversation_read(&u2, &id).await.unwrap();
    message_service
        .create(&u2, &id, &u1.sub, "walaikum", Kind::Text)
        .await
        .unwrap();
    message_service.mark_conversation_read(&u1, &id).await.unwrap();
    message_service
        .create(&u1, &id, &u2.sub, "room available?", Kind::Text)
        .await
        .unwrap();

    let before = conversation_service.find_by_id(&id).await.unwrap();
    let reconciled = conversation_service.reconcile(&id).await.unwrap();

    assert_eq!(reconciled.unread_for(&u2.sub), 1);
    assert_eq!(reconciled.unread_for(&u2.sub), before.unread_for(&u2.sub));
    assert_eq!(reconciled.unread_for(&u1.sub), before.unread_for(&u1.sub));
    assert_eq!(
        reconciled.last_message().unwrap().text(),
        before.last_message().unwrap().text()
    );

    // Running it again changes nothing.
    let again = conversation_service.reconcile(&id).await.unwrap();
    assert_eq!(again.unread_for(&u2.sub), 1);
}
