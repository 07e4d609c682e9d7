mod helpers;

use chrono::NaiveDate;
use evently::domain::{EventDraft, EventPatch};
use evently::infra::{setup_context, CreateReply, IEventStore};
use helpers::setup::spawn_context;
use mongodb::bson::doc;

#[tokio::test]
async fn full_event_lifecycle() {
    let ctx = spawn_context(NaiveDate::from_ymd(2024, 3, 4));
    let store = &ctx.repos.event_store;

    // create with an explicit, unpadded date
    let kickoff = match store
        .create(
            EventDraft {
                title: "kickoff".into(),
                date: Some("1/5/2021".into()),
                extra: doc! { "venue": "Oslo" },
            },
            false,
        )
        .await
        .unwrap()
    {
        CreateReply::Created(event) => event,
        CreateReply::All(_) => panic!("create with return_all = false"),
    };
    assert_eq!(kickoff.date, "01/05/2021");
    assert_eq!(kickoff.likes, 0);
    assert_eq!(kickoff.dislikes, 0);

    // create without a date; the pinned clock supplies today
    let events = match store
        .create(
            EventDraft {
                title: "launch".into(),
                ..Default::default()
            },
            true,
        )
        .await
        .unwrap()
    {
        CreateReply::All(events) => events,
        CreateReply::Created(_) => panic!("create with return_all = true"),
    };
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].title, "launch");
    assert_eq!(events[0].date, "03/04/2024");
    assert_eq!(events[1].title, "kickoff");

    // exact title lookup
    let found = store.get_by_title("kickoff").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].extra, doc! { "venue": "Oslo" });
    assert!(store.get_by_title("kick").await.unwrap().is_empty());

    // partial update leaves the untouched date and sort key alone
    let kickoff_id = kickoff.id.as_string();
    store
        .update(
            &kickoff_id,
            EventPatch {
                title: Some("kickoff redux".into()),
                extra: doc! { "speaker": "Ada" },
                ..Default::default()
            },
            false,
        )
        .await
        .unwrap();
    let updated = store.get_by_id(&kickoff_id).await.unwrap().unwrap();
    assert_eq!(updated.title, "kickoff redux");
    assert_eq!(updated.date, "01/05/2021");
    assert_eq!(updated.sort_date, "2021-01-05");
    assert_eq!(updated.extra, doc! { "venue": "Oslo", "speaker": "Ada" });

    // reactions
    let launch_id = events[0].id.as_string();
    store.inc_likes(&launch_id).await.unwrap();
    let events = store.inc_likes(&launch_id).await.unwrap();
    assert_eq!(events[0].likes, 2);
    let events = store.inc_dislikes(&launch_id).await.unwrap();
    assert_eq!(events[0].dislikes, 1);

    // an unknown reaction kind changes nothing and still returns the list
    let events = store
        .change_reaction(&launch_id, "bogus", true)
        .await
        .unwrap();
    assert_eq!(events[0].likes, 2);
    assert_eq!(events[0].dislikes, 1);

    // delete is final for reads and idempotent for repeats
    store.delete(&kickoff_id).await.unwrap();
    assert_eq!(store.get_by_id(&kickoff_id).await.unwrap(), None);
    store.delete(&kickoff_id).await.unwrap();
    assert_eq!(store.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn testing_flag_selects_the_inmemory_store() {
    std::env::set_var("TESTING", "1");

    // no database is reachable here, so this only succeeds when the flag
    // routed us to the in-memory implementation
    let ctx = setup_context().await;
    let events = ctx.repos.event_store.list_all().await.unwrap();
    assert!(events.is_empty());
}
