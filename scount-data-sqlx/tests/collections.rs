// Database tests require a real PostgreSQL instance.
// Run with: DATABASE_URL=postgres://... cargo test -p scount-data-sqlx -- --ignored
//
// Each test drops and recreates the tables, so point DATABASE_URL at a
// scratch database.

use std::time::Duration;

use scount_core::DatabaseConfig;
use scount_data::cancel::with_deadline;
use scount_data::prelude::*;
use scount_data_sqlx::{create_pool, from_pool, PgStore};
use serial_test::serial;
use sqlx::PgPool;

const SCHEMA: &str = include_str!("../schema.sql");

async fn fresh_store() -> (PgPool, PgStore) {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let pool = create_pool(&DatabaseConfig::new(url))
        .await
        .expect("pool creation failed");
    sqlx::raw_sql("DROP TABLE IF EXISTS members, scounts, users CASCADE")
        .execute(&pool)
        .await
        .expect("drop tables");
    sqlx::raw_sql(SCHEMA)
        .execute(&pool)
        .await
        .expect("apply schema");
    (pool.clone(), from_pool(pool))
}

/// A pool that never connects unless a statement is actually sent.
fn unreachable_store() -> PgStore {
    let pool = PgPool::connect_lazy("postgres://nobody@127.0.0.1:1/none").expect("lazy pool");
    from_pool(pool)
}

fn user(uid: &str, email: &str) -> User {
    User {
        uid: uid.into(),
        email: email.into(),
        username: uid.to_uppercase(),
        password: format!("hash-{uid}").into_bytes(),
    }
}

fn scount(sid: &str, owner: &str) -> Scount {
    Scount {
        sid: sid.into(),
        owner: owner.into(),
        title: format!("title {sid}"),
        description: String::new(),
    }
}

async fn count_rows(pool: &PgPool, table: &str) -> i64 {
    let sql = format!("SELECT count(*) FROM {table}");
    sqlx::query_scalar(&sql)
        .fetch_one(pool)
        .await
        .expect("count rows")
}

// ── Checks that never reach the backend ─────────────────────────────────

#[tokio::test]
async fn empty_insert_is_not_found_without_io() {
    let store = unreachable_store();
    let err = store.users.insert(Vec::new()).await.unwrap_err();
    assert!(err.is(ErrorKind::NotFound));
    let err = store.members.insert(Vec::new()).await.unwrap_err();
    assert!(err.is(ErrorKind::NotFound));
}

#[tokio::test]
async fn unset_ids_are_nil_arguments_without_io() {
    let store = unreachable_store();
    let err = store.users.find_one(&UserId::default()).await.unwrap_err();
    assert!(err.is(ErrorKind::NilArgument));
    let err = store
        .scounts
        .delete_one(&ScountId::default())
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::NilArgument));
    let err = store
        .members
        .find_one(&MemberId::new("s1", ""))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::NilArgument));
    let err = store.users.find_by_email("").await.unwrap_err();
    assert!(err.is(ErrorKind::NilArgument));
    let err = store
        .users
        .update_password(&PasswordUpdater {
            uid: "u1".into(),
            old: b"a".to_vec(),
            new: Vec::new(),
        })
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::NilArgument));
}

#[tokio::test]
async fn member_update_is_always_unsupported() {
    let store = unreachable_store();
    for id in [
        MemberId::new("", ""),
        MemberId::new("", "u1"),
        MemberId::new("s1", "u1"),
    ] {
        let err = store
            .members
            .update_one(&id, &MemberUpdater)
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Unsupported), "{id:?}: {err}");
    }
}

#[tokio::test]
async fn bad_sort_column_fails_before_io() {
    let store = unreachable_store();
    let err = store
        .users
        .find(
            &UserFilter::default(),
            &Projector::new().order_by(Sorter::asc("password")),
        )
        .unwrap_err();
    assert!(err.is(ErrorKind::InvalidColumn));
}

// ── Round trips against PostgreSQL ──────────────────────────────────────

#[tokio::test]
#[ignore = "requires database"]
#[serial]
async fn find_one_absent_is_not_found_for_every_entity() {
    let (_, store) = fresh_store().await;
    let err = store.users.find_one(&UserId::new("nope")).await.unwrap_err();
    assert!(err.is(ErrorKind::NotFound));
    let err = store
        .scounts
        .find_one(&ScountId::new("nope"))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::NotFound));
    let err = store
        .members
        .find_one(&MemberId::new("nope", "nope"))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::NotFound));
}

#[tokio::test]
#[ignore = "requires database"]
#[serial]
async fn insert_then_find_one_and_duplicate_email_conflicts() {
    let (_, store) = fresh_store().await;
    let u1 = user("u1", "a@x.com");
    store.users.insert(vec![u1.clone()]).await.unwrap();
    assert_eq!(store.users.find_one(&UserId::new("u1")).await.unwrap(), u1);
    assert_eq!(store.users.find_by_email("a@x.com").await.unwrap(), u1);

    let err = store
        .users
        .insert(vec![user("u2", "a@x.com")])
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Conflict));
    assert!(std::error::Error::source(&err).is_some());

    let err = store.users.find_by_email("b@x.com").await.unwrap_err();
    assert!(err.is(ErrorKind::NotFound));
}

#[tokio::test]
#[ignore = "requires database"]
#[serial]
async fn failing_batch_persists_nothing() {
    let (pool, store) = fresh_store().await;
    let err = store
        .users
        .insert(vec![
            user("u1", "a@x.com"),
            user("u2", "b@x.com"),
            user("u3", "a@x.com"),
        ])
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Conflict));
    assert_eq!(count_rows(&pool, "users").await, 0);
}

#[tokio::test]
#[ignore = "requires database"]
#[serial]
async fn empty_filter_returns_everything_with_total() {
    let (_, store) = fresh_store().await;
    store
        .users
        .insert(vec![
            user("u1", "a@x.com"),
            user("u2", "b@x.com"),
            user("u3", "c@x.com"),
        ])
        .await
        .unwrap();

    let mut it = store
        .users
        .find(&UserFilter::default(), &Projector::new())
        .unwrap();
    let all = it.try_collect().await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(it.total(), 3);

    let mut it = store
        .users
        .find(
            &UserFilter {
                email: "b@x.com".into(),
                ..Default::default()
            },
            &Projector::new(),
        )
        .unwrap();
    let found = it.try_collect().await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].uid, "u2");
    assert_eq!(it.total(), 1);
}

#[tokio::test]
#[ignore = "requires database"]
#[serial]
async fn pages_partition_the_ordered_rows() {
    let (_, store) = fresh_store().await;
    let users: Vec<User> = (1..=4)
        .map(|i| user(&format!("u{i}"), &format!("{i}@x.com")))
        .collect();
    store.users.insert(users).await.unwrap();

    let mut uids = Vec::new();
    for offset in [0, 2] {
        let mut it = store
            .users
            .find(
                &UserFilter::default(),
                &Projector::new().paging(Paging::new(2, offset)),
            )
            .unwrap();
        let page = it.try_collect().await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(it.total(), 4);
        uids.extend(page.into_iter().map(|u| u.uid));
    }
    assert_eq!(uids, vec!["u1", "u2", "u3", "u4"]);
}

#[tokio::test]
#[ignore = "requires database"]
#[serial]
async fn sorts_by_email_descending() {
    let (_, store) = fresh_store().await;
    store
        .users
        .insert(vec![
            user("u1", "b@x.com"),
            user("u2", "a@x.com"),
            user("u3", "c@x.com"),
        ])
        .await
        .unwrap();
    let mut it = store
        .users
        .find(
            &UserFilter::default(),
            &Projector::new().order_by(Sorter::desc("email")),
        )
        .unwrap();
    let emails: Vec<String> = it
        .try_collect()
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.email)
        .collect();
    assert_eq!(emails, vec!["c@x.com", "b@x.com", "a@x.com"]);
}

#[tokio::test]
#[ignore = "requires database"]
#[serial]
async fn early_stop_keeps_total_and_second_pass_fails() {
    let (_, store) = fresh_store().await;
    let users: Vec<User> = (1..=5)
        .map(|i| user(&format!("u{i}"), &format!("{i}@x.com")))
        .collect();
    store.users.insert(users).await.unwrap();

    let mut it = store
        .users
        .find(&UserFilter::default(), &Projector::new())
        .unwrap();
    let mut seen = 0;
    it.for_each(|_| {
        seen += 1;
        false
    })
    .await
    .unwrap();
    assert_eq!(seen, 1);
    assert_eq!(it.total(), 5);

    let err = it.for_each(|_| true).await.unwrap_err();
    assert!(matches!(err, DataError::AlreadyConsumed));
}

#[tokio::test]
#[ignore = "requires database"]
#[serial]
async fn update_one_semantics() {
    let (pool, store) = fresh_store().await;
    store.users.insert(vec![user("u1", "a@x.com")]).await.unwrap();

    store
        .users
        .update_one(&UserId::new("u1"), &UserUpdater::default())
        .await
        .unwrap();
    let err = store
        .users
        .update_one(&UserId::new("u9"), &UserUpdater::default())
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::NotFound));

    store
        .users
        .update_one(
            &UserId::new("u1"),
            &UserUpdater {
                username: "Alice".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(
        store.users.find_one(&UserId::new("u1")).await.unwrap().username,
        "Alice"
    );

    let err = store
        .users
        .update_one(
            &UserId::new("u9"),
            &UserUpdater {
                username: "Ghost".into(),
            },
        )
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::NotFound));
    assert_eq!(count_rows(&pool, "users").await, 1);
}

#[tokio::test]
#[ignore = "requires database"]
#[serial]
async fn password_swaps_only_from_current_hash() {
    let (_, store) = fresh_store().await;
    store.users.insert(vec![user("u1", "a@x.com")]).await.unwrap();

    let err = store
        .users
        .update_password(&PasswordUpdater {
            uid: "u1".into(),
            old: b"wrong".to_vec(),
            new: b"next".to_vec(),
        })
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::NotFound));

    store
        .users
        .update_password(&PasswordUpdater {
            uid: "u1".into(),
            old: b"hash-u1".to_vec(),
            new: b"next".to_vec(),
        })
        .await
        .unwrap();
    let stored = store.users.find_one(&UserId::new("u1")).await.unwrap();
    assert_eq!(stored.password, b"next".to_vec());
}

#[tokio::test]
#[ignore = "requires database"]
#[serial]
async fn scount_insert_adds_owner_and_uid_filter_follows_membership() {
    let (_, store) = fresh_store().await;
    store
        .users
        .insert(vec![user("u1", "a@x.com"), user("u2", "b@x.com")])
        .await
        .unwrap();
    store
        .scounts
        .insert(vec![scount("s1", "u1"), scount("s2", "u2")])
        .await
        .unwrap();

    store
        .members
        .find_one(&MemberId::new("s1", "u1"))
        .await
        .unwrap();
    store
        .members
        .insert(vec![Member::new("s2", "u1")])
        .await
        .unwrap();

    let mut it = store
        .scounts
        .find(
            &ScountFilter {
                uid: "u1".into(),
                ..Default::default()
            },
            &Projector::new(),
        )
        .unwrap();
    let sids: Vec<String> = it
        .try_collect()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.sid)
        .collect();
    assert_eq!(sids, vec!["s1", "s2"]);
    assert_eq!(it.total(), 2);

    let err = store
        .members
        .insert(vec![Member::new("s1", "u1")])
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Conflict));
}

#[tokio::test]
#[ignore = "requires database"]
#[serial]
async fn scount_with_unknown_owner_rolls_back() {
    let (pool, store) = fresh_store().await;
    let err = store
        .scounts
        .insert(vec![scount("s1", "ghost")])
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Conflict));
    assert_eq!(count_rows(&pool, "scounts").await, 0);
    assert_eq!(count_rows(&pool, "members").await, 0);
}

#[tokio::test]
#[ignore = "requires database"]
#[serial]
async fn delete_one_then_missing() {
    let (_, store) = fresh_store().await;
    store.users.insert(vec![user("u1", "a@x.com")]).await.unwrap();
    store.scounts.insert(vec![scount("s1", "u1")]).await.unwrap();

    let id = MemberId::new("s1", "u1");
    store.members.delete_one(&id).await.unwrap();
    let err = store.members.delete_one(&id).await.unwrap_err();
    assert!(err.is(ErrorKind::NotFound));

    store.scounts.delete_one(&ScountId::new("s1")).await.unwrap();
    let err = store
        .scounts
        .find_one(&ScountId::new("s1"))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::NotFound));
}

#[tokio::test]
#[ignore = "requires database"]
#[serial]
async fn deadline_mid_find_rolls_back_snapshot() {
    let (pool, store) = fresh_store().await;
    let users: Vec<User> = (0..100)
        .map(|i| user(&format!("u{i:03}"), &format!("{i}@x.com")))
        .collect();
    store.users.insert(users).await.unwrap();

    let mut it = store
        .users
        .find(&UserFilter::default(), &Projector::new())
        .unwrap();
    let mut seen = 0;
    let err = with_deadline(
        Duration::from_millis(100),
        it.for_each(|_| {
            seen += 1;
            std::thread::sleep(Duration::from_millis(10));
            true
        }),
    )
    .await
    .unwrap_err();
    assert!(err.is(ErrorKind::Cancelled), "{err}");
    assert!(seen > 0 && seen < 100, "seen {seen}");

    // Dropping the snapshot queues its rollback; give the pool a moment to
    // take the connection back.
    tokio::time::sleep(Duration::from_millis(200)).await;
    let (idle_in_tx,): (i64,) = sqlx::query_as(
        "SELECT count(*) FROM pg_stat_activity \
         WHERE state = 'idle in transaction' AND datname = current_database()",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(idle_in_tx, 0);

    let err = it.for_each(|_| true).await.unwrap_err();
    assert!(matches!(err, DataError::AlreadyConsumed));

    // The pool is still usable afterwards.
    store.users.find_one(&UserId::new("u000")).await.unwrap();
}
