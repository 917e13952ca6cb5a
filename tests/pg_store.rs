#![cfg(feature = "pg-tests")]

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use school_backend::database::postgres::PgStore;
use school_backend::database::{ListQuery, SoftDeletable, Store, StoreError};
use school_backend::models::{
    GroupKind, LifecycleStatus, NewGroup, NewMenuLink, NewSubject, NewUser, NewUserLink,
    Privilege,
};
use school_backend::utils::{generate_public_id, messages};

static PG_STORE: tokio::sync::OnceCell<Arc<PgStore>> = tokio::sync::OnceCell::const_new();

fn database_url() -> Option<String> {
    match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
        Ok(url) => Some(url),
        Err(_) => {
            eprintln!("skipping pg-tests: set TEST_DATABASE_URL or DATABASE_URL");
            None
        }
    }
}

async fn pg_store() -> Option<Arc<PgStore>> {
    let url = database_url()?;
    match PG_STORE
        .get_or_try_init(|| async { PgStore::connect(&url).await.map(Arc::new) })
        .await
    {
        Ok(store) => Some(Arc::clone(store)),
        Err(err) => {
            eprintln!("skipping pg-tests: connect postgres store failed: {err}");
            None
        }
    }
}

async fn menu_id(code: &str) -> i64 {
    let url = database_url().expect("database url");
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .expect("pool");
    sqlx::query_scalar("SELECT id FROM menus WHERE code = $1")
        .bind(code)
        .fetch_one(&pool)
        .await
        .expect("seeded menu")
}

/// Rows of different tests share the database; every fixture carries a tag.
fn tag() -> String {
    generate_public_id()[..8].to_string()
}

async fn status_id(store: &PgStore, status: LifecycleStatus) -> i64 {
    store
        .find_status(status.code())
        .await
        .expect("status")
        .expect("seeded status")
        .id
}

fn query(keyword: &str, status: LifecycleStatus, window: Option<(i64, i64)>) -> ListQuery {
    ListQuery {
        keyword: keyword.to_string(),
        status_code: status.code().to_string(),
        limit: window.map(|(limit, _)| limit),
        offset: window.map(|(_, offset)| offset),
    }
}

async fn insert_user(store: &PgStore, email: &str) -> i64 {
    let uuid = generate_public_id();
    store
        .insert_user(NewUser {
            uuid: uuid.clone(),
            first_name: "Pg".into(),
            last_name: "Fixture".into(),
            email: email.into(),
            address: "1 School Road".into(),
            phone_number1: "0100000000".into(),
            phone_number2: None,
            is_full_time: true,
            net_salary_per_month: None,
            net_salary_per_hour: None,
            monthly_working_hour: None,
            is_admin: false,
            password_hash: "$2b$04$fixture".into(),
            status_id: status_id(store, LifecycleStatus::Active).await,
        })
        .await
        .expect("insert user");
    store.find_user(&uuid).await.expect("find user").expect("user").id
}

async fn insert_group(store: &PgStore, kind: GroupKind, designation: &str) -> i64 {
    let uuid = generate_public_id();
    store
        .insert_group(NewGroup {
            uuid: uuid.clone(),
            kind,
            designation: designation.into(),
            status_id: status_id(store, LifecycleStatus::Active).await,
        })
        .await
        .expect("insert group");
    store
        .find_group(kind, &uuid)
        .await
        .expect("find group")
        .expect("group")
        .id
}

#[tokio::test]
async fn pg_page_and_total_share_the_filter() {
    let Some(store) = pg_store().await else {
        return;
    };
    let tag = tag();
    let active = status_id(&store, LifecycleStatus::Active).await;

    let mut uuids = Vec::new();
    for name in ["Algebra", "Botany", "Chemistry", "Drawing", "Economics"] {
        let uuid = generate_public_id();
        store
            .insert_subject(NewSubject {
                uuid: uuid.clone(),
                designation: format!("{name} {tag}"),
                status_id: active,
            })
            .await
            .expect("insert subject");
        uuids.push(uuid);
    }

    let upper = tag.to_uppercase();
    let page = store
        .list_subjects(&query(&upper, LifecycleStatus::Active, Some((2, 2))))
        .await
        .expect("page");
    assert_eq!(page.total, 5);
    assert_eq!(page.rows.len(), 2);
    assert_eq!(page.rows[0].designation, format!("Chemistry {tag}"));
    assert_eq!(page.rows[1].designation, format!("Drawing {tag}"));

    let deleted = status_id(&store, LifecycleStatus::Deleted).await;
    let drawing = store
        .find_subject(&uuids[3])
        .await
        .expect("find subject")
        .expect("subject");
    store
        .set_status(SoftDeletable::Subject, drawing.id, deleted)
        .await
        .expect("soft delete");

    let active_page = store
        .list_subjects(&query(&tag, LifecycleStatus::Active, None))
        .await
        .expect("active");
    assert_eq!(active_page.total, 4);
    assert_eq!(active_page.rows.len(), 4);

    let deleted_page = store
        .list_subjects(&query(&tag, LifecycleStatus::Deleted, None))
        .await
        .expect("deleted");
    assert_eq!(deleted_page.total, 1);
    assert_eq!(deleted_page.rows[0].uuid, uuids[3]);
    assert_eq!(deleted_page.rows[0].status.code, "SPR");
}

#[tokio::test]
async fn pg_group_listing_binds_kind_after_keyword() {
    let Some(store) = pg_store().await else {
        return;
    };
    let tag = tag();
    insert_group(&store, GroupKind::Role, &format!("Teacher {tag}")).await;
    insert_group(&store, GroupKind::Rule, &format!("Teacher {tag}")).await;
    insert_group(&store, GroupKind::Rule, &format!("Bursar {tag}")).await;

    let roles = store
        .list_groups(GroupKind::Role, &query(&tag, LifecycleStatus::Active, Some((10, 0))))
        .await
        .expect("roles");
    assert_eq!(roles.total, 1);
    assert_eq!(roles.rows.len(), 1);

    let rules = store
        .list_groups(GroupKind::Rule, &query(&tag, LifecycleStatus::Active, Some((1, 1))))
        .await
        .expect("rules");
    assert_eq!(rules.total, 2);
    assert_eq!(rules.rows.len(), 1);
    assert_eq!(rules.rows[0].designation, format!("Bursar {tag}"));
}

#[tokio::test]
async fn pg_unique_constraints_surface_as_conflicts() {
    let Some(store) = pg_store().await else {
        return;
    };
    let tag = tag();
    let email = format!("{tag}@pg.school.test");
    let user = insert_user(&store, &email).await;
    let group = insert_group(&store, GroupKind::Role, &format!("Clerk {tag}")).await;

    let link = || NewUserLink {
        uuid: generate_public_id(),
        user_id: user,
        group_id: group,
    };
    store.insert_user_links(vec![link()]).await.expect("first link");

    let err = store.insert_user_links(vec![link()]).await.unwrap_err();
    assert!(
        matches!(&err, StoreError::Conflict(msg) if msg.contains("user_groups_pair_key")),
        "{err:?}"
    );

    let duplicate = NewUser {
        uuid: generate_public_id(),
        first_name: "Other".into(),
        last_name: "Fixture".into(),
        email: email.clone(),
        address: "2 School Road".into(),
        phone_number1: "0200000000".into(),
        phone_number2: None,
        is_full_time: false,
        net_salary_per_month: None,
        net_salary_per_hour: None,
        monthly_working_hour: None,
        is_admin: false,
        password_hash: "$2b$04$fixture".into(),
        status_id: status_id(&store, LifecycleStatus::Active).await,
    };
    let err = store.insert_user(duplicate).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict(msg) if msg == messages::EMAIL_FOUND));
}

#[tokio::test]
async fn pg_batch_failing_on_last_element_writes_nothing() {
    let Some(store) = pg_store().await else {
        return;
    };
    let tag = tag();
    let user = insert_user(&store, &format!("{tag}@batch.school.test")).await;
    let first = insert_group(&store, GroupKind::Rule, &format!("Reader {tag}")).await;
    let second = insert_group(&store, GroupKind::Rule, &format!("Writer {tag}")).await;

    let link = |group_id| NewUserLink {
        uuid: generate_public_id(),
        user_id: user,
        group_id,
    };
    let err = store
        .insert_user_links(vec![link(first), link(second), link(first)])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));
    assert!(!store.user_link_exists(user, first).await.expect("exists"));
    assert!(!store.user_link_exists(user, second).await.expect("exists"));

    let menu = menu_id("USR").await;
    let menu_link = |privilege| NewMenuLink {
        uuid: generate_public_id(),
        menu_id: menu,
        group_id: first,
        privilege,
    };
    let err = store
        .insert_menu_links(vec![menu_link(Privilege::READ), menu_link(Privilege::ALL)])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));
    assert!(!store.menu_link_exists(menu, first).await.expect("exists"));
    assert!(store.list_menu_links(first).await.expect("links").is_empty());
}
