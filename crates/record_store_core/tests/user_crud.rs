use record_store_core::{
    NewUser, RecordStore, RepoError, SqliteUserRepository, UserRepository, UserUpdate,
    ValidationError,
};

#[test]
fn insert_user_returns_generated_ids() {
    let store = RecordStore::connect_in_memory().unwrap();

    let john = store.insert_user("john_doe", "john@example.com").unwrap();
    let jane = store.insert_user("jane_smith", "jane@example.com").unwrap();

    assert_eq!(john, 1);
    assert_eq!(jane, 2);
    let users = store.get_users().unwrap();
    assert_eq!(
        users.iter().map(|u| u.username.as_str()).collect::<Vec<_>>(),
        vec!["john_doe", "jane_smith"]
    );
    assert!(users[0].created_at > 0);
}

#[test]
fn duplicate_username_fails_and_leaves_store_unchanged() {
    let store = RecordStore::connect_in_memory().unwrap();
    store.insert_user("john_doe", "john@example.com").unwrap();

    let err = store
        .insert_user("john_doe", "other@example.com")
        .unwrap_err();
    assert!(matches!(
        &err,
        RepoError::UniqueViolation { table, column } if table == "users" && column == "username"
    ));

    let users = store.get_users().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].email, "john@example.com");
}

#[test]
fn duplicate_email_fails_with_uniqueness_error() {
    let store = RecordStore::connect_in_memory().unwrap();
    store.insert_user("john_doe", "john@example.com").unwrap();

    let err = store.insert_user("johnny", "john@example.com").unwrap_err();
    assert!(matches!(
        &err,
        RepoError::UniqueViolation { column, .. } if column == "email"
    ));
    assert_eq!(err.code(), "unique_violation");
    assert_eq!(store.get_users().unwrap().len(), 1);
}

#[test]
fn blank_username_is_rejected_before_insert() {
    let store = RecordStore::connect_in_memory().unwrap();

    let err = store.insert_user("   ", "blank@example.com").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::BlankField("username"))
    ));
    assert!(store.get_users().unwrap().is_empty());
}

#[test]
fn update_user_changes_only_supplied_fields() {
    let store = RecordStore::connect_in_memory().unwrap();
    let id = store.insert_user("john_doe", "john@example.com").unwrap();

    let changed = store
        .update_user(id, &UserUpdate::default().email("john.doe@example.com"))
        .unwrap();
    assert!(changed);

    let user = store.get_user(id).unwrap().unwrap();
    assert_eq!(user.username, "john_doe");
    assert_eq!(user.email, "john.doe@example.com");
}

#[test]
fn update_user_without_fields_or_missing_row_returns_false() {
    let store = RecordStore::connect_in_memory().unwrap();
    let id = store.insert_user("john_doe", "john@example.com").unwrap();

    assert!(!store.update_user(id, &UserUpdate::default()).unwrap());
    assert!(!store
        .update_user(999, &UserUpdate::default().username("ghost"))
        .unwrap());
    assert_eq!(store.get_user(id).unwrap().unwrap().username, "john_doe");
}

#[test]
fn update_user_to_taken_username_fails_with_uniqueness_error() {
    let store = RecordStore::connect_in_memory().unwrap();
    store.insert_user("john_doe", "john@example.com").unwrap();
    let jane = store.insert_user("jane_smith", "jane@example.com").unwrap();

    let err = store
        .update_user(jane, &UserUpdate::default().username("john_doe"))
        .unwrap_err();
    assert!(matches!(err, RepoError::UniqueViolation { .. }));
    assert_eq!(store.get_user(jane).unwrap().unwrap().username, "jane_smith");
}

#[test]
fn delete_user_cascades_to_posts_and_comments() {
    let store = RecordStore::connect_in_memory().unwrap();
    let john = store.insert_user("john_doe", "john@example.com").unwrap();
    let jane = store.insert_user("jane_smith", "jane@example.com").unwrap();
    let johns_post = store.insert_post("Intro", "hello", john).unwrap();
    let janes_post = store.insert_post("Reply", "hi", jane).unwrap();
    store.insert_comment("on john's post", jane, johns_post).unwrap();
    store.insert_comment("john on jane's post", john, janes_post).unwrap();

    assert!(store.delete_user(john).unwrap());

    assert!(store.get_user(john).unwrap().is_none());
    assert!(store.get_posts(Some(john)).unwrap().is_empty());
    assert!(store.get_post_with_comments(johns_post).unwrap().is_none());
    let remaining = store.get_post_with_comments(janes_post).unwrap().unwrap();
    assert!(remaining.comments.is_empty());
    assert_eq!(count(&store, "comments"), 0);
    assert_eq!(count(&store, "posts"), 1);
}

#[test]
fn delete_missing_user_returns_false() {
    let store = RecordStore::connect_in_memory().unwrap();
    assert!(!store.delete_user(42).unwrap());
}

#[test]
fn repository_can_be_used_on_a_borrowed_connection() {
    let store = RecordStore::connect_in_memory().unwrap();
    let repo = SqliteUserRepository::new(store.connection());

    let id = repo
        .insert_user(&NewUser::new("repo_user", "repo@example.com"))
        .unwrap();
    let loaded = repo.get_user(id).unwrap().unwrap();
    assert_eq!(loaded.email, "repo@example.com");
    assert!(repo.get_user(id + 1).unwrap().is_none());
}

fn count(store: &RecordStore, table: &str) -> i64 {
    store
        .connection()
        .query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
            row.get(0)
        })
        .unwrap()
}
