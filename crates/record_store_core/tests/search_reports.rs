use record_store_core::RecordStore;

fn seeded_store() -> RecordStore {
    let store = RecordStore::connect_in_memory().unwrap();
    let john = store.insert_user("john_doe", "john@example.com").unwrap();
    let jane = store.insert_user("jane_smith", "jane@example.com").unwrap();
    let intro = store
        .insert_post(
            "Introduction to SQLite",
            "SQLite is a lightweight disk-based database.",
            john,
        )
        .unwrap();
    let python = store
        .insert_post(
            "Python and Databases",
            "Python provides several ways to work with databases.",
            john,
        )
        .unwrap();
    let web = store
        .insert_post(
            "Web Development",
            "python is great for web development with Flask.",
            jane,
        )
        .unwrap();
    store.insert_comment("Great introduction!", jane, intro).unwrap();
    store.insert_comment("I learned a lot.", jane, intro).unwrap();
    store.insert_comment("Impressive support.", jane, python).unwrap();
    store.insert_comment("I prefer Django.", john, web).unwrap();
    store.insert_comment("Flask is lighter.", jane, web).unwrap();
    store
}

#[test]
fn search_matches_title_or_content_case_insensitively_newest_first() {
    let store = seeded_store();

    let hits = store.search_posts("PYTHON").unwrap();
    let titles: Vec<_> = hits.iter().map(|hit| hit.post.title.as_str()).collect();
    assert_eq!(titles, vec!["Web Development", "Python and Databases"]);
    assert_eq!(hits[0].username, "jane_smith");
    assert_eq!(hits[1].username, "john_doe");
}

#[test]
fn search_treats_wildcards_literally() {
    let store = seeded_store();
    let user = store.get_users().unwrap()[0].id;
    store
        .insert_post("Progress", "Migration is 100% done", user)
        .unwrap();

    let hits = store.search_posts("100%").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].post.title, "Progress");
    assert!(store.search_posts("_").unwrap().is_empty());
    assert!(store.search_posts("no such words").unwrap().is_empty());
}

#[test]
fn empty_search_term_matches_every_post() {
    let store = seeded_store();
    assert_eq!(store.search_posts("").unwrap().len(), 3);
}

#[test]
fn user_post_counts_orders_by_count() {
    let store = seeded_store();
    store.insert_user("lurker", "lurker@example.com").unwrap();

    let counts = store.user_post_counts().unwrap();
    let summary: Vec<_> = counts
        .iter()
        .map(|row| (row.username.as_str(), row.post_count))
        .collect();
    assert_eq!(
        summary,
        vec![("john_doe", 2), ("jane_smith", 1), ("lurker", 0)]
    );
}

#[test]
fn post_comment_counts_includes_authors_and_uncommented_posts() {
    let store = seeded_store();
    let jane = store.get_users().unwrap()[1].id;
    store.insert_post("Quiet", "no replies yet", jane).unwrap();

    let counts = store.post_comment_counts().unwrap();
    let summary: Vec<_> = counts
        .iter()
        .map(|row| (row.title.as_str(), row.author.as_str(), row.comment_count))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Web Development", "jane_smith", 2),
            ("Introduction to SQLite", "john_doe", 2),
            ("Python and Databases", "john_doe", 1),
            ("Quiet", "jane_smith", 0),
        ]
    );
}
