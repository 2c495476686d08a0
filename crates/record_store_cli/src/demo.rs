//! Sample users/posts/comments walkthrough.
//!
//! # Invariants
//! - Re-running against an existing store never aborts on the sample
//!   inserts: failures are reported and the remaining sections still run.
//! - Posts and comments are only seeded when both sample users were freshly
//!   inserted, so re-runs do not duplicate them.

use crate::print_search;
use log::{info, warn};
use record_store_core::{PostId, RecordStore, RepoResult, UserId, UserUpdate};

const JOHN: (&str, &str) = ("john_doe", "john@example.com");
const JANE: (&str, &str) = ("jane_smith", "jane@example.com");

/// Sample user resolved either by a fresh insert or by username lookup.
struct SampleUser {
    id: Option<UserId>,
    inserted: bool,
}

pub(crate) fn run_demo(store: &mut RecordStore) -> RepoResult<()> {
    store.create_schema()?;
    info!("event=demo_start module=cli status=start");

    println!("\n=== Inserting Sample Data ===");
    let john = ensure_user(store, JOHN.0, JOHN.1)?;
    let jane = ensure_user(store, JANE.0, JANE.1)?;

    let intro = match (john.id, jane.id) {
        (Some(john_id), Some(jane_id)) if john.inserted && jane.inserted => {
            Some(seed_posts(store, john_id, jane_id)?)
        }
        (Some(john_id), Some(_)) => {
            println!("Sample users already present; skipping sample posts and comments");
            oldest_post_of(store, john_id)?
        }
        _ => {
            println!("Sample users unavailable; skipping sample posts and comments");
            None
        }
    };

    println!("\n=== Retrieving Data ===");
    let users = store.get_users()?;
    println!("\nUsers ({}):", users.len());
    for user in &users {
        println!("  - {} ({})", user.username, user.email);
    }

    let posts = store.get_posts(None)?;
    println!("\nPosts ({}):", posts.len());
    for post in &posts {
        println!("  - {} (by user_id: {})", post.title, post.user_id);
    }

    if let Some(john_id) = john.id {
        let johns_posts = store.get_posts(Some(john_id))?;
        println!("\nPosts by user_id {john_id} ({}):", johns_posts.len());
        for post in &johns_posts {
            println!("  - {}", post.title);
        }
    }

    if let Some(intro) = intro {
        match store.get_post_with_comments(intro)? {
            Some(detail) => {
                println!("\nPost {intro} with comments:");
                println!("  Title: {}", detail.post.title);
                println!("  Author: {}", detail.username);
                println!("  Content: {}", detail.post.content);
                println!("  Comments ({}):", detail.comments.len());
                for comment in &detail.comments {
                    println!("    - {} (by {})", comment.comment.content, comment.username);
                }
            }
            None => println!("\nPost {intro} not found"),
        }
    }

    println!("\n=== Updating Data ===");
    if let Some(john_id) = john.id {
        match store.update_user(john_id, &UserUpdate::default().email("john.doe@example.com")) {
            Ok(true) => println!("User {john_id} updated successfully"),
            Ok(false) => println!("User {john_id} not found"),
            Err(err) => println!("Error updating user {john_id}: {err}"),
        }
    }

    println!("\n=== Searching Posts ===");
    print_search(store, "Python")?;

    println!("\n=== Demonstrating Transaction ===");
    match store.run_sample_transaction() {
        Ok(ids) => println!(
            "Transaction completed successfully (user {}, post {}, comment {})",
            ids.user_id, ids.post_id, ids.comment_id
        ),
        Err(err) => println!("Transaction failed and was rolled back: {err}"),
    }

    println!("\n=== Demonstrating Joins ===");
    println!("\nUsers with post counts:");
    for row in store.user_post_counts()? {
        println!("User: {}, Posts: {}", row.username, row.post_count);
    }
    println!("\nPosts with comment counts:");
    for row in store.post_comment_counts()? {
        println!(
            "Post: {}, Author: {}, Comments: {}",
            row.title, row.author, row.comment_count
        );
    }

    info!("event=demo_finish module=cli status=ok");
    Ok(())
}

fn ensure_user(store: &RecordStore, username: &str, email: &str) -> RepoResult<SampleUser> {
    match store.insert_user(username, email) {
        Ok(id) => {
            println!("Inserted user {username} with id {id}");
            Ok(SampleUser {
                id: Some(id),
                inserted: true,
            })
        }
        Err(err) => {
            println!("Error inserting user {username}: {err}");
            warn!(
                "event=demo_seed module=cli status=skipped entity=user error_code={}",
                err.code()
            );
            let existing = store
                .get_users()?
                .into_iter()
                .find(|user| user.username == username)
                .map(|user| user.id);
            Ok(SampleUser {
                id: existing,
                inserted: false,
            })
        }
    }
}

/// Inserts the three sample posts and five comments; returns the intro post.
fn seed_posts(store: &RecordStore, john: UserId, jane: UserId) -> RepoResult<PostId> {
    let intro = store.insert_post(
        "Introduction to SQLite",
        "SQLite is a lightweight disk-based database that doesn't require a separate server process.",
        john,
    )?;
    let python = store.insert_post(
        "Python and Databases",
        "Python provides several ways to work with databases, including the sqlite3 module for SQLite.",
        john,
    )?;
    let web = store.insert_post(
        "Web Development with Python",
        "Python is great for web development with frameworks like Flask and Django.",
        jane,
    )?;

    store.insert_comment("Great introduction!", jane, intro)?;
    store.insert_comment("I learned a lot from this post.", jane, intro)?;
    store.insert_comment("Python's database support is impressive.", jane, python)?;
    store.insert_comment("I prefer Django over Flask.", john, web)?;
    store.insert_comment("Flask is more lightweight though.", jane, web)?;

    Ok(intro)
}

fn oldest_post_of(store: &RecordStore, user_id: UserId) -> RepoResult<Option<PostId>> {
    // Lists are newest first.
    Ok(store.get_posts(Some(user_id))?.last().map(|post| post.id))
}

#[cfg(test)]
mod tests {
    use super::run_demo;
    use record_store_core::RecordStore;

    #[test]
    fn demo_seeds_a_fresh_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = RecordStore::connect_path(dir.path().join("demo.db")).unwrap();

        run_demo(&mut store).unwrap();

        assert_eq!(store.get_users().unwrap().len(), 3);
        assert_eq!(store.get_posts(None).unwrap().len(), 4);
        let john = store.get_user(1).unwrap().unwrap();
        assert_eq!(john.email, "john.doe@example.com");
    }

    #[test]
    fn second_run_on_same_store_completes_without_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.db");

        let mut store = RecordStore::connect_path(&path).unwrap();
        run_demo(&mut store).unwrap();
        store.close().unwrap();

        let mut store = RecordStore::connect_path(&path).unwrap();
        run_demo(&mut store).unwrap();

        assert_eq!(store.get_users().unwrap().len(), 3);
        assert_eq!(store.get_posts(None).unwrap().len(), 4);
        let comments: usize = store
            .post_comment_counts()
            .unwrap()
            .iter()
            .map(|row| row.comment_count as usize)
            .sum();
        assert_eq!(comments, 6);
    }
}
