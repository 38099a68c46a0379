// tests/postgres_store_tests.rs
//
// Runs against a live Postgres. Start one, export DATABASE_URL, then:
//   cargo test --test postgres_store_tests -- --ignored

use quiz_dashboard::{
    config::Backend,
    models::quiz_result::NewQuizResult,
    store::{ResultStore, SqlResultStore},
};

async fn store() -> SqlResultStore {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = SqlResultStore::connect(&database_url, Backend::Postgres, 1)
        .await
        .expect("Failed to connect to Postgres for testing.");

    let store = SqlResultStore::new(pool, Backend::Postgres);
    store.init().await.expect("Failed to create table");
    // Idempotent
    store.init().await.expect("Second init failed");
    store
}

fn submission(class: &str, name: &str, score: i32, answers: Vec<bool>) -> NewQuizResult {
    NewQuizResult {
        class_name: class.to_string(),
        student_name: name.to_string(),
        seat_number: "1".to_string(),
        score,
        answers: answers.into(),
        submit_time: None,
    }
}

#[tokio::test]
#[ignore = "needs DATABASE_URL pointing at Postgres"]
async fn insert_list_delete_round_trip() {
    let store = store().await;
    // Unique class keeps runs independent on a shared database
    let class = format!("c_{}", &uuid::Uuid::new_v4().to_string()[..8]);

    let id = store
        .insert(submission(&class, "Ana", 77, vec![true, true, false]))
        .await
        .unwrap();

    let page = store.list(Some(&class), 1, 20).await.unwrap();
    assert_eq!(page.pagination.total, 1);
    assert_eq!(page.students[0].id, id);
    assert_eq!(page.students[0].answers.as_slice(), &[true, true, false]);

    store.delete_by_id(id).await.unwrap();
    // Deleting twice is not an error
    store.delete_by_id(id).await.unwrap();

    let page = store.list(Some(&class), 1, 20).await.unwrap();
    assert_eq!(page.pagination.total, 0);
    assert_eq!(page.pagination.total_pages, 0);
}

#[tokio::test]
#[ignore = "needs DATABASE_URL pointing at Postgres"]
async fn pagination_over_one_class() {
    let store = store().await;
    let class = format!("c_{}", &uuid::Uuid::new_v4().to_string()[..8]);

    for i in 0..25 {
        store
            .insert(submission(&class, &format!("s{}", i), 60, vec![]))
            .await
            .unwrap();
    }

    let page = store.list(Some(&class), 3, 10).await.unwrap();
    assert_eq!(page.pagination.total_pages, 3);
    assert_eq!(page.students.len(), 5);

    for student in page.students {
        store.delete_by_id(student.id).await.unwrap();
    }
}
