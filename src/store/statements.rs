// src/store/statements.rs

use crate::config::Backend;

impl Backend {
    /// Placeholder for the `n`th (1-based) bound parameter.
    pub fn placeholder(self, n: usize) -> String {
        match self {
            Backend::Postgres => format!("${}", n),
            Backend::Sqlite => "?".to_string(),
        }
    }

    fn id_column(self) -> &'static str {
        match self {
            Backend::Postgres => "id BIGSERIAL PRIMARY KEY",
            // AUTOINCREMENT keeps deleted ids from being handed out again
            Backend::Sqlite => "id INTEGER PRIMARY KEY AUTOINCREMENT",
        }
    }
}

/// Pre-rendered statements for one backend.
#[derive(Debug, Clone)]
pub struct Statements {
    pub create_table: String,
    pub insert: String,
    pub count_all: String,
    pub count_by_class: String,
    pub page_all: String,
    pub page_by_class: String,
    pub delete: String,
    pub select_all: String,
}

const COLUMNS: &str = "id, class_name, student_name, seat_number, score, answers, submit_time";

impl Statements {
    pub fn new(backend: Backend) -> Self {
        let p = |n| backend.placeholder(n);

        let create_table = format!(
            r#"
            CREATE TABLE IF NOT EXISTS quiz_results (
                {},
                class_name TEXT NOT NULL,
                student_name TEXT NOT NULL,
                seat_number TEXT NOT NULL,
                score INTEGER NOT NULL,
                answers TEXT NOT NULL,
                submit_time TEXT NOT NULL
            )
            "#,
            backend.id_column()
        );

        let insert = format!(
            "INSERT INTO quiz_results (class_name, student_name, seat_number, score, answers, submit_time) \
             VALUES ({}, {}, {}, {}, {}, {}) RETURNING id",
            p(1),
            p(2),
            p(3),
            p(4),
            p(5),
            p(6)
        );

        let order = "ORDER BY submit_time DESC, id DESC";

        Self {
            create_table,
            insert,
            count_all: "SELECT COUNT(*) FROM quiz_results".to_string(),
            count_by_class: format!("SELECT COUNT(*) FROM quiz_results WHERE class_name = {}", p(1)),
            page_all: format!(
                "SELECT {} FROM quiz_results {} LIMIT {} OFFSET {}",
                COLUMNS,
                order,
                p(1),
                p(2)
            ),
            page_by_class: format!(
                "SELECT {} FROM quiz_results WHERE class_name = {} {} LIMIT {} OFFSET {}",
                COLUMNS,
                p(1),
                order,
                p(2),
                p(3)
            ),
            delete: format!("DELETE FROM quiz_results WHERE id = {}", p(1)),
            select_all: format!("SELECT {} FROM quiz_results ORDER BY id", COLUMNS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_follow_backend() {
        let pg = Statements::new(Backend::Postgres);
        assert!(pg.insert.contains("VALUES ($1, $2, $3, $4, $5, $6)"));
        assert!(pg.page_by_class.contains("class_name = $1"));
        assert!(pg.page_by_class.ends_with("LIMIT $2 OFFSET $3"));
        assert_eq!(pg.delete, "DELETE FROM quiz_results WHERE id = $1");

        let lite = Statements::new(Backend::Sqlite);
        assert!(lite.insert.contains("VALUES (?, ?, ?, ?, ?, ?)"));
        assert!(lite.page_all.ends_with("LIMIT ? OFFSET ?"));
        assert_eq!(lite.delete, "DELETE FROM quiz_results WHERE id = ?");
    }

    #[test]
    fn ddl_differs_only_in_id_column() {
        let pg = Statements::new(Backend::Postgres).create_table;
        let lite = Statements::new(Backend::Sqlite).create_table;
        assert!(pg.contains("BIGSERIAL"));
        assert!(lite.contains("AUTOINCREMENT"));
        assert_eq!(
            pg.replace("id BIGSERIAL PRIMARY KEY", ""),
            lite.replace("id INTEGER PRIMARY KEY AUTOINCREMENT", "")
        );
    }
}
