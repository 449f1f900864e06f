#![allow(dead_code)]

use std::{io::Write, path::PathBuf};

use sea_orm::ConnectionTrait;
use tempfile::TempDir;
use titles_etl::{db, store::TitleStore};

pub const HEADER: &str = "show_id,type,title,director,duration,date_added,release_year,listed_in";

pub struct TestEnv {
    pub dir: TempDir,
    pub store: TitleStore,
}

impl TestEnv {
    pub async fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let db = db::connect_and_migrate(&database_url(&dir), 4).await.unwrap();
        Self { dir, store: TitleStore::new(db) }
    }

    /// A store whose database has no `titles` table.
    pub async fn without_schema() -> Self {
        let dir = TempDir::new().unwrap();
        let db = db::connect(&database_url(&dir), 2).await.unwrap();
        Self { dir, store: TitleStore::new(db) }
    }

    /// Runs raw SQL against the test database on its own connection.
    pub async fn execute(&self, sql: &str) {
        let db = db::connect(&database_url(&self.dir), 1).await.unwrap();
        db.execute_unprepared(sql).await.unwrap();
        db.close().await.unwrap();
    }

    pub fn write_csv(&self, name: &str, rows: &[&str]) -> PathBuf {
        let path = self.dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "{HEADER}").unwrap();
        for row in rows {
            writeln!(f, "{row}").unwrap();
        }
        path
    }
}

fn database_url(dir: &TempDir) -> String {
    format!("sqlite://{}?mode=rwc", dir.path().join("titles.db").display())
}
