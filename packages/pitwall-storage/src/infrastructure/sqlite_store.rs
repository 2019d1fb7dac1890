//! SQLite Collection Store
//!
//! File-based document storage using SQLite. All collections share one
//! `documents` table; bodies are JSON text and `seq` gives the natural order.
//!
//! `Eq`/`In` predicates are pushed down through `json_extract` and hit the
//! expression indexes declared from [`Collection::indexed_fields`]. Pattern
//! predicates are evaluated in process after the query. Pushed-down
//! comparisons are scalar comparisons.

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::domain::{Collection, CollectionStore, Filter};
use crate::Result;

/// SQLite-based CollectionStore implementation
#[derive(Clone)]
pub struct SqliteCollectionStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteCollectionStore {
    /// Open (or create) a store at the given path
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory SQLite store (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS documents (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                collection TEXT NOT NULL,
                body TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_documents_collection
             ON documents(collection, seq)",
            [],
        )?;

        for collection in Collection::ALL {
            for field in collection.indexed_fields() {
                if let Some(path) = json_path(field) {
                    conn.execute(
                        &format!(
                            "CREATE INDEX IF NOT EXISTS idx_{}_{}
                             ON documents(collection, json_extract(body, {}))",
                            collection.as_str(),
                            field.replace('.', "_"),
                            path
                        ),
                        [],
                    )?;
                }
            }
        }

        Ok(())
    }
}

#[async_trait]
impl CollectionStore for SqliteCollectionStore {
    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Value>> {
        let mut sql_params = vec![SqlValue::Text(collection.as_str().to_owned())];
        let predicate = where_clause(filter, &mut sql_params);
        let sql = format!(
            "SELECT body FROM documents WHERE collection = ? AND ({}) ORDER BY seq",
            predicate
        );

        let bodies = {
            let conn = self.conn.lock();
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params_from_iter(sql_params.iter()), |row| {
                    row.get::<_, String>(0)
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            rows
        };

        debug!(
            collection = collection.as_str(),
            rows = bodies.len(),
            "sqlite find"
        );

        let matcher = filter.has_pattern().then(|| filter.matcher());
        let mut documents = Vec::with_capacity(bodies.len());
        for body in bodies {
            let document: Value = serde_json::from_str(&body)?;
            if matcher.as_ref().map_or(true, |m| m.is_match(&document)) {
                documents.push(document);
            }
        }
        Ok(documents)
    }

    async fn insert(&self, collection: Collection, document: Value) -> Result<()> {
        let body = serde_json::to_string(&document)?;
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO documents (collection, body) VALUES (?1, ?2)",
            params![collection.as_str(), body],
        )?;
        Ok(())
    }

    async fn insert_many(&self, collection: Collection, documents: Vec<Value>) -> Result<()> {
        let bodies = documents
            .iter()
            .map(serde_json::to_string)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let conn = self.conn.lock();
        let tx = conn.unchecked_transaction()?;
        {
            let mut stmt =
                tx.prepare("INSERT INTO documents (collection, body) VALUES (?1, ?2)")?;
            for body in &bodies {
                stmt.execute(params![collection.as_str(), body])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    async fn count(&self, collection: Collection) -> Result<usize> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM documents WHERE collection = ?1",
            params![collection.as_str()],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

/// SQL predicate for `filter`, appending bound values to `sql_params`
fn where_clause(filter: &Filter, sql_params: &mut Vec<SqlValue>) -> String {
    match filter {
        Filter::All | Filter::Matches { .. } => "1".to_owned(),
        Filter::Eq { field, value } => {
            let target = extract_expr(field, sql_params);
            sql_params.push(to_sql_value(value));
            format!("{} = ?", target)
        }
        Filter::In { field, values } => {
            if values.is_empty() {
                return "0".to_owned();
            }
            // One bound JSON array, so the set size never meets the variable limit
            let target = extract_expr(field, sql_params);
            sql_params.push(SqlValue::Text(Value::Array(values.clone()).to_string()));
            format!("{} IN (SELECT value FROM json_each(?))", target)
        }
        Filter::And(inner) => {
            if inner.is_empty() {
                return "1".to_owned();
            }
            inner
                .iter()
                .map(|f| format!("({})", where_clause(f, sql_params)))
                .collect::<Vec<_>>()
                .join(" AND ")
        }
    }
}

/// `json_extract` call for a field; inlines the path when it is a plain
/// identifier so expression indexes apply, binds it otherwise
fn extract_expr(field: &str, sql_params: &mut Vec<SqlValue>) -> String {
    match json_path(field) {
        Some(path) => format!("json_extract(body, {})", path),
        None => {
            sql_params.push(SqlValue::Text(format!("$.\"{}\"", field.replace('"', ""))));
            "json_extract(body, ?)".to_owned()
        }
    }
}

/// Quoted JSON path literal for `a.b.c` when every segment is `[A-Za-z0-9_]+`
fn json_path(field: &str) -> Option<String> {
    let valid = !field.is_empty()
        && field.split('.').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
        });
    valid.then(|| format!("'$.{}'", field))
}

fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::NamedTempFile;

    async fn seeded() -> SqliteCollectionStore {
        let store = SqliteCollectionStore::in_memory().unwrap();
        store
            .insert_many(
                Collection::Drivers,
                vec![
                    json!({"driver_id": "hamilton", "givenName": "Lewis", "team_id": "ferrari", "rookie": false}),
                    json!({"driver_id": "leclerc", "givenName": "Charles", "team_id": "ferrari", "rookie": false}),
                    json!({"driver_id": "bearman", "givenName": "Oliver", "team_id": "haas", "rookie": true}),
                ],
            )
            .await
            .unwrap();
        store
    }

    fn ids(docs: &[Value]) -> Vec<&str> {
        docs.iter()
            .map(|d| d["driver_id"].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_find_all_in_insertion_order() {
        let store = seeded().await;
        let docs = store.find(Collection::Drivers, &Filter::all()).await.unwrap();
        assert_eq!(ids(&docs), vec!["hamilton", "leclerc", "bearman"]);
    }

    #[tokio::test]
    async fn test_find_in_set_pushdown() {
        let store = seeded().await;
        let docs = store
            .find(
                Collection::Drivers,
                &Filter::any_of("driver_id", ["bearman", "hamilton", "nobody"]),
            )
            .await
            .unwrap();
        assert_eq!(ids(&docs), vec!["hamilton", "bearman"]);
    }

    #[tokio::test]
    async fn test_find_in_set_beyond_variable_limit() {
        let store = seeded().await;
        let mut wanted: Vec<String> = (0..40_000).map(|i| format!("driver_{i}")).collect();
        wanted.push("leclerc".to_owned());

        let docs = store
            .find(Collection::Drivers, &Filter::any_of("driver_id", wanted))
            .await
            .unwrap();
        assert_eq!(ids(&docs), vec!["leclerc"]);
    }

    #[tokio::test]
    async fn test_find_empty_set_returns_nothing() {
        let store = seeded().await;
        let docs = store
            .find(
                Collection::Drivers,
                &Filter::any_of("driver_id", Vec::<String>::new()),
            )
            .await
            .unwrap();
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn test_find_eq_and_bool() {
        let store = seeded().await;

        let ferrari = store
            .find(Collection::Drivers, &Filter::eq("team_id", "ferrari"))
            .await
            .unwrap();
        assert_eq!(ids(&ferrari), vec!["hamilton", "leclerc"]);

        let rookies = store
            .find(Collection::Drivers, &Filter::eq("rookie", true))
            .await
            .unwrap();
        assert_eq!(ids(&rookies), vec!["bearman"]);
    }

    #[tokio::test]
    async fn test_pattern_evaluated_after_pushdown() {
        let store = seeded().await;
        let filter = Filter::eq("team_id", "ferrari").and(Filter::matches("givenName", "^ch"));
        let docs = store.find(Collection::Drivers, &filter).await.unwrap();
        assert_eq!(ids(&docs), vec!["leclerc"]);
    }

    #[tokio::test]
    async fn test_unusual_field_name_is_bound() {
        let store = SqliteCollectionStore::in_memory().unwrap();
        store
            .insert(Collection::Teams, json!({"team id": "alpine"}))
            .await
            .unwrap();

        let docs = store
            .find(Collection::Teams, &Filter::eq("team id", "alpine"))
            .await
            .unwrap();
        assert_eq!(docs.len(), 1);
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let file = NamedTempFile::new().unwrap();

        {
            let store = SqliteCollectionStore::open(file.path()).unwrap();
            store
                .insert(Collection::Circuits, json!({"circuit_id": "spa"}))
                .await
                .unwrap();
        }

        let reopened = SqliteCollectionStore::open(file.path()).unwrap();
        assert_eq!(reopened.count(Collection::Circuits).await.unwrap(), 1);
        assert_eq!(reopened.count(Collection::Races).await.unwrap(), 0);
    }

    #[test]
    fn test_json_path_validation() {
        assert_eq!(json_path("driver_id"), Some("'$.driver_id'".to_owned()));
        assert_eq!(
            json_path("location.country"),
            Some("'$.location.country'".to_owned())
        );
        assert_eq!(json_path("x'; DROP TABLE documents; --"), None);
        assert_eq!(json_path(""), None);
        assert_eq!(json_path("a..b"), None);
    }

    #[test]
    fn test_where_clause_shapes() {
        let mut sql_params = Vec::new();
        let sql = where_clause(
            &Filter::any_of("driver_id", ["a", "b"]).and(Filter::matches("name", "x")),
            &mut sql_params,
        );
        assert_eq!(
            sql,
            "(json_extract(body, '$.driver_id') IN (SELECT value FROM json_each(?))) AND (1)"
        );
        assert_eq!(sql_params, vec![SqlValue::Text(r#"["a","b"]"#.to_owned())]);
    }
}
