use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document};
use tokio::sync::RwLock;

use super::store::{DocumentStore, StoreError, UpdateOutcome};

/// In-process document store with the same query subset as [`super::MongoStore`].
///
/// Every call holds the collection lock for its whole duration, so a
/// conditional `update_one` checks its filter and applies its update atomically.
#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<String, Vec<Document>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in `collection`.
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn find_one(&self, collection: &str, filter: Document) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(None);
        };
        for doc in docs {
            if matches(doc, &filter)? {
                return Ok(Some(doc.clone()));
            }
        }
        Ok(None)
    }

    async fn find(&self, collection: &str, filter: Document) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        let mut found = Vec::new();
        for doc in docs {
            if matches(doc, &filter)? {
                found.push(doc.clone());
            }
        }
        Ok(found)
    }

    async fn insert_one(&self, collection: &str, mut document: Document) -> Result<ObjectId, StoreError> {
        let id = match document.get("_id") {
            Some(Bson::ObjectId(id)) => *id,
            Some(other) => return Err(StoreError::UnexpectedId(other.clone())),
            None => {
                let id = ObjectId::new();
                document.insert("_id", id);
                id
            }
        };

        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(document);
        Ok(id)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> Result<UpdateOutcome, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(UpdateOutcome::default());
        };

        for doc in docs.iter_mut() {
            if matches(doc, &filter)? {
                let before = doc.clone();
                apply_update(doc, &update)?;
                return Ok(UpdateOutcome {
                    matched: 1,
                    modified: u64::from(before != *doc),
                });
            }
        }
        Ok(UpdateOutcome::default())
    }
}

fn matches(doc: &Document, filter: &Document) -> Result<bool, StoreError> {
    for (field, expected) in filter {
        let actual = doc.get(field);
        let ok = match expected {
            Bson::Document(ops) if is_operator_document(ops) => {
                let mut ok = true;
                for (op, operand) in ops {
                    ok &= match op.as_str() {
                        "$eq" => value_matches(actual, operand),
                        "$ne" => !value_matches(actual, operand),
                        other => return Err(StoreError::UnsupportedOperator(other.to_string())),
                    };
                }
                ok
            }
            _ => value_matches(actual, expected),
        };
        if !ok {
            return Ok(false);
        }
    }
    Ok(true)
}

fn is_operator_document(doc: &Document) -> bool {
    !doc.is_empty() && doc.keys().all(|k| k.starts_with('$'))
}

fn value_matches(actual: Option<&Bson>, expected: &Bson) -> bool {
    match (actual, expected) {
        (Some(Bson::Array(items)), Bson::Array(_)) => actual == Some(expected) || items.contains(expected),
        (Some(Bson::Array(items)), _) => items.contains(expected),
        (Some(value), _) => value == expected,
        (None, Bson::Null) => true,
        (None, _) => false,
    }
}

fn apply_update(doc: &mut Document, update: &Document) -> Result<(), StoreError> {
    for (op, fields) in update {
        let Bson::Document(fields) = fields else {
            return Err(StoreError::UnsupportedOperator(op.clone()));
        };
        for (field, operand) in fields {
            match op.as_str() {
                "$set" => {
                    doc.insert(field.clone(), operand.clone());
                }
                "$inc" => {
                    let current = doc.get(field).cloned().unwrap_or(Bson::Int32(0));
                    let sum = add(&current, operand).ok_or_else(|| mismatch(op, field))?;
                    doc.insert(field.clone(), sum);
                }
                "$push" => {
                    match doc.entry(field.clone()).or_insert_with(|| Bson::Array(Vec::new())) {
                        Bson::Array(items) => items.push(operand.clone()),
                        _ => return Err(mismatch(op, field)),
                    }
                }
                "$pull" => match doc.get_mut(field) {
                    Some(Bson::Array(items)) => items.retain(|item| item != operand),
                    Some(_) => return Err(mismatch(op, field)),
                    None => {}
                },
                other => return Err(StoreError::UnsupportedOperator(other.to_string())),
            }
        }
    }
    Ok(())
}

fn add(current: &Bson, delta: &Bson) -> Option<Bson> {
    Some(match (current, delta) {
        (Bson::Int32(a), Bson::Int32(b)) => Bson::Int32(a.checked_add(*b)?),
        (Bson::Int32(a), Bson::Int64(b)) => Bson::Int64(i64::from(*a).checked_add(*b)?),
        (Bson::Int64(a), Bson::Int32(b)) => Bson::Int64(a.checked_add(i64::from(*b))?),
        (Bson::Int64(a), Bson::Int64(b)) => Bson::Int64(a.checked_add(*b)?),
        (Bson::Double(a), Bson::Double(b)) => Bson::Double(a + b),
        _ => return None,
    })
}

fn mismatch(operator: &str, field: &str) -> StoreError {
    StoreError::TypeMismatch {
        operator: operator.to_string(),
        field: field.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    async fn seeded() -> (MemoryStore, ObjectId) {
        let store = MemoryStore::new();
        let id = store
            .insert_one("users", doc! { "name": "A", "likedComments": ["c1", "c2"] })
            .await
            .unwrap();
        (store, id)
    }

    #[tokio::test]
    async fn insert_generates_object_id() {
        let (store, id) = seeded().await;
        let found = store.find_one("users", doc! { "_id": id }).await.unwrap().unwrap();
        assert_eq!(found.get_object_id("_id").unwrap(), id);
        assert_eq!(store.count("users").await, 1);
    }

    #[tokio::test]
    async fn array_field_matches_contained_value() {
        let (store, id) = seeded().await;
        let hit = store
            .find_one("users", doc! { "_id": id, "likedComments": "c2" })
            .await
            .unwrap();
        let miss = store
            .find_one("users", doc! { "_id": id, "likedComments": "c3" })
            .await
            .unwrap();
        assert!(hit.is_some());
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn ne_matches_missing_field() {
        let store = MemoryStore::new();
        let id = store.insert_one("users", doc! { "name": "B" }).await.unwrap();
        let found = store
            .find_one("users", doc! { "_id": id, "likedComments": { "$ne": "c1" } })
            .await
            .unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn conditional_push_applies_once() {
        let store = MemoryStore::new();
        let id = store.insert_one("users", doc! { "name": "B" }).await.unwrap();
        let filter = doc! { "_id": id, "likedComments": { "$ne": "c9" } };
        let update = doc! { "$push": { "likedComments": "c9" } };

        let first = store.update_one("users", filter.clone(), update.clone()).await.unwrap();
        let second = store.update_one("users", filter, update).await.unwrap();

        assert_eq!(first, UpdateOutcome { matched: 1, modified: 1 });
        assert!(!second.is_matched());

        let user = store.find_one("users", doc! { "_id": id }).await.unwrap().unwrap();
        assert_eq!(user.get_array("likedComments").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn pull_removes_every_match() {
        let (store, id) = seeded().await;
        store
            .update_one("users", doc! { "_id": id }, doc! { "$pull": { "likedComments": "c1" } })
            .await
            .unwrap();
        let user = store.find_one("users", doc! { "_id": id }).await.unwrap().unwrap();
        assert_eq!(user.get_array("likedComments").unwrap(), &vec![Bson::from("c2")]);
    }

    #[tokio::test]
    async fn inc_goes_negative_and_keeps_width() {
        let store = MemoryStore::new();
        let id = store.insert_one("comments", doc! { "likes": 0_i64 }).await.unwrap();
        store
            .update_one("comments", doc! { "_id": id }, doc! { "$inc": { "likes": Bson::Int64(-1) } })
            .await
            .unwrap();
        let comment = store.find_one("comments", doc! { "_id": id }).await.unwrap().unwrap();
        assert_eq!(comment.get_i64("likes").unwrap(), -1);
    }

    #[tokio::test]
    async fn inc_on_string_is_rejected() {
        let store = MemoryStore::new();
        let id = store.insert_one("comments", doc! { "likes": "many" }).await.unwrap();
        let err = store
            .update_one("comments", doc! { "_id": id }, doc! { "$inc": { "likes": 1 } })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::TypeMismatch { .. }));
    }

    #[tokio::test]
    async fn unknown_operator_is_an_error() {
        let (store, id) = seeded().await;
        let err = store
            .update_one("users", doc! { "_id": id }, doc! { "$rename": { "name": "nick" } })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedOperator(op) if op == "$rename"));
    }

    #[tokio::test]
    async fn find_keeps_insertion_order() {
        let store = MemoryStore::new();
        for n in 0..3 {
            store.insert_one("comments", doc! { "n": n, "owner": "u" }).await.unwrap();
        }
        let found = store.find("comments", doc! { "owner": "u" }).await.unwrap();
        let order: Vec<i32> = found.iter().map(|d| d.get_i32("n").unwrap()).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }
}
