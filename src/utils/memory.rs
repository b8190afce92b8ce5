use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use crate::core::domain::Identifiable;
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult};

// Record is implemented by entities kept in a MemoryStore.
pub(crate) trait Record: Identifiable + Clone {
    fn set_version(&mut self, version: i64);

    // value of a queryable attribute, matched by equality against a predicate
    fn attribute(&self, name: &str) -> Option<String>;
}

// MemoryStore keeps entities in process; used by the Memory repository store and tests.
#[derive(Debug)]
pub(crate) struct MemoryStore<T> {
    name: String,
    records: RwLock<BTreeMap<String, T>>,
}

impl<T: Record> MemoryStore<T> {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            records: RwLock::new(BTreeMap::new()),
        }
    }

    pub(crate) async fn create(&self, entity: &T) -> LibraryResult<usize> {
        let mut records = self.records.write().await;
        if records.contains_key(entity.id().as_str()) {
            return Err(LibraryError::duplicate_key(
                format!("{} already has {}", self.name, entity.id()).as_str()));
        }
        records.insert(entity.id(), entity.clone());
        Ok(1)
    }

    pub(crate) async fn update(&self, entity: &T) -> LibraryResult<usize> {
        let mut records = self.records.write().await;
        match records.get(entity.id().as_str()) {
            Some(existing) if existing.version() == entity.version() => {
                let mut next = entity.clone();
                next.set_version(entity.version() + 1);
                records.insert(entity.id(), next);
                Ok(1)
            }
            Some(existing) => {
                Err(LibraryError::database(
                    format!("{} {} version {} is stale, stored version {}", self.name, entity.id(),
                            entity.version(), existing.version()).as_str(), Some("409".to_string()), false))
            }
            None => {
                Err(LibraryError::not_found(format!("{} not found for {}", self.name, entity.id()).as_str()))
            }
        }
    }

    pub(crate) async fn get(&self, id: &str) -> LibraryResult<T> {
        self.records.read().await.get(id).cloned().ok_or_else(||
            LibraryError::not_found(format!("{} not found for {}", self.name, id).as_str()))
    }

    pub(crate) async fn delete(&self, id: &str) -> LibraryResult<usize> {
        Ok(self.records.write().await.remove(id).map(|_| 1).unwrap_or(0))
    }

    // the page token is the id of the last record of the previous page
    pub(crate) async fn query(&self, predicate: &HashMap<String, String>,
                              page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<T>> {
        let records = self.records.read().await;
        let mut matched: Vec<T> = records.iter()
            .filter(|(id, _)| page.map(|after| id.as_str() > after).unwrap_or(true))
            .map(|(_, record)| record)
            .filter(|record| predicate.iter().all(|(k, v)| record.attribute(k).as_deref() == Some(v.as_str())))
            .take(page_size + 1)
            .cloned()
            .collect();
        let next_page = if matched.len() > page_size {
            matched.truncate(page_size);
            matched.last().map(|r| r.id())
        } else {
            None
        };
        Ok(PaginatedResult::new(page, page_size, next_page, matched))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use crate::core::domain::Identifiable;
    use crate::core::library::LibraryError;
    use crate::utils::memory::{MemoryStore, Record};

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: String,
        version: i64,
        owner: String,
    }

    impl Identifiable for Note {
        fn id(&self) -> String {
            self.id.to_string()
        }

        fn version(&self) -> i64 {
            self.version
        }
    }

    impl Record for Note {
        fn set_version(&mut self, version: i64) {
            self.version = version;
        }

        fn attribute(&self, name: &str) -> Option<String> {
            match name {
                "owner" => Some(self.owner.to_string()),
                _ => None,
            }
        }
    }

    fn note(id: &str, owner: &str) -> Note {
        Note { id: id.to_string(), version: 0, owner: owner.to_string() }
    }

    #[tokio::test]
    async fn test_should_reject_duplicate_and_stale_writes() {
        let store = MemoryStore::new("notes");
        store.create(&note("1", "a")).await.expect("should create");
        assert!(matches!(store.create(&note("1", "a")).await, Err(LibraryError::DuplicateKey { .. })));
        store.update(&note("1", "b")).await.expect("should update");
        assert_eq!(1, store.get("1").await.expect("should get").version);
        assert!(store.update(&note("1", "c")).await.is_err());
        assert_eq!("b", store.get("1").await.expect("should get").owner);
    }

    #[tokio::test]
    async fn test_should_query_pages() {
        let store = MemoryStore::new("notes");
        for i in 0..25 {
            let owner = if i % 5 == 0 { "x" } else { "y" };
            store.create(&note(format!("{:02}", i).as_str(), owner)).await.expect("should create");
        }
        let predicate = HashMap::from([("owner".to_string(), "y".to_string())]);
        let mut next_page = None;
        let mut total = 0;
        loop {
            let res = store.query(&predicate, next_page.as_deref(), 7).await.expect("should query");
            total += res.records.len();
            next_page = res.next_page;
            if next_page.is_none() {
                break;
            }
        }
        assert_eq!(20, total);
        assert_eq!(1, store.delete("00").await.expect("should delete"));
        assert_eq!(0, store.delete("00").await.expect("should delete"));
    }
}
