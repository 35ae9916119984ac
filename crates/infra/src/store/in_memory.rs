use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use invoicehub_auth::User;
use invoicehub_core::{Entity, InvoiceId, Username};
use invoicehub_invoicing::Invoice;

use super::{InvoiceStore, StoreError, StoreResult, UserStore};

/// In-memory keyed store for tests/dev.
///
/// Records are keyed by their [`Entity`] id.
#[derive(Debug)]
pub struct InMemoryStore<V: Entity> {
    inner: RwLock<BTreeMap<V::Id, V>>,
}

pub type InMemoryInvoiceStore = InMemoryStore<Invoice>;
pub type InMemoryUserStore = InMemoryStore<User>;

impl<V: Entity> InMemoryStore<V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(BTreeMap::new()),
        }
    }
}

impl<V: Entity> Default for InMemoryStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> InMemoryStore<V>
where
    V: Entity + Clone,
    V::Id: Ord + core::fmt::Display,
{
    fn insert_new(&self, value: V) -> StoreResult<V> {
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        let key = value.id().clone();
        if map.contains_key(&key) {
            return Err(StoreError::Duplicate(key.to_string()));
        }
        map.insert(key, value.clone());
        Ok(value)
    }

    fn get_cloned(&self, key: &V::Id) -> StoreResult<Option<V>> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(key).cloned())
    }

    fn values(&self) -> StoreResult<Vec<V>> {
        let map = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.values().cloned().collect())
    }

    /// Replace the record under `current` with `value`, re-keying it when the
    /// id changed.
    fn replace_keyed(&self, current: &V::Id, value: V) -> StoreResult<V> {
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        if !map.contains_key(current) {
            return Err(StoreError::NotFound(current.to_string()));
        }
        let key = value.id().clone();
        if &key != current {
            if map.contains_key(&key) {
                return Err(StoreError::Duplicate(key.to_string()));
            }
            map.remove(current);
        }
        map.insert(key, value.clone());
        Ok(value)
    }

    fn remove(&self, key: &V::Id) -> StoreResult<bool> {
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        Ok(map.remove(key).is_some())
    }
}

#[async_trait]
impl InvoiceStore for InMemoryStore<Invoice> {
    async fn insert(&self, invoice: Invoice) -> StoreResult<Invoice> {
        self.insert_new(invoice)
    }

    async fn get(&self, id: &InvoiceId) -> StoreResult<Option<Invoice>> {
        self.get_cloned(id)
    }

    async fn list(&self) -> StoreResult<Vec<Invoice>> {
        let mut invoices = self.values()?;
        invoices.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(invoices)
    }

    async fn replace(&self, invoice: Invoice) -> StoreResult<Invoice> {
        let id = invoice.id().clone();
        self.replace_keyed(&id, invoice)
    }

    async fn delete(&self, id: &InvoiceId) -> StoreResult<bool> {
        self.remove(id)
    }
}

#[async_trait]
impl UserStore for InMemoryStore<User> {
    async fn insert(&self, user: User) -> StoreResult<User> {
        self.insert_new(user)
    }

    async fn get(&self, username: &Username) -> StoreResult<Option<User>> {
        self.get_cloned(username)
    }

    async fn replace(&self, current: &Username, user: User) -> StoreResult<User> {
        self.replace_keyed(current, user)
    }

    async fn delete(&self, username: &Username) -> StoreResult<bool> {
        self.remove(username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use invoicehub_invoicing::{fixtures, InvoiceFields, InvoiceStatus};

    fn draft(id: &str, day: u32) -> Invoice {
        let created_at = Utc.with_ymd_and_hms(2024, 3, day, 0, 0, 0).unwrap();
        Invoice::restore(InvoiceId::new(id), created_at, InvoiceStatus::Draft, InvoiceFields::default())
    }

    fn user(name: &str) -> User {
        User {
            username: Username::new(name),
            password_hash: "$argon2id$stub".into(),
            email: format!("{name}@example.com"),
        }
    }

    #[tokio::test]
    async fn sample_invoice_round_trips_through_store() {
        let store = InMemoryInvoiceStore::new();
        let sample = fixtures::sample_invoice();
        store.insert(sample.clone()).await.unwrap();

        let fetched = store.get(&InvoiceId::new("RT3080")).await.unwrap().unwrap();
        assert_eq!(fetched, sample);
        assert_eq!(fetched.status(), InvoiceStatus::Paid);
        assert_eq!(fetched.fields().total, Some(1800.90));
        assert_eq!(fetched.fields().items[0].price, Some(1800.90));
    }

    #[tokio::test]
    async fn duplicate_invoice_id_is_rejected() {
        let store = InMemoryInvoiceStore::new();
        store.insert(draft("A1", 1)).await.unwrap();
        let err = store.insert(draft("A1", 2)).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
        assert_eq!(store.get(&InvoiceId::new("A1")).await.unwrap().unwrap(), draft("A1", 1));
    }

    #[tokio::test]
    async fn list_orders_by_creation_then_id() {
        let store = InMemoryInvoiceStore::new();
        store.insert(draft("B", 2)).await.unwrap();
        store.insert(draft("C", 1)).await.unwrap();
        store.insert(draft("A", 2)).await.unwrap();

        let ids: Vec<String> = store
            .list()
            .await
            .unwrap()
            .iter()
            .map(|i| i.id().to_string())
            .collect();
        assert_eq!(ids, vec!["C", "A", "B"]);
    }

    #[tokio::test]
    async fn replace_and_delete_require_existing_invoice() {
        let store = InMemoryInvoiceStore::new();
        assert!(matches!(store.replace(draft("Z", 1)).await, Err(StoreError::NotFound(_))));

        store.insert(draft("Z", 1)).await.unwrap();
        assert!(store.delete(&InvoiceId::new("Z")).await.unwrap());
        assert!(!store.delete(&InvoiceId::new("Z")).await.unwrap());
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn user_rename_moves_the_record() {
        let store = InMemoryUserStore::new();
        store.insert(user("janedoe")).await.unwrap();
        store.insert(user("johndoe")).await.unwrap();

        let err = store.replace(&Username::new("janedoe"), user("johndoe")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));

        store.replace(&Username::new("janedoe"), user("janesmith")).await.unwrap();
        assert!(store.get(&Username::new("janedoe")).await.unwrap().is_none());
        assert!(store.get(&Username::new("janesmith")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn duplicate_username_leaves_original_untouched() {
        let store = InMemoryUserStore::new();
        store.insert(user("janedoe")).await.unwrap();

        let mut other = user("janedoe");
        other.email = "imposter@example.com".into();
        assert!(matches!(store.insert(other).await, Err(StoreError::Duplicate(_))));

        let stored = store.get(&Username::new("janedoe")).await.unwrap().unwrap();
        assert_eq!(stored.email, "janedoe@example.com");
    }
}
