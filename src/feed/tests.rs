//! Feed Manager Tests
//!
//! Drives the manager against call-counting in-memory stores and a
//! recording notifier.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;

    use crate::domain::{FeedError, FeedResult, Item, ItemDraft, ItemId, ItemType};
    use crate::feed::{queries, FeedManager, Notifier};
    use crate::repository::{AssetStore, ItemPatch, ItemStore};

    #[derive(Default)]
    struct StoreState {
        items: Mutex<Vec<Item>>,
        next_id: AtomicI64,
        insert_calls: AtomicUsize,
        list_calls: AtomicUsize,
        update_calls: AtomicUsize,
        fail: AtomicBool,
    }

    /// In-memory item store that counts every call and can be told to fail
    #[derive(Default, Clone)]
    struct MockItemStore {
        state: Arc<StoreState>,
    }

    #[async_trait]
    impl ItemStore for MockItemStore {
        async fn insert(&self, draft: &ItemDraft) -> FeedResult<Item> {
            self.state.insert_calls.fetch_add(1, Ordering::SeqCst);
            if self.state.fail.load(Ordering::SeqCst) {
                return Err(FeedError::Persist("store offline".to_string()));
            }

            let id = self.state.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            let item = Item {
                id,
                item_type: draft.item_type,
                name: draft.name.clone(),
                description: draft.description.clone(),
                contact: draft.contact.clone(),
                place: draft.place.clone(),
                date: draft.date,
                image_url: draft.image_url.clone(),
                resolved: false,
                resolved_at: None,
                created_at: Utc::now(),
            };
            self.state.items.lock().unwrap().insert(0, item.clone());
            Ok(item)
        }

        async fn list(&self) -> FeedResult<Vec<Item>> {
            self.state.list_calls.fetch_add(1, Ordering::SeqCst);
            if self.state.fail.load(Ordering::SeqCst) {
                return Err(FeedError::Fetch("store offline".to_string()));
            }
            Ok(self.state.items.lock().unwrap().clone())
        }

        async fn update(&self, id: ItemId, patch: &ItemPatch) -> FeedResult<()> {
            self.state.update_calls.fetch_add(1, Ordering::SeqCst);
            if self.state.fail.load(Ordering::SeqCst) {
                return Err(FeedError::Persist("store offline".to_string()));
            }

            let mut items = self.state.items.lock().unwrap();
            match items.iter_mut().find(|i| i.id == id) {
                Some(item) => {
                    if let Some(resolved) = patch.resolved {
                        item.resolved = resolved;
                    }
                    if let Some(at) = patch.resolved_at {
                        item.resolved_at = Some(at);
                    }
                    Ok(())
                }
                None => Err(FeedError::Persist(format!("item {} missing from store", id))),
            }
        }
    }

    #[derive(Default)]
    struct AssetState {
        uploads: Mutex<Vec<(String, Vec<u8>)>>,
        fail: AtomicBool,
    }

    /// Asset store that records uploads
    #[derive(Default, Clone)]
    struct MockAssetStore {
        state: Arc<AssetState>,
    }

    #[async_trait]
    impl AssetStore for MockAssetStore {
        async fn upload(&self, key: &str, bytes: &[u8]) -> FeedResult<()> {
            if self.state.fail.load(Ordering::SeqCst) {
                return Err(FeedError::Upload("bucket offline".to_string()));
            }
            self.state
                .uploads
                .lock()
                .unwrap()
                .push((key.to_string(), bytes.to_vec()));
            Ok(())
        }

        fn public_url(&self, key: &str) -> String {
            format!("https://assets.test/{}", key)
        }
    }

    /// Notifier that records every message
    #[derive(Default)]
    struct RecordingNotifier {
        successes: Mutex<Vec<String>>,
        errors: Mutex<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn success(&self, message: &str) {
            self.successes.lock().unwrap().push(message.to_string());
        }

        fn error(&self, message: &str) {
            self.errors.lock().unwrap().push(message.to_string());
        }
    }

    fn draft(name: &str, item_type: ItemType) -> ItemDraft {
        ItemDraft {
            item_type,
            name: name.to_string(),
            description: "red lanyard".to_string(),
            contact: "a@b.com".to_string(),
            place: "Library".to_string(),
            date: None,
            image_url: None,
        }
    }

    fn setup() -> (
        FeedManager<MockItemStore, MockAssetStore>,
        Arc<StoreState>,
        Arc<AssetState>,
        Arc<RecordingNotifier>,
    ) {
        let store = MockItemStore::default();
        let assets = MockAssetStore::default();
        let notifier = Arc::new(RecordingNotifier::default());
        let store_state = store.state.clone();
        let asset_state = assets.state.clone();
        let manager = FeedManager::new(store, assets, notifier.clone());
        (manager, store_state, asset_state, notifier)
    }

    #[tokio::test]
    async fn test_add_item_is_unresolved_and_first() {
        let (mut manager, _, _, notifier) = setup();

        manager.add_item(draft("Older", ItemType::Found)).await.unwrap();
        let added = manager.add_item(draft("Keys", ItemType::Lost)).await.unwrap();

        assert!(!added.resolved);
        assert!(added.resolved_at.is_none());
        let sorted = queries::sorted_by_recency(manager.items());
        assert_eq!(sorted[0].id, added.id);
        assert_eq!(
            notifier.successes.lock().unwrap().last().unwrap(),
            "Item posted successfully!"
        );
    }

    #[tokio::test]
    async fn test_add_item_counts_scenario() {
        let (mut manager, _, _, _) = setup();

        let added = manager.add_item(draft("Keys", ItemType::Lost)).await.unwrap();
        assert_eq!(added.id, 1);

        assert_eq!(manager.items().len(), 1);
        let c = manager.counts();
        assert_eq!((c.lost, c.found, c.resolved, c.total), (1, 0, 0, 1));
    }

    #[tokio::test]
    async fn test_add_item_empty_name_never_reaches_store() {
        let (mut manager, store_state, _, notifier) = setup();

        let result = manager.add_item(draft("", ItemType::Lost)).await;
        assert!(matches!(result, Err(FeedError::Validation(_))));
        assert_eq!(manager.items().len(), 0);
        // Fail-fast: no store round-trip at all
        assert_eq!(store_state.insert_calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            notifier.errors.lock().unwrap().last().unwrap(),
            "Please fill in all required fields"
        );
    }

    #[tokio::test]
    async fn test_add_item_store_failure_leaves_list_unchanged() {
        let (mut manager, store_state, _, notifier) = setup();
        manager.add_item(draft("Keys", ItemType::Lost)).await.unwrap();

        store_state.fail.store(true, Ordering::SeqCst);
        let result = manager.add_item(draft("Wallet", ItemType::Lost)).await;

        assert!(matches!(result, Err(FeedError::Persist(_))));
        assert_eq!(manager.items().len(), 1);
        assert_eq!(
            notifier.errors.lock().unwrap().last().unwrap(),
            "Failed to post item"
        );
    }

    #[tokio::test]
    async fn test_mark_resolved_merges_without_reload() {
        let (mut manager, store_state, _, notifier) = setup();
        let added = manager.add_item(draft("Keys", ItemType::Lost)).await.unwrap();

        let resolved = manager.mark_resolved(added.id).await.unwrap();
        assert!(resolved.resolved);
        assert!(resolved.resolved_at.is_some());

        let c = manager.counts();
        assert_eq!((c.lost, c.found, c.resolved, c.total), (0, 0, 1, 1));
        // Field-level merge, not a refetch
        assert_eq!(store_state.list_calls.load(Ordering::SeqCst), 0);
        assert_eq!(store_state.update_calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            notifier.successes.lock().unwrap().last().unwrap(),
            "Item marked as found!"
        );
    }

    #[tokio::test]
    async fn test_mark_resolved_twice_is_not_found() {
        let (mut manager, store_state, _, _) = setup();
        let added = manager.add_item(draft("Keys", ItemType::Lost)).await.unwrap();

        manager.mark_resolved(added.id).await.unwrap();
        let second = manager.mark_resolved(added.id).await;

        assert!(matches!(second, Err(FeedError::NotFound(_))));
        // The precondition failed locally, so no second store call
        assert_eq!(store_state.update_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_mark_resolved_unknown_id_is_not_found() {
        let (mut manager, store_state, _, _) = setup();

        let result = manager.mark_resolved(42).await;
        assert!(matches!(result, Err(FeedError::NotFound(_))));
        assert_eq!(store_state.update_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_mark_resolved_store_failure_keeps_local_state() {
        let (mut manager, store_state, _, notifier) = setup();
        let added = manager.add_item(draft("Keys", ItemType::Lost)).await.unwrap();

        store_state.fail.store(true, Ordering::SeqCst);
        let result = manager.mark_resolved(added.id).await;

        assert!(matches!(result, Err(FeedError::Persist(_))));
        assert!(!manager.items()[0].resolved);
        assert!(manager.items()[0].resolved_at.is_none());
        assert_eq!(
            notifier.errors.lock().unwrap().last().unwrap(),
            "Failed to mark item as found"
        );

        // Retrying after the store recovers succeeds
        store_state.fail.store(false, Ordering::SeqCst);
        assert!(manager.mark_resolved(added.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_load_replaces_list_wholesale() {
        let (mut manager, store_state, _, _) = setup();

        // Seed the store behind the manager's back
        {
            let mut items = store_state.items.lock().unwrap();
            for id in 1..=3 {
                items.insert(
                    0,
                    Item {
                        id,
                        item_type: ItemType::Lost,
                        name: format!("item {}", id),
                        description: "desc".to_string(),
                        contact: "a@b.com".to_string(),
                        place: "Library".to_string(),
                        date: None,
                        image_url: None,
                        resolved: false,
                        resolved_at: None,
                        created_at: Utc::now(),
                    },
                );
            }
        }

        manager.load().await.unwrap();
        assert_eq!(manager.items().len(), 3);
        assert!(!manager.is_loading());
    }

    #[tokio::test]
    async fn test_load_failure_keeps_stale_list() {
        let (mut manager, store_state, _, notifier) = setup();
        manager.add_item(draft("Keys", ItemType::Lost)).await.unwrap();

        store_state.fail.store(true, Ordering::SeqCst);
        let result = manager.load().await;

        assert!(matches!(result, Err(FeedError::Fetch(_))));
        // Stale but available
        assert_eq!(manager.items().len(), 1);
        assert!(!manager.is_loading());
        assert_eq!(
            notifier.errors.lock().unwrap().last().unwrap(),
            "Failed to load items"
        );
    }

    #[tokio::test]
    async fn test_upload_image_returns_public_url() {
        let (manager, _, asset_state, _) = setup();

        let payload = format!(
            "data:image/png;base64,{}",
            base64::Engine::encode(&base64::engine::general_purpose::STANDARD, b"fake png")
        );
        let url = manager
            .upload_image("photo of keys.PNG", &payload)
            .await
            .unwrap();

        let uploads = asset_state.uploads.lock().unwrap();
        assert_eq!(uploads.len(), 1);
        let (key, bytes) = &uploads[0];
        assert_eq!(bytes, b"fake png");
        // Key carries the extension but none of the user text
        assert!(key.ends_with(".png"));
        assert!(!key.contains("photo"));
        assert_eq!(url, format!("https://assets.test/{}", key));
    }

    #[tokio::test]
    async fn test_upload_image_bad_payload_is_upload_error() {
        let (manager, _, asset_state, notifier) = setup();

        let result = manager.upload_image("keys.png", "not base64 at all!!!").await;
        assert!(matches!(result, Err(FeedError::Upload(_))));
        assert_eq!(asset_state.uploads.lock().unwrap().len(), 0);
        assert_eq!(
            notifier.errors.lock().unwrap().last().unwrap(),
            "Failed to upload image"
        );
    }

    #[tokio::test]
    async fn test_upload_image_store_failure_is_upload_error() {
        let (manager, _, asset_state, notifier) = setup();
        asset_state.fail.store(true, Ordering::SeqCst);

        let payload =
            base64::Engine::encode(&base64::engine::general_purpose::STANDARD, b"fake png");
        let result = manager.upload_image("keys.png", &payload).await;

        assert!(matches!(result, Err(FeedError::Upload(_))));
        assert_eq!(
            notifier.errors.lock().unwrap().last().unwrap(),
            "Failed to upload image"
        );
    }

    #[tokio::test]
    async fn test_upload_does_not_touch_the_feed() {
        let (manager, store_state, _, _) = setup();

        let payload =
            base64::Engine::encode(&base64::engine::general_purpose::STANDARD, b"fake png");
        manager.upload_image("keys.png", &payload).await.unwrap();

        assert_eq!(manager.items().len(), 0);
        assert_eq!(store_state.insert_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_visible_routes_through_queries() {
        let (mut manager, _, _, _) = setup();
        let added = manager.add_item(draft("Keys", ItemType::Lost)).await.unwrap();
        manager.add_item(draft("Wallet", ItemType::Found)).await.unwrap();
        manager.mark_resolved(added.id).await.unwrap();

        assert_eq!(manager.visible(false).len(), 1);
        assert_eq!(manager.visible(true).len(), 2);
    }
}
