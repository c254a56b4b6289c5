//! End-to-end scenarios over the in-memory store and feed.

#[cfg(test)]
mod tests {
    use crate::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    const TABLE: &str = "bingo_items";

    fn two_items() -> Vec<Item> {
        vec![Item::new(1u64, "A"), Item::new(2u64, "B")]
    }

    #[tokio::test]
    async fn test_board_walkthrough() {
        let repo = MemoryRepository::new(two_items());
        let cache = SharedItems::default();
        let sync = SyncClient::new(repo.clone(), cache.clone(), SyncMode::UpdatesOnly);
        sync.refresh().await.expect("initial load");

        // no stored selection: the card is some permutation of {1, 2}
        let kv = MemoryKv::new();
        let prefs = DevicePrefs::new(kv.clone(), &BingoConfig::default());
        let card = prefs
            .card_or_draw(&cache.snapshot(), &mut StdRng::seed_from_u64(11))
            .unwrap();
        let ids: HashSet<&str> = card.ids().iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, HashSet::from(["1", "2"]));

        let toggles = ToggleController::new(repo.clone(), cache.clone());
        let id = ItemId::from("1");

        toggles.toggle(&id, false).await.unwrap();
        assert!(cache.get(&id).unwrap().checked);

        // second toggle fails remotely: back to the pre-toggle value
        repo.fail_writes(true);
        assert!(toggles.toggle(&id, true).await.is_err());
        assert!(cache.get(&id).unwrap().checked);
        assert!(repo.rows()[0].checked);
    }

    #[tokio::test]
    async fn test_card_survives_item_set_changes() {
        let kv = MemoryKv::new();
        let config = BingoConfig::default();
        let items: Vec<Item> = (1..=30u64).map(|i| Item::new(i, format!("Cell {}", i))).collect();
        let first = DevicePrefs::new(kv.clone(), &config)
            .card_or_draw(&items, &mut StdRng::seed_from_u64(5))
            .unwrap();

        // a later visit, after the admin deleted most rows
        let remaining: Vec<Item> = items.into_iter().take(3).collect();
        let prefs = DevicePrefs::new(kv.clone(), &config);
        let again = prefs.card_or_draw(&remaining, &mut StdRng::seed_from_u64(6)).unwrap();
        assert_eq!(first, again);

        let shown = resolve_card(&again, &remaining);
        assert!(shown.len() <= 3);
        assert!(shown.iter().all(|item| again.ids().contains(&item.id)));
    }

    #[tokio::test]
    async fn test_admin_waits_for_echo() {
        let hub = ChangeHub::new();
        let repo = MemoryRepository::new(two_items());
        repo.echo_into("public", TABLE, hub.clone());

        let cache = SharedItems::default();
        let sync = SyncClient::new(repo.clone(), cache.clone(), SyncMode::Full);
        sync.refresh().await.unwrap();
        let mut sub = hub.subscribe(sync.filter("public", TABLE)).unwrap();
        let admin = AdminController::new(repo.clone());

        admin.add_item("Vraagt om de rekening").await.unwrap();
        // nothing local until the echo is applied
        assert_eq!(cache.snapshot().len(), 2);
        let event = sub.try_next().expect("insert echo");
        sync.apply(&event);
        assert_eq!(cache.snapshot()[2].text, "Vraagt om de rekening");

        let mut session = EditSession::start("2".into(), "B");
        session.set_draft("B, maar beter");
        admin.save_edit(&mut session).await.unwrap();
        sync.apply(&sub.try_next().expect("update echo"));
        assert_eq!(cache.get(&"2".into()).unwrap().text, "B, maar beter");

        repo.delete(&"1".into());
        sync.apply(&sub.try_next().expect("delete echo"));
        assert!(cache.get(&"1".into()).is_none());
        assert_eq!(cache.snapshot().len(), 2);
    }

    #[tokio::test]
    async fn test_blank_admin_insert_is_inert() {
        let hub = ChangeHub::new();
        let repo = MemoryRepository::new(two_items());
        repo.echo_into("public", TABLE, hub.clone());
        let mut sub = hub
            .subscribe(ChangeFilter::new("public", TABLE, &ChangeKind::ALL))
            .unwrap();

        let admin = AdminController::new(repo.clone());
        assert_eq!(admin.add_item("    ").await, Ok(false));
        assert_eq!(repo.calls(), 0);
        assert_eq!(repo.rows(), two_items());
        assert!(sub.try_next().is_none());
    }

    #[tokio::test]
    async fn test_remote_update_beats_pending_optimistic_state() {
        let hub = ChangeHub::new();
        let repo = MemoryRepository::new(two_items());
        let cache = SharedItems::new(two_items());
        let sync = SyncClient::new(repo.clone(), cache.clone(), SyncMode::UpdatesOnly);
        let sub = hub.subscribe(sync.filter("public", TABLE)).unwrap();

        ToggleController::new(repo.clone(), cache.clone())
            .toggle(&"2".into(), false)
            .await
            .unwrap();
        // another device unticks it again; last applied wins
        hub.publish(ChangeEvent::new("public", TABLE, RowChange::Update(Item::new(2u64, "B"))));
        hub.close();
        sync.follow(sub).await;

        assert!(!cache.get(&"2".into()).unwrap().checked);
    }
}
