mod helpers;

use std::collections::HashSet;

use brewlog::journal::{photo, EntryId, EntryInput};
use brewlog::JournalError;
use helpers::{alto, beanery, luna, seed, test_store};

#[tokio::test]
async fn add_then_list_contains_exactly_the_new_entry() {
    let store = test_store().await;
    seed(&store).await;
    let before = store.list_all().await.unwrap();

    let input = EntryInput::new("Kiln").order("Espresso").price(2.8).rating(Some(4));
    let id = store.add_entry(input.clone()).await.unwrap();

    let after = store.list_all().await.unwrap();
    assert_eq!(after.len(), before.len() + 1);
    assert!(before.iter().all(|e| e.id != id));

    let new: Vec<_> = after.iter().filter(|e| e.id == id).collect();
    assert_eq!(new.len(), 1);
    assert_eq!(new[0], &input.into_entry(id));
}

#[tokio::test]
async fn list_is_in_id_order() {
    let store = test_store().await;
    let (l, a, b) = seed(&store).await;
    let ids: Vec<EntryId> = store.list_all().await.unwrap().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![l, a, b]);
}

#[tokio::test]
async fn count_tracks_adds_minus_deletes() {
    let store = test_store().await;
    let (l, a, _) = seed(&store).await;

    assert!(store.delete_entry(l).await.unwrap());
    assert!(!store.delete_entry(EntryId(10_000)).await.unwrap());
    assert_eq!(store.list_all().await.unwrap().len(), 2);

    // Second delete of the same id is a no-op
    assert!(!store.delete_entry(l).await.unwrap());
    assert!(store.delete_entry(a).await.unwrap());
    assert_eq!(store.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn constraint_violations_are_write_errors() {
    let store = test_store().await;

    let err = store.add_entry(EntryInput::new("")).await.unwrap_err();
    assert!(matches!(err, JournalError::WriteError(_)), "{err}");

    let err = store
        .add_entry(EntryInput::new("Luna").rating(Some(7)))
        .await
        .unwrap_err();
    assert!(matches!(err, JournalError::WriteError(_)), "{err}");

    let err = store
        .add_entry(EntryInput::new("Luna").price(-1.0))
        .await
        .unwrap_err();
    assert!(matches!(err, JournalError::WriteError(_)), "{err}");

    assert!(store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn non_finite_prices_become_zero() {
    let store = test_store().await;
    let inf = store
        .add_entry(EntryInput::new("Luna").price(f64::INFINITY))
        .await
        .unwrap();
    let nan = store
        .add_entry(EntryInput::new("Alto").price(f64::NAN))
        .await
        .unwrap();

    let all = store.list_all().await.unwrap();
    assert_eq!(all.iter().map(|e| e.id).collect::<Vec<_>>(), vec![inf, nan]);
    assert!(all.iter().all(|e| e.price == 0.0));
}

#[tokio::test]
async fn photo_round_trip_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("latte.jpg");
    let original: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
    std::fs::write(&path, &original).unwrap();

    let store = test_store().await;
    let blob = photo::encode(&path).await.unwrap();
    let id = store
        .add_entry(EntryInput::new("Luna").photo(Some(blob)))
        .await
        .unwrap();

    let stored = store
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .find(|e| e.id == id)
        .unwrap();
    assert_eq!(stored.photo.unwrap().as_bytes(), original.as_slice());
}

#[tokio::test]
async fn concurrent_adds_get_distinct_ids() {
    let store = test_store().await;

    let mut handles = Vec::new();
    for i in 0..16 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .add_entry(EntryInput::new(format!("Shop {i}")))
                .await
                .unwrap()
        }));
    }

    let mut ids = HashSet::new();
    for handle in handles {
        ids.insert(handle.await.unwrap());
    }
    assert_eq!(ids.len(), 16);
    assert_eq!(store.list_all().await.unwrap().len(), 16);
}

#[tokio::test]
async fn deleting_one_leaves_the_rest_untouched() {
    let store = test_store().await;
    let (l, a, b) = seed(&store).await;
    store.delete_entry(l).await.unwrap();

    let rest = store.list_all().await.unwrap();
    assert_eq!(rest, vec![alto().into_entry(a), beanery().into_entry(b)]);
    assert!(rest.iter().all(|e| *e != luna().into_entry(l)));
}
