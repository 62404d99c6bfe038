//! Integration tests: document stores (ovl-store).

use ovl_core::{CanvasSize, Element, ElementId, LayoutDocument, Scene, ShapeKind};
use ovl_store::{DocumentStore, FileStore, MemoryStore, StoreError, UserId};
use pretty_assertions::assert_eq;

fn sample_doc(updated_at: u64) -> LayoutDocument {
    let mut scene = Scene::with_canvas(CanvasSize {
        width: 1280,
        height: 720,
    });
    scene
        .elements
        .push(Element::shape(ElementId::from_raw(1), ShapeKind::Heart));
    scene.elements.push(Element::text(ElementId::from_raw(2)));
    LayoutDocument::from_scene(&scene, updated_at)
}

async fn exercise(store: &dyn DocumentStore) {
    let user = UserId::new("user-1").unwrap();
    let other = UserId::new("user-2").unwrap();

    assert_eq!(store.fetch_one(&user).await.unwrap(), None);

    store.upsert(&user, &sample_doc(1)).await.unwrap();
    assert_eq!(store.fetch_one(&user).await.unwrap(), Some(sample_doc(1)));

    // Upsert replaces the single document
    store.upsert(&user, &sample_doc(2)).await.unwrap();
    assert_eq!(store.fetch_one(&user).await.unwrap().unwrap().updated_at, 2);

    // Other users are isolated
    assert_eq!(store.fetch_one(&other).await.unwrap(), None);
}

#[tokio::test]
async fn memory_store_contract() {
    let store = MemoryStore::new();
    exercise(&store).await;
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn file_store_contract() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("layouts"));
    exercise(&store).await;
    assert!(dir.path().join("layouts/user-1.json").exists());
}

#[tokio::test]
async fn file_store_reports_corrupt_documents() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.json"), b"{ not json").unwrap();
    let store = FileStore::new(dir.path());
    let err = store
        .fetch_one(&UserId::new("broken").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Json(_)));
}
