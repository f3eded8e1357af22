//! Round trip against a real PostgreSQL database.
//!
//! Run with: `DATABASE_URL=postgres://... cargo test --test postgres_store -- --ignored`

#![allow(clippy::panic)]

use vitrine::config::DatabaseConfig;
use vitrine::domain::{GalleryPayload, ListFilter, NewGalleryRecord, StoredImage};
use vitrine::error::SiteError;
use vitrine::persistence::{GalleryRepository, PostgresGalleryRepository};

fn image(tag: &str) -> StoredImage {
    StoredImage {
        url: format!("https://cdn.example/{tag}.jpg"),
        storage_id: format!("gallery/{tag}"),
    }
}

#[tokio::test]
#[ignore = "needs DATABASE_URL pointing at a disposable database"]
async fn postgres_round_trip() {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        panic!("DATABASE_URL is not set");
    };
    let config = DatabaseConfig {
        url,
        max_connections: 2,
        min_connections: 1,
        connect_timeout_secs: 5,
    };
    let Ok(store) = PostgresGalleryRepository::connect(&config).await else {
        panic!("connect failed");
    };

    let Ok(single) = store
        .insert(NewGalleryRecord {
            description: Some("Bathroom".to_string()),
            payload: GalleryPayload::Single(image("single")),
        })
        .await
    else {
        panic!("insert single failed");
    };
    let Ok(pair) = store
        .insert(NewGalleryRecord {
            description: None,
            payload: GalleryPayload::BeforeAfter {
                before: image("before"),
                after: image("after"),
            },
        })
        .await
    else {
        panic!("insert pair failed");
    };
    assert!(!single.is_featured);
    assert_eq!(pair.payload.images().len(), 2);

    let Ok(featured) = store.set_featured(pair.id, true).await else {
        panic!("feature failed");
    };
    assert!(featured.is_featured);

    let Ok(listed) = store.list(ListFilter::FeaturedOnly).await else {
        panic!("list failed");
    };
    assert!(listed.iter().any(|r| r.id == pair.id));
    assert!(listed.iter().all(|r| r.is_featured));

    for id in [single.id, pair.id] {
        let Ok(removed) = store.remove(id).await else {
            panic!("remove failed");
        };
        assert_eq!(removed.id, id);
        assert!(matches!(
            store.remove(id).await,
            Err(SiteError::PhotoNotFound(_))
        ));
    }
}
