//! End-to-end reads against a file-backed index.

use std::collections::HashSet;

use evx_core::entities::{ArticleMetadata, Association};
use evx_core::enums::EntityType;
use evx_db::AssociationStore;
use pretty_assertions::assert_eq;

fn edge(article: &str, entity: &str, ty: EntityType) -> Association {
    Association {
        article_id: article.into(),
        entity_id: entity.into(),
        entity_type: ty,
        source: "PubMed".into(),
    }
}

#[tokio::test]
async fn data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("evidex.db");
    let path = path.to_str().unwrap();

    {
        let store = AssociationStore::open_local(path).await.unwrap();
        store
            .insert_associations(&[
                edge("10", "DB00811", EntityType::Drug),
                edge("11", "DB00811", EntityType::Drug),
                edge("11", "P0DTD1", EntityType::Target),
            ])
            .await
            .unwrap();
        store
            .insert_articles(&[ArticleMetadata {
                id: "10".into(),
                source: "PubMed".into(),
                title: Some("Ribavirin in SARS-CoV-2".into()),
                full_text_id: Some("PMC7".into()),
                ..ArticleMetadata::default()
            }])
            .await
            .unwrap();
        store.insert_sentiments(&[("11".into(), 0.8)]).await.unwrap();
        store
            .put_popular_query("ribavirin", &["10".into(), "11".into()])
            .await
            .unwrap();
    }

    let store = AssociationStore::open_local(path).await.unwrap();
    let counters = store.baseline_counters().await.unwrap();
    assert_eq!(counters[&("DB00811".to_string(), EntityType::Drug)], 2);

    let cached = store.popular_query("Ribavirin").await.unwrap().unwrap();
    let ids: HashSet<String> = cached.into_iter().collect();
    let edges = store.associations_for_articles(Some(&ids)).await.unwrap();
    assert_eq!(edges.len(), 3);

    let meta = store.titles_and_metadata(Some(&ids)).await.unwrap();
    assert_eq!(
        meta["10"].pdf_url().as_deref(),
        Some("https://www.ncbi.nlm.nih.gov/pmc/articles/PMC7/pdf")
    );
    assert_eq!(meta["10"].canonical_url(), "https://pubmed.ncbi.nlm.nih.gov/10/");

    let sentiments = store.sentiments(Some(&ids)).await.unwrap();
    assert_eq!(sentiments.len(), 1);
}
