//! Postgres-backed repository tests.
//!
//! Need the `postgres-repo` feature and a reachable `DATABASE_URL`; skipped otherwise.
#![cfg(feature = "postgres-repo")]

use std::sync::Arc;

use ticket_desk::db::factory::RepositoryFactory;
use ticket_desk::db::repository::{AnalyticsRepository, TicketRepository};
use ticket_desk::db::{PostgresConfig, PostgresRepository};
use ticket_desk::models::{Category, NewTicket, Priority, TicketChanges, TicketFilter};

async fn repository() -> Option<Arc<PostgresRepository>> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let config = PostgresConfig::with_url(url);
    Some(
        RepositoryFactory::create_postgres(&config)
            .await
            .expect("postgres repository"),
    )
}

#[tokio::test]
async fn test_ticket_lifecycle() {
    let Some(repo) = repository().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    let marker = format!("pgtest-{}", chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0));
    let created = repo
        .create_ticket(
            NewTicket::new(format!("Lifecycle {}", marker), "Disk usage at 95%")
                .with_category(Category::Technical)
                .with_priority(Priority::High),
        )
        .await
        .unwrap();
    assert_eq!(created.status, "open");

    let fetched = repo.get_ticket(created.id).await.unwrap();
    assert_eq!(fetched, created);

    let filter = TicketFilter::default()
        .with_category(Category::Technical)
        .with_search(marker.to_uppercase());
    let found = repo.list_tickets(&filter).await.unwrap();
    assert_eq!(found.len(), 1);

    let updated = repo
        .update_ticket(
            created.id,
            TicketChanges {
                status: Some("resolved".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, "resolved");
    assert_eq!(updated.created_at, created.created_at);

    let counts = repo.ticket_counts().await.unwrap();
    assert!(counts.total >= 1);
    assert!(counts.first_created_at.is_some());

    repo.delete_ticket(created.id).await.unwrap();
    assert!(repo.get_ticket(created.id).await.unwrap_err().is_not_found());
    assert!(repo.delete_ticket(created.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let Some(repo) = repository().await else {
        return;
    };

    let marker = format!("pgwild-{}", chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0));
    let ticket = repo
        .create_ticket(NewTicket::new(format!("{} 100% done", marker), "x"))
        .await
        .unwrap();

    let hits = repo
        .list_tickets(&TicketFilter::default().with_search(format!("{} 100%", marker)))
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);

    let misses = repo
        .list_tickets(&TicketFilter::default().with_search(format!("{}_", marker)))
        .await
        .unwrap();
    assert!(misses.is_empty());

    repo.delete_ticket(ticket.id).await.unwrap();
}
