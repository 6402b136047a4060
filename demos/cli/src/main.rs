//! Simple CLI walkthrough of the synchronization controller.
//!
//! This drives a full session against the in-memory store: sign in, create
//! lists, add and toggle todos, survive a simulated connectivity failure,
//! and delete a list.

use listsync_core::environment::SystemClock;
use listsync_core::types::{Color, TodoList, UserId};
use listsync_runtime::{SyncController, SyncEnvironment};
use listsync_testing::mocks::{MemoryListStore, StaticIdentity};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn print_lists(lists: &[TodoList]) {
    for list in lists {
        println!(
            "  {} ({}) - {} remaining, {} completed",
            list.name,
            list.color,
            list.remaining_count(),
            list.completed_count()
        );
        for todo in &list.todos {
            let status = if todo.completed { "x" } else { " " };
            println!("    [{}] {}", status, todo.title);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Listsync Demo ===\n");

    let store = Arc::new(MemoryListStore::new());
    let env = SyncEnvironment::new(
        Arc::new(StaticIdentity::new(UserId::new("demo-user"))),
        Arc::clone(&store) as Arc<dyn listsync_core::store::ListStore>,
        Arc::new(SystemClock),
    );

    let controller = SyncController::initialize(env).await?;
    println!("Signed in as {}", controller.user());

    // Create two lists
    let palette = Color::palette();
    controller.create_list("Groceries", palette[0].clone()).await?;
    controller.create_list("Chores", palette[1].clone()).await?;

    let groceries = controller
        .lists()
        .await
        .into_iter()
        .find(|l| l.name == "Groceries")
        .map(|l| l.id)
        .ok_or_else(|| anyhow::anyhow!("Groceries list missing after refresh"))?;

    // Fill the grocery list
    controller.add_todo(&groceries, "Milk").await?;
    controller.add_todo(&groceries, "Eggs").await?;
    controller.add_todo(&groceries, "Bread").await?;

    // A duplicate title is silently ignored
    controller.add_todo(&groceries, "Milk").await?;

    println!("\nAfter adding todos:");
    controller.with_lists(print_lists).await;

    // Complete one
    controller.toggle_todo(&groceries, 0).await?;
    println!("\nAfter completing 'Milk':");
    controller.with_lists(print_lists).await;

    // Simulated connectivity loss: the mutation fails, the snapshot stays
    // consistent, and the user gets the familiar notice.
    store.set_offline(true);
    if let Err(err) = controller.toggle_todo(&groceries, 1).await {
        println!("\nWhile offline: {}", err.user_message());
    }
    store.set_offline(false);

    // Clean up one list
    let chores = controller
        .lists()
        .await
        .into_iter()
        .find(|l| l.name == "Chores")
        .map(|l| l.id)
        .ok_or_else(|| anyhow::anyhow!("Chores list missing after refresh"))?;
    controller.delete_list(&chores).await?;

    println!("\nFinal state:");
    controller.with_lists(print_lists).await;

    println!("\n=== Demo Complete ===");
    Ok(())
}
