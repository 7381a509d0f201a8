use anyhow::{Context, Result};

use tasklist_server::client::{TodoClient, TodoList};

#[tokio::main]
async fn main() -> Result<()> {
    // Start the server with APP_IDENTITY__SEED_USER_ID set to the same token.
    let base = std::env::var("BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:3001".to_string());
    let token = std::env::var("TOKEN").unwrap_or_else(|_| "demo-user".to_string());

    let client = TodoClient::new(&base, &token).context("building http client failed")?;

    let me = client.me().await.context("resolving identity failed")?;
    println!("==> signed in as {}", me.id);

    let mut todos = TodoList::new(client.list().await.context("listing todos failed")?);
    println!("{} existing todos, {} open", todos.len(), todos.remaining());

    let created = client.create("  buy milk  ").await.context("create failed")?;
    println!("created #{} {:?}", created.id, created.text);
    todos.push_created(created.clone());

    let toggled = client.toggle(&created).await.context("toggle failed")?;
    println!("#{} completed={}", toggled.id, toggled.completed);
    todos.replace(toggled);

    client.delete(created.id).await.context("delete failed")?;
    todos.remove(created.id);
    println!("deleted #{}; {} todos left", created.id, todos.len());

    for item in todos.items() {
        let mark = if item.completed { "x" } else { " " };
        println!("[{mark}] #{} {}", item.id, item.text);
    }
    Ok(())
}
