//! Minimal kitchen status board: polls the backend, prints the order
//! collection with elapsed cook times, and advances an order when an id
//! is typed on stdin.
//!
//! ```bash
//! cargo run --example kitchen_board -- http://localhost:8080
//! ```

use saffron_client::{
    ActorRole, BackgroundTasks, ClientConfig, LifecycleManager, OrderStore, PollingSynchronizer,
    Viewer,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,saffron_client=debug".into()),
        )
        .init();

    let base_url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://localhost:8080".to_string());
    let config = ClientConfig::new(base_url);

    let api = Arc::new(config.build_http_client()?);
    let store = Arc::new(OrderStore::new(config.max_pending_polls));
    let manager = LifecycleManager::new(api.clone(), store.clone());
    let synchronizer =
        PollingSynchronizer::new(api, store.clone(), config.clone(), manager.notice_sender());

    let mut tasks = BackgroundTasks::new();
    synchronizer.spawn(&mut tasks, Viewer::Kitchen);
    let mut elapsed_rx = saffron_client::ElapsedTicker::new(store.clone(), config.elapsed_tick)
        .spawn(&mut tasks);

    let mut notices = manager.subscribe_notices();
    tokio::spawn(async move {
        while let Ok(notice) = notices.recv().await {
            println!("!! {:?}", notice);
        }
    });

    println!("Kitchen board. Type an order id to advance it, Ctrl-D to quit.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = elapsed_rx.changed() => {
                let elapsed = elapsed_rx.borrow().clone();
                println!("---");
                for order in store.snapshot() {
                    let timer = elapsed
                        .get(&order.id)
                        .map(String::as_str)
                        .unwrap_or("-");
                    println!(
                        "#{:<4} {:<18} {:<10} {}",
                        order.id, order.status, timer, order.customer_name
                    );
                }
            }
            line = lines.next_line() => {
                match line {
                    Ok(Some(text)) => {
                        let Ok(order_id) = text.trim().parse::<i64>() else {
                            continue;
                        };
                        match manager.advance(order_id, ActorRole::Kitchen).await {
                            Ok(order) => println!("#{} -> {}", order.id, order.status),
                            Err(e) => println!("!! {}", e),
                        }
                    }
                    _ => break,
                }
            }
        }
    }

    tasks.shutdown().await;
    Ok(())
}
