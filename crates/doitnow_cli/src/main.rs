//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `doitnow_core` linkage without the Flutter/FFI runtime.
//! - Run one add/toggle/clear round against an in-memory store.

use doitnow_core::{MemoryKeyValueStore, TaskService, TaskSummary, QUICK_ADD_SUGGESTIONS};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    println!("doitnow_core ping={}", doitnow_core::ping());
    println!("doitnow_core version={}", doitnow_core::core_version());

    let runtime = tokio::runtime::Builder::new_current_thread().build()?;
    let summary = runtime.block_on(smoke_round())?;
    println!(
        "doitnow_core smoke total={} completed={} active={}",
        summary.total, summary.completed, summary.active
    );
    Ok(())
}

async fn smoke_round() -> Result<TaskSummary, Box<dyn Error>> {
    let service = TaskService::with_backend(MemoryKeyValueStore::new());
    for title in QUICK_ADD_SUGGESTIONS {
        service.quick_add(title).await?;
    }
    let tasks = service.store().list().await?;
    if let Some(last) = tasks.last() {
        service.toggle_task(&last.id).await?;
    }
    service.clear_completed().await?;
    Ok(service.summary().await?)
}
