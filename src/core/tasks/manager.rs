use std::{
    sync::{
        mpsc,
        Arc,
    },
    thread,
};

use tokio::runtime::Runtime;

use super::types::TaskResult;
use crate::catalog::CatalogApi;

/// Runs catalog fetches off the owning thread and marshals their results
/// back over a channel. The owning thread drains the channel with
/// [`TaskManager::poll_results`]; nothing here mutates session state.
pub struct TaskManager {
    runtime: Arc<Runtime>,
    receiver: mpsc::Receiver<TaskResult>,
    sender: mpsc::Sender<TaskResult>,
}

impl TaskManager {
    pub fn new() -> Self {
        let runtime = Arc::new(Runtime::new().expect("Failed to create TaskManager runtime"));

        let (sender, receiver) = mpsc::channel();

        Self { runtime, receiver, sender }
    }

    pub fn poll_results(&mut self) -> Vec<TaskResult> {
        let mut results = Vec::new();

        while let Ok(result) = self.receiver.try_recv() {
            results.push(result);
        }

        results
    }

    fn task_context(&self) -> (mpsc::Sender<TaskResult>, Arc<Runtime>) {
        (self.sender.clone(), self.runtime.clone())
    }

    pub fn fetch_page(&self, api: Arc<dyn CatalogApi>, page: u32) {
        let (sender, runtime) = self.task_context();

        thread::spawn(move || {
            let result =
                runtime.block_on(api.list_page(page)).map_err(|e| e.to_string());

            let _ = sender.send(TaskResult::Page { page, result });
        });
    }

    pub fn search_page(&self, api: Arc<dyn CatalogApi>, query: String, page: u32) {
        let (sender, runtime) = self.task_context();

        thread::spawn(move || {
            let result =
                runtime.block_on(api.list_page_by_name(&query, page)).map_err(|e| e.to_string());

            let _ = sender.send(TaskResult::Search { query, page, result });
        });
    }
}
