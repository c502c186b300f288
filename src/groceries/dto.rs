use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct DeleteItemsRequest {
    pub ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RemovedResponse {
    pub removed: usize,
}
