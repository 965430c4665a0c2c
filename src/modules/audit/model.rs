use serde::Serialize;

#[derive(Debug, Clone)]
pub struct NewLogEntry {
    pub method: String,
    pub username: String,
    pub table_name: String,
    pub action: String,
}

#[derive(Serialize)]
pub struct ClearedResponse {
    pub removed: u64,
}
