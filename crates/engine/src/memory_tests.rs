use super::fake::FakeMemoryClient;
use super::*;

#[tokio::test]
async fn fake_client_records_read_and_write_calls() {
    let client = FakeMemoryClient::new();
    client
        .read(MemoryReadOp::ReadGraph, serde_json::json!({}))
        .await
        .unwrap();
    client
        .write(MemoryWriteOp::AddObservations, serde_json::json!({}))
        .await
        .unwrap();
    assert_eq!(
        client.calls(),
        vec!["read:ReadGraph".to_string(), "write:AddObservations".to_string()]
    );
}
