use super::*;
use xbot_adapters::fake::FakeUnifiedContext;
use xbot_core::test_support::sample_task_config;
use xbot_core::{FakeClock, SequentialIdGen};
use xbot_engine::llm::fake::FakeLlmClient;

fn build_runner(
    tmp: &std::path::Path,
    llm: FakeLlmClient,
    adapter: Arc<dyn UnifiedContext>,
) -> (TaskRunner<FakeClock, SequentialIdGen, FakeLlmClient>, SharedInbox<FakeClock, SequentialIdGen>) {
    let clock = FakeClock::default();
    let id_gen = SequentialIdGen::new("t");
    let inbox = Arc::new(xbot_inbox::Inbox::new(tmp, clock.clone(), id_gen.clone()));
    let extensions = Arc::new(ExtensionExecutor::new(Arc::new(SkillLoader::new(tmp.join("skills"))), tmp));
    let skills = Arc::new(SkillLoader::new(tmp.join("skills")));
    let worker_store = Arc::new(WorkerStore::new(tmp));
    let backends = Arc::new(BackendTable::new(
        Arc::new(crate::worker_backends::ShellBackend::new()),
        Arc::new(crate::worker_backends::ShellBackend::new()),
    ));

    let mut adapters = HashMap::new();
    adapters.insert("telegram".to_string(), adapter);

    let runner = TaskRunner {
        data_dir: tmp.to_path_buf(),
        inbox: inbox.clone(),
        llm: Arc::new(llm),
        clock,
        id_gen,
        extensions,
        skills,
        worker_store,
        backends,
        memory: None,
        session_locks: Arc::new(SessionLocks::new()),
        adapters: Arc::new(adapters),
    };
    (runner, inbox)
}

#[tokio::test]
async fn direct_reply_completes_task_and_delivers_through_adapter() {
    let tmp = tempfile::tempdir().unwrap();
    let llm = FakeLlmClient::new();
    llm.push_text("here's your answer");
    let adapter = Arc::new(FakeUnifiedContext::new());
    let (runner, inbox) = build_runner(tmp.path(), llm, adapter.clone());

    let mut config = sample_task_config("what's 2+2?");
    config.platform = "telegram".to_string();
    let envelope = inbox.submit(config).await.unwrap();

    runner.run_task(envelope.clone()).await.unwrap();

    let stored = inbox.get(&envelope.task_id).await.unwrap();
    assert_eq!(stored.status, TaskStatus::Completed);
    assert_eq!(adapter.last_reply_text().as_deref(), Some("here's your answer"));
}

#[tokio::test]
async fn turn_budget_exhaustion_fails_the_task() {
    let tmp = tempfile::tempdir().unwrap();
    let llm = FakeLlmClient::new();
    for i in 0..20 {
        llm.push_function_call("read", serde_json::json!({"path": format!("x{i}")}));
    }
    let adapter = Arc::new(FakeUnifiedContext::new());
    let (runner, inbox) = build_runner(tmp.path(), llm, adapter.clone());

    let mut config = sample_task_config("loop forever");
    config.platform = "telegram".to_string();
    let envelope = inbox.submit(config).await.unwrap();

    runner.run_task(envelope.clone()).await.unwrap();

    let stored = inbox.get(&envelope.task_id).await.unwrap();
    assert_eq!(stored.status, TaskStatus::Failed);
    assert!(adapter.last_reply_text().is_some());
}

#[tokio::test]
async fn no_reply_sent_when_task_does_not_require_one() {
    let tmp = tempfile::tempdir().unwrap();
    let llm = FakeLlmClient::new();
    llm.push_text("quiet background result");
    let adapter = Arc::new(FakeUnifiedContext::new());
    let (runner, inbox) = build_runner(tmp.path(), llm, adapter.clone());

    let mut config = sample_task_config("background cron job");
    config.platform = "telegram".to_string();
    config.requires_reply = false;
    let envelope = inbox.submit(config).await.unwrap();

    runner.run_task(envelope.clone()).await.unwrap();

    assert!(adapter.last_reply_text().is_none());
}
