//! Separate invocations sharing one home directory, the way the CLI runs.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use guardian_application::{AuthUseCase, StoreService};
use guardian_core::auth::Role;
use guardian_core::rate_limit::RateLimitPolicy;
use guardian_core::session::{Credentials, LoginGrant, Plan};
use guardian_core::simulation::SimulationEvent;
use guardian_core::store::{Command, CommandOutcome, MAX_TASKS};
use guardian_core::task::{Task, TaskStatus, Tier};
use guardian_infrastructure::demo_identity_provider::{DEMO_EMAIL, DEMO_PASSWORD};
use guardian_infrastructure::{AsyncDirTaskRepository, DemoIdentityProvider, StateRepositoryImpl};
use tempfile::TempDir;

struct Invocation {
    store: Arc<StoreService>,
    auth: AuthUseCase,
}

async fn start(base: &Path) -> Invocation {
    let state = StateRepositoryImpl::new(Some(base)).await.unwrap();
    let tasks = AsyncDirTaskRepository::new(Some(base)).await.unwrap();
    let provider = DemoIdentityProvider::open(Some(base)).await.unwrap();
    let store = Arc::new(
        StoreService::load(Arc::new(state), Arc::new(tasks), RateLimitPolicy::Clamp)
            .await
            .unwrap(),
    );
    let auth = AuthUseCase::new(Arc::new(provider), store.clone());
    Invocation { store, auth }
}

fn arriving(id: &str) -> Task {
    Task {
        id: id.to_string(),
        client_id: "SecureBank (Enterprise)".to_string(),
        tier: Tier::Enterprise,
        input: "Summarize the fraud report.".to_string(),
        ai_draft: "Three suspicious transfers were flagged.".to_string(),
        confidence: 90,
        status: TaskStatus::Pending,
        risk_flag: false,
        timestamp: Utc::now(),
    }
}

fn password(email: &str, password: &str) -> Credentials {
    Credentials::Password {
        email: email.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn password_login_survives_into_next_invocation() {
    let temp_dir = TempDir::new().unwrap();

    {
        let first = start(temp_dir.path()).await;
        let outcome = first
            .auth
            .login(password(DEMO_EMAIL, DEMO_PASSWORD))
            .await
            .unwrap();
        assert!(outcome.is_applied());
    }

    let second = start(temp_dir.path()).await;
    assert!(second.auth.verify_session().await.unwrap());

    let store = second.store.store().snapshot().await;
    assert!(store.is_authenticated());
    assert_eq!(store.session().email.as_deref(), Some(DEMO_EMAIL));
}

#[tokio::test]
async fn signed_up_account_can_log_in_later() {
    let temp_dir = TempDir::new().unwrap();

    {
        let first = start(temp_dir.path()).await;
        first
            .auth
            .sign_up("ops@example.com", "secret123", Plan::Vip)
            .await
            .unwrap();
        first.auth.logout().await.unwrap();
    }

    let second = start(temp_dir.path()).await;
    assert!(!second.auth.verify_session().await.unwrap());
    second
        .auth
        .login(password("ops@example.com", "secret123"))
        .await
        .unwrap();

    let third = start(temp_dir.path()).await;
    assert!(third.auth.verify_session().await.unwrap());
}

#[tokio::test]
async fn logout_in_one_invocation_ends_the_session_for_all() {
    let temp_dir = TempDir::new().unwrap();

    let running = start(temp_dir.path()).await;
    running
        .auth
        .login(password(DEMO_EMAIL, DEMO_PASSWORD))
        .await
        .unwrap();

    start(temp_dir.path()).await.auth.logout().await.unwrap();

    // The older invocation still holds the session in memory
    assert!(running.store.store().read(|s| s.is_authenticated()).await);
    assert!(!running.auth.verify_session().await.unwrap());
    assert!(!start(temp_dir.path()).await.auth.verify_session().await.unwrap());
}

#[tokio::test]
async fn kill_switch_from_another_invocation_stops_running_simulation() {
    let temp_dir = TempDir::new().unwrap();

    let simulating = start(temp_dir.path()).await;
    simulating
        .store
        .execute(Command::Login(LoginGrant::for_plan(Plan::Vip)))
        .await
        .unwrap();
    simulating.store.execute(Command::CompleteWizard).await.unwrap();

    let other = start(temp_dir.path()).await;
    other.store.execute(Command::SetKillSwitch(true)).await.unwrap();

    let outcome = simulating
        .store
        .apply_simulation_event(SimulationEvent::StatsDrift { runs: 1, money: 0 })
        .await
        .unwrap();

    assert_eq!(outcome, CommandOutcome::Unchanged);
    assert!(simulating.store.store().kill_switch().await);

    let reopened = start(temp_dir.path()).await;
    assert!(reopened.store.store().kill_switch().await);
}

#[tokio::test]
async fn simulation_tick_keeps_changes_made_elsewhere() {
    let temp_dir = TempDir::new().unwrap();

    let simulating = start(temp_dir.path()).await;
    simulating
        .store
        .execute(Command::Login(LoginGrant::for_plan(Plan::Enterprise)))
        .await
        .unwrap();
    let runs = simulating.store.store().read(|s| s.stats().total_runs).await;

    let other = start(temp_dir.path()).await;
    other.auth.set_role(Role::Auditor).await.unwrap();

    let outcome = simulating
        .store
        .apply_simulation_event(SimulationEvent::StatsDrift { runs: 1, money: 0 })
        .await
        .unwrap();
    assert!(outcome.is_applied());

    let store = start(temp_dir.path()).await.store.store().snapshot().await;
    assert_eq!(store.user_role(), Role::Auditor);
    assert_eq!(store.stats().total_runs, runs + 1);
    assert!(store.is_authenticated());
}

#[tokio::test]
async fn task_directory_stays_within_queue_cap() {
    let temp_dir = TempDir::new().unwrap();
    let simulating = start(temp_dir.path()).await;

    for i in 0..(MAX_TASKS + 5) {
        let event = SimulationEvent::TaskArrived(arriving(&format!("live-{i}")));
        simulating.store.apply_simulation_event(event).await.unwrap();
    }

    let files = std::fs::read_dir(temp_dir.path().join("tasks"))
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "json"))
        .count();
    assert_eq!(files, MAX_TASKS);
    assert!(!temp_dir.path().join("tasks").join("live-4.json").exists());

    let reopened = start(temp_dir.path()).await;
    assert_eq!(
        reopened.store.store().read(|s| s.tasks().len()).await,
        MAX_TASKS
    );
}
