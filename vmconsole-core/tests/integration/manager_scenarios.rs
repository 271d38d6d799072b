//! Session manager scenarios

use uuid::Uuid;
use vmconsole_core::capability::StaticCapabilities;
use vmconsole_core::config::OrchestratorConfig;
use vmconsole_core::session::{SessionManager, SessionStatus};
use vmconsole_core::testing::{LivenessProbe, ScriptedBehavior, ScriptedClient, recording_targets};

use super::{caps, vnc_option, wait_until};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Runtime::new().expect("Failed to create runtime")
}

#[test]
fn reopening_a_vm_console_closes_the_previous_session() {
    let rt = runtime();
    rt.block_on(async {
        let client = ScriptedClient::new(vec![ScriptedBehavior::Connect, ScriptedBehavior::Connect]);
        let probe = LivenessProbe::new();
        let vm_id = Uuid::new_v4();

        let mut manager = SessionManager::new();
        let first = manager
            .open_for_vm(
                vm_id,
                "web-01",
                vec![vnc_option("a")],
                recording_targets(&probe),
                caps(StaticCapabilities::none().with_vnc_transport(client.clone())),
                OrchestratorConfig::default(),
            )
            .expect("open first session");

        wait_until(|| probe.live() == 1).await;

        let second = manager
            .open_for_vm(
                vm_id,
                "web-01",
                vec![vnc_option("b")],
                recording_targets(&probe),
                caps(StaticCapabilities::none().with_vnc_transport(client.clone())),
                OrchestratorConfig::default(),
            )
            .expect("open second session");

        assert_ne!(first, second);
        assert_eq!(manager.len(), 1);

        // The first session's adapter was released; the second is live.
        wait_until(|| probe.binds() == 2 && probe.releases() == 1).await;
        assert_eq!(probe.live(), 1);

        manager.close_all();
        wait_until(|| probe.live() == 0).await;
        assert!(manager.is_empty());
    });
}

#[test]
fn close_vm_reports_whether_a_session_existed() {
    let rt = runtime();
    rt.block_on(async {
        let client = ScriptedClient::new(vec![ScriptedBehavior::Connect]);
        let probe = LivenessProbe::new();
        let vm_id = Uuid::new_v4();

        let mut manager = SessionManager::new();
        manager
            .open_for_vm(
                vm_id,
                "web-01",
                vec![vnc_option("a")],
                recording_targets(&probe),
                caps(StaticCapabilities::none().with_vnc_transport(client.clone())),
                OrchestratorConfig::default(),
            )
            .expect("open session");

        assert!(manager.close_vm(vm_id));
        assert!(!manager.close_vm(vm_id));
        wait_until(|| probe.live() == 0).await;
    });
}

#[test]
fn prune_terminal_drops_finished_sessions() {
    let rt = runtime();
    rt.block_on(async {
        let probe = LivenessProbe::new();
        let vm_id = Uuid::new_v4();

        let mut manager = SessionManager::new();
        manager
            .open_for_vm(
                vm_id,
                "web-01",
                Vec::new(),
                recording_targets(&probe),
                caps(StaticCapabilities::none()),
                OrchestratorConfig::default(),
            )
            .expect("open session");

        // The empty option list exhausts immediately.
        assert!(manager.session(vm_id).is_some());
        wait_until(|| {
            matches!(
                manager.session(vm_id).map(|s| s.status()),
                Some(SessionStatus::Exhausted(_))
            )
        })
        .await;

        assert_eq!(manager.active_count(), 0);
        manager.prune_terminal();
        assert!(manager.is_empty());
    });
}
