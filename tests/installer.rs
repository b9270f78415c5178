use adb_install_wizard::{
    Bridge, DeviceListing, Dialog, DialogKind, FailureReason, InstallProgress, InstallResult,
    InstallTarget, Installer, StatusSink, ToolProvisioner, WizardConfig, WizardConfigBuilder,
    WizardError, WizardPanel, WizardResult,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const VERSION: &str = "Android Debug Bridge version 1.0.41\nVersion 34.0.5-10900879\n";
const HEADER: &str = "List of devices attached\n";

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Progress(u8, String),
    Status(String),
    Devices(DeviceListing),
    Controls(bool),
    Dialog(DialogKind),
}

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<Event>>,
}

impl RecordingSink {
    fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    fn percents(&self) -> Vec<u8> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Progress(p, _) => Some(p),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl StatusSink for RecordingSink {
    fn on_progress(&self, progress: &InstallProgress) {
        self.push(Event::Progress(progress.percent, progress.message.clone()));
    }

    fn on_status(&self, message: &str) {
        self.push(Event::Status(message.to_string()));
    }

    fn on_devices(&self, listing: &DeviceListing) {
        self.push(Event::Devices(listing.clone()));
    }

    fn on_controls(&self, enabled: bool) {
        self.push(Event::Controls(enabled));
    }

    fn on_dialog(&self, dialog: &Dialog) {
        self.push(Event::Dialog(dialog.kind));
    }
}

struct FakeBridge {
    version: Option<String>,
    devices: Option<String>,
    install: String,
    entered: Option<Mutex<Sender<()>>>,
    gate: Option<Mutex<Receiver<()>>>,
    probes: AtomicUsize,
    scans: AtomicUsize,
    pushes: Mutex<Vec<(PathBuf, Option<String>)>>,
}

impl FakeBridge {
    fn new(devices: &str, install: &str) -> Self {
        Self {
            version: Some(VERSION.to_string()),
            devices: Some(format!("{}{}", HEADER, devices)),
            install: install.to_string(),
            entered: None,
            gate: None,
            probes: AtomicUsize::new(0),
            scans: AtomicUsize::new(0),
            pushes: Mutex::new(Vec::new()),
        }
    }

    fn unavailable(&self) -> WizardError {
        WizardError::ToolUnavailable {
            path: PathBuf::from("adb"),
            message: "binary not found in PATH".to_string(),
        }
    }
}

impl Bridge for FakeBridge {
    fn probe_version(&self) -> WizardResult<String> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.version.clone().ok_or_else(|| self.unavailable())
    }

    fn list_devices(&self) -> WizardResult<String> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        self.devices.clone().ok_or_else(|| self.unavailable())
    }

    fn push_package(&self, package: &Path, serial: Option<&str>) -> WizardResult<String> {
        self.pushes
            .lock()
            .unwrap()
            .push((package.to_path_buf(), serial.map(str::to_string)));
        if let Some(entered) = &self.entered {
            entered.lock().unwrap().send(()).unwrap();
        }
        if let Some(gate) = &self.gate {
            gate.lock().unwrap().recv().unwrap();
        }
        Ok(self.install.clone())
    }
}

#[derive(Default)]
struct FakeProvisioner {
    calls: AtomicUsize,
    fail: bool,
}

impl ToolProvisioner for FakeProvisioner {
    fn provision(&self, sink: &dyn StatusSink) -> WizardResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        sink.on_status("provisioning");
        if self.fail {
            Err(WizardError::ToolInstallFailed("download failed".to_string()))
        } else {
            Ok(())
        }
    }
}

fn fast_config() -> WizardConfig {
    WizardConfigBuilder::default()
        .settle_delay(0)
        .provision_delay(0)
        .build()
}

fn installer_with(
    config: WizardConfig,
    bridge: Arc<FakeBridge>,
    provisioner: Arc<FakeProvisioner>,
) -> (Installer, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let installer = Installer::new(config, bridge, provisioner, sink.clone());
    (installer, sink)
}

#[test]
fn successful_install_reports_every_milestone() {
    let bridge = Arc::new(FakeBridge::new(
        "emulator-5554\tdevice\n",
        "Performing Streamed Install\nSuccess\n",
    ));
    let provisioner = Arc::new(FakeProvisioner::default());
    let (installer, sink) = installer_with(fast_config(), bridge.clone(), provisioner.clone());

    let result = installer.install();

    assert_eq!(result, Some(InstallResult::Success));
    assert_eq!(sink.percents(), vec![0, 10, 30, 50, 80, 100]);
    assert_eq!(provisioner.calls.load(Ordering::SeqCst), 0);
    assert!(!installer.is_running());

    let pushes = bridge.pushes.lock().unwrap().clone();
    assert_eq!(pushes, vec![(PathBuf::from("jarvis-ai.apk"), None)]);

    let events = sink.events();
    assert_eq!(events.first(), Some(&Event::Controls(false)));
    assert!(events.contains(&Event::Progress(
        100,
        "✅ Installation completed successfully!".to_string()
    )));
    assert!(events.contains(&Event::Dialog(DialogKind::Info)));
    // 结束时重新扫描设备
    assert!(matches!(events.last(), Some(Event::Status(s)) if s == "Android device(s) detected and ready for installation"));
    assert_eq!(bridge.scans.load(Ordering::SeqCst), 2);
}

#[test]
fn probe_without_product_name_provisions_then_checks_devices() {
    let mut fake = FakeBridge::new("emulator-5554\tdevice\n", "Success\n");
    fake.version = Some("some other tool 2.0\n".to_string());
    let bridge = Arc::new(fake);
    let provisioner = Arc::new(FakeProvisioner::default());
    let (installer, sink) = installer_with(fast_config(), bridge.clone(), provisioner.clone());

    let result = installer.install();

    assert_eq!(result, Some(InstallResult::Success));
    assert_eq!(provisioner.calls.load(Ordering::SeqCst), 1);
    assert!(sink.events().contains(&Event::Progress(
        10,
        "Installing ADB (Android SDK Platform Tools)...".to_string()
    )));
    assert!(sink.events().contains(&Event::Status("provisioning".to_string())));
    assert!(bridge.scans.load(Ordering::SeqCst) >= 1);
}

#[test]
fn provisioning_failure_is_terminal() {
    let mut fake = FakeBridge::new("emulator-5554\tdevice\n", "Success\n");
    fake.version = None;
    let bridge = Arc::new(fake);
    let provisioner = Arc::new(FakeProvisioner {
        calls: AtomicUsize::new(0),
        fail: true,
    });
    let (installer, sink) = installer_with(fast_config(), bridge.clone(), provisioner);

    let result = installer.install();

    assert_eq!(
        result,
        Some(InstallResult::Failure(FailureReason::ToolInstallFailed))
    );
    assert_eq!(sink.percents().last(), Some(&0));
    assert!(bridge.pushes.lock().unwrap().is_empty());
    // 刷新时 ADB 仍不可用
    assert!(sink.events().contains(&Event::Devices(DeviceListing::ToolMissing)));
    assert!(!installer.is_running());
}

#[test]
fn unauthorized_only_is_no_device_found() {
    let bridge = Arc::new(FakeBridge::new("ABCD1234\tunauthorized\n", "Success\n"));
    let (installer, sink) = installer_with(
        fast_config(),
        bridge.clone(),
        Arc::new(FakeProvisioner::default()),
    );

    let result = installer.install();

    assert_eq!(
        result,
        Some(InstallResult::Failure(FailureReason::NoDeviceFound))
    );
    assert_eq!(sink.percents(), vec![0, 10, 30, 0]);
    assert!(sink.events().contains(&Event::Dialog(DialogKind::Error)));
    assert!(bridge.pushes.lock().unwrap().is_empty());

    // 失败后标志已清除，可以再次安装
    assert!(!installer.is_running());
    assert!(installer.install().is_some());
}

#[test]
fn failed_scan_during_device_check_is_no_device_found() {
    let mut fake = FakeBridge::new("", "Success\n");
    fake.devices = None;
    let (installer, _sink) = installer_with(
        fast_config(),
        Arc::new(fake),
        Arc::new(FakeProvisioner::default()),
    );

    assert_eq!(
        installer.install(),
        Some(InstallResult::Failure(FailureReason::NoDeviceFound))
    );
}

#[test]
fn install_failure_marker_is_install_failed() {
    let bridge = Arc::new(FakeBridge::new(
        "emulator-5554\tdevice\n",
        "Failure [INSTALL_FAILED_VERSION_DOWNGRADE]\n",
    ));
    let (installer, sink) = installer_with(
        fast_config(),
        bridge,
        Arc::new(FakeProvisioner::default()),
    );

    let result = installer.install();

    assert_eq!(
        result,
        Some(InstallResult::Failure(FailureReason::InstallFailed))
    );
    assert_eq!(sink.percents(), vec![0, 10, 30, 50, 0]);
    assert!(sink.events().contains(&Event::Progress(
        0,
        "❌ Installation failed: Failed to install APK: Failure [INSTALL_FAILED_VERSION_DOWNGRADE]"
            .to_string()
    )));
    // 失败后仍然恢复按钮并刷新设备列表
    let events = sink.events();
    let controls: Vec<bool> = events
        .iter()
        .filter_map(|e| match e {
            Event::Controls(enabled) => Some(*enabled),
            _ => None,
        })
        .collect();
    assert_eq!(controls, vec![false, true]);
    assert!(events.iter().any(|e| matches!(e, Event::Devices(_))));
}

#[test]
fn second_trigger_while_running_is_ignored() {
    let (entered_tx, entered_rx) = mpsc::channel();
    let (gate_tx, gate_rx) = mpsc::channel();
    let mut fake = FakeBridge::new("emulator-5554\tdevice\n", "Success\n");
    fake.entered = Some(Mutex::new(entered_tx));
    fake.gate = Some(Mutex::new(gate_rx));
    let bridge = Arc::new(fake);
    let (installer, sink) = installer_with(
        fast_config(),
        bridge.clone(),
        Arc::new(FakeProvisioner::default()),
    );

    let handle = installer.spawn().expect("first install starts");
    entered_rx
        .recv_timeout(Duration::from_secs(10))
        .expect("install reaches the push step");

    assert!(installer.is_running());
    assert!(!handle.is_finished());
    assert_eq!(handle.try_result(), None);
    assert!(installer.spawn().is_none());
    assert!(installer.clone().install().is_none());

    gate_tx.send(()).unwrap();
    assert_eq!(handle.wait(), Some(InstallResult::Success));

    assert_eq!(sink.percents(), vec![0, 10, 30, 50, 80, 100]);
    assert_eq!(bridge.pushes.lock().unwrap().len(), 1);
    assert!(!installer.is_running());

    // 结束后可以再次安装
    let handle = installer.spawn().expect("second install starts");
    entered_rx.recv_timeout(Duration::from_secs(10)).unwrap();
    gate_tx.send(()).unwrap();
    assert_eq!(handle.wait(), Some(InstallResult::Success));
}

#[test]
fn all_devices_target_pushes_to_each_authorized_serial() {
    let bridge = Arc::new(FakeBridge::new(
        "emulator-5554\tdevice\nABCD1234\tunauthorized\nR58M\tdevice\n",
        "Success\n",
    ));
    let config = WizardConfigBuilder::default()
        .settle_delay(0)
        .target(InstallTarget::AllAuthorized)
        .build();
    let (installer, _sink) =
        installer_with(config, bridge.clone(), Arc::new(FakeProvisioner::default()));

    assert_eq!(installer.install(), Some(InstallResult::Success));

    let mut serials: Vec<Option<String>> = bridge
        .pushes
        .lock()
        .unwrap()
        .iter()
        .map(|(_, serial)| serial.clone())
        .collect();
    serials.sort();
    assert_eq!(
        serials,
        vec![Some("R58M".to_string()), Some("emulator-5554".to_string())]
    );
}

#[test]
fn refresh_degrades_without_raising() {
    let mut fake = FakeBridge::new("", "");
    fake.devices = None;
    let (installer, sink) = installer_with(
        fast_config(),
        Arc::new(fake),
        Arc::new(FakeProvisioner::default()),
    );

    let listing = installer.refresh();

    assert!(matches!(listing, DeviceListing::ToolMissing));
    assert_eq!(
        installer.last_status(),
        "ADB not found - will be installed during setup"
    );
    assert!(!sink
        .events()
        .iter()
        .any(|e| matches!(e, Event::Dialog(_))));
}

#[test]
fn panel_reflects_failed_install() {
    let bridge = Arc::new(FakeBridge::new("", "Success\n"));
    let panel = Arc::new(WizardPanel::new());
    let installer = Installer::new(
        fast_config(),
        bridge,
        Arc::new(FakeProvisioner::default()),
        panel.clone(),
    );

    let handle = installer.spawn().expect("install starts");
    assert_eq!(
        handle.wait(),
        Some(InstallResult::Failure(FailureReason::NoDeviceFound))
    );

    let state = panel.snapshot();
    assert_eq!(state.progress, 0);
    assert!(state.controls_enabled);
    assert_eq!(
        state.status,
        "No devices found - connect Android device and enable USB debugging"
    );
    assert_eq!(state.device_entries.len(), 6);
    assert_eq!(state.device_entries[0], "📱 No Android devices found");
    let dialog = state.last_dialog.expect("error dialog shown");
    assert_eq!(dialog.kind, DialogKind::Error);
    assert!(dialog.body.contains("No Android device found."));
}

#[test]
fn help_dialog_reaches_the_sink() {
    let panel = Arc::new(WizardPanel::new());
    let installer = Installer::new(
        fast_config(),
        Arc::new(FakeBridge::new("", "")),
        Arc::new(FakeProvisioner::default()),
        panel.clone(),
    );

    installer.show_help();

    let dialog = panel.snapshot().last_dialog.unwrap();
    assert_eq!(dialog.title, "Help & Troubleshooting");
    assert_eq!(dialog.kind, DialogKind::Info);
}
