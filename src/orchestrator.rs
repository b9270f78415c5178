use log::{debug, error, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::app::install_package;
use crate::bridge::{AdbBridge, Bridge};
use crate::cmd::answers_probe;
use crate::config::{InstallTarget, WizardConfig};
use crate::device::{DeviceListing, DeviceScanner};
use crate::error::{WizardError, WizardResult};
use crate::help::{failure_dialog, help_dialog, success_dialog};
use crate::parallel::install_on_all;
use crate::progress::{Dialog, InstallProgress, InstallResult, StatusSink, Step};
use crate::provision::{PlaceholderProvisioner, ToolProvisioner};

const READY_STATUS: &str = "Ready to install";

struct Inner {
    config: WizardConfig,
    bridge: Arc<dyn Bridge>,
    scanner: DeviceScanner,
    provisioner: Arc<dyn ToolProvisioner>,
    sink: Arc<dyn StatusSink>,
    in_progress: AtomicBool,
    last_status: Mutex<String>,
}

impl Inner {
    fn remember(&self, message: &str) {
        if let Ok(mut status) = self.last_status.lock() {
            *status = message.to_string();
        }
    }
}

// 转发给界面的同时记录最后一次状态
impl StatusSink for Inner {
    fn on_progress(&self, progress: &InstallProgress) {
        self.remember(&progress.message);
        self.sink.on_progress(progress);
    }

    fn on_status(&self, message: &str) {
        self.remember(message);
        self.sink.on_status(message);
    }

    fn on_devices(&self, listing: &DeviceListing) {
        self.sink.on_devices(listing);
    }

    fn on_controls(&self, enabled: bool) {
        self.sink.on_controls(enabled);
    }

    fn on_dialog(&self, dialog: &Dialog) {
        self.sink.on_dialog(dialog);
    }
}

/// 持有单次运行标志，释放时（包括 panic 展开时）清除标志
struct RunGuard {
    inner: Arc<Inner>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.inner.in_progress.store(false, Ordering::Release);
    }
}

/// 后台安装任务的句柄
///
/// 丢弃句柄不会影响正在运行的安装。
#[derive(Debug)]
pub struct InstallHandle {
    join: JoinHandle<()>,
    result: Receiver<InstallResult>,
}

impl InstallHandle {
    /// 等待安装结束；线程异常退出时返回 `None`
    pub fn wait(self) -> Option<InstallResult> {
        let result = self.result.recv().ok();
        if self.join.join().is_err() {
            error!("安装线程异常退出");
        }
        result
    }

    /// 非阻塞地读取结果
    pub fn try_result(&self) -> Option<InstallResult> {
        self.result.try_recv().ok()
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

/// 安装流程编排器
///
/// 每个应用生命周期只创建一个实例；克隆共享同一个运行标志。
/// 同一时间最多只有一次安装在运行，运行期间的新请求会被忽略。
#[derive(Clone)]
pub struct Installer {
    inner: Arc<Inner>,
}

impl Installer {
    pub fn new(
        config: WizardConfig,
        bridge: Arc<dyn Bridge>,
        provisioner: Arc<dyn ToolProvisioner>,
        sink: Arc<dyn StatusSink>,
    ) -> Self {
        let scanner = DeviceScanner::new(Arc::clone(&bridge), &config.version_marker);
        Self {
            inner: Arc::new(Inner {
                config,
                bridge,
                scanner,
                provisioner,
                sink,
                in_progress: AtomicBool::new(false),
                last_status: Mutex::new(READY_STATUS.to_string()),
            }),
        }
    }

    /// 使用 `adb` 命令行和占位 ADB 准备步骤
    pub fn with_adb(config: WizardConfig, sink: Arc<dyn StatusSink>) -> Self {
        let bridge = Arc::new(AdbBridge::new(&config));
        let provisioner = Arc::new(PlaceholderProvisioner::new(config.provision_duration()));
        Self::new(config, bridge, provisioner, sink)
    }

    pub fn config(&self) -> &WizardConfig {
        &self.inner.config
    }

    pub fn scanner(&self) -> &DeviceScanner {
        &self.inner.scanner
    }

    /// 是否有安装正在进行
    pub fn is_running(&self) -> bool {
        self.inner.in_progress.load(Ordering::Acquire)
    }

    /// 最后一次写入状态栏的文本
    pub fn last_status(&self) -> String {
        self.inner
            .last_status
            .lock()
            .map(|status| status.clone())
            .unwrap_or_default()
    }

    /// 刷新设备列表并更新状态栏
    pub fn refresh(&self) -> DeviceListing {
        self.inner.on_status("Scanning for Android devices...");
        let listing = self.inner.scanner.refresh();
        self.inner.on_devices(&listing);
        self.inner.on_status(listing.status_line());
        listing
    }

    pub fn show_help(&self) {
        self.inner.on_dialog(&help_dialog(&self.inner.config.app_name));
    }

    /// 在当前线程执行安装，已有安装在运行时返回 `None`
    pub fn install(&self) -> Option<InstallResult> {
        let guard = self.try_begin()?;
        Some(self.execute(guard))
    }

    /// 在后台线程执行安装，已有安装在运行时返回 `None`
    pub fn spawn(&self) -> Option<InstallHandle> {
        let guard = self.try_begin()?;
        let installer = self.clone();
        let (sender, receiver) = mpsc::sync_channel(1);

        let spawned = thread::Builder::new()
            .name("install-wizard".to_string())
            .spawn(move || {
                let result = installer.execute(guard);
                // 调用方可能已经丢弃了句柄
                let _ = sender.send(result);
            });

        match spawned {
            Ok(join) => Some(InstallHandle {
                join,
                result: receiver,
            }),
            Err(e) => {
                error!("无法启动安装线程: {}", e);
                None
            }
        }
    }

    fn try_begin(&self) -> Option<RunGuard> {
        match self.inner.in_progress.compare_exchange(
            false,
            true,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => Some(RunGuard {
                inner: Arc::clone(&self.inner),
            }),
            Err(_) => {
                info!("安装正在进行中，忽略新的安装请求");
                None
            }
        }
    }

    fn execute(&self, guard: RunGuard) -> InstallResult {
        let inner = &self.inner;
        inner.on_controls(false);

        let result = match self.run_steps() {
            Ok(()) => {
                info!("安装完成");
                inner.on_dialog(&success_dialog(&inner.config.app_name));
                InstallResult::Success
            }
            Err(e) => {
                error!("安装失败: {}", e);
                inner.on_progress(&InstallProgress::new(
                    0,
                    format!("❌ Installation failed: {}", e),
                ));
                inner.on_dialog(&failure_dialog(&e));
                InstallResult::Failure(e.reason())
            }
        };

        drop(guard);
        inner.on_controls(true);
        // 无论成功与否都刷新设备列表
        self.refresh();
        result
    }

    fn report(&self, step: Step) {
        debug!("安装步骤: {:?}", step);
        self.inner
            .on_progress(&step.progress(&self.inner.config.app_name));
    }

    fn run_steps(&self) -> WizardResult<()> {
        let inner = &self.inner;
        let config = &inner.config;

        self.report(Step::Start);

        self.report(Step::CheckTool);
        if !self.tool_present() {
            self.report(Step::InstallTool);
            inner
                .provisioner
                .provision(inner.as_ref())
                .map_err(|e| match e {
                    e @ WizardError::ToolInstallFailed(_) => e,
                    other => WizardError::ToolInstallFailed(other.to_string()),
                })?;
        }

        self.report(Step::CheckDevice);
        let serials = self.authorized_devices()?;

        self.report(Step::PushPackage);
        match config.target {
            InstallTarget::Default => install_package(
                inner.bridge.as_ref(),
                &config.package_path,
                None,
                &config.success_marker,
            )?,
            InstallTarget::AllAuthorized => install_on_all(
                inner.bridge.as_ref(),
                &serials,
                &config.package_path,
                &config.success_marker,
            )?,
        }

        self.report(Step::Verify);
        thread::sleep(config.settle_duration());

        self.report(Step::Complete);
        Ok(())
    }

    fn tool_present(&self) -> bool {
        match self.inner.bridge.probe_version() {
            Ok(output) => {
                let present = answers_probe(&output, &self.inner.config.version_marker);
                if !present {
                    warn!("ADB 版本输出中没有找到 {:?}", self.inner.config.version_marker);
                }
                present
            }
            Err(e) => {
                warn!("ADB 不可用: {}", e);
                false
            }
        }
    }

    fn authorized_devices(&self) -> WizardResult<Vec<String>> {
        let devices = match self.inner.scanner.scan() {
            Ok(devices) => devices,
            Err(e) => {
                warn!("检查设备连接失败: {}", e);
                return Err(WizardError::NoDeviceFound { unauthorized: 0 });
            }
        };

        let (authorized, unauthorized) = DeviceScanner::count(&devices);
        if authorized == 0 {
            return Err(WizardError::NoDeviceFound { unauthorized });
        }

        Ok(devices
            .into_iter()
            .filter(|d| d.is_authorized())
            .map(|d| d.identifier)
            .collect())
    }
}
