use serde::{Deserialize, Serialize};
use std::fmt;

use crate::device::DeviceListing;
use crate::error::FailureReason;

/// 进度更新，交给 [`StatusSink`] 后立即丢弃
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallProgress {
    pub percent: u8,
    pub message: String,
}

impl InstallProgress {
    pub fn new(percent: u8, message: impl Into<String>) -> Self {
        Self {
            percent: percent.min(100),
            message: message.into(),
        }
    }
}

/// 一次安装流程的最终结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstallResult {
    Success,
    Failure(FailureReason),
}

impl InstallResult {
    pub fn is_success(&self) -> bool {
        matches!(self, InstallResult::Success)
    }
}

impl fmt::Display for InstallResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallResult::Success => write!(f, "Success"),
            InstallResult::Failure(reason) => write!(f, "Failure({})", reason),
        }
    }
}

/// 安装步骤及其固定的进度里程碑
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Start,
    CheckTool,
    InstallTool,
    CheckDevice,
    PushPackage,
    Verify,
    Complete,
}

impl Step {
    pub fn percent(&self) -> u8 {
        match self {
            Step::Start => 0,
            Step::CheckTool | Step::InstallTool => 10,
            Step::CheckDevice => 30,
            Step::PushPackage => 50,
            Step::Verify => 80,
            Step::Complete => 100,
        }
    }

    /// 步骤开始时的状态文本
    pub fn message(&self, app_name: &str) -> String {
        match self {
            Step::Start => "Starting automatic installation...".to_string(),
            Step::CheckTool => "Checking ADB installation...".to_string(),
            Step::InstallTool => "Installing ADB (Android SDK Platform Tools)...".to_string(),
            Step::CheckDevice => "Checking device connection...".to_string(),
            Step::PushPackage => format!("Installing {} APK...", app_name),
            Step::Verify => "Verifying installation...".to_string(),
            Step::Complete => "✅ Installation completed successfully!".to_string(),
        }
    }

    pub fn progress(&self, app_name: &str) -> InstallProgress {
        InstallProgress::new(self.percent(), self.message(app_name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Info,
    Error,
}

/// 模态对话框内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub title: String,
    pub body: String,
    pub kind: DialogKind,
}

/// 安装流程与界面之间的接口
///
/// 后台线程会调用这些方法，实现者需要自行处理线程间同步。
pub trait StatusSink: Send + Sync {
    /// 进度条与状态栏同时更新
    fn on_progress(&self, progress: &InstallProgress);

    /// 只更新状态栏
    fn on_status(&self, message: &str);

    /// 设备列表被重新填充
    fn on_devices(&self, _listing: &DeviceListing) {}

    /// 安装和刷新按钮的启用状态
    fn on_controls(&self, _enabled: bool) {}

    fn on_dialog(&self, _dialog: &Dialog) {}
}
