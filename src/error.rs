use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// 安装向导相关的错误类型
#[derive(Debug, Error)]
pub enum WizardError {
    /// ADB 可执行文件无法找到或无法执行
    #[error("ADB not available at {path:?}: {message}")]
    ToolUnavailable { path: PathBuf, message: String },

    /// ADB 准备步骤未完成
    #[error("Failed to install ADB: {0}")]
    ToolInstallFailed(String),

    /// 没有已授权的设备
    #[error("{}", no_device_message(*unauthorized))]
    NoDeviceFound { unauthorized: usize },

    /// APK 推送未报告成功
    #[error("Failed to install APK: {0}")]
    InstallFailed(String),

    /// 设备列表命令执行失败
    #[error("Failed to scan for devices: {0}")]
    ScanFailed(String),
}

fn no_device_message(unauthorized: usize) -> String {
    let base = "No Android device found. Please connect device and enable USB debugging.";
    if unauthorized == 0 {
        base.to_string()
    } else {
        format!(
            "{} ({} device(s) waiting for USB debugging authorization)",
            base, unauthorized
        )
    }
}

/// 一次安装流程的终止原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureReason {
    ToolUnavailable,
    ToolInstallFailed,
    NoDeviceFound,
    InstallFailed,
    ScanFailed,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::ToolUnavailable => "ToolUnavailable",
            FailureReason::ToolInstallFailed => "ToolInstallFailed",
            FailureReason::NoDeviceFound => "NoDeviceFound",
            FailureReason::InstallFailed => "InstallFailed",
            FailureReason::ScanFailed => "ScanFailed",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl WizardError {
    /// 错误对应的终止原因代码
    pub fn reason(&self) -> FailureReason {
        match self {
            WizardError::ToolUnavailable { .. } => FailureReason::ToolUnavailable,
            WizardError::ToolInstallFailed(_) => FailureReason::ToolInstallFailed,
            WizardError::NoDeviceFound { .. } => FailureReason::NoDeviceFound,
            WizardError::InstallFailed(_) => FailureReason::InstallFailed,
            WizardError::ScanFailed(_) => FailureReason::ScanFailed,
        }
    }
}

// 添加结果类型别名简化使用
pub type WizardResult<T> = Result<T, WizardError>;
