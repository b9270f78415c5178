mod error;
mod config;
mod device;
mod bridge;
mod cmd;

// 功能模块
pub mod app;
pub mod parallel;
pub mod progress;
pub mod provision;
pub mod orchestrator;
pub mod help;
pub mod wizard;

// 导出主要类型
pub use bridge::{AdbBridge, Bridge};
pub use cmd::{answers_probe, install_failure_code, install_succeeded, parse_version};
pub use config::{InstallTarget, WizardConfig, WizardConfigBuilder, DEFAULT_PACKAGE};
pub use device::{classify_line, parse_devices, Authorization, DeviceListing, DeviceRecord, DeviceScanner};
pub use error::{FailureReason, WizardError, WizardResult};
pub use orchestrator::{InstallHandle, Installer};
pub use progress::{Dialog, DialogKind, InstallProgress, InstallResult, StatusSink, Step};
pub use provision::{PlaceholderProvisioner, ToolProvisioner};
pub use wizard::{PanelState, WizardPanel};

// 便利的预导出模块
pub mod prelude {
    pub use super::{
        Bridge, DeviceRecord, DeviceScanner, InstallResult, Installer, StatusSink, WizardConfig,
        WizardConfigBuilder, WizardError, WizardPanel, WizardResult,
    };
}
