use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// 默认安装包文件名（相对于工作目录）
pub const DEFAULT_PACKAGE: &str = "jarvis-ai.apk";

/// `adb version` 第一行应包含的产品名
pub const DEFAULT_VERSION_MARKER: &str = "Android Debug Bridge";

/// `adb install` 成功时输出的标记
pub const DEFAULT_SUCCESS_MARKER: &str = "Success";

/// 推送目标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum InstallTarget {
    /// 不指定序列号，交给 adb 选择唯一设备
    #[default]
    Default,
    /// 并行推送到所有已授权设备
    AllAuthorized,
}

/// 安装向导配置结构体
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WizardConfig {
    /// ADB 可执行文件路径
    pub adb_path: PathBuf,
    /// 要安装的 APK 路径
    pub package_path: PathBuf,
    /// 应用显示名称
    pub app_name: String,
    /// 安装完成后的等待时间（毫秒）
    pub settle_delay: u64,
    /// ADB 准备步骤的等待时间（毫秒）
    pub provision_delay: u64,
    /// 覆盖已安装的版本 (`install -r`)
    pub replace_existing: bool,
    pub target: InstallTarget,
    pub version_marker: String,
    pub success_marker: String,
    /// 额外的命令行参数
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_args: Option<Vec<String>>,
}

impl Default for WizardConfig {
    fn default() -> Self {
        WizardConfig {
            adb_path: PathBuf::from("adb"),
            package_path: PathBuf::from(DEFAULT_PACKAGE),
            app_name: "Jarvis AI".to_string(),
            settle_delay: 2000,
            provision_delay: 3000,
            replace_existing: true,
            target: InstallTarget::Default,
            version_marker: DEFAULT_VERSION_MARKER.to_string(),
            success_marker: DEFAULT_SUCCESS_MARKER.to_string(),
            additional_args: None,
        }
    }
}

impl WizardConfig {
    pub fn settle_duration(&self) -> Duration {
        Duration::from_millis(self.settle_delay)
    }

    pub fn provision_duration(&self) -> Duration {
        Duration::from_millis(self.provision_delay)
    }
}

/// 安装向导配置构建器
#[derive(Default)]
pub struct WizardConfigBuilder {
    adb_path: Option<PathBuf>,
    package_path: Option<PathBuf>,
    app_name: Option<String>,
    settle_delay: Option<u64>,
    provision_delay: Option<u64>,
    replace_existing: Option<bool>,
    target: Option<InstallTarget>,
    additional_args: Option<Vec<String>>,
}

impl WizardConfigBuilder {
    /// 设置 ADB 可执行文件路径
    pub fn adb_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.adb_path = Some(path.into());
        self
    }

    /// 设置 APK 路径
    pub fn package_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.package_path = Some(path.into());
        self
    }

    pub fn app_name(mut self, name: &str) -> Self {
        self.app_name = Some(name.to_string());
        self
    }

    /// 设置安装后等待时间
    pub fn settle_delay(mut self, delay: u64) -> Self {
        self.settle_delay = Some(delay);
        self
    }

    /// 设置 ADB 准备等待时间
    pub fn provision_delay(mut self, delay: u64) -> Self {
        self.provision_delay = Some(delay);
        self
    }

    pub fn replace_existing(mut self, replace: bool) -> Self {
        self.replace_existing = Some(replace);
        self
    }

    /// 设置推送目标
    pub fn target(mut self, target: InstallTarget) -> Self {
        self.target = Some(target);
        self
    }

    /// 添加额外命令行参数
    pub fn add_arg(mut self, arg: &str) -> Self {
        self.additional_args
            .get_or_insert_with(Vec::new)
            .push(arg.to_string());
        self
    }

    /// 构建配置
    pub fn build(self) -> WizardConfig {
        let default = WizardConfig::default();

        WizardConfig {
            adb_path: self.adb_path.unwrap_or(default.adb_path),
            package_path: self.package_path.unwrap_or(default.package_path),
            app_name: self.app_name.unwrap_or(default.app_name),
            settle_delay: self.settle_delay.unwrap_or(default.settle_delay),
            provision_delay: self.provision_delay.unwrap_or(default.provision_delay),
            replace_existing: self.replace_existing.unwrap_or(default.replace_existing),
            target: self.target.unwrap_or(default.target),
            version_marker: default.version_marker,
            success_marker: default.success_marker,
            additional_args: self.additional_args,
        }
    }
}
