use std::path::{Path, PathBuf};

use crate::config::WizardConfig;
use crate::error::WizardResult;

/// 与外部调试桥工具之间的边界
///
/// 所有方法都返回工具的原始文本输出，解析在调用方完成，
/// 这样可以直接用录制的输出样本测试解析逻辑。
pub trait Bridge: Send + Sync {
    /// 执行版本探测 (`adb version`)
    fn probe_version(&self) -> WizardResult<String>;

    /// 执行设备列表命令 (`adb devices`)
    fn list_devices(&self) -> WizardResult<String>;

    /// 安装 APK，`serial` 为空时不指定设备
    fn push_package(&self, package: &Path, serial: Option<&str>) -> WizardResult<String>;
}

/// 通过 `adb` 命令行实现的桥接
#[derive(Clone, Debug)]
pub struct AdbBridge {
    pub(crate) path: PathBuf,
    pub(crate) additional_args: Vec<String>,
    pub(crate) replace_existing: bool,
}

impl AdbBridge {
    /// 创建新的 ADB 桥接实例
    pub fn new(config: &WizardConfig) -> Self {
        Self {
            path: config.adb_path.clone(),
            additional_args: config.additional_args.clone().unwrap_or_default(),
            replace_existing: config.replace_existing,
        }
    }

    /// 获取 ADB 路径
    pub fn adb_path(&self) -> &Path {
        &self.path
    }
}
