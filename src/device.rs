use log::{debug, info, trace, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::bridge::Bridge;
use crate::cmd::answers_probe;
use crate::error::{WizardError, WizardResult};

/// 设备授权状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Authorization {
    Authorized,
    Unauthorized,
}

impl fmt::Display for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Authorization::Authorized => write!(f, "authorized"),
            Authorization::Unauthorized => write!(f, "unauthorized"),
        }
    }
}

/// 一次扫描得到的设备记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub identifier: String,
    pub authorization: Authorization,
}

impl DeviceRecord {
    pub fn new(identifier: &str, authorization: Authorization) -> Self {
        Self {
            identifier: identifier.to_string(),
            authorization,
        }
    }

    /// 检查设备是否已授权
    pub fn is_authorized(&self) -> bool {
        self.authorization == Authorization::Authorized
    }

    /// 设备列表中显示的文本
    pub fn display_entry(&self) -> String {
        match self.authorization {
            Authorization::Authorized => {
                format!("✅ {} (Ready for installation)", self.identifier)
            }
            Authorization::Unauthorized => {
                format!("⚠️ {} (USB debugging not authorized)", self.identifier)
            }
        }
    }
}

/// 解析 `adb devices` 的单行输出（不含标题行）
pub fn classify_line(line: &str) -> Option<DeviceRecord> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (identifier, state) = match line.split_once('\t') {
        Some(parts) => parts,
        None => line.trim().split_once(char::is_whitespace)?,
    };

    let identifier = identifier.trim();
    if identifier.is_empty() {
        return None;
    }

    // unauthorized 优先于 device 判断
    let authorization = if state.contains("unauthorized") {
        Authorization::Unauthorized
    } else if state.contains("device") && !state.contains("offline") {
        Authorization::Authorized
    } else {
        trace!("忽略设备行: {:?}", line);
        return None;
    };

    Some(DeviceRecord::new(identifier, authorization))
}

/// 惰性解析设备列表输出，跳过第一行(标题)
pub fn parse_devices(output: &str) -> impl Iterator<Item = DeviceRecord> + '_ {
    output.lines().skip(1).filter_map(classify_line)
}

/// 刷新设备列表的结果，对应列表视图中显示的内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceListing {
    /// ADB 不存在，稍后由安装流程准备
    ToolMissing,
    /// 设备列表命令执行失败
    ScanFailed(String),
    Devices(Vec<DeviceRecord>),
}

impl DeviceListing {
    pub fn records(&self) -> &[DeviceRecord] {
        match self {
            DeviceListing::Devices(records) => records,
            _ => &[],
        }
    }

    pub fn has_authorized(&self) -> bool {
        self.records().iter().any(DeviceRecord::is_authorized)
    }

    /// 列表视图中的条目
    pub fn entries(&self) -> Vec<String> {
        match self {
            DeviceListing::ToolMissing => {
                vec!["❌ ADB not found - will be installed automatically".to_string()]
            }
            DeviceListing::ScanFailed(_) => {
                vec!["❌ Failed to execute ADB command".to_string()]
            }
            DeviceListing::Devices(records) => {
                let mut entries: Vec<String> =
                    records.iter().map(DeviceRecord::display_entry).collect();
                if !self.has_authorized() {
                    entries.push("📱 No Android devices found".to_string());
                    entries.push(String::new());
                    entries.push("Please:".to_string());
                    entries.push("1. Connect your Android device via USB".to_string());
                    entries.push("2. Enable USB debugging in Developer Options".to_string());
                    entries.push("3. Click 'Refresh Devices'".to_string());
                }
                entries
            }
        }
    }

    /// 状态栏文本
    pub fn status_line(&self) -> &'static str {
        match self {
            DeviceListing::ToolMissing => "ADB not found - will be installed during setup",
            DeviceListing::ScanFailed(_) => "Failed to scan for devices",
            DeviceListing::Devices(_) if self.has_authorized() => {
                "Android device(s) detected and ready for installation"
            }
            DeviceListing::Devices(_) => {
                "No devices found - connect Android device and enable USB debugging"
            }
        }
    }
}

/// 设备扫描器
#[derive(Clone)]
pub struct DeviceScanner {
    bridge: Arc<dyn Bridge>,
    version_marker: String,
}

impl DeviceScanner {
    pub fn new(bridge: Arc<dyn Bridge>, version_marker: &str) -> Self {
        Self {
            bridge,
            version_marker: version_marker.to_string(),
        }
    }

    /// 列出当前设备，每次调用都会重新执行 `adb devices`
    pub fn scan(&self) -> WizardResult<Vec<DeviceRecord>> {
        let output = self.bridge.list_devices()?;
        trace!("ADB devices 输出: {}", output);

        let devices: Vec<DeviceRecord> = parse_devices(&output).collect();
        info!("发现 {} 个 ADB 设备", devices.len());
        Ok(devices)
    }

    /// 刷新设备列表，失败时降级为提示条目而不是返回错误
    pub fn refresh(&self) -> DeviceListing {
        let tool_present = match self.bridge.probe_version() {
            Ok(output) => answers_probe(&output, &self.version_marker),
            Err(e) => {
                debug!("ADB 版本检查失败: {}", e);
                false
            }
        };

        if !tool_present {
            warn!("未找到 ADB，设备列表为空");
            return DeviceListing::ToolMissing;
        }

        match self.scan() {
            Ok(devices) => DeviceListing::Devices(devices),
            Err(e) => {
                warn!("扫描设备失败: {}", e);
                e.into()
            }
        }
    }

    /// 统计已授权与未授权设备数量
    pub fn count(devices: &[DeviceRecord]) -> (usize, usize) {
        let authorized = devices.iter().filter(|d| d.is_authorized()).count();
        (authorized, devices.len() - authorized)
    }
}

impl fmt::Debug for DeviceScanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceScanner")
            .field("version_marker", &self.version_marker)
            .finish_non_exhaustive()
    }
}

impl From<WizardError> for DeviceListing {
    fn from(error: WizardError) -> Self {
        match error {
            WizardError::ToolUnavailable { .. } => DeviceListing::ToolMissing,
            other => DeviceListing::ScanFailed(other.to_string()),
        }
    }
}
