use log::{debug, info, warn};
use std::path::Path;

use crate::bridge::Bridge;
use crate::cmd::{install_failure_code, install_succeeded};
use crate::error::{WizardError, WizardResult};

/// 检查路径是否像一个有效的 APK 文件
pub fn is_valid_apk(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }

    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("apk"))
        .unwrap_or(false)
}

/// 安装 APK 并检查输出中的成功标记
pub fn install_package(
    bridge: &dyn Bridge,
    package: &Path,
    serial: Option<&str>,
    success_marker: &str,
) -> WizardResult<()> {
    if !is_valid_apk(package) {
        // 不提前失败，交给 adb install 自己报告
        warn!("安装包 {:?} 不存在或不是 APK 文件", package);
    }

    let output = bridge.push_package(package, serial).map_err(|e| match e {
        e @ WizardError::ToolUnavailable { .. } => WizardError::InstallFailed(e.to_string()),
        other => other,
    })?;
    debug!("ADB install 输出: {}", output.trim());

    if install_succeeded(&output, success_marker) {
        info!("成功安装 APK: {:?} -> {}", package, serial.unwrap_or("<default>"));
        return Ok(());
    }

    let detail = match install_failure_code(&output) {
        Some(code) => format!("Failure [{}]", code),
        None if output.trim().is_empty() => "no output from adb install".to_string(),
        None => output.trim().lines().last().unwrap_or_default().to_string(),
    };

    Err(WizardError::InstallFailed(detail))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct CannedInstall {
        output: String,
        calls: Mutex<Vec<Option<String>>>,
    }

    impl CannedInstall {
        fn new(output: &str) -> Self {
            Self {
                output: output.to_string(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl Bridge for CannedInstall {
        fn probe_version(&self) -> WizardResult<String> {
            Ok(String::new())
        }

        fn list_devices(&self) -> WizardResult<String> {
            Ok(String::new())
        }

        fn push_package(&self, _package: &Path, serial: Option<&str>) -> WizardResult<String> {
            self.calls.lock().unwrap().push(serial.map(str::to_string));
            Ok(self.output.clone())
        }
    }

    #[test]
    fn success_marker_means_installed() {
        let bridge = CannedInstall::new("Performing Streamed Install\nSuccess\n");
        install_package(&bridge, Path::new("app.apk"), Some("emulator-5554"), "Success").unwrap();
        assert_eq!(
            *bridge.calls.lock().unwrap(),
            vec![Some("emulator-5554".to_string())]
        );
    }

    #[test]
    fn failure_code_is_reported() {
        let bridge = CannedInstall::new("Failure [INSTALL_FAILED_INSUFFICIENT_STORAGE]\n");
        let err = install_package(&bridge, Path::new("app.apk"), None, "Success").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to install APK: Failure [INSTALL_FAILED_INSUFFICIENT_STORAGE]"
        );
    }

    #[test]
    fn empty_output_is_a_failure() {
        let bridge = CannedInstall::new("");
        let err = install_package(&bridge, Path::new("app.apk"), None, "Success").unwrap_err();
        assert!(matches!(err, WizardError::InstallFailed(_)));
    }

    #[test]
    fn apk_check_requires_existing_file() {
        assert!(!is_valid_apk(Path::new("definitely-missing.apk")));
    }
}
