use crate::bridge::{AdbBridge, Bridge};
use crate::error::{WizardError, WizardResult};
use log::{debug, trace, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Output};

static VERSION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Android Debug Bridge version (\d+)\.(\d+)\.(\d+)")
        .unwrap_or_else(|_| Regex::new(r"^$").unwrap())
});

static FAILURE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Failure \[([A-Z0-9_]+)[^\]]*\]").unwrap_or_else(|_| Regex::new(r"^$").unwrap())
});

/// 版本探测输出的第一行是否包含产品名
pub fn answers_probe(output: &str, marker: &str) -> bool {
    output
        .lines()
        .next()
        .map(|line| line.contains(marker))
        .unwrap_or(false)
}

/// 从 `adb version` 输出中提取版本号
pub fn parse_version(output: &str) -> Option<String> {
    VERSION_RE
        .captures(output)
        .map(|caps| format!("{}.{}.{}", &caps[1], &caps[2], &caps[3]))
}

/// 安装输出中是否包含成功标记
pub fn install_succeeded(output: &str, marker: &str) -> bool {
    output.lines().any(|line| line.contains(marker))
}

/// 提取 `Failure [INSTALL_FAILED_...]` 中的错误代码
pub fn install_failure_code(output: &str) -> Option<String> {
    FAILURE_RE
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

impl AdbBridge {
    /// 执行任意 ADB 命令，附带全局附加参数
    fn run(&self, args: &[&str]) -> WizardResult<Output> {
        let mut cmd = Command::new(&self.path);
        cmd.args(&self.additional_args);
        cmd.args(args);

        trace!("执行 ADB 命令: {:?} {:?}", self.path, args);

        cmd.output().map_err(|e| {
            let message = if e.kind() == ErrorKind::NotFound {
                "binary not found in PATH".to_string()
            } else {
                e.to_string()
            };
            WizardError::ToolUnavailable {
                path: self.path.clone(),
                message,
            }
        })
    }
}

impl Bridge for AdbBridge {
    fn probe_version(&self) -> WizardResult<String> {
        let output = self.run(&["version"])?;
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();

        if !output.status.success() {
            warn!(
                "ADB version 返回非零状态 {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr)
            );
        }

        match parse_version(&stdout) {
            Some(version) => debug!("ADB 版本检查成功: {}", version),
            None => debug!("无法解析 ADB 版本: {:?}", stdout.lines().next()),
        }
        Ok(stdout)
    }

    fn list_devices(&self) -> WizardResult<String> {
        let output = self.run(&["devices"])?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(WizardError::ScanFailed(format!(
                "adb devices exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn push_package(&self, package: &Path, serial: Option<&str>) -> WizardResult<String> {
        let package_arg = package.to_string_lossy();
        let mut args: Vec<&str> = Vec::new();
        if let Some(serial) = serial {
            args.extend(["-s", serial]);
        }
        args.push("install");
        if self.replace_existing {
            args.push("-r"); // Replace existing app
        }
        args.push(&package_arg);

        let output = self.run(&args)?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            debug!("ADB install 返回非零状态: {}", output.status);
        }

        // 失败信息通常写在 stderr 中
        Ok(format!("{}{}", stdout, stderr))
    }
}
