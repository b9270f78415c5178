use log::{debug, warn};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;

use crate::app::install_package;
use crate::bridge::Bridge;
use crate::error::{WizardError, WizardResult};

/// 在多个设备上并行安装应用
///
/// # 参数
///
/// * `serials` - 设备序列号列表
/// * `package` - APK 文件路径
///
/// # 返回值
///
/// 返回一个按序列号排序的映射，值为各设备的安装结果
pub fn parallel_install(
    bridge: &dyn Bridge,
    serials: &[String],
    package: &Path,
    success_marker: &str,
) -> BTreeMap<String, WizardResult<()>> {
    serials
        .par_iter()
        .map(|serial| {
            debug!("开始向设备 {} 安装", serial);
            (
                serial.clone(),
                install_package(bridge, package, Some(serial.as_str()), success_marker),
            )
        })
        .collect()
}

/// 所有设备都安装成功才算成功
pub fn install_on_all(
    bridge: &dyn Bridge,
    serials: &[String],
    package: &Path,
    success_marker: &str,
) -> WizardResult<()> {
    if serials.is_empty() {
        return Err(WizardError::NoDeviceFound { unauthorized: 0 });
    }

    let failures: Vec<String> = parallel_install(bridge, serials, package, success_marker)
        .into_iter()
        .filter_map(|(serial, result)| match result {
            Ok(()) => None,
            Err(e) => {
                warn!("设备 {} 安装失败: {}", serial, e);
                Some(format!("{}: {}", serial, e))
            }
        })
        .collect();

    if failures.is_empty() {
        Ok(())
    } else {
        Err(WizardError::InstallFailed(failures.join("; ")))
    }
}
