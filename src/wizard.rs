use chrono::Local;
use std::sync::Mutex;

use crate::device::DeviceListing;
use crate::progress::{Dialog, DialogKind, InstallProgress, StatusSink};

/// 向导窗口的可见状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelState {
    /// 设备列表（只读，每次扫描后重新填充）
    pub device_entries: Vec<String>,
    pub status: String,
    pub progress: u8,
    /// 安装和刷新按钮是否可用
    pub controls_enabled: bool,
    pub last_dialog: Option<Dialog>,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            device_entries: Vec::new(),
            status: "Ready to install".to_string(),
            progress: 0,
            controls_enabled: true,
            last_dialog: None,
        }
    }
}

/// 向导窗口模型
///
/// `console()` 模式下每次更新都会输出一行带时间戳的文本。
#[derive(Debug, Default)]
pub struct WizardPanel {
    state: Mutex<PanelState>,
    echo: bool,
}

impl WizardPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn console() -> Self {
        Self {
            state: Mutex::new(PanelState::default()),
            echo: true,
        }
    }

    pub fn snapshot(&self) -> PanelState {
        self.state
            .lock()
            .map(|state| state.clone())
            .unwrap_or_default()
    }

    fn update<F: FnOnce(&mut PanelState)>(&self, f: F) {
        if let Ok(mut state) = self.state.lock() {
            f(&mut state);
        }
    }

    fn print(&self, line: &str) {
        if self.echo {
            println!("[{}] {}", Local::now().format("%H:%M:%S"), line);
        }
    }
}

/// 文本进度条，例如 `[#####-----]  50%`
pub fn progress_bar(percent: u8) -> String {
    let percent = percent.min(100) as usize;
    let filled = percent / 10;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(10 - filled),
        percent
    )
}

impl StatusSink for WizardPanel {
    fn on_progress(&self, progress: &InstallProgress) {
        self.update(|state| {
            state.progress = progress.percent;
            state.status = progress.message.clone();
        });
        self.print(&format!("{} {}", progress_bar(progress.percent), progress.message));
    }

    fn on_status(&self, message: &str) {
        self.update(|state| state.status = message.to_string());
        self.print(message);
    }

    fn on_devices(&self, listing: &DeviceListing) {
        let entries = listing.entries();
        if self.echo {
            println!("Connected Android Devices:");
            for entry in &entries {
                println!("  {}", entry);
            }
        }
        self.update(|state| state.device_entries = entries);
    }

    fn on_controls(&self, enabled: bool) {
        self.update(|state| state.controls_enabled = enabled);
    }

    fn on_dialog(&self, dialog: &Dialog) {
        if self.echo {
            let marker = match dialog.kind {
                DialogKind::Info => "ℹ",
                DialogKind::Error => "✖",
            };
            println!("\n{} {}\n{}\n", marker, dialog.title, dialog.body);
        }
        self.update(|state| state.last_dialog = Some(dialog.clone()));
    }
}
