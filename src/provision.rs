use log::info;
use std::time::Duration;

use crate::error::WizardResult;
use crate::progress::StatusSink;

/// 在 ADB 缺失时负责准备 ADB
pub trait ToolProvisioner: Send + Sync {
    fn provision(&self, sink: &dyn StatusSink) -> WizardResult<()>;
}

/// 占位实现：实际安装交给系统安装程序，这里只等待固定时间并视为成功
#[derive(Debug, Clone)]
pub struct PlaceholderProvisioner {
    delay: Duration,
}

impl PlaceholderProvisioner {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl ToolProvisioner for PlaceholderProvisioner {
    fn provision(&self, sink: &dyn StatusSink) -> WizardResult<()> {
        sink.on_status("ADB installation handled by system installer...");
        info!("等待系统安装程序准备 ADB ({:?})", self.delay);
        std::thread::sleep(self.delay);
        Ok(())
    }
}
