//! 帮助与结果对话框的静态文本

use crate::error::WizardError;
use crate::progress::{Dialog, DialogKind};

const HELP_BODY: &str = "📱 DEVICE CONNECTION ISSUES:
• Enable 'Developer Options' in Android Settings
• Enable 'USB Debugging' in Developer Options
• Allow USB debugging when prompted on device
• Try different USB cables or ports
• Restart both computer and Android device

🔧 INSTALLATION ISSUES:
• Enable 'Install from unknown sources' on device
• Ensure device has sufficient storage space
• Close other Android management software
• Run installer as Administrator

📋 SYSTEM REQUIREMENTS:
• Android device with Android 6.0+
• USB cable for device connection
• Android SDK Platform Tools (adb) on PATH

✨ FEATURES AFTER INSTALLATION:
• AI Assistant with voice commands
• Battery monitoring and optimization
• OBD-II vehicle diagnostics (with USB OTG)
• Virtual garage management
• Biometric security features

🌐 For more help, visit:
https://github.com/anthonyb4251/Full-send";

/// 帮助与故障排除对话框
pub fn help_dialog(app_name: &str) -> Dialog {
    Dialog {
        title: "Help & Troubleshooting".to_string(),
        body: format!(
            "🤖 {} Universal Android Installer - Help\n\n{}",
            app_name, HELP_BODY
        ),
        kind: DialogKind::Info,
    }
}

pub fn success_dialog(app_name: &str) -> Dialog {
    Dialog {
        title: "Installation Complete".to_string(),
        body: format!(
            "🎉 {app} has been installed successfully!\n\n\
             You can now:\n\
             • Find '{app}' in your device's app drawer\n\
             • Launch the app to finish the initial setup",
            app = app_name
        ),
        kind: DialogKind::Info,
    }
}

/// 安装失败对话框，附带补救步骤
pub fn failure_dialog(error: &WizardError) -> Dialog {
    Dialog {
        title: "Installation Error".to_string(),
        body: format!(
            "Installation failed:\n\n{}\n\nPlease:\n\
             1. Ensure your Android device is connected\n\
             2. Enable USB debugging in Developer Options\n\
             3. Allow USB debugging when prompted on device\n\
             4. Try the installation again\n\n\
             Click 'Help & Troubleshooting' for more assistance.",
            error
        ),
        kind: DialogKind::Error,
    }
}
