//! Launch-at-login registration through an XDG autostart entry

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::state::preferences::APP_DIR;

/// `<config dir>/autostart/pomobar.desktop`
pub fn default_entry_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("autostart").join(format!("{}.desktop", APP_DIR)))
}

/// Desktop entry contents that start `executable` on login
pub fn desktop_entry(executable: &Path) -> String {
    format!(
        "[Desktop Entry]\n\
         Type=Application\n\
         Name=pomobar\n\
         Comment=Work/break timer\n\
         Exec={}\n\
         X-GNOME-Autostart-enabled=true\n",
        executable.display()
    )
}

/// Register or unregister launch at login by writing or removing `entry_path`
pub async fn set_launch_at_startup(entry_path: &Path, enabled: bool) -> Result<()> {
    if enabled {
        let executable = std::env::current_exe().context("Failed to resolve current executable")?;
        if let Some(parent) = entry_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        tokio::fs::write(entry_path, desktop_entry(&executable))
            .await
            .with_context(|| format!("Failed to write {}", entry_path.display()))?;
        info!("Launch at startup enabled via {}", entry_path.display());
    } else {
        match tokio::fs::remove_file(entry_path).await {
            Ok(()) => info!("Launch at startup disabled"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to remove {}", entry_path.display()))
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_points_at_executable() {
        let entry = desktop_entry(Path::new("/usr/bin/pomobar"));
        assert!(entry.starts_with("[Desktop Entry]\n"));
        assert!(entry.contains("Exec=/usr/bin/pomobar\n"));
    }

    #[tokio::test]
    async fn enable_then_disable() {
        let dir = tempfile::tempdir().unwrap();
        let entry = dir.path().join("autostart").join("pomobar.desktop");

        set_launch_at_startup(&entry, true).await.unwrap();
        assert!(entry.exists());

        set_launch_at_startup(&entry, false).await.unwrap();
        assert!(!entry.exists());

        // Disabling twice is fine
        set_launch_at_startup(&entry, false).await.unwrap();
    }
}
