//! Desktop notification and completion sound dispatch

use tokio::process::Command;
use tracing::{debug, info, warn};

pub const NOTIFICATION_TITLE: &str = "Pomodoro Timer";
pub const NOTIFICATION_BODY: &str = "Time's up!";

/// External programs used to alert the user
#[derive(Debug, Clone)]
pub struct AlertCommands {
    /// Called as `<notify> <title> <body>`
    pub notify: String,
    /// Split on whitespace; first word is the program
    pub sound: String,
}

impl Default for AlertCommands {
    fn default() -> Self {
        Self {
            notify: "notify-send".to_string(),
            sound: "canberra-gtk-play -i complete".to_string(),
        }
    }
}

async fn run_command(program: &str, args: &[&str]) -> Result<(), String> {
    debug!("Running {} {:?}", program, args);

    let output = Command::new(program)
        .args(args)
        .output()
        .await
        .map_err(|e| format!("Failed to execute {}: {}", program, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("{} failed: {}", program, stderr.trim()));
    }
    Ok(())
}

/// Show the "time's up" notification
pub async fn send_finished_notification(commands: &AlertCommands) -> Result<(), String> {
    run_command(&commands.notify, &[NOTIFICATION_TITLE, NOTIFICATION_BODY]).await?;
    info!("Finished notification delivered");
    Ok(())
}

/// Play the completion sound
pub async fn play_finish_sound(commands: &AlertCommands) -> Result<(), String> {
    let mut parts = commands.sound.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| "No sound command configured".to_string())?;
    let args: Vec<&str> = parts.collect();

    run_command(program, &args).await?;
    debug!("Completion sound played");
    Ok(())
}

/// Notify the user that a work session ended. Failures are logged and dropped.
pub async fn alert_session_finished(commands: &AlertCommands, play_sound: bool) {
    if let Err(e) = send_finished_notification(commands).await {
        warn!("Error displaying notification: {}", e);
    }

    if play_sound {
        if let Err(e) = play_finish_sound(commands).await {
            warn!("Error playing completion sound: {}", e);
        }
    }
}
