// UI layer: a simple interactive menu using `dialoguer`, plus the
// non-interactive path used when files are passed on the command line.

use crate::client::BucketClient;
use crate::config::ClientConfig;
use crate::error::UploadError;
use crate::model::UploadResponse;
use anyhow::{Context, Result};
use crossterm::style::Stylize;
use dialoguer::{Input, Password, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

const KEY_FILE: &str = ".bucket_api_key";

/// Main interactive menu. Runs a select loop until the user chooses "Exit".
pub fn main_menu(mut client: BucketClient) -> Result<()> {
    loop {
        let items = vec!["Upload a file", "Browse for a file", "Set API key", "Exit"];
        let selection = Select::new().items(&items).default(0).interact()?;
        match selection {
            0 => {
                let path: String = Input::new().with_prompt("File path").interact_text()?;
                upload_with_spinner(&client, Path::new(path.trim()))?;
            }
            1 => {
                // Native picker, restricted to the extensions the policy allows.
                let extensions: Vec<&str> = client.config().policy.allowed_extensions().collect();
                let picked = rfd::FileDialog::new()
                    .set_title("Choose a file to upload")
                    .add_filter("Supported files", &extensions)
                    .pick_file();
                match picked {
                    Some(path) => upload_with_spinner(&client, &path)?,
                    None => println!("No file selected."),
                }
            }
            2 => {
                let key = prompt_api_key()?;
                persist_api_key(&key)?;
                let mut config = client.config().clone();
                config.api_key = key;
                client = BucketClient::new(config).context("Failed to build HTTP client")?;
                println!("{}", "API key saved.".green());
            }
            3 => break,
            _ => {}
        }
    }
    Ok(())
}

/// Upload every path in order and print one line per file. Returns the
/// number of failed uploads.
pub fn upload_paths(client: &BucketClient, paths: &[PathBuf]) -> usize {
    let mut failed = 0;
    for (path, result) in client.upload_many(paths) {
        match result {
            Ok(resp) => print_success(&path, &resp),
            Err(e) => {
                failed += 1;
                print_failure(&path, e);
            }
        }
    }
    failed
}

/// Build the client configuration: `BUCKET_API_KEY` from the environment,
/// else the key saved in the home directory, else prompt (and save).
pub fn resolve_config() -> Result<ClientConfig> {
    if let Ok(config) = ClientConfig::from_env() {
        return Ok(config);
    }
    let key = match load_api_key() {
        Ok(key) => key,
        Err(_) => {
            let key = prompt_api_key()?;
            persist_api_key(&key)?;
            key
        }
    };
    Ok(ClientConfig::new(key).with_env_overrides())
}

fn upload_with_spinner(client: &BucketClient, path: &Path) -> Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(format!("Uploading {}...", path.display()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = client.upload(path);
    spinner.finish_and_clear();
    match result {
        Ok(resp) => print_success(path, &resp),
        Err(e) => print_failure(path, e),
    }
    Ok(())
}

fn print_success(path: &Path, resp: &UploadResponse) {
    println!("{} {}", "Uploaded".green().bold(), path.display());
    println!("  URL:      {}", resp.url);
    println!("  Name:     {}", resp.metadata.original_name);
    println!("  Type:     {}", resp.metadata.file_type);
    println!("  Size:     {} bytes", resp.metadata.file_size);
    println!("  Uploaded: {}", resp.metadata.upload_time);
}

fn print_failure(path: &Path, e: UploadError) {
    // `{:#}` prints the whole source chain on one line.
    let e = anyhow::Error::new(e);
    println!("{} {}: {:#}", "Upload failed".red().bold(), path.display(), e);
}

fn prompt_api_key() -> Result<String> {
    let key: String = Password::new().with_prompt("Bucket API key").interact()?;
    Ok(key.trim().to_string())
}

fn key_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Persist the API key into a file in the user's home directory.
fn persist_api_key(key: &str) -> Result<()> {
    save_key_in(&key_dir(), key)
}

/// Load the API key from the user's home directory file.
fn load_api_key() -> Result<String> {
    load_key_from(&key_dir())
}

fn save_key_in(dir: &Path, key: &str) -> Result<()> {
    let path = dir.join(KEY_FILE);
    std::fs::write(&path, key).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn load_key_from(dir: &Path) -> Result<String> {
    let path = dir.join(KEY_FILE);
    let data = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let key = data.trim();
    anyhow::ensure!(!key.is_empty(), "{} is empty", path.display());
    Ok(key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_key_round_trips_without_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        save_key_in(dir.path(), "abc123\n").unwrap();
        assert_eq!(load_key_from(dir.path()).unwrap(), "abc123");
    }

    #[test]
    fn missing_or_blank_key_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_key_from(dir.path()).is_err());
        save_key_in(dir.path(), "  \n").unwrap();
        assert!(load_key_from(dir.path()).is_err());
    }
}
