//! Signer backed by an external program
//!
//! The program is invoked once per request with a subcommand
//! (`public-key`, `sign` or `verify-address`), reads one JSON object on
//! stdin and prints its answer on stdout. Keys never appear on the command
//! line.

use async_trait::async_trait;
use registrar_core::{Error, PrivateKey, Result, Signer};
use serde_json::json;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Delegates signing to `program`
pub struct ExternalSigner {
    program: PathBuf,
}

impl ExternalSigner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn invoke(&self, subcommand: &str, request: serde_json::Value) -> Result<String> {
        debug!("Invoking signer {} {}", self.program.display(), subcommand);
        let mut child = Command::new(&self.program)
            .arg(subcommand)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                Error::Signing(format!("Cannot start {}: {}", self.program.display(), e))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            let body = serde_json::to_vec(&request)?;
            stdin
                .write_all(&body)
                .await
                .map_err(|e| Error::Signing(format!("Cannot write to signer: {}", e)))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| Error::Signing(format!("Signer did not finish: {}", e)))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Signing(format!(
                "Signer {} failed ({}): {}",
                subcommand,
                output.status,
                stderr.trim()
            )));
        }

        let answer = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if answer.is_empty() {
            return Err(Error::Signing(format!("Signer {} returned nothing", subcommand)));
        }
        Ok(answer)
    }
}

#[async_trait]
impl Signer for ExternalSigner {
    async fn public_key(&self, key: &PrivateKey) -> Result<String> {
        self.invoke("public-key", json!({ "privateKey": key.expose() }))
            .await
    }

    async fn sign(&self, message: &str, key: &PrivateKey) -> Result<String> {
        self.invoke(
            "sign",
            json!({ "privateKey": key.expose(), "message": message }),
        )
        .await
    }

    async fn is_valid_address(&self, address: &str) -> Result<bool> {
        let answer = self
            .invoke("verify-address", json!({ "address": address }))
            .await?;
        match answer.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(Error::Signing(format!(
                "Unexpected verify-address answer: {}",
                other
            ))),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::io::Write;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn script(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("signer.sh");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "#!/bin/sh").unwrap();
        write!(file, "{}", body).unwrap();
        drop(file);
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    async fn test_round_trip_through_program() {
        let dir = TempDir::new().unwrap();
        let path = script(
            &dir,
            r#"input=$(cat)
case "$1" in
  public-key) echo "pub-key-1" ;;
  sign) echo "sig-$(printf '%s' "$input" | wc -c | tr -d ' ')" ;;
  verify-address) case "$input" in *'"Pa'*) echo true ;; *) echo false ;; esac ;;
  *) exit 2 ;;
esac
"#,
        );
        let signer = ExternalSigner::new(path);
        let key = PrivateKey::new("secret");

        assert_eq!(signer.public_key(&key).await.unwrap(), "pub-key-1");
        assert!(signer.sign("01abc", &key).await.unwrap().starts_with("sig-"));
        assert!(signer.is_valid_address("PaWallet").await.unwrap());
        assert!(!signer.is_valid_address("xyz").await.unwrap());
    }

    #[tokio::test]
    async fn test_failing_program_is_signing_error() {
        let dir = TempDir::new().unwrap();
        let path = script(&dir, "cat >/dev/null\necho 'locked' >&2\nexit 1\n");
        let signer = ExternalSigner::new(path);

        let err = signer
            .public_key(&PrivateKey::new("secret"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Signing(msg) if msg.contains("locked")));

        let missing = ExternalSigner::new("/nonexistent/signer");
        assert!(missing.sign("m", &PrivateKey::new("k")).await.is_err());
    }
}
