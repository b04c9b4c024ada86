// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Security credential lookup.
//!
//! Layout under the credential root:
//!
//! ```text
//! secure_dds/CA/mainca_cert.pem
//! secure_dds/participants/<host>/<host>_cert.pem
//! secure_dds/participants/<host>/<host>_key.pem
//! ```

use std::path::{Path, PathBuf};

use hdds::SecurityConfig;

/// Environment variable naming the credential root.
pub const DDS_ROOT_ENV: &str = "DDS_ROOT";

/// Host directory used when the hostname cannot be read.
pub const UNKNOWN_HOST: &str = "UNKNOWN_HOST";

/// Directories checked when walking up from the working directory,
/// the working directory included.
const ROOT_SEARCH_DEPTH: usize = 6;

/// Pick the credential root.
///
/// Order: `explicit` (CLI flag), then `DDS_ROOT` if that path exists, then the
/// nearest ancestor of the working directory holding both `secure_dds/` and
/// `IDL/`, then the working directory itself.
pub fn resolve_dds_root(explicit: Option<&Path>) -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_root = std::env::var_os(DDS_ROOT_ENV).map(PathBuf::from);
    resolve_dds_root_from(explicit, env_root.as_deref(), &cwd)
}

/// [`resolve_dds_root`] with the environment and working directory supplied.
pub fn resolve_dds_root_from(explicit: Option<&Path>, env_root: Option<&Path>, cwd: &Path) -> PathBuf {
    if let Some(root) = explicit {
        return root.to_path_buf();
    }
    if let Some(root) = env_root.filter(|p| p.exists()) {
        return root.to_path_buf();
    }
    discover_root(cwd).unwrap_or_else(|| cwd.to_path_buf())
}

/// Nearest ancestor of `start` (itself included, at most six levels)
/// containing both `secure_dds/` and `IDL/`.
pub fn discover_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .take(ROOT_SEARCH_DEPTH)
        .find(|dir| dir.join("secure_dds").exists() && dir.join("IDL").exists())
        .map(Path::to_path_buf)
}

/// This machine's hostname, or [`UNKNOWN_HOST`].
pub fn local_hostname() -> String {
    system_hostname().unwrap_or_else(|| UNKNOWN_HOST.to_string())
}

#[cfg(unix)]
fn system_hostname() -> Option<String> {
    let mut buf = [0u8; 256];
    // SAFETY:
    // - buf is a valid mutable buffer of 256 bytes
    // - passing len - 1 keeps the last byte zero, so the result is always
    //   NUL-terminated even if the name was truncated
    let ret = unsafe { libc::gethostname(buf.as_mut_ptr() as *mut libc::c_char, buf.len() - 1) };
    if ret != 0 {
        return None;
    }
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    let hostname = String::from_utf8_lossy(&buf[..end]).into_owned();
    if hostname.is_empty() {
        None
    } else {
        Some(hostname)
    }
}

#[cfg(not(unix))]
fn system_hostname() -> Option<String> {
    std::env::var("COMPUTERNAME").ok().filter(|h| !h.is_empty())
}

/// Credential files for one host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub identity_ca: PathBuf,
    pub identity_certificate: PathBuf,
    pub private_key: PathBuf,
}

impl Credentials {
    pub fn for_host(root: &Path, host: &str) -> Self {
        let secure = root.join("secure_dds");
        let host_dir = secure.join("participants").join(host);
        Self {
            identity_ca: secure.join("CA").join("mainca_cert.pem"),
            identity_certificate: host_dir.join(format!("{}_cert.pem", host)),
            private_key: host_dir.join(format!("{}_key.pem", host)),
        }
    }

    /// Files that do not exist, in property order.
    pub fn missing(&self) -> Vec<&Path> {
        [&self.identity_ca, &self.identity_certificate, &self.private_key]
            .into_iter()
            .filter(|p| !p.exists())
            .map(PathBuf::as_path)
            .collect()
    }

    /// Security settings for PKI-DH authentication with AES-GCM-GMAC payload
    /// encryption, authentication required.
    ///
    /// Fails with [`hdds::Error::Config`] when a credential file is missing.
    pub fn security_config(&self) -> hdds::Result<SecurityConfig> {
        SecurityConfig::builder()
            .identity_certificate(self.identity_certificate.clone())
            .private_key(self.private_key.clone())
            .ca_certificates(self.identity_ca.clone())
            .enable_encryption(true)
            .require_authentication(true)
            .build()
    }
}
