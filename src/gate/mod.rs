//! Content gate: pre-execution script screening
//!
//! Inspects a candidate script file before the supervisor is allowed to run
//! it. Checks are ordered cheapest-first: extension (no file access), then
//! metadata, then a line-by-line keyword scan of the contents. The gate is a
//! pure function of the file at call time; it is not race-free against
//! concurrent modification.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub mod denylist;


/// Expected script extension, compared case-insensitively
pub const SCRIPT_EXTENSION: &str = "ps1";

/// Maximum accepted script size in bytes (5 MiB)
pub const DEFAULT_MAX_SCRIPT_BYTES: u64 = 5 * 1024 * 1024;

/// Gate configuration
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Expected extension, without the leading dot
    pub extension: String,
    /// Size threshold in bytes
    pub max_bytes: u64,
    /// Denylisted substrings, scanned case-insensitively in order
    pub keywords: Vec<String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            extension: SCRIPT_EXTENSION.to_string(),
            max_bytes: DEFAULT_MAX_SCRIPT_BYTES,
            keywords: denylist::SUSPICIOUS_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
        }
    }
}

/// A candidate script path with its derived attributes
#[derive(Debug, Clone)]
pub struct ScriptCandidate {
    pub path: PathBuf,
    pub exists: bool,
    /// Extension lowered for comparison, `None` if the path has none
    pub extension: Option<String>,
    /// Byte length, `None` when metadata is unavailable
    pub size: Option<u64>,
}

impl ScriptCandidate {
    /// Derive candidate attributes from a path
    pub fn inspect(path: &Path) -> Self {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase());
        let metadata = fs::metadata(path);
        Self {
            path: path.to_path_buf(),
            exists: metadata.is_ok(),
            extension,
            size: metadata.ok().map(|m| m.len()),
        }
    }
}

/// Outcome of gate evaluation. Rejections are data, not errors: every
/// variant maps to a user-facing message via [`SafetyVerdict::reason`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SafetyVerdict {
    Approved,
    RejectedMissing,
    RejectedExtension { found: Option<String> },
    RejectedTooLarge { size: u64, limit: u64 },
    RejectedKeyword { keyword: String },
    RejectedReadError { message: String },
}

impl SafetyVerdict {
    pub fn is_approved(&self) -> bool {
        matches!(self, SafetyVerdict::Approved)
    }

    /// Human-readable message surfaced to the user on rejection
    pub fn reason(&self) -> String {
        match self {
            SafetyVerdict::Approved => "script approved".to_string(),
            SafetyVerdict::RejectedMissing => "selected script file does not exist".to_string(),
            SafetyVerdict::RejectedExtension { found } => match found {
                Some(ext) => format!(
                    "expected a .{} script, found .{}",
                    SCRIPT_EXTENSION, ext
                ),
                None => format!("expected a .{} script", SCRIPT_EXTENSION),
            },
            SafetyVerdict::RejectedTooLarge { size, limit } => format!(
                "script is {} bytes, above the {} byte limit; verify it before running",
                size, limit
            ),
            SafetyVerdict::RejectedKeyword { keyword } => {
                format!("script contains suspicious content: '{}'", keyword)
            }
            SafetyVerdict::RejectedReadError { message } => {
                format!("script safety check failed: {}", message)
            }
        }
    }
}

/// The content gate itself
pub struct ScriptGate {
    config: GateConfig,
    /// Keywords paired with their lowercase form, precomputed once
    lowered: Vec<(String, String)>,
}

impl ScriptGate {
    pub fn new(config: GateConfig) -> Self {
        let lowered = config
            .keywords
            .iter()
            .map(|k| (k.clone(), k.to_lowercase()))
            .collect();
        Self { config, lowered }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Evaluate a candidate path and return the verdict
    pub fn evaluate(&self, path: &Path) -> SafetyVerdict {
        let candidate = ScriptCandidate::inspect(path);

        // Extension check first: rejects without touching file contents.
        let expected = self.config.extension.to_lowercase();
        if candidate.extension.as_deref() != Some(expected.as_str()) {
            return SafetyVerdict::RejectedExtension {
                found: candidate.extension,
            };
        }

        let size = match fs::metadata(path) {
            Ok(metadata) => metadata.len(),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return SafetyVerdict::RejectedMissing;
            }
            Err(err) => {
                return SafetyVerdict::RejectedReadError {
                    message: err.to_string(),
                };
            }
        };

        if size > self.config.max_bytes {
            return SafetyVerdict::RejectedTooLarge {
                size,
                limit: self.config.max_bytes,
            };
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) => {
                return SafetyVerdict::RejectedReadError {
                    message: err.to_string(),
                };
            }
        };

        // Line-major scan: first line with a match wins, and within a line
        // the first keyword in list order is the one reported.
        for line in contents.lines() {
            let line_lower = line.to_lowercase();
            for (keyword, keyword_lower) in &self.lowered {
                if line_lower.contains(keyword_lower.as_str()) {
                    return SafetyVerdict::RejectedKeyword {
                        keyword: keyword.clone(),
                    };
                }
            }
        }

        SafetyVerdict::Approved
    }
}

impl Default for ScriptGate {
    fn default() -> Self {
        Self::new(GateConfig::default())
    }
}
