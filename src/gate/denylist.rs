//! Fixed denylist of suspicious script substrings
//!
//! The table is a heuristic, not a security boundary: it matches raw
//! substrings with no tokenization and is trivially bypassed by synonyms or
//! encoding. That limitation is intentional and must not be tightened here.

/// Substrings that cause a script to be rejected, scanned case-insensitively.
/// Ordering matters: the first match in this order is the one reported.
pub const SUSPICIOUS_KEYWORDS: &[&str] = &[
    "Remove-Item",
    "Stop-Process",
    "Invoke-Expression",
    "Start-Process",
    "New-Object System.Net.WebClient",
    "DownloadFile",
    "Set-MpPreference",
    "Get-CimInstance",
    "Invoke-WebRequest",
    "Add-MpPreference",
    "Set-ExecutionPolicy",
    "Get-WmiObject",
    "Remove-WmiObject",
    "Format-Hex",
    "Invoke-Command",
    "HideWindow",
    "ScheduleTask",
    ":\\windows\\",
    "base64",
    "certutil",
    "PowerShell -EncodedCommand",
];
