use crate::storage::models::HostVersion;

/// Outcome of comparing the running host against the host version a base
/// scene was created with. Informational only; nothing is blocked on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionAdvisory {
    Equal,
    /// The running host is older than the one that created the scene.
    RuntimeOlder,
    /// The running host is newer than the one that created the scene.
    RuntimeNewer,
    /// The record predates host version tracking.
    Unknown,
}

/// Lexicographic comparison over `(major, api, sdk)`.
pub fn compare(runtime: HostVersion, recorded: Option<HostVersion>) -> VersionAdvisory {
    let Some(recorded) = recorded else {
        return VersionAdvisory::Unknown;
    };
    match runtime.cmp(&recorded) {
        std::cmp::Ordering::Equal => VersionAdvisory::Equal,
        std::cmp::Ordering::Less => VersionAdvisory::RuntimeOlder,
        std::cmp::Ordering::Greater => VersionAdvisory::RuntimeNewer,
    }
}

impl VersionAdvisory {
    /// Whether a caller should ask for confirmation before going on.
    pub fn is_mismatch(&self) -> bool {
        matches!(self, VersionAdvisory::RuntimeOlder | VersionAdvisory::RuntimeNewer)
    }

    pub fn message(&self, runtime: HostVersion, recorded: Option<HostVersion>) -> String {
        let recorded = recorded
            .map(|v| v.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        match self {
            VersionAdvisory::Equal => String::new(),
            VersionAdvisory::RuntimeOlder => format!(
                "Base scene was created with a HIGHER host version ({}) than the running one ({}). Are you sure you want to continue?",
                recorded, runtime
            ),
            VersionAdvisory::RuntimeNewer => format!(
                "Base scene was created with a LOWER host version ({}) than the running one ({}). Are you sure you want to continue?",
                recorded, runtime
            ),
            VersionAdvisory::Unknown => {
                "Base scene does not record the host version it was created with".to_string()
            }
        }
    }
}
