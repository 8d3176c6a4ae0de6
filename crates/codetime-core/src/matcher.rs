//! Target application matching

use crate::WindowSnapshot;

/// Identity strings that mark a sampled window as the tracked application.
///
/// Matching is a disjunction over several weak signals because window
/// identity reporting is platform-dependent: sometimes only a process
/// name is available, sometimes only a path.
#[derive(Debug, Clone)]
pub struct TargetSpec {
    name: String,
    exec_name: String,
    path_fragment: String,
}

impl TargetSpec {
    pub fn new(
        name: impl Into<String>,
        exec_name: impl Into<String>,
        path_fragment: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            exec_name: exec_name.into(),
            path_fragment: path_fragment.into(),
        }
    }

    /// The Visual Studio Code identity strings.
    pub fn vscode() -> Self {
        Self::new("Code", "Visual Studio Code.app", "Visual Studio Code.app")
    }

    /// Display name of the tracked application.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a sampled window belongs to the tracked application.
    ///
    /// A sample without process identity never matches; absent fields are
    /// simply "not a match", not an error.
    pub fn matches(&self, sample: &WindowSnapshot) -> bool {
        let process = match &sample.process {
            Some(process) => process,
            None => return false,
        };

        process.name.as_deref() == Some(self.name.as_str())
            || process.exec_name.as_deref() == Some(self.exec_name.as_str())
            || process
                .path
                .as_deref()
                .map(|path| path.contains(&self.path_fragment))
                .unwrap_or(false)
    }
}
