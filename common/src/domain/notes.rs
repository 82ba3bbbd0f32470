use serde::{Deserialize, Serialize};

/// Release notes attached to one version of a module.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseNote {
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub bug_fixes: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
}

impl ReleaseNote {
    pub fn is_empty(&self) -> bool {
        self.features.is_empty() && self.bug_fixes.is_empty() && self.improvements.is_empty()
    }
}
