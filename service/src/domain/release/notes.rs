use benefits_common::{ModuleVersion, ReleaseNote, VersionNumber};

/// Release notes of one version, prepared for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedNotes {
    pub module_name: String,
    pub version: String,
    pub sections: Vec<NoteSection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSection {
    pub title: &'static str,
    pub items: Vec<String>,
}

/// Notes of the entry's current or candidate version, whichever is `version`.
pub fn notes_for<'a>(entry: &'a ModuleVersion, version: &str) -> Option<&'a ReleaseNote> {
    let version = VersionNumber::try_new(version).ok()?;

    if entry.current_version == version {
        Some(&entry.current_version_notes)
    } else if entry.new_version() == Some(&version) {
        Some(&entry.new_version_notes)
    } else {
        None
    }
}

pub fn render(entry: &ModuleVersion, version: &str) -> Option<RenderedNotes> {
    let notes = notes_for(entry, version)?;

    let sections = [
        ("New Features", &notes.features),
        ("Bug Fixes", &notes.bug_fixes),
        ("Improvements", &notes.improvements),
    ]
    .into_iter()
    .filter(|(_, items)| !items.is_empty())
    .map(|(title, items)| NoteSection {
        title,
        items: items.clone(),
    })
    .collect();

    Some(RenderedNotes {
        module_name: entry.module_name.to_string(),
        version: version.trim().to_string(),
        sections,
    })
}
