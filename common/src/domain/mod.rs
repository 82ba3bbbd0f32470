pub mod modules;
pub mod notes;
pub mod version;

pub use modules::{
    DeactivationReason, DeactivationReasonError, ModuleName, ModuleNameError, ModuleStatus,
    ModuleStatusError, ModuleVersion, ModuleVersionId, ModuleVersionIdError, ModuleVersionPatch,
    ReleaseState,
};
pub use notes::ReleaseNote;
pub use version::{VersionNumber, VersionNumberError};
