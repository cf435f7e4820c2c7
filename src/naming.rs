//! Logical item names derived from file paths.

use std::path::Path;

/// `classes/MyClass.cls` -> `MyClass`, `objects/Account.object-meta.xml` -> `Account`.
///
/// Everything after the first `.` of the file name is treated as extension,
/// matching how retrieved metadata files are named.
pub fn item_name_from_path(path: impl AsRef<Path>) -> Option<String> {
    let file_name = path.as_ref().file_name()?.to_str()?;
    let name = file_name.split('.').next().unwrap_or(file_name);
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
