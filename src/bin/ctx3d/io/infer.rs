use std::path::Path;

use ctfile_x3d::io::Format;

/// CTFile format suggested by a file extension.
pub fn input(path: &Path) -> Option<Format> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "mol" | "mdl" | "sdf" => Some(Format::Mol),
        "rxn" => Some(Format::Rxn),
        _ => None,
    }
}
