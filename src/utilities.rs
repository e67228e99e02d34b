use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use dirs_next::cache_dir;

/// Size of each sequential read when loading a document.
pub const READ_CHUNK_SIZE: usize = 4096;

/// Load a text file in fixed-size chunks and decode it as UTF-8.
pub fn read_text_file(path: &Path) -> io::Result<String> {
    let mut bytes = Vec::new();
    {
        let mut file = File::open(path)?;
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        loop {
            let read = file.read(&mut chunk)?;
            if read == 0 {
                break;
            }
            bytes.extend_from_slice(&chunk[..read]);
        }
    }

    String::from_utf8(bytes).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirItem {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

/// List a directory for the file browser: parent link first, then
/// directories, then files, each group sorted by name. Hidden entries are skipped.
pub fn list_directory(dir: &Path) -> io::Result<Vec<DirItem>> {
    let mut dirs = Vec::new();
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        // Follows symlinks so a linked directory can be entered
        let path = entry.path();
        let is_dir = path.is_dir();
        let item = DirItem { name, path, is_dir };
        if is_dir {
            dirs.push(item);
        } else {
            files.push(item);
        }
    }

    dirs.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    files.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    let mut items = Vec::with_capacity(dirs.len() + files.len() + 1);
    if let Some(parent) = dir.parent() {
        items.push(DirItem { name: "..".to_string(), path: parent.to_path_buf(), is_dir: true });
    }
    items.extend(dirs);
    items.extend(files);
    Ok(items)
}

/// Default log location: `<cache dir>/tabdesk/tabdesk.log`, falling back to the temp dir.
pub fn default_log_path() -> PathBuf {
    cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("tabdesk")
        .join("tabdesk.log")
}

/// Format an integer with `,` thousands separators.
pub fn format_thousands(value: usize) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
