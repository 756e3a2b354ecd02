use std::{
    fs,
    io::{self, Write},
    path::Path,
};

const HEADER_TEMP_PREFIX: &str = ".revstamp";
const HEADER_TEMP_SUFFIX: &str = ".tmp";
// Same mode `File::create` asks for; the process umask still applies.
#[cfg(unix)]
const NEW_HEADER_MODE: u32 = 0o666;

/// Write `content` to `path`, creating it or replacing whatever was there.
///
/// The bytes go to a temporary file next to `path` which is then renamed over
/// it, so a failed write leaves the previous header intact. A replaced header
/// keeps its permissions; a new one gets the umask default, like a plain create.
pub fn write_header(path: &Path, content: &str) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        Some(_) => Path::new("."),
        None => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "header path has no parent directory",
            ));
        }
    };

    let existing = match fs::metadata(path) {
        Ok(metadata) => Some(metadata.permissions()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => None,
        Err(err) => return Err(err),
    };

    let mut builder = tempfile::Builder::new();
    builder.prefix(HEADER_TEMP_PREFIX).suffix(HEADER_TEMP_SUFFIX);
    #[cfg(unix)]
    if existing.is_none() {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(NEW_HEADER_MODE));
    }
    let mut temp = builder.tempfile_in(parent)?;
    temp.write_all(content.as_bytes())?;
    temp.flush()?;
    if let Some(permissions) = existing {
        temp.as_file().set_permissions(permissions)?;
    }
    temp.persist(path).map_err(|err| err.error)?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "wrote header");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn write_header_creates_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("version.h");

        write_header(&path, "#define REV \"12\"\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "#define REV \"12\"\n");
    }

    #[test]
    fn write_header_truncates_longer_previous_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("version.h");
        fs::write(&path, "a much longer previous header body\n").unwrap();

        write_header(&path, "short").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "short");
    }

    #[test]
    fn write_header_leaves_no_temp_files_behind() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("version.h");

        write_header(&path, "one").unwrap();
        write_header(&path, "two").unwrap();

        let names: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("version.h")]);
    }

    #[cfg(unix)]
    #[test]
    fn new_header_gets_the_same_mode_as_a_plain_create() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let reference = temp.path().join("reference.h");
        fs::write(&reference, "").unwrap();
        let path = temp.path().join("version.h");

        write_header(&path, "fresh").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        let expected = fs::metadata(&reference).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, expected);
    }

    #[cfg(unix)]
    #[test]
    fn rewritten_header_keeps_its_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("version.h");
        fs::write(&path, "old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o664)).unwrap();

        write_header(&path, "new").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o664);
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn write_header_fails_for_missing_directory() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing").join("version.h");

        assert!(write_header(&path, "x").is_err());
        assert!(!path.exists());
    }
}
