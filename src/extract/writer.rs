use crate::error::{ExtractError, Result};
use crate::extract::types::ExtractConfig;
use std::fs::Permissions;
use std::io::Write;
use std::path::Path;

/// Writes statements to any output, separated per the config
pub struct SqlWriter<W: Write> {
    writer: W,
    separator: String,
    trailing: bool,
}

impl<W: Write> SqlWriter<W> {
    pub fn new(writer: W, config: &ExtractConfig) -> Self {
        SqlWriter {
            writer,
            separator: config.separator.clone(),
            trailing: config.trailing_newline,
        }
    }

    pub fn write_statements(&mut self, statements: &[String]) -> std::io::Result<()> {
        for (i, statement) in statements.iter().enumerate() {
            if i > 0 {
                self.writer.write_all(self.separator.as_bytes())?;
            }
            self.writer.write_all(statement.as_bytes())?;
        }
        if self.trailing && !statements.is_empty() {
            self.writer.write_all(self.separator.as_bytes())?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Mode for a file that did not exist before; the umask still applies
#[cfg(unix)]
fn new_file_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o666))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<Permissions> {
    None
}

/// Replace `path` with the statements in one step
///
/// Output goes to a temporary file next to `path` which is renamed over it
/// once fully written, so readers never see a partial file and a failure
/// leaves any previous file untouched. An existing file keeps its
/// permissions.
pub fn write_sql_file<P: AsRef<Path>>(
    path: P,
    statements: &[String],
    config: &ExtractConfig,
) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let existing = std::fs::metadata(path).ok().map(|meta| meta.permissions());

    let mut builder = tempfile::Builder::new();
    builder.prefix(".seedsql-").suffix(".tmp");
    if existing.is_none() {
        if let Some(permissions) = new_file_permissions() {
            builder.permissions(permissions);
        }
    }
    let tmp = builder.tempfile_in(dir).map_err(|e| ExtractError::io(dir, e))?;

    if let Some(permissions) = existing {
        tmp.as_file()
            .set_permissions(permissions)
            .map_err(|e| ExtractError::io(path, e))?;
    }

    let mut writer = SqlWriter::new(tmp, config);
    writer
        .write_statements(statements)
        .map_err(|e| ExtractError::io(path, e))?;
    writer.flush().map_err(|e| ExtractError::io(path, e))?;

    writer
        .into_inner()
        .persist(path)
        .map_err(|e| ExtractError::io(path, e.error))?;

    tracing::info!(path = %path.display(), statements = statements.len(), "wrote SQL file");
    Ok(())
}
