use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

// @module: File and path utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file, creating parent directories
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))
    }

    // @splits: "dir/movie.en.srt" into ("dir/movie.en", ".srt")
    pub fn split_extension(path: &str) -> (&str, &str) {
        let file_start = path.rfind(['/', '\\']).map(|i| i + 1).unwrap_or(0);
        match path[file_start..].rfind('.') {
            Some(dot) if dot > 0 => path.split_at(file_start + dot),
            _ => (path, ""),
        }
    }

    // @generates: Variant key `{base}{suffix}{ext}` for a derived subtitle
    pub fn variant_path(source: &str, suffix: &str) -> String {
        let (base, ext) = Self::split_extension(source);
        format!("{}{}{}", base, suffix, ext)
    }

    // @converts: Variant key into a filesystem path inside `output_dir`
    pub fn output_path<P: AsRef<Path>>(output_dir: Option<P>, key: &str) -> PathBuf {
        let key_path = Path::new(key);
        match output_dir {
            Some(dir) => dir.as_ref().join(key_path.file_name().unwrap_or(key_path.as_os_str())),
            None => key_path.to_path_buf(),
        }
    }
}
