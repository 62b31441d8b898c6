//! Conversion between per-country text directories and dat files.
//!
//! Both directions share one shape: a directory holds one file per country
//! code, a dat file holds one protobuf list with one group per country code.
//! [`GeoKind`] captures what differs between site lists and IP lists.

mod ip;
mod site;

#[cfg(test)]
mod tests;

pub use ip::Ips;
pub use site::Sites;

use ahash::AHashMap;
use flate2::read::GzDecoder;
use prost::Message;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;

use crate::error::IoContext;
use crate::{Error, Result};

/// Gzip stream magic bytes.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// A kind of geo list: its wire message and its text form.
pub trait GeoKind {
    /// Protobuf message of the whole dat file.
    type List: Message + Default;

    /// One country group of the list.
    type Entry;

    /// Name used in logs and errors.
    const NAME: &'static str;

    /// Read the rules of one country file into a group.
    fn read_entry<R: BufRead>(country_code: String, path: &Path, reader: R) -> Result<Self::Entry>;

    /// Assemble the list from groups in order.
    fn into_list(entries: Vec<Self::Entry>) -> Self::List;

    /// Country code and rendered lines of every group, in list order.
    fn render(list: &Self::List) -> Result<Vec<(String, Vec<String>)>>;
}

/// Build a list from a directory of country files.
///
/// Files are visited in name order. Each file name, uppercased, becomes the
/// country code of its group. Sub-directories are skipped.
pub fn build_list<K: GeoKind>(dir: &Path) -> Result<K::List> {
    let mut entries = Vec::new();

    for path in list_country_files(dir)? {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::InvalidFileName(path.clone()))?;
        log::info!("{}", name);

        let file = fs::File::open(&path).io_context("open", &path)?;
        entries.push(K::read_entry(name.to_uppercase(), &path, BufReader::new(file))?);
    }

    log::debug!("collected {} {} groups from {}", entries.len(), K::NAME, dir.display());
    Ok(K::into_list(entries))
}

/// Compile a directory of country files into dat bytes.
pub fn compile_dir<K: GeoKind>(dir: &Path) -> Result<Vec<u8>> {
    let list = build_list::<K>(dir)?;
    encode(&list)
}

/// Serialize a message in its canonical encoding.
pub fn encode<M: Message>(msg: &M) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(msg.encoded_len());
    msg.encode(&mut buf)?;
    Ok(buf)
}

/// Deserialize dat bytes, inflating them first if they are gzip-compressed.
pub fn decode_list<K: GeoKind>(data: &[u8]) -> Result<K::List> {
    let mut inflated = Vec::new();
    let bytes = if data.starts_with(&GZIP_MAGIC) {
        GzDecoder::new(data)
            .read_to_end(&mut inflated)
            .map_err(Error::Gzip)?;
        log::debug!("inflated {} bytes to {} bytes", data.len(), inflated.len());
        inflated.as_slice()
    } else {
        data
    };

    <K::List as Message>::decode(bytes).map_err(|source| Error::Decode {
        what: K::NAME,
        source,
    })
}

/// Render a list into `(file name, file content)` pairs.
///
/// File names are the lowercased country codes. Groups sharing a country
/// code are concatenated in list order into one file.
pub fn render_files<K: GeoKind>(list: &K::List) -> Result<Vec<(String, String)>> {
    let mut files: Vec<(String, String)> = Vec::new();
    let mut index: AHashMap<String, usize> = AHashMap::new();

    for (country_code, lines) in K::render(list)? {
        let file_name = country_code.to_lowercase();
        check_file_name(&country_code, &file_name)?;

        let slot = *index.entry(file_name.clone()).or_insert_with(|| {
            files.push((file_name, String::new()));
            files.len() - 1
        });

        let content = &mut files[slot].1;
        for line in lines {
            content.push_str(&line);
            content.push('\n');
        }
    }

    Ok(files)
}

/// Decompile dat bytes into one text file per country code under `dir`.
///
/// Returns the number of files written. The whole input is decoded and
/// rendered before the first file is written; a write failure leaves the
/// files written so far in place.
pub fn decompile<K: GeoKind>(data: &[u8], dir: &Path) -> Result<usize> {
    let list = decode_list::<K>(data)?;
    let files = render_files::<K>(&list)?;

    fs::create_dir_all(dir).io_context("create", dir)?;
    for (name, content) in &files {
        let path = dir.join(name);
        fs::write(&path, content).io_context("write", &path)?;
        log::info!("{}", path.display());
    }

    Ok(files.len())
}

/// Read a whole dat file.
pub fn read_dat(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).io_context("read", path)
}

/// Write a dat file, replacing any existing one only once the new content is
/// fully on disk.
///
/// The content goes to a temporary file next to `path` first; it is removed
/// again if any step fails.
pub fn write_dat(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp_file = NamedTempFile::new_in(dir).io_context("create temp file in", dir)?;
    temp_file.write_all(data).io_context("write", temp_file.path())?;
    temp_file
        .as_file()
        .sync_all()
        .io_context("sync", temp_file.path())?;

    temp_file
        .persist(path)
        .map_err(|e| e.error)
        .io_context("replace", path)?;
    log::debug!("wrote {} bytes to {}", data.len(), path.display());
    Ok(())
}

/// Write `<dat>.sha256sum` in the format of the `sha256sum` tool.
///
/// Returns the path of the checksum file.
pub fn write_checksum(path: &Path, data: &[u8]) -> Result<PathBuf> {
    let digest = Sha256::digest(data);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let sum_path = sibling_path(path, ".sha256sum");
    fs::write(&sum_path, format!("{:x}  {}\n", digest, name)).io_context("write", &sum_path)?;
    Ok(sum_path)
}

/// Regular files of `dir`, sorted by name.
fn list_country_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir).io_context("read dir", dir)? {
        let entry = entry.io_context("read dir", dir)?;
        let path = entry.path();
        let file_type = entry.file_type().io_context("stat", &path)?;
        if file_type.is_dir() {
            log::warn!("skipping directory {}", path.display());
            continue;
        }
        files.push(path);
    }

    files.sort();
    Ok(files)
}

/// Country codes become file names; refuse anything that is not a single
/// plain path component.
fn check_file_name(country_code: &str, file_name: &str) -> Result<()> {
    let mut components = Path::new(file_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(c)), None) if c == file_name => Ok(()),
        _ => Err(Error::malformed(
            country_code,
            format!("country code {:?} is not a usable file name", country_code),
        )),
    }
}

/// `path` with `suffix` appended to its file name.
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}
