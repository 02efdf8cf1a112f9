use anyhow::{anyhow, bail, Context, Result};
use std::fs;
use std::io::Read;
use std::path::{Component, Path, PathBuf};
use tracing::info;

/// Unpack a zip archive (stored or deflate entries) into `out_dir`.
pub fn extract_archive(zip_path: &Path, out_dir: &Path) -> Result<usize> {
    let buf = fs::read(zip_path).with_context(|| format!("read {}", zip_path.display()))?;
    let archive = rawzip::ZipArchive::from_slice(&buf)
        .map_err(|e| anyhow!("invalid zip archive {}: {:?}", zip_path.display(), e))?;

    let mut files = 0usize;
    for entry in archive.entries() {
        let entry = entry.map_err(|e| anyhow!("zip entry error: {:?}", e))?;
        let filename = entry
            .file_path()
            .try_normalize()
            .map_err(|e| anyhow!("failed to normalize zip path: {:?}", e))?
            .as_ref()
            .to_string();

        let out_path = out_dir.join(safe_relative_path(&filename)?);
        if entry.is_dir() {
            fs::create_dir_all(&out_path)
                .with_context(|| format!("create {}", out_path.display()))?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }

        let mut out = fs::File::create(&out_path)
            .with_context(|| format!("create {}", out_path.display()))?;
        let slice_entry = archive
            .get_entry(entry.wayfinder())
            .map_err(|e| anyhow!("failed to get entry data: {:?}", e))?;
        let data = slice_entry.data();
        let source: Box<dyn Read + '_> = match entry.compression_method() {
            rawzip::CompressionMethod::Store => Box::new(data),
            rawzip::CompressionMethod::Deflate => Box::new(flate2::read::DeflateDecoder::new(data)),
            method => bail!("unsupported compression method {:?} for {}", method, filename),
        };
        // Size and CRC are checked once the entry is fully read.
        let mut reader = slice_entry.verifying_reader(source);
        std::io::copy(&mut reader, &mut out)
            .with_context(|| format!("extract {} to {}", filename, out_path.display()))?;
        files += 1;
    }

    info!(archive = %zip_path.display(), files, "extracted corpus archive");
    Ok(files)
}

/// Reject absolute entry names and any `..` component.
fn safe_relative_path(name: &str) -> Result<PathBuf> {
    let path = Path::new(name);
    if path.is_absolute()
        || path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)))
    {
        bail!("unsupported or malicious path in zip: {name}");
    }
    Ok(path.to_path_buf())
}

/// In-memory zip with one entry per `(name, body, method)`.
#[cfg(test)]
pub(crate) fn build_zip(entries: &[(&str, &str, rawzip::CompressionMethod)]) -> Vec<u8> {
    use std::io::Write;

    let mut output = Vec::new();
    let mut archive = rawzip::ZipArchiveWriter::new(&mut output);
    for (name, body, method) in entries {
        let (mut entry, config) = archive
            .new_file(name)
            .compression_method(*method)
            .start()
            .unwrap();
        let descriptor = match method {
            rawzip::CompressionMethod::Deflate => {
                let encoder = flate2::write::DeflateEncoder::new(
                    &mut entry,
                    flate2::Compression::default(),
                );
                let mut writer = config.wrap(encoder);
                writer.write_all(body.as_bytes()).unwrap();
                let (encoder, descriptor) = writer.finish().unwrap();
                encoder.finish().unwrap();
                descriptor
            }
            _ => {
                let mut writer = config.wrap(&mut entry);
                writer.write_all(body.as_bytes()).unwrap();
                writer.finish().unwrap().1
            }
        };
        entry.finish(descriptor).unwrap();
    }
    archive.finish().unwrap();
    output
}
