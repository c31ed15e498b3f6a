//! Single-file graph persistence.
//!
//! Layout (little-endian): magic `EGVX`, format version, graph parameters
//! (`m`, `m_max`, `ef_construction`), dimension (0 when unset), entry
//! point (`u32::MAX` when none), max level, node count, then each node in
//! arena order: id, source id, tombstone flag, preview, vector,
//! per-layer adjacency as arena indices. Because arena order and
//! adjacency order are preserved verbatim, a loaded index searches
//! exactly like the one that was saved.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use engram_core::errors::IndexError;
use uuid::Uuid;

use crate::index::Inner;
use crate::node::{Node, VectorMeta};

const MAGIC: [u8; 4] = *b"EGVX";
const FORMAT_VERSION: u32 = 1;

#[derive(Debug)]
pub(crate) struct LoadedSnapshot {
    pub inner: Inner,
    pub m: usize,
    pub m_max: usize,
    pub ef_construction: usize,
}

pub(crate) fn write_snapshot(
    inner: &Inner,
    m: usize,
    m_max: usize,
    ef_construction: usize,
    path: &Path,
) -> Result<(), IndexError> {
    let tmp = tmp_sibling(path);
    let file = File::create(&tmp)?;
    let mut w = BufWriter::new(file);

    w.write_all(&MAGIC)?;
    write_u32(&mut w, FORMAT_VERSION)?;
    write_u32(&mut w, m as u32)?;
    write_u32(&mut w, m_max as u32)?;
    write_u32(&mut w, ef_construction as u32)?;
    write_u32(&mut w, inner.dimension.unwrap_or(0) as u32)?;
    write_u32(&mut w, inner.entry.map_or(u32::MAX, |e| e as u32))?;
    write_u32(&mut w, inner.max_level as u32)?;
    write_u32(&mut w, inner.nodes.len() as u32)?;

    for node in &inner.nodes {
        w.write_all(node.id.as_bytes())?;
        w.write_all(node.meta.source_id.as_bytes())?;
        w.write_all(&[u8::from(node.tombstoned)])?;
        let preview = node.meta.content_preview.as_bytes();
        write_u32(&mut w, preview.len() as u32)?;
        w.write_all(preview)?;
        for v in &node.vector {
            w.write_all(&v.to_le_bytes())?;
        }
        write_u32(&mut w, node.neighbors.len() as u32)?;
        for layer in &node.neighbors {
            write_u32(&mut w, layer.len() as u32)?;
            for &link in layer {
                write_u32(&mut w, link as u32)?;
            }
        }
    }

    w.flush()?;
    w.get_ref().sync_all()?;
    drop(w);
    fs::rename(&tmp, path)?;
    Ok(())
}

pub(crate) fn read_snapshot(path: &Path) -> Result<LoadedSnapshot, IndexError> {
    let file = File::open(path)?;
    parse_snapshot(BufReader::new(file))
}

fn parse_snapshot(mut r: impl Read) -> Result<LoadedSnapshot, IndexError> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(corrupted("bad magic bytes"));
    }
    let version = read_u32(&mut r)?;
    if version != FORMAT_VERSION {
        return Err(IndexError::SnapshotVersion {
            expected: FORMAT_VERSION,
            found: version,
        });
    }

    let m = read_u32(&mut r)? as usize;
    let m_max = read_u32(&mut r)? as usize;
    let ef_construction = read_u32(&mut r)? as usize;
    let dimension = match read_u32(&mut r)? {
        0 => None,
        d => Some(d as usize),
    };
    let entry_raw = read_u32(&mut r)?;
    let max_level = read_u32(&mut r)? as usize;
    let count = read_u32(&mut r)? as usize;

    let dim = match dimension {
        Some(d) => d,
        None if count == 0 => 0,
        None => return Err(corrupted("node records without a dimension")),
    };

    let mut nodes = Vec::with_capacity(count);
    let mut ids = HashMap::with_capacity(count);
    let mut live = 0;
    for idx in 0..count {
        let id = read_uuid(&mut r)?;
        let source_id = read_uuid(&mut r)?;
        let tombstoned = read_u8(&mut r)? != 0;

        let preview_len = read_u32(&mut r)? as usize;
        let mut preview = vec![0u8; preview_len];
        r.read_exact(&mut preview)?;
        let content_preview =
            String::from_utf8(preview).map_err(|_| corrupted("preview is not valid UTF-8"))?;

        let mut vector = Vec::with_capacity(dim);
        for _ in 0..dim {
            vector.push(read_f32(&mut r)?);
        }

        let layer_count = read_u32(&mut r)? as usize;
        let mut neighbors = Vec::with_capacity(layer_count);
        for _ in 0..layer_count {
            let link_count = read_u32(&mut r)? as usize;
            let mut links = Vec::with_capacity(link_count);
            for _ in 0..link_count {
                let link = read_u32(&mut r)? as usize;
                if link >= count {
                    return Err(corrupted("adjacency index out of range"));
                }
                links.push(link);
            }
            neighbors.push(links);
        }

        if !tombstoned {
            live += 1;
        }
        if ids.insert(id, idx).is_some() {
            return Err(corrupted("duplicate vector id"));
        }
        nodes.push(Node {
            id,
            vector,
            neighbors,
            meta: VectorMeta {
                source_id,
                content_preview,
            },
            tombstoned,
        });
    }

    let entry = if entry_raw == u32::MAX {
        None
    } else {
        let e = entry_raw as usize;
        if e >= count {
            return Err(corrupted("entry point out of range"));
        }
        Some(e)
    };

    Ok(LoadedSnapshot {
        inner: Inner {
            nodes,
            ids,
            entry,
            max_level,
            dimension,
            live,
        },
        m,
        m_max,
        ef_construction,
    })
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

fn corrupted(details: &str) -> IndexError {
    IndexError::SnapshotCorrupted {
        details: details.to_string(),
    }
}

fn write_u32(w: &mut impl Write, value: u32) -> Result<(), IndexError> {
    w.write_all(&value.to_le_bytes())?;
    Ok(())
}

fn read_u32(r: &mut impl Read) -> Result<u32, IndexError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_f32(r: &mut impl Read) -> Result<f32, IndexError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(f32::from_le_bytes(buf))
}

fn read_u8(r: &mut impl Read) -> Result<u8, IndexError> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_uuid(r: &mut impl Read) -> Result<Uuid, IndexError> {
    let mut buf = [0u8; 16];
    r.read_exact(&mut buf)?;
    Ok(Uuid::from_bytes(buf))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn rejects_wrong_magic() {
        let err = parse_snapshot(Cursor::new(b"NOPE\x01\x00\x00\x00".to_vec())).unwrap_err();
        assert!(matches!(err, IndexError::SnapshotCorrupted { .. }));
    }

    #[test]
    fn rejects_unknown_version() {
        let mut bytes = MAGIC.to_vec();
        bytes.extend_from_slice(&99u32.to_le_bytes());
        let err = parse_snapshot(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(
            err,
            IndexError::SnapshotVersion {
                expected: FORMAT_VERSION,
                found: 99
            }
        ));
    }

    #[test]
    fn truncated_header_is_an_io_error() {
        let err = parse_snapshot(Cursor::new(MAGIC.to_vec())).unwrap_err();
        assert!(matches!(err, IndexError::SnapshotIo { .. }));
    }

    #[test]
    fn tmp_sibling_appends_suffix() {
        let tmp = tmp_sibling(Path::new("/data/index.egvx"));
        assert_eq!(tmp, Path::new("/data/index.egvx.tmp"));
    }
}
