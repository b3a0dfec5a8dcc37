//! PCD point-cloud loading (`DATA ascii` and `DATA binary`).
//!
//! Only the `x y z` fields are read; other fields are skipped using their
//! declared `SIZE`/`COUNT`. Points with a non-finite coordinate are dropped.

use crate::types::RawPoint;
use log::debug;
use std::fs;
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DataFormat {
    Ascii,
    Binary,
}

#[derive(Clone, Debug)]
struct Field {
    name: String,
    size: usize,
    kind: char,
    count: usize,
}

#[derive(Debug)]
struct Header {
    fields: Vec<Field>,
    points: usize,
    format: DataFormat,
    /// Byte offset of the first data byte.
    data_start: usize,
}

impl Header {
    fn column_of(&self, name: &str) -> Result<usize, String> {
        self.fields
            .iter()
            .position(|f| f.name == name)
            .ok_or_else(|| format!("PCD header has no '{name}' field"))
    }

    /// Byte offset of `name` inside one binary record, plus the record size.
    fn byte_layout(&self, name: &str) -> Result<(usize, &Field, usize), String> {
        let idx = self.column_of(name)?;
        let offset = self.fields[..idx].iter().map(|f| f.size * f.count).sum();
        let stride = self.fields.iter().map(|f| f.size * f.count).sum();
        Ok((offset, &self.fields[idx], stride))
    }

    /// Index of `name` inside one whitespace-separated ascii record.
    fn ascii_column(&self, name: &str) -> Result<usize, String> {
        let idx = self.column_of(name)?;
        Ok(self.fields[..idx].iter().map(|f| f.count).sum())
    }
}

/// Load a `.pcd` file.
pub fn load_pcd(path: &Path) -> Result<Vec<RawPoint>, String> {
    let bytes = fs::read(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let points = parse_pcd(&bytes).map_err(|e| format!("{}: {e}", path.display()))?;
    debug!("load_pcd path={} points={}", path.display(), points.len());
    Ok(points)
}

/// Parse PCD contents already in memory.
pub fn parse_pcd(bytes: &[u8]) -> Result<Vec<RawPoint>, String> {
    let header = parse_header(bytes)?;
    let body = &bytes[header.data_start..];
    match header.format {
        DataFormat::Ascii => parse_ascii(&header, body),
        DataFormat::Binary => parse_binary(&header, body),
    }
}

fn parse_header(bytes: &[u8]) -> Result<Header, String> {
    let mut names: Vec<String> = Vec::new();
    let mut sizes: Vec<usize> = Vec::new();
    let mut kinds: Vec<char> = Vec::new();
    let mut counts: Vec<usize> = Vec::new();
    let mut width = 0usize;
    let mut height = 1usize;
    let mut points = None;
    let mut pos = 0usize;

    while pos < bytes.len() {
        let end = bytes[pos..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(bytes.len(), |i| pos + i);
        let line = String::from_utf8_lossy(&bytes[pos..end]);
        let line = line.trim();
        pos = (end + 1).min(bytes.len());
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        let values = &parts[1..];
        match parts[0] {
            "FIELDS" => names = values.iter().map(|s| s.to_string()).collect(),
            "SIZE" => sizes = parse_list(values, "SIZE")?,
            "TYPE" => kinds = values.iter().filter_map(|s| s.chars().next()).collect(),
            "COUNT" => counts = parse_list(values, "COUNT")?,
            "WIDTH" => width = parse_one(values, "WIDTH")?,
            "HEIGHT" => height = parse_one(values, "HEIGHT")?,
            "POINTS" => points = Some(parse_one(values, "POINTS")?),
            "DATA" => {
                let format = match values.first().copied() {
                    Some("ascii") => DataFormat::Ascii,
                    Some("binary") => DataFormat::Binary,
                    Some(other) => return Err(format!("unsupported PCD DATA format '{other}'")),
                    None => return Err("PCD DATA line without a format".to_string()),
                };
                if counts.is_empty() {
                    counts = vec![1; names.len()];
                }
                if sizes.len() != names.len()
                    || kinds.len() != names.len()
                    || counts.len() != names.len()
                {
                    return Err(format!(
                        "PCD header lists {} fields but {} sizes, {} types and {} counts",
                        names.len(),
                        sizes.len(),
                        kinds.len(),
                        counts.len()
                    ));
                }
                let fields = names
                    .into_iter()
                    .zip(sizes)
                    .zip(kinds)
                    .zip(counts)
                    .map(|(((name, size), kind), count)| Field {
                        name,
                        size,
                        kind,
                        count,
                    })
                    .collect();
                return Ok(Header {
                    fields,
                    points: points.unwrap_or(width.saturating_mul(height)),
                    format,
                    data_start: pos,
                });
            }
            _ => {}
        }
    }
    Err("PCD header ended without a DATA line".to_string())
}

fn parse_one(values: &[&str], key: &str) -> Result<usize, String> {
    values
        .first()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| format!("invalid PCD {key} line"))
}

fn parse_list(values: &[&str], key: &str) -> Result<Vec<usize>, String> {
    values
        .iter()
        .map(|s| s.parse().map_err(|_| format!("invalid PCD {key} entry '{s}'")))
        .collect()
}

fn parse_ascii(header: &Header, body: &[u8]) -> Result<Vec<RawPoint>, String> {
    let cols = [
        header.ascii_column("x")?,
        header.ascii_column("y")?,
        header.ascii_column("z")?,
    ];
    let text = String::from_utf8_lossy(body);
    // each ascii record takes at least two bytes
    let mut out = Vec::with_capacity(header.points.min(body.len() / 2));
    for line in text.lines().map(str::trim) {
        if out.len() >= header.points {
            break;
        }
        if line.is_empty() {
            continue;
        }
        let values: Vec<&str> = line.split_whitespace().collect();
        let mut xyz = [0.0f64; 3];
        for (v, &c) in xyz.iter_mut().zip(&cols) {
            *v = values
                .get(c)
                .and_then(|s| s.parse::<f64>().ok())
                .ok_or_else(|| format!("malformed PCD record '{line}'"))?;
        }
        push_finite(&mut out, xyz);
    }
    Ok(out)
}

fn parse_binary(header: &Header, body: &[u8]) -> Result<Vec<RawPoint>, String> {
    let layouts = [
        header.byte_layout("x")?,
        header.byte_layout("y")?,
        header.byte_layout("z")?,
    ];
    let stride = layouts[0].2;
    if stride == 0 {
        return Err("PCD record size is zero".to_string());
    }
    let available = body.len() / stride;
    if available < header.points {
        return Err(format!(
            "PCD declares {} points but holds {available}",
            header.points
        ));
    }
    let mut out = Vec::with_capacity(header.points.min(available));
    for record in body.chunks_exact(stride).take(header.points) {
        let mut xyz = [0.0f64; 3];
        for (v, (offset, field, _)) in xyz.iter_mut().zip(&layouts) {
            *v = read_scalar(&record[*offset..*offset + field.size], field.kind)
                .ok_or_else(|| {
                    format!(
                        "unsupported PCD field type {}{} for '{}'",
                        field.kind, field.size, field.name
                    )
                })?;
        }
        push_finite(&mut out, xyz);
    }
    Ok(out)
}

fn read_scalar(b: &[u8], kind: char) -> Option<f64> {
    let v = match (kind, b.len()) {
        ('F', 4) => f32::from_le_bytes(b.try_into().ok()?) as f64,
        ('F', 8) => f64::from_le_bytes(b.try_into().ok()?),
        ('I', 1) => i8::from_le_bytes(b.try_into().ok()?) as f64,
        ('I', 2) => i16::from_le_bytes(b.try_into().ok()?) as f64,
        ('I', 4) => i32::from_le_bytes(b.try_into().ok()?) as f64,
        ('U', 1) => b[0] as f64,
        ('U', 2) => u16::from_le_bytes(b.try_into().ok()?) as f64,
        ('U', 4) => u32::from_le_bytes(b.try_into().ok()?) as f64,
        _ => return None,
    };
    Some(v)
}

fn push_finite(out: &mut Vec<RawPoint>, [x, y, z]: [f64; 3]) {
    if x.is_finite() && y.is_finite() && z.is_finite() {
        out.push(RawPoint::new(x, y, z));
    }
}
