#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use ddr_normalize::{data::Value, sheet::Grid};
use tempfile::{TempDir, tempdir};

/// Two FIELD ALPHA wells with two-line summaries and no next plan.
pub const ZONE_7_MEMO: &str = "\
Laporan Pagi Pemboran PEP Zona 7
FIELD ALPHA
1. AMJ-004
Nama Lokasi : AMJ-A
Nama Rig : PDSI #40.3
Hari ke : 12
Summary Report:
- Drill 8-1/2\" hole to 1250 m
- POOH to shoe
2. AMJ-005
Nama Rig : N1
Hari ke : 3
Summary Report:
= RIH with BHA
- Circulate bottoms up
Terima kasih
";

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    /// Writes raw bytes, for inputs in legacy encodings.
    pub fn write_bytes(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, contents).expect("write temp bytes");
        path
    }
}

/// Builds a grid whose header row sits at `header_row`, followed by `rows`.
pub fn grid(header_row: usize, headers: &[&str], rows: &[&[&str]]) -> Grid {
    let text_row = |cells: &[&str]| {
        cells
            .iter()
            .map(|cell| (!cell.is_empty()).then(|| Value::text(*cell)))
            .collect::<Vec<_>>()
    };
    let mut grid: Grid = vec![Vec::new(); header_row];
    grid.push(text_row(headers));
    grid.extend(rows.iter().map(|row| text_row(row)));
    grid
}
