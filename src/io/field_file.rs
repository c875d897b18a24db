//! Reading of vector field files with a fixed text layout.
//!
//! A field file consists of header lines followed by one data row per lattice cell:
//!
//! ```text
//! V1 = [1.0 0.0 0.0]
//! V2 = [0.0 1.0 0.0]
//! Normal = [0.0 0.0 1.0]
//! Center = [0.0 0.0 0.0]
//! Plane: 41x41 grid spacing 0.1
//! Vert 50 points spacing 0.1
//!   x y z Ex Ey Ez |E|
//!   ...
//! ```
//!
//! The `Vert` header gives the number of vertical intervals, so the grid has one
//! more layer than the stated count. Data rows are in fill order with x varying
//! fastest, then y, then z, and may use Fortran `D` exponent markers.

use super::Verbosity;
use crate::{
    geometry::{In3D, Point3, Vec3},
    grid::{basis::LocalBasis, fgr, FieldGrid, GridCell},
};
use lazy_static::lazy_static;
use regex::Regex;
use std::{
    fs,
    io::{self, BufRead},
    path::{Path, PathBuf},
};
use thiserror::Error;

lazy_static! {
    static ref BRACKETED_VECTOR_REGEX: Regex =
        Regex::new(r"\[\s*(\S+)\s+(\S+)\s+(\S+)\s*\]").unwrap();
    static ref PLANE_EXTENT_REGEX: Regex = Regex::new(r"^(\d+)x(\d+)$").unwrap();
}

/// Number of whitespace separated values in a data row.
const DATA_ROW_LENGTH: usize = 7;

/// Largest number of cells to reserve storage for before any data row is read.
const MAX_RESERVED_CELLS: usize = 1 << 20;

/// Error encountered while reading or interpreting a field file.
#[derive(Debug, Error)]
pub enum FieldFileError {
    #[error("Could not open field file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Could not read line {line} of field file: {source}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },
    #[error("Failed parsing string `{token}` on line {line} of field file")]
    InvalidNumber { line: usize, token: String },
    #[error("Data row on line {line} has {found} values, expected 7")]
    InvalidRowLength { line: usize, found: usize },
    #[error("Malformed {header} header on line {line} of field file")]
    MalformedHeader { line: usize, header: &'static str },
    #[error("{header} header must appear before line {line} of field file")]
    MissingHeader { line: usize, header: &'static str },
    #[error("{header} header on line {line} appears after the grid layout was fixed")]
    MisplacedHeader { line: usize, header: &'static str },
    #[error("Data row on line {line} appears before the Vert header")]
    DataBeforeLayout { line: usize },
    #[error("Grid shape {shape} declared on line {line} is empty or has too many cells")]
    InvalidDimensions { line: usize, shape: In3D<usize> },
    #[error("Basis vectors V1, V2 and Normal are not linearly independent (line {line})")]
    SingularBasis { line: usize },
    #[error("Data row on line {line} exceeds the {expected} cells of the grid")]
    TooManyRows { line: usize, expected: usize },
    #[error("Field file has no Vert header, so the grid layout is unknown")]
    NoLayout,
    #[error("Field file ended after {found} of {expected} data rows")]
    IncompleteGrid { found: usize, expected: usize },
}

/// Constructs a field grid from the field file at the given path.
///
/// # Parameters
///
/// - `file_path`: Path of the field file.
/// - `verbosity`: Whether and how to pass non-critical information to the user.
///
/// # Returns
///
/// A `Result` which is either:
///
/// - `Ok`: Contains the constructed grid with positions and field vectors in the local basis.
/// - `Err`: Contains a `FieldFileError` describing why the file could not be used.
///
/// # Type parameters
///
/// - `P`: A type that can be treated as a reference to a `Path`.
pub fn read_field_grid<P: AsRef<Path>>(
    file_path: P,
    verbosity: Verbosity,
) -> Result<FieldGrid<fgr>, FieldFileError> {
    let file_path = file_path.as_ref();
    if verbosity.print_messages() {
        eprintln!("Reading field grid from {}", file_path.display());
    }
    let file = fs::File::open(file_path).map_err(|source| FieldFileError::Open {
        path: file_path.to_path_buf(),
        source,
    })?;
    let grid = parse_field_grid(io::BufReader::new(file))?;
    if verbosity.print_messages() {
        eprintln!(
            "Read {} cells with shape {} and spacing {}",
            grid.n_cells(),
            grid.shape(),
            grid.spacing()
        );
    }
    Ok(grid)
}

/// Constructs a field grid from field file text provided by the given reader.
pub fn parse_field_grid<R: BufRead>(reader: R) -> Result<FieldGrid<fgr>, FieldFileError> {
    let mut parser = FieldFileParser::default();
    for (line_idx, line) in reader.lines().enumerate() {
        let line_number = line_idx + 1;
        let line = line.map_err(|source| FieldFileError::Read {
            line: line_number,
            source,
        })?;
        parser.parse_line(&line, line_number)?;
    }
    parser.finish()
}

/// Meaning of a single line of a field file.
#[derive(Clone, Copy, Debug, PartialEq)]
enum LineKind {
    BasisVector(usize),
    Center,
    Plane,
    Vertical,
    Data,
    Blank,
}

impl LineKind {
    fn of(line: &str) -> Self {
        if line.contains("V1") {
            Self::BasisVector(0)
        } else if line.contains("V2") {
            Self::BasisVector(1)
        } else if line.contains("Normal") {
            Self::BasisVector(2)
        } else if line.contains("Center") {
            Self::Center
        } else if line.contains("Plane") {
            Self::Plane
        } else if line.contains("Vert") {
            Self::Vertical
        } else if line.trim().len() > 3 {
            Self::Data
        } else {
            Self::Blank
        }
    }

    fn header_name(&self) -> &'static str {
        match self {
            Self::BasisVector(0) => "V1",
            Self::BasisVector(1) => "V2",
            Self::BasisVector(_) => "Normal",
            Self::Center => "Center",
            Self::Plane => "Plane",
            Self::Vertical => "Vert",
            Self::Data | Self::Blank => "",
        }
    }
}

/// Grid extents and spacing known once the `Vert` header has been read.
#[derive(Clone, Debug)]
struct GridLayout {
    shape: In3D<usize>,
    spacing: In3D<fgr>,
    n_cells: usize,
}

/// Accumulates header values and cells while a field file is read line by line.
#[derive(Default)]
struct FieldFileParser {
    basis_vectors: [Option<Vec3<fgr>>; 3],
    center: Option<Point3<fgr>>,
    plane: Option<(usize, usize, fgr)>,
    layout: Option<GridLayout>,
    basis: Option<LocalBasis<fgr>>,
    cells: Vec<GridCell<fgr>>,
}

impl FieldFileParser {
    fn parse_line(&mut self, line: &str, line_number: usize) -> Result<(), FieldFileError> {
        let kind = LineKind::of(line);
        if self.basis.is_some() && !matches!(kind, LineKind::Data | LineKind::Blank) {
            return Err(FieldFileError::MisplacedHeader {
                line: line_number,
                header: kind.header_name(),
            });
        }
        match kind {
            LineKind::BasisVector(idx) => {
                self.basis_vectors[idx] = Some(
                    parse_bracketed_components(line, line_number, kind.header_name())
                        .map(|(x, y, z)| Vec3::new(x, y, z))?,
                );
            }
            LineKind::Center => {
                self.center = Some(
                    parse_bracketed_components(line, line_number, kind.header_name())
                        .map(|(x, y, z)| Point3::new(x, y, z))?,
                );
            }
            LineKind::Plane => {
                self.plane = Some(parse_plane_header(line, line_number)?);
            }
            LineKind::Vertical => {
                self.declare_layout(line, line_number)?;
            }
            LineKind::Data => {
                self.push_data_row(line, line_number)?;
            }
            LineKind::Blank => {}
        }
        Ok(())
    }

    fn declare_layout(&mut self, line: &str, line_number: usize) -> Result<(), FieldFileError> {
        if self.layout.is_some() {
            return Err(FieldFileError::MisplacedHeader {
                line: line_number,
                header: "Vert",
            });
        }
        let (n_intervals, vertical_spacing) = parse_vertical_header(line, line_number)?;
        let (nx, ny, planar_spacing) = self.plane.ok_or(FieldFileError::MissingHeader {
            line: line_number,
            header: "Plane",
        })?;
        let [v1, v2, normal] = self.require_basis_vectors(line_number)?;
        if LocalBasis::new(v1, v2, normal, Point3::origin()).is_none() {
            return Err(FieldFileError::SingularBasis { line: line_number });
        }

        let shape = In3D::new(nx, ny, n_intervals.saturating_add(1));
        let n_cells = n_intervals
            .checked_add(1)
            .and_then(|nz| nz.checked_mul(ny))
            .and_then(|n_layer_cells| n_layer_cells.checked_mul(nx))
            .filter(|&n_cells| n_cells > 0)
            .ok_or(FieldFileError::InvalidDimensions {
                line: line_number,
                shape,
            })?;
        self.cells = Vec::with_capacity(n_cells.min(MAX_RESERVED_CELLS));
        self.layout = Some(GridLayout {
            shape,
            spacing: In3D::new(planar_spacing, planar_spacing, vertical_spacing),
            n_cells,
        });
        Ok(())
    }

    fn require_basis_vectors(&self, line_number: usize) -> Result<[Vec3<fgr>; 3], FieldFileError> {
        let mut vectors = [Vec3::zero(); 3];
        for (idx, vector) in self.basis_vectors.iter().enumerate() {
            vectors[idx] = vector.ok_or(FieldFileError::MissingHeader {
                line: line_number,
                header: LineKind::BasisVector(idx).header_name(),
            })?;
        }
        Ok(vectors)
    }

    fn push_data_row(&mut self, line: &str, line_number: usize) -> Result<(), FieldFileError> {
        let n_cells = match &self.layout {
            Some(layout) => layout.n_cells,
            None => return Err(FieldFileError::DataBeforeLayout { line: line_number }),
        };
        if self.cells.len() == n_cells {
            return Err(FieldFileError::TooManyRows {
                line: line_number,
                expected: n_cells,
            });
        }
        if self.basis.is_none() {
            self.basis = Some(self.create_basis(line_number)?);
        }

        let tokens: Vec<_> = line.split_whitespace().collect();
        if tokens.len() != DATA_ROW_LENGTH {
            return Err(FieldFileError::InvalidRowLength {
                line: line_number,
                found: tokens.len(),
            });
        }
        let mut values = [0.0; 6];
        for (value, token) in values.iter_mut().zip(tokens.iter()) {
            *value = parse_float(token, line_number)?;
        }
        let position = Point3::new(values[0], values[1], values[2]);
        let field = Vec3::new(values[3], values[4], values[5]);

        if let Some(basis) = &self.basis {
            self.cells.push(GridCell {
                position: basis.to_basis_pos(&position),
                field: basis.to_basis(&field),
            });
        }
        Ok(())
    }

    fn create_basis(&self, line_number: usize) -> Result<LocalBasis<fgr>, FieldFileError> {
        let center = self.center.ok_or(FieldFileError::MissingHeader {
            line: line_number,
            header: "Center",
        })?;
        let [v1, v2, normal] = self.require_basis_vectors(line_number)?;
        LocalBasis::new(v1, v2, normal, center)
            .ok_or(FieldFileError::SingularBasis { line: line_number })
    }

    fn finish(self) -> Result<FieldGrid<fgr>, FieldFileError> {
        let layout = self.layout.ok_or(FieldFileError::NoLayout)?;
        let expected = layout.n_cells;
        if self.cells.len() != expected {
            return Err(FieldFileError::IncompleteGrid {
                found: self.cells.len(),
                expected,
            });
        }
        let basis = self.basis.ok_or(FieldFileError::IncompleteGrid { found: 0, expected })?;
        Ok(FieldGrid::from_local_cells(
            layout.shape,
            layout.spacing,
            basis,
            self.cells,
        ))
    }
}

/// Parses a floating point token, accepting Fortran style `D` exponent markers.
fn parse_float(token: &str, line_number: usize) -> Result<fgr, FieldFileError> {
    token
        .replace(['D', 'd'], "E")
        .parse::<fgr>()
        .map_err(|_| FieldFileError::InvalidNumber {
            line: line_number,
            token: token.to_string(),
        })
}

fn parse_count(token: &str, line_number: usize) -> Result<usize, FieldFileError> {
    token
        .parse::<usize>()
        .map_err(|_| FieldFileError::InvalidNumber {
            line: line_number,
            token: token.to_string(),
        })
}

/// Parses the three components of a `[x y z]` vector on a header line.
fn parse_bracketed_components(
    line: &str,
    line_number: usize,
    header: &'static str,
) -> Result<(fgr, fgr, fgr), FieldFileError> {
    let captures = BRACKETED_VECTOR_REGEX
        .captures(line)
        .ok_or(FieldFileError::MalformedHeader {
            line: line_number,
            header,
        })?;
    Ok((
        parse_float(&captures[1], line_number)?,
        parse_float(&captures[2], line_number)?,
        parse_float(&captures[3], line_number)?,
    ))
}

/// Parses `...: WxH <a> <b> <spacing> ...` into the in-plane extents and spacing.
fn parse_plane_header(line: &str, line_number: usize) -> Result<(usize, usize, fgr), FieldFileError> {
    let malformed = FieldFileError::MalformedHeader {
        line: line_number,
        header: "Plane",
    };
    let description = match line.split(':').nth(1) {
        Some(description) => description,
        None => return Err(malformed),
    };
    let tokens: Vec<_> = description.split_whitespace().collect();
    let (extents, spacing) = match (tokens.first(), tokens.get(3)) {
        (Some(extents), Some(spacing)) => (*extents, *spacing),
        _ => return Err(malformed),
    };
    let captures = match PLANE_EXTENT_REGEX.captures(extents) {
        Some(captures) => captures,
        None => {
            return Err(FieldFileError::InvalidNumber {
                line: line_number,
                token: extents.to_string(),
            })
        }
    };
    Ok((
        parse_count(&captures[1], line_number)?,
        parse_count(&captures[2], line_number)?,
        parse_float(spacing, line_number)?,
    ))
}

/// Parses `Vert <count> <a> <b> <spacing> ...` into the number of vertical intervals and spacing.
fn parse_vertical_header(line: &str, line_number: usize) -> Result<(usize, fgr), FieldFileError> {
    let tokens: Vec<_> = line.split_whitespace().collect();
    match (tokens.get(1), tokens.get(4)) {
        (Some(count), Some(spacing)) => Ok((
            parse_count(count, line_number)?,
            parse_float(spacing, line_number)?,
        )),
        _ => Err(FieldFileError::MalformedHeader {
            line: line_number,
            header: "Vert",
        }),
    }
}
