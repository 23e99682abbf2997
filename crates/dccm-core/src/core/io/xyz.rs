use crate::core::models::trajectory::Trajectory;
use nalgebra::Point3;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Upper bound on the per-frame pre-allocation; larger frames grow as records are read.
const MAX_PREALLOCATED_ATOMS: usize = 1 << 16;

#[derive(Debug, Error)]
pub enum XyzError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: XyzParseErrorKind },
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
    #[error("Trajectory contains no frames")]
    Empty,
}

#[derive(Debug, Error)]
pub enum XyzParseErrorKind {
    #[error("Invalid atom count '{0}'")]
    InvalidAtomCount(String),
    #[error("Invalid coordinate '{value}' in column {column}")]
    InvalidCoordinate { column: usize, value: String },
    #[error("Atom record needs a name and three coordinates")]
    ShortAtomRecord,
    #[error("File ended before the frame's {expected} atom records were read")]
    UnexpectedEof { expected: usize },
}

/// Reader for multi-frame XYZ trajectories.
///
/// Each frame is an atom count line, a free-form comment line, then one
/// `name x y z` record per atom. Every frame must list the same atoms in the same
/// order as the first one.
pub struct XyzFile;

impl XyzFile {
    pub fn read_from(reader: &mut impl BufRead) -> Result<Trajectory, XyzError> {
        let mut lines = reader.lines().enumerate().map(|(idx, l)| (idx + 1, l));
        let mut trajectory: Option<Trajectory> = None;

        loop {
            let Some((count_line_num, count_line)) = next_non_blank(&mut lines)? else {
                break;
            };
            let count_str = count_line.trim();
            let atom_count: usize = count_str.parse().map_err(|_| XyzError::Parse {
                line: count_line_num,
                kind: XyzParseErrorKind::InvalidAtomCount(count_str.to_string()),
            })?;

            // Comment line; its content is ignored.
            if lines.next().transpose_line()?.is_none() {
                return Err(XyzError::Parse {
                    line: count_line_num + 1,
                    kind: XyzParseErrorKind::UnexpectedEof {
                        expected: atom_count,
                    },
                });
            }

            let capacity = atom_count.min(MAX_PREALLOCATED_ATOMS);
            let mut names = Vec::with_capacity(capacity);
            let mut frame = Vec::with_capacity(capacity);
            for _ in 0..atom_count {
                let Some((line_num, line)) = lines.next().transpose_line()? else {
                    return Err(XyzError::Parse {
                        line: count_line_num,
                        kind: XyzParseErrorKind::UnexpectedEof {
                            expected: atom_count,
                        },
                    });
                };
                let (name, position) = parse_atom_record(line_num, &line)?;
                names.push(name);
                frame.push(position);
            }

            let traj = trajectory.get_or_insert_with(|| Trajectory::new(names.clone()));
            if traj.atom_names() != names.as_slice() {
                return Err(XyzError::Inconsistency(format!(
                    "Frame starting on line {} lists different atoms than the first frame",
                    count_line_num
                )));
            }
            traj.push_frame(frame).map_err(|f| {
                XyzError::Inconsistency(format!(
                    "Frame starting on line {} has {} atoms, expected {}",
                    count_line_num,
                    f.len(),
                    traj.num_atoms()
                ))
            })?;
        }

        let trajectory = trajectory.ok_or(XyzError::Empty)?;
        debug!(
            frames = trajectory.num_frames(),
            atoms = trajectory.num_atoms(),
            "Parsed XYZ trajectory."
        );
        Ok(trajectory)
    }

    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Trajectory, XyzError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}

trait TransposeLine {
    fn transpose_line(self) -> Result<Option<(usize, String)>, io::Error>;
}

impl TransposeLine for Option<(usize, io::Result<String>)> {
    fn transpose_line(self) -> Result<Option<(usize, String)>, io::Error> {
        match self {
            Some((n, Ok(line))) => Ok(Some((n, line))),
            Some((_, Err(e))) => Err(e),
            None => Ok(None),
        }
    }
}

fn next_non_blank(
    lines: &mut impl Iterator<Item = (usize, io::Result<String>)>,
) -> Result<Option<(usize, String)>, io::Error> {
    while let Some((n, line)) = lines.next().transpose_line()? {
        if !line.trim().is_empty() {
            return Ok(Some((n, line)));
        }
    }
    Ok(None)
}

fn parse_atom_record(line_num: usize, line: &str) -> Result<(String, Point3<f64>), XyzError> {
    let mut fields = line.split_whitespace();
    let name = fields.next();
    let coords: Vec<&str> = fields.by_ref().take(3).collect();
    let (Some(name), [x, y, z]) = (name, coords.as_slice()) else {
        return Err(XyzError::Parse {
            line: line_num,
            kind: XyzParseErrorKind::ShortAtomRecord,
        });
    };

    let parse = |column: usize, value: &str| -> Result<f64, XyzError> {
        value.parse().map_err(|_| XyzError::Parse {
            line: line_num,
            kind: XyzParseErrorKind::InvalidCoordinate {
                column,
                value: value.to_string(),
            },
        })
    };

    Ok((
        name.to_string(),
        Point3::new(parse(2, *x)?, parse(3, *y)?, parse(4, *z)?),
    ))
}
