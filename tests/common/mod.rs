use fieldbend::{
    cli, exit_on_error,
    grid::{fgr, FieldGrid},
    io::{field_file, Verbosity},
};
use lazy_static::lazy_static;
use std::{
    ffi::OsString,
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
};
use tempfile::TempDir;

#[macro_export]
macro_rules! def_test {
    (
        IN[$($in_ident:ident = $in_expr:expr),*]
        OUT[$($out_ident:ident = $out_str:expr),*]
        fn $name:ident $test_body:expr
    ) => {
        #[test]
        fn $name() {
            let test = common::Test::new();

            $( let $in_ident = test.write_field_file(stringify!($in_ident), &$in_expr); )*
            $( let $out_ident = test.output_path($out_str); )*

            let test_body = |$( $in_ident: &str, )* $( $out_ident: &str, )*| $test_body;

            test_body(
                $( path_str!($in_ident), )* $( path_str!($out_ident), )*
            );
        }
    };
}

#[macro_export]
macro_rules! path_str {
    ($path:expr) => {
        $path.to_string_lossy().as_ref()
    };
}

pub fn run<I, T>(args: I)
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    cli::run::run_with_args(COMMAND.clone().get_matches_from(args));
}

pub fn read_grid<P: AsRef<Path>>(file_path: P) -> FieldGrid<fgr> {
    exit_on_error!(
        field_file::read_field_grid(file_path, Verbosity::Quiet),
        "Error: Could not read field file: {}"
    )
}

pub fn read_lines<P: AsRef<Path>>(file_path: P) -> Vec<String> {
    let file_path = file_path.as_ref();
    let text = exit_on_error!(
        fs::read_to_string(file_path),
        "Error: Could not read {}: {}",
        file_path.display()
    );
    text.lines().map(String::from).collect()
}

pub fn assert_files_identical<P1, P2>(file_path_1: P1, file_path_2: P2)
where
    P1: AsRef<Path>,
    P2: AsRef<Path>,
{
    let file_path_1 = file_path_1.as_ref();
    let file_path_2 = file_path_2.as_ref();
    assert!(
        read_lines(file_path_1) == read_lines(file_path_2),
        "Files {} and {} not identical",
        file_path_1.to_string_lossy(),
        file_path_2.to_string_lossy()
    );
}

/// Description of a synthetic field file, with positions laid out on a regular
/// lattice in the frame spanned by the basis vectors.
#[derive(Clone, Debug)]
pub struct SyntheticField {
    pub shape: [usize; 3],
    pub spacing: fgr,
    pub basis: [[fgr; 3]; 3],
    pub center: [fgr; 3],
    pub field: fn(usize, usize, usize) -> [fgr; 3],
}

impl SyntheticField {
    /// Regular lattice in the standard basis with the field from the given function.
    pub fn standard(shape: [usize; 3], field: fn(usize, usize, usize) -> [fgr; 3]) -> Self {
        Self {
            shape,
            spacing: 1.0,
            basis: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            center: [0.0, 0.0, 0.0],
            field,
        }
    }

    /// Returns the world space position of the cell with the given index.
    pub fn world_position(&self, i: usize, j: usize, k: usize) -> [fgr; 3] {
        let local = [i as fgr, j as fgr, k as fgr].map(|coord| coord * self.spacing);
        let mut position = self.center;
        for (axis, basis_vector) in self.basis.iter().enumerate() {
            for dim in 0..3 {
                position[dim] += local[axis] * basis_vector[dim];
            }
        }
        position
    }

    /// Returns the world space field vector for the cell with the given index.
    pub fn world_field(&self, i: usize, j: usize, k: usize) -> [fgr; 3] {
        let local = (self.field)(i, j, k);
        let mut field = [0.0; 3];
        for (axis, basis_vector) in self.basis.iter().enumerate() {
            for dim in 0..3 {
                field[dim] += local[axis] * basis_vector[dim];
            }
        }
        field
    }

    pub fn to_file_text(&self) -> String {
        let bracketed = |v: &[fgr; 3]| format!("[{:e} {:e} {:e}]", v[0], v[1], v[2]);
        let [nx, ny, nz] = self.shape;

        let mut text = String::new();
        writeln!(text, "V1 = {}", bracketed(&self.basis[0])).unwrap();
        writeln!(text, "V2 = {}", bracketed(&self.basis[1])).unwrap();
        writeln!(text, "Normal = {}", bracketed(&self.basis[2])).unwrap();
        writeln!(text, "Center = {}", bracketed(&self.center)).unwrap();
        writeln!(text, "Plane: {}x{} grid spacing {}", nx, ny, self.spacing).unwrap();
        writeln!(text, "Vert {} layers spacing {}", nz - 1, self.spacing).unwrap();
        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    let [x, y, z] = self.world_position(i, j, k);
                    let [ex, ey, ez] = self.world_field(i, j, k);
                    let magnitude = (ex * ex + ey * ey + ez * ez).sqrt();
                    writeln!(
                        text,
                        "  {:e} {:e} {:e} {:e} {:e} {:e} {:e}",
                        x, y, z, ex, ey, ez, magnitude
                    )
                    .unwrap();
                }
            }
        }
        text
    }
}

pub struct Test {
    dir: TempDir,
}

impl Test {
    pub fn new() -> Self {
        let dir = exit_on_error!(
            tempfile::tempdir(),
            "Error: Could not create temporary directory for test: {}"
        );
        Self { dir }
    }

    pub fn write_field_file<S: AsRef<str>>(&self, name: S, field: &SyntheticField) -> PathBuf {
        let file_path = self.output_path(format!("{}.out", name.as_ref()));
        exit_on_error!(
            fs::write(&file_path, field.to_file_text()),
            "Error: Could not write field file {}: {}",
            file_path.display()
        );
        file_path
    }

    pub fn output_path<S: AsRef<str>>(&self, file_name: S) -> PathBuf {
        self.dir.path().join(file_name.as_ref())
    }
}

lazy_static! {
    static ref COMMAND: clap::Command<'static> = cli::build::build().no_binary_name(true);
}
