//! Tracing field lines of a vector field over the lattice of a field grid.

pub mod curvature;
pub mod stepping;

use self::stepping::LatticeStepper3;
use crate::{geometry::Idx3, grid::FieldGrid, num::BFloat};

/// Reason for the termination of a traced field line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoppingCause {
    /// The requested number of steps was taken.
    ReachedMaxSteps,
    /// The stepper found no admissible cell to continue to.
    NoAdmissibleNeighbor,
}

/// Sequence of lattice cells visited while following a field line.
#[derive(Clone, Debug)]
pub struct LatticeFieldLine {
    indices: Vec<Idx3<usize>>,
    stopping_cause: StoppingCause,
}

impl LatticeFieldLine {
    /// Returns the index where tracing started.
    pub fn start(&self) -> &Idx3<usize> {
        &self.indices[0]
    }

    /// Returns the last index that was reached.
    pub fn end(&self) -> &Idx3<usize> {
        &self.indices[self.indices.len() - 1]
    }

    /// Returns the number of steps that were taken.
    pub fn n_steps(&self) -> usize {
        self.indices.len() - 1
    }

    /// Returns all visited indices, starting with the start index.
    pub fn indices(&self) -> &[Idx3<usize>] {
        &self.indices
    }

    /// Returns why tracing stopped.
    pub fn stopping_cause(&self) -> StoppingCause {
        self.stopping_cause
    }

    /// Returns the last three visited indices, the most recent first.
    ///
    /// Lines shorter than three cells are padded with the start index.
    pub fn recent_indices(&self) -> [&Idx3<usize>; 3] {
        let n = self.indices.len();
        let from_end = |offset: usize| &self.indices[n.saturating_sub(offset + 1)];
        [from_end(0), from_end(1), from_end(2)]
    }
}

/// Follows the field from the given lattice cell for at most the given number of steps.
///
/// # Parameters
///
/// - `stepper`: Stepper used to select each successive cell.
/// - `grid`: Grid holding the field to trace.
/// - `start`: Index of the cell where tracing should start.
/// - `max_steps`: Maximum number of steps to take.
///
/// # Returns
///
/// The traced `LatticeFieldLine`, always containing at least the start index.
///
/// # Type parameters
///
/// - `F`: Floating point type of the field data.
/// - `St`: Type of stepper.
pub fn trace_lattice_field_line<F, St>(
    stepper: &St,
    grid: &FieldGrid<F>,
    start: &Idx3<usize>,
    max_steps: usize,
) -> LatticeFieldLine
where
    F: BFloat,
    St: LatticeStepper3,
{
    let mut indices = Vec::with_capacity(max_steps + 1);
    indices.push(*start);

    let mut stopping_cause = StoppingCause::ReachedMaxSteps;
    for _ in 0..max_steps {
        let current = &indices[indices.len() - 1];
        match stepper.next_position(grid, current) {
            Some(next) => indices.push(next),
            None => {
                stopping_cause = StoppingCause::NoAdmissibleNeighbor;
                break;
            }
        }
    }
    LatticeFieldLine {
        indices,
        stopping_cause,
    }
}

#[cfg(test)]
mod tests {

    use super::{stepping::cone::ConeStepper3, *};
    use crate::{
        geometry::{In3D, Point3, Vec3},
        grid::{basis::LocalBasis, fgr},
    };

    fn upward_grid() -> FieldGrid<fgr> {
        FieldGrid::from_world_samples(
            In3D::same(3),
            In3D::same(1.0),
            LocalBasis::standard(),
            |indices| {
                let (i, j, k) = indices.to_tuple();
                (
                    Point3::new(i as fgr, j as fgr, k as fgr),
                    Vec3::new(0.0, 0.0, 1.0),
                )
            },
        )
    }

    #[test]
    fn traces_straight_up_until_boundary() {
        let grid = upward_grid();
        let line =
            trace_lattice_field_line(&ConeStepper3::default(), &grid, &Idx3::new(1, 1, 0), 10);
        assert_eq!(
            line.indices(),
            &[Idx3::new(1, 1, 0), Idx3::new(1, 1, 1), Idx3::new(1, 1, 2)]
        );
        assert_eq!(line.n_steps(), 2);
        assert_eq!(line.stopping_cause(), StoppingCause::NoAdmissibleNeighbor);
        assert_eq!(
            grid.position(line.start()).distance_to(grid.position(line.end())),
            2.0
        );
    }

    #[test]
    fn stops_after_max_steps() {
        let grid = upward_grid();
        let line =
            trace_lattice_field_line(&ConeStepper3::default(), &grid, &Idx3::new(0, 2, 0), 1);
        assert_eq!(line.end(), &Idx3::new(0, 2, 1));
        assert_eq!(line.stopping_cause(), StoppingCause::ReachedMaxSteps);
    }

    #[test]
    fn zero_steps_yields_start_only() {
        let grid = upward_grid();
        let line =
            trace_lattice_field_line(&ConeStepper3::default(), &grid, &Idx3::new(2, 0, 1), 0);
        assert_eq!(line.n_steps(), 0);
        assert_eq!(line.start(), line.end());
        assert_eq!(line.stopping_cause(), StoppingCause::ReachedMaxSteps);
    }

    #[test]
    fn recent_indices_are_padded_with_start() {
        let grid = upward_grid();
        let stepper = ConeStepper3::default();

        let line = trace_lattice_field_line(&stepper, &grid, &Idx3::new(1, 1, 1), 5);
        let start = Idx3::new(1, 1, 1);
        let end = Idx3::new(1, 1, 2);
        assert_eq!(line.recent_indices(), [&end, &start, &start]);

        let line = trace_lattice_field_line(&stepper, &grid, &Idx3::new(1, 1, 0), 5);
        let (a, b, c) = (Idx3::new(1, 1, 2), Idx3::new(1, 1, 1), Idx3::new(1, 1, 0));
        assert_eq!(line.recent_indices(), [&a, &b, &c]);
    }
}
