//! Stepping to the neighbor best aligned with the local field, within a cone.

use super::LatticeStepper3;
use crate::{
    geometry::{
        Dim3::{X, Y, Z},
        Idx3,
    },
    grid::FieldGrid,
    num::{self, BFloat},
};
use std::{fmt, str::FromStr};

/// Which of several equally aligned neighbors to select.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TieBreak {
    /// The first one in enumeration order.
    First,
    /// The last one in enumeration order.
    Last,
}

impl FromStr for TieBreak {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "first" => Ok(Self::First),
            "last" => Ok(Self::Last),
            invalid => Err(format!("Invalid tie-break rule: {}", invalid)),
        }
    }
}

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::First => "first",
                Self::Last => "last",
            }
        )
    }
}

/// Configuration parameters for the cone stepper.
#[derive(Clone, Debug)]
pub struct ConeStepperConfig {
    /// Neighbors whose direction deviates from the field by this many degrees
    /// or more are not admitted.
    pub max_angle_degrees: f64,
    /// How to choose among neighbors with the same minimal deviation.
    pub tie_break: TieBreak,
}

impl ConeStepperConfig {
    pub const DEFAULT_MAX_ANGLE_DEGREES: f64 = 30.0;
    pub const DEFAULT_TIE_BREAK: TieBreak = TieBreak::Last;

    fn validate(&self) {
        assert!(
            self.max_angle_degrees > 0.0 && self.max_angle_degrees <= 180.0,
            "Maximum angle must be in the range (0, 180]."
        );
    }
}

impl Default for ConeStepperConfig {
    fn default() -> Self {
        ConeStepperConfig {
            max_angle_degrees: Self::DEFAULT_MAX_ANGLE_DEGREES,
            tie_break: Self::DEFAULT_TIE_BREAK,
        }
    }
}

/// Stepper moving to whichever of the 26 surrounding cells lies closest to the
/// direction of the field at the current cell.
///
/// A neighbor is admitted only if the angle between the displacement to it and
/// the current field vector is strictly below the configured maximum. This
/// follows the field greedily on the lattice, without sub-cell interpolation.
#[derive(Clone, Debug)]
pub struct ConeStepper3 {
    config: ConeStepperConfig,
}

impl ConeStepper3 {
    /// Creates a new cone stepper with the given configuration.
    pub fn new(config: ConeStepperConfig) -> Self {
        config.validate();
        ConeStepper3 { config }
    }

    /// Returns the configuration of the stepper.
    pub fn config(&self) -> &ConeStepperConfig {
        &self.config
    }
}

impl Default for ConeStepper3 {
    fn default() -> Self {
        Self::new(ConeStepperConfig::default())
    }
}

const NEIGHBOR_OFFSETS: [isize; 3] = [-1, 0, 1];

impl LatticeStepper3 for ConeStepper3 {
    fn next_position<F: BFloat>(
        &self,
        grid: &FieldGrid<F>,
        indices: &Idx3<usize>,
    ) -> Option<Idx3<usize>> {
        let current = grid.at(indices);
        let max_angle: F = num::from_f64(self.config.max_angle_degrees);
        let origin = Idx3::<isize>::from(indices);

        let mut best: Option<(Idx3<usize>, F)> = None;

        for &di in &NEIGHBOR_OFFSETS {
            for &dj in &NEIGHBOR_OFFSETS {
                for &dk in &NEIGHBOR_OFFSETS {
                    if di == 0 && dj == 0 && dk == 0 {
                        continue;
                    }
                    let neighbor = Idx3::new(origin[X] + di, origin[Y] + dj, origin[Z] + dk);
                    if !grid.contains(&neighbor) {
                        continue;
                    }
                    let neighbor = Idx3::<usize>::from(&neighbor);

                    let displacement = grid.position(&neighbor) - &current.position;
                    let angle = displacement.angle_degrees_to(&current.field);

                    // NaN angles (zero field or coincident positions) are never admitted
                    if angle.is_nan() || angle >= max_angle {
                        continue;
                    }
                    let is_better = match best {
                        None => true,
                        Some((_, best_angle)) => match self.config.tie_break {
                            TieBreak::First => angle < best_angle,
                            TieBreak::Last => angle <= best_angle,
                        },
                    };
                    if is_better {
                        best = Some((neighbor, angle));
                    }
                }
            }
        }
        best.map(|(neighbor, _)| neighbor)
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::{
        geometry::{In3D, Point3, Vec3},
        grid::{basis::LocalBasis, fgr},
    };
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn uniform_grid(shape: In3D<usize>, field: Vec3<fgr>) -> FieldGrid<fgr> {
        FieldGrid::from_world_samples(shape, In3D::same(1.0), LocalBasis::standard(), |indices| {
            let (i, j, k) = indices.to_tuple();
            (Point3::new(i as fgr, j as fgr, k as fgr), field)
        })
    }

    /// Grid where the center cell's field points along +x and the cell directly
    /// ahead of it is displaced behind, leaving four neighbors at exactly 45 degrees.
    fn four_way_tie_grid() -> FieldGrid<fgr> {
        FieldGrid::from_world_samples(
            In3D::same(3),
            In3D::same(1.0),
            LocalBasis::standard(),
            |indices| {
                let (i, j, k) = indices.to_tuple();
                let position = if (i, j, k) == (2, 1, 1) {
                    Point3::new(0.0, 1.0, 1.0)
                } else {
                    Point3::new(i as fgr, j as fgr, k as fgr)
                };
                (position, Vec3::new(1.0, 0.0, 0.0))
            },
        )
    }

    #[test]
    fn steps_along_uniform_field() {
        let grid = uniform_grid(In3D::same(3), Vec3::new(0.0, 0.0, 1.0));
        let stepper = ConeStepper3::default();
        assert_eq!(
            stepper.next_position(&grid, &Idx3::new(1, 1, 0)),
            Some(Idx3::new(1, 1, 1))
        );
        assert_eq!(
            stepper.next_position(&grid, &Idx3::new(1, 1, 1)),
            Some(Idx3::new(1, 1, 2))
        );
        assert_eq!(stepper.next_position(&grid, &Idx3::new(1, 1, 2)), None);
    }

    #[test]
    fn selects_diagonal_neighbor_for_diagonal_field() {
        let grid = uniform_grid(In3D::same(3), Vec3::new(1.0, 1.0, 1.0));
        let stepper = ConeStepper3::default();
        assert_eq!(
            stepper.next_position(&grid, &Idx3::new(0, 0, 0)),
            Some(Idx3::new(1, 1, 1))
        );
    }

    #[test]
    fn rejects_neighbors_outside_cone() {
        // The closest neighbor direction is 45 degrees away from the field
        let field = Vec3::new(1.0, 0.0, 0.0);
        let grid = four_way_tie_grid();
        assert_eq!(*grid.field(&Idx3::new(1, 1, 1)), field);
        assert_eq!(
            ConeStepper3::default().next_position(&grid, &Idx3::new(1, 1, 1)),
            None
        );
    }

    #[test]
    fn returns_none_when_field_points_out_of_grid() {
        let grid = uniform_grid(In3D::same(3), Vec3::new(-1.0, -1.0, -1.0));
        let stepper = ConeStepper3::default();
        assert_eq!(stepper.next_position(&grid, &Idx3::new(0, 0, 0)), None);
        assert_eq!(
            stepper.next_position(&grid, &Idx3::new(2, 2, 2)),
            Some(Idx3::new(1, 1, 1))
        );
    }

    #[test]
    fn returns_none_for_zero_field() {
        let grid = uniform_grid(In3D::same(3), Vec3::zero());
        assert_eq!(
            ConeStepper3::default().next_position(&grid, &Idx3::new(1, 1, 1)),
            None
        );
    }

    #[test]
    fn tie_break_selects_by_enumeration_order() {
        let grid = four_way_tie_grid();
        let wide_cone = |tie_break| {
            ConeStepper3::new(ConeStepperConfig {
                max_angle_degrees: 50.0,
                tie_break,
            })
        };
        assert_eq!(
            wide_cone(TieBreak::First).next_position(&grid, &Idx3::new(1, 1, 1)),
            Some(Idx3::new(2, 0, 1))
        );
        assert_eq!(
            wide_cone(TieBreak::Last).next_position(&grid, &Idx3::new(1, 1, 1)),
            Some(Idx3::new(2, 2, 1))
        );
    }

    #[test]
    fn next_position_stays_inside_grid() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut random_component = move || rng.gen_range(-1.0..1.0);
        let shape = In3D::new(4, 5, 3);
        let fields: Vec<_> = (0..shape[X] * shape[Y] * shape[Z])
            .map(|_| Vec3::new(random_component(), random_component(), random_component()))
            .collect();
        let grid = FieldGrid::from_world_samples(
            shape,
            In3D::same(1.0),
            LocalBasis::standard(),
            |indices| {
                let (i, j, k) = indices.to_tuple();
                (
                    Point3::new(i as fgr, j as fgr, k as fgr),
                    fields[i + shape[X] * (j + shape[Y] * k)],
                )
            },
        );
        let stepper = ConeStepper3::new(ConeStepperConfig {
            max_angle_degrees: 90.0,
            tie_break: TieBreak::First,
        });
        let mut n_steps = 0;
        for indices in grid.indices() {
            if let Some(next) = stepper.next_position(&grid, &indices) {
                assert!(grid.get(&next).is_some());
                assert_ne!(next, indices);
                n_steps += 1;
            }
        }
        assert!(n_steps > 0);
    }

    #[test]
    fn tie_break_is_parsed_from_string() {
        assert_eq!("first".parse::<TieBreak>(), Ok(TieBreak::First));
        assert_eq!("Last".parse::<TieBreak>(), Ok(TieBreak::Last));
        assert!("middle".parse::<TieBreak>().is_err());
    }
}
