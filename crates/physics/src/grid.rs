use crate::config::UpAxis;
use crate::types::Vec3;

/// World origins for `num_envs` environments laid out on a square-ish grid.
///
/// Environments fill rows of `floor(sqrt(num_envs))` (at least one), spaced
/// `spacing` apart. Rows advance along y when z is up and along z when y is
/// up, so the ground plane always holds the grid.
#[must_use]
pub fn env_origins(num_envs: usize, spacing: f32, up_axis: UpAxis) -> Vec<Vec3> {
    let per_row = num_per_row(num_envs);
    (0..num_envs)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let (col, row) = ((i % per_row) as f32, (i / per_row) as f32);
            match up_axis {
                UpAxis::Z => Vec3::new(col * spacing, row * spacing, 0.0),
                UpAxis::Y => Vec3::new(col * spacing, 0.0, row * spacing),
            }
        })
        .collect()
}

fn num_per_row(num_envs: usize) -> usize {
    let mut n = 1;
    while (n + 1) * (n + 1) <= num_envs {
        n += 1;
    }
    n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_hold_floor_sqrt() {
        assert_eq!(num_per_row(0), 1);
        assert_eq!(num_per_row(1), 1);
        assert_eq!(num_per_row(8), 2);
        assert_eq!(num_per_row(9), 3);
        assert_eq!(num_per_row(512), 22);
    }

    #[test]
    fn z_up_grid() {
        let o = env_origins(5, 2.0, UpAxis::Z);
        assert_eq!(o.len(), 5);
        assert_eq!(o[0], Vec3::ZERO);
        assert_eq!(o[1], Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(o[2], Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(o[4], Vec3::new(0.0, 4.0, 0.0));
    }

    #[test]
    fn y_up_grid() {
        let o = env_origins(4, 3.0, UpAxis::Y);
        assert_eq!(o[3], Vec3::new(3.0, 0.0, 3.0));
    }
}
